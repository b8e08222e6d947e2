use crate::models::{BookingData, Seat, SeatPosition};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionAction {
    Toggle(SeatPosition),
    Reset,
}

/// Seats picked on the seat map, in click order. Each action yields a new value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeatSelection {
    selected: Vec<SeatPosition>,
}

impl SeatSelection {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn apply(mut self, action: SelectionAction) -> Self {
        match action {
            SelectionAction::Toggle(position) => {
                match self.selected.iter().position(|p| *p == position) {
                    Some(index) => {
                        self.selected.remove(index);
                    }
                    None => self.selected.push(position),
                }
                self
            }
            SelectionAction::Reset => Self::default(),
        }
    }

    // Занятое место выбрать нельзя (кнопка на схеме неактивна)
    #[must_use]
    pub fn toggle_seat(self, seat: &Seat) -> Self {
        if seat.booked {
            return self;
        }
        self.apply(SelectionAction::Toggle(seat.position()))
    }

    pub fn is_selected(&self, position: &SeatPosition) -> bool {
        self.selected.contains(position)
    }

    pub fn seats(&self) -> impl Iterator<Item = &SeatPosition> {
        self.selected.iter()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn to_booking_data(&self, price: f64) -> Vec<BookingData> {
        self.selected
            .iter()
            .map(|p| BookingData { row: p.row, column: p.column, price })
            .collect()
    }
}
