use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Seat {
    pub id: i64,
    pub row: i32,
    pub column: i32,
    pub booked: bool,
}

impl Seat {
    pub fn position(&self) -> SeatPosition {
        SeatPosition { row: self.row, column: self.column }
    }
}

/// Row/column pair identifying a seat within one showtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeatPosition {
    pub row: i32,
    pub column: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatRow {
    pub row: i32,
    pub seats: Vec<Seat>,
}

/// Seat map of a showtime as served by `/showtimes/search/seats/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatMap {
    pub showtime_id: String,
    pub price: f64,
    pub seats: Vec<Seat>,
    pub rows: Vec<SeatRow>,
}

impl SeatMap {
    pub fn new(showtime_id: String, price: f64, seats: Vec<Seat>) -> Self {
        let rows = group_seats_by_row(&seats);
        Self { showtime_id, price, seats, rows }
    }
}

// Ряды идут в порядке первого появления, места внутри ряда - в исходном порядке
pub fn group_seats_by_row(seats: &[Seat]) -> Vec<SeatRow> {
    let mut rows: Vec<SeatRow> = Vec::new();
    let mut index: HashMap<i32, usize> = HashMap::new();

    for seat in seats {
        let slot = *index.entry(seat.row).or_insert_with(|| {
            rows.push(SeatRow { row: seat.row, seats: Vec::new() });
            rows.len() - 1
        });
        rows[slot].seats.push(seat.clone());
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seat(id: i64, row: i32, column: i32) -> Seat {
        Seat { id, row, column, booked: false }
    }

    #[test]
    fn groups_by_row_in_first_appearance_order() {
        let seats = vec![seat(1, 1, 1), seat(2, 2, 1), seat(3, 1, 2)];
        let rows = group_seats_by_row(&seats);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].row, 1);
        assert_eq!(rows[0].seats.iter().map(|s| s.column).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(rows[1].row, 2);
        assert_eq!(rows[1].seats.iter().map(|s| s.column).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn row_order_is_not_sorted() {
        let seats = vec![seat(1, 3, 1), seat(2, 1, 1), seat(3, 3, 2)];
        let rows: Vec<i32> = group_seats_by_row(&seats).iter().map(|r| r.row).collect();
        assert_eq!(rows, vec![3, 1]);
    }

    #[test]
    fn empty_input_gives_no_rows() {
        assert!(group_seats_by_row(&[]).is_empty());
    }

    #[test]
    fn seat_map_serializes_camel_case() {
        let map = SeatMap::new("st-1".into(), 45000.0, vec![seat(1, 1, 1)]);
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json["showtimeId"], "st-1");
        assert_eq!(json["rows"][0]["seats"][0]["column"], 1);
    }
}
