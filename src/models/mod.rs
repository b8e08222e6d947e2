pub mod user;
pub mod voucher;
pub mod showtime;
pub mod seat;
pub mod booking;

pub use user::{User, UserProfile, UserVoucher};
pub use voucher::AdminVoucher;
pub use showtime::Showtime;
pub use seat::{group_seats_by_row, Seat, SeatMap, SeatPosition, SeatRow};
pub use booking::{Booking, BookingData, BookingDraft};
