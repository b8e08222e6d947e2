//! Client side of the booking flow: typed API calls and the state the
//! seat-selection and checkout screens keep between user actions.

pub mod api;
pub mod booking_data;
pub mod payment_form;
pub mod selection;

pub use api::{ApiClient, ApiResult, ClientError};
pub use booking_data::{decode_query, encode_query, BookingDataError};
pub use payment_form::{PaymentAction, PaymentForm};
pub use selection::{SeatSelection, SelectionAction};
