//! HTTP endpoint implementations for the roster, signups and the board.

pub mod board_handlers;
pub mod guest_handlers;
pub mod request_utils;
pub mod response;
pub mod signup_handlers;

pub use board_handlers::{board, quote_times, status};
pub use guest_handlers::{add_guest, edit_guest, list_guests, remove_guest, seat_guest};
pub use response::{error_response, success_response, ApiError, ApiResponse, ErrorResponse};
pub use signup_handlers::{persist, signup};
