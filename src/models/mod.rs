pub mod booking;

pub use booking::{Booking, BookingsResponse, CreateBookingRequest, InsertedResponse, NewBooking};
