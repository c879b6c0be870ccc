use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A stored reservation. Never mutated after insert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile: String,
    pub address: String,
    pub message: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Raw form body of `POST /bookings`. Every field is optional here so that
/// missing values surface as a validation error instead of a decode failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateBookingRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub address: Option<String>,
    pub message: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// A submission that passed validation, not yet persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile: String,
    pub address: String,
    pub message: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl NewBooking {
    pub fn into_booking(self, created_at: DateTime<Utc>) -> Booking {
        Booking {
            id: uuid::Uuid::new_v4().to_string(),
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            mobile: self.mobile,
            address: self.address,
            message: self.message,
            start_date: self.start_date,
            end_date: self.end_date,
            created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertedResponse {
    pub inserted_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookingsResponse {
    pub bookings: Vec<Booking>,
}
