use std::sync::LazyLock;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::models::{CreateBookingRequest, NewBooking};

#[allow(clippy::expect_used)]
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static regex should not panic")
});
#[allow(clippy::expect_used)]
static MOBILE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("static regex should not panic"));

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("All fields including start and end dates are required")]
    MissingFields,
    #[error("Invalid email format")]
    InvalidEmail,
    #[error("Invalid mobile number format")]
    InvalidMobile,
    #[error("Invalid start date")]
    InvalidStartDate,
    #[error("Start date cannot be in the past")]
    StartDateInPast,
    #[error("Invalid end date")]
    InvalidEndDate,
    #[error("End date must be after start date")]
    EndNotAfterStart,
}

/// Runs the intake rules in order and stops at the first failure.
///
/// `today` is the server's current calendar day; the start date may equal it
/// but not precede it.
pub fn validate_booking(
    req: CreateBookingRequest,
    today: NaiveDate,
) -> Result<NewBooking, ValidationError> {
    let (
        Some(first_name),
        Some(last_name),
        Some(email),
        Some(mobile),
        Some(address),
        Some(start_raw),
        Some(end_raw),
    ) = (
        required(req.first_name),
        required(req.last_name),
        required(req.email),
        required(req.mobile),
        required(req.address),
        required(req.start_date),
        required(req.end_date),
    )
    else {
        return Err(ValidationError::MissingFields);
    };

    if !is_valid_email(&email) {
        return Err(ValidationError::InvalidEmail);
    }
    if !is_valid_mobile(&mobile) {
        return Err(ValidationError::InvalidMobile);
    }

    let start_date = parse_date(&start_raw).ok_or(ValidationError::InvalidStartDate)?;
    if start_date < today {
        return Err(ValidationError::StartDateInPast);
    }

    let end_date = parse_date(&end_raw).ok_or(ValidationError::InvalidEndDate)?;
    if end_date <= start_date {
        return Err(ValidationError::EndNotAfterStart);
    }

    Ok(NewBooking {
        first_name,
        last_name,
        email,
        mobile,
        address,
        message: req.message.unwrap_or_default(),
        start_date,
        end_date,
    })
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

pub fn is_valid_mobile(mobile: &str) -> bool {
    MOBILE_REGEX.is_match(mobile)
}

/// Accepts `YYYY-MM-DD`, a naive `YYYY-MM-DDTHH:MM:SS` or an RFC 3339
/// timestamp. Only the calendar date is kept; offsets are converted to the
/// server's local day first.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Local).date_naive())
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn valid_request() -> CreateBookingRequest {
        CreateBookingRequest {
            first_name: Some("A".to_string()),
            last_name: Some("B".to_string()),
            email: Some("a@b.com".to_string()),
            mobile: Some("1234567890".to_string()),
            address: Some("X".to_string()),
            message: None,
            start_date: Some("2025-06-01".to_string()),
            end_date: Some("2025-06-05".to_string()),
        }
    }

    const TODAY: &str = "2025-05-20";

    #[test]
    fn test_valid_request_defaults_message() {
        let booking = validate_booking(valid_request(), date(TODAY)).unwrap();
        assert_eq!(booking.message, "");
        assert_eq!(booking.start_date, date("2025-06-01"));
        assert_eq!(booking.end_date, date("2025-06-05"));
    }

    #[test]
    fn test_message_is_kept() {
        let req = CreateBookingRequest {
            message: Some("late check-in".to_string()),
            ..valid_request()
        };
        let booking = validate_booking(req, date(TODAY)).unwrap();
        assert_eq!(booking.message, "late check-in");
    }

    #[test]
    fn test_missing_or_empty_required_field() {
        let missing = CreateBookingRequest {
            address: None,
            ..valid_request()
        };
        assert_eq!(
            validate_booking(missing, date(TODAY)),
            Err(ValidationError::MissingFields)
        );

        let empty = CreateBookingRequest {
            end_date: Some(String::new()),
            ..valid_request()
        };
        assert_eq!(
            validate_booking(empty, date(TODAY)),
            Err(ValidationError::MissingFields)
        );
    }

    #[test]
    fn test_missing_fields_checked_before_format() {
        let req = CreateBookingRequest {
            email: Some("no-at-sign".to_string()),
            first_name: None,
            ..valid_request()
        };
        assert_eq!(
            validate_booking(req, date(TODAY)),
            Err(ValidationError::MissingFields)
        );
    }

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last@mail.example.org"));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("a@@b.com"));

        let req = CreateBookingRequest {
            email: Some("a@b".to_string()),
            ..valid_request()
        };
        assert_eq!(
            validate_booking(req, date(TODAY)),
            Err(ValidationError::InvalidEmail)
        );
    }

    #[test]
    fn test_mobile_pattern() {
        assert!(is_valid_mobile("9876543210"));
        assert!(!is_valid_mobile("12345"));
        assert!(!is_valid_mobile("12345678901"));
        assert!(!is_valid_mobile("12345abcde"));
        assert!(!is_valid_mobile("+123456789"));

        let req = CreateBookingRequest {
            mobile: Some("12345".to_string()),
            ..valid_request()
        };
        assert_eq!(
            validate_booking(req, date(TODAY)),
            Err(ValidationError::InvalidMobile)
        );
    }

    #[test]
    fn test_start_date_yesterday_rejected_today_accepted() {
        let today = date(TODAY);
        let yesterday = CreateBookingRequest {
            start_date: Some("2025-05-19".to_string()),
            ..valid_request()
        };
        assert_eq!(
            validate_booking(yesterday, today),
            Err(ValidationError::StartDateInPast)
        );

        let same_day = CreateBookingRequest {
            start_date: Some("2025-05-20T23:59:00".to_string()),
            ..valid_request()
        };
        assert!(validate_booking(same_day, today).is_ok());
    }

    #[test]
    fn test_end_date_must_follow_start_date() {
        let same = CreateBookingRequest {
            end_date: Some("2025-06-01".to_string()),
            ..valid_request()
        };
        assert_eq!(
            validate_booking(same, date(TODAY)),
            Err(ValidationError::EndNotAfterStart)
        );

        let before = CreateBookingRequest {
            end_date: Some("2025-05-30".to_string()),
            ..valid_request()
        };
        assert_eq!(
            validate_booking(before, date(TODAY)),
            Err(ValidationError::EndNotAfterStart)
        );

        let next_day = CreateBookingRequest {
            end_date: Some("2025-06-02".to_string()),
            ..valid_request()
        };
        assert!(validate_booking(next_day, date(TODAY)).is_ok());
    }

    #[test]
    fn test_unparseable_dates() {
        let bad_start = CreateBookingRequest {
            start_date: Some("next tuesday".to_string()),
            ..valid_request()
        };
        assert_eq!(
            validate_booking(bad_start, date(TODAY)),
            Err(ValidationError::InvalidStartDate)
        );

        let bad_end = CreateBookingRequest {
            end_date: Some("2025-13-40".to_string()),
            ..valid_request()
        };
        assert_eq!(
            validate_booking(bad_end, date(TODAY)),
            Err(ValidationError::InvalidEndDate)
        );
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2025-06-01"), Some(date("2025-06-01")));
        assert_eq!(parse_date(" 2025-06-01 "), Some(date("2025-06-01")));
        assert_eq!(parse_date("2025-06-01T10:30:00"), Some(date("2025-06-01")));
        assert!(parse_date("2025-06-01T12:00:00Z").is_some());
        assert_eq!(parse_date("06/01/2025"), None);
    }
}
