use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{Local, Utc};

use crate::db::{queries, DbHandle};
use crate::errors::AppError;
use crate::models::{BookingsResponse, CreateBookingRequest, InsertedResponse};
use crate::services::validation::validate_booking;
use crate::state::AppState;

async fn connection(state: &AppState) -> Result<DbHandle, AppError> {
    state.db.handle().await.map_err(|e| {
        tracing::error!(error = %e, "failed to connect to database");
        AppError::DatabaseNotReady
    })
}

// POST /bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<InsertedResponse>), AppError> {
    let Json(req) = payload.map_err(|e| {
        tracing::warn!(error = %e, "rejected booking body");
        AppError::InvalidBody
    })?;

    let new_booking = validate_booking(req, Local::now().date_naive()).map_err(|e| {
        tracing::debug!(reason = %e, "booking failed validation");
        e
    })?;

    let handle = connection(&state).await?;
    let booking = new_booking.into_booking(Utc::now());

    {
        let db = handle.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        queries::insert_booking(&db, &booking).map_err(|e| {
            tracing::error!(error = %e, "error inserting booking");
            AppError::Insert
        })?;
    }

    tracing::info!(booking_id = %booking.id, "booking created");

    Ok((
        StatusCode::CREATED,
        Json(InsertedResponse {
            inserted_id: booking.id,
        }),
    ))
}

// GET /bookings
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BookingsResponse>, AppError> {
    let handle = connection(&state).await?;

    let bookings = {
        let db = handle.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        queries::list_bookings(&db).map_err(|e| {
            tracing::error!(error = %e, "error fetching booking details");
            AppError::Fetch
        })?
    };

    Ok(Json(BookingsResponse { bookings }))
}
