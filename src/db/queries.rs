use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, Row};

use crate::models::Booking;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn ensure_collection(conn: &Connection) -> anyhow::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS bookings (
            id TEXT PRIMARY KEY,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            email TEXT NOT NULL,
            mobile TEXT NOT NULL,
            address TEXT NOT NULL,
            message TEXT NOT NULL DEFAULT '',
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL,
            created_at TEXT NOT NULL
        );",
    )
    .context("failed to create bookings collection")
}

pub fn insert_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO bookings (id, first_name, last_name, email, mobile, address, message, start_date, end_date, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            booking.id,
            booking.first_name,
            booking.last_name,
            booking.email,
            booking.mobile,
            booking.address,
            booking.message,
            booking.start_date.format(DATE_FORMAT).to_string(),
            booking.end_date.format(DATE_FORMAT).to_string(),
            booking.created_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

/// All bookings in rowid order. No filtering or paging.
pub fn list_bookings(conn: &Connection) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(
        "SELECT id, first_name, last_name, email, mobile, address, message, start_date, end_date, created_at
         FROM bookings",
    )?;

    let rows = stmt.query_map([], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

fn parse_booking_row(row: &Row<'_>) -> anyhow::Result<Booking> {
    let start_date: String = row.get(7)?;
    let end_date: String = row.get(8)?;
    let created_at: String = row.get(9)?;

    Ok(Booking {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        mobile: row.get(4)?,
        address: row.get(5)?,
        message: row.get(6)?,
        start_date: NaiveDate::parse_from_str(&start_date, DATE_FORMAT)
            .with_context(|| format!("bad start_date in store: {start_date}"))?,
        end_date: NaiveDate::parse_from_str(&end_date, DATE_FORMAT)
            .with_context(|| format!("bad end_date in store: {end_date}"))?,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .with_context(|| format!("bad created_at in store: {created_at}"))?
            .with_timezone(&Utc),
    })
}
