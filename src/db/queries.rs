use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{AncillarySelection, Booking, BookingStatus, PaymentStatus};

const DT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn now_str() -> String {
    Utc::now().naive_utc().format(DT_FORMAT).to_string()
}

// ── Bookings ──

pub fn create_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<()> {
    let passenger_details = serde_json::to_string(&booking.passenger_details)?;
    let flight_details = serde_json::to_string(&booking.flight_details)?;
    let payment_completed_at = booking
        .payment_completed_at
        .map(|dt| dt.format(DT_FORMAT).to_string());

    conn.execute(
        "INSERT INTO bookings (id, user_id, order_id, booking_reference, total_amount, total_currency,
                               passenger_details, flight_details, status, payment_status,
                               payment_completed_at, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            booking.id,
            booking.user_id,
            booking.order_id,
            booking.booking_reference,
            booking.total_amount,
            booking.total_currency,
            passenger_details,
            flight_details,
            booking.status.as_str(),
            booking.payment_status.as_str(),
            payment_completed_at,
            booking.created_at.format(DT_FORMAT).to_string(),
            booking.updated_at.format(DT_FORMAT).to_string(),
        ],
    )?;
    Ok(())
}

/// Load a booking only if it belongs to `user_id`. Missing and not-owned are
/// indistinguishable to the caller; every mutating endpoint goes through this
/// single query so there is no check-then-use gap.
pub fn get_owned_booking(
    conn: &Connection,
    user_id: &str,
    booking_id: &str,
) -> anyhow::Result<Option<Booking>> {
    let result = conn.query_row(
        "SELECT id, user_id, order_id, booking_reference, total_amount, total_currency,
                passenger_details, flight_details, status, payment_status,
                payment_completed_at, created_at, updated_at
         FROM bookings WHERE id = ?1 AND user_id = ?2",
        params![booking_id, user_id],
        |row| Ok(parse_booking_row(row)),
    );

    match result {
        Ok(booking) => Ok(Some(booking?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_bookings_for_user(conn: &Connection, user_id: &str) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, order_id, booking_reference, total_amount, total_currency,
                passenger_details, flight_details, status, payment_status,
                payment_completed_at, created_at, updated_at
         FROM bookings WHERE user_id = ?1 ORDER BY created_at DESC",
    )?;

    let rows = stmt.query_map(params![user_id], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn mark_booking_paid(
    conn: &Connection,
    user_id: &str,
    booking_id: &str,
) -> anyhow::Result<bool> {
    let now = now_str();
    let count = conn.execute(
        "UPDATE bookings
         SET payment_status = 'paid', status = 'confirmed',
             payment_completed_at = ?1, updated_at = ?1
         WHERE id = ?2 AND user_id = ?3",
        params![now, booking_id, user_id],
    )?;
    Ok(count > 0)
}

pub fn update_booking_totals(
    conn: &Connection,
    user_id: &str,
    booking_id: &str,
    total_amount: &str,
    total_currency: &str,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET total_amount = ?1, total_currency = ?2, updated_at = ?3
         WHERE id = ?4 AND user_id = ?5",
        params![total_amount, total_currency, now_str(), booking_id, user_id],
    )?;
    Ok(count > 0)
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let id: String = row.get(0)?;
    let user_id: String = row.get(1)?;
    let order_id: String = row.get(2)?;
    let booking_reference: String = row.get(3)?;
    let total_amount: String = row.get(4)?;
    let total_currency: String = row.get(5)?;
    let passenger_details_json: String = row.get(6)?;
    let flight_details_json: String = row.get(7)?;
    let status_str: String = row.get(8)?;
    let payment_status_str: String = row.get(9)?;
    let payment_completed_at_str: Option<String> = row.get(10)?;
    let created_at_str: String = row.get(11)?;
    let updated_at_str: String = row.get(12)?;

    let passenger_details =
        serde_json::from_str(&passenger_details_json).unwrap_or(serde_json::Value::Null);
    let flight_details =
        serde_json::from_str(&flight_details_json).unwrap_or(serde_json::Value::Null);

    let payment_completed_at = payment_completed_at_str
        .and_then(|s| NaiveDateTime::parse_from_str(&s, DT_FORMAT).ok());
    let created_at = NaiveDateTime::parse_from_str(&created_at_str, DT_FORMAT)
        .unwrap_or_else(|_| Utc::now().naive_utc());
    let updated_at = NaiveDateTime::parse_from_str(&updated_at_str, DT_FORMAT)
        .unwrap_or_else(|_| Utc::now().naive_utc());

    Ok(Booking {
        id,
        user_id,
        order_id,
        booking_reference,
        total_amount,
        total_currency,
        passenger_details,
        flight_details,
        status: BookingStatus::parse(&status_str),
        payment_status: PaymentStatus::parse(&payment_status_str),
        payment_completed_at,
        created_at,
        updated_at,
    })
}

// ── Ancillary Cart ──

pub fn get_ancillary_selections(
    conn: &Connection,
    user_id: &str,
    offer_id: &str,
) -> anyhow::Result<Option<Vec<AncillarySelection>>> {
    let result = conn.query_row(
        "SELECT selections FROM ancillary_selections WHERE user_id = ?1 AND offer_id = ?2",
        params![user_id, offer_id],
        |row| row.get::<_, String>(0),
    );

    match result {
        Ok(json) => {
            let selections = serde_json::from_str(&json).unwrap_or_default();
            Ok(Some(selections))
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Replaces the whole selection list for the `(user, offer)` pair.
/// Last write wins; there is no merge.
pub fn upsert_ancillary_selections(
    conn: &Connection,
    user_id: &str,
    offer_id: &str,
    selections: &[AncillarySelection],
) -> anyhow::Result<()> {
    let json = serde_json::to_string(selections)?;
    conn.execute(
        "INSERT INTO ancillary_selections (user_id, offer_id, selections, updated_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(user_id, offer_id) DO UPDATE SET
           selections = excluded.selections,
           updated_at = excluded.updated_at",
        params![user_id, offer_id, json, now_str()],
    )?;
    Ok(())
}

pub fn clear_ancillary_selections(
    conn: &Connection,
    user_id: &str,
    offer_id: &str,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "DELETE FROM ancillary_selections WHERE user_id = ?1 AND offer_id = ?2",
        params![user_id, offer_id],
    )?;
    Ok(count > 0)
}

// ── Order Change Requests ──

pub fn create_change_request(
    conn: &Connection,
    id: &str,
    user_id: &str,
    booking_id: &str,
) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO order_change_requests (id, user_id, booking_id, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![id, user_id, booking_id, now_str()],
    )?;
    Ok(())
}

pub fn get_owned_change_request(
    conn: &Connection,
    user_id: &str,
    change_request_id: &str,
) -> anyhow::Result<Option<String>> {
    let result = conn.query_row(
        "SELECT booking_id FROM order_change_requests WHERE id = ?1 AND user_id = ?2",
        params![change_request_id, user_id],
        |row| row.get::<_, String>(0),
    );

    match result {
        Ok(booking_id) => Ok(Some(booking_id)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
