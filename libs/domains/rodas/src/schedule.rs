//! Wall-clock date and start time of a roda.
//!
//! Both values are assembled from their components and stored without a
//! time zone, so the calendar day never shifts with the server offset.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{RodaError, RodaResult};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Parse `YYYY-MM-DD`.
pub fn parse_date(raw: &str) -> RodaResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| RodaError::Validation(format!("Data inválida: '{raw}' (use AAAA-MM-DD)")))
}

/// Parse `HH:mm`.
pub fn parse_time(raw: &str) -> RodaResult<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), TIME_FORMAT)
        .map_err(|_| RodaError::Validation(format!("Horário inválido: '{raw}' (use HH:mm)")))
}

/// The roda date and its start time on that same date.
pub fn assemble(date: &str, start_time: &str) -> RodaResult<(NaiveDate, NaiveDateTime)> {
    let date = parse_date(date)?;
    let time = parse_time(start_time)?;
    Ok((date, date.and_time(time)))
}
