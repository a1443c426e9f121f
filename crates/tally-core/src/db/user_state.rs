//! Gamification state row

use chrono::NaiveDate;
use rusqlite::{params, Connection};

use crate::error::{Error, Result};
use crate::models::UserState;

pub(super) fn get(conn: &Connection) -> Result<UserState> {
    let (points, streak, last): (u32, u32, Option<String>) = conn.query_row(
        "SELECT points, streak, last_record_date FROM user_state WHERE id = 1",
        [],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
    )?;

    let last_record_date = last
        .map(|s| {
            NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .map_err(|e| Error::InvalidData(format!("Bad last_record_date '{}': {}", s, e)))
        })
        .transpose()?;

    Ok(UserState {
        points,
        streak,
        last_record_date,
    })
}

pub(super) fn set(conn: &Connection, state: &UserState) -> Result<()> {
    conn.execute(
        "UPDATE user_state SET points = ?, streak = ?, last_record_date = ? WHERE id = 1",
        params![
            state.points,
            state.streak,
            state.last_record_date.map(|d| d.to_string()),
        ],
    )?;
    Ok(())
}
