//! Daily streaks and points
//!
//! A user earns points once per calendar day with at least one record, and the
//! streak counts consecutive such days.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::models::UserState;

/// Points awarded for the first record of a day
pub const POINTS_PER_DAY: u32 = 10;

/// Apply a record made on `today` to the user state
pub fn update(state: &UserState, today: NaiveDate) -> UserState {
    let Some(last) = state.last_record_date else {
        debug!(%today, "First record");
        return UserState {
            points: POINTS_PER_DAY,
            streak: 1,
            last_record_date: Some(today),
        };
    };

    let days = (today - last).num_days();
    let streak = match days {
        0 => return state.clone(),
        1 => state.streak.saturating_add(1),
        d if d < 0 => {
            // Clock skew or a backdated record; restart rather than extend
            warn!(%today, last_record = %last, "Record date is before the last record date");
            1
        }
        _ => 1,
    };

    debug!(%today, days_since_last = days, streak, "Updated streak");

    UserState {
        points: state.points.saturating_add(POINTS_PER_DAY),
        streak,
        last_record_date: Some(today),
    }
}
