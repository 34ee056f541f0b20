//! Maps an instant to the device's answer.
//!
//! The weekday is taken from the UTC calendar date, never local time. Day numbers
//! count from Sunday (0) to Saturday (6).

use chrono::{DateTime, Datelike, Utc, Weekday};

use super::cursor::BUF_LEN;

pub const WEEKEND: &str = "No, but it's still the weekend!\n";
pub const NOPE: &str = "Nope.\n";
pub const FRIDAY: &str = "IT IS!\n";
pub const MISSED_IT: &str = "You just missed it!\n";

/// Every answer the device can give.
pub const MESSAGES: [&str; 4] = [WEEKEND, NOPE, FRIDAY, MISSED_IT];

const fn fits_buffer(messages: &[&str]) -> bool {
    let mut i = 0;
    while i < messages.len() {
        if messages[i].len() > BUF_LEN {
            return false;
        }
        i += 1;
    }
    true
}

const _: () = assert!(fits_buffer(&MESSAGES), "device message exceeds BUF_LEN");

/// The answer for the UTC day containing `now`.
pub fn select(now: DateTime<Utc>) -> &'static str {
    message_for_weekday(now.weekday())
}

pub fn message_for_weekday(day: Weekday) -> &'static str {
    message_for_day_number(day.num_days_from_sunday())
}

/// Anything that isn't Sunday, Friday or Saturday gets a plain "Nope."
pub fn message_for_day_number(day: u32) -> &'static str {
    match day {
        0 => WEEKEND,
        6 => MISSED_IT,
        5 => FRIDAY,
        _ => NOPE,
    }
}
