//! Test utilities: devices pinned to a known day.

use chrono::{DateTime, TimeZone, Utc};
use isfri::device::{DeviceEndpoint, FixedClock};

/// Noon UTC on the given day of September 2023. The 11th was a Monday, the 15th a
/// Friday and the 17th a Sunday.
pub fn september_2023(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 9, day, 12, 0, 0).unwrap()
}

pub fn device_on(day: u32) -> DeviceEndpoint<FixedClock> {
    DeviceEndpoint::with_clock(FixedClock::new(september_2023(day)))
}

#[allow(dead_code)] // Not every test binary reads through a loop.
pub fn friday() -> DeviceEndpoint<FixedClock> {
    device_on(15)
}

#[allow(dead_code)]
pub fn sunday() -> DeviceEndpoint<FixedClock> {
    device_on(17)
}
