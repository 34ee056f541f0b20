//! Process-wide counters of what hosts have done with the device.
//!
//! Only the host layer records here; the device core stays silent.
use std::sync::atomic::{AtomicU64, Ordering};

static OPENS: AtomicU64 = AtomicU64::new(0);
static BUSY_REJECTIONS: AtomicU64 = AtomicU64::new(0);
static RELEASES: AtomicU64 = AtomicU64::new(0);
static WRITE_REJECTIONS: AtomicU64 = AtomicU64::new(0);
static BYTES_SERVED: AtomicU64 = AtomicU64::new(0);
static CYCLES_COMPLETED: AtomicU64 = AtomicU64::new(0);

pub fn inc_opens() {
    OPENS.fetch_add(1, Ordering::Relaxed);
}

pub fn inc_busy_rejections() {
    BUSY_REJECTIONS.fetch_add(1, Ordering::Relaxed);
}

pub fn inc_releases() {
    RELEASES.fetch_add(1, Ordering::Relaxed);
}

pub fn inc_write_rejections() {
    WRITE_REJECTIONS.fetch_add(1, Ordering::Relaxed);
}

pub fn add_bytes_served(n: usize) {
    BYTES_SERVED.fetch_add(n as u64, Ordering::Relaxed);
}

/// A read cycle ended with the zero-byte end-of-message signal.
pub fn inc_cycles_completed() {
    CYCLES_COMPLETED.fetch_add(1, Ordering::Relaxed);
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub opens: u64,
    pub busy_rejections: u64,
    pub releases: u64,
    pub write_rejections: u64,
    pub bytes_served: u64,
    pub cycles_completed: u64,
}

impl Snapshot {
    /// Sessions opened but not yet released.
    pub fn active_sessions(&self) -> u64 {
        self.opens.saturating_sub(self.releases)
    }
}

pub fn snapshot() -> Snapshot {
    Snapshot {
        opens: OPENS.load(Ordering::Relaxed),
        busy_rejections: BUSY_REJECTIONS.load(Ordering::Relaxed),
        releases: RELEASES.load(Ordering::Relaxed),
        write_rejections: WRITE_REJECTIONS.load(Ordering::Relaxed),
        bytes_served: BYTES_SERVED.load(Ordering::Relaxed),
        cycles_completed: CYCLES_COMPLETED.load(Ordering::Relaxed),
    }
}
