//! Single-holder open lock for the device.
//!
//! The gate is a lock-free lease over one atomic flag. `try_acquire` flips
//! `NotOpen -> Open` with a compare-and-swap and fails with [`DeviceError::Busy`]
//! if someone already holds it. `release` resets the flag unconditionally: there is
//! no ownership token, so any caller may free the device.

use std::sync::atomic::{AtomicBool, Ordering};

use super::error::DeviceError;

const NOT_OPEN: bool = false;
const OPEN: bool = true;

#[derive(Debug, Default)]
pub struct ExclusivityGate {
    state: AtomicBool,
}

impl ExclusivityGate {
    /// A fresh gate always starts out `NotOpen`.
    pub const fn new() -> Self {
        Self {
            state: AtomicBool::new(NOT_OPEN),
        }
    }

    /// Take the device. On failure nothing about the gate changes.
    pub fn try_acquire(&self) -> Result<(), DeviceError> {
        self.state
            .compare_exchange(NOT_OPEN, OPEN, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(|_| DeviceError::Busy)
    }

    pub fn release(&self) {
        self.state.store(NOT_OPEN, Ordering::Release);
    }

    pub fn is_open(&self) -> bool {
        self.state.load(Ordering::Acquire)
    }
}
