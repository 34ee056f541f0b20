use thiserror::Error;

/// `EBUSY`: device or resource busy.
pub const EBUSY: i32 = 16;
/// `EINVAL`: invalid argument. Returned for writes to a read-only device.
pub const EINVAL: i32 = 22;

/// Errors surfaced by the device hooks.
///
/// These are returned synchronously to the caller of the failing hook and are never
/// logged or retried by the device itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeviceError {
    /// Another session already holds the device open.
    #[error("device or resource busy")]
    Busy,

    /// The device does not accept writes.
    #[error("operation not supported: device is read-only")]
    UnsupportedOperation,
}

impl DeviceError {
    /// POSIX errno a host would hand back to its caller.
    pub fn errno(&self) -> i32 {
        match self {
            DeviceError::Busy => EBUSY,
            DeviceError::UnsupportedOperation => EINVAL,
        }
    }

    /// `Busy` clears once the holder releases; a rejected write never will.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, DeviceError::Busy)
    }
}
