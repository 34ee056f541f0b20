//! # Device Core
//!
//! The `isfri` device answers one question: is it Friday yet (in UTC)?
//!
//! ## Components
//!
//! - [`selector`] - maps the current instant to the answer text
//! - [`gate`] - single-holder open lock
//! - [`cursor`] - offset-addressed chunked read protocol
//! - [`endpoint`] - the open/read/write/release hooks wired together
//! - [`clock`] - wall-clock sources (real and simulated)
//!
//! ## Lifecycle
//!
//! ```text
//! open()    -> gate.try_acquire()          (Busy if already held)
//! read()*   -> selector(now) -> cursor copy (0 bytes = end of message, offset reset)
//! write()   -> UnsupportedOperation        (always)
//! release() -> gate.release()              (always succeeds)
//! ```
//!
//! The device never logs or retries its own errors; that is left to whoever hosts it.

pub mod clock;
pub mod cursor;
pub mod endpoint;
pub mod error;
pub mod gate;
pub mod selector;

pub use clock::{Clock, FixedClock, SystemClock};
pub use cursor::{MessageBuffer, StreamCursor, BUF_LEN};
pub use endpoint::{DeviceEndpoint, OpenFile};
pub use error::DeviceError;
pub use gate::ExclusivityGate;

/// Name the device registers under.
pub const DEVICE_NAME: &str = "isfri";

/// Permission bits of the device node: readable and writable by everyone. Writes are
/// still refused by the device itself.
pub const DEVICE_MODE: u32 = 0o666;

/// Hooks a host calls on a byte-stream device.
///
/// Read-only devices leave `write` alone: the provided body refuses every write with
/// [`DeviceError::UnsupportedOperation`].
pub trait FileOperations {
    fn open(&self) -> Result<OpenFile, DeviceError>;

    fn read(&self, file: &mut OpenFile, buf: &mut [u8]) -> Result<usize, DeviceError>;

    fn write(&self, _file: &mut OpenFile, _buf: &[u8]) -> Result<usize, DeviceError> {
        Err(DeviceError::UnsupportedOperation)
    }

    fn release(&self, file: OpenFile) -> Result<(), DeviceError>;
}
