use std::sync::Arc;

use log::trace;

use super::clock::{Clock, SystemClock};
use super::cursor::StreamCursor;
use super::error::DeviceError;
use super::gate::ExclusivityGate;
use super::FileOperations;

/// The host's record of one open session on the device.
///
/// Holds the read offset and the session's message buffer. Dropping an `OpenFile`
/// that was never passed to [`FileOperations::release`] frees the device, the same
/// way a host closes descriptors left open by an exiting process.
#[derive(Debug)]
pub struct OpenFile {
    pos: usize,
    cursor: StreamCursor,
    gate: Arc<ExclusivityGate>,
    released: bool,
}

impl OpenFile {
    fn new(gate: Arc<ExclusivityGate>) -> Self {
        Self {
            pos: 0,
            cursor: StreamCursor::new(),
            gate,
            released: false,
        }
    }

    /// Current read offset.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Move the read offset, as a host would for `pread`/`lseek`.
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Message text rendered by the last read on this session.
    pub fn rendered(&self) -> &[u8] {
        self.cursor.buffer().as_bytes()
    }
}

impl Drop for OpenFile {
    fn drop(&mut self) {
        if !self.released {
            trace!("open file dropped without release; freeing device");
            self.gate.release();
        }
    }
}

/// The `isfri` device: open/read/release hooks over a single-holder gate.
///
/// ```
/// use isfri::device::{DeviceEndpoint, FileOperations};
///
/// let dev = DeviceEndpoint::new();
/// let mut file = dev.open().unwrap();
/// let mut buf = [0u8; 80];
/// let n = dev.read(&mut file, &mut buf).unwrap();
/// assert!(buf[..n].ends_with(b"\n"));
/// dev.release(file).unwrap();
/// ```
#[derive(Debug)]
pub struct DeviceEndpoint<C: Clock = SystemClock> {
    gate: Arc<ExclusivityGate>,
    clock: C,
}

impl DeviceEndpoint<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for DeviceEndpoint<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> DeviceEndpoint<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            gate: Arc::new(ExclusivityGate::new()),
            clock,
        }
    }

    pub fn is_open(&self) -> bool {
        self.gate.is_open()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

impl<C: Clock> FileOperations for DeviceEndpoint<C> {
    fn open(&self) -> Result<OpenFile, DeviceError> {
        self.gate.try_acquire()?;
        trace!("device opened");
        Ok(OpenFile::new(self.gate.clone()))
    }

    fn read(&self, file: &mut OpenFile, buf: &mut [u8]) -> Result<usize, DeviceError> {
        let now = self.clock.now();
        let OpenFile { pos, cursor, .. } = file;
        Ok(cursor.read(now, pos, buf))
    }

    fn release(&self, mut file: OpenFile) -> Result<(), DeviceError> {
        file.released = true;
        self.gate.release();
        trace!("device released");
        Ok(())
    }
}
