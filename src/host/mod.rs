//! # Host Layer
//!
//! Plays the operating system's part for the `isfri` device: it opens the device on
//! behalf of callers, pumps reads until the end-of-message signal, refuses writes, and
//! releases. Logging and metrics live here, never in the device core.
//!
//! - [`server`] - TCP device node: one connection is one open session
//! - [`client`] - probe for a running device node

pub mod client;
pub mod server;

use log::{error, warn};

use crate::device::{DeviceError, FileOperations, OpenFile};
use crate::metrics;

/// Open the device, recording the outcome.
pub fn open_device<D: FileOperations>(dev: &D) -> Result<OpenFile, DeviceError> {
    match dev.open() {
        Ok(file) => {
            metrics::inc_opens();
            Ok(file)
        }
        Err(e) => {
            if e == DeviceError::Busy {
                metrics::inc_busy_rejections();
            }
            warn!("open refused: {}", e);
            Err(e)
        }
    }
}

pub fn release_device<D: FileOperations>(dev: &D, file: OpenFile) -> Result<(), DeviceError> {
    dev.release(file)?;
    metrics::inc_releases();
    Ok(())
}

/// Read one full message cycle, `chunk_size` bytes at a time, until the device signals
/// end of message. The file's offset is back at 0 afterwards.
pub fn read_to_end<D: FileOperations>(
    dev: &D,
    file: &mut OpenFile,
    chunk_size: usize,
) -> Result<Vec<u8>, DeviceError> {
    let mut chunk = vec![0u8; chunk_size.max(1)];
    let mut out = Vec::new();
    loop {
        let n = dev.read(file, &mut chunk)?;
        if n == 0 {
            metrics::inc_cycles_completed();
            break;
        }
        metrics::add_bytes_served(n);
        out.extend_from_slice(&chunk[..n]);
    }
    Ok(out)
}

/// Hand a write to the device. Read-only devices refuse it; the refusal is reported
/// here since the device does not log.
pub fn write_device<D: FileOperations>(
    dev: &D,
    file: &mut OpenFile,
    data: &[u8],
) -> Result<usize, DeviceError> {
    dev.write(file, data).map_err(|e| {
        if e == DeviceError::UnsupportedOperation {
            metrics::inc_write_rejections();
            error!("Sorry, this operation is not supported.");
        }
        e
    })
}
