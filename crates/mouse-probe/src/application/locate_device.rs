//! Device Locator: find and open the first pointing device.
//!
//! The scan is written against two traits so it can run over real evdev
//! nodes or over synthetic candidates:
//!
//! - [`DeviceProbe`] lists candidate paths and opens them.
//! - [`InputDevice`] is an open handle that can answer capability queries
//!   and be read from.
//!
//! Handles are owned values.  A candidate that fails the mouse test goes out
//! of scope before the next one is opened, which closes it, so at most one
//! handle is alive at any point of the scan and at most one survives it.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use mouse_probe_core::protocol::codes::{REL_X, REL_Y};
use mouse_probe_core::{Classification, DeviceCapabilities, DeviceText};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Name reported when a device refuses `EVIOCGNAME`.
const UNKNOWN_DEVICE_NAME: &str = "Unknown";

/// An open input device handle.
pub trait InputDevice: Read + Send {
    /// Queries supported event types, relative axes, and keys.
    fn capabilities(&self) -> io::Result<DeviceCapabilities>;

    /// The device's self-reported name as a C string buffer.
    fn raw_name(&self) -> io::Result<Vec<u8>>;

    /// Blocks until a record can be read or `timeout` elapses.  Returns
    /// `false` on timeout.
    fn wait_readable(&self, timeout: Duration) -> io::Result<bool>;

    /// Takes exclusive delivery of the device's events.
    fn grab(&mut self) -> io::Result<()>;
}

/// Source of candidate device nodes.
pub trait DeviceProbe {
    type Device: InputDevice;

    /// Directory (or other location) being scanned, for diagnostics.
    fn location(&self) -> &Path;

    /// Candidate paths in scan order.
    fn candidates(&self) -> io::Result<Vec<PathBuf>>;

    /// Opens one candidate for reading.
    fn open(&self, path: &Path) -> io::Result<Self::Device>;
}

/// Why no device was returned.
#[derive(Debug, Error)]
pub enum LocateError {
    /// At least one candidate (or the directory itself) was refused by the
    /// host's permissions and nothing else matched.
    #[error("permission denied on {path} ({denied} of {probed} candidates refused)")]
    AccessDenied {
        path: PathBuf,
        denied: usize,
        probed: usize,
    },

    /// The directory is missing or holds no event nodes.
    #[error("no input event nodes found in {dir}")]
    NoCandidates { dir: PathBuf },

    /// Candidates exist but none of them is a mouse.
    #[error("no pointing device among {probed} candidates ({unopenable} could not be opened)")]
    NoMatch { probed: usize, unopenable: usize },

    /// Listing the directory failed for a reason other than absence or permissions.
    #[error("failed to enumerate {dir}: {source}")]
    Enumerate {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LocateError {
    /// `true` when running with more privileges could change the outcome.
    pub fn is_access_denied(&self) -> bool {
        matches!(self, LocateError::AccessDenied { .. })
    }
}

/// The scan's winner.  `device` is the only handle left open.
#[derive(Debug)]
pub struct LocatedDevice<D> {
    pub device: D,
    pub path: DeviceText,
    pub name: DeviceText,
    pub capabilities: DeviceCapabilities,
}

/// Failure bookkeeping across one scan.
#[derive(Debug, Default)]
struct ScanTally {
    probed: usize,
    denied: usize,
    unopenable: usize,
    first_denied: Option<PathBuf>,
}

impl ScanTally {
    fn record_denied(&mut self, path: &Path) {
        self.denied += 1;
        if self.first_denied.is_none() {
            self.first_denied = Some(path.to_path_buf());
        }
    }

    fn record_open_failure(&mut self, path: &Path, err: &io::Error) {
        self.unopenable += 1;
        if err.kind() == io::ErrorKind::PermissionDenied {
            warn!("permission denied opening {}", path.display());
            self.record_denied(path);
        } else {
            debug!("skipping {}: {err}", path.display());
        }
    }

    fn record_query_failure(&mut self, path: &Path, err: &io::Error) {
        if err.kind() == io::ErrorKind::PermissionDenied {
            warn!("permission denied querying {}", path.display());
            self.record_denied(path);
        } else {
            debug!("capability query failed on {}: {err}", path.display());
        }
    }

    fn into_error(self) -> LocateError {
        match self.first_denied {
            Some(path) => LocateError::AccessDenied {
                path,
                denied: self.denied,
                probed: self.probed,
            },
            None => LocateError::NoMatch {
                probed: self.probed,
                unopenable: self.unopenable,
            },
        }
    }
}

/// Scans the probe's candidates in order and returns the first mouse.
///
/// # Errors
///
/// - [`LocateError::NoCandidates`] if the location is missing or empty.
/// - [`LocateError::AccessDenied`] if any permission failure was seen and
///   nothing matched.
/// - [`LocateError::NoMatch`] if every candidate was rejected or unopenable
///   for other reasons.
/// - [`LocateError::Enumerate`] if the candidate list could not be read.
///
/// No handle remains open when an error is returned.
pub fn locate_and_open<P: DeviceProbe>(
    probe: &P,
) -> Result<LocatedDevice<P::Device>, LocateError> {
    let dir = probe.location();
    let candidates = match probe.candidates() {
        Ok(candidates) => candidates,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(LocateError::NoCandidates {
                dir: dir.to_path_buf(),
            })
        }
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            return Err(LocateError::AccessDenied {
                path: dir.to_path_buf(),
                denied: 1,
                probed: 0,
            })
        }
        Err(source) => {
            return Err(LocateError::Enumerate {
                dir: dir.to_path_buf(),
                source,
            })
        }
    };

    if candidates.is_empty() {
        return Err(LocateError::NoCandidates {
            dir: dir.to_path_buf(),
        });
    }
    debug!("probing {} candidates in {}", candidates.len(), dir.display());

    let mut tally = ScanTally::default();
    for path in candidates {
        tally.probed += 1;

        let device = match probe.open(&path) {
            Ok(device) => device,
            Err(e) => {
                tally.record_open_failure(&path, &e);
                continue;
            }
        };

        let capabilities = match device.capabilities() {
            Ok(caps) => caps,
            Err(e) => {
                tally.record_query_failure(&path, &e);
                continue;
            }
        };

        match capabilities.classify() {
            Classification::Pointer => {}
            rejected => {
                debug!("{} is not a mouse: {rejected:?}", path.display());
                continue;
            }
        }

        let name = match device.raw_name() {
            Ok(raw) => DeviceText::from_c_bytes(&raw),
            Err(e) => {
                debug!("name query failed on {}: {e}", path.display());
                DeviceText::truncate_from(UNKNOWN_DEVICE_NAME)
            }
        };
        let path = DeviceText::truncate_from(&path.to_string_lossy());
        info!(
            "found mouse {path} ({name}) after {} candidates, REL_X={} REL_Y={}",
            tally.probed,
            capabilities.has_relative_axis(REL_X),
            capabilities.has_relative_axis(REL_Y)
        );

        return Ok(LocatedDevice {
            device,
            path,
            name,
            capabilities,
        });
    }

    Err(tally.into_error())
}
