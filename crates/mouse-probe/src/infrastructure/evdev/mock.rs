//! Synthetic device probe for tests.
//!
//! # Why a mock probe?
//!
//! The real probe needs `/dev/input` nodes, the right group membership, and
//! physical hardware.  `MockProbe` serves a list of [`MockCandidate`]s from
//! memory instead: each one can refuse to open, refuse capability queries,
//! advertise any capability set, and replay any byte stream.
//!
//! # Leak tracking
//!
//! Every [`MockDevice`] handed out increments a shared counter and
//! decrements it on drop.  [`MockProbe::open_handles`] therefore reports how
//! many handles are still alive, which is how tests prove that rejected
//! candidates were closed.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use std::time::Duration;

use mouse_probe_core::protocol::codes::{BTN_LEFT, EV_KEY, EV_MSC, EV_REL, EV_SYN, REL_X, REL_Y};
use mouse_probe_core::{DeviceCapabilities, InputRecord};

use crate::application::locate_device::{DeviceProbe, InputDevice};

/// One synthetic device node.
#[derive(Debug, Clone)]
pub struct MockCandidate {
    pub path: PathBuf,
    /// When set, `open` fails with this kind.
    pub open_error: Option<io::ErrorKind>,
    /// When set, `capabilities` fails with this kind.
    pub query_error: Option<io::ErrorKind>,
    pub capabilities: DeviceCapabilities,
    /// Name as the kernel would return it (may lack a NUL).
    pub name: Vec<u8>,
    /// Bytes returned by `read`.
    pub stream: Vec<u8>,
    /// When set, reading past the end of `stream` fails with this kind
    /// instead of returning end of stream.
    pub end_error: Option<io::ErrorKind>,
    /// `(n, kind)`: the `n`-th `read` call (0-based) fails with `kind` and
    /// consumes no bytes.
    pub read_errors: Vec<(usize, io::ErrorKind)>,
    /// `(n, kind)`: the `n`-th `wait_readable` call (0-based) fails with `kind`.
    pub wait_errors: Vec<(usize, io::ErrorKind)>,
}

impl MockCandidate {
    fn base(path: impl Into<PathBuf>, capabilities: DeviceCapabilities, name: &str) -> Self {
        Self {
            path: path.into(),
            open_error: None,
            query_error: None,
            capabilities,
            name: name.as_bytes().to_vec(),
            stream: Vec::new(),
            end_error: None,
            read_errors: Vec::new(),
            wait_errors: Vec::new(),
        }
    }

    /// A two-button relative mouse.
    pub fn mouse(path: impl Into<PathBuf>, name: &str) -> Self {
        Self::base(path, DeviceCapabilities::standard_mouse(), name)
    }

    /// A keyboard: keys and scan codes, no relative motion.
    pub fn keyboard(path: impl Into<PathBuf>) -> Self {
        let caps = DeviceCapabilities::from_codes([EV_SYN, EV_KEY, EV_MSC], [], [1, 28, 30, 57]);
        Self::base(path, caps, "AT Translated Set 2 keyboard")
    }

    /// Relative axes without any button, like a standalone scroll ring.
    pub fn axis_sensor(path: impl Into<PathBuf>) -> Self {
        let caps = DeviceCapabilities::from_codes([EV_SYN, EV_REL], [REL_X, REL_Y], []);
        Self::base(path, caps, "Motion Sensor")
    }

    /// Buttons without relative motion, like a power button device.
    pub fn buttons_only(path: impl Into<PathBuf>) -> Self {
        let caps = DeviceCapabilities::from_codes([EV_SYN, EV_KEY], [], [BTN_LEFT]);
        Self::base(path, caps, "Button Box")
    }

    /// A node whose `open` fails with `EACCES`.
    pub fn denied(path: impl Into<PathBuf>) -> Self {
        Self::mouse(path, "Locked Mouse").with_open_error(io::ErrorKind::PermissionDenied)
    }

    pub fn with_open_error(mut self, kind: io::ErrorKind) -> Self {
        self.open_error = Some(kind);
        self
    }

    pub fn with_query_error(mut self, kind: io::ErrorKind) -> Self {
        self.query_error = Some(kind);
        self
    }

    pub fn with_name_bytes(mut self, name: Vec<u8>) -> Self {
        self.name = name;
        self
    }

    pub fn with_records(mut self, records: &[InputRecord]) -> Self {
        self.stream = records.iter().flat_map(|r| r.encode()).collect();
        self
    }

    pub fn with_stream_bytes(mut self, bytes: Vec<u8>) -> Self {
        self.stream = bytes;
        self
    }

    pub fn with_end_error(mut self, kind: io::ErrorKind) -> Self {
        self.end_error = Some(kind);
        self
    }

    pub fn with_read_error_at(mut self, call: usize, kind: io::ErrorKind) -> Self {
        self.read_errors.push((call, kind));
        self
    }

    pub fn with_wait_error_at(mut self, call: usize, kind: io::ErrorKind) -> Self {
        self.wait_errors.push((call, kind));
        self
    }
}

/// In-memory [`DeviceProbe`].
pub struct MockProbe {
    dir: PathBuf,
    candidates: Vec<MockCandidate>,
    listing_error: Option<io::ErrorKind>,
    live: Arc<AtomicUsize>,
    open_attempts: Mutex<Vec<PathBuf>>,
}

impl MockProbe {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            candidates: Vec::new(),
            listing_error: None,
            live: Arc::new(AtomicUsize::new(0)),
            open_attempts: Mutex::new(Vec::new()),
        }
    }

    /// Appends a candidate; candidates are offered in insertion order.
    pub fn with_candidate(mut self, candidate: MockCandidate) -> Self {
        self.candidates.push(candidate);
        self
    }

    /// Makes `candidates()` fail with `kind`.
    pub fn with_listing_error(mut self, kind: io::ErrorKind) -> Self {
        self.listing_error = Some(kind);
        self
    }

    /// Number of handles currently alive.
    pub fn open_handles(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Every path `open` was called with, in order.
    pub fn open_attempts(&self) -> Vec<PathBuf> {
        self.open_attempts.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl DeviceProbe for MockProbe {
    type Device = MockDevice;

    fn location(&self) -> &Path {
        &self.dir
    }

    fn candidates(&self) -> io::Result<Vec<PathBuf>> {
        if let Some(kind) = self.listing_error {
            return Err(io::Error::from(kind));
        }
        Ok(self.candidates.iter().map(|c| c.path.clone()).collect())
    }

    fn open(&self, path: &Path) -> io::Result<MockDevice> {
        self.open_attempts.lock().unwrap_or_else(|e| e.into_inner()).push(path.to_path_buf());
        let candidate = self
            .candidates
            .iter()
            .find(|c| c.path == path)
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?;
        if let Some(kind) = candidate.open_error {
            return Err(io::Error::from(kind));
        }
        Ok(MockDevice::new(candidate.clone(), Arc::clone(&self.live)))
    }
}

/// An open synthetic device.
#[derive(Debug)]
pub struct MockDevice {
    candidate: MockCandidate,
    stream: io::Cursor<Vec<u8>>,
    live: Arc<AtomicUsize>,
    grabbed: bool,
    reads: usize,
    waits: AtomicUsize,
}

impl MockDevice {
    fn new(candidate: MockCandidate, live: Arc<AtomicUsize>) -> Self {
        live.fetch_add(1, Ordering::SeqCst);
        Self {
            stream: io::Cursor::new(candidate.stream.clone()),
            candidate,
            live,
            grabbed: false,
            reads: 0,
            waits: AtomicUsize::new(0),
        }
    }

    pub fn is_grabbed(&self) -> bool {
        self.grabbed
    }
}

impl Drop for MockDevice {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Read for MockDevice {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let call = self.reads;
        self.reads += 1;
        if let Some(kind) = injected(&self.candidate.read_errors, call) {
            return Err(io::Error::from(kind));
        }
        let n = self.stream.read(buf)?;
        match (n, self.candidate.end_error) {
            (0, Some(kind)) if !buf.is_empty() => Err(io::Error::from(kind)),
            _ => Ok(n),
        }
    }
}

impl InputDevice for MockDevice {
    fn capabilities(&self) -> io::Result<DeviceCapabilities> {
        match self.candidate.query_error {
            Some(kind) => Err(io::Error::from(kind)),
            None => Ok(self.candidate.capabilities.clone()),
        }
    }

    fn raw_name(&self) -> io::Result<Vec<u8>> {
        Ok(self.candidate.name.clone())
    }

    fn wait_readable(&self, _timeout: Duration) -> io::Result<bool> {
        let call = self.waits.fetch_add(1, Ordering::SeqCst);
        match injected(&self.candidate.wait_errors, call) {
            Some(kind) => Err(io::Error::from(kind)),
            None => Ok(true),
        }
    }

    fn grab(&mut self) -> io::Result<()> {
        if self.grabbed {
            return Err(io::Error::new(io::ErrorKind::Other, "device already grabbed"));
        }
        self.grabbed = true;
        Ok(())
    }
}

fn injected(errors: &[(usize, io::ErrorKind)], call: usize) -> Option<io::ErrorKind> {
    errors.iter().find(|(n, _)| *n == call).map(|(_, kind)| *kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_and_drop_track_live_handles() {
        // Arrange
        let probe = MockProbe::new("/mock/input")
            .with_candidate(MockCandidate::mouse("/mock/input/event0", "m"));

        // Act
        let device = probe.open(Path::new("/mock/input/event0")).expect("open succeeds");

        // Assert
        assert_eq!(probe.open_handles(), 1);
        drop(device);
        assert_eq!(probe.open_handles(), 0);
    }

    #[test]
    fn test_open_error_does_not_count_as_live() {
        let probe = MockProbe::new("/mock/input")
            .with_candidate(MockCandidate::denied("/mock/input/event0"));

        let err = probe.open(Path::new("/mock/input/event0")).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
        assert_eq!(probe.open_handles(), 0);
    }

    #[test]
    fn test_unknown_path_is_not_found() {
        let probe = MockProbe::new("/mock/input");

        let err = probe.open(Path::new("/mock/input/event9")).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert_eq!(probe.open_attempts(), vec![PathBuf::from("/mock/input/event9")]);
    }

    #[test]
    fn test_stream_replays_then_ends_or_fails() {
        let record = InputRecord::new(EV_REL, REL_X, 1);
        let probe = MockProbe::new("/mock/input").with_candidate(
            MockCandidate::mouse("/mock/input/event0", "m")
                .with_records(&[record])
                .with_end_error(io::ErrorKind::BrokenPipe),
        );
        let mut device = probe.open(Path::new("/mock/input/event0")).unwrap();
        let mut buf = vec![0u8; mouse_probe_core::RECORD_SIZE];

        assert_eq!(device.read(&mut buf).unwrap(), buf.len());
        assert_eq!(device.read(&mut buf).unwrap_err().kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_read_error_injected_mid_stream_consumes_nothing() {
        let records = [InputRecord::new(EV_REL, REL_X, 1), InputRecord::new(EV_REL, REL_Y, 2)];
        let probe = MockProbe::new("/mock/input").with_candidate(
            MockCandidate::mouse("/mock/input/event0", "m")
                .with_records(&records)
                .with_read_error_at(1, io::ErrorKind::Interrupted),
        );
        let mut device = probe.open(Path::new("/mock/input/event0")).unwrap();
        let mut buf = vec![0u8; mouse_probe_core::RECORD_SIZE];

        assert_eq!(device.read(&mut buf).unwrap(), buf.len());
        assert_eq!(device.read(&mut buf).unwrap_err().kind(), io::ErrorKind::Interrupted);
        assert_eq!(device.read(&mut buf).unwrap(), buf.len());
        assert_eq!(InputRecord::decode(&buf).unwrap(), records[1]);
        assert_eq!(device.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_wait_error_injected_once() {
        let probe = MockProbe::new("/mock/input").with_candidate(
            MockCandidate::mouse("/mock/input/event0", "m")
                .with_wait_error_at(0, io::ErrorKind::Interrupted),
        );
        let device = probe.open(Path::new("/mock/input/event0")).unwrap();

        let first = device.wait_readable(Duration::from_millis(1));
        let second = device.wait_readable(Duration::from_millis(1));

        assert_eq!(first.unwrap_err().kind(), io::ErrorKind::Interrupted);
        assert!(second.unwrap());
    }

    #[test]
    fn test_second_grab_is_busy() {
        let probe = MockProbe::new("/mock/input")
            .with_candidate(MockCandidate::mouse("/mock/input/event0", "m"));
        let mut device = probe.open(Path::new("/mock/input/event0")).unwrap();

        device.grab().expect("first grab succeeds");

        assert!(device.is_grabbed());
        assert_eq!(device.grab().unwrap_err().kind(), io::ErrorKind::Other);
    }

    #[test]
    fn test_canned_devices_classify_as_expected() {
        assert!(MockCandidate::mouse("/a", "m").capabilities.is_pointing_device());
        assert!(!MockCandidate::keyboard("/a").capabilities.is_pointing_device());
        assert!(!MockCandidate::axis_sensor("/a").capabilities.is_pointing_device());
        assert!(!MockCandidate::buttons_only("/a").capabilities.is_pointing_device());
    }
}
