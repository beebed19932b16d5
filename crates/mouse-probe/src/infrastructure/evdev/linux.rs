//! Linux evdev adapter.
//!
//! Candidates are the `event<N>` character devices under the input directory
//! (normally `/dev/input`).  Each one is opened with [`evdev::Device::open`],
//! which queries the device's name and capability bitmasks up front; the
//! adapter translates those into [`DeviceCapabilities`] for the locator.
//!
//! Event records are not read through `evdev`'s own event API: the monitor
//! reads raw `input_event` records from the same descriptor and decodes them
//! with [`mouse_probe_core::read_event`].
//!
//! # Permissions
//!
//! Event nodes are usually `root:input 0660`.  Without membership in the
//! `input` group every `open` fails with `EACCES`, which the locator turns
//! into an access-denied diagnosis rather than "no mouse found".

use std::fs;
use std::io::{self, Read};
use std::os::fd::AsRawFd;
use std::path::{Path, PathBuf};
use std::time::Duration;

use evdev::Device;
use mouse_probe_core::DeviceCapabilities;

use super::order_candidates;
use crate::application::locate_device::{DeviceProbe, InputDevice};
use crate::infrastructure::storage::config::ScanConfig;

// ── Probe ─────────────────────────────────────────────────────────────────────

/// Scans a directory of evdev nodes.
#[derive(Debug, Clone)]
pub struct EvdevProbe {
    dir: PathBuf,
    prefix: String,
    max_candidates: usize,
}

impl EvdevProbe {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>, max_candidates: usize) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            max_candidates,
        }
    }

    pub fn from_config(scan: &ScanConfig) -> Self {
        Self::new(&scan.input_dir, &scan.node_prefix, scan.max_candidates)
    }
}

impl DeviceProbe for EvdevProbe {
    type Device = EvdevDevice;

    fn location(&self) -> &Path {
        &self.dir
    }

    fn candidates(&self) -> io::Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            paths.push(entry?.path());
        }
        Ok(order_candidates(paths, &self.prefix, self.max_candidates))
    }

    /// Opens the node and runs the evdev capability queries.  A node that is
    /// not an evdev device fails here with `ENOTTY`.
    fn open(&self, path: &Path) -> io::Result<EvdevDevice> {
        Ok(EvdevDevice {
            device: Device::open(path)?,
        })
    }
}

// ── Device ────────────────────────────────────────────────────────────────────

/// An open evdev node.  Closing happens when the value is dropped.
pub struct EvdevDevice {
    device: Device,
}

impl std::fmt::Debug for EvdevDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvdevDevice")
            .field("name", &self.device.name())
            .field("fd", &self.device.as_raw_fd())
            .finish()
    }
}

impl Read for EvdevDevice {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        // SAFETY: `buf` is valid for writes of `buf.len()` bytes and the
        // descriptor stays open for as long as `self.device` lives.
        let rc = unsafe {
            libc::read(
                self.device.as_raw_fd(),
                buf.as_mut_ptr().cast::<libc::c_void>(),
                buf.len(),
            )
        };
        if rc < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(rc as usize)
    }
}

impl InputDevice for EvdevDevice {
    fn capabilities(&self) -> io::Result<DeviceCapabilities> {
        let event_types = self.device.supported_events().iter().map(|t| t.0);
        let relative_axes = self
            .device
            .supported_relative_axes()
            .map(|axes| axes.iter().map(|a| a.0).collect::<Vec<_>>())
            .unwrap_or_default();
        let keys = self
            .device
            .supported_keys()
            .map(|keys| keys.iter().map(|k| k.code()).collect::<Vec<_>>())
            .unwrap_or_default();
        Ok(DeviceCapabilities::from_codes(event_types, relative_axes, keys))
    }

    fn raw_name(&self) -> io::Result<Vec<u8>> {
        self.device
            .name()
            .map(|name| name.as_bytes().to_vec())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "device reports no name"))
    }

    fn wait_readable(&self, timeout: Duration) -> io::Result<bool> {
        let mut pfd = libc::pollfd {
            fd: self.device.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        };
        let timeout_ms = libc::c_int::try_from(timeout.as_millis()).unwrap_or(libc::c_int::MAX);
        // SAFETY: `pfd` is a single valid pollfd for the duration of the call.
        let rc = unsafe { libc::poll(&mut pfd, 1, timeout_ms) };
        if rc < 0 {
            return Err(io::Error::last_os_error());
        }
        // POLLERR/POLLHUP also count as readable: the following read reports
        // the actual error (ENODEV after unplug).
        Ok(rc > 0)
    }

    fn grab(&mut self) -> io::Result<()> {
        self.device.grab()
    }
}
