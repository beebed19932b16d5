//! Monitor use case: own the located device and stream its events.
//!
//! [`MonitorSession`] is the single owner of the open handle from the moment
//! the locator returns until the session is dropped.  The shutdown path does
//! not close anything behind the session's back: the signal task only clears
//! the shared `running` flag, the loop notices it between reads, returns, and
//! the handle is released when the session goes out of scope.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use mouse_probe_core::protocol::codes::{BTN_LEFT, BTN_RIGHT};
use mouse_probe_core::{
    read_event, ButtonState, Cursor, DeviceText, MouseEvent, ReadOutcome, StreamError,
};
use tracing::{debug, info};

use super::locate_device::{InputDevice, LocatedDevice};
use super::report::{render_corner, render_event};

/// Which corner a button press set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    /// Left button.
    First,
    /// Right button.
    Second,
}

impl Corner {
    /// The corner a left or right button press sets, if any.
    pub fn for_event(event: &MouseEvent) -> Option<Corner> {
        if event.button_state() != Some(ButtonState::Pressed) {
            return None;
        }
        match event.event_code {
            BTN_LEFT => Some(Corner::First),
            BTN_RIGHT => Some(Corner::Second),
            _ => None,
        }
    }
}

/// Cursor positions captured at the last left and right button presses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Corners {
    pub first: Option<Cursor>,
    pub second: Option<Cursor>,
}

impl Corners {
    /// Records the event's cursor if it is a left or right press.
    pub fn observe(&mut self, event: &MouseEvent) -> Option<Corner> {
        let corner = Corner::for_event(event)?;
        let slot = match corner {
            Corner::First => &mut self.first,
            Corner::Second => &mut self.second,
        };
        *slot = Some(event.cursor_pos);
        Some(corner)
    }
}

/// Knobs for [`MonitorSession::run`].
#[derive(Debug, Clone)]
pub struct MonitorOptions {
    /// Print `SYN_REPORT` markers.
    pub show_sync: bool,
    /// How long to wait for input before re-checking the shutdown flag.
    pub poll_interval: Duration,
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self {
            show_sync: false,
            poll_interval: Duration::from_millis(100),
        }
    }
}

/// Why [`MonitorSession::run`] returned.
#[derive(Debug)]
pub enum SessionEnd {
    /// The shutdown flag was cleared.
    Shutdown,
    /// The device reported end of stream.
    StreamEnded,
    /// A read or wait failed.
    StreamFailed(StreamError),
    /// Writing to the console failed (closed pipe).
    OutputFailed(io::Error),
}

/// Totals reported when the session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub events: u64,
    pub cursor: Cursor,
    pub corners: Corners,
}

/// Exclusive owner of the located device for the rest of the run.
pub struct MonitorSession<D> {
    device: D,
    path: DeviceText,
    name: DeviceText,
    cursor: Cursor,
    corners: Corners,
    events: u64,
}

impl<D: InputDevice> MonitorSession<D> {
    /// Takes ownership of the located handle.  The cursor starts at the origin.
    pub fn new(located: LocatedDevice<D>) -> Self {
        info!("monitoring {} ({})", located.path, located.name);
        Self {
            device: located.device,
            path: located.path,
            name: located.name,
            cursor: Cursor::ORIGIN,
            corners: Corners::default(),
            events: 0,
        }
    }

    /// Grabs the device so no other reader sees its events.
    ///
    /// # Errors
    ///
    /// Propagates the `EVIOCGRAB` failure (typically `EBUSY` when another
    /// process already holds the grab).
    pub fn grab(&mut self) -> io::Result<()> {
        self.device.grab()?;
        info!("grabbed {}", self.path);
        Ok(())
    }

    pub fn path(&self) -> &DeviceText {
        &self.path
    }

    pub fn name(&self) -> &DeviceText {
        &self.name
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            events: self.events,
            cursor: self.cursor,
            corners: self.corners,
        }
    }

    /// One decoder call.  Counts produced events and updates corners.
    pub fn step(&mut self) -> ReadOutcome {
        let outcome = read_event(&mut self.device, &mut self.cursor);
        if let ReadOutcome::Produced(event) = &outcome {
            self.events += 1;
            self.corners.observe(event);
        }
        outcome
    }

    /// Reads and prints events until shutdown, end of stream, or failure.
    ///
    /// Interrupted waits and reads are retried while `running` stays set;
    /// every other failure ends the session.
    pub fn run<W: Write>(
        &mut self,
        running: &AtomicBool,
        options: &MonitorOptions,
        out: &mut W,
    ) -> SessionEnd {
        while running.load(Ordering::Relaxed) {
            match self.device.wait_readable(options.poll_interval) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return SessionEnd::StreamFailed(StreamError::Io(e)),
            }

            let event = match self.step() {
                ReadOutcome::Produced(event) => event,
                ReadOutcome::Ended => return SessionEnd::StreamEnded,
                ReadOutcome::Error(StreamError::Interrupted) => continue,
                ReadOutcome::Error(e) => return SessionEnd::StreamFailed(e),
            };

            if let Err(e) = self.emit(&event, options, out) {
                return SessionEnd::OutputFailed(e);
            }
        }
        SessionEnd::Shutdown
    }

    fn emit<W: Write>(
        &self,
        event: &MouseEvent,
        options: &MonitorOptions,
        out: &mut W,
    ) -> io::Result<()> {
        if let Some(line) = render_event(event, options.show_sync) {
            writeln!(out, "{line}")?;
        }
        if let Some(corner) = Corner::for_event(event) {
            writeln!(out, "{}", render_corner(corner, event))?;
        }
        out.flush()
    }
}

impl<D> Drop for MonitorSession<D> {
    fn drop(&mut self) {
        debug!("releasing {}", self.path);
    }
}
