//! mouse-probe library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does mouse-probe do?
//!
//! 1. Scans `/dev/input/event*` in numeric order and opens the first node
//!    whose capability bitmasks describe a mouse (relative motion plus a
//!    left or right button).  Every rejected node is closed before moving on.
//! 2. Reads that node one `input_event` record at a time, keeping a virtual
//!    cursor that accumulates `REL_X`/`REL_Y` deltas.
//! 3. Prints each event with the cursor position after it, until the stream
//!    ends, a read fails, or the operator presses Ctrl-C.

/// Application layer: the locator and monitor use cases.
pub mod application;

/// Infrastructure layer: evdev adapter, synthetic devices, config storage.
pub mod infrastructure;
