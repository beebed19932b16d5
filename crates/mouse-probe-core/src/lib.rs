//! # mouse-probe-core
//!
//! Platform-neutral half of mouse-probe: the Linux `input_event` record
//! codec, the event-type / axis / button numbering used by capability
//! queries, and the cursor tracker that turns a stream of records into
//! running coordinates.
//!
//! Nothing in here opens a device.  The decoder works on any
//! [`std::io::Read`], so tests can feed it an in-memory byte buffer and the
//! binary crate can feed it an open evdev node.
//!
//! - **`protocol`** – Fixed numbering from `linux/input-event-codes.h`, the
//!   native record layout, and the capability bitmask types.
//! - **`domain`** – `Cursor`, `MouseEvent`, and `BoundedText`.
//! - **`decoder`** – [`read_event`]: one blocking read, one tagged outcome.

pub mod decoder;
pub mod domain;
pub mod protocol;

pub use decoder::{read_event, ReadOutcome, StreamError};
pub use domain::bounded::{BoundedText, DeviceText, MAX_PATH_LEN};
pub use domain::cursor::Cursor;
pub use domain::event::{ButtonState, EventFamily, MouseEvent};
pub use protocol::capabilities::{Classification, DeviceCapabilities};
pub use protocol::record::{InputRecord, RecordError, RECORD_SIZE};
