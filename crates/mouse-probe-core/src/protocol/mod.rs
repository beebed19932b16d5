//! Host input-subsystem contract: event numbering, record layout, capability
//! bitmasks.

pub mod capabilities;
pub mod codes;
pub mod record;

pub use capabilities::{CapabilityMask, Classification, DeviceCapabilities};
pub use record::{InputRecord, RecordError, Timestamp, RECORD_SIZE};
