//! Application layer use cases.
//!
//! - **`locate_device`** – Walks the candidates offered by a [`DeviceProbe`],
//!   keeps the first pointing device, and reports precisely why the scan
//!   failed otherwise.  The probe is injected so the scan can run against
//!   synthetic devices in tests.
//!
//! - **`monitor`** – Owns the winning device for the rest of the run, feeds
//!   it through the decoder, tracks corner clicks, and stops on end of
//!   stream, error, or shutdown.
//!
//! - **`report`** – Formats decoded events as console lines.
//!
//! [`DeviceProbe`]: locate_device::DeviceProbe

pub mod locate_device;
pub mod monitor;
pub mod report;
