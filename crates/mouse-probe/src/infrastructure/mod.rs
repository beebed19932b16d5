//! Infrastructure layer.
//!
//! Contains OS-facing adapters: the evdev device probe and the TOML
//! configuration store.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `mouse_probe_core`, but MUST NOT be imported by the `application` layer.
//!
//! # Sub-modules
//!
//! - **`evdev`** – `DeviceProbe`/`InputDevice` implementations.  The Linux
//!   adapter opens `/dev/input/event*` with the `evdev` crate and reads raw
//!   records with `poll`/`read` on the same descriptor; the
//!   mock adapter serves synthetic devices from memory for tests.
//!
//! - **`storage`** – Reads `config.toml` from the XDG config directory.

pub mod evdev;
pub mod storage;
