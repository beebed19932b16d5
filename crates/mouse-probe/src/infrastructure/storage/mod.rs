//! Storage infrastructure: configuration file loading.
//!
//! The `config` sub-module reads the TOML configuration file from the XDG
//! config directory and fills in defaults for anything the file leaves out.
//! The probe never writes the file; it is operator-maintained.

pub mod config;
