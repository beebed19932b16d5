//! Domain values: the virtual cursor, decoded events, and bounded identity
//! text.  No I/O happens here.

pub mod bounded;
pub mod cursor;
pub mod event;
