//! Decoded mouse events.

use crate::domain::cursor::Cursor;
use crate::protocol::codes::{EV_KEY, EV_REL, EV_SYN, KEY_PRESSED, KEY_RELEASED};
use crate::protocol::record::InputRecord;

/// Event family, derived from the record's type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFamily {
    Sync,
    Key,
    Relative,
    Other(u16),
}

impl From<u16> for EventFamily {
    fn from(event_type: u16) -> Self {
        match event_type {
            EV_SYN => EventFamily::Sync,
            EV_KEY => EventFamily::Key,
            EV_REL => EventFamily::Relative,
            other => EventFamily::Other(other),
        }
    }
}

/// State carried by an `EV_KEY` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Released,
    Pressed,
    /// Autorepeat (value 2) or any other non-standard value.
    Repeat,
}

impl From<i32> for ButtonState {
    fn from(value: i32) -> Self {
        match value {
            KEY_RELEASED => ButtonState::Released,
            KEY_PRESSED => ButtonState::Pressed,
            _ => ButtonState::Repeat,
        }
    }
}

/// One record as seen by the caller, with the cursor after it was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub event_type: u16,
    pub event_code: u16,
    pub event_value: i32,
    pub cursor_pos: Cursor,
}

impl MouseEvent {
    pub fn from_record(record: &InputRecord, cursor_pos: Cursor) -> Self {
        Self {
            event_type: record.event_type,
            event_code: record.code,
            event_value: record.value,
            cursor_pos,
        }
    }

    pub fn family(&self) -> EventFamily {
        EventFamily::from(self.event_type)
    }

    /// Button state for key events, `None` for every other family.
    pub fn button_state(&self) -> Option<ButtonState> {
        match self.family() {
            EventFamily::Key => Some(ButtonState::from(self.event_value)),
            _ => None,
        }
    }
}
