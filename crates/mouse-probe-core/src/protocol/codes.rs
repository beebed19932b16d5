//! Event type, axis, and button numbering.
//!
//! Values mirror `linux/input-event-codes.h`.  They are part of the kernel
//! ABI: capability bitmasks returned by `EVIOCGBIT` are indexed by these
//! numbers, and every record's `type`/`code` fields use them.

// ── Event types ───────────────────────────────────────────────────────────────

/// Synchronization markers delimiting one logical report.
pub const EV_SYN: u16 = 0x00;
/// Keys and buttons.
pub const EV_KEY: u16 = 0x01;
/// Relative axes (mouse motion, wheels).
pub const EV_REL: u16 = 0x02;
/// Absolute axes (touchpads, tablets).
pub const EV_ABS: u16 = 0x03;
/// Miscellaneous (scan codes, timestamps).
pub const EV_MSC: u16 = 0x04;
/// Highest event type number.
pub const EV_MAX: u16 = 0x1f;

// ── Synchronization codes ─────────────────────────────────────────────────────

pub const SYN_REPORT: u16 = 0;
pub const SYN_DROPPED: u16 = 3;

// ── Relative axes ─────────────────────────────────────────────────────────────

/// Horizontal motion.
pub const REL_X: u16 = 0x00;
/// Vertical motion.
pub const REL_Y: u16 = 0x01;
pub const REL_WHEEL: u16 = 0x08;
/// Highest relative axis number.
pub const REL_MAX: u16 = 0x0f;

// ── Buttons ───────────────────────────────────────────────────────────────────

pub const BTN_MOUSE: u16 = 0x110;
pub const BTN_LEFT: u16 = 0x110;
pub const BTN_RIGHT: u16 = 0x111;
pub const BTN_MIDDLE: u16 = 0x112;
/// Highest key/button number.
pub const KEY_MAX: u16 = 0x2ff;

/// Buttons whose presence marks a device as a pointer.
pub const POINTER_BUTTONS: [u16; 2] = [BTN_LEFT, BTN_RIGHT];

// ── Key values ────────────────────────────────────────────────────────────────

pub const KEY_RELEASED: i32 = 0;
pub const KEY_PRESSED: i32 = 1;

/// Short human label for an event type, used in logs.
pub fn event_type_name(event_type: u16) -> &'static str {
    match event_type {
        EV_SYN => "EV_SYN",
        EV_KEY => "EV_KEY",
        EV_REL => "EV_REL",
        EV_ABS => "EV_ABS",
        EV_MSC => "EV_MSC",
        _ => "EV_?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_buttons_are_left_and_right() {
        assert_eq!(POINTER_BUTTONS, [0x110, 0x111]);
        assert_eq!(BTN_MOUSE, BTN_LEFT);
    }

    #[test]
    fn test_event_type_name_known_and_unknown() {
        assert_eq!(event_type_name(EV_REL), "EV_REL");
        assert_eq!(event_type_name(EV_KEY), "EV_KEY");
        assert_eq!(event_type_name(0x15), "EV_?");
    }
}
