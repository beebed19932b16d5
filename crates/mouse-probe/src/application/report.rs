//! Console rendering of decoded events.

use mouse_probe_core::protocol::codes::SYN_REPORT;
use mouse_probe_core::{ButtonState, EventFamily, MouseEvent};

use super::monitor::{Corner, SessionSummary};

fn state_label(state: ButtonState) -> &'static str {
    match state {
        ButtonState::Pressed => "PRESSED",
        ButtonState::Released => "RELEASED",
        ButtonState::Repeat => "REPEAT",
    }
}

/// Formats one event, or `None` if it is hidden.
///
/// `SYN_REPORT` markers arrive after every report and are hidden unless
/// `show_sync` is set.  Other sync codes (notably `SYN_DROPPED`) are always
/// shown because they mean the kernel buffer overflowed.
pub fn render_event(event: &MouseEvent, show_sync: bool) -> Option<String> {
    let fields = format!(
        "type:{} | code:{:<5} | value:{:<5}",
        event.event_type, event.event_code, event.event_value
    );
    let line = match event.family() {
        EventFamily::Relative => format!("[MOTION] {fields} | cursor: {}", event.cursor_pos),
        EventFamily::Key => {
            let state = state_label(ButtonState::from(event.event_value));
            format!("[BUTTON] {fields} ({state})")
        }
        EventFamily::Sync if event.event_code == SYN_REPORT && !show_sync => return None,
        EventFamily::Sync => format!("[SYNC]   {fields}"),
        EventFamily::Other(_) => format!("[OTHER]  {fields}"),
    };
    Some(line)
}

/// Formats a corner update.
pub fn render_corner(corner: Corner, event: &MouseEvent) -> String {
    let (index, button) = match corner {
        Corner::First => (1, "left"),
        Corner::Second => (2, "right"),
    };
    format!("         corner {index} ({button}) at {}", event.cursor_pos)
}

/// Formats the end-of-run summary.
pub fn render_summary(summary: &SessionSummary) -> String {
    let corner = |c: Option<mouse_probe_core::Cursor>| {
        c.map_or_else(|| "unset".to_string(), |p| p.to_string())
    };
    format!(
        "{} events, final cursor {}, corner 1 {}, corner 2 {}",
        summary.events,
        summary.cursor,
        corner(summary.corners.first),
        corner(summary.corners.second)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use mouse_probe_core::protocol::codes::{
        BTN_LEFT, BTN_RIGHT, EV_KEY, EV_MSC, EV_REL, EV_SYN, REL_X, SYN_DROPPED,
    };
    use mouse_probe_core::{Cursor, InputRecord};

    use crate::application::monitor::Corners;

    fn event(event_type: u16, code: u16, value: i32, cursor: Cursor) -> MouseEvent {
        MouseEvent::from_record(&InputRecord::new(event_type, code, value), cursor)
    }

    #[test]
    fn test_motion_line_includes_cursor() {
        let line = render_event(&event(EV_REL, REL_X, 5, Cursor::new(5, 0)), false)
            .expect("motion is shown");

        assert!(line.starts_with("[MOTION]"));
        assert!(line.contains("type:2"));
        assert!(line.ends_with("cursor: (5, 0)"));
    }

    #[test]
    fn test_button_line_labels_state() {
        let press = render_event(&event(EV_KEY, BTN_LEFT, 1, Cursor::ORIGIN), false).unwrap();
        let release = render_event(&event(EV_KEY, BTN_RIGHT, 0, Cursor::ORIGIN), false).unwrap();
        let repeat = render_event(&event(EV_KEY, BTN_LEFT, 2, Cursor::ORIGIN), false).unwrap();

        assert!(press.contains("code:272") && press.ends_with("(PRESSED)"));
        assert!(release.contains("code:273") && release.ends_with("(RELEASED)"));
        assert!(repeat.ends_with("(REPEAT)"));
    }

    #[test]
    fn test_sync_report_hidden_unless_requested() {
        let sync = event(EV_SYN, SYN_REPORT, 0, Cursor::ORIGIN);

        assert_eq!(render_event(&sync, false), None);
        assert!(render_event(&sync, true).unwrap().starts_with("[SYNC]"));
    }

    #[test]
    fn test_sync_dropped_is_always_shown() {
        let dropped = event(EV_SYN, SYN_DROPPED, 0, Cursor::ORIGIN);

        assert!(render_event(&dropped, false).is_some());
    }

    #[test]
    fn test_other_family_line() {
        let line = render_event(&event(EV_MSC, 4, 589825, Cursor::ORIGIN), false).unwrap();

        assert!(line.starts_with("[OTHER]"));
        assert!(line.contains("value:589825"));
    }

    #[test]
    fn test_corner_line() {
        let press = event(EV_KEY, BTN_RIGHT, 1, Cursor::new(30, -2));

        assert!(render_corner(Corner::Second, &press).ends_with("corner 2 (right) at (30, -2)"));
    }

    #[test]
    fn test_summary_marks_unset_corners() {
        let summary = SessionSummary {
            events: 12,
            cursor: Cursor::new(4, 4),
            corners: Corners {
                first: Some(Cursor::new(1, 1)),
                second: None,
            },
        };

        assert_eq!(
            render_summary(&summary),
            "12 events, final cursor (4, 4), corner 1 (1, 1), corner 2 unset"
        );
    }
}
