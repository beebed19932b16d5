//! Event decoder and cursor tracker.
//!
//! [`read_event`] performs exactly one `read` of one record, applies any
//! relative motion to the caller's [`Cursor`], and reports what happened as a
//! [`ReadOutcome`].  Retrying after an interruption or an error is the
//! caller's decision; this module never loops on the source.

use std::io::{self, Read};

use thiserror::Error;
use tracing::trace;

use crate::domain::cursor::Cursor;
use crate::domain::event::MouseEvent;
use crate::protocol::codes::{event_type_name, EV_REL, REL_X, REL_Y};
use crate::protocol::record::{InputRecord, RecordError, RECORD_SIZE};

/// Why a read did not produce an event.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The source returned part of a record.
    #[error("malformed event record: {0}")]
    ShortRecord(#[from] RecordError),

    /// The read was interrupted by a signal before any data arrived.
    #[error("read interrupted")]
    Interrupted,

    /// Any other I/O failure.
    #[error("read failed: {0}")]
    Io(#[source] io::Error),
}

/// Result of one [`read_event`] call.
#[derive(Debug)]
pub enum ReadOutcome {
    /// A full record was decoded and applied.
    Produced(MouseEvent),
    /// The source reported end of stream.
    Ended,
    /// The read failed; the cursor was not touched.
    Error(StreamError),
}

impl ReadOutcome {
    pub fn event(&self) -> Option<&MouseEvent> {
        match self {
            ReadOutcome::Produced(event) => Some(event),
            _ => None,
        }
    }

    pub fn is_ended(&self) -> bool {
        matches!(self, ReadOutcome::Ended)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ReadOutcome::Error(_))
    }
}

/// Reads one record from `source` and folds it into `cursor`.
///
/// The returned event's `cursor_pos` reflects this record's effect.  On
/// `Ended` or `Error` the cursor is unchanged.
pub fn read_event<R: Read + ?Sized>(source: &mut R, cursor: &mut Cursor) -> ReadOutcome {
    let mut buf = [0u8; RECORD_SIZE];
    let read = match source.read(&mut buf) {
        Ok(0) => return ReadOutcome::Ended,
        Ok(n) => n,
        Err(e) if e.kind() == io::ErrorKind::Interrupted => {
            return ReadOutcome::Error(StreamError::Interrupted)
        }
        Err(e) => return ReadOutcome::Error(StreamError::Io(e)),
    };

    let record = match InputRecord::decode(&buf[..read]) {
        Ok(record) => record,
        Err(e) => return ReadOutcome::Error(e.into()),
    };

    apply_record(&record, cursor);
    trace!(
        "{} code={} value={} cursor={}",
        event_type_name(record.event_type),
        record.code,
        record.value,
        cursor
    );
    ReadOutcome::Produced(MouseEvent::from_record(&record, *cursor))
}

/// Applies a record's motion, if any, to `cursor`.
///
/// Only `EV_REL` with `REL_X` or `REL_Y` moves the cursor.  Wheels, other
/// axes, buttons, and sync markers pass through.
pub fn apply_record(record: &InputRecord, cursor: &mut Cursor) {
    if record.event_type != EV_REL {
        return;
    }
    match record.code {
        REL_X => cursor.move_x(record.value),
        REL_Y => cursor.move_y(record.value),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::codes::{BTN_LEFT, EV_KEY, EV_MSC, EV_SYN, REL_WHEEL, SYN_REPORT};

    fn stream(records: &[InputRecord]) -> io::Cursor<Vec<u8>> {
        io::Cursor::new(records.iter().flat_map(|r| r.encode()).collect())
    }

    /// Reader that fails every call with the given error kind.
    struct FailingReader(io::ErrorKind);

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(self.0, "synthetic failure"))
        }
    }

    #[test]
    fn test_horizontal_motion_updates_x_only() {
        // Arrange
        let mut source = stream(&[InputRecord::new(EV_REL, REL_X, 5)]);
        let mut cursor = Cursor::new(1, 1);

        // Act
        let outcome = read_event(&mut source, &mut cursor);

        // Assert
        assert_eq!(cursor, Cursor::new(6, 1));
        let event = outcome.event().expect("event produced");
        assert_eq!(event.event_type, EV_REL);
        assert_eq!(event.event_code, REL_X);
        assert_eq!(event.event_value, 5);
        assert_eq!(event.cursor_pos, Cursor::new(6, 1));
    }

    #[test]
    fn test_vertical_motion_updates_y_only() {
        let mut source = stream(&[InputRecord::new(EV_REL, REL_Y, -9)]);
        let mut cursor = Cursor::ORIGIN;

        let outcome = read_event(&mut source, &mut cursor);

        assert_eq!(cursor, Cursor::new(0, -9));
        assert_eq!(outcome.event().map(|e| e.cursor_pos), Some(Cursor::new(0, -9)));
    }

    #[test]
    fn test_wheel_is_decoded_without_moving_cursor() {
        let mut source = stream(&[InputRecord::new(EV_REL, REL_WHEEL, -1)]);
        let mut cursor = Cursor::new(4, 4);

        let outcome = read_event(&mut source, &mut cursor);

        assert_eq!(cursor, Cursor::new(4, 4));
        assert_eq!(outcome.event().map(|e| e.event_code), Some(REL_WHEEL));
    }

    #[test]
    fn test_sync_and_misc_events_are_returned_verbatim() {
        let mut source = stream(&[
            InputRecord::new(EV_MSC, 4, 90001),
            InputRecord::new(EV_SYN, SYN_REPORT, 0),
        ]);
        let mut cursor = Cursor::new(2, 3);

        let misc = read_event(&mut source, &mut cursor);
        let sync = read_event(&mut source, &mut cursor);

        assert_eq!(misc.event().map(|e| (e.event_type, e.event_value)), Some((EV_MSC, 90001)));
        assert_eq!(sync.event().map(|e| e.event_type), Some(EV_SYN));
        assert_eq!(cursor, Cursor::new(2, 3));
    }

    #[test]
    fn test_key_event_snapshot_is_current_cursor() {
        let mut source = stream(&[
            InputRecord::new(EV_REL, REL_X, 12),
            InputRecord::new(EV_KEY, BTN_LEFT, 1),
        ]);
        let mut cursor = Cursor::ORIGIN;

        read_event(&mut source, &mut cursor);
        let press = read_event(&mut source, &mut cursor);

        assert_eq!(press.event().map(|e| e.cursor_pos), Some(Cursor::new(12, 0)));
    }

    #[test]
    fn test_empty_stream_ends() {
        let mut source = io::empty();
        let mut cursor = Cursor::new(7, 7);

        let outcome = read_event(&mut source, &mut cursor);

        assert!(outcome.is_ended());
        assert_eq!(cursor, Cursor::new(7, 7));
    }

    #[test]
    fn test_short_record_is_error_and_cursor_untouched() {
        // Arrange: the first half of a motion record.
        let full = InputRecord::new(EV_REL, REL_X, 100).encode();
        let mut source = io::Cursor::new(full[..RECORD_SIZE / 2].to_vec());
        let mut cursor = Cursor::new(1, 2);

        // Act
        let outcome = read_event(&mut source, &mut cursor);

        // Assert
        assert!(matches!(
            outcome,
            ReadOutcome::Error(StreamError::ShortRecord(RecordError::Truncated { .. }))
        ));
        assert_eq!(cursor, Cursor::new(1, 2));
    }

    #[test]
    fn test_interrupted_read_is_reported_not_retried() {
        let mut source = FailingReader(io::ErrorKind::Interrupted);
        let mut cursor = Cursor::ORIGIN;

        let outcome = read_event(&mut source, &mut cursor);

        assert!(matches!(outcome, ReadOutcome::Error(StreamError::Interrupted)));
    }

    #[test]
    fn test_io_failure_is_error() {
        let mut source = FailingReader(io::ErrorKind::Other);
        let mut cursor = Cursor::new(5, 5);

        let outcome = read_event(&mut source, &mut cursor);

        assert!(matches!(outcome, ReadOutcome::Error(StreamError::Io(_))));
        assert_eq!(cursor, Cursor::new(5, 5));
    }

    #[test]
    fn test_apply_record_ignores_rel_codes_on_other_families() {
        // REL_X and BTN numbering overlap with other families' codes; only
        // EV_REL may move the cursor.
        let mut cursor = Cursor::ORIGIN;

        apply_record(&InputRecord::new(EV_SYN, REL_X, 50), &mut cursor);
        apply_record(&InputRecord::new(EV_KEY, REL_Y, 1), &mut cursor);

        assert_eq!(cursor, Cursor::ORIGIN);
    }
}
