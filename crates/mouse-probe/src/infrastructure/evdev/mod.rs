//! Device probe implementations.
//!
//! The Linux implementation is selected at compile time via
//! `#[cfg(target_os = "linux")]`; the mock is always available.

use std::ffi::OsStr;
use std::path::PathBuf;

pub mod mock;

#[cfg(target_os = "linux")]
pub mod linux;

/// Parses the numeric suffix of a node name such as `event12`.
///
/// Returns `None` for names that do not start with `prefix` or whose suffix
/// is not a plain decimal number (`mouse0` under prefix `event`, `event-kbd`).
pub fn node_index(file_name: &OsStr, prefix: &str) -> Option<u32> {
    let digits = file_name.to_str()?.strip_prefix(prefix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Keeps event nodes only, orders them by index (`event2` before `event10`),
/// and caps the list at `max`.
pub fn order_candidates<I>(paths: I, prefix: &str, max: usize) -> Vec<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    let mut indexed: Vec<(u32, PathBuf)> = paths
        .into_iter()
        .filter_map(|path| {
            let index = node_index(path.file_name()?, prefix)?;
            Some((index, path))
        })
        .collect();
    indexed.sort_by_key(|(index, _)| *index);
    indexed.into_iter().take(max).map(|(_, path)| path).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_index_parses_event_suffix() {
        assert_eq!(node_index(OsStr::new("event0"), "event"), Some(0));
        assert_eq!(node_index(OsStr::new("event17"), "event"), Some(17));
    }

    #[test]
    fn test_node_index_rejects_other_names() {
        assert_eq!(node_index(OsStr::new("mouse0"), "event"), None);
        assert_eq!(node_index(OsStr::new("mice"), "event"), None);
        assert_eq!(node_index(OsStr::new("event"), "event"), None);
        assert_eq!(node_index(OsStr::new("event-kbd"), "event"), None);
        assert_eq!(node_index(OsStr::new("event+1"), "event"), None);
    }

    #[test]
    fn test_order_candidates_is_numeric_not_lexical() {
        let paths = ["event10", "event2", "mice", "event1", "by-id"]
            .iter()
            .map(|n| PathBuf::from("/dev/input").join(n));

        let ordered = order_candidates(paths, "event", 32);

        assert_eq!(
            ordered,
            vec![
                PathBuf::from("/dev/input/event1"),
                PathBuf::from("/dev/input/event2"),
                PathBuf::from("/dev/input/event10"),
            ]
        );
    }

    #[test]
    fn test_order_candidates_applies_cap_after_sorting() {
        let paths = (0..10).rev().map(|i| PathBuf::from(format!("/dev/input/event{i}")));

        let ordered = order_candidates(paths, "event", 3);

        assert_eq!(ordered.len(), 3);
        assert!(ordered[0].ends_with("event0"));
        assert!(ordered[2].ends_with("event2"));
    }
}
