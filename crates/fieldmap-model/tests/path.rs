//! Property tests for dotted path parsing.

use fieldmap_model::{FieldPath, PathError};
use proptest::prelude::*;

fn segment() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_-]{1,8}"
}

proptest! {
    #[test]
    fn display_round_trips(segments in prop::collection::vec(segment(), 1..6)) {
        let raw = segments.join(".");
        let path = FieldPath::parse(&raw).unwrap();
        prop_assert_eq!(path.depth(), segments.len());
        prop_assert_eq!(path.to_string(), raw);
        prop_assert_eq!(path.segments(), segments.as_slice());
    }

    #[test]
    fn doubled_separator_is_rejected(
        head in segment(),
        tail in segment(),
    ) {
        let raw = format!("{head}..{tail}");
        let is_empty_segment = matches!(FieldPath::parse(&raw), Err(PathError::EmptySegment { .. }));
        prop_assert!(is_empty_segment);
    }
}
