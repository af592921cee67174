use super::*;

fn numbers(set: &FrameRangeSet) -> Vec<u32> {
    set.iter().map(|f| f.0).collect()
}

#[test]
fn absent_selector_is_every_frame() {
    for n in 1..=12 {
        let set = FrameRangeSet::resolve(None, n);
        assert_eq!(numbers(&set), (1..=n).collect::<Vec<_>>());
    }
}

#[test]
fn single_index_is_singleton() {
    let set = FrameRangeSet::resolve(Some(&FrameSelector::Index(4)), 10);
    assert_eq!(numbers(&set), vec![4]);
}

#[test]
fn literal_indices_are_not_clamped() {
    let sel = FrameSelector::Indices(vec![0, 3, 3, 99]);
    let set = FrameRangeSet::resolve(Some(&sel), 5);
    assert_eq!(numbers(&set), vec![0, 3, 99]);
    assert!(!set.contains(FrameNumber(1)));
}

#[test]
fn span_bounds_are_clamped() {
    let set = FrameRangeSet::resolve(Some(&FrameSelector::span(-3, 50)), 6);
    assert_eq!(numbers(&set), vec![1, 2, 3, 4, 5, 6]);

    let set = FrameRangeSet::resolve(Some(&FrameSelector::span(0, 2)), 6);
    assert_eq!(numbers(&set), vec![1, 2]);
}

#[test]
fn spans_outside_the_sequence_are_empty() {
    let frame_count = 8u32;
    for (from, to) in [(-5, 0), (-1, -1), (9, 12), (20, 30), (5, 2)] {
        let set = FrameRangeSet::resolve(Some(&FrameSelector::span(from, to)), frame_count);
        assert!(set.is_empty(), "({from},{to}) should resolve empty");
    }
}

#[test]
fn overlapping_spans_are_deduplicated() {
    let sel = FrameSelector::Spans(vec![FrameSpan::new(1, 3), FrameSpan::new(2, 5)]);
    let set = FrameRangeSet::resolve(Some(&sel), 10);
    assert_eq!(numbers(&set), vec![1, 2, 3, 4, 5]);
    assert_eq!(set.len(), 5);
}

#[test]
fn resolution_is_reproducible() {
    let sel = FrameSelector::Spans(vec![FrameSpan::new(7, 9), FrameSpan::new(1, 2)]);
    assert_eq!(
        FrameRangeSet::resolve(Some(&sel), 10),
        FrameRangeSet::resolve(Some(&sel), 10)
    );
}

#[test]
fn empty_literal_list_selects_nothing() {
    let set = FrameRangeSet::resolve(Some(&FrameSelector::Indices(Vec::new())), 4);
    assert!(set.is_empty());
}

#[test]
fn selectors_deserialize_from_json_shapes() {
    let s: FrameSelector = serde_json::from_str("3").unwrap();
    assert_eq!(s, FrameSelector::Index(3));

    let s: FrameSelector = serde_json::from_str("[1, 4]").unwrap();
    assert_eq!(s, FrameSelector::Indices(vec![1, 4]));

    let s: FrameSelector = serde_json::from_str(r#"{"from": 2, "to": 5}"#).unwrap();
    assert_eq!(s, FrameSelector::span(2, 5));

    let s: FrameSelector =
        serde_json::from_str(r#"[{"from": 1, "to": 2}, {"from": 8, "to": 9}]"#).unwrap();
    assert_eq!(
        s,
        FrameSelector::Spans(vec![FrameSpan::new(1, 2), FrameSpan::new(8, 9)])
    );
}

#[test]
fn diagnose_flags_inverted_and_out_of_range_spans() {
    assert!(FrameSelector::span(1, 3).diagnose(5).is_ok());
    assert!(FrameSelector::Index(40).diagnose(5).is_ok());

    let err = FrameSelector::span(4, 2).diagnose(5).unwrap_err();
    assert!(matches!(err, GifCanvasError::InvalidSelector(_)));

    let err = FrameSelector::span(9, 12).diagnose(5).unwrap_err();
    assert!(matches!(err, GifCanvasError::InvalidSelector(_)));
}

#[test]
fn range_conversions() {
    let sel: FrameSelector = (2i64..=4).into();
    let set = FrameRangeSet::resolve(Some(&sel), 10);
    assert_eq!(numbers(&set), vec![2, 3, 4]);
}
