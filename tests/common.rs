//! Integration tests for pdep-common crate.

use pdep_common::{BytePos, Location, Span};

fn span(start: usize, end: usize) -> Span {
    Span::new(
        Location::new(start, 1, start as u32 + 1),
        Location::new(end, 1, end as u32 + 1),
    )
}

#[test]
fn test_span_merge() {
    let merged = span(10, 20).merge(span(15, 30));
    assert_eq!(merged.start.offset, BytePos(10));
    assert_eq!(merged.end.offset, BytePos(30));
}

#[test]
fn test_span_merge_is_symmetric() {
    let a = span(3, 8);
    let b = span(12, 14);
    assert_eq!(a.merge(b), b.merge(a));
}

#[test]
fn test_span_len() {
    assert_eq!(span(5, 15).len(), 10);
}

#[test]
fn test_span_is_empty() {
    assert!(span(5, 5).is_empty());
    assert!(!span(5, 10).is_empty());
}

#[test]
fn test_span_range() {
    assert_eq!(span(5, 15).range(), 5..15);
}

#[test]
fn test_span_contains() {
    let outer = span(0, 20);
    assert!(outer.contains(span(0, 20)));
    assert!(outer.contains(span(4, 9)));
    assert!(!outer.contains(span(15, 21)));
    assert!(!span(4, 9).contains(outer));
}

#[test]
fn test_byte_pos_offset() {
    assert_eq!(BytePos(10).offset(5), BytePos(15));
}

#[test]
fn test_location_display() {
    let location = Location::new(12, 3, 7);
    assert_eq!(location.to_string(), "line 3, column 7");
    assert_eq!(format!("{location:?}"), "3:7");
}

#[test]
fn test_location_orders_by_offset() {
    let a = Location::new(4, 1, 5);
    let b = Location::new(9, 2, 1);
    assert!(a < b);
    assert_eq!(std::cmp::max(a, b), b);
    assert_eq!(Location::default(), Location::START);
}
