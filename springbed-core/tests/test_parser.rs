//! Tests for the flat key=value constants parser

use springbed_core::diagnostics::{format_diagnostic, DiagnosticSeverity};
use springbed_core::parser::{parse_constants, ConstantValue};
use springbed_core::tests::test_helpers::REFERENCE_CONSTANTS_TEXT;

#[test]
fn test_parse_reference_text() {
    let (table, diagnostics) = parse_constants(REFERENCE_CONSTANTS_TEXT);
    assert!(diagnostics.is_empty());
    assert_eq!(table.len(), 12);
    assert_eq!(table.get("N_springs"), Some(&ConstantValue::Int(5)));
    assert_eq!(table.get("dx"), Some(&ConstantValue::Float(1.0)));
    assert_eq!(table.get("k"), Some(&ConstantValue::Int(100)));
    assert_eq!(table.get("epsilon"), Some(&ConstantValue::Float(1e-4)));
}

#[test]
fn test_values_are_int_then_float_then_text() {
    assert_eq!(ConstantValue::parse("42"), ConstantValue::Int(42));
    assert_eq!(ConstantValue::parse("-7"), ConstantValue::Int(-7));
    assert_eq!(ConstantValue::parse("4.5"), ConstantValue::Float(4.5));
    assert_eq!(ConstantValue::parse("2e3"), ConstantValue::Float(2000.0));
    assert_eq!(
        ConstantValue::parse("verlet"),
        ConstantValue::Text("verlet".to_string())
    );
}

#[test]
fn test_comments_and_blank_lines_are_ignored() {
    let source = "\
# full line comment

   # indented comment
dx = 0.5   # inline comment
k=100#no spaces
";
    let (table, diagnostics) = parse_constants(source);
    assert!(diagnostics.is_empty());
    assert_eq!(table.len(), 2);
    assert_eq!(table.get("dx"), Some(&ConstantValue::Float(0.5)));
    assert_eq!(table.get("k"), Some(&ConstantValue::Int(100)));
}

#[test]
fn test_lines_without_assignment_are_skipped_silently() {
    let (table, diagnostics) = parse_constants("just some words\ndx = 1\n");
    assert!(diagnostics.is_empty());
    assert_eq!(table.len(), 1);
}

#[test]
fn test_value_keeps_text_after_first_equals() {
    let (table, _) = parse_constants("label = a=b\n");
    assert_eq!(table.get("label"), Some(&ConstantValue::Text("a=b".to_string())));
}

#[test]
fn test_later_assignment_wins() {
    let (table, _) = parse_constants("dt = 0.1\ndt = 0.001\n");
    assert_eq!(table.get("dt"), Some(&ConstantValue::Float(0.001)));
}

#[test]
fn test_malformed_lines_warn_and_continue() {
    let source = "dx = 1.0\n = 7\nk =\nm = 0.1\n";
    let (table, diagnostics) = parse_constants(source);

    assert_eq!(table.len(), 2);
    assert!(table.contains_key("dx"));
    assert!(table.contains_key("m"));

    assert_eq!(diagnostics.len(), 2);
    assert!(!diagnostics.has_errors());
    let lines: Vec<usize> = diagnostics
        .iter()
        .filter_map(|d| d.location.map(|loc| loc.line))
        .collect();
    assert_eq!(lines, vec![2, 3]);
    assert!(diagnostics
        .iter()
        .all(|d| d.severity == DiagnosticSeverity::Warning));
}

#[test]
fn test_malformed_line_span_covers_the_line() {
    let source = "dx = 1.0\n = 7\n";
    let (_, diagnostics) = parse_constants(source);
    let warning = diagnostics.iter().next().expect("one warning");
    let span = warning.span.expect("span");
    assert_eq!(&source[span.start..span.end], " = 7\n");

    let formatted = format_diagnostic(warning, source);
    assert!(formatted.contains("at line 2:  = 7"));
}

#[test]
fn test_counts_accept_integral_floats_only() {
    assert_eq!(ConstantValue::Int(5).as_count(), Some(5));
    assert_eq!(ConstantValue::Float(5.0).as_count(), Some(5));
    assert_eq!(ConstantValue::Float(5.5).as_count(), None);
    assert_eq!(ConstantValue::Int(-1).as_count(), None);
    assert_eq!(ConstantValue::Text("5".to_string()).as_count(), None);
}
