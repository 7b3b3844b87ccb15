//! Registry priority and fallback behavior with the real parsers.

use dbdoc::comment::json::{is_valid_json, quick_parse_json};
use dbdoc::comment::yaml::{is_valid_yaml, quick_parse_yaml};
use dbdoc::comment::{
    CommentParser, JsonParser, LegacyParser, ParserRegistry, ParseErrorKind, YamlParser,
};

fn full_registry() -> ParserRegistry {
    let mut registry = ParserRegistry::new();
    registry.register(Box::new(LegacyParser::new()));
    registry.register(Box::new(YamlParser::new()));
    registry.register(Box::new(JsonParser::new()));
    registry
}

#[test]
fn test_priority_order_is_independent_of_registration_order() {
    let registry = full_registry();
    assert_eq!(registry.parser_names(), vec!["json", "yaml", "legacy"]);
}

#[test]
fn test_json_wins_over_yaml_for_json_text() {
    // Flow-style JSON is also valid YAML, but the JSON parser sits earlier
    // in the chain.
    let registry = full_registry();
    let record = registry
        .parse_with_fallback(r#"{"name": "両対応"}"#, "|")
        .unwrap();
    assert_eq!(record.logical_name, "両対応");
}

#[test]
fn test_yaml_text_skips_json() {
    let registry = full_registry();
    let record = registry
        .parse_with_fallback("name: マッピング\ntags:\n  - a", "|")
        .unwrap();
    assert_eq!(record.logical_name, "マッピング");
    assert_eq!(record.tags, vec!["a"]);
}

#[test]
fn test_plain_text_lands_on_legacy() {
    let registry = full_registry();
    let record = registry
        .parse_with_fallback("ただのコメント", "|")
        .unwrap();
    assert_eq!(record.logical_name, "ただのコメント");
}

#[test]
fn test_empty_registry_is_unsupported_format() {
    let registry = ParserRegistry::new();
    let err = registry.parse_with_fallback("anything", "|").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnsupportedFormat);
}

#[test]
fn test_structured_only_registry_surfaces_last_error() {
    let mut registry = ParserRegistry::new();
    registry.register(Box::new(JsonParser::new()));
    registry.register(Box::new(YamlParser::new()));

    // Valid JSON shape but too deep, so the JSON parser accepts and fails.
    let deep = r#"{"a": {"b": {"c": {"d": {"e": {"f": 1}}}}}}"#;
    let err = registry.parse_with_fallback(deep, "|").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::TooDeep);
    assert_eq!(err.parser, "json");
}

#[test]
fn test_oversized_input_fails_structured_probes() {
    let parser = JsonParser::new();
    let oversized = format!(r#"{{"name": "{}"}}"#, "x".repeat(9000));
    assert!(!parser.can_parse(&oversized));

    let yaml_parser = YamlParser::new();
    let oversized_yaml = format!("name: {}", "y".repeat(9000));
    assert!(!yaml_parser.can_parse(&oversized_yaml));

    // The legacy parser has no size bound and still accepts it.
    assert!(LegacyParser::new().can_parse(&oversized));
}

#[test]
fn test_custom_delimiter_through_fallback() {
    let registry = full_registry();
    let record = registry.parse_with_fallback("名前::説明", "::").unwrap();
    assert_eq!(record.logical_name, "名前");
    assert_eq!(record.description, "説明");
}

#[test]
fn test_quick_parse_utilities() {
    assert!(is_valid_json(r#"{"a": 1}"#));
    assert!(!is_valid_json("a: 1"));
    assert!(is_valid_yaml("a: 1"));
    assert!(!is_valid_yaml(r#"{"a": 1"#));

    // Quick parsing applies no validation: forbidden content passes.
    let record = quick_parse_json(r#"{"name": "DROP TABLE x"}"#).unwrap();
    assert_eq!(record.logical_name, "DROP TABLE x");

    let record = quick_parse_yaml("name: DROP TABLE x").unwrap();
    assert_eq!(record.logical_name, "DROP TABLE x");
}
