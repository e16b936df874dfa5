use proptest::prelude::*;
use slugtree_types::{ContentTypeId, EntryId, Error};
use std::collections::HashSet;
use std::str::FromStr;

// ── EntryId ──────────────────────────────────────────────────────

#[test]
fn entry_id_new_is_unique() {
    let a = EntryId::new();
    let b = EntryId::new();
    assert_ne!(a, b);
}

#[test]
fn entry_id_new_is_valid() {
    let id = EntryId::new();
    assert_eq!(id.as_str().len(), 32);
    assert!(EntryId::parse(id.as_str()).is_ok());
}

#[test]
fn entry_id_display_and_parse() {
    let id = EntryId::parse("6xYzPage-01").unwrap();
    assert_eq!(id.to_string(), "6xYzPage-01");
    let parsed: EntryId = EntryId::from_str(&id.to_string()).unwrap();
    assert_eq!(id, parsed);
}

#[test]
fn entry_id_parse_rejects_empty() {
    let err = EntryId::parse("").unwrap_err();
    assert!(matches!(err, Error::InvalidId { kind: "entry id", .. }));
    assert!(err.to_string().contains("must not be empty"));
}

#[test]
fn entry_id_parse_rejects_slashes_and_spaces() {
    assert!(EntryId::parse("a/b").is_err());
    assert!(EntryId::parse("a b").is_err());
    assert!(EntryId::parse("ümlaut").is_err());
}

#[test]
fn entry_id_parse_rejects_overlong() {
    let long = "a".repeat(65);
    assert!(EntryId::parse(&long).is_err());
    assert!(EntryId::parse(&"a".repeat(64)).is_ok());
}

#[test]
fn entry_id_hash_and_eq() {
    let id = EntryId::parse("page-1").unwrap();
    let mut set = HashSet::new();
    set.insert(id.clone());
    set.insert(id);
    assert_eq!(set.len(), 1);
}

#[test]
fn entry_id_serializes_as_plain_string() {
    let id = EntryId::parse("page-1").unwrap();
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, r#""page-1""#);
    let parsed: EntryId = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, id);
}

#[test]
fn entry_id_deserialize_validates() {
    let result: Result<EntryId, _> = serde_json::from_str(r#""not/valid""#);
    assert!(result.is_err());
}

// ── ContentTypeId ────────────────────────────────────────────────

#[test]
fn content_type_id_parse() {
    let ct = ContentTypeId::parse("blogPost").unwrap();
    assert_eq!(ct.as_str(), "blogPost");
    assert_eq!(ct.to_string(), "blogPost");
}

#[test]
fn content_type_id_parse_invalid() {
    let err = ContentTypeId::parse("").unwrap_err();
    assert!(err.to_string().contains("content type id"));
}

#[test]
fn content_type_id_serde_roundtrip() {
    let ct = ContentTypeId::parse("page").unwrap();
    let json = serde_json::to_string(&ct).unwrap();
    let parsed: ContentTypeId = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, ct);
}

// ── Properties ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn valid_ids_roundtrip(s in "[A-Za-z0-9._-]{1,64}") {
        let id = EntryId::parse(&s).unwrap();
        prop_assert_eq!(id.as_str(), s.as_str());
    }
}
