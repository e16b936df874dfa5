use pretty_assertions::assert_eq;
use serde_json::json;
use slugtree_model::{Entry, EntrySys, FieldMapping, PathMeta, RawEntry, ValidationError};
use slugtree_types::{ContentTypeId, EntryId};

fn id(s: &str) -> EntryId {
    EntryId::parse(s).unwrap()
}

fn raw(entry_id: &str) -> RawEntry {
    RawEntry::new(EntrySys::new(id(entry_id), ContentTypeId::parse("page").unwrap()))
}

// ── RawEntry ─────────────────────────────────────────────────────

#[test]
fn raw_get_str_returns_string_field() {
    let r = raw("e1").with_field("title", json!("Hello"));
    assert_eq!(r.get_str("title"), Some("Hello"));
    assert_eq!(r.get_str("missing"), None);
}

#[test]
fn raw_set_null_removes_field() {
    let mut r = raw("e1").with_field("slug", json!("hello"));
    r.set("slug", serde_json::Value::Null);
    assert!(r.get("slug").is_none());
}

#[test]
fn raw_entry_deserializes_from_store_json() {
    let r: RawEntry = serde_json::from_value(json!({
        "sys": {"id": "e1", "contentType": "page"},
        "fields": {"title": "Home"}
    }))
    .unwrap();
    assert_eq!(r.sys.id.as_str(), "e1");
    assert_eq!(r.sys.content_type.as_str(), "page");
    assert_eq!(r.get_str("title"), Some("Home"));
}

#[test]
fn raw_entry_fields_default_to_empty() {
    let r: RawEntry =
        serde_json::from_value(json!({"sys": {"id": "e1", "contentType": "page"}})).unwrap();
    assert!(r.fields.is_empty());
}

// ── Entry::from_raw ──────────────────────────────────────────────

#[test]
fn from_raw_minimal_entry_is_root() {
    let e = Entry::from_raw(&raw("e1").with_field("title", json!("Home")), &FieldMapping::default())
        .unwrap();
    assert_eq!(e.title, "Home");
    assert!(e.is_root());
    assert_eq!(e.slug_segment, None);
    assert_eq!(e.full_path, None);
    assert_eq!(e.path_meta, PathMeta::default());
}

#[test]
fn from_raw_reads_all_fields() {
    let r = raw("e2")
        .with_field("title", json!("My Great Post"))
        .with_field("parent", json!("blog"))
        .with_field("slug", json!("my-great-post"))
        .with_field("fullPath", json!("/blog/my-great-post"))
        .with_field(
            "pathMeta",
            json!({"pathChain": ["blog"], "previousPaths": ["/my-great-post"]}),
        );
    let e = Entry::from_raw(&r, &FieldMapping::default()).unwrap();
    assert_eq!(e.parent, Some(id("blog")));
    assert_eq!(e.slug_segment.as_deref(), Some("my-great-post"));
    assert_eq!(e.resolved_full_path(), Some("/blog/my-great-post"));
    assert_eq!(e.path_meta.path_chain, vec![id("blog")]);
    assert_eq!(e.path_meta.previous_paths, vec!["/my-great-post".to_string()]);
}

#[test]
fn from_raw_accepts_link_object_parent() {
    let r = raw("e2")
        .with_field("title", json!("Child"))
        .with_field("parent", json!({"sys": {"type": "Link", "id": "p1"}}));
    let e = Entry::from_raw(&r, &FieldMapping::default()).unwrap();
    assert_eq!(e.parent, Some(id("p1")));
}

#[test]
fn from_raw_blank_optional_fields_are_unset() {
    let r = raw("e1")
        .with_field("title", json!("T"))
        .with_field("parent", json!(""))
        .with_field("slug", json!("  "))
        .with_field("fullPath", json!(""));
    let e = Entry::from_raw(&r, &FieldMapping::default()).unwrap();
    assert!(e.is_root());
    assert_eq!(e.slug_segment, None);
    assert_eq!(e.resolved_full_path(), None);
}

#[test]
fn from_raw_partial_path_meta_uses_defaults() {
    let r = raw("e1")
        .with_field("title", json!("T"))
        .with_field("pathMeta", json!({"previousPaths": ["/a"]}));
    let e = Entry::from_raw(&r, &FieldMapping::default()).unwrap();
    assert!(e.path_meta.path_chain.is_empty());
    assert_eq!(e.path_meta.previous_paths, vec!["/a".to_string()]);
}

#[test]
fn from_raw_uses_custom_mapping() {
    let mapping = FieldMapping {
        title: "name".into(),
        parent: "parentPage".into(),
        slug_segment: "urlSegment".into(),
        ..FieldMapping::default()
    };
    let r = raw("e1")
        .with_field("name", json!("About"))
        .with_field("parentPage", json!("root"))
        .with_field("urlSegment", json!("about-us"));
    let e = Entry::from_raw(&r, &mapping).unwrap();
    assert_eq!(e.title, "About");
    assert_eq!(e.parent, Some(id("root")));
    assert_eq!(e.slug_segment.as_deref(), Some("about-us"));
}

// ── Validation errors ────────────────────────────────────────────

#[test]
fn from_raw_missing_title() {
    let err = Entry::from_raw(&raw("e1"), &FieldMapping::default()).unwrap_err();
    assert!(matches!(err, ValidationError::MissingField { .. }));
    assert_eq!(err.field(), "title");
    assert!(err.to_string().contains("e1"));
}

#[test]
fn from_raw_blank_title() {
    let err = Entry::from_raw(&raw("e1").with_field("title", json!("   ")), &FieldMapping::default())
        .unwrap_err();
    assert!(matches!(err, ValidationError::BlankField { .. }));
}

#[test]
fn from_raw_non_string_title() {
    let err = Entry::from_raw(&raw("e1").with_field("title", json!(42)), &FieldMapping::default())
        .unwrap_err();
    assert!(matches!(err, ValidationError::WrongType { expected: "a string", .. }));
}

#[test]
fn from_raw_non_string_slug() {
    let r = raw("e1")
        .with_field("title", json!("T"))
        .with_field("slug", json!(["a"]));
    let err = Entry::from_raw(&r, &FieldMapping::default()).unwrap_err();
    assert_eq!(err.field(), "slug");
}

#[test]
fn from_raw_invalid_parent_reference() {
    let r = raw("e1")
        .with_field("title", json!("T"))
        .with_field("parent", json!("not a valid id"));
    let err = Entry::from_raw(&r, &FieldMapping::default()).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidReference { .. }));
}

#[test]
fn from_raw_link_without_id() {
    let r = raw("e1")
        .with_field("title", json!("T"))
        .with_field("parent", json!({"sys": {}}));
    let err = Entry::from_raw(&r, &FieldMapping::default()).unwrap_err();
    assert!(matches!(err, ValidationError::WrongType { .. }));
}

#[test]
fn from_raw_malformed_path_meta() {
    let r = raw("e1")
        .with_field("title", json!("T"))
        .with_field("pathMeta", json!({"previousPaths": "not-a-list"}));
    let err = Entry::from_raw(&r, &FieldMapping::default()).unwrap_err();
    assert!(matches!(err, ValidationError::MalformedPathMeta { .. }));
}

#[test]
fn from_raw_path_meta_not_object() {
    let r = raw("e1")
        .with_field("title", json!("T"))
        .with_field("pathMeta", json!("x"));
    let err = Entry::from_raw(&r, &FieldMapping::default()).unwrap_err();
    assert!(matches!(err, ValidationError::WrongType { expected: "an object", .. }));
}

// ── Entry::to_raw ────────────────────────────────────────────────

#[test]
fn to_raw_then_from_raw_preserves_entry() {
    let mut e = Entry::new(id("e1"), ContentTypeId::parse("page").unwrap(), "Launch")
        .with_parent(id("p1"))
        .with_slug_segment("launch-2")
        .with_full_path("/news/launch-2");
    e.path_meta.path_chain = vec![id("p1")];
    e.path_meta.previous_paths = vec!["/launch".into()];

    let mapping = FieldMapping::default();
    let r = e.to_raw(&mapping);
    assert_eq!(r.get_str("parent"), Some("p1"));
    assert_eq!(
        r.get("pathMeta"),
        Some(&json!({"pathChain": ["p1"], "previousPaths": ["/launch"]}))
    );
    assert_eq!(Entry::from_raw(&r, &mapping).unwrap(), e);
}

#[test]
fn to_raw_omits_unset_fields() {
    let e = Entry::new(id("e1"), ContentTypeId::parse("page").unwrap(), "Home");
    let r = e.to_raw(&FieldMapping::default());
    assert!(r.get("parent").is_none());
    assert!(r.get("slug").is_none());
    assert!(r.get("fullPath").is_none());
}
