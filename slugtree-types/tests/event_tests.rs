use slugtree_types::{ChangeEvent, ChangeKind, ContentTypeId, EntryField, EntryId, EventId};
use std::str::FromStr;

fn page() -> ContentTypeId {
    ContentTypeId::parse("page").unwrap()
}

// ── EventId ───────────────────────────────────────────────────────

#[test]
fn event_id_unique() {
    assert_ne!(EventId::new(), EventId::new());
}

#[test]
fn event_id_display_roundtrip() {
    let id = EventId::new();
    let parsed: EventId = id.to_string().parse().unwrap();
    assert_eq!(id, parsed);
}

#[test]
fn event_id_from_str_invalid() {
    assert!(EventId::from_str("bad").is_err());
}

// ── EntryField ────────────────────────────────────────────────────

#[test]
fn entry_field_names() {
    let names: Vec<_> = EntryField::ALL.iter().map(EntryField::as_str).collect();
    assert_eq!(names, ["title", "parent", "slugSegment", "fullPath", "pathMeta"]);
}

#[test]
fn entry_field_from_str() {
    for field in EntryField::ALL {
        assert_eq!(EntryField::from_str(field.as_str()).unwrap(), field);
    }
    assert!(EntryField::from_str("body").is_err());
}

#[test]
fn entry_field_derived_split() {
    assert!(!EntryField::Title.is_derived());
    assert!(!EntryField::Parent.is_derived());
    assert!(EntryField::SlugSegment.is_derived());
    assert!(EntryField::FullPath.is_derived());
    assert!(EntryField::PathMeta.is_derived());
}

#[test]
fn entry_field_serde_uses_camel_case() {
    let json = serde_json::to_string(&EntryField::SlugSegment).unwrap();
    assert_eq!(json, r#""slugSegment""#);
}

// ── ChangeEvent ───────────────────────────────────────────────────

#[test]
fn created_event_affects_inputs() {
    let event = ChangeEvent::created(EntryId::new(), page());
    assert_eq!(event.kind, ChangeKind::Created);
    assert!(event.affects_path_inputs());
}

#[test]
fn title_and_parent_changes_affect_inputs() {
    let id = EntryId::new();
    assert!(ChangeEvent::field_changed(id.clone(), page(), EntryField::Title).affects_path_inputs());
    assert!(ChangeEvent::field_changed(id, page(), EntryField::Parent).affects_path_inputs());
}

#[test]
fn derived_field_writes_do_not_affect_inputs() {
    let id = EntryId::new();
    for field in [EntryField::SlugSegment, EntryField::FullPath, EntryField::PathMeta] {
        let event = ChangeEvent::field_changed(id.clone(), page(), field);
        assert!(!event.affects_path_inputs(), "{field} should be ignored");
    }
}

#[test]
fn change_event_json_roundtrip() {
    let event = ChangeEvent::field_changed(EntryId::new(), page(), EntryField::Parent);
    let json = event.to_json().unwrap();
    assert!(json.contains(r#""op":"fieldChanged""#));
    let parsed = ChangeEvent::from_json(&json).unwrap();
    assert_eq!(parsed, event);
}

#[test]
fn change_event_from_invalid_json() {
    assert!(ChangeEvent::from_json("{}").is_err());
}
