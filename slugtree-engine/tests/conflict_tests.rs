mod common;

use common::*;
use pretty_assertions::assert_eq;
use slugtree_engine::{ConflictDetector, PathConflict, scan_conflicts};
use slugtree_model::Entry;

#[tokio::test]
async fn scan_groups_shared_paths() {
    let repo = repo_with(&[
        resolved("a", "A", "a", "/shared"),
        resolved("b", "B", "b", "/unique"),
        resolved("c", "C", "c", "/shared"),
        resolved("d", "D", "d", "/also-shared"),
        resolved("e", "E", "e", "/also-shared"),
    ])
    .await;

    let conflicts = scan_conflicts(repo.as_ref(), &config().managed_content_type_ids)
        .await
        .unwrap();

    assert_eq!(
        conflicts,
        vec![
            PathConflict {
                full_path: "/also-shared".into(),
                entries: vec![id("d"), id("e")],
            },
            PathConflict {
                full_path: "/shared".into(),
                entries: vec![id("a"), id("c")],
            },
        ]
    );
}

#[tokio::test]
async fn scan_ignores_unresolved_and_unmanaged() {
    let repo = repo_with(&[
        resolved("a", "A", "a", "/x"),
        Entry::new(id("logo"), asset(), "Logo").with_full_path("/x"),
        entry("draft", "Draft"),
        entry("draft2", "Draft"),
    ])
    .await;

    let conflicts = scan_conflicts(repo.as_ref(), &config().managed_content_type_ids)
        .await
        .unwrap();
    assert!(conflicts.is_empty());
}

#[tokio::test]
async fn detector_excludes_self() {
    let repo = repo_with(&[
        resolved("a", "A", "a", "/x"),
        resolved("b", "B", "b", "/x"),
    ])
    .await;
    let managed = config().managed_content_type_ids;
    let detector = ConflictDetector::new(repo.as_ref(), &managed);

    assert_eq!(detector.detect("/x", &id("a")).await.unwrap(), Some(id("b")));
    assert_eq!(detector.detect("/y", &id("a")).await.unwrap(), None);
}

#[test]
fn conflict_serializes_camel_case() {
    let conflict = PathConflict {
        full_path: "/x".into(),
        entries: vec![id("a")],
    };
    let json = serde_json::to_value(&conflict).unwrap();
    assert_eq!(json, serde_json::json!({ "fullPath": "/x", "entries": ["a"] }));
}
