//! Tests for relation input.

use super::*;

#[test]
fn test_from_pairs_keeps_duplicates() {
    let set = RelationSet::from_pairs(&[("A1", "E1"), ("A1", "E1"), ("A2", "E2")]);
    assert_eq!(set.len(), 3);
    assert_eq!(set.distinct_pairs(), 2);
    assert!(!set.is_empty());
}

#[test]
fn test_entity_labels_first_wins() {
    let set = RelationSet::from_records(vec![
        RelationRecord::new("A1", "E1"),
        RelationRecord::new("A2", "E1").with_label("education"),
        RelationRecord::new("A3", "E1").with_label("information"),
    ])
    .with_entity("E3", Some("football clubs".into()));

    let labels = set.entity_labels();
    assert_eq!(labels["E1"], "education");
    assert_eq!(labels["E3"], "football clubs");
    assert_eq!(labels.len(), 2);
}

#[test]
fn test_reader_custom_columns() {
    let data = "user;brand\nu1;b1\nu2;b2\n";
    let set = RelationReader::new()
        .actor_column("user")
        .entity_column("brand")
        .label_column(None)
        .delimiter(b';')
        .read(data.as_bytes())
        .expect("columns present");
    assert_eq!(set.records()[1], RelationRecord::new("u2", "b2"));
}

#[test]
fn test_reader_missing_column_is_validation_error() {
    let data = "follower_id,brand\n1,b1\n";
    let err = RelationReader::new()
        .read(data.as_bytes())
        .expect_err("twitter_name is missing");
    assert!(matches!(err, FollownetError::Validation { .. }));
    assert!(err.to_string().contains("twitter_name"));
}

#[test]
fn test_reader_tolerates_missing_label_column() {
    let data = "follower_id,twitter_name\n1,b1\n";
    let set = RelationReader::new()
        .read(data.as_bytes())
        .expect("label column is optional");
    assert_eq!(set.records()[0].label, None);
}

#[test]
fn test_reader_rejects_empty_cells() {
    let data = "follower_id,twitter_name\n1,\n";
    let err = RelationReader::new()
        .read(data.as_bytes())
        .expect_err("empty entity");
    assert!(err.to_string().contains("row 2"));
}

#[test]
fn test_collect_records() {
    let set: RelationSet = vec![RelationRecord::new("a", "e")].into_iter().collect();
    assert_eq!(set.len(), 1);
}
