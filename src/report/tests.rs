use super::*;
use crate::decomposition::{ContingencyTable, CorrespondenceAnalysis};
use crate::relation::{RelationRecord, RelationSet};

fn fitted() -> (CaResult, BTreeMap<String, String>) {
    let set = RelationSet::from_records(vec![
        RelationRecord::new("a", "x").with_label("news"),
        RelationRecord::new("a", "y").with_label("sport"),
        RelationRecord::new("b", "y"),
        RelationRecord::new("b", "z"),
        RelationRecord::new("c", "z"),
        RelationRecord::new("c", "x"),
        RelationRecord::new("d", "x"),
    ]);
    let table = ContingencyTable::from_relations(&set).expect("non-empty input");
    let ca = CorrespondenceAnalysis::new(100).fit(&table).expect("4x3 table");
    (ca, set.entity_labels())
}

#[test]
fn test_coordinate_table_truncates_dimensions() {
    let (ca, _) = fitted();
    assert_eq!(ca.n_dimensions(), 2);

    let one = CoordinateTable::rows(&ca, 1, "follower_id");
    assert_eq!(one.dimensions(), 1);
    assert_eq!(one.len(), 4);
    assert_eq!(one.values().get(2, 0), ca.row_coordinates.get(2, 0));

    let many = CoordinateTable::columns(&ca, 10, "twitter_name");
    assert_eq!(many.dimensions(), 2);
    assert_eq!(many.headers(), vec!["twitter_name", "0", "1"]);
}

#[test]
fn test_column_labels_joined() {
    let (ca, labels) = fitted();
    let table = CoordinateTable::columns(&ca, 2, "twitter_name").with_labels("type2", &labels);
    assert_eq!(table.headers(), vec!["twitter_name", "type2", "0", "1"]);
    assert_eq!(table.ids(), &["x", "y", "z"]);
    assert_eq!(table.label(0), Some("news"));
    assert_eq!(table.label(1), Some("sport"));
    assert_eq!(table.label(2), None);

    let mut out = Vec::new();
    table.write_csv(&mut out).expect("in-memory write");
    let text = String::from_utf8(out).expect("utf-8 csv");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "twitter_name,type2,0,1");
    assert!(lines[1].starts_with("x,news,"));
    assert!(lines[3].starts_with("z,,"));
}

#[test]
fn test_csv_values_round_trip() {
    let (ca, _) = fitted();
    let table = CoordinateTable::rows(&ca, 2, "follower_id");
    let mut out = Vec::new();
    table.write_csv(&mut out).expect("in-memory write");

    let mut reader = csv::Reader::from_reader(out.as_slice());
    for (i, record) in reader.records().enumerate() {
        let record = record.expect("well-formed row");
        assert_eq!(&record[0], ca.row_labels[i]);
        let value: f64 = record[1].parse().expect("numeric cell");
        assert_eq!(value, ca.row_coordinates.get(i, 0));
    }
}

#[test]
fn test_inertia_table() {
    let (ca, _) = fitted();
    let inertia = InertiaTable::from_result(&ca);
    assert_eq!(inertia.rows.len(), 2);
    assert_eq!(inertia.rows[0].dimension, 1);
    assert!((inertia.rows[1].cumulative_percent - 100.0).abs() < 1e-8);

    let mut out = Vec::new();
    inertia.write_csv(&mut out).expect("in-memory write");
    let text = String::from_utf8(out).expect("utf-8 csv");
    assert!(text.starts_with("dimension,eigenvalue,percent,cumulative_percent\n1,"));
}

#[test]
fn test_unique_path_suffixes() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("run_row_coordinates.csv");
    assert_eq!(unique_path(&path), path);

    fs::write(&path, "taken").expect("write file");
    let first = unique_path(&path);
    assert_eq!(first, dir.path().join("run_row_coordinates_1.csv"));

    fs::write(&first, "taken").expect("write file");
    assert_eq!(
        unique_path(&path),
        dir.path().join("run_row_coordinates_2.csv")
    );
}

#[test]
fn test_unique_path_without_extension() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("coords");
    fs::write(&path, "taken").expect("write file");
    assert_eq!(unique_path(&path), dir.path().join("coords_1"));
}

#[test]
fn test_export_layout_and_no_overwrite() {
    let (ca, labels) = fitted();
    let dir = tempfile::tempdir().expect("temp dir");
    let options = ExportOptions::default();

    let first = export(&ca, &labels, dir.path(), "bondora", &options).expect("export");
    assert_eq!(first.directory, dir.path().join("bondora_coords"));
    assert_eq!(
        first.rows,
        first.directory.join("bondora_row_coordinates.csv")
    );
    assert!(first.rows.exists());
    assert!(first.columns.exists());
    assert!(first.inertia.exists());

    let columns = fs::read_to_string(&first.columns).expect("read columns");
    // Only two dimensions exist, so the 4-dimension export stops at 1
    assert!(columns.starts_with("twitter_name,type2,0,1\n"));

    let second = export(&ca, &labels, dir.path(), "bondora", &options).expect("export");
    assert_eq!(
        second.rows,
        first.directory.join("bondora_row_coordinates_1.csv")
    );

    let overwrite = ExportOptions {
        overwrite: true,
        ..ExportOptions::default()
    };
    let third = export(&ca, &labels, dir.path(), "bondora", &overwrite).expect("export");
    assert_eq!(third.rows, first.rows);
}

#[test]
fn test_export_without_label_join() {
    let (ca, labels) = fitted();
    let dir = tempfile::tempdir().expect("temp dir");
    let options = ExportOptions {
        label_column: None,
        ..ExportOptions::default()
    };
    let paths = export(&ca, &labels, dir.path(), "plain", &options).expect("export");
    let columns = fs::read_to_string(&paths.columns).expect("read columns");
    assert!(columns.starts_with("twitter_name,0,1\n"));
}

#[test]
fn test_export_rejects_bad_dataset_name() {
    let (ca, labels) = fitted();
    let dir = tempfile::tempdir().expect("temp dir");
    for name in ["", "../up", "a\\b"] {
        let err = export(&ca, &labels, dir.path(), name, &ExportOptions::default())
            .expect_err("invalid name");
        assert!(matches!(err, FollownetError::Validation { .. }));
    }
}

#[test]
fn test_failed_export_leaves_no_files() {
    let (ca, labels) = fitted();
    let dir = tempfile::tempdir().expect("temp dir");
    let directory = dir.path().join("broken_coords");
    // A directory where the column file would be staged makes that write fail
    fs::create_dir_all(directory.join(".broken_column_coordinates.csv.partial"))
        .expect("blocking dir");

    assert!(export(&ca, &labels, dir.path(), "broken", &ExportOptions::default()).is_err());
    assert!(!directory.join("broken_row_coordinates.csv").exists());
    assert!(!directory.join(".broken_row_coordinates.csv.partial").exists());
    assert!(!directory.join("broken_inertia.csv").exists());
}

#[test]
fn test_failed_overwrite_keeps_previous_export() {
    let (ca, labels) = fitted();
    let dir = tempfile::tempdir().expect("temp dir");
    let options = ExportOptions {
        overwrite: true,
        ..ExportOptions::default()
    };
    let first = export(&ca, &labels, dir.path(), "kept", &options).expect("export");
    let before = fs::read_to_string(&first.rows).expect("read rows");

    fs::create_dir_all(first.directory.join(".kept_inertia.csv.partial")).expect("blocking dir");
    let narrow = ExportOptions {
        dimensions: 1,
        ..options
    };
    assert!(export(&ca, &labels, dir.path(), "kept", &narrow).is_err());
    assert_eq!(fs::read_to_string(&first.rows).expect("read rows"), before);
    assert!(!first.directory.join(".kept_row_coordinates.csv.partial").exists());
}
