use std::io::Write;

use covdiff::data::InstrumentationMode;
use covdiff::error::LoadError;
use covdiff::loader;

/// Load a report from disk and check the tree shape.
#[test]
fn load_fixture_from_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    std::fs::write(&path, include_bytes!("fixtures/sampling.json")).unwrap();

    let project = loader::load(&path).unwrap();
    assert_eq!(project.mode, Some(InstrumentationMode::Sampling));
    assert_eq!(project.class_count(), 2);
    assert!(project.contains_class("org.example.Foo"));
    assert!(project.contains_class("org.example.Bar"));
}

#[test]
fn load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = loader::load(&dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, LoadError::Io(_)));
}

#[test]
fn load_truncated_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("truncated.json");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(br#"{"classes": [{"name": "#).unwrap();
    drop(file);

    let err = loader::load(&path).unwrap_err();
    assert!(matches!(err, LoadError::Json(_)));
}

#[test]
fn load_pair_reads_both_sides() {
    let dir = tempfile::tempdir().unwrap();
    let path_a = dir.path().join("a.json");
    let path_b = dir.path().join("b.json");
    std::fs::write(&path_a, include_bytes!("fixtures/sampling.json")).unwrap();
    std::fs::write(&path_b, include_bytes!("fixtures/new_sampling.json")).unwrap();

    let (a, b) = loader::load_pair(&path_a, &path_b).unwrap();
    assert_eq!(a.mode, Some(InstrumentationMode::Sampling));
    assert_eq!(b.mode, Some(InstrumentationMode::NewSampling));
    assert_eq!(a.class_count(), b.class_count());
}
