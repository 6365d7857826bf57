use std::fs;

use tracker_engine::{ensure_dir, AtomicFileWriter, PersistError, EXPORT_FILENAME};

fn entries(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn nested_export_dir_is_created() {
    let temp = tempfile::tempdir().unwrap();
    let dir = temp.path().join("exports").join("2024");
    ensure_dir(&dir).unwrap();
    assert!(dir.is_dir());
    ensure_dir(&dir).unwrap();
}

#[test]
fn rewrite_leaves_only_target() {
    let temp = tempfile::tempdir().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let path = writer.write(EXPORT_FILENAME, b"first export").unwrap();
    let again = writer.write(EXPORT_FILENAME, b"second").unwrap();

    assert_eq!(path, again);
    assert_eq!(fs::read(&path).unwrap(), b"second");
    assert_eq!(entries(temp.path()), vec![EXPORT_FILENAME.to_string()]);
}

#[test]
fn file_in_place_of_dir_is_a_directory_error() {
    let temp = tempfile::tempdir().unwrap();
    let blocker = temp.path().join("exports");
    fs::write(&blocker, "x").unwrap();

    let err = AtomicFileWriter::new(blocker.clone())
        .write(EXPORT_FILENAME, b"data")
        .unwrap_err();
    assert!(matches!(err, PersistError::Directory(_)));
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "x");
}
