use std::fs;

use shifting_maze_core::UnlockProgress;
use shifting_maze_persistence::{PersistenceError, SaveFile};
use tempfile::TempDir;

#[test]
fn missing_file_yields_default_progress() {
    let dir = TempDir::new().expect("temp dir");
    let save = SaveFile::new(dir.path().join("save.json"));

    assert_eq!(save.load().expect("load succeeds"), UnlockProgress::default());
    assert!(!save.path().exists(), "loading never creates the file");
}

#[test]
fn saved_progress_is_reloaded() {
    let dir = TempDir::new().expect("temp dir");
    let save = SaveFile::new(dir.path().join("nested").join("save.json"));

    save.save(&UnlockProgress::new(3)).expect("save succeeds");

    assert_eq!(save.load().expect("load succeeds"), UnlockProgress::new(3));
    assert!(
        !dir.path().join("nested").join("save.json.tmp").exists(),
        "temporary file is renamed into place"
    );
}

#[test]
fn save_file_uses_four_space_indentation() {
    let dir = TempDir::new().expect("temp dir");
    let save = SaveFile::new(dir.path().join("save.json"));

    save.save(&UnlockProgress::new(2)).expect("save succeeds");

    let contents = fs::read_to_string(save.path()).expect("file is readable");
    assert_eq!(contents, "{\n    \"unlocked_stage\": 2\n}\n");
}

#[test]
fn missing_field_and_zero_fall_back_to_first_stage() {
    let dir = TempDir::new().expect("temp dir");
    let save = SaveFile::new(dir.path().join("save.json"));

    fs::write(save.path(), "{}").expect("file is written");
    assert_eq!(save.load().expect("load succeeds").unlocked_stage(), 1);

    fs::write(save.path(), "{\"unlocked_stage\": 0}").expect("file is written");
    assert_eq!(save.load().expect("load succeeds").unlocked_stage(), 1);
}

#[test]
fn corrupt_file_is_reported() {
    let dir = TempDir::new().expect("temp dir");
    let save = SaveFile::new(dir.path().join("save.json"));
    fs::write(save.path(), "not json").expect("file is written");

    assert!(matches!(save.load(), Err(PersistenceError::Json { .. })));
}
