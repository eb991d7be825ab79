use super::*;
use chrono::TimeZone;
use tempfile::TempDir;

fn fixed_time() -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2024, 3, 9, 14, 5, 7)
        .single()
        .expect("unambiguous local time")
}

#[test]
fn creates_timestamped_directory_with_note() {
    let temp = TempDir::new().expect("temp dir");
    let root = temp.path().join("backups");

    let backup = create_backup_at(&root, &[], fixed_time()).expect("backup should be created");

    assert_eq!(backup.timestamp, "20240309-140507");
    assert_eq!(backup.dir, root.join("20240309-140507"));
    let note = std::fs::read_to_string(backup.dir.join("README.txt")).expect("note");
    assert_eq!(
        note,
        "Backup created at 20240309-140507\nUse git to restore if needed\n"
    );
}

#[test]
fn copies_existing_files_and_skips_missing_ones() {
    let temp = TempDir::new().expect("temp dir");
    let source = temp.path().join("pkg").join("app.py");
    std::fs::create_dir_all(source.parent().expect("parent")).expect("mkdir");
    std::fs::write(&source, "x = 1\n").expect("write source");
    let missing = temp.path().join("gone.py");

    let backup = create_backup_at(&temp.path().join("b"), &[source.clone(), missing], fixed_time())
        .expect("backup should be created");

    let copy = backup.dir.join(relative_backup_path(&source));
    assert!(copy.starts_with(&backup.dir));
    assert_eq!(std::fs::read_to_string(copy).expect("copy"), "x = 1\n");
}

#[test]
fn relative_path_never_escapes() {
    assert_eq!(relative_backup_path(Path::new("../a/./b.py")), PathBuf::from("a/b.py"));
    assert_eq!(relative_backup_path(Path::new("/srv/app.py")), PathBuf::from("srv/app.py"));
}
