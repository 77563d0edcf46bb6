use super::*;

#[test]
fn test_layout_storage_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let storage = LayoutStorage::new(dir.path().join("state").join(LAYOUT_FILE));

    assert_eq!(storage.load().unwrap(), None);
    storage.save("{\"layout\":{}}").unwrap();
    assert_eq!(storage.load().unwrap().as_deref(), Some("{\"layout\":{}}"));
    assert!(!storage.path().with_extension("json.tmp").exists());

    storage.clear().unwrap();
    assert_eq!(storage.load().unwrap(), None);
    storage.clear().unwrap();
}

#[test]
fn test_log_and_layout_paths_share_app_dir() {
    if let (Some(log), Some(layout)) = (get_log_dir(), get_layout_path()) {
        assert_eq!(log.parent(), layout.parent());
        assert!(log.ends_with(LOG_DIR));
    }
}
