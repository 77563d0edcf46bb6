use super::*;
use tempfile::tempdir;

fn block_on<T>(future: FsFuture<T>) -> Result<T> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

#[test]
fn test_resolve_rejects_parent_components() {
    let gateway = LocalGateway::new("/mnt/board");
    assert_eq!(
        gateway.resolve("/lib//util.py").unwrap(),
        PathBuf::from("/mnt/board/lib/util.py")
    );
    assert!(matches!(
        gateway.resolve("/../etc/passwd"),
        Err(FsError::InvalidPath(_))
    ));
    assert_eq!(
        gateway
            .to_device_path(Path::new("/mnt/board/lib/util.py"))
            .as_deref(),
        Some("/lib/util.py")
    );
    assert_eq!(gateway.to_device_path(Path::new("/tmp/x")), None);
}

#[test]
fn test_create_read_write_list() {
    let dir = tempdir().unwrap();
    let gateway = LocalGateway::new(dir.path());

    block_on(gateway.folder_create("/lib")).unwrap();
    block_on(gateway.file_create("/lib/util.py")).unwrap();
    block_on(gateway.file_write_text("/main.py", "print(1)\n".to_string())).unwrap();

    assert_eq!(block_on(gateway.file_read_text("/main.py")).unwrap(), "print(1)\n");
    assert_eq!(block_on(gateway.file_read_text("/lib/util.py")).unwrap(), "");
    assert!(block_on(gateway.entry_exists("/lib")).unwrap());
    assert!(!block_on(gateway.entry_exists("/nope.py")).unwrap());

    let mut entries = block_on(gateway.folder_get_content("/")).unwrap();
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    assert_eq!(
        entries,
        vec![
            DirEntryInfo {
                name: "lib".to_string(),
                is_dir: true
            },
            DirEntryInfo {
                name: "main.py".to_string(),
                is_dir: false
            },
        ]
    );
}

#[test]
fn test_create_existing_is_conflict() {
    let dir = tempdir().unwrap();
    let gateway = LocalGateway::new(dir.path());
    block_on(gateway.file_create("/a.py")).unwrap();
    assert!(matches!(
        block_on(gateway.file_create("/a.py")),
        Err(FsError::AlreadyExists(_))
    ));
}

#[test]
fn test_rename_copy_move_remove() {
    let dir = tempdir().unwrap();
    let gateway = LocalGateway::new(dir.path());
    block_on(gateway.folder_create("/pkg")).unwrap();
    block_on(gateway.file_write_text("/a.py", "x".to_string())).unwrap();

    block_on(gateway.entry_rename("/a.py", "/b.py")).unwrap();
    assert!(!dir.path().join("a.py").exists());

    block_on(gateway.entry_copy("/b.py", "/c.py")).unwrap();
    assert_eq!(std::fs::read_to_string(dir.path().join("c.py")).unwrap(), "x");

    let moved = block_on(gateway.entry_move("/c.py", "/pkg")).unwrap();
    assert_eq!(moved, "/pkg/c.py");
    assert!(dir.path().join("pkg/c.py").exists());

    block_on(gateway.entry_copy("/pkg", "/pkg2")).unwrap();
    assert!(dir.path().join("pkg2/c.py").exists());

    block_on(gateway.entry_remove("/pkg")).unwrap();
    assert!(!dir.path().join("pkg").exists());
    assert!(matches!(
        block_on(gateway.entry_remove("/pkg")),
        Err(FsError::NotFound(_))
    ));
    assert!(matches!(
        block_on(gateway.entry_remove("/")),
        Err(FsError::InvalidPath(_))
    ));
}

#[test]
fn test_read_errors() {
    let dir = tempdir().unwrap();
    let gateway = LocalGateway::new(dir.path());
    block_on(gateway.folder_create("/lib")).unwrap();
    assert!(matches!(
        block_on(gateway.file_read_text("/missing.py")),
        Err(FsError::NotFound(_))
    ));
    assert!(matches!(
        block_on(gateway.file_read_text("/lib")),
        Err(FsError::NotAFile(_))
    ));
    assert!(matches!(
        block_on(gateway.entry_move("/lib", "/lib")),
        Err(FsError::InvalidPath(_))
    ));
}
