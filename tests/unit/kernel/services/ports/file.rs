use super::*;

#[test]
fn test_file_handle_normalizes_path() {
    let handle = FileHandle::new("lib//util.py");
    assert_eq!(handle.full_path(), "/lib/util.py");
    assert_eq!(handle.name(), "util.py");
}

#[test]
fn test_file_error_display() {
    let err = FsError::NotFound("/main.py".to_string());
    assert!(err.to_string().contains("/main.py"));

    let err = FsError::from(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
    assert!(err.to_string().contains("boom"));
    assert!(std::error::Error::source(&err).is_some());
}
