//! Device path helpers.
//!
//! Device paths are always `/`-rooted and `/`-separated, independent of the
//! host platform the device filesystem is mounted on.

pub const ROOT: &str = "/";

pub fn normalize(path: &str) -> String {
    let mut out = String::with_capacity(path.len() + 1);
    for part in path.split(['/', '\\']) {
        if part.is_empty() || part == "." {
            continue;
        }
        out.push('/');
        out.push_str(part);
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}

pub fn file_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

pub fn parent(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(0) | None => ROOT,
        Some(idx) => &trimmed[..idx],
    }
}

pub fn join(dir: &str, name: &str) -> String {
    let name = name.trim_matches('/');
    if dir.trim_end_matches('/').is_empty() {
        format!("/{name}")
    } else {
        format!("{}/{}", dir.trim_end_matches('/'), name)
    }
}

/// `path` equals `prefix` or lives below it.
pub fn is_within(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return path.starts_with('/');
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Re-roots `path` from `from` onto `to`. Returns `None` when `path` is not
/// within `from`.
pub fn rebase(path: &str, from: &str, to: &str) -> Option<String> {
    if !is_within(path, from) {
        return None;
    }
    let rest = &path[from.trim_end_matches('/').len()..];
    if rest.is_empty() {
        Some(to.to_string())
    } else {
        Some(format!("{}{}", to.trim_end_matches('/'), rest))
    }
}

pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
        && !name.trim().is_empty()
}
