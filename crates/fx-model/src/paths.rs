//! Workspace-relative path helpers

/// Normalize separators to `/`
#[inline]
#[must_use]
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Express `path` relative to `root`
///
/// Both sides are separator-normalized first. Paths outside `root` come back
/// normalized but otherwise unchanged.
///
/// # Examples
/// - `/ws/features/a.feature` under `/ws` → `features/a.feature`
/// - `features/a.feature` under `/ws` → `features/a.feature`
#[must_use]
pub fn relative_to_root(path: &str, root: &str) -> String {
    let path = normalize_separators(path);
    let root = normalize_separators(root);
    let root = root.trim_end_matches('/');

    if root.is_empty() {
        return path;
    }

    match path.strip_prefix(root) {
        Some(rest) if rest.is_empty() => String::new(),
        Some(rest) if rest.starts_with('/') => rest.trim_start_matches('/').to_string(),
        _ => path,
    }
}

/// Whether `path` looks absolute on either Unix or Windows
#[must_use]
pub fn is_absolute(path: &str) -> bool {
    if path.starts_with('/') || path.starts_with('\\') {
        return true;
    }
    match path.as_bytes() {
        [drive, b':', sep, ..] => drive.is_ascii_alphabetic() && matches!(sep, b'\\' | b'/'),
        _ => false,
    }
}
