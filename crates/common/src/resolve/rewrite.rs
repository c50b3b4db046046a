use crate::tree::ROOT_PATH;

/// Present a real path relative to a virtual root.
///
/// When `prefix` is a literal prefix of `path` it is stripped once, and an
///  empty remainder becomes `/`. Any other path comes back unchanged.
///
/// ```
/// use common::resolve::rewrite_path;
///
/// assert_eq!(rewrite_path("/public", "/public"), "/");
/// assert_eq!(rewrite_path("/public/test", "/public"), "/test");
/// assert_eq!(rewrite_path("/private/test", "/public"), "/private/test");
/// ```
pub fn rewrite_path(path: &str, prefix: &str) -> String {
    match path.strip_prefix(prefix) {
        Some("") => ROOT_PATH.to_string(),
        Some(rest) => rest.to_string(),
        None => path.to_string(),
    }
}

/// Whether `path` is `folder` itself or lies somewhere below it
pub fn is_within(path: &str, folder: &str) -> bool {
    let folder = folder.trim_end_matches('/');
    folder.is_empty()
        || path == folder
        || path
            .strip_prefix(folder)
            .is_some_and(|rest| rest.starts_with('/'))
}
