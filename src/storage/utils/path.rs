// Id/path helpers for the OpenDAL backend, where an entry id is its storage path.

/// Id of the storage root.
pub const ROOT_ID: &str = "/";

/// Normalize a caller supplied id: no leading '/', root becomes `/`.
pub fn normalize_id(id: &str) -> String {
    let trimmed = id.trim_start_matches('/');
    if trimmed.is_empty() {
        ROOT_ID.to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn is_root(id: &str) -> bool {
    id.trim_matches('/').is_empty()
}

/// Return a new String that guarantees a trailing '/'.
pub fn ensure_trailing_slash(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{}/", path)
    }
}

/// Join a folder id and a child name. The root folder contributes no prefix.
pub fn join_id(folder_id: &str, name: &str) -> String {
    if is_root(folder_id) {
        name.to_string()
    } else {
        format!("{}{}", ensure_trailing_slash(folder_id), name)
    }
}

/// Extract a normalized basename from an id (folders lose their trailing '/').
pub fn basename(id: &str) -> String {
    id.trim_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Folder id containing `id`, or `None` for the root itself.
pub fn parent_id(id: &str) -> Option<String> {
    let trimmed = id.trim_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.rsplit_once('/') {
        Some((parent, _)) => Some(format!("{parent}/")),
        None => Some(ROOT_ID.to_string()),
    }
}

/// Extension of a file name including the dot, or `""`.
pub fn extension_of(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[idx..],
        _ => "",
    }
}

/// Path of `full_id` relative to the folder `base_id`.
pub fn relative_to(full_id: &str, base_id: &str) -> String {
    let base = ensure_trailing_slash(base_id.trim_start_matches('/'));
    let full = full_id.trim_start_matches('/');
    full.strip_prefix(base.as_str()).unwrap_or(full).to_string()
}
