//! URL path helpers shared by the registry and the compiler.

/// Marks a path segment as a parameter token (`/users/:id`)
pub const TOKEN_PREFIX: char = ':';

/// Normalize a path to a single leading slash, no trailing slash and no
/// empty segments. The empty path and `/` both normalize to `/`.
pub fn normalize_path(path: &str) -> String {
    join_paths(&[path])
}

/// Join path fragments left to right, de-duplicating slashes.
///
/// ```
/// use swagger_from_annotations::paths::join_paths;
///
/// assert_eq!(join_paths(&["/a/", "b", "/c"]), "/a/b/c");
/// assert_eq!(join_paths(&["/", ""]), "/");
/// ```
pub fn join_paths(fragments: &[&str]) -> String {
    let segments: Vec<&str> = fragments
        .iter()
        .flat_map(|fragment| fragment.split('/'))
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect();

    format!("/{}", segments.join("/"))
}

/// Names of the `:token` segments of a path, in order of appearance
pub fn params_from_path(path: &str) -> Vec<String> {
    path.split('/')
        .filter_map(|segment| segment.strip_prefix(TOKEN_PREFIX))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Convert `:token` segments into Swagger `{token}` templates
pub fn to_template(path: &str) -> String {
    path.split('/')
        .map(|segment| match segment.strip_prefix(TOKEN_PREFIX) {
            Some(name) if !name.is_empty() => format!("{{{}}}", name),
            _ => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}
