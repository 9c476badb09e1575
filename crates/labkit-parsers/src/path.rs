//! Short path rendering for tabular output.

/// Default minimum length of a rendered path.
pub const GOOD_PATH_LEN: usize = 5;

/// Render the shortest trailing part of `path` that is at least `good_len`
/// characters long, never growing past `good_len` once the last component
/// alone is shorter.
pub fn good_path_repr(path: Option<&str>, good_len: usize) -> String {
    let path = match path {
        None => return "<None>".to_string(),
        Some("") => return "<Empty>".to_string(),
        Some(p) => p,
    };

    let mut components: Vec<&str> = path.split('/').collect();
    let mut repr = components.pop().unwrap_or_default().to_string();
    while let Some(parent) = components.last() {
        if repr.len() >= good_len {
            break;
        }
        let candidate = format!("{}/{}", parent, repr);
        if candidate.len() > good_len {
            break;
        }
        repr = candidate;
        components.pop();
    }
    repr
}
