//! Shared formatting and parsing helpers.
//!
//! Byte counts, `h:m:s` durations and shortened paths are rendered the same
//! way by every labkit tool, so the helpers live here.

pub mod memory;
pub mod path;
pub mod time;

pub use memory::{byte_num_repr, human_size, human_size_with};
pub use path::{good_path_repr, GOOD_PATH_LEN};
pub use time::{parse_time, repr_time, repr_time_mins};

/// Filter helper for optional string fields.
/// Returns None if the string is empty after trimming.
pub fn non_empty_string(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
