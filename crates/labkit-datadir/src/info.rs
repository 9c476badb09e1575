//! Setup info files and the settings they carry.

use crate::context::DataDirError;
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

/// Name of the per-setup settings file, looked up from the current directory
/// upwards.
pub const INFO_FILE_NAME: &str = "setup-data-dir-info.toml";

/// Settings that an info file may override.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Root of the per-user work directories.
    pub workdir_base: Utf8PathBuf,
    /// Dataset linked as `data-common`.
    pub dataset: Utf8PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            workdir_base: Utf8PathBuf::from("/tmp"),
            dataset: Utf8PathBuf::from("/tmp/dataset"),
        }
    }
}

/// Look for [`INFO_FILE_NAME`] in `current` and its ancestors up to and
/// including `base`.
pub fn find_info_file(base: &Utf8Path, current: &Utf8Path) -> Option<Utf8PathBuf> {
    find_info_file_with(base, current, |path| path.exists())
}

/// Like [`find_info_file`], probing candidates with `exists`.
///
/// Returns None without probing anything if `current` is not inside `base`.
/// `base` itself is the last directory probed.
pub fn find_info_file_with<F>(
    base: &Utf8Path,
    current: &Utf8Path,
    mut exists: F,
) -> Option<Utf8PathBuf>
where
    F: FnMut(&Utf8Path) -> bool,
{
    if base.as_str().is_empty()
        || current.strip_prefix(base).is_err()
        || current
            .components()
            .any(|c| matches!(c, Utf8Component::ParentDir))
    {
        return None;
    }

    for dir in current.ancestors() {
        let candidate = dir.join(INFO_FILE_NAME);
        if exists(&candidate) {
            return Some(candidate);
        }
        if dir == base {
            break;
        }
    }
    None
}

/// Parse an info file on top of the default settings.
pub fn load_settings(path: &Utf8Path) -> Result<Settings, DataDirError> {
    let content = std::fs::read_to_string(path).map_err(|source| DataDirError::Io {
        path: path.to_owned(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| DataDirError::Config {
        path: path.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_finds_nearest_ancestor() {
        let found = find_info_file_with(
            Utf8Path::new("/a/b"),
            Utf8Path::new("/a/b/c/d"),
            |p| p.as_str() == "/a/b/c/setup-data-dir-info.toml",
        );
        assert_eq!(
            found,
            Some(Utf8PathBuf::from("/a/b/c/setup-data-dir-info.toml"))
        );
    }

    #[test]
    fn test_prefers_deepest_match() {
        let found = find_info_file_with(Utf8Path::new("/a/b"), Utf8Path::new("/a/b/c/d"), |p| {
            p.as_str() == "/a/b/setup-data-dir-info.toml"
                || p.as_str() == "/a/b/c/d/setup-data-dir-info.toml"
        });
        assert_eq!(
            found,
            Some(Utf8PathBuf::from("/a/b/c/d/setup-data-dir-info.toml"))
        );
    }

    #[test]
    fn test_probes_stop_at_base() {
        let mut probed = Vec::new();
        let found = find_info_file_with(Utf8Path::new("/a/b"), Utf8Path::new("/a/b/c/d"), |p| {
            probed.push(p.to_owned());
            false
        });
        assert_eq!(found, None);
        assert_eq!(
            probed,
            vec![
                Utf8PathBuf::from("/a/b/c/d/setup-data-dir-info.toml"),
                Utf8PathBuf::from("/a/b/c/setup-data-dir-info.toml"),
                Utf8PathBuf::from("/a/b/setup-data-dir-info.toml"),
            ]
        );
    }

    #[test]
    fn test_current_equal_to_base() {
        let mut probed = Vec::new();
        find_info_file_with(Utf8Path::new("/a/b"), Utf8Path::new("/a/b"), |p| {
            probed.push(p.to_owned());
            false
        });
        assert_eq!(
            probed,
            vec![Utf8PathBuf::from("/a/b/setup-data-dir-info.toml")]
        );
    }

    #[test]
    fn test_outside_base_probes_nothing() {
        let mut probes = 0;
        for current in ["/a/bc/d", "/x/y", "/a/b/../c"] {
            let found = find_info_file_with(Utf8Path::new("/a/b"), Utf8Path::new(current), |_| {
                probes += 1;
                true
            });
            assert_eq!(found, None, "{}", current);
        }
        assert_eq!(probes, 0);
    }

    #[test]
    fn test_find_info_file_on_disk() {
        let temp = TempDir::new().unwrap();
        let base = Utf8Path::from_path(temp.path()).unwrap();
        let current = base.join("exp/run");
        std::fs::create_dir_all(&current).unwrap();

        assert_eq!(find_info_file(base, &current), None);

        std::fs::write(base.join("exp").join(INFO_FILE_NAME), "").unwrap();
        assert_eq!(
            find_info_file(base, &current),
            Some(base.join("exp").join(INFO_FILE_NAME))
        );
    }

    #[test]
    fn test_load_settings() {
        let temp = TempDir::new().unwrap();
        let path = Utf8Path::from_path(temp.path()).unwrap().join(INFO_FILE_NAME);

        std::fs::write(&path, "workdir_base = \"/work/scratch\"\n").unwrap();
        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.workdir_base, "/work/scratch");
        assert_eq!(settings.dataset, "/tmp/dataset");

        std::fs::write(&path, "").unwrap();
        assert_eq!(load_settings(&path).unwrap(), Settings::default());

        std::fs::write(&path, "workdir_base = [1, 2]\n").unwrap();
        assert!(matches!(
            load_settings(&path),
            Err(DataDirError::Config { .. })
        ));
    }
}
