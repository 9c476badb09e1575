//! Parsing of `key value` statistics files such as cgroup `memory.stat`.

use camino::{Utf8Path, Utf8PathBuf};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed statistics line: {0:?}")]
    Parse(String),
    #[error("Key {key} not found in {path}")]
    MissingKey { key: String, path: Utf8PathBuf },
}

/// Parse whitespace-separated `key value` lines into a map.
///
/// Blank lines are skipped. Any other line must have exactly two fields with
/// an unsigned integer value.
pub fn parse_stat(content: &str) -> Result<HashMap<String, u64>, StatError> {
    let mut stats = HashMap::new();
    for line in content.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.as_slice() {
            [] => continue,
            [key, value] => {
                let value = value
                    .parse()
                    .map_err(|_| StatError::Parse(line.to_string()))?;
                stats.insert(key.to_string(), value);
            }
            _ => return Err(StatError::Parse(line.to_string())),
        }
    }
    Ok(stats)
}

/// Read `path` and return the value stored under `key`.
pub async fn read_stat_value(path: &Utf8Path, key: &str) -> Result<u64, StatError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| StatError::Io {
            path: path.to_owned(),
            source,
        })?;
    parse_stat(&content)?
        .get(key)
        .copied()
        .ok_or_else(|| StatError::MissingKey {
            key: key.to_string(),
            path: path.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MEMORY_STAT: &str = "cache 11492564992
rss 1930993664
rss_huge 0
mapped_file 306728960
total_cache 11492564992
total_rss 1930993664
";

    #[test]
    fn test_parse_stat() {
        let stats = parse_stat(MEMORY_STAT).unwrap();
        assert_eq!(stats.len(), 6);
        assert_eq!(stats["total_rss"], 1_930_993_664);
        assert_eq!(stats["rss_huge"], 0);
    }

    #[test]
    fn test_parse_stat_skips_blank_lines() {
        let stats = parse_stat("total_rss 10\n\n  \nrss 5\n").unwrap();
        assert_eq!(stats["total_rss"], 10);
        assert_eq!(stats["rss"], 5);
    }

    #[test]
    fn test_parse_stat_malformed() {
        assert!(matches!(
            parse_stat("total_rss ten"),
            Err(StatError::Parse(_))
        ));
        assert!(matches!(
            parse_stat("total_rss 1 2"),
            Err(StatError::Parse(_))
        ));
        assert!(matches!(parse_stat("total_rss"), Err(StatError::Parse(_))));
        assert!(matches!(
            parse_stat("total_rss -4"),
            Err(StatError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_read_stat_value() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MEMORY_STAT.as_bytes()).unwrap();
        let path = Utf8Path::from_path(file.path()).unwrap();

        assert_eq!(read_stat_value(path, "total_rss").await.unwrap(), 1_930_993_664);
        assert!(matches!(
            read_stat_value(path, "total_swap").await,
            Err(StatError::MissingKey { .. })
        ));
    }

    #[tokio::test]
    async fn test_read_stat_value_missing_file() {
        let result = read_stat_value(Utf8Path::new("/nonexistent/memory.stat"), "total_rss").await;
        assert!(matches!(result, Err(StatError::Io { .. })));
    }
}
