//! Parsing of `qstat -j <job>` output.

use std::collections::BTreeMap;

/// Fields of one `qstat -j` report.
///
/// Repeated fields and continuation lines are joined with newlines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QstatInfo {
    fields: BTreeMap<String, String>,
}

/// Split `qstat -j` output into `(field, value)` pairs.
///
/// `===` separator lines and blank lines are skipped. A line starting with
/// whitespace continues the previous field.
pub fn parse_qstat_info(out: &str) -> Result<Vec<(String, String)>, String> {
    let mut field: Option<&str> = None;
    let mut entries = Vec::new();

    for line in out.lines() {
        if line.starts_with("===") || line.trim().is_empty() {
            continue;
        }
        let value = if line.starts_with(char::is_whitespace) {
            line
        } else {
            let colon = line
                .find(':')
                .filter(|&p| p > 0)
                .ok_or_else(|| format!("unexpected line: {}", line))?;
            field = Some(&line[..colon]);
            &line[colon + 1..]
        };
        let name = field.ok_or_else(|| format!("continuation without field: {}", line))?;
        entries.push((name.to_string(), value.trim().to_string()));
    }
    Ok(entries)
}

impl QstatInfo {
    /// Parse and collect a full `qstat -j` report.
    pub fn parse(out: &str) -> Result<Self, String> {
        let mut fields: BTreeMap<String, String> = BTreeMap::new();
        for (key, value) in parse_qstat_info(out)? {
            fields
                .entry(key)
                .and_modify(|existing| {
                    existing.push('\n');
                    existing.push_str(&value);
                })
                .or_insert_with(|| value.clone());
        }
        Ok(Self { fields })
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Working directory the job was submitted from.
    pub fn job_cwd(&self) -> Option<&str> {
        self.get("sge_o_workdir").or_else(|| self.get("cwd"))
    }

    /// Value of `name` in the `hard resource_list` field, e.g. `h_rt`.
    pub fn hard_resource(&self, name: &str) -> Option<&str> {
        self.get("hard resource_list")?
            .split([',', '\n'])
            .filter_map(|item| item.trim().split_once('='))
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }
}
