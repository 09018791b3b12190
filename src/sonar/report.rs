/// Key under which the scanner records the compute-engine task URL
pub const CE_TASK_URL_KEY: &str = "ceTaskUrl";

/// Parsed `report-task.txt` written by the scanner.
///
/// Each line is `key=value` (or `key: value`); the line is split at whichever
/// separator comes first, so URLs in values keep their own `:` characters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportTask {
    entries: Vec<(String, String)>,
}

impl ReportTask {
    pub fn parse(content: &str) -> Self {
        let entries = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| {
                let idx = line.find(['=', ':'])?;
                let key = line[..idx].trim();
                let value = line[idx + 1..].trim();
                Some((key.to_string(), value.to_string()))
            })
            .collect();

        Self { entries }
    }

    /// Value for `key`; when a key repeats, the last line wins.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn ce_task_url(&self) -> Option<&str> {
        self.get(CE_TASK_URL_KEY).filter(|url| !url.is_empty())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
