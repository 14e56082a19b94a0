use lazy_static::lazy_static;
use regex::Regex;

use crate::process::ProcessRecord;

/// NT device specifier some Windows APIs put in front of executable paths
pub const DEVICE_PREFIX: &str = r"\??\";

lazy_static! {
    static ref CELLS_PROCESS: Regex = Regex::new(r"(?i-u)^(cells|cells-enterprise)$").unwrap();
}

/// A process ready to be shown in the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayItem {
    pub label: String,
    pub description: String,
    pub detail: String,
    /// What the picker resolves to when this item is chosen
    pub payload: String,
    pub sort_key: u32,
}

impl DisplayItem {
    /// Build the picker entry for `record`, or `None` if it is not a cells process.
    pub fn from_record(record: &ProcessRecord) -> Option<Self> {
        let name = executable_name(strip_device_prefix(&record.command));
        if !is_cells_process(name) {
            return None;
        }

        Some(Self {
            label: name.to_string(),
            description: format!("process id: {}", record.pid),
            detail: visible_args(&record.args),
            payload: record.pid.to_string(),
            sort_key: record.pid,
        })
    }

    /// Case-insensitive substring match on what the user sees.
    pub fn matches(&self, filter: &str, on_description: bool, on_detail: bool) -> bool {
        let filter = filter.to_lowercase();
        let contains = |text: &str| text.to_lowercase().contains(&filter);

        contains(&self.label)
            || (on_description && contains(&self.description))
            || (on_detail && contains(&self.detail))
    }
}

impl std::fmt::Display for DisplayItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}    {}", self.label, self.description)?;
        if !self.detail.is_empty() {
            write!(f, "    {}", self.detail)?;
        }
        Ok(())
    }
}

pub fn strip_device_prefix(command: &str) -> &str {
    command.strip_prefix(DEVICE_PREFIX).unwrap_or(command)
}

/// Last path component with a trailing `.exe` removed. Both `/` and `\` separate.
pub fn executable_name(command: &str) -> &str {
    let trimmed = command.trim_end_matches(['/', '\\']);
    let base = match trimmed.rfind(['/', '\\']) {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    };

    match base.strip_suffix(".exe") {
        Some(stem) if !stem.is_empty() => stem,
        _ => base,
    }
}

pub fn is_cells_process(executable_name: &str) -> bool {
    CELLS_PROCESS.is_match(executable_name)
}

/// Arguments with every `--flag` token dropped.
pub fn visible_args(args: &str) -> String {
    args.split(' ')
        .filter(|token| !token.starts_with("--"))
        .collect::<Vec<&str>>()
        .join(" ")
}

/// Filter and format `records`, sorted by process id.
pub fn display_items<'a, I>(records: I) -> Vec<DisplayItem>
where
    I: IntoIterator<Item = &'a ProcessRecord>,
{
    let mut items = records
        .into_iter()
        .filter_map(DisplayItem::from_record)
        .collect::<Vec<DisplayItem>>();
    items.sort_by_key(|item| item.sort_key);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::tests::record;
    use rstest::rstest;

    #[rstest]
    #[case(r"\??\C:\bin\cells.exe", "cells")]
    #[case(r"C:\Program Files\Cells\cells-enterprise.exe", "cells-enterprise")]
    #[case("/usr/local/bin/cells", "cells")]
    #[case("/opt/cells/bin/", "bin")]
    #[case("cells.EXE", "cells.EXE")]
    #[case(".exe", ".exe")]
    #[case("", "")]
    fn test_executable_name(#[case] command: &str, #[case] expected: &str) {
        assert_eq!(executable_name(strip_device_prefix(command)), expected);
    }

    #[test]
    fn test_device_prefix_only_stripped_at_start() {
        assert_eq!(strip_device_prefix(r"\??\\??\cells"), r"\??\cells");
        assert_eq!(strip_device_prefix(r"C:\??\cells"), r"C:\??\cells");
        assert_eq!(strip_device_prefix("/usr/bin/cells"), "/usr/bin/cells");
    }

    #[rstest]
    #[case("cells", true)]
    #[case("CELLS", true)]
    #[case("Cells-Enterprise", true)]
    #[case("cells-enterprise", true)]
    #[case("cellsd", false)]
    #[case("my-cells", false)]
    #[case("cells-enterprise-2", false)]
    #[case("enterprise", false)]
    #[case("", false)]
    #[case("cell\u{17f}", false)]
    #[case("cells-enterpri\u{17f}e", false)]
    fn test_is_cells_process(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_cells_process(name), expected);
    }

    #[rstest]
    #[case("--port 9229 --inspect foo.js", "9229 foo.js")]
    #[case("", "")]
    #[case("serve -c config.yml", "serve -c config.yml")]
    #[case("--verbose", "")]
    #[case("a  b", "a  b")]
    fn test_visible_args(#[case] args: &str, #[case] expected: &str) {
        assert_eq!(visible_args(args), expected);
    }

    #[test]
    fn test_from_record() {
        let item = DisplayItem::from_record(&record(
            4242,
            r"\??\C:\bin\cells.exe",
            "--log-level debug serve",
        ))
        .unwrap();

        assert_eq!(
            item,
            DisplayItem {
                label: "cells".to_string(),
                description: "process id: 4242".to_string(),
                detail: "debug serve".to_string(),
                payload: "4242".to_string(),
                sort_key: 4242,
            }
        );
    }

    #[test]
    fn test_from_record_discards_other_processes() {
        assert_eq!(
            DisplayItem::from_record(&record(1, "/usr/bin/bash", "-l")),
            None
        );
    }

    #[test]
    fn test_display_items_sorted_by_pid() {
        let records = vec![
            record(300, "/usr/bin/cells", "start"),
            record(12, "/usr/bin/node", "server.js"),
            record(50, "/usr/bin/cells-enterprise", ""),
            record(7000, "/usr/bin/CELLS", "--debug"),
        ];

        let items = display_items(&records);
        assert_eq!(
            items.iter().map(|i| i.sort_key).collect::<Vec<_>>(),
            vec![50, 300, 7000]
        );
        assert!(items.iter().all(|i| is_cells_process(&i.label)));
        assert!(items.iter().all(|i| i.payload == i.sort_key.to_string()));
    }

    #[test]
    fn test_matches() {
        let item = DisplayItem::from_record(&record(81, "/bin/cells", "serve ./data")).unwrap();

        assert!(item.matches("CELL", false, false));
        assert!(item.matches("id: 81", true, false));
        assert!(!item.matches("id: 81", false, true));
        assert!(item.matches("data", false, true));
        assert!(!item.matches("data", true, false));
        assert!(item.matches("", false, false));
    }

    #[test]
    fn test_display() {
        let with_detail = DisplayItem::from_record(&record(7, "/bin/cells", "serve")).unwrap();
        assert_eq!(with_detail.to_string(), "cells    process id: 7    serve");

        let without = DisplayItem::from_record(&record(8, "/bin/cells", "")).unwrap();
        assert_eq!(without.to_string(), "cells    process id: 8");
    }
}
