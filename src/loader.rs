//! Loader for persisted coverage reports.
//!
//! A report is a JSON document describing one instrumented run:
//!
//! ```json
//! {
//!   "mode": "sampling",
//!   "classes": [
//!     {
//!       "name": "org.example.Foo",
//!       "lines": [
//!         {
//!           "line": 12,
//!           "hits": 3,
//!           "jumps": [{ "true_hits": 3, "false_hits": 0 }],
//!           "switches": [{ "case_hits": [1, 0, 2] }]
//!         }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Jumps and switches are keyed by their position in the arrays. The loader
//! validates structural invariants (unique class names, unique positive line
//! numbers per class) so that downstream diffing can assume a well-formed
//! tree.

use std::path::Path;

use serde::Deserialize;

use crate::data::{InstrumentationMode, JumpData, LineData, ProjectData, SwitchData};
use crate::error::{LoadError, Result};

// Raw shapes mirroring the JSON document. Classes and lines are arrays, not
// maps, so duplicates survive deserialization and can be rejected here.

#[derive(Deserialize)]
struct RawReport {
    #[serde(default)]
    mode: Option<InstrumentationMode>,
    classes: Vec<RawClass>,
}

#[derive(Deserialize)]
struct RawClass {
    name: String,
    #[serde(default)]
    lines: Vec<RawLine>,
}

#[derive(Deserialize)]
struct RawLine {
    line: u32,
    hits: u64,
    #[serde(default)]
    jumps: Vec<RawJump>,
    #[serde(default)]
    switches: Vec<RawSwitch>,
}

#[derive(Deserialize)]
struct RawJump {
    true_hits: u64,
    false_hits: u64,
}

#[derive(Deserialize)]
struct RawSwitch {
    case_hits: Vec<u64>,
}

/// Read and parse a report file.
pub fn load(path: &Path) -> Result<ProjectData> {
    let content = std::fs::read(path)?;
    parse(&content)
}

/// Parse report bytes into a validated coverage tree.
pub fn parse(input: &[u8]) -> Result<ProjectData> {
    let raw: RawReport = serde_json::from_slice(input)?;

    let mut project = ProjectData::new();
    project.mode = raw.mode;

    for class in raw.classes {
        if class.name.is_empty() {
            return Err(LoadError::Malformed("Empty class name".to_string()));
        }
        if project.contains_class(&class.name) {
            return Err(LoadError::Malformed(format!(
                "Duplicate class: '{}'",
                class.name
            )));
        }

        let class_data = project.get_or_create_class(&class.name);
        for line in class.lines {
            if line.line == 0 {
                return Err(LoadError::Malformed(format!(
                    "Class '{}' has a line number 0; line numbers start at 1",
                    class_data.name
                )));
            }
            if class_data.get_line(line.line).is_some() {
                return Err(LoadError::Malformed(format!(
                    "Class '{}' has duplicate entries for line {}",
                    class_data.name, line.line
                )));
            }

            let mut line_data = LineData::new(line.line, line.hits);
            line_data.jumps = line
                .jumps
                .into_iter()
                .map(|j| JumpData::new(j.true_hits, j.false_hits))
                .collect();
            line_data.switches = line
                .switches
                .into_iter()
                .map(|s| SwitchData::new(s.case_hits))
                .collect();
            class_data.add_line(line_data);
        }
    }

    Ok(project)
}

/// Convenience for loading both sides of a comparison.
pub fn load_pair(path_a: &Path, path_b: &Path) -> Result<(ProjectData, ProjectData)> {
    Ok((load(path_a)?, load(path_b)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::LineStatus;

    #[test]
    fn test_parse_report() {
        let input = include_bytes!("../tests/fixtures/sampling.json");
        let project = parse(input).unwrap();

        assert_eq!(project.mode, Some(InstrumentationMode::Sampling));
        assert_eq!(project.class_count(), 2);

        let foo = project.get_class("org.example.Foo").unwrap();
        let line = foo.get_line(12).unwrap();
        assert_eq!(line.hits, 3);
        assert_eq!(line.jumps.len(), 1);
        assert_eq!(line.jumps[0].outcome(), (true, false));
        assert_eq!(line.status(), LineStatus::Partial);

        let bar = project.get_class("org.example.Bar").unwrap();
        assert_eq!(bar.line_numbers().count(), 2);
        assert_eq!(bar.get_line(4).unwrap().status(), LineStatus::None);
    }

    #[test]
    fn test_parse_no_mode() {
        let project = parse(br#"{"classes": []}"#).unwrap();
        assert_eq!(project.mode, None);
        assert_eq!(project.class_count(), 0);
    }

    #[test]
    fn test_parse_duplicate_class() {
        let input = br#"{"classes": [{"name": "A"}, {"name": "A"}]}"#;
        let err = parse(input).unwrap_err();
        assert!(matches!(err, LoadError::Malformed(_)));
        assert!(err.to_string().contains("Duplicate class"));
    }

    #[test]
    fn test_parse_duplicate_line() {
        let input = br#"{"classes": [{"name": "A", "lines": [
            {"line": 3, "hits": 1},
            {"line": 3, "hits": 2}
        ]}]}"#;
        let err = parse(input).unwrap_err();
        assert!(err.to_string().contains("duplicate entries for line 3"));
    }

    #[test]
    fn test_parse_line_zero() {
        let input = br#"{"classes": [{"name": "A", "lines": [{"line": 0, "hits": 1}]}]}"#;
        let err = parse(input).unwrap_err();
        assert!(err.to_string().contains("line number 0"));
    }

    #[test]
    fn test_parse_negative_hits_rejected() {
        // Hit counts are non-negative by construction; serde rejects -1.
        let input = br#"{"classes": [{"name": "A", "lines": [{"line": 1, "hits": -1}]}]}"#;
        assert!(matches!(parse(input).unwrap_err(), LoadError::Json(_)));
    }

    #[test]
    fn test_parse_not_json() {
        assert!(matches!(parse(b"not json").unwrap_err(), LoadError::Json(_)));
    }
}
