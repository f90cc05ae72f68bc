//! Structural differencing of two coverage trees.
//!
//! The engine walks two `ProjectData` trees level by level (classes, lines,
//! jumps, switches), matching entities by stable key at each level and
//! recursing into matched pairs. Differences are collected as data into a
//! [`DiffReport`]; the engine never short-circuits, so one comparison reports
//! every discrepancy.
//!
//! Comparison is by *derived* coverage outcome, not raw hit counts: two
//! instrumentation strategies over the same execution legitimately produce
//! different counts, and only the NONE/PARTIAL/FULL status and the
//! taken/not-taken branch outcomes must agree.

use std::collections::BTreeSet;

use crate::data::{ClassData, LineData, LineStatus, ProjectData};

// ---------------------------------------------------------------------------
// Entity matcher
// ---------------------------------------------------------------------------

/// The union of two key sets at one tree level, partitioned into keys present
/// on both sides, only on side A, and only on side B. All three lists are
/// sorted so downstream diff output is deterministic.
#[derive(Debug)]
pub struct KeyPartition<K> {
    pub matched: Vec<K>,
    pub only_a: Vec<K>,
    pub only_b: Vec<K>,
}

/// Partition two key sets by exact-key equality. There is no fuzzy or
/// positional matching: a key on one side only is always a diff element.
pub fn partition_keys<K, A, B>(a: A, b: B) -> KeyPartition<K>
where
    K: Ord + Clone,
    A: IntoIterator<Item = K>,
    B: IntoIterator<Item = K>,
{
    let a: BTreeSet<K> = a.into_iter().collect();
    let b: BTreeSet<K> = b.into_iter().collect();

    KeyPartition {
        matched: a.intersection(&b).cloned().collect(),
        only_a: a.difference(&b).cloned().collect(),
        only_b: b.difference(&a).cloned().collect(),
    }
}

// ---------------------------------------------------------------------------
// Diff elements
// ---------------------------------------------------------------------------

/// What happened to an entity between side A and side B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DiffKind {
    /// Present only in B.
    Added,
    /// Present only in A.
    Removed,
    /// Present on both sides with a different derived outcome.
    Changed,
}

/// A class present on one side only. Matched classes never produce a
/// class-level element; their content differences surface at the line and
/// branch levels instead.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ClassDiff {
    pub class: String,
    pub kind: DiffKind,
}

/// A line missing on one side, or with a different derived status.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct LineDiff {
    pub class: String,
    pub line: u32,
    pub kind: DiffKind,
    pub before: Option<LineStatus>,
    pub after: Option<LineStatus>,
}

/// A jump missing on one side, or with a different (true-taken, false-taken)
/// outcome pair.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct JumpDiff {
    pub class: String,
    pub line: u32,
    pub index: u32,
    pub kind: DiffKind,
    pub before: Option<(bool, bool)>,
    pub after: Option<(bool, bool)>,
}

/// A switch missing on one side, or with a different set of taken cases.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SwitchDiff {
    pub class: String,
    pub line: u32,
    pub index: u32,
    pub kind: DiffKind,
    pub before: Option<Vec<bool>>,
    pub after: Option<Vec<bool>>,
}

// ---------------------------------------------------------------------------
// Diff report
// ---------------------------------------------------------------------------

/// The complete result of comparing two coverage trees: one ordered diff
/// sequence per tree level. Empty everywhere iff the two runs describe
/// equivalent coverage.
#[derive(Debug, Default, serde::Serialize)]
pub struct DiffReport {
    pub classes: Vec<ClassDiff>,
    pub lines: Vec<LineDiff>,
    pub jumps: Vec<JumpDiff>,
    pub switches: Vec<SwitchDiff>,
}

impl DiffReport {
    /// True iff the two coverage runs are behaviorally equivalent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
            && self.lines.is_empty()
            && self.jumps.is_empty()
            && self.switches.is_empty()
    }

    /// Total number of diff elements across all four levels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len() + self.lines.len() + self.jumps.len() + self.switches.len()
    }
}

// ---------------------------------------------------------------------------
// Diff engine
// ---------------------------------------------------------------------------

/// Compare two coverage trees. Pure and read-only: neither input is mutated
/// and no state is shared between invocations, so callers may run many
/// comparisons in parallel.
#[must_use]
pub fn compare(a: &ProjectData, b: &ProjectData) -> DiffReport {
    let mut report = DiffReport::default();

    let classes = partition_keys(
        a.class_names().map(str::to_string),
        b.class_names().map(str::to_string),
    );

    for name in classes.only_a {
        report.classes.push(ClassDiff {
            class: name,
            kind: DiffKind::Removed,
        });
    }
    for name in classes.only_b {
        report.classes.push(ClassDiff {
            class: name,
            kind: DiffKind::Added,
        });
    }
    // partition_keys emits sorted lists per side; interleave them back into
    // a single name-ordered sequence.
    report.classes.sort_by(|x, y| x.class.cmp(&y.class));

    for name in classes.matched {
        // Both lookups succeed: the name came from the intersection.
        if let (Some(class_a), Some(class_b)) = (a.get_class(&name), b.get_class(&name)) {
            compare_classes(class_a, class_b, &mut report);
        }
    }

    report
        .lines
        .sort_by(|x, y| (&x.class, x.line).cmp(&(&y.class, y.line)));
    report
        .jumps
        .sort_by(|x, y| (&x.class, x.line, x.index).cmp(&(&y.class, y.line, y.index)));
    report
        .switches
        .sort_by(|x, y| (&x.class, x.line, x.index).cmp(&(&y.class, y.line, y.index)));

    report
}

/// Diff the lines of one matched class pair.
fn compare_classes(a: &ClassData, b: &ClassData, report: &mut DiffReport) {
    let lines = partition_keys(a.line_numbers(), b.line_numbers());

    for number in lines.only_a {
        if let Some(line) = a.get_line(number) {
            report.lines.push(LineDiff {
                class: a.name.clone(),
                line: number,
                kind: DiffKind::Removed,
                before: Some(line.status()),
                after: None,
            });
        }
    }
    for number in lines.only_b {
        if let Some(line) = b.get_line(number) {
            report.lines.push(LineDiff {
                class: a.name.clone(),
                line: number,
                kind: DiffKind::Added,
                before: None,
                after: Some(line.status()),
            });
        }
    }

    for number in lines.matched {
        if let (Some(line_a), Some(line_b)) = (a.get_line(number), b.get_line(number)) {
            compare_lines(&a.name, line_a, line_b, report);
        }
    }
}

/// Diff one matched line pair: derived status first, then its jumps and
/// switches by index.
fn compare_lines(class: &str, a: &LineData, b: &LineData, report: &mut DiffReport) {
    let status_a = a.status();
    let status_b = b.status();
    if status_a != status_b {
        report.lines.push(LineDiff {
            class: class.to_string(),
            line: a.line_number,
            kind: DiffKind::Changed,
            before: Some(status_a),
            after: Some(status_b),
        });
    }

    compare_jumps(class, a, b, report);
    compare_switches(class, a, b, report);
}

fn compare_jumps(class: &str, a: &LineData, b: &LineData, report: &mut DiffReport) {
    let jumps = partition_keys(0..a.jumps.len() as u32, 0..b.jumps.len() as u32);

    for index in jumps.only_a {
        report.jumps.push(JumpDiff {
            class: class.to_string(),
            line: a.line_number,
            index,
            kind: DiffKind::Removed,
            before: Some(a.jumps[index as usize].outcome()),
            after: None,
        });
    }
    for index in jumps.only_b {
        report.jumps.push(JumpDiff {
            class: class.to_string(),
            line: a.line_number,
            index,
            kind: DiffKind::Added,
            before: None,
            after: Some(b.jumps[index as usize].outcome()),
        });
    }
    for index in jumps.matched {
        let before = a.jumps[index as usize].outcome();
        let after = b.jumps[index as usize].outcome();
        if before != after {
            report.jumps.push(JumpDiff {
                class: class.to_string(),
                line: a.line_number,
                index,
                kind: DiffKind::Changed,
                before: Some(before),
                after: Some(after),
            });
        }
    }
}

fn compare_switches(class: &str, a: &LineData, b: &LineData, report: &mut DiffReport) {
    let switches = partition_keys(0..a.switches.len() as u32, 0..b.switches.len() as u32);

    for index in switches.only_a {
        report.switches.push(SwitchDiff {
            class: class.to_string(),
            line: a.line_number,
            index,
            kind: DiffKind::Removed,
            before: Some(a.switches[index as usize].outcome()),
            after: None,
        });
    }
    for index in switches.only_b {
        report.switches.push(SwitchDiff {
            class: class.to_string(),
            line: a.line_number,
            index,
            kind: DiffKind::Added,
            before: None,
            after: Some(b.switches[index as usize].outcome()),
        });
    }
    for index in switches.matched {
        let before = a.switches[index as usize].outcome();
        let after = b.switches[index as usize].outcome();
        if before != after {
            report.switches.push(SwitchDiff {
                class: class.to_string(),
                line: a.line_number,
                index,
                kind: DiffKind::Changed,
                before: Some(before),
                after: Some(after),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_disjoint() {
        let p = partition_keys(vec![1, 2], vec![3, 4]);
        assert_eq!(p.matched, Vec::<i32>::new());
        assert_eq!(p.only_a, vec![1, 2]);
        assert_eq!(p.only_b, vec![3, 4]);
    }

    #[test]
    fn test_partition_overlap_sorted() {
        let p = partition_keys(vec![9, 1, 5], vec![5, 2, 9]);
        assert_eq!(p.matched, vec![5, 9]);
        assert_eq!(p.only_a, vec![1]);
        assert_eq!(p.only_b, vec![2]);
    }

    #[test]
    fn test_partition_strings() {
        let p = partition_keys(
            vec!["b".to_string(), "a".to_string()],
            vec!["b".to_string(), "c".to_string()],
        );
        assert_eq!(p.matched, vec!["b"]);
        assert_eq!(p.only_a, vec!["a"]);
        assert_eq!(p.only_b, vec!["c"]);
    }

    #[test]
    fn test_empty_report() {
        let report = DiffReport::default();
        assert!(report.is_empty());
        assert_eq!(report.len(), 0);
    }
}
