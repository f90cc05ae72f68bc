//! Builders for constructing coverage trees in tests without going through
//! the loader.

use covdiff::data::{JumpData, LineData, ProjectData, SwitchData};

/// Build a project from (class name, lines) pairs.
pub fn project(classes: &[(&str, Vec<LineData>)]) -> ProjectData {
    let mut project = ProjectData::new();
    for (name, lines) in classes {
        let class = project.get_or_create_class(name);
        for line in lines {
            class.add_line(line.clone());
        }
    }
    project
}

/// A plain line with no branches.
pub fn line(number: u32, hits: u64) -> LineData {
    LineData::new(number, hits)
}

/// A line with a single conditional jump.
pub fn line_with_jump(number: u32, hits: u64, true_hits: u64, false_hits: u64) -> LineData {
    let mut line = LineData::new(number, hits);
    line.jumps.push(JumpData::new(true_hits, false_hits));
    line
}

/// A line with a single switch; the default case is one of the entries.
pub fn line_with_switch(number: u32, hits: u64, case_hits: &[u64]) -> LineData {
    let mut line = LineData::new(number, hits);
    line.switches.push(SwitchData::new(case_hits.to_vec()));
    line
}
