//! In-memory representation of one coverage run: a tree of
//! project → classes → lines → branches. The loader produces a `ProjectData`
//! which is then handed, read-only, to the diff engine.

use std::collections::BTreeMap;

use crate::error::LoadError;

/// Which instrumentation strategy produced a report. Carried as metadata on
/// the tree; the diff engine never dispatches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstrumentationMode {
    Sampling,
    NewSampling,
    Tracing,
    NewTracing,
}

impl InstrumentationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstrumentationMode::Sampling => "sampling",
            InstrumentationMode::NewSampling => "new-sampling",
            InstrumentationMode::Tracing => "tracing",
            InstrumentationMode::NewTracing => "new-tracing",
        }
    }
}

impl std::str::FromStr for InstrumentationMode {
    type Err = LoadError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sampling" => Ok(InstrumentationMode::Sampling),
            "new-sampling" => Ok(InstrumentationMode::NewSampling),
            "tracing" => Ok(InstrumentationMode::Tracing),
            "new-tracing" => Ok(InstrumentationMode::NewTracing),
            _ => Err(LoadError::Malformed(format!(
                "Unknown instrumentation mode: '{}'. Supported: sampling, new-sampling, tracing, new-tracing",
                s
            ))),
        }
    }
}

impl std::fmt::Display for InstrumentationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived coverage status of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LineStatus {
    None,
    Partial,
    Full,
}

impl std::fmt::Display for LineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            LineStatus::None => "NONE",
            LineStatus::Partial => "PARTIAL",
            LineStatus::Full => "FULL",
        })
    }
}

/// One two-outcome conditional branch point within a line.
#[derive(Debug, Clone, Default)]
pub struct JumpData {
    pub true_hits: u64,
    pub false_hits: u64,
}

impl JumpData {
    pub fn new(true_hits: u64, false_hits: u64) -> Self {
        Self {
            true_hits,
            false_hits,
        }
    }

    /// The derived outcome: was each arm ever taken. Raw counts from two
    /// instrumentation strategies differ; this pair is what must agree.
    #[must_use]
    pub fn outcome(&self) -> (bool, bool) {
        (self.true_hits > 0, self.false_hits > 0)
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.outcome() == (true, true)
    }

    #[must_use]
    pub fn is_touched(&self) -> bool {
        self.true_hits > 0 || self.false_hits > 0
    }
}

/// One multi-way branch point (switch/when dispatch) within a line.
/// The default/fallthrough case is one of the entries.
#[derive(Debug, Clone, Default)]
pub struct SwitchData {
    pub case_hits: Vec<u64>,
}

impl SwitchData {
    pub fn new(case_hits: Vec<u64>) -> Self {
        Self { case_hits }
    }

    /// The derived outcome: which cases were ever taken, one entry per case.
    /// The vector length is part of the outcome, so two switches with the
    /// same taken indices but a different number of cases compare unequal;
    /// a case-count mismatch means the instrumenters disagreed about the
    /// branch structure itself.
    #[must_use]
    pub fn outcome(&self) -> Vec<bool> {
        self.case_hits.iter().map(|&h| h > 0).collect()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.case_hits.iter().all(|&h| h > 0)
    }

    #[must_use]
    pub fn is_touched(&self) -> bool {
        self.case_hits.iter().any(|&h| h > 0)
    }
}

/// Coverage record for a single source line.
#[derive(Debug, Clone)]
pub struct LineData {
    pub line_number: u32,
    pub hits: u64,
    pub jumps: Vec<JumpData>,
    pub switches: Vec<SwitchData>,
}

impl LineData {
    pub fn new(line_number: u32, hits: u64) -> Self {
        Self {
            line_number,
            hits,
            jumps: Vec::new(),
            switches: Vec::new(),
        }
    }

    /// Derive the line's coverage status from its own hits and its branches:
    /// NONE when nothing on the line was ever executed, FULL when the line
    /// ran and every branch outcome was taken, PARTIAL for everything else.
    #[must_use]
    pub fn status(&self) -> LineStatus {
        let touched = self.hits > 0
            || self.jumps.iter().any(JumpData::is_touched)
            || self.switches.iter().any(SwitchData::is_touched);
        if !touched {
            return LineStatus::None;
        }
        let full = self.hits > 0
            && self.jumps.iter().all(JumpData::is_full)
            && self.switches.iter().all(SwitchData::is_full);
        if full {
            LineStatus::Full
        } else {
            LineStatus::Partial
        }
    }
}

/// Coverage data for one instrumented class.
#[derive(Debug, Clone)]
pub struct ClassData {
    pub name: String,
    lines: BTreeMap<u32, LineData>,
}

impl ClassData {
    pub fn new(name: String) -> Self {
        Self {
            name,
            lines: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn get_line(&self, line_number: u32) -> Option<&LineData> {
        self.lines.get(&line_number)
    }

    /// Register a line record. Line numbers are unique per class; the loader
    /// enforces this before insertion.
    pub fn add_line(&mut self, line: LineData) {
        self.lines.insert(line.line_number, line);
    }

    /// Line numbers in ascending order.
    pub fn line_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.lines.keys().copied()
    }

    pub fn lines(&self) -> impl Iterator<Item = &LineData> {
        self.lines.values()
    }
}

/// The root of one coverage run.
#[derive(Debug, Clone, Default)]
pub struct ProjectData {
    pub mode: Option<InstrumentationMode>,
    classes: BTreeMap<String, ClassData>,
}

impl ProjectData {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get_class(&self, name: &str) -> Option<&ClassData> {
        self.classes.get(name)
    }

    pub fn get_or_create_class(&mut self, name: &str) -> &mut ClassData {
        self.classes
            .entry(name.to_string())
            .or_insert_with(|| ClassData::new(name.to_string()))
    }

    #[must_use]
    pub fn contains_class(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Class names in ascending order.
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassData> {
        self.classes.values()
    }

    #[must_use]
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }
}
