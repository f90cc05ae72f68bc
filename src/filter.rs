//! Class-name filtering applied before comparison.
//!
//! Real runs instrument a whole classpath; a comparison is usually scoped to
//! the classes of interest (e.g. `org\.joda\.time.*`) and may exclude a few
//! classes with inherently flaky coverage. Patterns must match the whole
//! fully-qualified class name.

use regex::Regex;

use crate::data::ProjectData;
use crate::error::Result;

/// Include/exclude patterns over fully-qualified class names.
#[derive(Debug, Default)]
pub struct ClassFilter {
    include: Vec<Regex>,
    exclude: Vec<Regex>,
}

impl ClassFilter {
    /// Compile a filter from pattern strings. An empty include list matches
    /// every class.
    pub fn new<S: AsRef<str>>(include: &[S], exclude: &[S]) -> Result<Self> {
        Ok(Self {
            include: compile(include)?,
            exclude: compile(exclude)?,
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// Does a class name pass the filter.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        if !self.include.is_empty() && !self.include.iter().any(|re| re.is_match(name)) {
            return false;
        }
        !self.exclude.iter().any(|re| re.is_match(name))
    }

    /// Build a new tree containing only the classes that pass the filter.
    /// The input is left untouched.
    #[must_use]
    pub fn apply(&self, project: &ProjectData) -> ProjectData {
        let mut filtered = ProjectData::new();
        filtered.mode = project.mode;
        for class in project.classes() {
            if self.matches(&class.name) {
                *filtered.get_or_create_class(&class.name) = class.clone();
            }
        }
        filtered
    }
}

/// Anchor each pattern so it must match the whole class name, mirroring how
/// instrumentation agents interpret their class filter patterns.
fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| Ok(Regex::new(&format!("^(?:{})$", p.as_ref()))?))
        .collect()
}
