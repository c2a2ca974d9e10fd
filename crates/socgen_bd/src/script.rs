//! A Tcl script assembled in fixed stages.

use std::collections::BTreeMap;
use std::fmt;

/// Script stages in emission order.
///
/// Vivado resolves names against whatever has been declared so far, so the
/// order is fixed: addresses are assigned only after every connection exists,
/// and packaging comes last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// Project variables and `create_project`.
    Project,
    /// HDL sources.
    Files,
    /// Board repository and board part.
    Board,
    /// Standalone IP.
    Ips,
    /// Block design and its top-level ports.
    BlockDesign,
    /// Block design cells and their configuration.
    Cells,
    /// Cell-to-cell, cell-to-port, and interconnect connections.
    Wiring,
    /// Memory map.
    Addressing,
    /// Block design validation, save, and wrapper.
    Finalize,
    /// Constraints file.
    Constraints,
    /// Top-level declarations.
    Top,
    /// IP packaging.
    Package,
}

impl Stage {
    /// Every stage in emission order.
    pub const ALL: [Stage; 12] = [
        Stage::Project,
        Stage::Files,
        Stage::Board,
        Stage::Ips,
        Stage::BlockDesign,
        Stage::Cells,
        Stage::Wiring,
        Stage::Addressing,
        Stage::Finalize,
        Stage::Constraints,
        Stage::Top,
        Stage::Package,
    ];
}

/// Statements grouped by stage; renders in stage order regardless of push order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TclScript {
    stages: BTreeMap<Stage, Vec<String>>,
}

impl TclScript {
    /// Creates an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one statement to a stage.
    pub fn push(&mut self, stage: Stage, statement: impl Into<String>) {
        self.stages.entry(stage).or_default().push(statement.into());
    }

    /// Appends several statements to a stage.
    pub fn extend<I, S>(&mut self, stage: Stage, statements: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stages
            .entry(stage)
            .or_default()
            .extend(statements.into_iter().map(Into::into));
    }

    /// Statements of one stage.
    pub fn stage(&self, stage: Stage) -> &[String] {
        self.stages.get(&stage).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All statements in emission order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        Stage::ALL
            .iter()
            .flat_map(|stage| self.stage(*stage))
            .map(String::as_str)
    }

    /// Total number of statements.
    pub fn len(&self) -> usize {
        self.stages.values().map(Vec::len).sum()
    }

    /// Whether the script has no statements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The script text, one statement per line with a trailing newline.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in self.lines() {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for TclScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
