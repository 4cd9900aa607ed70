//! Case framing: deciding which input lines belong to one test case.
//!
//! A [`FramingPlan`] is an ordered list of [`FramingStrategy`] elements. Each
//! element pulls its own share of lines from the source and the plan
//! concatenates them, so one case can be "one fixed header line, then a
//! varying number of grid rows".

use std::fmt;

use crate::error::{JamError, Result};
use crate::source::LineSource;

/// Maps a header line to the number of lines that follow it.
pub type CountFn = Box<dyn Fn(&str) -> anyhow::Result<usize>>;

pub enum FramingStrategy {
    /// Always consumes exactly this many lines (at least one).
    FixedCount(usize),
    /// Consumes a header line, then as many lines as the callback derives from
    /// it. The header is part of the emitted lines.
    SelfDescribing(CountFn),
}

impl FramingStrategy {
    pub fn fixed(lines: usize) -> Result<Self> {
        if lines < 1 {
            return Err(JamError::config("number of lines cannot be smaller than 1"));
        }
        Ok(FramingStrategy::FixedCount(lines))
    }

    pub fn self_describing<F>(count: F) -> Self
    where
        F: Fn(&str) -> anyhow::Result<usize> + 'static,
    {
        FramingStrategy::SelfDescribing(Box::new(count))
    }

    /// Reads this element's lines from `source` and appends them to `lines`.
    ///
    /// The source advances by exactly the number of lines appended; on failure
    /// lines already read stay consumed.
    pub fn extract(&self, source: &mut dyn LineSource, lines: &mut Vec<String>) -> Result<()> {
        match self {
            FramingStrategy::FixedCount(count) => read_lines(source, *count, lines),
            FramingStrategy::SelfDescribing(derive) => {
                let header = source.require_line()?;
                let count = derive(&header).map_err(|source| JamError::InvalidLineCount {
                    header: header.clone(),
                    source,
                })?;
                lines.push(header);
                read_lines(source, count, lines)
            }
        }
    }
}

fn read_lines(source: &mut dyn LineSource, count: usize, lines: &mut Vec<String>) -> Result<()> {
    for _ in 0..count {
        lines.push(source.require_line()?);
    }
    Ok(())
}

impl fmt::Debug for FramingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FramingStrategy::FixedCount(lines) => f.debug_tuple("FixedCount").field(lines).finish(),
            FramingStrategy::SelfDescribing(_) => f.write_str("SelfDescribing(..)"),
        }
    }
}

/// Non-empty, ordered composition of framing strategies.
#[derive(Debug)]
pub struct FramingPlan {
    elements: Vec<FramingStrategy>,
}

impl FramingPlan {
    pub fn builder() -> PlanBuilder {
        PlanBuilder::default()
    }

    /// Plan for inputs where every case has the same number of lines.
    pub fn fixed_lines(lines: usize) -> Result<Self> {
        Self::builder().fixed(lines)?.build()
    }

    pub fn elements(&self) -> &[FramingStrategy] {
        &self.elements
    }

    /// Reads one full test case, element by element in plan order.
    pub fn assemble_case(&self, source: &mut dyn LineSource) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        for element in &self.elements {
            element.extract(source, &mut lines)?;
        }
        Ok(lines)
    }
}

/// Collects framing elements; order of calls is the order lines are read.
#[derive(Default)]
pub struct PlanBuilder {
    elements: Vec<FramingStrategy>,
}

impl PlanBuilder {
    pub fn fixed(mut self, lines: usize) -> Result<Self> {
        self.elements.push(FramingStrategy::fixed(lines)?);
        Ok(self)
    }

    pub fn varying<F>(mut self, count: F) -> Self
    where
        F: Fn(&str) -> anyhow::Result<usize> + 'static,
    {
        self.elements.push(FramingStrategy::self_describing(count));
        self
    }

    pub fn element(mut self, element: FramingStrategy) -> Self {
        self.elements.push(element);
        self
    }

    pub fn build(self) -> Result<FramingPlan> {
        if self.elements.is_empty() {
            return Err(JamError::config(
                "add at least one element to the framing plan before building it",
            ));
        }
        if self
            .elements
            .iter()
            .any(|element| matches!(element, FramingStrategy::FixedCount(0)))
        {
            return Err(JamError::config("number of lines cannot be smaller than 1"));
        }
        Ok(FramingPlan {
            elements: self.elements,
        })
    }
}
