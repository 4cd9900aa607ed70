//! Framing plans described in TOML.
//!
//! ```toml
//! [[elements]]
//! kind = "fixed"
//! lines = 1
//!
//! [[elements]]
//! kind = "varying"
//! pattern = '^\s*(\d+)'
//! group = 1
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, anyhow};
use regex::Regex;
use serde::Deserialize;

use crate::error::{JamError, Result};
use crate::framing::{FramingPlan, FramingStrategy};

const DEFAULT_COUNT_PATTERN: &str = r"^\s*(\d+)";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanManifest {
    #[serde(default)]
    pub elements: Vec<ElementSpec>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum ElementSpec {
    Fixed {
        lines: usize,
    },
    /// Header line whose regex capture gives the number of following lines.
    Varying {
        #[serde(default = "default_pattern")]
        pattern: String,
        #[serde(default = "default_group")]
        group: usize,
    },
}

fn default_pattern() -> String {
    DEFAULT_COUNT_PATTERN.to_string()
}

fn default_group() -> usize {
    1
}

impl PlanManifest {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|err| JamError::io(format!("failed to read plan {}", path.display()), err))?;
        toml::from_str(&content).map_err(|err| {
            JamError::config(format!("failed to parse plan {}: {err}", path.display()))
        })
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|err| JamError::config(format!("failed to parse plan: {err}")))
    }

    pub fn into_plan(self) -> Result<FramingPlan> {
        let mut builder = FramingPlan::builder();
        for element in self.elements {
            builder = builder.element(element.into_strategy()?);
        }
        builder.build()
    }
}

impl ElementSpec {
    fn into_strategy(self) -> Result<FramingStrategy> {
        match self {
            ElementSpec::Fixed { lines } => FramingStrategy::fixed(lines),
            ElementSpec::Varying { pattern, group } => {
                let regex = Regex::new(&pattern)
                    .map_err(|err| JamError::config(format!("invalid count pattern {pattern:?}: {err}")))?;
                if group >= regex.captures_len() {
                    return Err(JamError::config(format!(
                        "count pattern {pattern:?} has no capture group {group}"
                    )));
                }
                Ok(FramingStrategy::self_describing(move |header| {
                    count_from_header(&regex, group, header)
                }))
            }
        }
    }
}

fn count_from_header(regex: &Regex, group: usize, header: &str) -> anyhow::Result<usize> {
    let captured = regex
        .captures(header)
        .and_then(|caps| caps.get(group))
        .ok_or_else(|| anyhow!("header does not match {}", regex.as_str()))?;
    captured
        .as_str()
        .parse()
        .with_context(|| format!("{:?} is not a line count", captured.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ReaderSource;
    use std::io::Cursor;

    const GRID_PLAN: &str = r#"
[[elements]]
kind = "fixed"
lines = 1

[[elements]]
kind = "varying"
pattern = '^(\d+) rows'
"#;

    #[test]
    fn compiles_mixed_plan() {
        let plan = PlanManifest::parse(GRID_PLAN)
            .expect("manifest parses")
            .into_plan()
            .expect("plan builds");
        assert_eq!(plan.elements().len(), 2);

        let mut source = ReaderSource::new(Cursor::new("title\n2 rows\n..\n##\n"));
        let lines = plan.assemble_case(&mut source).expect("case assembles");
        assert_eq!(lines, ["title", "2 rows", "..", "##"]);
    }

    #[test]
    fn default_pattern_reads_leading_integer() {
        let plan = PlanManifest::parse("[[elements]]\nkind = \"varying\"\n")
            .expect("manifest parses")
            .into_plan()
            .expect("plan builds");
        let mut source = ReaderSource::new(Cursor::new(" 1 extra\nrow\n"));
        let lines = plan.assemble_case(&mut source).expect("case assembles");
        assert_eq!(lines, [" 1 extra", "row"]);
    }

    #[test]
    fn unmatched_header_is_invalid_line_count() {
        let plan = PlanManifest::parse("[[elements]]\nkind = \"varying\"\n")
            .expect("manifest parses")
            .into_plan()
            .expect("plan builds");
        let mut source = ReaderSource::new(Cursor::new("none\n"));
        assert!(matches!(
            plan.assemble_case(&mut source),
            Err(JamError::InvalidLineCount { .. })
        ));
    }

    #[test]
    fn rejects_invalid_manifests() {
        let empty = PlanManifest::parse("").expect("empty manifest parses");
        assert!(matches!(empty.into_plan(), Err(JamError::Configuration(_))));

        let zero = PlanManifest::parse("[[elements]]\nkind = \"fixed\"\nlines = 0\n").expect("parses");
        assert!(matches!(zero.into_plan(), Err(JamError::Configuration(_))));

        let bad_regex = PlanManifest::parse("[[elements]]\nkind = \"varying\"\npattern = '('\n").expect("parses");
        assert!(matches!(bad_regex.into_plan(), Err(JamError::Configuration(_))));

        let no_group = PlanManifest::parse("[[elements]]\nkind = \"varying\"\npattern = '\\d+'\n").expect("parses");
        assert!(matches!(no_group.into_plan(), Err(JamError::Configuration(_))));

        assert!(matches!(
            PlanManifest::parse("[[elements]]\nkind = \"sometimes\"\n"),
            Err(JamError::Configuration(_))
        ));
    }

    #[test]
    fn rejects_misspelled_element_fields() {
        assert!(matches!(
            PlanManifest::parse("[[elements]]\nkind = \"varying\"\npatern = '^(\\d+)'\n"),
            Err(JamError::Configuration(_))
        ));
        assert!(matches!(
            PlanManifest::parse("[[elements]]\nkind = \"fixed\"\nlines = 1\ngroup = 2\n"),
            Err(JamError::Configuration(_))
        ));
    }
}
