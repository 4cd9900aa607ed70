//! Test-case framing and I/O harness for batch-style judge input.
//!
//! Input starts with a case count, followed by the lines of every case. A
//! [`FramingPlan`] decides how many lines belong to one case, the caller's
//! transform turns those lines into a result, and the [`Runner`] writes
//! `Case #<i>: <result>` lines to the output.
//!
//! ```no_run
//! use casejam::Harness;
//!
//! fn main() -> casejam::Result<()> {
//!     Harness::from_paths("A-small.in", "A-small.out")?
//!         .lines_per_case(1)?
//!         .time_execution()
//!         .solve(|lines: &[String]| Ok(lines.join(" ")))?;
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod error;
pub mod framing;
pub mod manifest;
pub mod runner;
pub mod sink;
pub mod source;
pub mod timing;

pub use builder::{Harness, HarnessIo, HarnessOptions};
pub use error::{JamError, Result};
pub use framing::{FramingPlan, FramingStrategy, PlanBuilder};
pub use manifest::{ElementSpec, PlanManifest};
pub use runner::{CaseTiming, RunState, RunStats, Runner};
pub use sink::{LineSink, WriterSink};
pub use source::{LineSource, ReaderSource};
