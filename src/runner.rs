use std::fmt;
use std::io::{self, Write};
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::error::{JamError, Result};
use crate::framing::FramingPlan;
use crate::sink::LineSink;
use crate::source::LineSource;
use crate::timing;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    NotStarted,
    Running,
    Finished,
}

#[derive(Clone, Debug, Serialize)]
pub struct CaseTiming {
    pub case: u64,
    pub elapsed: Duration,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct RunStats {
    pub total_cases: u64,
    pub solved: u64,
    pub elapsed: Duration,
    /// Cases over the slow threshold; only collected when timing is enabled.
    pub slow_cases: Vec<CaseTiming>,
}

/// Drives one run: reads the case count, frames every case, applies the
/// transform and writes the numbered results.
pub struct Runner {
    plan: FramingPlan,
    time_execution: bool,
    report: Box<dyn Write>,
    state: RunState,
}

impl Runner {
    pub fn new(plan: FramingPlan) -> Self {
        Self {
            plan,
            time_execution: false,
            report: Box::new(io::stderr()),
            state: RunState::NotStarted,
        }
    }

    /// Report slow cases (over 100ms) and the total run time.
    pub fn time_execution(mut self, enabled: bool) -> Self {
        self.time_execution = enabled;
        self
    }

    /// Channel for timing reports and abort diagnostics. Defaults to stderr.
    pub fn report_to(mut self, report: Box<dyn Write>) -> Self {
        self.report = report;
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn plan(&self) -> &FramingPlan {
        &self.plan
    }

    /// Processes every case in order. The first failure aborts the run;
    /// cases written before it stay written. Source and sink are released on
    /// both paths.
    pub fn run<F>(
        &mut self,
        source: &mut dyn LineSource,
        sink: &mut dyn LineSink,
        transform: F,
    ) -> Result<RunStats>
    where
        F: FnMut(&[String]) -> anyhow::Result<String>,
    {
        if self.state != RunState::NotStarted {
            return Err(JamError::AlreadyStarted);
        }
        self.state = RunState::Running;

        let mut current = 0;
        let outcome = self.run_cases(source, sink, transform, &mut current);
        source.close();
        let released = sink.finish();
        self.state = RunState::Finished;

        match outcome {
            Ok(stats) => released.map(|()| stats),
            Err(err) => {
                if current == 0 {
                    self.note(format_args!("[run] aborted before the first case: {err}"));
                } else {
                    self.note(format_args!("[run] aborted at case #{current}: {err}"));
                }
                if let Err(flush) = released {
                    self.note(format_args!("[run] output not released cleanly: {flush}"));
                }
                Err(err)
            }
        }
    }

    fn run_cases<F>(
        &mut self,
        source: &mut dyn LineSource,
        sink: &mut dyn LineSink,
        mut transform: F,
        current: &mut u64,
    ) -> Result<RunStats>
    where
        F: FnMut(&[String]) -> anyhow::Result<String>,
    {
        let run_start = Instant::now();
        let total_cases = read_case_count(source)?;
        let mut stats = RunStats {
            total_cases,
            ..RunStats::default()
        };

        for case in 1..=total_cases {
            *current = case;
            let case_start = Instant::now();
            let lines = self.plan.assemble_case(source)?;
            let result = transform(&lines).map_err(|source| JamError::Transform { case, source })?;
            sink.write_case(case, &result, case == total_cases)?;
            stats.solved = case;

            let elapsed = case_start.elapsed();
            if self.time_execution && timing::is_slow(elapsed) {
                self.note(format_args!(
                    "Test case #{case} solved in {}",
                    timing::human_readable(elapsed)
                ));
                stats.slow_cases.push(CaseTiming { case, elapsed });
            }
        }

        stats.elapsed = run_start.elapsed();
        if self.time_execution {
            self.note(format_args!(
                "* All test cases executed in {} *",
                timing::human_readable(stats.elapsed)
            ));
        }
        Ok(stats)
    }

    // The report channel is observation only; its failures never change the run.
    fn note(&mut self, line: fmt::Arguments<'_>) {
        let _ = writeln!(self.report, "{line}");
        let _ = self.report.flush();
    }
}

fn read_case_count(source: &mut dyn LineSource) -> Result<u64> {
    let line = source.require_line()?;
    line.trim()
        .parse()
        .map_err(|_| JamError::MalformedCaseCount { found: line })
}
