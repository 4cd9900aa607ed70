//! Staged configuration of a run.
//!
//! [`Harness`] fixes the I/O endpoints and returns a [`HarnessIo`], which
//! only accepts a framing plan. That yields [`HarnessOptions`], the only type
//! that can start a run, so a run never starts without both endpoints and a
//! plan.

use std::fs::{self, File};
use std::io::{BufReader, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{JamError, Result};
use crate::framing::FramingPlan;
use crate::runner::{RunStats, Runner};
use crate::sink::{LineSink, WriterSink};
use crate::source::{LineSource, ReaderSource};

pub struct Harness;

impl Harness {
    /// Reads from an existing input file and (re)creates the output file.
    ///
    /// The input is opened right away. The output is only deleted and
    /// recreated once a framing plan has been accepted and the run starts.
    pub fn from_paths(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<HarnessIo> {
        let output = output.as_ref();
        require_path(output, "output")?;
        let reader = open_input(input.as_ref())?;
        Ok(HarnessIo {
            source: Box::new(ReaderSource::new(BufReader::new(reader))),
            sink: SinkTarget::File(output.to_path_buf()),
        })
    }

    /// `args[0]` is the input path, `args[1]` the output path.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<HarnessIo> {
        match args {
            [input, output] => Self::from_paths(input.as_ref(), output.as_ref()),
            _ => Err(JamError::config(format!(
                "expected exactly two arguments (input path, output path), got {}",
                args.len()
            ))),
        }
    }

    pub fn from_streams<R, W>(reader: R, writer: W) -> HarnessIo
    where
        R: Read + 'static,
        W: Write + 'static,
    {
        Self::from_io(ReaderSource::new(BufReader::new(reader)), WriterSink::new(writer))
    }

    pub fn from_io<S, K>(source: S, sink: K) -> HarnessIo
    where
        S: LineSource + 'static,
        K: LineSink + 'static,
    {
        HarnessIo {
            source: Box::new(source),
            sink: SinkTarget::Open(Box::new(sink)),
        }
    }
}

fn require_path(path: &Path, role: &str) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(JamError::config(format!("{role} path cannot be empty")));
    }
    Ok(())
}

/// Opens an existing, readable input file.
pub fn open_input(path: &Path) -> Result<File> {
    require_path(path, "input")?;
    if !path.exists() {
        return Err(JamError::io(
            format!("input file {} does not exist", path.display()),
            ErrorKind::NotFound.into(),
        ));
    }
    File::open(path).map_err(|err| {
        JamError::io(format!("input file {} is not readable", path.display()), err)
    })
}

/// Creates the output file, deleting a previous one first.
pub fn create_output(path: &Path) -> Result<File> {
    require_path(path, "output")?;
    if path.exists() {
        fs::remove_file(path).map_err(|err| {
            JamError::io(format!("output file {} could not be deleted", path.display()), err)
        })?;
    }
    File::create(path).map_err(|err| {
        JamError::io(format!("output file {} could not be created", path.display()), err)
    })
}

enum SinkTarget {
    Open(Box<dyn LineSink>),
    /// Created when the run starts.
    File(PathBuf),
}

impl SinkTarget {
    fn open(self) -> Result<Box<dyn LineSink>> {
        match self {
            SinkTarget::Open(sink) => Ok(sink),
            SinkTarget::File(path) => Ok(Box::new(WriterSink::new(create_output(&path)?))),
        }
    }
}

/// First stage: endpoints are fixed, the framing plan is still missing.
pub struct HarnessIo {
    source: Box<dyn LineSource>,
    sink: SinkTarget,
}

impl HarnessIo {
    /// Every case has exactly `lines` lines.
    pub fn lines_per_case(self, lines: usize) -> Result<HarnessOptions> {
        Ok(self.with_plan(FramingPlan::fixed_lines(lines)?))
    }

    /// Cases follow a custom (possibly varying) layout.
    pub fn with_plan(self, plan: FramingPlan) -> HarnessOptions {
        HarnessOptions {
            source: self.source,
            sink: self.sink,
            plan,
            time_execution: false,
            report: None,
        }
    }
}

/// Second stage: optional settings, then [`solve`](Self::solve).
pub struct HarnessOptions {
    source: Box<dyn LineSource>,
    sink: SinkTarget,
    plan: FramingPlan,
    time_execution: bool,
    report: Option<Box<dyn Write>>,
}

impl HarnessOptions {
    /// Reports cases slower than 100ms and the total run time.
    pub fn time_execution(mut self) -> Self {
        self.time_execution = true;
        self
    }

    pub fn report_to(mut self, report: Box<dyn Write>) -> Self {
        self.report = Some(report);
        self
    }

    /// Runs every case through `transform`. Do not write `Case #x: ` in the
    /// result, it is added automatically.
    pub fn solve<F>(mut self, transform: F) -> Result<RunStats>
    where
        F: FnMut(&[String]) -> anyhow::Result<String>,
    {
        let mut sink = self.sink.open()?;
        let mut runner = Runner::new(self.plan).time_execution(self.time_execution);
        if let Some(report) = self.report {
            runner = runner.report_to(report);
        }
        runner.run(self.source.as_mut(), sink.as_mut(), transform)
    }
}
