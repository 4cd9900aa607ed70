use std::io::{BufWriter, Write};

use crate::error::{JamError, Result};

/// Sequential output that receives one result per case.
///
/// Cases are separated by a newline; the runner tells the sink which case is
/// the last one so no separator follows it.
pub trait LineSink {
    fn write_case(&mut self, case: u64, result: &str, last: bool) -> Result<()>;

    /// Flushes and releases the output. Called once per run, on success and
    /// on failure.
    fn finish(&mut self) -> Result<()>;
}

/// [`LineSink`] writing `Case #<i>: <result>` lines to any writer.
pub struct WriterSink<W: Write> {
    writer: Option<BufWriter<W>>,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Some(BufWriter::new(writer)),
        }
    }

    fn writer(&mut self) -> Result<&mut BufWriter<W>> {
        self.writer
            .as_mut()
            .ok_or_else(|| JamError::io("output", std::io::ErrorKind::BrokenPipe.into()))
    }
}

impl<W: Write> LineSink for WriterSink<W> {
    fn write_case(&mut self, case: u64, result: &str, last: bool) -> Result<()> {
        let writer = self.writer()?;
        write!(writer, "Case #{case}: {result}")
            .map_err(|err| JamError::io(format!("failed to write case #{case}"), err))?;
        if !last {
            writeln!(writer).map_err(|err| JamError::io(format!("failed to write case #{case}"), err))?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        match self.writer.take() {
            Some(mut writer) => writer
                .flush()
                .map_err(|err| JamError::io("failed to flush output", err)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_case_has_no_trailing_newline() {
        let mut buffer = Vec::new();
        {
            let mut sink = WriterSink::new(&mut buffer);
            sink.write_case(1, "x", false).expect("write first");
            sink.write_case(2, "y", true).expect("write last");
            sink.finish().expect("flush");
        }
        assert_eq!(String::from_utf8(buffer).expect("utf-8"), "Case #1: x\nCase #2: y");
    }

    #[test]
    fn writing_after_finish_fails() {
        let mut sink = WriterSink::new(Vec::new());
        sink.finish().expect("flush");
        assert!(sink.write_case(1, "late", true).is_err());
        sink.finish().expect("second finish is a no-op");
    }
}
