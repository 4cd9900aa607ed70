use std::io::BufRead;

use crate::error::{JamError, Result};

/// Sequential line-by-line input.
pub trait LineSource {
    /// Next line without its terminator, or `None` once the input is exhausted.
    fn next_line(&mut self) -> Result<Option<String>>;

    /// Number of lines handed out so far.
    fn lines_read(&self) -> u64;

    /// Like [`next_line`](Self::next_line), but running out of input is an error.
    fn require_line(&mut self) -> Result<String> {
        match self.next_line()? {
            Some(line) => Ok(line),
            None => Err(JamError::PrematureEndOfInput {
                line: self.lines_read() + 1,
            }),
        }
    }

    /// Releases the underlying input. Reading after this yields no lines.
    fn close(&mut self) {}
}

/// [`LineSource`] over any buffered reader.
pub struct ReaderSource<R> {
    reader: Option<R>,
    lines_read: u64,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(reader),
            lines_read: 0,
        }
    }
}

impl<R: BufRead> LineSource for ReaderSource<R> {
    fn next_line(&mut self) -> Result<Option<String>> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(None);
        };
        let mut line = String::new();
        let read = reader
            .read_line(&mut line)
            .map_err(|err| JamError::io(format!("failed to read input line {}", self.lines_read + 1), err))?;
        if read == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        self.lines_read += 1;
        Ok(Some(line))
    }

    fn lines_read(&self) -> u64 {
        self.lines_read
    }

    fn close(&mut self) {
        self.reader = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn strips_both_line_terminators() {
        let mut source = ReaderSource::new(Cursor::new("a\r\nb\nc"));
        assert_eq!(source.next_line().expect("read a").as_deref(), Some("a"));
        assert_eq!(source.next_line().expect("read b").as_deref(), Some("b"));
        assert_eq!(source.next_line().expect("read c").as_deref(), Some("c"));
        assert_eq!(source.next_line().expect("read eof"), None);
        assert_eq!(source.lines_read(), 3);
    }

    #[test]
    fn require_line_reports_missing_line_number() {
        let mut source = ReaderSource::new(Cursor::new("only\n"));
        source.require_line().expect("first line exists");
        match source.require_line() {
            Err(JamError::PrematureEndOfInput { line }) => assert_eq!(line, 2),
            other => panic!("expected premature end, got {other:?}"),
        }
    }

    #[test]
    fn closed_source_is_exhausted() {
        let mut source = ReaderSource::new(Cursor::new("x\ny\n"));
        source.close();
        assert_eq!(source.next_line().expect("read after close"), None);
    }
}
