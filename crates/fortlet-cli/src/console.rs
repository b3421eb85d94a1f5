//! Console streams for the read and write statements.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use crate::error::{EvalError, EvalResult};

/// Integer input and text output. Input is consumed one
/// whitespace-separated token at a time, pulling a new line only when the
/// previous one is used up.
pub struct Console<R, W> {
    input: R,
    output: W,
    pending: VecDeque<String>,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            pending: VecDeque::new(),
        }
    }

    /// Block until one integer is available.
    pub fn read_int(&mut self) -> EvalResult<i64> {
        // Anything written so far should be visible before we block.
        self.flush()?;
        while self.pending.is_empty() {
            let mut line = String::new();
            let n = self
                .input
                .read_line(&mut line)
                .map_err(|e| EvalError::Io(format!("failed to read input: {e}")))?;
            if n == 0 {
                return Err(EvalError::Io("unexpected end of input".to_string()));
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_string));
        }
        let token = self.pending.pop_front().unwrap_or_default();
        token
            .parse::<i64>()
            .map_err(|_| EvalError::Io(format!("expected an integer, found `{token}`")))
    }

    /// Write one item followed by the item separator.
    pub fn write_item(&mut self, text: &str) -> EvalResult<()> {
        write!(self.output, "{text} ").map_err(write_failed)
    }

    pub fn end_line(&mut self) -> EvalResult<()> {
        writeln!(self.output).map_err(write_failed)
    }

    pub fn flush(&mut self) -> EvalResult<()> {
        self.output.flush().map_err(write_failed)
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

fn write_failed(e: std::io::Error) -> EvalError {
    EvalError::Io(format!("failed to write output: {e}"))
}
