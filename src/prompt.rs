//! Interactive collaborators.
//!
//! The core never blocks on user input. Commands that need a confirmation or
//! a line of text ask a [`Prompter`] for it before calling into the desk.

use std::io::{self, BufRead, Write};

use crate::error::Result;

pub trait Prompter {
    /// Ask a yes/no question. Anything but an explicit yes is a no.
    fn confirm(&mut self, message: &str) -> Result<bool>;

    /// Ask for one line of text. `None` when the user cancels.
    fn prompt(&mut self, message: &str) -> Result<Option<String>>;
}

/// Line-based prompter. Questions go to `output`, answers come from `input`.
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompter<io::StdinLock<'static>, io::Stderr> {
    /// Read answers from stdin and write questions to stderr, keeping
    /// stdout free for command output.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_answer(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn confirm(&mut self, message: &str) -> Result<bool> {
        let answer = self.read_answer(&format!("{message} [y/N]: "))?;
        Ok(answer
            .map(|value| matches!(value.trim().to_lowercase().as_str(), "y" | "yes"))
            .unwrap_or(false))
    }

    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        self.read_answer(&format!("{message}: "))
    }
}
