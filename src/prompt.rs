//! Line-oriented terminal prompts.
//!
//! Answers are parsed into typed choices through [`FromStr`] implementations
//! that return [`ChoiceError`]; how often to re-ask is decided by the caller
//! through [`Prompter::ask`] or [`Prompter::ask_until_valid`].

use std::io::{BufRead, Write};
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

/// An answer that is not part of a prompt's vocabulary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("'{input}' is not one of: {expected}")]
pub struct ChoiceError {
    pub input: String,
    pub expected: &'static str,
}

impl ChoiceError {
    pub fn new(input: &str, expected: &'static str) -> Self {
        Self {
            input: input.trim().to_string(),
            expected,
        }
    }
}

#[derive(Debug, Error)]
pub enum PromptError {
    /// The input stream reached end of file.
    #[error("input closed")]
    Closed,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A yes/no answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
}

impl Answer {
    pub fn is_yes(self) -> bool {
        self == Answer::Yes
    }
}

impl FromStr for Answer {
    type Err = ChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "y" | "yes" => Ok(Answer::Yes),
            "n" | "no" => Ok(Answer::No),
            _ => Err(ChoiceError::new(s, "yes, y, no, n")),
        }
    }
}

/// Reads answers from `input` and writes prompts to `output`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Writer used for everything that is not a prompt (reports, tables).
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn say(&mut self, line: &str) -> Result<(), PromptError> {
        writeln!(self.output, "{line}")?;
        Ok(())
    }

    /// Reads one line, lower-cased and trimmed.
    pub fn read_answer(&mut self) -> Result<String, PromptError> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::Closed);
        }
        Ok(line.trim().to_lowercase())
    }

    /// Prints `message` and parses the answer, re-asking at most `retries`
    /// times on invalid input.
    ///
    /// The inner `Err` is the last rejected answer once retries run out.
    pub fn ask<T>(
        &mut self,
        message: &str,
        retries: usize,
    ) -> Result<Result<T, ChoiceError>, PromptError>
    where
        T: FromStr<Err = ChoiceError>,
    {
        self.say(message)?;
        let mut retries_left = retries;

        loop {
            match self.read_answer()?.parse::<T>() {
                Ok(choice) => return Ok(Ok(choice)),
                Err(err) if retries_left == 0 => {
                    debug!(error = %err, "Rejected answer, no retries left");
                    return Ok(Err(err));
                }
                Err(err) => {
                    retries_left -= 1;
                    self.reject(&err, message)?;
                }
            }
        }
    }

    /// Prints `message` and re-asks until the answer parses.
    pub fn ask_until_valid<T>(&mut self, message: &str) -> Result<T, PromptError>
    where
        T: FromStr<Err = ChoiceError>,
    {
        self.say(message)?;
        loop {
            match self.read_answer()?.parse::<T>() {
                Ok(choice) => return Ok(choice),
                Err(err) => self.reject(&err, message)?,
            }
        }
    }

    fn reject(&mut self, err: &ChoiceError, message: &str) -> Result<(), PromptError> {
        debug!(error = %err, "Rejected answer");
        writeln!(self.output, "Wrong input! Try again. {message}")?;
        Ok(())
    }
}
