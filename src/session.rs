//! The interactive explore-and-restart loop, and the one-shot report used by
//! the non-interactive CLI mode.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{info, warn};

use crate::analyzers::build_report;
use crate::browse::browse_rows;
use crate::filters::{Filters, collect_filters};
use crate::loader::load_city;
use crate::output::{print_json, report_all, report_load_summary};
use crate::prompt::{PromptError, Prompter};

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user declined to restart.
    Declined,
    /// Input reached end of file.
    InputClosed,
}

pub struct Session<R, W> {
    prompter: Prompter<R, W>,
    data_dir: PathBuf,
    cycles: usize,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            prompter: Prompter::new(input, output),
            data_dir: data_dir.into(),
            cycles: 0,
        }
    }

    /// Number of completed filter-load-report cycles.
    pub fn cycles(&self) -> usize {
        self.cycles
    }

    pub fn into_output(self) -> W {
        self.prompter.into_output()
    }

    /// Runs cycles until the user declines to restart or input ends.
    ///
    /// Data file errors abort the session.
    pub fn run(&mut self) -> Result<SessionEnd> {
        self.prompter.say(&"=".repeat(40))?;
        loop {
            match self.step() {
                Ok(true) => {
                    self.prompter.say("Ok! Let's explore some US bikeshare data!")?;
                }
                Ok(false) => {
                    self.prompter.say("Ok! Good bye!")?;
                    info!(cycles = self.cycles, "Session ended");
                    return Ok(SessionEnd::Declined);
                }
                Err(err) if is_input_closed(&err) => {
                    warn!(cycles = self.cycles, "Input closed, ending session");
                    return Ok(SessionEnd::InputClosed);
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// One cycle followed by the restart question. Returns whether to restart.
    fn step(&mut self) -> Result<bool> {
        if let Some(filters) = collect_filters(&mut self.prompter)? {
            self.explore(&filters)?;
            self.cycles += 1;
        }

        self.prompter.say("\nWould you like to restart? | Yes | No |")?;
        let answer = self.prompter.read_answer()?;
        Ok(answer == "yes" || answer == "y")
    }

    fn explore(&mut self, filters: &Filters) -> Result<()> {
        let loaded = load_city(&self.data_dir, filters)?;
        report_load_summary(self.prompter.output(), &loaded)?;
        browse_rows(&mut self.prompter, &loaded.table)?;
        report_all(self.prompter.output(), filters.city, &loaded.table)?;
        Ok(())
    }
}

fn is_input_closed(err: &anyhow::Error) -> bool {
    matches!(err.downcast_ref::<PromptError>(), Some(PromptError::Closed))
}

/// Loads and reports one filter selection without prompting.
pub fn run_report<W: Write>(out: &mut W, data_dir: &Path, filters: &Filters, json: bool) -> Result<()> {
    let loaded = load_city(data_dir, filters)?;
    if json {
        let report = build_report(*filters, &loaded.table);
        print_json(out, &report)
    } else {
        report_load_summary(out, &loaded)?;
        report_all(out, filters.city, &loaded.table)
    }
}
