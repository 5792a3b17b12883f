use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use log::info;

use crate::data::loader;
use crate::pager;
use crate::prompt::{Prompter, Restart};
use crate::stats;

/// One interactive user driving filter → load → report → raw data, repeated
/// until they decline to restart.
pub struct Session<R, W> {
    prompter: Prompter<R, W>,
    data_dir: PathBuf,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W, data_dir: impl Into<PathBuf>) -> Self {
        Session {
            prompter: Prompter::new(input, output),
            data_dir: data_dir.into(),
        }
    }

    /// Loop until the user answers "no" to the restart question.  A missing
    /// or malformed data file ends the session with an error.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.run_once()?;
            if self.prompter.ask_restart()? == Restart::No {
                info!("session finished");
                return Ok(());
            }
        }
    }

    /// A single pass; the table is dropped when it returns.
    fn run_once(&mut self) -> Result<()> {
        let filters = self.prompter.get_filters()?;
        info!("filters: {filters:?}");
        let table = loader::load_city(&self.data_dir, &filters)?;

        let out = self.prompter.output();
        stats::time::report(out, &table)?;
        stats::station::report(out, &table)?;
        stats::duration::report(out, &table)?;
        stats::user::report(out, &table)?;

        pager::run(&mut self.prompter, &table)
    }

    pub fn into_output(self) -> W {
        self.prompter.into_output()
    }
}
