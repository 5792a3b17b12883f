use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::Result;
use log::debug;

use crate::data::filter::Filters;
use crate::data::model::{City, DayFilter, MonthFilter};
use crate::error::ExploreError;

pub const SEPARATOR: &str = "----------------------------------------";

/// Answer to the restart question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restart {
    Yes,
    No,
}

/// Console question/answer channel.  Generic so tests can script the input.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter { input, output }
    }

    /// Where reports and tables are written.
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Print `question` and read one line.  End of input is an error; an
    /// interactive user can always answer, a closed pipe never will.
    pub fn ask(&mut self, question: &str) -> Result<String> {
        writeln!(self.output, "\n{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(ExploreError::InputClosed.into());
        }
        Ok(line.trim().to_string())
    }

    /// Re-ask until the answer parses.  No retry limit.
    fn ask_until<T: FromStr>(&mut self, question: &str, complaint: &str) -> Result<T> {
        loop {
            let answer = self.ask(question)?;
            match answer.parse::<T>() {
                Ok(value) => return Ok(value),
                Err(_) => {
                    debug!("rejected answer {answer:?}");
                    writeln!(self.output, "{complaint}")?;
                }
            }
        }
    }

    /// Collect city, month and day choices.
    pub fn get_filters(&mut self) -> Result<Filters> {
        writeln!(self.output, "Hello! Let's explore some US bikeshare data!")?;

        let city: City = self.ask_until(
            "Would you like to see data for Chicago, New York City, or Washington?",
            "Sorry, There is no data about this city in our database. Please try again.",
        )?;
        let month: MonthFilter = self.ask_until(
            "Would you like to filter the data by month or not at all? \
             Enter any one of the first 6 months or enter 'All' to select all 6 months.",
            "Sorry, This is not a month or one of the first 6 months. Please try again.",
        )?;
        let day: DayFilter = self.ask_until(
            "Would you like to filter the data by weekday or not at all, \
             if not at all please enter 'all'",
            "Sorry, This is not a weekday. Please try again.",
        )?;

        writeln!(self.output, "{SEPARATOR}")?;
        Ok(Filters::new(city, month, day))
    }

    /// Single yes/no question; anything but "yes"/"y" counts as no.
    pub fn ask_yes(&mut self, question: &str) -> Result<bool> {
        let answer = self.ask(question)?;
        Ok(is_yes(&answer))
    }

    /// The restart question insists on a clear yes or no.
    pub fn ask_restart(&mut self) -> Result<Restart> {
        loop {
            let answer = self.ask("Would you like to restart? Enter yes or no.")?;
            if is_yes(&answer) {
                return Ok(Restart::Yes);
            }
            if is_no(&answer) {
                return Ok(Restart::No);
            }
            writeln!(self.output, "\nTry again, Enter yes or no.")?;
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "yes" | "y")
}

fn is_no(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "no" | "n")
}
