use std::io::{BufRead, Write};

use super::{ParameterProvider, RunParameters};
use crate::error::FrequencyError;

/// Prompts for each parameter on `output` and reads answers from `input`.
pub struct InteractiveProvider<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> InteractiveProvider<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// An unanswerable prompt (closed input) counts as a missing parameter.
    fn ask(&mut self, prompt: &str, field: &'static str) -> Result<String, FrequencyError> {
        let missing = || FrequencyError::MissingParameter(field);
        write!(self.output, "{prompt}: ").map_err(|_| missing())?;
        self.output.flush().map_err(|_| missing())?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(|_| missing())?;
        let answer = line.trim();
        if read == 0 || answer.is_empty() {
            return Err(missing());
        }
        Ok(answer.to_string())
    }
}

impl<R: BufRead, W: Write> ParameterProvider for InteractiveProvider<R, W> {
    fn parameters(&mut self) -> Result<RunParameters, FrequencyError> {
        let date = self.ask("Date (YYYY-MM-DD)", "date")?;
        let start = self.ask("Start time (HH:MM:SS)", "start time")?;
        let end = self.ask("End time (HH:MM:SS, may exceed 24:00:00)", "end time")?;
        RunParameters::parse(&date, &start, &end)
    }
}
