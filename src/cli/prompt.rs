use std::fmt::Display;
use std::io::{self, BufRead, Write};

use crate::errors::AppError;

/// Typing this at any prompt returns to the main menu.
pub const BACK: &str = "*";

/// Line-oriented dialogue over any reader and writer.
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn say(&mut self, message: impl Display) -> Result<(), AppError> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }

    pub fn blank(&mut self) -> Result<(), AppError> {
        writeln!(self.output)?;
        Ok(())
    }

    /// Reads one trimmed line. End of input is reported as
    /// `UnexpectedEof` so callers can treat it as a request to quit.
    pub fn get_input(&mut self) -> Result<String, AppError> {
        let mut input = String::new();
        if self.input.read_line(&mut input)? == 0 {
            return Err(AppError::Prompt(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "end of input",
            )));
        }
        Ok(input.trim().to_string())
    }

    /// Shows `label` and reads a reply. `None` means the user typed `*`.
    pub fn ask(&mut self, label: &str) -> Result<Option<String>, AppError> {
        write!(self.output, "{label}: ")?;
        self.output.flush()?;

        let input = self.get_input()?;
        if input == BACK {
            return Ok(None);
        }
        Ok(Some(input))
    }

    /// Like `ask`, but repeats the question until `valid` accepts the reply.
    pub fn retry<V>(&mut self, label: &str, valid: V) -> Result<Option<String>, AppError>
    where
        V: Fn(&str) -> Result<(), AppError>,
    {
        loop {
            let Some(input) = self.ask(label)? else {
                return Ok(None);
            };

            match valid(&input) {
                Ok(()) => return Ok(Some(input)),
                Err(e) => self.say(e)?,
            }
        }
    }

    /// Asks a y/N question. Anything but `y`/`yes` is a no.
    pub fn confirm_action(&mut self, action: &str) -> Result<bool, AppError> {
        write!(self.output, "Are you sure you want to {action}? (y/N): ")?;
        self.output.flush()?;

        let answer = self.get_input()?.to_lowercase();
        Ok(answer == "y" || answer == "yes")
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

pub fn is_end_of_input(err: &AppError) -> bool {
    matches!(err, AppError::Prompt(e) if e.kind() == io::ErrorKind::UnexpectedEof)
}
