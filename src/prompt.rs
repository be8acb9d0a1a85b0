use std::io::{self, BufRead, Stdout, StdinLock, Write};

use crate::error::{Error, Result};

/// Line-oriented question/answer loop used by the interactive modes.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Prompter::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter { input, output }
    }

    pub fn say(&mut self, msg: &str) -> Result<()> {
        writeln!(self.output, "{msg}").map_err(Error::Prompt)
    }

    /// Ask until a non-empty answer is given.
    pub fn required(&mut self, question: &str) -> Result<String> {
        self.required_with(question, |_| true)
    }

    /// Ask until a non-empty answer that passes `valid` is given.
    pub fn required_with(&mut self, question: &str, valid: impl Fn(&str) -> bool) -> Result<String> {
        loop {
            let Some(answer) = self.ask(question)? else {
                return Err(Error::Prompt(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "input closed before a required field was entered",
                )));
            };
            if answer.is_empty() {
                self.say("  This field is required.")?;
                continue;
            }
            if !valid(&answer) {
                self.say("  Invalid format. Please try again.")?;
                continue;
            }
            return Ok(answer);
        }
    }

    /// Ask once; an empty answer (or closed input) skips the field.
    pub fn optional(&mut self, question: &str) -> Result<Option<String>> {
        Ok(self.ask(question)?.filter(|a| !a.is_empty()))
    }

    /// `None` on end of input, otherwise the trimmed line.
    fn ask(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.output, "{question}").map_err(Error::Prompt)?;
        self.output.flush().map_err(Error::Prompt)?;

        let mut line = String::new();
        let n = self.input.read_line(&mut line).map_err(Error::Prompt)?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}
