//! Terminal feedback for import passes
//!
//! Messages go to stderr so stdout stays clean for command output. Choices
//! are read from stdin as a number or an exact option name; an empty line or
//! end of input cancels.

use colored::Colorize;
use efdesign_import::ImportFeedback;
use std::io::{self, BufRead, Write};

/// Feedback sink writing to a terminal
pub struct ConsoleFeedback<R, W> {
    input: R,
    output: W,
}

impl ConsoleFeedback<io::StdinLock<'static>, io::Stderr> {
    /// Feedback on stdin and stderr
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> ConsoleFeedback<R, W> {
    /// Feedback on the given reader and writer
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the writer
    pub fn into_output(self) -> W {
        self.output
    }

    // Feedback is best effort: a closed terminal must not abort the pass.
    fn line(&mut self, text: impl std::fmt::Display) {
        let _ = writeln!(self.output, "{}", text);
    }
}

impl<R: BufRead, W: Write> ImportFeedback for ConsoleFeedback<R, W> {
    fn show_status(&mut self, text: &str) {
        self.line(text.dimmed());
    }

    fn show_info(&mut self, text: &str) {
        self.line(text.cyan());
    }

    fn show_error(&mut self, text: &str) {
        self.line(text.red());
    }

    fn get_choice(&mut self, prompt: &str, options: &[String]) -> Option<String> {
        if options.is_empty() {
            return None;
        }

        self.line(prompt.bold());
        for (index, option) in options.iter().enumerate() {
            self.line(format!("  {}. {}", index + 1, option));
        }

        loop {
            let _ = write!(self.output, "Choice (empty to cancel): ");
            let _ = self.output.flush();

            let mut answer = String::new();
            match self.input.read_line(&mut answer) {
                Ok(0) | Err(_) => return None,
                Ok(_) => {}
            }

            let answer = answer.trim();
            if answer.is_empty() {
                return None;
            }
            if let Some(option) = pick(options, answer) {
                return Some(option.clone());
            }
            self.line(format!("'{}' is not one of the options", answer).yellow());
        }
    }
}

fn pick<'a>(options: &'a [String], answer: &str) -> Option<&'a String> {
    match answer.parse::<usize>() {
        Ok(number) if number >= 1 => options.get(number - 1),
        Ok(_) => None,
        Err(_) => options.iter().find(|option| option.as_str() == answer),
    }
}
