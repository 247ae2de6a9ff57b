use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{BufRead, Write};

use crate::error::{DeployError, DeployResult};

/// Source of operator input during a task.
pub trait Prompter {
    /// Ask for a value. An empty answer yields `default` when one
    /// is given.
    fn prompt(&self, label: &str, default: Option<&str>) -> DeployResult<String>;

    /// Ask a yes/no question. An empty answer yields `default`.
    fn confirm(&self, question: &str, default: bool) -> DeployResult<bool>;
}

/// Reads answers from the terminal.
pub struct Console;

impl Console {
    fn read_line() -> DeployResult<String> {
        let mut input = String::new();
        let read = std::io::stdin().lock().read_line(&mut input)?;
        if read == 0 {
            return Err(DeployError::Aborted("end of input".into()));
        }
        Ok(input.trim().to_string())
    }
}

impl Prompter for Console {
    fn prompt(&self, label: &str, default: Option<&str>) -> DeployResult<String> {
        match default {
            Some(d) => eprint!("{label} [{d}] "),
            None => eprint!("{label} "),
        }
        std::io::stderr().flush()?;
        let answer = Self::read_line()?;
        Ok(resolve_answer(answer, default))
    }

    fn confirm(&self, question: &str, default: bool) -> DeployResult<bool> {
        let hint = if default { "Y/n" } else { "y/N" };
        loop {
            eprint!("{question} [{hint}] ");
            std::io::stderr().flush()?;
            let answer = Self::read_line()?;
            match parse_yes_no(&answer, default) {
                Some(choice) => return Ok(choice),
                None => eprintln!("I didn't understand you. Please specify '(y)es' or '(n)o'."),
            }
        }
    }
}

/// Pre-recorded answers, consumed in order.
#[derive(Debug, Default)]
pub struct Scripted {
    answers: RefCell<VecDeque<String>>,
    asked: RefCell<Vec<String>>,
}

impl Scripted {
    #[must_use]
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: RefCell::new(answers.iter().map(|a| (*a).to_string()).collect()),
            asked: RefCell::new(Vec::new()),
        }
    }

    /// Labels and questions asked so far.
    #[must_use]
    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }

    fn next(&self, label: &str) -> DeployResult<String> {
        self.asked.borrow_mut().push(label.to_string());
        self.answers
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| DeployError::Aborted(format!("no answer scripted for '{label}'")))
    }
}

impl Prompter for Scripted {
    fn prompt(&self, label: &str, default: Option<&str>) -> DeployResult<String> {
        let answer = self.next(label)?;
        Ok(resolve_answer(answer, default))
    }

    fn confirm(&self, question: &str, default: bool) -> DeployResult<bool> {
        let answer = self.next(question)?;
        parse_yes_no(&answer, default)
            .ok_or_else(|| DeployError::InvalidArgument(format!("not a yes/no answer: {answer}")))
    }
}

/// Always answers with the default, and `yes` to confirmations.
pub struct AssumeYes;

impl Prompter for AssumeYes {
    fn prompt(&self, label: &str, default: Option<&str>) -> DeployResult<String> {
        default
            .map(str::to_string)
            .ok_or_else(|| DeployError::Aborted(format!("'{label}' needs an answer")))
    }

    fn confirm(&self, _question: &str, _default: bool) -> DeployResult<bool> {
        Ok(true)
    }
}

fn resolve_answer(answer: String, default: Option<&str>) -> String {
    match default {
        Some(d) if answer.is_empty() => d.to_string(),
        _ => answer,
    }
}

/// Interpret a yes/no answer. `None` when it is neither.
#[must_use]
pub fn parse_yes_no(answer: &str, default: bool) -> Option<bool> {
    match answer.trim().to_lowercase().as_str() {
        "" => Some(default),
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_no_parsing() {
        assert_eq!(parse_yes_no("", false), Some(false));
        assert_eq!(parse_yes_no("", true), Some(true));
        assert_eq!(parse_yes_no("Y", false), Some(true));
        assert_eq!(parse_yes_no("yes", false), Some(true));
        assert_eq!(parse_yes_no("NO", true), Some(false));
        assert_eq!(parse_yes_no("maybe", true), None);
    }

    #[test]
    fn scripted_uses_default_for_empty_answer() {
        let prompter = Scripted::new(&["", "mail.example.com"]);

        assert_eq!(prompter.prompt("smtp port:", Some("587")).unwrap(), "587");
        assert_eq!(
            prompter.prompt("smtp host:", Some("smtp.gmail.com")).unwrap(),
            "mail.example.com"
        );
        assert_eq!(prompter.asked(), vec!["smtp port:", "smtp host:"]);
    }

    #[test]
    fn scripted_runs_out() {
        let prompter = Scripted::new(&[]);
        assert!(matches!(
            prompter.prompt("smtp user:", None),
            Err(DeployError::Aborted(_))
        ));
    }

    #[test]
    fn assume_yes_needs_defaults() {
        assert_eq!(AssumeYes.prompt("port", Some("587")).unwrap(), "587");
        assert!(AssumeYes.prompt("user", None).is_err());
        assert!(AssumeYes.confirm("sure?", false).unwrap());
    }
}
