//! Cross-option rules checked after parsing and before a command runs.
//!
//! clap validates each option on its own; these rules look at which options
//! were supplied together and produce dnvm's own wording when they clash.

use clap::ArgMatches;
use clap::parser::ValueSource;
use dnvm_core::ToolError;
use thiserror::Error;

/// Which options the user typed, by long name without dashes.
pub trait SuppliedOptions {
    /// Whether `--{long}` appeared on the command line.
    fn was_supplied(&self, long: &str) -> bool;
}

impl SuppliedOptions for ArgMatches {
    fn was_supplied(&self, long: &str) -> bool {
        // Derived ids are the snake_case field names.
        let id = long.replace('-', "_");
        self.value_source(&id) == Some(ValueSource::CommandLine)
    }
}

impl SuppliedOptions for [&str] {
    fn was_supplied(&self, long: &str) -> bool {
        self.iter().any(|s| *s == long)
    }
}

/// A rule between options of one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Exactly one of these options (at least two) must be supplied.
    ExactlyOneOf(&'static [&'static str]),
    /// `option` may only be supplied together with `requires`.
    Requires {
        /// The dependent option.
        option: &'static str,
        /// The option it depends on.
        requires: &'static str,
    },
}

/// A broken [`Constraint`], carrying the message shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ConstraintViolation(pub String);

impl From<ConstraintViolation> for ToolError {
    fn from(violation: ConstraintViolation) -> Self {
        ToolError::InvalidOptions(violation.0)
    }
}

impl Constraint {
    /// Evaluate against the supplied options.
    ///
    /// # Errors
    ///
    /// Returns the violation message if the rule does not hold.
    pub fn check<S>(&self, supplied: &S) -> Result<(), ConstraintViolation>
    where
        S: SuppliedOptions + ?Sized,
    {
        match *self {
            Self::ExactlyOneOf(options) => {
                debug_assert!(options.len() >= 2);
                let count = options
                    .iter()
                    .filter(|option| supplied.was_supplied(option))
                    .count();
                if count == 1 {
                    Ok(())
                } else {
                    Err(ConstraintViolation(one_of_required_text(options)))
                }
            }
            Self::Requires { option, requires } => {
                if supplied.was_supplied(option) && !supplied.was_supplied(requires) {
                    Err(ConstraintViolation(format!(
                        "Option '--{option}' is only valid when also using '--{requires}'."
                    )))
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// Check every rule, stopping at the first violation.
///
/// # Errors
///
/// Returns the first violated rule's message.
pub fn validate<S>(supplied: &S, constraints: &[Constraint]) -> Result<(), ConstraintViolation>
where
    S: SuppliedOptions + ?Sized,
{
    constraints.iter().try_for_each(|c| c.check(supplied))
}

fn one_of_required_text(options: &[&str]) -> String {
    let names: Vec<String> = options.iter().map(|o| format!("'--{o}'")).collect();
    let list = match names.as_slice() {
        [first, second] => format!("{first} or {second}"),
        [init @ .., last] => format!("{}, or {last}", init.join(", ")),
        [] => String::new(),
    };
    format!("Exactly one of the options {list} is required.")
}
