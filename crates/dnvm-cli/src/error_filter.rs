//! Decides how a failed command ends.

use dnvm_core::{Reporter, ToolError};

/// Whether the top level should print `err` and exit quietly.
///
/// Outside debug mode the message goes to `reporter` and the answer is
/// `true`. In debug mode nothing is logged and the error propagates with
/// full detail. Only [`ToolError`]s reach this function; any other error is
/// a bug and always propagates.
pub fn should_suppress(err: &ToolError, reporter: &dyn Reporter, debug: bool) -> bool {
    if debug {
        return false;
    }

    reporter.error(&err.to_string());
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording(Mutex<Vec<String>>);

    impl Reporter for Recording {
        fn info(&self, _msg: &str) {}
        fn warning(&self, _msg: &str) {}
        fn error(&self, msg: &str) {
            self.0.lock().unwrap().push(msg.to_string());
        }
    }

    #[test]
    fn tool_errors_are_suppressed_and_logged() {
        let reporter = Recording::default();
        let err = ToolError::InvalidOptions("Exactly one of the options was wrong.".into());
        assert!(should_suppress(&err, &reporter, false));
        assert_eq!(
            *reporter.0.lock().unwrap(),
            vec!["Exactly one of the options was wrong.".to_string()]
        );
    }

    #[test]
    fn debug_mode_never_suppresses() {
        let reporter = Recording::default();
        let errors = [
            ToolError::Unsupported("nope".into()),
            ToolError::io("Failed to read /x", std::io::ErrorKind::NotFound.into()),
        ];
        for err in &errors {
            assert!(!should_suppress(err, &reporter, true));
        }
        assert!(reporter.0.lock().unwrap().is_empty());
    }
}
