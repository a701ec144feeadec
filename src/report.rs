/*!
Test outcomes, as the operator sees them.
*/
use std::process::ExitCode;
use log::{error, info};
use crate::adapter::Report;
use crate::error::{Error, ErrorKind};

/**
The result of one test run.  Every run produces exactly one.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub failed: bool,
    /// What went wrong; empty on success.
    pub message: String,
    pub kind: Option<ErrorKind>,
    /// Code units that reached the destination.
    pub units: usize,
    pub advisories: Vec<String>,
}

impl Outcome {
    pub fn success(report: Report) -> Outcome {
        Outcome {
            failed: false,
            message: String::new(),
            kind: None,
            units: report.units,
            advisories: report.advisories,
        }
    }

    pub fn failure(err: &Error) -> Outcome {
        Outcome {
            failed: true,
            message: err.to_string(),
            kind: Some(err.kind()),
            units: 0,
            advisories: vec![],
        }
    }

    /// Writes the failure and any advisories to the log.
    pub fn log(&self) {
        if self.failed {
            error!("{}", self.message);
        }
        for advisory in &self.advisories {
            info!("{}", advisory);
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.failed {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_failure_carries_kind() {
        let outcome = Outcome::failure(&Error::ShortWrite { requested: 6, written: 2 });
        assert!(outcome.failed);
        assert_eq!(outcome.kind, Some(ErrorKind::ShortWrite));
        assert_eq!(outcome.message, "unable to write entire output (2 of 6 units written)");
    }

    #[test]
    fn test_advisory_is_not_failure() {
        let outcome = Outcome::success(Report {
            units: 1,
            advisories: vec!["stream is in 'failed' state".to_owned()],
        });
        assert!(!outcome.failed);
        assert_eq!(outcome.units, 1);
    }
}
