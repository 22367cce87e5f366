use std::process::ExitCode;

/// Process exit status of a lingo run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// Every file was processed and all outputs were written.
    Success,
    /// The pass finished, but some files failed (I/O, exhausted id space).
    Failure,
    /// The pass was aborted: bad config, invalid options, or a catalog that
    /// could not be written.
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code())
    }
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::Failure => 1,
            ExitStatus::Error => 2,
        }
    }
}
