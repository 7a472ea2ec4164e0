use std::process::ExitCode;

use crate::session::batch::BatchError;

/// Process exit statuses. Everything except `Clean` is an operator-facing
/// failure that stops the program before or instead of a drill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Clean,
    StorageUnavailable,
    EmptyPhraseBank,
    ImportFailed,
    LogUnavailable,
    TerminalFailure,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Clean => 0,
            ExitStatus::StorageUnavailable => 1,
            ExitStatus::EmptyPhraseBank => 2,
            ExitStatus::ImportFailed => 3,
            ExitStatus::LogUnavailable => 4,
            ExitStatus::TerminalFailure => 5,
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code())
    }
}

impl From<&BatchError> for ExitStatus {
    fn from(err: &BatchError) -> Self {
        match err {
            BatchError::EmptyBank => ExitStatus::EmptyPhraseBank,
            BatchError::Store(_) => ExitStatus::StorageUnavailable,
        }
    }
}
