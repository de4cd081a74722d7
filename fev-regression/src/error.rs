use thiserror::Error;

use crate::StdError;

/// Fatal infrastructure failure: once raised no further fixture is run.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// A command whose failure is not tolerated exited with a non zero code.
    #[error("command `{command}` exited with code {exit_code}")]
    CommandFailed {
        /// Printable command line
        command: String,
        /// Exit code of the process
        exit_code: i32,
    },

    /// A command whose failure is not tolerated was terminated by a signal.
    ///
    /// The signal number is not propagated: the harness exits with code 1.
    #[error("command `{command}` was terminated by a signal")]
    CommandTerminated {
        /// Printable command line
        command: String,
    },

    /// A command could not be started.
    #[error("command `{command}` could not be started")]
    CommandSpawn {
        /// Printable command line
        command: String,
        /// Underlying error
        #[source]
        source: StdError,
    },
}

impl HarnessError {
    /// Exit code the harness must terminate with: the code of the failed process when known.
    pub fn exit_code(&self) -> i32 {
        match self {
            HarnessError::CommandFailed { exit_code, .. } => *exit_code,
            HarnessError::CommandTerminated { .. } | HarnessError::CommandSpawn { .. } => 1,
        }
    }

    /// Find the first [HarnessError] in the chain of the given error.
    pub fn find_in(error: &StdError) -> Option<&HarnessError> {
        error
            .chain()
            .find_map(|cause| cause.downcast_ref::<HarnessError>())
    }
}
