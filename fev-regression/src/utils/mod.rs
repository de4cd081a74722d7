pub mod file_utils;
mod harness_command;

#[cfg(test)]
pub use harness_command::MockProcessRunner;
pub use harness_command::{
    CommandOutput, HarnessCommand, ProcessRunner, RunOptions, TokioProcessRunner,
};
