//! CLI entry point for chapter-sync.

use std::process::ExitCode;

mod app;
mod app_config;
mod cli;

/// Process exit outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProcessExit {
    /// Every series finished, hit its quota, or was interrupted.
    Success,
    /// At least one series or discovery probe failed.
    Partial,
    /// Setup failed before any work was done.
    Failure,
}

impl From<ProcessExit> for ExitCode {
    fn from(exit: ProcessExit) -> Self {
        match exit {
            ProcessExit::Success => Self::SUCCESS,
            ProcessExit::Partial => Self::from(1),
            ProcessExit::Failure => Self::from(2),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    match app::runtime::run_chapter_sync().await {
        Ok(exit) => exit.into(),
        Err(error) => {
            eprintln!("Error: {error:#}");
            ProcessExit::Failure.into()
        }
    }
}
