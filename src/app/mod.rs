//! Binary orchestration: config, logging, run plan and exit codes.

pub(crate) mod config_manager;
pub(crate) mod exit_handler;
pub(crate) mod output;
pub(crate) mod plan;
pub(crate) mod runtime;
pub(crate) mod terminal;
