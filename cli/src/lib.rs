//! Library side of the `kutta` binary: configuration, script replay and the
//! JSON views it prints.

pub mod config;
pub mod script;
pub mod summary;

pub use config::{CliConfig, ConfigError, TokenConfig};
pub use script::{apply_op, parse_script, replay, OpOutcome, Replay, ScriptError, ScriptOp};
pub use summary::LedgerSummary;
