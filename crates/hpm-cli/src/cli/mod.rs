pub mod command;
pub mod config;
pub mod handler;

pub use command::CliCommand;
pub use config::CliConfig;
pub use handler::{execute, report_check_in};
