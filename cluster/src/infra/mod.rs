//! Infrastructure layer: concrete adapters for processes, files and HTTP.

pub mod cf_cli;
pub mod cf_config;
pub mod command_runner;
pub mod config;
pub mod http;
pub mod log_tail;

pub use cf_cli::CfCli;
pub use cf_config::CfConfigFile;
pub use command_runner::TokioCommandRunner;
pub use http::ReqwestHttpClient;
pub use log_tail::LogTail;
