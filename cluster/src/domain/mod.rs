//! Domain layer: pure types and rules with no process, network or
//! filesystem access.

pub mod app;
pub mod config;
pub mod error;
pub mod naming;
pub mod push;
pub mod request;
pub mod version;

pub use app::{AppSpec, RUNNING_STATE, single_instance_running};
pub use config::ClusterConfig;
pub use error::ClusterError;
pub use naming::{NameGenerator, SUFFIX_LEN};
pub use request::{BasicAuth, GetOptions, HttpResponse};
