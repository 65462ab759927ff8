//! Application layer: the cluster and app use-cases, written against ports.

pub mod app;
pub mod cluster;
pub mod ports;

pub use app::AppHandle;
pub use cluster::ClusterClient;
