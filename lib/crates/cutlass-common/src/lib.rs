//! Wire types shared by the cutlass harness crates.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod api;
pub mod config;

pub use api::{
    ApiInfo, AppResource, AppSearchResults, AppSummary, InstanceInfo, Instances, ResourceMetadata,
    Route, RouteDomain,
};
pub use config::{CfConfig, SpaceFields};
