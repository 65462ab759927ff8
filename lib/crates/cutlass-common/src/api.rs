use serde::Deserialize;
use std::collections::HashMap;

/// Response of `cf curl /v2/info`
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ApiInfo {
    pub api_version: String,
}

/// Response of `cf curl /v2/apps?q=space_guid:<guid>&q=name:<name>`
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppSearchResults {
    #[serde(default)]
    pub resources: Vec<AppResource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppResource {
    pub metadata: ResourceMetadata,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceMetadata {
    pub guid: String,
}

/// A single entry of `cf curl /v2/apps/<guid>/instances`
#[derive(Debug, Clone, Deserialize)]
pub struct InstanceInfo {
    pub state: String,
}

/// Instances keyed by their index ("0", "1", ...). The cluster returns a
/// JSON object, so iteration order carries no meaning.
pub type Instances = HashMap<String, InstanceInfo>;

/// Response of `cf curl /v2/apps/<guid>/summary`, reduced to the routes.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppSummary {
    #[serde(default)]
    pub routes: Vec<Route>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Route {
    #[serde(default)]
    pub host: String,
    pub domain: RouteDomain,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteDomain {
    pub name: String,
}

impl AppSummary {
    /// Host of the first route joined to its domain, e.g. `app.example.com`.
    pub fn first_route_authority(&self) -> Option<String> {
        self.routes
            .first()
            .map(|route| format!("{}.{}", route.host, route.domain.name))
    }
}
