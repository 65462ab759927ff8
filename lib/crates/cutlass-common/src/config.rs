use serde::Deserialize;

/// The subset of `~/.cf/config.json` needed to scope app lookups.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CfConfig {
    #[serde(rename = "SpaceFields", default)]
    pub space_fields: SpaceFields,
}

/// The currently targeted space.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SpaceFields {
    #[serde(rename = "GUID", default)]
    pub guid: String,
    #[serde(rename = "Name", default)]
    pub name: String,
}
