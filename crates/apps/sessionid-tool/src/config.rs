use serde::Deserialize;
use sessionid::{ExtensionBlock, SITE_ID};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
pub struct ToolConfig {
    pub log_level: Option<String>,
    pub site_id: Option<String>,
    #[serde(default)]
    pub extensions: BTreeMap<String, String>,
}

impl ToolConfig {
    pub fn from_toml(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, std::io::Error> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))
    }

    pub fn log_filter(&self) -> &str {
        self.log_level.as_deref().unwrap_or("warn")
    }

    /// Extensions every created identifier starts from. `site_id` is applied
    /// after the `[extensions]` table.
    pub fn default_extensions(&self) -> ExtensionBlock {
        let mut block: ExtensionBlock =
            self.extensions.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        if let Some(site_id) = &self.site_id {
            block.add(SITE_ID, site_id.as_str());
        }
        block
    }
}
