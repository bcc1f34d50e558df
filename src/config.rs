use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::source::{DirSource, HttpSource, Source};

#[derive(Deserialize)]
pub struct Config {
    pub http_port: u16,
    pub source: SourceConfig,

    // without a tile layer the map provider is treated as not loaded
    pub map: Option<MapConfig>,
}

#[derive(Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_source_name")]
    pub name: String,
    #[serde(flatten)]
    pub location: SourceLocation,
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceLocation {
    Dir(PathBuf),
    Url(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct MapConfig {
    pub tile_url: String,
    #[serde(default)]
    pub attribution: String,
}

fn default_source_name() -> String {
    "sample_race.csv".to_string()
}

impl SourceConfig {
    pub fn source(&self) -> Source {
        match &self.location {
            SourceLocation::Dir(path) => Source::Dir(DirSource::new(path)),
            SourceLocation::Url(url) => Source::Http(HttpSource::new(url)),
        }
    }
}

pub fn load(path: &Path) -> Result<Config> {
    let data = fs::read_to_string(path).context("Failed to read config")?;
    let config = toml::from_str(&data).context("Failed to parse config")?;
    Ok(config)
}
