use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Run configuration. Keys are read in lowercase or capitalized form; missing keys keep their
/// zero value.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Conf {
    #[serde(alias = "Query")]
    pub query: String,
    #[serde(alias = "Fields")]
    pub fields: usize,
    #[serde(alias = "Months")]
    pub months: i32,
    #[serde(alias = "Directory")]
    pub directory: PathBuf,
    #[serde(alias = "Systems")]
    pub systems: BTreeMap<String, String>,
}

pub fn load(path: &Path) -> Result<Conf> {
    let file = File::open(path)
        .with_context(|| format!("cannot open configuration file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("cannot decode JSON configuration from {}", path.display()))
}
