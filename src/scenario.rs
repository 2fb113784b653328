use std::fs::File;
use std::io::BufReader;

use anyhow::{Context, Result};
use serde::Deserialize;

/// One solve to perform: which network, which variant, and optionally the
/// answer it must produce.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Run {
    pub name: String,
    pub input: String,
    #[serde(default = "default_start")]
    pub start: String,
    pub minutes: u32,
    pub agents: usize,
    pub expected: Option<usize>,
}

fn default_start() -> String {
    "AA".to_string()
}

#[derive(Debug, Deserialize)]
pub struct Scenario {
    pub runs: Vec<Run>,
}

impl Scenario {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("failed to open scenario file {path}"))?;
        let reader = BufReader::new(file);
        let scenario =
            serde_yaml::from_reader(reader).with_context(|| format!("bad scenario file {path}"))?;
        Ok(scenario)
    }
}
