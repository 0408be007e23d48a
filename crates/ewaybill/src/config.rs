//! Issuer and batch configuration
//!
//! Both structs deserialize from JSON with every field optional; missing
//! fields fall back to the defaults below.

use crate::{BillError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Business values printed on every bill
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct IssuerConfig {
    /// Registration code shown as "Entered By"
    pub registration: String,

    /// "Generated By" identity
    pub generated_by: String,

    /// "GSTIN of Supplier" value
    pub supplier: String,

    /// "GSTIN of Recipient" value
    pub recipient: String,

    pub transaction_type: String,

    /// Transport mode in the Part-B table
    pub transport_mode: String,

    /// Disclaimer at the bottom of the bill
    pub footnote: String,
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            registration: "29AAACT1507C1ZT".to_string(),
            generated_by: "29AAA CT150 7C1ZT - ACC LIMITED".to_string(),
            supplier: "29AAACT1507C1ZT,ACC LIMITED".to_string(),
            recipient: "29AAACT1507C1ZT,ACC LIMITED".to_string(),
            transaction_type: "- NA -".to_string(),
            transport_mode: "Road".to_string(),
            footnote: "Note*: If any discrepancy in information please try after sometime"
                .to_string(),
        }
    }
}

/// Where rows come from and where bills go
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct BatchConfig {
    /// Spreadsheet path
    pub input: PathBuf,

    /// Worksheet name
    pub sheet: String,

    pub output_dir: PathBuf,

    /// Number of digits a bill number must have
    pub bill_number_length: usize,

    /// Create `output_dir` before the batch starts
    pub create_output_dir: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            sheet: "ACC".to_string(),
            output_dir: PathBuf::from("output"),
            bill_number_length: 12,
            create_output_dir: false,
        }
    }
}

/// Contents of a configuration file
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub issuer: IssuerConfig,
    pub batch: BatchConfig,
}

impl Config {
    /// Parse a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| BillError::Config(e.to_string()))
    }

    /// Read and parse a JSON configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| BillError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }
}
