//! Read and write strategy files (YAML, JSON, TOML).

use std::path::Path;

use tracing::info;

use crate::document::StrategyDocument;
use crate::error::{Result, StrategyError};

/// Serialization format of a strategy file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
    Toml,
}

impl Format {
    /// Detects the format from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Some(Self::Yaml),
            Some("json") => Some(Self::Json),
            Some("toml") => Some(Self::Toml),
            _ => None,
        }
    }

    pub fn parse(self, content: &str) -> Result<StrategyDocument> {
        match self {
            Self::Yaml => parse_yaml(content),
            Self::Json => parse_json(content),
            Self::Toml => parse_toml(content),
        }
    }

    pub fn render(self, doc: &StrategyDocument) -> Result<String> {
        let ser = |e: &dyn std::fmt::Display| StrategyError::Serialize(e.to_string());
        match self {
            Self::Yaml => serde_yaml::to_string(doc).map_err(|e| ser(&e)),
            Self::Json => serde_json::to_string_pretty(doc)
                .map(|s| s + "\n")
                .map_err(|e| ser(&e)),
            Self::Toml => toml::to_string_pretty(doc).map_err(|e| ser(&e)),
        }
    }
}

/// Parse a strategy from a YAML string.
pub fn parse_yaml(content: &str) -> Result<StrategyDocument> {
    serde_yaml::from_str(content).map_err(|e| StrategyError::Parse(e.to_string()))
}

/// Parse a strategy from a JSON string.
pub fn parse_json(content: &str) -> Result<StrategyDocument> {
    serde_json::from_str(content).map_err(|e| StrategyError::Parse(e.to_string()))
}

/// Parse a strategy from a TOML string.
pub fn parse_toml(content: &str) -> Result<StrategyDocument> {
    toml::from_str(content).map_err(|e| StrategyError::Parse(e.to_string()))
}

/// Load a strategy document, detecting the format by extension.
///
/// Files without a known extension are tried as JSON, then YAML.
pub fn load_strategy(path: &Path) -> Result<StrategyDocument> {
    let content = std::fs::read_to_string(path)?;
    let doc = match Format::from_path(path) {
        Some(format) => format.parse(&content)?,
        None => parse_json(&content).or_else(|_| parse_yaml(&content))?,
    };
    info!(path = %path.display(), steps = doc.steps.len(), "loaded strategy");
    Ok(doc)
}

/// Write a strategy document in the format implied by the extension
/// (YAML when unknown).
pub fn save_strategy(path: &Path, doc: &StrategyDocument) -> Result<()> {
    let format = Format::from_path(path).unwrap_or(Format::Yaml);
    let rendered = format.render(doc)?;
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(path, rendered)?;
    info!(path = %path.display(), steps = doc.steps.len(), "saved strategy");
    Ok(())
}
