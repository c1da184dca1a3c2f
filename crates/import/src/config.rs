//! Import configuration
//!
//! Lists the external parser tools to try, in priority order, and where their
//! output goes. Loadable from TOML:
//!
//! ```toml
//! parser_dir = "/opt/efdesigner"
//! temp_dir = "/tmp"
//!
//! [[parsers]]
//! path = "Parsers/EF6ParserFmwk.exe"
//! description = "Assembly is .NET Framework, DbContext is Entity Framework 6"
//! ```

use efdesign_core::{EngineError, EngineResult, Validatable};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ============================================================================
// ParserTool
// ============================================================================

/// One candidate parser executable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserTool {
    /// Executable path, absolute or relative to the parser directory
    pub path: PathBuf,

    /// Shown once the tool accepts the input
    pub description: String,
}

impl ParserTool {
    /// Create a parser candidate
    pub fn new(path: impl Into<PathBuf>, description: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            description: description.into(),
        }
    }
}

// ============================================================================
// ImportConfig
// ============================================================================

/// Configuration for an assembly import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Base directory for relative parser paths; the executable's directory
    /// when unset
    pub parser_dir: Option<PathBuf>,

    /// Parser candidates in priority order
    pub parsers: Vec<ParserTool>,

    /// Directory for the parser output artifact; the system temp directory
    /// when unset
    pub temp_dir: Option<PathBuf>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            parser_dir: None,
            parsers: vec![
                ParserTool::new(
                    "Parsers/EF6ParserFmwk.exe",
                    "Assembly is .NET Framework, DbContext is Entity Framework 6",
                ),
                ParserTool::new(
                    "Parsers/EFCoreParserFmwk.exe",
                    "Assembly is .NET Framework, DbContext is Entity Framework Core",
                ),
                ParserTool::new(
                    "Parsers/EFCoreParser.exe",
                    "Assembly is .NET Core, DbContext is Entity Framework Core",
                ),
            ],
            temp_dir: None,
        }
    }
}

impl ImportConfig {
    /// Create a configuration with the stock parsers
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the parser directory
    pub fn with_parser_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.parser_dir = Some(dir.into());
        self
    }

    /// Replace the parser candidates
    pub fn with_parsers(mut self, parsers: Vec<ParserTool>) -> Self {
        self.parsers = parsers;
        self
    }

    /// Set the directory for output artifacts
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> EngineResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| EngineError::FileRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    /// Full path of a parser executable
    pub fn resolve_tool(&self, tool: &ParserTool) -> PathBuf {
        if tool.path.is_absolute() {
            return tool.path.clone();
        }

        match self.parser_dir.clone().or_else(executable_dir) {
            Some(dir) => dir.join(&tool.path),
            None => tool.path.clone(),
        }
    }

    /// Directory for output artifacts
    pub fn artifact_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

impl Validatable for ImportConfig {
    fn validate(&self) -> EngineResult<()> {
        if self.parsers.is_empty() {
            return Err(EngineError::InvalidConfig(
                "At least one parser must be configured".to_string(),
            ));
        }

        if let Some(tool) = self.parsers.iter().find(|t| t.path.as_os_str().is_empty()) {
            return Err(EngineError::InvalidConfig(format!(
                "Parser '{}' has no path",
                tool.description
            )));
        }

        Ok(())
    }
}

fn executable_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}

// ============================================================================
// Tests
// ============================================================================
