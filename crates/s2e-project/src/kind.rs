//! Project kinds and their configuration rules.
//!
//! Every project targets exactly one [`ProjectKind`]. The kind decides which
//! images can host the binary, which options are mandatory, and what gets
//! learned from the binary before templates are rendered.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::analyzer::BinaryAnalyzer;
use crate::compat::{is_valid_arch, OsDescriptor, FORMAT_DECREE, FORMAT_ELF, FORMAT_PE};
use crate::config::{keys, ProjectConfig};
use crate::error::{ProjectError, Result};

/// Platform category of the target binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    Windows,
    Linux,
    Cgc,
}

/// Non-fatal findings of [`ProjectKind::validate_configuration`].
///
/// Each warning has already been logged; the report lets callers surface
/// them again (e.g. in a summary) without scraping logs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    fn warn(&mut self, message: &str) {
        warn!("{}", message);
        self.warnings.push(message.to_string());
    }
}

impl ProjectKind {
    pub const ALL: [ProjectKind; 3] = [ProjectKind::Windows, ProjectKind::Linux, ProjectKind::Cgc];

    /// Type tag written to the project description.
    pub fn project_type(self) -> &'static str {
        match self {
            ProjectKind::Windows => "windows",
            ProjectKind::Linux => "linux",
            ProjectKind::Cgc => "cgc",
        }
    }

    pub fn bootstrap_template(self) -> &'static str {
        match self {
            ProjectKind::Windows => "bootstrap.windows.sh",
            ProjectKind::Linux => "bootstrap.linux.sh",
            ProjectKind::Cgc => "bootstrap.cgc.sh",
        }
    }

    pub fn lua_template(self) -> &'static str {
        match self {
            ProjectKind::Windows => "s2e-config.windows.lua",
            ProjectKind::Linux => "s2e-config.linux.lua",
            ProjectKind::Cgc => "s2e-config.cgc.lua",
        }
    }

    /// Binary format an image must list for this kind's targets.
    pub fn required_binary_format(self) -> &'static str {
        match self {
            ProjectKind::Windows => FORMAT_PE,
            ProjectKind::Linux => FORMAT_ELF,
            ProjectKind::Cgc => FORMAT_DECREE,
        }
    }

    /// Whether an image can host a binary of this kind and architecture.
    pub fn is_valid_binary(self, target_arch: &str, os: &OsDescriptor) -> bool {
        is_valid_arch(target_arch, os) && os.supports_format(self.required_binary_format())
    }

    /// Check the configuration for options this kind cannot support, forcing
    /// mandatory options on where a safe default exists.
    ///
    /// # Errors
    ///
    /// - `ProjectError::Configuration` — a CGC project was given command
    ///   line arguments. The configuration is left untouched.
    /// - `ProjectError::InvalidOption` — an option this kind reads has the
    ///   wrong JSON type.
    pub fn validate_configuration(self, config: &mut ProjectConfig) -> Result<ValidationReport> {
        match self {
            ProjectKind::Windows | ProjectKind::Linux => Ok(ValidationReport::default()),
            ProjectKind::Cgc => validate_cgc(config),
        }
    }

    /// Record facts about the target binary in the configuration.
    ///
    /// Analyzer failures propagate and leave the configuration unchanged.
    pub fn analyze(
        self,
        config: &mut ProjectConfig,
        analyzer: &dyn BinaryAnalyzer,
    ) -> Result<()> {
        match self {
            ProjectKind::Windows | ProjectKind::Cgc => Ok(()),
            ProjectKind::Linux => analyze_linux(config, analyzer),
        }
    }

    /// Validate, then analyze: the order project creation runs the rules in.
    pub fn prepare(
        self,
        config: &mut ProjectConfig,
        analyzer: &dyn BinaryAnalyzer,
    ) -> Result<ValidationReport> {
        let report = self.validate_configuration(config)?;
        self.analyze(config, analyzer)?;
        Ok(report)
    }
}

fn validate_cgc(config: &mut ProjectConfig) -> Result<ValidationReport> {
    if !config.target_args()?.is_empty() {
        return Err(ProjectError::Configuration(
            "Command line arguments for Decree binaries not supported".to_string(),
        ));
    }

    let use_seeds = config.bool_or(keys::USE_SEEDS, false)?;
    let use_recipes = config.bool_or(keys::USE_RECIPES, false)?;

    let mut report = ValidationReport::default();
    if !use_seeds {
        report.warn("CGC requires seeds, forcing seed option on");
        config.set(keys::USE_SEEDS, true);
    }
    if !use_recipes {
        report.warn("CGC requires recipes, forcing recipe option on");
        config.set(keys::USE_RECIPES, true);
    }

    // CGC binaries do not take input files
    config.set(keys::WARN_INPUT_FILE, false);
    config.set(keys::WARN_SEEDS, false);

    Ok(report)
}

fn analyze_linux(config: &mut ProjectConfig, analyzer: &dyn BinaryAnalyzer) -> Result<()> {
    let path = config.target_path()?;

    let (dynamically_linked, modelled_functions) = {
        let binary = analyzer.open(&path)?;
        let functions = binary
            .modelled_functions()
            .map_err(ProjectError::Analysis)?;
        (binary.is_dynamically_linked(), functions)
    };

    debug!(
        path = %path.display(),
        dynamically_linked,
        modelled = modelled_functions.len(),
        "Analyzed Linux target"
    );
    config.set(keys::DYNAMICALLY_LINKED, dynamically_linked);
    config.set_str_set(keys::MODELLED_FUNCTIONS, &modelled_functions);
    Ok(())
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.project_type())
    }
}

impl FromStr for ProjectKind {
    type Err = ProjectError;

    fn from_str(s: &str) -> Result<Self> {
        ProjectKind::ALL
            .into_iter()
            .find(|kind| kind.project_type().eq_ignore_ascii_case(s))
            .ok_or_else(|| ProjectError::UnknownKind(s.to_string()))
    }
}
