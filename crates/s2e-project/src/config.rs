//! Project configuration store.
//!
//! A JSON object owned by the project-creation workflow. Rules read and
//! write individual options in place; keys they do not know about pass
//! through untouched.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ProjectError, Result};

/// Option names read or written by the configuration rules.
pub mod keys {
    pub const TARGET_PATH: &str = "target_path";
    pub const TARGET_ARGS: &str = "target_args";
    pub const USE_SEEDS: &str = "use_seeds";
    pub const USE_RECIPES: &str = "use_recipes";
    pub const WARN_INPUT_FILE: &str = "warn_input_file";
    pub const WARN_SEEDS: &str = "warn_seeds";
    pub const DYNAMICALLY_LINKED: &str = "dynamically_linked";
    pub const MODELLED_FUNCTIONS: &str = "modelled_functions";
}

/// Mutable mapping from option name to JSON value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ProjectConfig {
    values: Map<String, Value>,
}

impl ProjectConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from a JSON document. The top level must be an object.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// Boolean option; absent or `null` yields `default`.
    pub fn bool_or(&self, key: &str, default: bool) -> Result<bool> {
        match self.values.get(key) {
            None | Some(Value::Null) => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(_) => Err(invalid(key, "a boolean")),
        }
    }

    pub fn str(&self, key: &str) -> Result<Option<&str>> {
        match self.values.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(invalid(key, "a string")),
        }
    }

    /// List-of-strings option; absent or `null` yields an empty list.
    pub fn str_list(&self, key: &str) -> Result<Vec<&str>> {
        match self.values.get(key) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| item.as_str().ok_or_else(|| invalid(key, "a list of strings")))
                .collect(),
            Some(_) => Err(invalid(key, "a list of strings")),
        }
    }

    pub fn target_path(&self) -> Result<PathBuf> {
        self.str(keys::TARGET_PATH)?
            .map(PathBuf::from)
            .ok_or_else(|| ProjectError::MissingOption {
                key: keys::TARGET_PATH.to_string(),
            })
    }

    pub fn target_args(&self) -> Result<Vec<&str>> {
        self.str_list(keys::TARGET_ARGS)
    }

    /// Store a set of names as a sorted JSON array.
    pub fn set_str_set(&mut self, key: &str, names: &BTreeSet<String>) {
        let items = names.iter().cloned().map(Value::String).collect::<Vec<_>>();
        self.set(key, Value::Array(items));
    }
}

fn invalid(key: &str, expected: &'static str) -> ProjectError {
    ProjectError::InvalidOption {
        key: key.to_string(),
        expected,
    }
}
