//! Typed option bag and flag descriptors
//!
//! The orchestration host hands every lifecycle call a [`DriverOptions`]
//! bag. Values are stored per type and looked up by an ordered list of
//! names, so a field can be read from its current flag name first and
//! from a legacy name after that.

use crate::error::{DriverError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Declared type of an option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FlagType {
    String,
    Int,
    Bool,
    StringSlice,
}

impl std::fmt::Display for FlagType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlagType::String => write!(f, "string"),
            FlagType::Int => write!(f, "int"),
            FlagType::Bool => write!(f, "bool"),
            FlagType::StringSlice => write!(f, "stringSlice"),
        }
    }
}

/// A single typed option value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    String(String),
    StringSlice(Vec<String>),
}

impl OptionValue {
    /// Zero value for a declared type
    pub fn zero(flag_type: FlagType) -> Self {
        match flag_type {
            FlagType::String => OptionValue::String(String::new()),
            FlagType::Int => OptionValue::Int(0),
            FlagType::Bool => OptionValue::Bool(false),
            FlagType::StringSlice => OptionValue::StringSlice(Vec::new()),
        }
    }

    /// Parse a raw command-line value according to the declared type
    ///
    /// String slices are comma separated; empty segments are dropped.
    pub fn parse(name: &str, flag_type: FlagType, raw: &str) -> Result<Self> {
        match flag_type {
            FlagType::String => Ok(OptionValue::String(raw.to_string())),
            FlagType::Int => raw
                .trim()
                .parse::<i64>()
                .map(OptionValue::Int)
                .map_err(|e| DriverError::invalid_option(name, e.to_string())),
            FlagType::Bool => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(OptionValue::Bool(true)),
                "false" | "0" | "no" => Ok(OptionValue::Bool(false)),
                other => Err(DriverError::invalid_option(
                    name,
                    format!("expected a boolean, got '{}'", other),
                )),
            },
            FlagType::StringSlice => Ok(OptionValue::StringSlice(
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            )),
        }
    }

    pub fn flag_type(&self) -> FlagType {
        match self {
            OptionValue::String(_) => FlagType::String,
            OptionValue::Int(_) => FlagType::Int,
            OptionValue::Bool(_) => FlagType::Bool,
            OptionValue::StringSlice(_) => FlagType::StringSlice,
        }
    }
}

/// Option bag passed in by the orchestration host
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriverOptions {
    #[serde(default)]
    pub string_options: HashMap<String, String>,

    #[serde(default)]
    pub int_options: HashMap<String, i64>,

    #[serde(default)]
    pub bool_options: HashMap<String, bool>,

    #[serde(default)]
    pub string_slice_options: HashMap<String, Vec<String>>,
}

impl DriverOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_string(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.string_options.insert(key.into(), value.into());
        self
    }

    pub fn with_int(mut self, key: impl Into<String>, value: i64) -> Self {
        self.int_options.insert(key.into(), value);
        self
    }

    pub fn with_bool(mut self, key: impl Into<String>, value: bool) -> Self {
        self.bool_options.insert(key.into(), value);
        self
    }

    /// Store a value in the map matching its type
    pub fn set(&mut self, key: impl Into<String>, value: OptionValue) {
        let key = key.into();
        match value {
            OptionValue::String(v) => {
                self.string_options.insert(key, v);
            }
            OptionValue::Int(v) => {
                self.int_options.insert(key, v);
            }
            OptionValue::Bool(v) => {
                self.bool_options.insert(key, v);
            }
            OptionValue::StringSlice(v) => {
                self.string_slice_options.insert(key, v);
            }
        }
    }

    /// Look up a value of the declared type under the first present key
    ///
    /// Returns the type's zero value when none of the keys is set.
    pub fn get_value(&self, flag_type: FlagType, keys: &[&str]) -> OptionValue {
        let found = match flag_type {
            FlagType::String => first_of(&self.string_options, keys).cloned().map(OptionValue::String),
            FlagType::Int => first_of(&self.int_options, keys).copied().map(OptionValue::Int),
            FlagType::Bool => first_of(&self.bool_options, keys).copied().map(OptionValue::Bool),
            FlagType::StringSlice => first_of(&self.string_slice_options, keys)
                .cloned()
                .map(OptionValue::StringSlice),
        };
        found.unwrap_or_else(|| OptionValue::zero(flag_type))
    }

    pub fn get_string(&self, keys: &[&str]) -> String {
        first_of(&self.string_options, keys).cloned().unwrap_or_default()
    }

    pub fn get_int(&self, keys: &[&str]) -> i64 {
        first_of(&self.int_options, keys).copied().unwrap_or_default()
    }

    pub fn get_bool(&self, keys: &[&str]) -> bool {
        first_of(&self.bool_options, keys).copied().unwrap_or_default()
    }

    pub fn get_string_slice(&self, keys: &[&str]) -> Vec<String> {
        first_of(&self.string_slice_options, keys)
            .cloned()
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.string_options.is_empty()
            && self.int_options.is_empty()
            && self.bool_options.is_empty()
            && self.string_slice_options.is_empty()
    }
}

fn first_of<'a, V>(map: &'a HashMap<String, V>, keys: &[&str]) -> Option<&'a V> {
    keys.iter().find_map(|k| map.get(*k))
}

/// Descriptor of one configurable flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flag {
    #[serde(rename = "type")]
    pub flag_type: FlagType,

    pub usage: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<OptionValue>,
}

impl Flag {
    pub fn new(flag_type: FlagType, usage: impl Into<String>) -> Self {
        Self {
            flag_type,
            usage: usage.into(),
            default: None,
        }
    }

    pub fn string(usage: impl Into<String>) -> Self {
        Self::new(FlagType::String, usage)
    }

    pub fn int(usage: impl Into<String>) -> Self {
        Self::new(FlagType::Int, usage)
    }

    pub fn bool(usage: impl Into<String>) -> Self {
        Self::new(FlagType::Bool, usage)
    }

    pub fn with_default(mut self, value: OptionValue) -> Self {
        self.default = Some(value);
        self
    }
}

/// Name to flag mapping returned by the introspection calls
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriverFlags {
    pub options: BTreeMap<String, Flag>,
}

impl DriverFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: impl Into<String>, flag: Flag) {
        self.options.insert(name.into(), flag);
    }

    pub fn get(&self, name: &str) -> Option<&Flag> {
        self.options.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Flag)> {
        self.options.iter()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Parse `name=value` against the declared flags and store it in `opts`
    ///
    /// Names without a declared flag are kept as strings.
    pub fn apply_assignment(&self, opts: &mut DriverOptions, assignment: &str) -> Result<()> {
        let (name, raw) = assignment.split_once('=').ok_or_else(|| {
            DriverError::invalid_option(assignment, "expected the form name=value")
        })?;
        let name = name.trim();
        if name.is_empty() {
            return Err(DriverError::invalid_option(assignment, "empty option name"));
        }

        let flag_type = self
            .get(name)
            .map(|f| f.flag_type)
            .unwrap_or(FlagType::String);
        let value = OptionValue::parse(name, flag_type, raw)?;
        opts.set(name, value);
        Ok(())
    }
}
