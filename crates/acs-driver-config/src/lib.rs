pub mod error;

pub use error::*;

use acs_driver_core::{DriverFlags, DriverOptions, FlagType, OptionValue};
use serde_json::Value;
use std::path::{Path, PathBuf};

pub const OPTIONS_ENV: &str = "ACS_DRIVER_OPTIONS";

const CANDIDATES: [&str; 3] = ["acs-driver.local.yaml", "acs-driver.yaml", "acs-driver.json"];

const TYPED_SECTIONS: [&str; 4] = [
    "string_options",
    "int_options",
    "bool_options",
    "string_slice_options",
];

/// acs-driver's configuration directory (created if missing)
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join("acs-driver");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

/// Locate the option-bag file
///
/// Search order:
/// 1. `ACS_DRIVER_OPTIONS` (direct path)
/// 2. current directory: acs-driver.local.yaml, acs-driver.yaml, acs-driver.json
/// 3. ~/.config/acs-driver/options.yaml
pub fn find_options_file() -> Result<PathBuf> {
    if let Ok(options_path) = std::env::var(OPTIONS_ENV) {
        let path = PathBuf::from(options_path);
        if path.exists() {
            return Ok(path);
        }
        tracing::warn!("{} points to a missing file: {}", OPTIONS_ENV, path.display());
    }

    let current_dir = std::env::current_dir()?;
    for filename in &CANDIDATES {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(path);
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let global = config_dir.join("acs-driver").join("options.yaml");
        if global.exists() {
            return Ok(global);
        }
    }

    Err(ConfigError::OptionsFileNotFound)
}

/// Load an option bag from a YAML or JSON file
///
/// Two layouts are accepted: the typed layout with `string_options`,
/// `int_options`, `bool_options` and `string_slice_options` sections, or
/// a flat `name: value` map. Flat values are coerced to the type of the
/// matching flag in `flags`; undeclared names are typed by their YAML/JSON
/// value.
pub fn load_options(path: &Path, flags: &DriverFlags) -> Result<DriverOptions> {
    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(DriverOptions::new());
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let value: Value = match extension.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&content)?,
        "json" => serde_json::from_str(&content)?,
        other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
    };

    let opts = options_from_value(value, flags)?;
    tracing::debug!("Loaded options from {}", path.display());
    Ok(opts)
}

fn options_from_value(value: Value, flags: &DriverFlags) -> Result<DriverOptions> {
    let map = match value {
        Value::Object(map) => map,
        Value::Null => return Ok(DriverOptions::new()),
        other => {
            return Err(ConfigError::UnsupportedFormat(format!(
                "expected a mapping at the top level, got {}",
                other
            )));
        }
    };

    if map.keys().any(|k| TYPED_SECTIONS.contains(&k.as_str())) {
        return Ok(serde_json::from_value(Value::Object(map))?);
    }

    let mut opts = DriverOptions::new();
    for (name, value) in map {
        let option = match flags.get(&name) {
            Some(flag) => coerce(&name, flag.flag_type, value)?,
            None => infer(&name, value)?,
        };
        opts.set(name, option);
    }
    Ok(opts)
}

/// Convert a flat value to the declared flag type
fn coerce(name: &str, flag_type: FlagType, value: Value) -> Result<OptionValue> {
    let coerced = match (flag_type, value) {
        (FlagType::String, Value::String(s)) => Some(OptionValue::String(s)),
        (FlagType::String, Value::Number(n)) => Some(OptionValue::String(n.to_string())),
        (FlagType::String, Value::Bool(b)) => Some(OptionValue::String(b.to_string())),
        (FlagType::Int, Value::Number(n)) => n.as_i64().map(OptionValue::Int),
        (FlagType::Bool, Value::Bool(b)) => Some(OptionValue::Bool(b)),
        (FlagType::StringSlice, Value::Array(items)) => Some(OptionValue::StringSlice(
            string_items(name, items)?,
        )),
        (FlagType::Int | FlagType::Bool | FlagType::StringSlice, Value::String(s)) => Some(
            OptionValue::parse(name, flag_type, &s)
                .map_err(|e| ConfigError::UnsupportedFormat(e.to_string()))?,
        ),
        (_, other) => {
            return Err(ConfigError::UnsupportedFormat(format!(
                "option '{}' expects {}, got {}",
                name, flag_type, other
            )));
        }
    };

    coerced.ok_or_else(|| {
        ConfigError::UnsupportedFormat(format!("option '{}' must be an integer", name))
    })
}

/// Type an undeclared value by its YAML/JSON type
fn infer(name: &str, value: Value) -> Result<OptionValue> {
    match value {
        Value::String(s) => Ok(OptionValue::String(s)),
        Value::Bool(b) => Ok(OptionValue::Bool(b)),
        Value::Number(n) => n.as_i64().map(OptionValue::Int).ok_or_else(|| {
            ConfigError::UnsupportedFormat(format!(
                "option '{}' must be an integer, got {}",
                name, n
            ))
        }),
        Value::Array(items) => Ok(OptionValue::StringSlice(string_items(name, items)?)),
        other => Err(ConfigError::UnsupportedFormat(format!(
            "option '{}' has unsupported value {}",
            name, other
        ))),
    }
}

fn string_items(name: &str, items: Vec<Value>) -> Result<Vec<String>> {
    items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Ok(s),
            other => Err(ConfigError::UnsupportedFormat(format!(
                "option '{}' must list strings, got {}",
                name, other
            ))),
        })
        .collect()
}
