use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration directory not found")]
    ConfigDirNotFound,

    #[error(
        "Options file not found. Looked in:\n\
        - ACS_DRIVER_OPTIONS environment variable\n\
        - current directory: acs-driver.local.yaml, acs-driver.yaml, acs-driver.json\n\
        - ~/.config/acs-driver/options.yaml"
    )]
    OptionsFileNotFound,

    #[error("Unsupported options file format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
