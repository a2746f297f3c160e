use acs_driver_config::ConfigError;
use acs_driver_core::{ClusterDriver, ClusterInfo, DriverOptions};
use clap::Args;
use std::path::PathBuf;

/// Where the option bag comes from
#[derive(Args, Debug, Default)]
pub struct OptionArgs {
    /// Option-bag file (YAML or JSON); discovered automatically when omitted
    #[arg(id = "options_file", long = "options", value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Single option as NAME=VALUE, typed by the declared flags (repeatable)
    #[arg(short = 'o', long = "option", value_name = "NAME=VALUE")]
    pub assignments: Vec<String>,
}

/// Cluster info to hand to the driver
#[derive(Args, Debug, Default)]
pub struct InfoArgs {
    /// ClusterInfo JSON file; an empty record is used when omitted
    #[arg(id = "info_file", long = "info", value_name = "FILE")]
    pub file: Option<PathBuf>,
}

impl OptionArgs {
    /// Build the option bag: file first, then `-o` assignments on top
    ///
    /// Both sources are typed by the driver's create and update flags.
    pub async fn resolve(&self, driver: &dyn ClusterDriver) -> anyhow::Result<DriverOptions> {
        let mut flags = driver.get_driver_create_options().await?;
        flags
            .options
            .extend(driver.get_driver_update_options().await?.options);

        let mut opts = match &self.file {
            Some(path) => acs_driver_config::load_options(path, &flags)?,
            None => match acs_driver_config::find_options_file() {
                Ok(path) => {
                    tracing::debug!("Using options file {}", path.display());
                    acs_driver_config::load_options(&path, &flags)?
                }
                Err(ConfigError::OptionsFileNotFound) => DriverOptions::new(),
                Err(e) => return Err(e.into()),
            },
        };

        for assignment in &self.assignments {
            flags.apply_assignment(&mut opts, assignment)?;
        }
        Ok(opts)
    }
}

impl InfoArgs {
    pub fn load(&self) -> anyhow::Result<ClusterInfo> {
        match &self.file {
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                Ok(serde_json::from_str(&content)?)
            }
            None => Ok(ClusterInfo::default()),
        }
    }
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
