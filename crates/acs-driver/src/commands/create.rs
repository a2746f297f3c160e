use crate::options::{OptionArgs, print_json};
use acs_driver_core::{ClusterDriver, ClusterInfo};
use colored::Colorize;

pub async fn handle(driver: &dyn ClusterDriver, options: &OptionArgs) -> anyhow::Result<()> {
    let opts = options.resolve(driver).await?;
    let name = opts.get_string(&["cluster-name", "ClusterName"]);

    eprintln!("{}", format!("Creating cluster '{}'...", name).yellow());
    let info = driver.create(&opts, &ClusterInfo::default()).await?;
    eprintln!("{}", format!("✓ Cluster '{}' created", name).green().bold());

    print_json(&info)
}
