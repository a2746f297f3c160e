use crate::options::{InfoArgs, OptionArgs};
use acs_driver_core::ClusterDriver;
use colored::Colorize;

pub async fn save(
    driver: &dyn ClusterDriver,
    snapshot: &str,
    info: &InfoArgs,
    options: &OptionArgs,
) -> anyhow::Result<()> {
    let opts = options.resolve(driver).await?;
    driver.etcd_save(&info.load()?, &opts, snapshot).await?;
    eprintln!("{}", format!("✓ Snapshot '{}' saved", snapshot).green());
    Ok(())
}

pub async fn restore(
    driver: &dyn ClusterDriver,
    snapshot: &str,
    info: &InfoArgs,
    options: &OptionArgs,
) -> anyhow::Result<()> {
    let opts = options.resolve(driver).await?;
    driver.etcd_restore(&info.load()?, &opts, snapshot).await?;
    eprintln!("{}", format!("✓ Snapshot '{}' restored", snapshot).green());
    Ok(())
}

pub async fn remove(
    driver: &dyn ClusterDriver,
    snapshot: &str,
    info: &InfoArgs,
    options: &OptionArgs,
) -> anyhow::Result<()> {
    let opts = options.resolve(driver).await?;
    driver.etcd_remove_snapshot(&info.load()?, &opts, snapshot).await?;
    eprintln!("{}", format!("✓ Snapshot '{}' removed", snapshot).green());
    Ok(())
}
