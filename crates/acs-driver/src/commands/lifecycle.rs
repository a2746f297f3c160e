use crate::options::{InfoArgs, OptionArgs, print_json};
use acs_driver_core::{ClusterDriver, NodeCount};
use colored::Colorize;

pub async fn update(
    driver: &dyn ClusterDriver,
    info: &InfoArgs,
    options: &OptionArgs,
) -> anyhow::Result<()> {
    let opts = options.resolve(driver).await?;
    let updated = driver.update(info.load()?, &opts).await?;
    print_json(&updated)
}

pub async fn post_check(driver: &dyn ClusterDriver, info: &InfoArgs) -> anyhow::Result<()> {
    let checked = driver.post_check(info.load()?).await?;
    print_json(&checked)
}

pub async fn remove(driver: &dyn ClusterDriver, info: &InfoArgs) -> anyhow::Result<()> {
    driver.remove(&info.load()?).await?;
    eprintln!("{}", "✓ Cluster removed".green().bold());
    Ok(())
}

pub async fn remove_legacy_service_account(
    driver: &dyn ClusterDriver,
    info: &InfoArgs,
) -> anyhow::Result<()> {
    driver.remove_legacy_service_account(&info.load()?).await?;
    eprintln!("{}", "✓ Legacy service account cleaned up".green());
    Ok(())
}

pub async fn version(driver: &dyn ClusterDriver, info: &InfoArgs) -> anyhow::Result<()> {
    let version = driver.get_version(&info.load()?).await?;
    print_json(&version)
}

pub async fn size(
    driver: &dyn ClusterDriver,
    info: &InfoArgs,
    set: Option<i64>,
) -> anyhow::Result<()> {
    let info = info.load()?;
    match set {
        Some(count) => {
            driver.set_cluster_size(&info, &NodeCount { count }).await?;
            eprintln!("{}", format!("✓ Cluster resized to {}", count).green());
            Ok(())
        }
        None => print_json(&driver.get_cluster_size(&info).await?),
    }
}

pub async fn capabilities(
    driver: &dyn ClusterDriver,
    k8s: bool,
    options: &OptionArgs,
) -> anyhow::Result<()> {
    if k8s {
        let opts = options.resolve(driver).await?;
        return print_json(&driver.get_k8s_capabilities(&opts).await?);
    }
    print_json(&driver.get_capabilities().await?)
}
