use crate::options::print_json;
use acs_driver_core::ClusterDriver;
use colored::Colorize;

pub async fn handle(driver: &dyn ClusterDriver, update: bool, json: bool) -> anyhow::Result<()> {
    let flags = if update {
        driver.get_driver_update_options().await?
    } else {
        driver.get_driver_create_options().await?
    };

    if json {
        return print_json(&flags);
    }

    let phase = if update { "update" } else { "create" };
    println!("{}", format!("{} {} flags:", driver.name(), phase).bold());
    for (name, flag) in flags.iter() {
        println!(
            "  {} {} {}",
            format!("{:<22}", name).cyan(),
            format!("{:<7}", flag.flag_type.to_string()).dimmed(),
            flag.usage
        );
    }

    Ok(())
}
