mod commands;
mod options;

use acs_driver_cloudstack::CloudStackDriver;
use acs_driver_core::ClusterDriver;
use clap::{Parser, Subcommand};
use options::{InfoArgs, OptionArgs};

#[derive(Parser)]
#[command(name = "acs-driver")]
#[command(about = "Provision clusters on CloudStack through the cluster driver lifecycle", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the flags the driver accepts
    Flags {
        /// Show update-time flags instead of create-time flags
        #[arg(long)]
        update: bool,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a cluster (deploys an instance)
    Create {
        #[command(flatten)]
        options: OptionArgs,
    },
    /// Update a cluster
    Update {
        #[command(flatten)]
        info: InfoArgs,
        #[command(flatten)]
        options: OptionArgs,
    },
    /// Confirm a cluster after creation
    PostCheck {
        #[command(flatten)]
        info: InfoArgs,
    },
    /// Remove a cluster
    Remove {
        #[command(flatten)]
        info: InfoArgs,
    },
    /// Clean up the legacy service account
    RemoveLegacyServiceAccount {
        #[command(flatten)]
        info: InfoArgs,
    },
    /// Show the cluster's Kubernetes version
    Version {
        #[command(flatten)]
        info: InfoArgs,
    },
    /// Show or change the cluster size
    Size {
        #[command(flatten)]
        info: InfoArgs,
        /// Requested node count
        #[arg(long)]
        set: Option<i64>,
    },
    /// Show advertised capabilities
    Capabilities {
        /// Show Kubernetes capabilities instead of driver capabilities
        #[arg(long)]
        k8s: bool,
        #[command(flatten)]
        options: OptionArgs,
    },
    /// Run an etcd snapshot operation
    Etcd {
        #[command(subcommand)]
        action: EtcdAction,
    },
}

#[derive(Subcommand)]
enum EtcdAction {
    /// Save a snapshot
    Save {
        snapshot: String,
        #[command(flatten)]
        info: InfoArgs,
        #[command(flatten)]
        options: OptionArgs,
    },
    /// Restore a snapshot
    Restore {
        snapshot: String,
        #[command(flatten)]
        info: InfoArgs,
        #[command(flatten)]
        options: OptionArgs,
    },
    /// Remove a snapshot
    Remove {
        snapshot: String,
        #[command(flatten)]
        info: InfoArgs,
        #[command(flatten)]
        options: OptionArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout carries results, logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let driver = CloudStackDriver::new();
    let driver: &dyn ClusterDriver = &driver;

    match cli.command {
        Commands::Flags { update, json } => {
            commands::flags::handle(driver, update, json).await?;
        }
        Commands::Create { options } => {
            commands::create::handle(driver, &options).await?;
        }
        Commands::Update { info, options } => {
            commands::lifecycle::update(driver, &info, &options).await?;
        }
        Commands::PostCheck { info } => {
            commands::lifecycle::post_check(driver, &info).await?;
        }
        Commands::Remove { info } => {
            commands::lifecycle::remove(driver, &info).await?;
        }
        Commands::RemoveLegacyServiceAccount { info } => {
            commands::lifecycle::remove_legacy_service_account(driver, &info).await?;
        }
        Commands::Version { info } => {
            commands::lifecycle::version(driver, &info).await?;
        }
        Commands::Size { info, set } => {
            commands::lifecycle::size(driver, &info, set).await?;
        }
        Commands::Capabilities { k8s, options } => {
            commands::lifecycle::capabilities(driver, k8s, &options).await?;
        }
        Commands::Etcd { action } => match action {
            EtcdAction::Save {
                snapshot,
                info,
                options,
            } => commands::etcd::save(driver, &snapshot, &info, &options).await?,
            EtcdAction::Restore {
                snapshot,
                info,
                options,
            } => commands::etcd::restore(driver, &snapshot, &info, &options).await?,
            EtcdAction::Remove {
                snapshot,
                info,
                options,
            } => commands::etcd::remove(driver, &snapshot, &info, &options).await?,
        },
    }

    Ok(())
}
