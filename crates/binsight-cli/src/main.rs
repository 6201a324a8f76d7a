use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use binsight_sync::{SyncOptions, SyncPipeline};

#[derive(Debug, Parser)]
#[command(name = "binsight")]
#[command(about = "Warehouse inventory console tooling")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a full catalog sync: export, reconstruct, enrich, persist.
    Sync {
        /// Walk every stage but skip the database writes.
        #[arg(long)]
        dry_run: bool,
        /// Override the configured number of in-flight stock lookups.
        #[arg(long)]
        concurrency: Option<usize>,
    },
    /// Show when the catalog was last synced.
    History,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = binsight_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let pool_config = binsight_db::PoolConfig::from_app_config(&config);
    let pool = binsight_db::connect_pool(&config.database_url, pool_config).await?;
    binsight_db::run_migrations(&pool).await?;

    match cli.command {
        Commands::Sync {
            dry_run,
            concurrency,
        } => {
            let mut options = SyncOptions::from_app_config(&config);
            options.dry_run = dry_run;
            if let Some(concurrency) = concurrency {
                options.enrich_concurrency = concurrency;
            }

            let pipeline = SyncPipeline::from_config(&config, pool)?.with_options(options);

            let cancel = CancellationToken::new();
            let signal_token = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("interrupt received; cancelling sync");
                    signal_token.cancel();
                }
            });

            let outcome = pipeline
                .run(&cancel, |stage| println!("[sync] {stage}"))
                .await?;

            println!(
                "synced {} products ({} parsed, {} skipped without a SKU{})",
                outcome.products_persisted,
                outcome.products_parsed,
                outcome.skipped_no_sku,
                if dry_run { ", dry run" } else { "" },
            );
        }
        Commands::History => match binsight_db::latest_sync(&pool).await? {
            Some(row) => println!("last sync: {} ({})", row.date, row.public_id),
            None => println!("no sync has completed yet"),
        },
    }

    Ok(())
}
