mod catalog;
mod extract;
mod images;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "amzcat-cli")]
#[command(about = "Amazon product catalog command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch an Amazon product page and print the extracted record
    Extract {
        /// Product page URL
        url: String,
        /// Add the extracted record to the catalog
        #[arg(long)]
        save: bool,
    },
    /// List catalog products, newest first
    List,
    /// Print one catalog product as JSON
    Show {
        /// Catalog id
        id: i64,
    },
    /// Remove a product from the catalog
    Delete {
        /// Catalog id
        id: i64,
    },
    /// Export the catalog as JSON or CSV
    Export {
        /// Output format: json or csv
        #[arg(long, default_value = "json")]
        format: String,
        /// Destination file (defaults to amazon_products_<date>.<ext>)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Download a product's gallery images
    Images {
        /// Catalog id
        id: i64,
        /// Target directory (defaults to AMZCAT_IMAGES_DIR)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = amzcat_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("amzcat-cli: no command given; see --help");
        return Ok(());
    };

    let mut store = amzcat_store::CatalogStore::open(&config.catalog_path).await?;

    match command {
        Commands::Extract { url, save } => {
            extract::run_extract(&config, &mut store, &url, save).await?;
        }
        Commands::List => catalog::run_list(&store),
        Commands::Show { id } => catalog::run_show(&store, id)?,
        Commands::Delete { id } => catalog::run_delete(&mut store, id).await?,
        Commands::Export { format, out } => {
            catalog::run_export(&store, &format, out.as_deref()).await?;
        }
        Commands::Images { id, dir } => {
            let dir = dir.unwrap_or_else(|| config.images_dir.clone());
            images::run_images(&config, &mut store, id, &dir).await?;
        }
    }

    Ok(())
}
