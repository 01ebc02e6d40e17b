//! CLI entry point for quire

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quire::Site;

#[derive(Parser)]
#[command(name = "quire")]
#[command(version)]
#[command(about = "A small static blog generator", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,
    },

    /// Build the static site
    #[command(alias = "b")]
    Build {
        /// Rebuild on file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Build and serve the site locally
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,

        /// Serve without watching or live reload
        #[arg(long)]
        r#static: bool,
    },

    /// Delete the output directory
    Clean,

    /// List posts, pages, categories or tags
    List {
        /// Type of content to list (post, page, category, tag)
        #[arg(default_value = "post")]
        r#type: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        "quire=debug,info"
    } else {
        "quire=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot determine current directory")?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            quire::commands::init::init_site(&target_dir)?;
            tracing::info!("Initialized site in {:?}", target_dir);
        }

        Commands::New { title } => {
            let site = Site::new(&base_dir)?;
            site.new_post(&title)?;
        }

        Commands::Build { watch } => {
            let site = Site::new(&base_dir)?;
            site.build()?;

            if watch {
                tokio::task::spawn_blocking(move || quire::commands::build::watch(&site))
                    .await??;
            }
        }

        Commands::Serve {
            port,
            ip,
            open,
            r#static,
        } => {
            let site = Site::new(&base_dir)?;
            site.build()?;
            quire::server::start(&site, &ip, port, !r#static, open).await?;
        }

        Commands::Clean => {
            let site = Site::new(&base_dir)?;
            site.clean()?;
        }

        Commands::List { r#type } => {
            let site = Site::new(&base_dir)?;
            quire::commands::list::run(&site, &r#type)?;
        }
    }

    Ok(())
}
