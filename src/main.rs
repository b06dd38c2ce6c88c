//! CLI entry point for skyward

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "skyward")]
#[command(version)]
#[command(about = "Skyward blog: post listings and RSS feed", long_about = None)]
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
    /// Create a new draft post
    New {
        /// Title of the new post
        title: String,

        /// Language code of the post (defaults to the site language)
        #[arg(short, long)]
        lang: Option<String>,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Start a local server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,

        /// Reload posts when content changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Clean the public folder
    Clean,

    /// List visible posts, newest first
    List {
        /// Only list posts in this language
        #[arg(short, long)]
        lang: Option<String>,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "skyward=debug,info"
    } else {
        "skyward=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::New { title, lang } => {
            let site = skyward::Site::new(&base_dir)?;
            tracing::info!("Creating new post with title: {}", title);
            let path = site.new_post(&title, lang.as_deref())?;
            println!("Created {}", path.display());
        }

        Commands::Generate { watch } => {
            let site = skyward::Site::new(&base_dir)?;
            tracing::info!("Generating static files...");

            site.generate()?;
            println!("Generated successfully!");

            if watch {
                skyward::commands::generate::watch(&site, || {
                    skyward::commands::generate::rebuild(&site.base_dir)
                })?;
            }
        }

        Commands::Server {
            port,
            ip,
            open,
            watch,
        } => {
            let site = skyward::Site::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            skyward::server::start(&site, &ip, port, watch, open).await?;
        }

        Commands::Clean => {
            let site = skyward::Site::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { lang } => {
            let site = skyward::Site::new(&base_dir)?;
            skyward::commands::list::run(&site, lang.as_deref())?;
        }

        Commands::Version => {
            println!("skyward version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
