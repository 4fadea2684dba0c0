//! CLI entry point for inkpress

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "inkpress")]
#[command(version)]
#[command(about = "A small static blog generator", long_about = None)]
struct Cli {
    /// Set the site base directory (defaults to current directory)
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
    /// Build the static site
    #[command(alias = "b")]
    Build {
        /// Source directory (overrides configuration)
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Output directory (overrides configuration)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Watch for file changes and rebuild
        #[arg(short, long)]
        watch: bool,
    },

    /// Remove the output directory
    Clean,

    /// Scaffold a new document
    New {
        /// Title of the new document
        title: String,
    },

    /// List site content
    List {
        /// Type of content to list (documents, categories)
        #[arg(default_value = "documents")]
        r#type: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        "inkpress=debug,info"
    } else {
        "inkpress=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Build {
            source,
            output,
            watch,
        } => {
            let mut site = inkpress::Site::new(&base_dir)?;
            if let Some(source) = source {
                site.source_dir = resolve(&base_dir, source);
            }
            if let Some(output) = output {
                site.output_dir = resolve(&base_dir, output);
            }

            tracing::info!("Building site from {:?}", site.source_dir);
            site.build()?;
            println!("Build complete: {:?}", site.output_dir);

            if watch {
                inkpress::commands::build::watch(&site)?;
            }
        }

        Commands::Clean => {
            let site = inkpress::Site::new(&base_dir)?;
            site.clean()?;
            println!("Cleaned: {:?}", site.output_dir);
        }

        Commands::New { title } => {
            let site = inkpress::Site::new(&base_dir)?;
            site.new_document(&title)?;
        }

        Commands::List { r#type } => {
            let site = inkpress::Site::new(&base_dir)?;
            inkpress::commands::list::run(&site, &r#type)?;
        }
    }

    Ok(())
}

fn resolve(base: &std::path::Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}
