//! ShelfDB CLI
//!
//! Operator tool for inspecting and maintaining a ShelfDB root.
//! Assumes the default ordering key (creation timestamps).

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use shelfdb::{Config, ConfigFile, FileDatabase};
use tracing_subscriber::{fmt, EnvFilter};

/// ShelfDB CLI
#[derive(Parser, Debug)]
#[command(name = "shelfdb")]
#[command(about = "Inspect and maintain a partitioned file-backed record store")]
#[command(version)]
struct Args {
    /// Config file holding the `root` entry
    #[arg(short, long, default_value = ConfigFile::DEFAULT_FILE_NAME)]
    config: PathBuf,

    /// Root directory (overrides the config file)
    #[arg(short, long)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a config file template (optionally with a root entry)
    InitConfig {
        /// Root directory to record in the new file
        #[arg(long)]
        with_root: Option<PathBuf>,
    },

    /// List partitions under the root
    Partitions,

    /// List record ids of a partition, oldest first
    Ids {
        /// The partition name
        partition: String,
    },

    /// Print the index entry count of a partition
    Count {
        /// The partition name
        partition: String,
    },

    /// Compare a partition's index against its data directory
    Check {
        /// The partition name
        partition: String,
    },

    /// Delete a partition and all its records
    Drop {
        /// The partition name
        partition: String,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,shelfdb=info"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> shelfdb::Result<()> {
    match args.command {
        Commands::InitConfig { with_root } => {
            match with_root {
                Some(root) => ConfigFile::write_with_root(&args.config, root)?,
                None => ConfigFile::write_template(&args.config)?,
            }
            println!("wrote {}", args.config.display());
        }
        Commands::Partitions => {
            let db = open_db(&args.config, args.root)?;
            for name in db.list_partitions()? {
                println!("{}", name);
            }
        }
        Commands::Ids { partition } => {
            let db = open_db(&args.config, args.root)?;
            for id in db.get_ids_of_resources(&partition)? {
                println!("{}", id);
            }
        }
        Commands::Count { partition } => {
            let db = open_db(&args.config, args.root)?;
            println!("{}", db.len(&partition)?);
        }
        Commands::Check { partition } => {
            let db = open_db(&args.config, args.root)?;
            let report = db.check_partition(&partition)?;
            println!("entries:      {}", report.entries);
            println!("distinct ids: {}", report.distinct_ids);
            for id in &report.missing_files {
                println!("missing file: {}", id);
            }
            for id in &report.orphan_files {
                println!("orphan file:  {}", id);
            }
            if !report.is_consistent() {
                process::exit(2);
            }
        }
        Commands::Drop { partition } => {
            let db = open_db(&args.config, args.root)?;
            if db.remove_partition(&partition)? {
                println!("removed {}", partition);
            } else {
                println!("{} does not exist", partition);
            }
        }
    }

    Ok(())
}

/// Open the store from `--root`, falling back to the config file
fn open_db(config_file: &Path, root: Option<PathBuf>) -> shelfdb::Result<FileDatabase> {
    let config = match root {
        Some(root) => Config::builder().root_dir(root).build(),
        None => Config::from_file(config_file)?,
    };

    tracing::debug!("Root directory: {}", config.root_dir.display());
    FileDatabase::open(config)
}
