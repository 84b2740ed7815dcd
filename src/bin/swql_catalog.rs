use std::{error::Error, path::PathBuf};

use clap::{Parser, Subcommand};
use log::debug;
use swql_session::{ServiceDescriptor, Settings, list_server_types};

#[derive(Debug, Parser)]
#[command(version, about = "Inspect information service server types", long_about = None)]
struct Cli {
    /// Path to a settings file consulted by `list`
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List known server types
    List {
        /// Include compressed transport variants
        #[arg(long)]
        compressed: bool,
    },
    /// Show the connection parameters of a server type
    Describe { server_type: String },
    /// Print the effective settings read from a settings file
    Settings { file: PathBuf },
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let settings = match &cli.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    debug!("effective settings: {settings:?}");

    match cli.command {
        Command::List { compressed } => {
            for server_type in list_server_types(compressed || settings.show_compressed_modes) {
                let auth = if server_type.requires_authentication {
                    "credentials"
                } else {
                    "integrated"
                };
                println!("{:<32} {auth}", server_type.identifier);
            }
        }
        Command::Describe { server_type } => {
            let descriptor = ServiceDescriptor::resolve(&server_type)?;
            println!("{}", serde_json::to_string_pretty(&descriptor)?);
        }
        Command::Settings { file } => {
            let settings = Settings::load(file)?;
            print!("{}", toml::to_string_pretty(&settings)?);
        }
    }

    Ok(())
}
