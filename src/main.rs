//! Zonemap - A map editor for text adventure zones.
//!
//! # Usage
//!
//! ```bash
//! zonemap edit zone_001.map
//! zonemap --player "Ada Lovelace" play zone_001.map
//! zonemap export zone_001.map --out build
//! ```

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use zonemap::app::{App, view};
use zonemap::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags,
};
use zonemap::text::{DEFAULT_SERVER_NAME, Formatter, Viewer};
use zonemap::zone::{self, parse_identifier};

/// A map editor for text adventure zones
#[derive(Parser, Debug)]
#[command(name = "zonemap", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Strip colour codes from terminal output
    #[arg(long, global = true)]
    no_color: bool,

    /// Strip non-ASCII characters from terminal output
    #[arg(long, global = true)]
    no_high_ascii: bool,

    /// Player name substituted for <player_name>
    #[arg(long, global = true, value_name = "NAME")]
    player: Option<String>,

    /// Server name substituted for <server_name>
    #[arg(long, global = true, value_name = "NAME")]
    server_name: Option<String>,

    /// Save the zone file after every edit
    #[arg(long, global = true)]
    autosave: bool,

    /// Save current command-line flags as defaults
    #[arg(long, global = true)]
    save: bool,

    /// Clear saved defaults
    #[arg(long, global = true)]
    clear: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Edit a zone file, creating it on first save
    Edit {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Walk a zone with the player terminal
    Play {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Write the per-room export bundle
    Export {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Directory that receives the bundle
        #[arg(long, value_name = "DIR", default_value = ".")]
        out: PathBuf,
    },
    /// List every exit with its connection kind
    Links {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Move every room into another zone and save
    Renumber {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(value_name = "ZONE", value_parser = parse_zone, allow_hyphen_values = true)]
        zone: i32,
    },
    /// List the rooms of a zone
    List {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

fn parse_zone(text: &str) -> Result<i32, String> {
    parse_identifier(text).map_err(|err| err.to_string())
}

const LIST_LABEL_WIDTH: usize = 48;

fn build_app(file: PathBuf, flags: &ConfigFlags) -> App {
    let supports_color = !flags.no_color && crossterm::style::available_color_count() >= 8;
    let viewer = flags
        .player
        .as_deref()
        .map_or_else(Viewer::default, Viewer::from_full_name)
        .with_color(supports_color)
        .with_high_ascii(!flags.no_high_ascii);
    let formatter = Formatter::new(
        flags
            .server_name
            .clone()
            .unwrap_or_else(|| DEFAULT_SERVER_NAME.to_string()),
    );
    App::new(file)
        .with_autosave(flags.autosave)
        .with_viewer(viewer)
        .with_formatter(formatter)
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(io::stderr)
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    match cli.command {
        Commands::Edit { file } => {
            let graph = zone::load_or_new(&file)?;
            let app = build_app(file, &effective);
            app.run_editor(graph, stdin.lock(), &mut stdout)
                .context("Application error")?;
        }
        Commands::Play { file } => {
            let mut graph = zone::load_graph(&file)?;
            let app = build_app(file, &effective);
            app.run_terminal(&mut graph, stdin.lock(), &mut stdout)
                .context("Application error")?;
        }
        Commands::Export { file, out } => {
            let graph = zone::load_graph(&file)?;
            let written = zone::write_bundle(&graph, &out)?;
            writeln!(stdout, "Exported {} rooms to {}", graph.len(), written.display())?;
        }
        Commands::Links { file } => {
            let graph = zone::load_graph(&file)?;
            stdout.write_all(view::link_listing(&graph).as_bytes())?;
        }
        Commands::Renumber { file, zone: zone_id } => {
            let mut graph = zone::load_graph(&file)?;
            graph.renumber_zone(zone_id);
            zone::save_graph(&graph, &file)?;
            writeln!(
                stdout,
                "Moved {} rooms into zone {}",
                graph.len(),
                zone::zero_pad(zone_id, zone::ID_WIDTH)
            )?;
        }
        Commands::List { file } => {
            let graph = zone::load_graph(&file)?;
            stdout.write_all(view::room_listing(&graph, LIST_LABEL_WIDTH).as_bytes())?;
        }
    }
    stdout.flush()?;
    Ok(())
}
