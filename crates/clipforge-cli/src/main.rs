mod clipboard;
mod cmd;
mod output;
mod prompt;
mod root;

use clap::{Parser, Subcommand};
use cmd::preset::PresetSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "clipforge",
    about = "Interactive clipboard text transformation pipeline",
    version,
    propagate_version = true
)]
struct Cli {
    /// Data directory (default: ~/.clipforge)
    #[arg(long, global = true, env = "CLIPFORGE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive transformation session (the default)
    Run {
        /// JSON-encoded operations ({"name":...,"params":[...]}) replayed
        /// against the captured input before the menu is shown
        ops: Vec<String>,

        /// Read input from stdin instead of the clipboard
        #[arg(long)]
        stdin: bool,

        /// Write the result to stdout instead of the clipboard
        #[arg(long)]
        stdout: bool,
    },

    /// Replay operations non-interactively
    Apply {
        /// JSON-encoded operations to apply in order
        ops: Vec<String>,

        /// Replay a saved preset instead of positional operations
        #[arg(long)]
        preset: Option<String>,

        /// Replay the previous session's cached operation list
        #[arg(long)]
        last: bool,

        /// Read input from stdin instead of the clipboard
        #[arg(long)]
        stdin: bool,

        /// Write the result to stdout instead of the clipboard
        #[arg(long)]
        stdout: bool,
    },

    /// List transforms ranked by decayed usage
    Transforms,

    /// Manage saved presets
    Preset {
        #[command(subcommand)]
        subcommand: PresetSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let command = cli.command.unwrap_or(Commands::Run {
        ops: Vec::new(),
        stdin: false,
        stdout: false,
    });

    let result = root::resolve_data_dir(cli.data_dir.as_deref()).and_then(|data_dir| {
        match command {
            Commands::Run { ops, stdin, stdout } => cmd::run::run(&data_dir, &ops, stdin, stdout),
            Commands::Apply {
                ops,
                preset,
                last,
                stdin,
                stdout,
            } => cmd::apply::run(
                &data_dir,
                &ops,
                preset.as_deref(),
                last,
                stdin,
                stdout,
                cli.json,
            ),
            Commands::Transforms => cmd::transforms::run(&data_dir, cli.json),
            Commands::Preset { subcommand } => cmd::preset::run(&data_dir, subcommand, cli.json),
        }
    });

    if let Err(e) = result {
        // Alternate Display walks the whole context chain.
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
