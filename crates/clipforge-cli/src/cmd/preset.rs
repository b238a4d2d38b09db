use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use clipforge_core::config::Config;
use clipforge_core::operation::Operation;
use clipforge_core::preset::Presets;
use clipforge_core::store::{Store, KEY_LAST};
use clipforge_core::{paths, ClipforgeError};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum PresetSubcommand {
    /// List saved presets
    List,

    /// Show a preset's operations
    Show { name: String },

    /// Save operations under a name
    Save {
        name: String,

        /// JSON-encoded operations ({"name":...,"params":[...]})
        ops: Vec<String>,

        /// Save the previous session's cached operation list instead
        #[arg(long)]
        last: bool,
    },

    /// Delete a preset
    Delete {
        name: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(data_dir: &Path, subcmd: PresetSubcommand, json: bool) -> anyhow::Result<()> {
    let config = Config::load(data_dir).context("failed to load config")?;
    let mut store = Store::open(
        paths::store_path(data_dir, paths::PIPELINE_STORE),
        config.ttl(),
    )
    .context("failed to open store")?;

    match subcmd {
        PresetSubcommand::List => list(&store, json),
        PresetSubcommand::Show { name } => show(&store, &name, json),
        PresetSubcommand::Save { name, ops, last } => save(&mut store, &name, &ops, last),
        PresetSubcommand::Delete { name, yes } => delete(&mut store, &name, yes),
    }
}

// ---------------------------------------------------------------------------
// list / show
// ---------------------------------------------------------------------------

fn list(store: &Store, json: bool) -> anyhow::Result<()> {
    let presets = Presets::load(store);

    if json {
        let map: BTreeMap<String, Vec<Operation>> = presets
            .names()
            .into_iter()
            .filter_map(|name| {
                let ops = presets.get(&name).ok()?.to_vec();
                Some((name, ops))
            })
            .collect();
        return print_json(&map);
    }

    if presets.is_empty() {
        println!("No saved presets. Save one from an interactive session.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = presets
        .names()
        .into_iter()
        .map(|name| {
            let ops = presets.get(&name).unwrap_or(&[]);
            let steps: Vec<String> = ops.iter().map(|op| op.to_string()).collect();
            vec![name, ops.len().to_string(), steps.join(" | ")]
        })
        .collect();
    print_table(&["NAME", "STEPS", "OPERATIONS"], rows);
    Ok(())
}

fn show(store: &Store, name: &str, json: bool) -> anyhow::Result<()> {
    let presets = Presets::load(store);
    let ops = presets.get(name)?;

    if json {
        return print_json(&ops);
    }
    for (i, op) in ops.iter().enumerate() {
        println!("{}. {}", i + 1, op);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// save / delete
// ---------------------------------------------------------------------------

fn save(store: &mut Store, name: &str, ops: &[String], last: bool) -> anyhow::Result<()> {
    let operations: Vec<Operation> = if last {
        store
            .get::<Vec<Operation>>(KEY_LAST)
            .ok_or(ClipforgeError::NoLastRun)?
    } else {
        ops.iter()
            .map(|s| Operation::parse(s).map_err(Into::into))
            .collect::<anyhow::Result<_>>()?
    };
    if operations.is_empty() {
        anyhow::bail!("no operations given; pass JSON operations or --last");
    }

    let mut presets = Presets::load(store);
    let steps = operations.len();
    presets.insert(name, operations)?;
    presets.save(store)?;
    println!("saved preset '{name}' ({steps} operations)");
    Ok(())
}

fn delete(store: &mut Store, name: &str, yes: bool) -> anyhow::Result<()> {
    let mut presets = Presets::load(store);
    // Surface a missing preset before prompting.
    presets.get(name)?;

    if !yes && !confirm(&format!("delete preset '{name}'?"))? {
        println!("not deleted");
        return Ok(());
    }

    presets.remove(name)?;
    presets.save(store)?;
    println!("deleted preset '{name}'");
    Ok(())
}

fn confirm(question: &str) -> anyhow::Result<bool> {
    print!("{question} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
