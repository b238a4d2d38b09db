use crate::clipboard;
use crate::prompt::{self, MenuChoice};
use anyhow::Context;
use chrono::Utc;
use clipforge_core::config::Config;
use clipforge_core::menu::{build_menu, MenuEntry, StructuralAction};
use clipforge_core::operation::{Operation, ParamValue};
use clipforge_core::preset::Presets;
use clipforge_core::registry::{Registry, TransformDescriptor};
use clipforge_core::session::{ApplyOutcome, Session, OP_JQ, OP_MANUAL_EDIT};
use clipforge_core::store::{Store, KEY_LAST};
use clipforge_core::usage::UsageTracker;
use clipforge_core::{external, paths, ClipforgeError};
use rustyline::DefaultEditor;
use std::path::Path;

pub fn run(data_dir: &Path, ops: &[String], use_stdin: bool, use_stdout: bool) -> anyhow::Result<()> {
    let config = Config::load(data_dir).context("failed to load config")?;
    let mut store = Store::open(
        paths::store_path(data_dir, paths::PIPELINE_STORE),
        config.ttl(),
    )
    .context("failed to open store")?;
    let mut usage = UsageTracker::load(&store);
    let mut presets = Presets::load(&store);
    let registry = Registry::builtin();

    let input = clipboard::read_input(use_stdin)?;
    let seed = parse_operations(ops)?;
    let mut session = Session::new(input).with_jq_bin(config.jq_bin.clone());
    session
        .replace(registry, seed)
        .context("failed to replay operations")?;

    let mut rl = DefaultEditor::new()?;

    loop {
        let now = Utc::now().timestamp_millis();
        let menu = build_menu(
            registry,
            &usage,
            &presets.names(),
            store.contains(KEY_LAST),
            now,
            config.decay_window_ms(),
        );

        print_preview(&session);
        for (i, entry) in menu.iter().enumerate() {
            println!("{:>3}. {:<24} {}", i + 1, entry.label(), entry.description());
        }

        match prompt::select(&mut rl, menu.len())? {
            MenuChoice::Back => {
                if !session.step_back(registry)? {
                    println!("aborted");
                    return Ok(());
                }
                println!("stepped back ({} operations)", session.operations().len());
            }
            MenuChoice::Finish => break,
            MenuChoice::Entry(i) => match &menu[i] {
                MenuEntry::Structural(action) => match action {
                    StructuralAction::Finish => break,
                    StructuralAction::Init => {
                        session.reset();
                        println!("reset to captured input");
                    }
                    StructuralAction::Last => replay_last(&mut session, &mut store, registry)?,
                    StructuralAction::Save => {
                        if save_preset(&mut rl, &mut store, &mut presets, &session)? {
                            break;
                        }
                    }
                    StructuralAction::ListSaved => list_saved(&presets),
                    StructuralAction::ManualEdit => manual_edit(&mut session, &config, registry)?,
                    StructuralAction::Jq => jq_step(&mut rl, &mut session, registry)?,
                },
                MenuEntry::Transform(d) => {
                    apply_transform(&mut rl, &mut session, &mut store, &mut usage, registry, *d)?;
                }
                MenuEntry::Preset(name) => {
                    let preset_ops = presets.get(name)?.to_vec();
                    session
                        .replace(registry, preset_ops)
                        .with_context(|| format!("failed to replay preset '{name}'"))?;
                    println!(
                        "replayed preset '{name}' ({} operations)",
                        session.operations().len()
                    );
                }
            },
        }
    }

    finish(&mut store, &session, use_stdout)
}

fn parse_operations(ops: &[String]) -> anyhow::Result<Vec<Operation>> {
    ops.iter()
        .map(|s| Operation::parse(s).map_err(Into::into))
        .collect()
}

// ---------------------------------------------------------------------------
// Menu actions
// ---------------------------------------------------------------------------

fn apply_transform(
    rl: &mut DefaultEditor,
    session: &mut Session,
    store: &mut Store,
    usage: &mut UsageTracker,
    registry: Registry,
    descriptor: &'static TransformDescriptor,
) -> anyhow::Result<()> {
    let mut collected: Vec<ParamValue> = Vec::new();
    for (i, spec) in descriptor.params.iter().enumerate() {
        if i > 0 {
            // Preview the result so far, padding the remaining params with
            // their defaults.
            let mut padded = collected.clone();
            for later in &descriptor.params[i..] {
                padded.push(later.default_value());
            }
            let preview = (descriptor.apply)(session.value(), &padded);
            println!("  preview: {}", first_line(&preview, 60));
        }
        let answer = prompt::line(rl, &format!("{} [{}]: ", spec.name, spec.default))?;
        let Some(raw) = answer else {
            println!("cancelled");
            return Ok(());
        };
        collected.push(spec.coerce(&raw));
    }

    match session.apply(registry, Operation::new(descriptor.key, collected))? {
        ApplyOutcome::Applied => {
            usage.record(descriptor.key, Utc::now().timestamp_millis());
            usage.save(store)?;
            println!("applied {}", descriptor.display_name);
        }
        ApplyOutcome::NoChange => println!("no changes"),
    }
    Ok(())
}

fn replay_last(
    session: &mut Session,
    store: &mut Store,
    registry: Registry,
) -> anyhow::Result<()> {
    let Some(last_ops) = store.get::<Vec<Operation>>(KEY_LAST) else {
        println!("no cached operation list");
        return Ok(());
    };
    session
        .replace(registry, last_ops)
        .context("failed to replay last session")?;
    // The cached list is consumed by replaying it.
    store.remove(KEY_LAST)?;
    println!(
        "replayed last session ({} operations)",
        session.operations().len()
    );
    Ok(())
}

/// Returns true when the session should terminate (save is equivalent to
/// finish).
fn save_preset(
    rl: &mut DefaultEditor,
    store: &mut Store,
    presets: &mut Presets,
    session: &Session,
) -> anyhow::Result<bool> {
    if session.operations().is_empty() {
        println!("nothing to save");
        return Ok(false);
    }
    let Some(name) = prompt::line(rl, "preset name: ")? else {
        println!("cancelled");
        return Ok(false);
    };
    let name = name.trim().to_string();
    match presets.insert(&name, session.operations().to_vec()) {
        Ok(()) => {}
        Err(e @ ClipforgeError::InvalidName(_)) => {
            println!("{e}");
            return Ok(false);
        }
        Err(e) => return Err(e.into()),
    }
    presets.save(store)?;
    println!(
        "saved preset '{name}' ({} operations)",
        session.operations().len()
    );
    Ok(true)
}

fn list_saved(presets: &Presets) {
    if presets.is_empty() {
        println!("no saved presets");
        return;
    }
    for name in presets.names() {
        let ops = presets.get(&name).unwrap_or(&[]);
        let steps: Vec<String> = ops.iter().map(|op| op.to_string()).collect();
        println!("  {name}: {}", steps.join(" | "));
    }
}

fn manual_edit(
    session: &mut Session,
    config: &Config,
    registry: Registry,
) -> anyhow::Result<()> {
    let edited = external::edit_text(session.value(), config.editor.as_deref())?;
    let op = Operation::new(OP_MANUAL_EDIT, vec![ParamValue::Text(edited)]);
    match session.apply(registry, op)? {
        ApplyOutcome::Applied => println!("edited"),
        ApplyOutcome::NoChange => println!("no changes"),
    }
    Ok(())
}

fn jq_step(
    rl: &mut DefaultEditor,
    session: &mut Session,
    registry: Registry,
) -> anyhow::Result<()> {
    let Some(filter) = prompt::line(rl, "filter [.]: ")? else {
        println!("cancelled");
        return Ok(());
    };
    let filter = if filter.trim().is_empty() {
        ".".to_string()
    } else {
        filter.trim().to_string()
    };

    match session.apply(registry, Operation::new(OP_JQ, vec![ParamValue::Text(filter)])) {
        Ok(ApplyOutcome::Applied) => println!("applied jq"),
        Ok(ApplyOutcome::NoChange) => println!("no changes"),
        // A failing filter is recoverable; a missing binary is not.
        Err(ClipforgeError::ToolFailed { tool, message }) => println!("{tool}: {message}"),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Terminal behavior
// ---------------------------------------------------------------------------

fn finish(store: &mut Store, session: &Session, use_stdout: bool) -> anyhow::Result<()> {
    store.set(KEY_LAST, &session.operations())?;
    clipboard::write_output(session.value(), use_stdout)?;
    if !use_stdout {
        println!(
            "copied to clipboard ({} operations)",
            session.operations().len()
        );
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

fn first_line(text: &str, max_chars: usize) -> String {
    let line = text.lines().next().unwrap_or("");
    let truncated: String = line.chars().take(max_chars).collect();
    if truncated.len() < line.len() || text.lines().count() > 1 {
        format!("{truncated}…")
    } else {
        truncated
    }
}

fn print_preview(session: &Session) {
    println!();
    println!(
        "-- current value ({} operations applied) --",
        session.operations().len()
    );
    for line in session.value().lines().take(4) {
        println!("  {}", first_line(line, 76));
    }
    if session.value().lines().count() > 4 {
        println!("  …");
    }
    println!();
}
