use crate::clipboard;
use crate::output::print_json;
use anyhow::Context;
use clipforge_core::config::Config;
use clipforge_core::operation::Operation;
use clipforge_core::preset::Presets;
use clipforge_core::registry::Registry;
use clipforge_core::session::Session;
use clipforge_core::store::{Store, KEY_LAST};
use clipforge_core::{paths, ClipforgeError};
use std::path::Path;

#[allow(clippy::too_many_arguments)]
pub fn run(
    data_dir: &Path,
    ops: &[String],
    preset: Option<&str>,
    last: bool,
    use_stdin: bool,
    use_stdout: bool,
    json: bool,
) -> anyhow::Result<()> {
    let config = Config::load(data_dir).context("failed to load config")?;
    let mut store = Store::open(
        paths::store_path(data_dir, paths::PIPELINE_STORE),
        config.ttl(),
    )
    .context("failed to open store")?;
    let registry = Registry::builtin();

    let operations: Vec<Operation> = if let Some(name) = preset {
        Presets::load(&store).get(name)?.to_vec()
    } else if last {
        store
            .get::<Vec<Operation>>(KEY_LAST)
            .ok_or(ClipforgeError::NoLastRun)?
    } else {
        ops.iter()
            .map(|s| Operation::parse(s).map_err(Into::into))
            .collect::<anyhow::Result<_>>()?
    };
    if operations.is_empty() {
        anyhow::bail!("no operations given; pass JSON operations, --preset, or --last");
    }

    let input = clipboard::read_input(use_stdin)?;
    let mut session = Session::new(input).with_jq_bin(config.jq_bin.clone());
    session
        .replace(registry, operations)
        .context("failed to replay operations")?;

    store.set(KEY_LAST, &session.operations())?;

    if json {
        if !use_stdout {
            clipboard::write_clipboard(session.value())?;
        }
        return print_json(&serde_json::json!({
            "steps": session.operations().len(),
            "output": session.value(),
        }));
    }

    clipboard::write_output(session.value(), use_stdout)?;
    if !use_stdout {
        println!(
            "copied to clipboard ({} operations)",
            session.operations().len()
        );
    }
    Ok(())
}
