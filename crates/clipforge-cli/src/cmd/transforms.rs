use crate::output::{print_json, print_table};
use anyhow::Context;
use chrono::{DateTime, Utc};
use clipforge_core::config::Config;
use clipforge_core::paths;
use clipforge_core::registry::Registry;
use clipforge_core::store::Store;
use clipforge_core::usage::UsageTracker;
use std::path::Path;

pub fn run(data_dir: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(data_dir).context("failed to load config")?;
    let store = Store::open(
        paths::store_path(data_dir, paths::PIPELINE_STORE),
        config.ttl(),
    )
    .context("failed to open store")?;
    let usage = UsageTracker::load(&store);
    let registry = Registry::builtin();

    let now = Utc::now().timestamp_millis();
    let ranked = registry.ranked(&usage, now, config.decay_window_ms());

    if json {
        #[derive(serde::Serialize)]
        struct TransformRow<'a> {
            key: &'a str,
            display_name: &'a str,
            description: &'a str,
            params: Vec<&'a str>,
            uses: u64,
            last_used_ms: Option<i64>,
        }

        let rows: Vec<TransformRow> = ranked
            .iter()
            .map(|d| TransformRow {
                key: d.key,
                display_name: d.display_name,
                description: d.description,
                params: d.params.iter().map(|p| p.name).collect(),
                uses: usage.count(d.key),
                last_used_ms: usage.last_used(d.key),
            })
            .collect();
        return print_json(&rows);
    }

    let rows: Vec<Vec<String>> = ranked
        .iter()
        .map(|d| {
            vec![
                d.key.to_string(),
                d.display_name.to_string(),
                usage.count(d.key).to_string(),
                format_timestamp(usage.last_used(d.key)),
                d.description.to_string(),
            ]
        })
        .collect();
    print_table(&["KEY", "NAME", "USES", "LAST USED", "DESCRIPTION"], rows);
    Ok(())
}

fn format_timestamp(ms: Option<i64>) -> String {
    ms.and_then(DateTime::from_timestamp_millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}
