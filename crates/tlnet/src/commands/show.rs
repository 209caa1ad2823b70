//! Show command: dump a batch configuration as key/value rows.

use serde::Serialize;
use tabled::Tabled;

use tlnet_api::Session;

use crate::cli::{GlobalOpts, ShowArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Serialize, Tabled)]
struct EntryRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(session: &Session, args: ShowArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let scope = util::scope(args.scope);
    let map = session.config_map(scope, false).await?;

    let entries: Vec<EntryRow> = map
        .iter()
        .filter(|(key, _)| {
            args.filter
                .as_deref()
                .is_none_or(|needle| key.to_lowercase().contains(&needle.to_lowercase()))
        })
        .map(|(key, value)| EntryRow {
            key: key.to_owned(),
            value: value.to_owned(),
        })
        .collect();

    let out = output::render_list(
        &global.output,
        &entries,
        |e| EntryRow {
            key: e.key.clone(),
            value: e.value.clone(),
        },
        |e| format!("{}={}", e.key, e.value),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
