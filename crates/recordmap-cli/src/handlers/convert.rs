//! Record conversion command handlers

use super::utils::{load_registry, read_json_input, select_table};
use crate::cli::{ToLocalArgs, ToRemoteArgs};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::{ConvertedItem, OutputFormatter, OutputWriter};
use recordmap_core::{
    from_schema_with_report, to_schema_with_report, KeyKind, LocalAttrs, NoSchema, Record,
    TableSchema,
};
use serde_json::{Map, Value};
use std::path::Path;

/// Handle the to-local command
pub fn handle_to_local(args: ToLocalArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("to_local", args.table.as_deref().unwrap_or("pass-through"));

    let payload = read_json_input(&args.input)?;
    let registry = load_registry(config)?;
    let table = select_table(registry.as_ref(), args.table.as_deref())?;

    let records = Record::from_list_payload(payload);
    if records.is_empty() {
        output.warning("No records found in input")?;
    }

    let items = convert_to_local(&records, table);
    log_dropped(&items);

    let rendered = output.format().format_converted(&items, args.show_dropped)?;
    output.emit(&rendered, args.output_file.as_deref())
}

/// Handle the to-remote command
pub fn handle_to_remote(
    args: ToRemoteArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let _timer = Timer::with_details("to_remote", args.table.as_deref().unwrap_or("identity"));

    let payload = read_json_input(&args.input)?;
    let registry = load_registry(config)?;
    let table = select_table(registry.as_ref(), args.table.as_deref())?;

    let objects = local_objects(payload, &args.input)?;
    let items = convert_to_remote(objects, table);
    log_dropped(&items);

    let rendered = output.format().format_converted(&items, args.show_dropped)?;
    output.emit(&rendered, args.output_file.as_deref())
}

fn convert_to_local(records: &[Record], table: Option<&TableSchema>) -> Vec<ConvertedItem> {
    let correspondence = table.and_then(TableSchema::correspondence);

    records
        .iter()
        .map(|record| {
            let (attrs, report) = to_schema_with_report(record, correspondence);
            ConvertedItem {
                value: Value::Object(attrs.to_json()),
                dropped: report.dropped,
            }
        })
        .collect()
}

fn convert_to_remote(
    objects: Vec<Map<String, Value>>,
    table: Option<&TableSchema>,
) -> Vec<ConvertedItem> {
    let key_kind = table.map_or(KeyKind::String, TableSchema::key_kind);

    objects
        .into_iter()
        .map(|object| {
            let attrs = LocalAttrs::from_json(object, key_kind);
            let (record, report) = match table {
                Some(table) => from_schema_with_report(table, &attrs),
                None => from_schema_with_report(&NoSchema, &attrs),
            };
            ConvertedItem {
                value: record.to_payload(),
                dropped: report.dropped,
            }
        })
        .collect()
}

/// Local attributes come as one object or an array of objects
fn local_objects(payload: Value, path: &Path) -> Result<Vec<Map<String, Value>>> {
    let not_an_object = || Error::InvalidFormat {
        path: path.to_path_buf(),
        expected: "an object or an array of objects".to_string(),
    };

    match payload {
        Value::Object(object) => Ok(vec![object]),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(object) => Ok(object),
                _ => Err(not_an_object()),
            })
            .collect(),
        _ => Err(not_an_object()),
    }
}

fn log_dropped(items: &[ConvertedItem]) {
    let dropped: usize = items.iter().map(|item| item.dropped.len()).sum();
    tracing::info!(records = items.len(), dropped, "Converted records");
}
