//! Schema check command handler

use super::utils::load_registry;
use crate::cli::CheckArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::{CheckReport, OutputFormatter, OutputWriter, TableSummary};
use recordmap_core::{SchemaRegistry, TableSchema};

/// Handle the check command
pub fn handle_check(args: CheckArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let config = Config {
        strict: config.strict || args.strict,
        ..config.clone()
    };

    let path = config
        .schema_file
        .clone()
        .ok_or_else(|| Error::invalid_args("check needs a schema file; pass --schemas or set schema_file"))?;

    output.info(&format!("Checking schema file: {}", path.display()))?;

    let registry = load_registry(&config)?.unwrap_or_default();
    let report = build_report(&path.display().to_string(), &registry);

    let rendered = output.format().format_check_report(&report)?;
    output.write(&rendered)?;

    if report.has_collisions() {
        output.warning("Some correspondences are not injective; reverse conversion keeps the last remote name")?;
    } else {
        output.success("✓ Schema file is valid")?;
    }

    Ok(())
}

fn build_report(schema_file: &str, registry: &SchemaRegistry) -> CheckReport {
    CheckReport {
        schema_file: schema_file.to_string(),
        tables: registry.tables().map(summarize).collect(),
    }
}

fn summarize(table: &TableSchema) -> TableSummary {
    let correspondence = table.correspondence();

    TableSummary {
        name: table.name().to_string(),
        key_kind: table.key_kind().to_string(),
        pass_through: correspondence.is_none(),
        fields: correspondence.map_or(0, |corr| corr.len()),
        collisions: correspondence
            .map(|corr| {
                corr.collisions()
                    .into_iter()
                    .map(|(local, remotes)| {
                        (
                            local.to_string(),
                            remotes.into_iter().map(str::to_string).collect(),
                        )
                    })
                    .collect()
            })
            .unwrap_or_default(),
    }
}
