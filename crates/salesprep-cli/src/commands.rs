use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::info;

use salesprep_cli::mappings::{MappingOutput, build_mappings};
use salesprep_cli::pipeline::{self, PreprocessOptions};
use salesprep_cli::reports::write_reports;
use salesprep_cli::settings::Settings;
use salesprep_model::RunReport;
use salesprep_schema::SchemaMatcher;
use salesprep_transform::DispatchTable;

use crate::cli::{ClassifyArgs, CombineArgs, PreprocessArgs};
use crate::summary::apply_table_style;

pub fn run_classify(settings: &Settings, args: &ClassifyArgs) -> Result<RunReport> {
    let report = pipeline::classify(settings, args.raw.as_deref())?;
    write_reports(&report, &settings.paths.reports).context("write reports")?;
    Ok(report)
}

pub fn run_preprocess(settings: &Settings, args: &PreprocessArgs) -> Result<RunReport> {
    let options = PreprocessOptions {
        raw: args.raw.clone(),
        tag_nhs: args.tag_nhs,
        combine: !args.no_combine,
    };
    let report = pipeline::preprocess(settings, &options)?;
    write_reports(&report, &settings.paths.reports).context("write reports")?;
    Ok(report)
}

pub fn run_combine(settings: &Settings, args: &CombineArgs) -> Result<RunReport> {
    pipeline::combine(settings, args.preprocessed.as_deref())
}

pub fn run_nhs_mapping(settings: &Settings) -> Result<Vec<MappingOutput>> {
    build_mappings(settings)
}

pub fn run_schemas(settings: &Settings) -> Result<()> {
    let dispatch = DispatchTable::builtin();
    let registry = pipeline::checked_registry(settings, &settings.paths.raw, &dispatch)?;
    info!(schemas = registry.len(), "loaded schema registry");
    let mut table = Table::new();
    table.set_header(vec!["Schema", "Family", "Match", "Normalizer", "Bucket"]);
    apply_table_style(&mut table);
    for entry in registry.entries() {
        let matcher = match &entry.matcher {
            SchemaMatcher::Signature(columns) => format!("{} columns", columns.len()),
            SchemaMatcher::PathPrefix(prefix) => format!("below {}", prefix.display()),
        };
        let (normalizer, bucket) = dispatch.normalizer_for(&entry.id).map_or_else(
            || ("-".to_string(), "-".to_string()),
            |normalizer| (normalizer.to_string(), normalizer.bucket().to_string()),
        );
        table.add_row(vec![
            entry.id.to_string(),
            entry.family.clone(),
            matcher,
            normalizer,
            bucket,
        ]);
    }
    println!("{table}");
    Ok(())
}
