//! Sales preprocessing pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Read**: discover source files; read CSV headers and every workbook sheet
//! 2. **Classify**: assign a schema id to each table from its header or folder
//! 3. **Normalize**: load CSV rows and dispatch each table to its normalizer
//! 4. **Tag**: optionally add the NHS/private tag to order-level tables
//! 5. **Write**: one CSV per table under `<preprocessed>/<bucket>/<lab>/<subfolder>/`
//! 6. **Combine**: stack every bucket folder into `combined_<bucket>.csv`
//!
//! File-level problems are collected in the [`RunReport`]; only failures that
//! make the whole run meaningless are returned as errors.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use tracing::{debug, info, info_span, warn};

use salesprep_ingest::{
    RawTable, SourceKind, discover_sources, list_csv_files, read_csv_frame, read_csv_headers,
    read_csv_table, read_workbook, write_csv_frame,
};
use salesprep_model::{
    CanonicalShape, ClassifiedTable, CombinationBucket, CombinedOutput, FileIssue, IssueKind,
    NormalizedOutput, RunReport, SchemaId,
};
use salesprep_schema::{Classification, ClassifierSession, SchemaRegistry};
use salesprep_tagging::{NhsPrivateTagger, PriceList};
use salesprep_transform::{
    DispatchTable, LabPolicyTable, Normalizer, YearlyExport, combine_frames, merge_yearly_exports,
};

use crate::settings::Settings;

// ============================================================================
// Stage 1: Read
// ============================================================================

/// One table found in a CSV file or a workbook sheet.
#[derive(Debug, Clone)]
pub struct SourceTable {
    pub path: PathBuf,
    pub sheet: Option<String>,
    pub lab_folder: Option<String>,
    /// Folders between the lab folder and the file, kept in output paths.
    pub subfolder: PathBuf,
    /// Output file stem: the file stem, plus `_<sheet>` for workbook sheets.
    pub stem: String,
    pub headers: Vec<String>,
    /// Workbook sheets are read whole; CSV rows are loaded by [`Self::load_table`].
    pub table: Option<RawTable>,
}

impl SourceTable {
    /// The full table, reading CSV rows from disk on first use.
    pub fn load_table(&mut self) -> salesprep_ingest::Result<RawTable> {
        match self.table.take() {
            Some(table) => Ok(table),
            None => read_csv_table(&self.path),
        }
    }
}

fn issue(
    path: &Path,
    sheet: Option<&str>,
    kind: IssueKind,
    message: impl Into<String>,
) -> FileIssue {
    FileIssue {
        path: path.to_path_buf(),
        sheet: sheet.map(str::to_string),
        kind,
        message: message.into(),
    }
}

/// Reads every source below `raw_root` in sorted path order.
///
/// CSV files contribute their header row only. Unreadable files and
/// workbooks are reported and skipped.
pub fn read_sources(raw_root: &Path, report: &mut RunReport) -> Result<Vec<SourceTable>> {
    let files = discover_sources(raw_root)
        .with_context(|| format!("discover sources in {}", raw_root.display()))?;
    let mut tables = Vec::new();
    for file in files {
        let stem = file.stem();
        match file.kind {
            SourceKind::Csv => match read_csv_headers(&file.path) {
                Ok(headers) => tables.push(SourceTable {
                    path: file.path.clone(),
                    sheet: None,
                    lab_folder: file.lab_folder.clone(),
                    subfolder: file.subfolder.clone(),
                    stem,
                    headers,
                    table: None,
                }),
                Err(error) => {
                    warn!(path = %file.path.display(), %error, "unreadable csv file");
                    report
                        .issues
                        .push(issue(&file.path, None, IssueKind::Read, error.to_string()));
                }
            },
            SourceKind::Workbook => match read_workbook(&file.path) {
                Ok(sheets) => {
                    for sheet in sheets {
                        tables.push(SourceTable {
                            path: file.path.clone(),
                            stem: format!("{stem}_{}", sheet.sheet),
                            sheet: Some(sheet.sheet),
                            lab_folder: file.lab_folder.clone(),
                            subfolder: file.subfolder.clone(),
                            headers: sheet.table.headers.clone(),
                            table: Some(sheet.table),
                        });
                    }
                }
                Err(error) => {
                    warn!(path = %file.path.display(), %error, "unreadable workbook");
                    report
                        .issues
                        .push(issue(&file.path, None, IssueKind::Workbook, error.to_string()));
                }
            },
        }
    }
    Ok(tables)
}

// ============================================================================
// Stage 2: Classify
// ============================================================================

/// A table with the schema it was classified as.
#[derive(Debug, Clone)]
pub struct ClassifiedSource {
    pub source: SourceTable,
    pub schema: SchemaId,
    /// Lab name written to `als_lab`.
    pub lab: String,
}

/// Classifies each table and records it in the report side table.
///
/// Files outside a lab folder and tables with repeated column names are
/// reported and dropped.
pub fn classify_sources(
    sources: Vec<SourceTable>,
    session: &mut ClassifierSession<'_>,
    settings: &Settings,
    report: &mut RunReport,
) -> Vec<ClassifiedSource> {
    let mut classified = Vec::with_capacity(sources.len());
    for source in sources {
        let Some(lab_folder) = source.lab_folder.as_deref() else {
            warn!(path = %source.path.display(), "file is not inside a lab folder");
            report.issues.push(issue(
                &source.path,
                source.sheet.as_deref(),
                IssueKind::NoLabFolder,
                "file sits directly under the raw folder; move it into a lab folder",
            ));
            continue;
        };
        let lab = settings.lab_name(lab_folder);
        let classification =
            session.classify(&source.path, source.sheet.as_deref(), &source.headers);
        let schema = match classification {
            Classification::DuplicateColumns(columns) => {
                report.issues.push(issue(
                    &source.path,
                    source.sheet.as_deref(),
                    IssueKind::DuplicateColumns,
                    format!("duplicate column names: {}", columns.join(", ")),
                ));
                continue;
            }
            Classification::ByPath(id)
            | Classification::Registered(id)
            | Classification::Provisional { id, .. } => id,
        };
        report.classified.push(ClassifiedTable {
            path: source.path.clone(),
            sheet: source.sheet.clone(),
            lab: lab.clone(),
            schema: schema.clone(),
        });
        classified.push(ClassifiedSource {
            source,
            schema,
            lab,
        });
    }
    report.provisional = session.provisional().to_vec();
    classified
}

// ============================================================================
// Stage 3: Normalize
// ============================================================================

/// Canonical rows for one source table, or one merged set of yearly exports.
#[derive(Debug, Clone)]
pub struct NormalizedTable {
    pub source: PathBuf,
    pub sheet: Option<String>,
    pub schema: SchemaId,
    pub normalizer: Normalizer,
    pub lab_folder: Option<String>,
    pub subfolder: PathBuf,
    pub stem: String,
    pub frame: DataFrame,
}

/// Dispatches each table to its normalizer.
///
/// Tables without a route (provisional or unmapped ids), CSV files whose rows
/// cannot be loaded and tables failing a reconciliation check are reported
/// and skipped. Tables whose normalizer merges yearly exports are merged per
/// lab folder first.
pub fn normalize_sources(
    classified: Vec<ClassifiedSource>,
    dispatch: &DispatchTable,
    policies: &LabPolicyTable,
    report: &mut RunReport,
) -> Vec<NormalizedTable> {
    let mut normalized = Vec::new();
    let mut yearly: BTreeMap<(Normalizer, Option<String>), Vec<ClassifiedSource>> =
        BTreeMap::new();

    for item in classified {
        let Some(normalizer) = dispatch.normalizer_for(&item.schema) else {
            debug!(path = %item.source.path.display(), schema = %item.schema, "no normalizer");
            report.issues.push(issue(
                &item.source.path,
                item.source.sheet.as_deref(),
                IssueKind::NoNormalizer,
                format!("no normalizer found for schema {}", item.schema),
            ));
            continue;
        };
        if normalizer.merges_yearly_exports() {
            yearly
                .entry((normalizer, item.source.lab_folder.clone()))
                .or_default()
                .push(item);
            continue;
        }
        let ClassifiedSource {
            mut source,
            schema,
            lab,
        } = item;
        let frame = match source.load_table().and_then(|table| table.to_frame()) {
            Ok(frame) => frame,
            Err(error) => {
                report.issues.push(issue(
                    &source.path,
                    source.sheet.as_deref(),
                    IssueKind::Read,
                    error.to_string(),
                ));
                continue;
            }
        };
        let normalized_frame = run_normalizer(
            normalizer,
            &frame,
            &lab,
            policies,
            (&source.path, source.sheet.as_deref()),
            report,
        );
        if let Some(table) = normalized_frame {
            normalized.push(NormalizedTable {
                source: source.path,
                sheet: source.sheet,
                schema,
                normalizer,
                lab_folder: source.lab_folder,
                subfolder: source.subfolder,
                stem: source.stem,
                frame: table,
            });
        }
    }

    for ((normalizer, lab_folder), exports) in yearly {
        if let Some(table) = normalize_yearly(normalizer, lab_folder, exports, policies, report) {
            normalized.push(table);
        }
    }
    normalized
}

fn run_normalizer(
    normalizer: Normalizer,
    frame: &DataFrame,
    lab: &str,
    policies: &LabPolicyTable,
    (path, sheet): (&Path, Option<&str>),
    report: &mut RunReport,
) -> Option<DataFrame> {
    match normalizer.normalize(frame, lab, policies) {
        Ok(table) => Some(table),
        Err(error) => {
            warn!(
                path = %path.display(),
                sheet,
                normalizer = normalizer.name(),
                %error,
                "table not normalized"
            );
            let kind = if error.is_reconciliation() {
                IssueKind::Reconciliation
            } else {
                IssueKind::Read
            };
            report.issues.push(issue(path, sheet, kind, error.to_string()));
            None
        }
    }
}

fn normalize_yearly(
    normalizer: Normalizer,
    lab_folder: Option<String>,
    exports: Vec<ClassifiedSource>,
    policies: &LabPolicyTable,
    report: &mut RunReport,
) -> Option<NormalizedTable> {
    let first = exports.first()?;
    let lab = first.lab.clone();
    let schema = first.schema.clone();
    let folder_path = first
        .source
        .path
        .parent()
        .map_or_else(PathBuf::new, Path::to_path_buf);
    let stem = format!("{}_preprocess", lab_folder.as_deref().unwrap_or("yearly"));
    info!(lab = %lab, exports = exports.len(), "merging yearly exports");

    let mut loaded = Vec::with_capacity(exports.len());
    for mut item in exports {
        match item.source.load_table() {
            Ok(table) => loaded.push(YearlyExport::new(item.source.stem, table)),
            Err(error) => report.issues.push(issue(
                &item.source.path,
                item.source.sheet.as_deref(),
                IssueKind::Read,
                error.to_string(),
            )),
        }
    }
    if loaded.is_empty() {
        return None;
    }
    let merged = merge_yearly_exports(loaded)
        .map_err(anyhow::Error::from)
        .and_then(|table| table.to_frame().map_err(anyhow::Error::from));
    let frame = match merged {
        Ok(frame) => frame,
        Err(error) => {
            report.issues.push(issue(
                &folder_path,
                None,
                IssueKind::Reconciliation,
                error.to_string(),
            ));
            return None;
        }
    };
    let table = run_normalizer(
        normalizer,
        &frame,
        &lab,
        policies,
        (&folder_path, None),
        report,
    )?;
    Some(NormalizedTable {
        source: folder_path,
        sheet: None,
        schema,
        normalizer,
        lab_folder,
        subfolder: PathBuf::new(),
        stem,
        frame: table,
    })
}

// ============================================================================
// Stage 4: Tag
// ============================================================================

/// Tagger plus the price lists of the labs that have one.
#[derive(Debug, Clone)]
pub struct TaggingContext {
    pub tagger: NhsPrivateTagger,
    /// Lab folder → price list.
    pub price_lists: BTreeMap<String, PriceList>,
}

impl TaggingContext {
    /// Loads every configured price list; unreadable lists are reported and
    /// their labs left untagged.
    pub fn load(settings: &Settings, report: &mut RunReport) -> Self {
        let mut price_lists = BTreeMap::new();
        for (lab, source) in &settings.tagging.price_lists {
            match PriceList::load(&source.path, &source.code_column, &source.class_column) {
                Ok(list) => {
                    price_lists.insert(lab.clone(), list);
                }
                Err(error) => {
                    warn!(lab = %lab, path = %source.path.display(), %error, "price list not loaded");
                    report.issues.push(issue(
                        &source.path,
                        None,
                        IssueKind::Tagging,
                        format!("price list for {lab}: {error}"),
                    ));
                }
            }
        }
        Self {
            tagger: settings.tagger(),
            price_lists,
        }
    }

    /// Tags an order-level table when its lab has a price list.
    ///
    /// Returns `None` when the table is not tagged.
    pub fn tag(&self, table: &NormalizedTable) -> Option<salesprep_tagging::Result<DataFrame>> {
        if table.normalizer.shape() != CanonicalShape::OrderLevel {
            return None;
        }
        let price_list = self.price_lists.get(table.lab_folder.as_deref()?)?;
        Some(self.tagger.tag(&table.frame, price_list))
    }
}

// ============================================================================
// Stage 5: Write
// ============================================================================

/// `<root>/<bucket>/<lab_folder>/<subfolder>/<stem>.csv`.
///
/// The source subfolder keeps same-named files from different folders apart.
pub fn output_path(root: &Path, table: &NormalizedTable) -> PathBuf {
    let mut path = root.join(table.normalizer.bucket().folder_name());
    if let Some(folder) = &table.lab_folder {
        path.push(folder);
    }
    if !table.subfolder.as_os_str().is_empty() {
        path.push(&table.subfolder);
    }
    path.join(format!("{}.csv", table.stem))
}

/// Writes each normalized table, tagging first when a context is given.
pub fn write_outputs(
    tables: Vec<NormalizedTable>,
    preprocessed_root: &Path,
    tagging: Option<&TaggingContext>,
    report: &mut RunReport,
) {
    for table in tables {
        let output = output_path(preprocessed_root, &table);
        let (frame, tagged) = match tagging.and_then(|ctx| ctx.tag(&table)) {
            Some(Ok(frame)) => (frame, true),
            Some(Err(error)) => {
                report.issues.push(issue(
                    &table.source,
                    table.sheet.as_deref(),
                    IssueKind::Tagging,
                    error.to_string(),
                ));
                (table.frame, false)
            }
            None => (table.frame, false),
        };
        if let Err(error) = write_csv_frame(&frame, &output) {
            report.issues.push(issue(
                &table.source,
                table.sheet.as_deref(),
                IssueKind::Write,
                error.to_string(),
            ));
            continue;
        }
        debug!(output = %output.display(), rows = frame.height(), "wrote normalized table");
        report.outputs.push(NormalizedOutput {
            source: table.source,
            sheet: table.sheet,
            schema: table.schema,
            normalizer: table.normalizer.name().to_string(),
            bucket: table.normalizer.bucket(),
            output,
            rows: frame.height(),
            tagged,
        });
    }
}

// ============================================================================
// Stage 6: Combine
// ============================================================================

/// Stacks every CSV below each bucket folder of `preprocessed_root` into
/// `<combined_root>/combined_<bucket>.csv`.
pub fn combine_tree(
    preprocessed_root: &Path,
    combined_root: &Path,
    report: &mut RunReport,
) -> Result<()> {
    for bucket in CombinationBucket::ALL {
        let folder = preprocessed_root.join(bucket.folder_name());
        if !folder.is_dir() {
            continue;
        }
        let files = list_csv_files(&folder)
            .with_context(|| format!("list preprocessed files in {}", folder.display()))?;
        let mut frames = Vec::with_capacity(files.len());
        for file in &files {
            match read_csv_frame(file) {
                Ok(frame) => frames.push(frame),
                Err(error) => report
                    .issues
                    .push(issue(file, None, IssueKind::Read, error.to_string())),
            }
        }
        if frames.is_empty() {
            continue;
        }
        let combined = combine_frames(&frames)
            .with_context(|| format!("combine bucket {bucket}"))?;
        let output = combined_root.join(format!("combined_{}.csv", bucket.folder_name()));
        write_csv_frame(&combined, &output)
            .with_context(|| format!("write {}", output.display()))?;
        info!(bucket = %bucket, files = frames.len(), rows = combined.height(), "combined bucket");
        report.combined.push(CombinedOutput {
            bucket,
            output,
            files: frames.len(),
            rows: combined.height(),
        });
    }
    Ok(())
}

// ============================================================================
// Runs
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct PreprocessOptions {
    /// Raw folder; the settings folder when `None`.
    pub raw: Option<PathBuf>,
    pub tag_nhs: bool,
    pub combine: bool,
}

/// Registry for the raw folder with the dispatch table checked against it.
pub fn checked_registry(
    settings: &Settings,
    raw_root: &Path,
    dispatch: &DispatchTable,
) -> Result<SchemaRegistry> {
    let registry = settings.registry(raw_root)?;
    dispatch
        .validate(&registry)
        .context("dispatch table does not match the schema registry")?;
    Ok(registry)
}

/// Read and classify only.
pub fn classify(settings: &Settings, raw: Option<&Path>) -> Result<RunReport> {
    let raw_root = raw.unwrap_or(&settings.paths.raw).to_path_buf();
    let registry = checked_registry(settings, &raw_root, &DispatchTable::builtin())?;
    let mut report = RunReport {
        raw_root: Some(raw_root.clone()),
        ..RunReport::default()
    };
    let start = Instant::now();
    let span = info_span!("classify", raw = %raw_root.display());
    let _guard = span.enter();

    let sources = read_sources(&raw_root, &mut report)?;
    let mut session = ClassifierSession::new(&registry);
    let classified = classify_sources(sources, &mut session, settings, &mut report);
    info!(
        tables = classified.len(),
        provisional = report.provisional.len(),
        duration_ms = start.elapsed().as_millis(),
        "classification complete"
    );
    Ok(report)
}

/// The whole pipeline.
pub fn preprocess(settings: &Settings, options: &PreprocessOptions) -> Result<RunReport> {
    let raw_root = options.raw.clone().unwrap_or_else(|| settings.paths.raw.clone());
    let dispatch = DispatchTable::builtin();
    let registry = checked_registry(settings, &raw_root, &dispatch)?;
    let policies = settings.policy_table();
    let mut report = RunReport {
        raw_root: Some(raw_root.clone()),
        ..RunReport::default()
    };
    let start = Instant::now();

    let sources = info_span!("read", raw = %raw_root.display())
        .in_scope(|| read_sources(&raw_root, &mut report))?;
    let classified = info_span!("classify").in_scope(|| {
        let mut session = ClassifierSession::new(&registry);
        classify_sources(sources, &mut session, settings, &mut report)
    });
    let normalized = info_span!("normalize")
        .in_scope(|| normalize_sources(classified, &dispatch, &policies, &mut report));
    info!(tables = normalized.len(), "normalization complete");

    let tagging = options
        .tag_nhs
        .then(|| TaggingContext::load(settings, &mut report));
    info_span!("write", output = %settings.paths.preprocessed.display()).in_scope(|| {
        write_outputs(
            normalized,
            &settings.paths.preprocessed,
            tagging.as_ref(),
            &mut report,
        );
    });

    if options.combine {
        info_span!("combine").in_scope(|| {
            combine_tree(
                &settings.paths.preprocessed,
                &settings.paths.combined,
                &mut report,
            )
        })?;
    }
    info!(
        outputs = report.outputs.len(),
        rows = report.normalized_rows(),
        issues = report.issues.len(),
        duration_ms = start.elapsed().as_millis(),
        "preprocess complete"
    );
    Ok(report)
}

/// Combine an existing preprocessed tree.
pub fn combine(settings: &Settings, preprocessed: Option<&Path>) -> Result<RunReport> {
    let root = preprocessed.unwrap_or(&settings.paths.preprocessed);
    let mut report = RunReport::default();
    info_span!("combine", preprocessed = %root.display())
        .in_scope(|| combine_tree(root, &settings.paths.combined, &mut report))?;
    Ok(report)
}
