//! Builds the NHS/private mapping tables used as price lists by the tagger.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use salesprep_ingest::write_csv_frame;
use salesprep_tagging::{aesthetic_world_mapping, read_reference_table, woodford_mapping};

use crate::settings::Settings;

#[derive(Debug, Clone)]
pub struct MappingOutput {
    pub lab: &'static str,
    pub output: PathBuf,
    pub rows: usize,
}

/// Writes `<mappings>/aesthetic_world.csv` and `<mappings>/woodford.csv`.
pub fn build_mappings(settings: &Settings) -> Result<Vec<MappingOutput>> {
    let tagging = &settings.tagging;
    let nhs = read_reference_table(&tagging.aesthetic_world_nhs_codes)
        .with_context(|| format!("read {}", tagging.aesthetic_world_nhs_codes.display()))?;
    let private = read_reference_table(&tagging.aesthetic_world_private_codes)
        .with_context(|| format!("read {}", tagging.aesthetic_world_private_codes.display()))?;
    let aesthetic_world =
        aesthetic_world_mapping(&nhs, &private).context("build Aesthetic World mapping")?;

    let price_sheet = read_reference_table(&tagging.woodford_price_list)
        .with_context(|| format!("read {}", tagging.woodford_price_list.display()))?;
    let woodford = woodford_mapping(&price_sheet).context("build Woodford mapping")?;

    let mut outputs = Vec::with_capacity(2);
    for (lab, frame) in [("aesthetic_world", aesthetic_world), ("woodford", woodford)] {
        let output = settings.paths.mappings.join(format!("{lab}.csv"));
        write_csv_frame(&frame, &output).with_context(|| format!("write {}", output.display()))?;
        info!(lab, rows = frame.height(), output = %output.display(), "wrote mapping table");
        outputs.push(MappingOutput {
            lab,
            output,
            rows: frame.height(),
        });
    }
    Ok(outputs)
}
