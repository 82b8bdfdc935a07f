use std::fs;
use std::path::Path;

use tracing::{debug, error, info, instrument};

use crate::aggregate;
use crate::error::{Result, ToolError};
use crate::io::{excel_read, json_write};
use crate::model::Stage;

/// Why a successful run produced the empty `{}` summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// The worksheet had a valid header but no data rows.
    NoRows,
    /// Every data row was dropped during cleaning.
    NoUsableRows,
}

/// Successful result of [`process`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// At least one category was written.
    Summarised {
        categories: usize,
        rows_used: usize,
        rows_dropped: usize,
    },
    /// The output file holds `{}`.
    Empty { reason: EmptyReason },
}

/// Reads the first worksheet of `input`, totals `Value` per `Category` and
/// writes the JSON summary to `output`.
///
/// The output file is only touched once every earlier step has succeeded.
/// Progress and failures are reported as `tracing` events; the caller decides
/// where they go by installing a subscriber.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display())
)]
pub fn process(input: &Path, output: &Path) -> Result<Outcome> {
    let result = run(input, output);
    if let Err(err) = &result {
        match err {
            ToolError::Processing { stage, message, .. } => {
                error!(%stage, %message, "processing failed, no output written");
            }
            other => error!(error = %other, "summary run failed, no output written"),
        }
    }
    result
}

fn run(input: &Path, output: &Path) -> Result<Outcome> {
    debug!(stage = %Stage::NotStarted, "stage reached");
    ensure_readable(input)?;

    let table = excel_read::read_table(input)?;
    info!(
        rows = table.rows.len(),
        columns = table.headers.len(),
        "read input worksheet"
    );
    debug!(stage = %Stage::Loaded, "stage reached");

    let records = aggregate::validate(&table)?;
    debug!(stage = %Stage::Validated, "stage reached");

    let row_count = records.len();
    let cleaned = aggregate::clean(records);
    info!(
        rows_used = cleaned.rows.len(),
        rows_dropped = cleaned.dropped,
        "cleaned input rows"
    );
    debug!(stage = %Stage::Cleaned, "stage reached");

    let result = aggregate::aggregate(&cleaned);
    if let Some((category, _)) = result.iter().find(|(_, total)| !total.is_finite()) {
        return Err(ToolError::processing(
            Stage::Aggregated,
            input,
            format!("total for category '{category}' is not a finite number"),
        ));
    }
    info!(
        categories = result.len(),
        grand_total = result.grand_total(),
        "aggregated categories"
    );
    debug!(stage = %Stage::Aggregated, "stage reached");

    let rendered = json_write::render_summary(&result)?;
    json_write::write_atomic(output, &rendered)?;
    info!(bytes = rendered.len(), "wrote summary");
    debug!(stage = %Stage::Written, "stage reached");

    if cleaned.is_empty() {
        let reason = if row_count == 0 {
            EmptyReason::NoRows
        } else {
            EmptyReason::NoUsableRows
        };
        info!(?reason, "summary is empty");
        return Ok(Outcome::Empty { reason });
    }

    Ok(Outcome::Summarised {
        categories: result.len(),
        rows_used: cleaned.rows.len(),
        rows_dropped: cleaned.dropped,
    })
}

fn ensure_readable(input: &Path) -> Result<()> {
    match fs::metadata(input) {
        Ok(metadata) if metadata.is_file() => Ok(()),
        Ok(_) => {
            debug!("input path is not a regular file");
            Err(ToolError::NotFound(input.to_path_buf()))
        }
        Err(err) => {
            debug!(kind = ?err.kind(), error = %err, "input metadata unavailable");
            Err(ToolError::NotFound(input.to_path_buf()))
        }
    }
}
