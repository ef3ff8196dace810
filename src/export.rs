use log::info;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::formatting::{
    format_coefficient, format_percent, format_percentile, format_ratio, format_thousands,
};
use crate::inequality::SortedIncomeSeries;
use crate::report::Summary;
use crate::{Error, Result};

/// One row of the calculated table, in rank order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalculatedRow {
    pub rank: usize,
    pub income: f64,
    pub cumulative_income: f64,
    pub population_share: f64,
    pub income_share: f64,
    pub rank_weighted_income: f64,
}

/// Per-rank accumulation behind the Gini and Lorenz figures.
pub fn calculated_rows(series: &SortedIncomeSeries) -> Vec<CalculatedRow> {
    let n = series.len() as f64;
    let total = series.total_income();
    let mut cumulative = 0.0;

    series
        .as_slice()
        .iter()
        .enumerate()
        .map(|(i, &income)| {
            let rank = i + 1;
            cumulative += income;
            CalculatedRow {
                rank,
                income,
                cumulative_income: cumulative,
                population_share: rank as f64 / n,
                income_share: if total > 0.0 { cumulative / total } else { 0.0 },
                rank_weighted_income: income * rank as f64,
            }
        })
        .collect()
}

/// Writes the calculated table as CSV with a header row.
pub fn write_csv<W: Write>(writer: W, series: &SortedIncomeSeries) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in calculated_rows(series) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Headline figures as `metric,value` rows, formatted for reading.
pub fn summary_rows(summary: &Summary) -> Vec<(String, String)> {
    let top = format_percentile(summary.top.percentile);
    let bottom = format_percentile(summary.bottom.percentile);

    vec![
        (
            "gini coefficient".to_string(),
            format_coefficient(summary.gini.coefficient),
        ),
        (
            "observations".to_string(),
            summary.gini.observation_count.to_string(),
        ),
        (
            "total income".to_string(),
            format_thousands(summary.gini.total_income, 2),
        ),
        (
            format!("top {top} share"),
            format_percent(summary.top.income_share),
        ),
        (
            format!("bottom {bottom} share"),
            format_percent(summary.bottom.income_share),
        ),
        (
            format!("top {top} / bottom {bottom} ratio"),
            format_ratio(summary.ratio),
        ),
    ]
}

pub fn write_summary_csv<W: Write>(writer: W, summary: &Summary) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["metric", "value"])?;
    for (metric, value) in summary_rows(summary) {
        wtr.write_record([metric, value])?;
    }
    wtr.flush()?;
    Ok(())
}

/// `out.csv` becomes `out_summary.csv`, next to it.
pub fn summary_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "csv".to_string());
    path.with_file_name(format!("{stem}_summary.{ext}"))
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).map_err(|source| Error::Create {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufWriter::new(file))
}

/// Writes the per-rank table to `path` and the summary to [`summary_path`].
pub fn export_csv(path: &Path, series: &SortedIncomeSeries, summary: &Summary) -> Result<()> {
    write_csv(create(path)?, series)?;
    info!("wrote {} rows to {}", series.len(), path.display());

    let summary_path = summary_path(path);
    write_summary_csv(create(&summary_path)?, summary)?;
    info!("wrote summary to {}", summary_path.display());

    Ok(())
}
