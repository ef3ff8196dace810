use serde::Serialize;
use std::io::{self, Write};
use textplots::{Chart, Plot, Shape};

use crate::export::calculated_rows;
use crate::formatting::{
    format_coefficient, format_currency, format_percent, format_percentile, format_ratio,
    format_thousands,
};
use crate::inequality::{
    self, Direction, GiniResult, GroupShareResult, LorenzPoint, SortedIncomeSeries,
};

const CHART_WIDTH: u32 = 160;
const CHART_HEIGHT: u32 = 60;

#[derive(Clone, Copy, clap::ValueEnum)]
pub enum Format {
    #[value(name = "table")]
    Table,
    #[value(name = "json")]
    Json,
}

/// Everything reported for one sample: the Gini result plus one top and one
/// bottom group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    #[serde(flatten)]
    pub gini: GiniResult,
    pub top: GroupShareResult,
    pub bottom: GroupShareResult,
    /// `null` when the bottom group holds no income
    pub ratio: Option<f64>,
}

impl Summary {
    pub fn new(
        series: &SortedIncomeSeries,
        top_percentile: f64,
        bottom_percentile: f64,
    ) -> inequality::Result<Self> {
        let gini = series.gini()?;
        let top = series.group_share(top_percentile, Direction::Top)?;
        let bottom = series.group_share(bottom_percentile, Direction::Bottom)?;
        let ratio = inequality::share_ratio(&top, &bottom);

        Ok(Summary {
            gini,
            top,
            bottom,
            ratio,
        })
    }
}

pub fn summary_to_json(summary: &Summary) -> serde_json::Result<String> {
    serde_json::to_string_pretty(summary)
}

/// Writes the two-column summary followed by the first `preview` ranks.
pub fn write_summary_table<W: Write>(
    out: &mut W,
    summary: &Summary,
    series: &SortedIncomeSeries,
    preview: usize,
) -> io::Result<()> {
    let top_label = format!("top {}", format_percentile(summary.top.percentile));
    let bottom_label = format!("bottom {}", format_percentile(summary.bottom.percentile));

    let left_items = [
        ("gini", format_coefficient(summary.gini.coefficient)),
        ("n", summary.gini.observation_count.to_string()),
        ("total", format_currency(summary.gini.total_income)),
    ];
    let right_items = [
        (top_label.as_str(), format_percent(summary.top.income_share)),
        (bottom_label.as_str(), format_percent(summary.bottom.income_share)),
        ("ratio", format_ratio(summary.ratio)),
    ];

    for (left, right) in left_items.iter().zip(right_items.iter()) {
        writeln!(
            out,
            "{:>8}  {:<20}{:>12}  {}",
            left.0, left.1, right.0, right.1
        )?;
    }

    if preview == 0 {
        return Ok(());
    }

    writeln!(out)?;
    writeln!(
        out,
        "{:>8}  {:>16}  {:>18}  {:>10}  {:>10}",
        "rank", "income", "cumulative", "pop share", "inc share"
    )?;
    let rows = calculated_rows(series);
    for row in rows.iter().take(preview) {
        writeln!(
            out,
            "{:>8}  {:>16}  {:>18}  {:>10}  {:>10}",
            row.rank,
            format_thousands(row.income, 2),
            format_thousands(row.cumulative_income, 2),
            format!("{:.4}", row.population_share),
            format!("{:.4}", row.income_share),
        )?;
    }
    if rows.len() > preview {
        writeln!(out, "{:>8}  ({} more)", "...", rows.len() - preview)?;
    }

    Ok(())
}

/// Evenly spaced subset of the curve, always keeping both endpoints.
pub fn lorenz_chart_points(points: &[LorenzPoint], max_points: usize) -> Vec<(f32, f32)> {
    let to_pair = |p: &LorenzPoint| (p.population_share as f32, p.income_share as f32);

    if points.len() <= max_points || max_points < 2 {
        return points.iter().map(to_pair).collect();
    }

    let last = points.len() - 1;
    (0..max_points)
        .map(|i| to_pair(&points[i * last / (max_points - 1)]))
        .collect()
}

/// Draws the Lorenz curve against the line of perfect equality.
pub fn plot_lorenz(result: &GiniResult) {
    let curve = lorenz_chart_points(&result.lorenz_points, CHART_WIDTH as usize);
    let equality: [(f32, f32); 2] = [(0.0, 0.0), (1.0, 1.0)];

    Chart::new_with_y_range(CHART_WIDTH, CHART_HEIGHT, 0.0, 1.0, 0.0, 1.0)
        .lineplot(&Shape::Lines(&curve))
        .lineplot(&Shape::Lines(&equality))
        .nice();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known_series() -> SortedIncomeSeries {
        SortedIncomeSeries::new(vec![10.0, 20.0, 30.0, 40.0]).unwrap()
    }

    #[test]
    fn test_summary_new() {
        let summary = Summary::new(&known_series(), 25.0, 25.0).unwrap();

        assert_eq!(summary.gini.coefficient, 0.25);
        assert_eq!(summary.top.count, 1);
        assert_eq!(summary.bottom.count, 1);
        assert!((summary.ratio.unwrap() - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_summary_ratio_not_applicable() {
        // floor(4 * 20 / 100) = 0 for the bottom group
        let summary = Summary::new(&known_series(), 25.0, 20.0).unwrap();

        assert_eq!(summary.bottom.count, 0);
        assert_eq!(summary.ratio, None);
    }

    #[test]
    fn test_summary_rejects_bad_percentile() {
        assert!(Summary::new(&known_series(), 0.0, 20.0).is_err());
        assert!(Summary::new(&known_series(), 20.0, 150.0).is_err());
    }

    #[test]
    fn test_summary_json() {
        let summary = Summary::new(&known_series(), 25.0, 20.0).unwrap();
        let json = summary_to_json(&summary).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["coefficient"], 0.25);
        assert_eq!(value["observation_count"], 4);
        assert_eq!(value["top"]["direction"], "top");
        assert_eq!(value["top"]["count"], 1);
        assert!(value["ratio"].is_null());
        assert_eq!(value["lorenz_points"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn test_write_summary_table() {
        let series = known_series();
        let summary = Summary::new(&series, 25.0, 25.0).unwrap();
        let mut out = Vec::new();
        write_summary_table(&mut out, &summary, &series, 2).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("0.2500"));
        assert!(text.contains("top 25%"));
        assert!(text.contains("40.0%"));
        assert!(text.contains("bottom 25%"));
        assert!(text.contains("10.0%"));
        assert!(text.contains("4.00"));
        assert!(text.contains("(2 more)"));
    }

    #[test]
    fn test_write_summary_table_without_preview() {
        let series = known_series();
        let summary = Summary::new(&series, 25.0, 20.0).unwrap();
        let mut out = Vec::new();
        write_summary_table(&mut out, &summary, &series, 0).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("N/A"));
    }

    #[test]
    fn test_lorenz_chart_points_short_curve() {
        let result = inequality::compute_gini_and_curve(&[1.0, 2.0, 3.0]).unwrap();
        let points = lorenz_chart_points(&result.lorenz_points, 160);

        assert_eq!(points.len(), 4);
    }

    #[test]
    fn test_lorenz_chart_points_downsampled() {
        let incomes: Vec<f64> = (1..=1000).map(|i| i as f64).collect();
        let result = inequality::compute_gini_and_curve(&incomes).unwrap();
        let points = lorenz_chart_points(&result.lorenz_points, 160);

        assert_eq!(points.len(), 160);
        assert_eq!(points[0], (0.0, 0.0));
        assert_eq!(points[159], (1.0, 1.0));
    }
}
