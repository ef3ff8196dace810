//! Gini coefficient, Lorenz curve and percentile group shares.
//!
//! Everything here is pure: each call reads its arguments and allocates its
//! own output, so results can be computed from any number of threads at once.

use serde::Serialize;

/// Decimal places kept in [`GiniResult::coefficient`].
pub const COEFFICIENT_DECIMALS: i32 = 4;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InequalityError {
    /// Empty sample, a negative or non-finite income, or a percentile outside (0, 100].
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Total income is zero so no share can be computed.
    #[error("total income is zero, the Gini coefficient is undefined")]
    DivisionByZero,
}

pub type Result<T> = std::result::Result<T, InequalityError>;

/// One vertex of the Lorenz curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LorenzPoint {
    pub population_share: f64,
    pub income_share: f64,
}

impl LorenzPoint {
    pub const ORIGIN: LorenzPoint = LorenzPoint {
        population_share: 0.0,
        income_share: 0.0,
    };
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GiniResult {
    /// Rounded half-to-even to [`COEFFICIENT_DECIMALS`] places.
    pub coefficient: f64,
    pub total_income: f64,
    pub observation_count: usize,
    /// `observation_count + 1` points from (0, 0) to (1, 1).
    pub lorenz_points: Vec<LorenzPoint>,
}

/// Which end of the income ranking a group is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroupShareResult {
    pub direction: Direction,
    pub percentile: f64,
    /// `floor(n * percentile / 100)`
    pub count: usize,
    pub income_share: f64,
}

/// Incomes sorted ascending, validated and totalled once.
/// Rank `i` (1-based) is the position in [`SortedIncomeSeries::as_slice`] plus one.
#[derive(Debug, Clone, PartialEq)]
pub struct SortedIncomeSeries {
    data: Vec<f64>,
    total: f64,
}

impl SortedIncomeSeries {
    pub fn new(mut incomes: Vec<f64>) -> Result<Self> {
        validate(&incomes)?;
        incomes.sort_by(f64::total_cmp);

        // Summed in sorted order so the last Lorenz point lands on exactly 1.0
        let total: f64 = incomes.iter().sum();
        if !total.is_finite() {
            return Err(InequalityError::InvalidInput(
                "total income overflows a 64-bit float".to_string(),
            ));
        }

        Ok(SortedIncomeSeries {
            data: incomes,
            total,
        })
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false, construction rejects empty samples.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn total_income(&self) -> f64 {
        self.total
    }

    /// Gini coefficient and Lorenz curve of the series.
    pub fn gini(&self) -> Result<GiniResult> {
        if self.total == 0.0 {
            return Err(InequalityError::DivisionByZero);
        }

        let n = self.data.len() as f64;
        let weighted: f64 = self
            .data
            .iter()
            .enumerate()
            .map(|(i, &income)| income * (i + 1) as f64)
            .sum();

        let raw = ((2.0 * weighted / self.total) - (n + 1.0)) / n;
        let mut coefficient = round_half_even(raw, COEFFICIENT_DECIMALS);
        // normalise -0.0
        if coefficient == 0.0 {
            coefficient = 0.0;
        }

        Ok(GiniResult {
            coefficient,
            total_income: self.total,
            observation_count: self.data.len(),
            lorenz_points: lorenz_points(&self.data, self.total),
        })
    }

    /// Income share of the top or bottom `percentile` percent of the series.
    pub fn group_share(&self, percentile: f64, direction: Direction) -> Result<GroupShareResult> {
        group_share(&self.data, self.total, percentile, direction)
    }
}

/// Sorts `incomes` and computes the Gini coefficient and Lorenz curve.
/// The result does not depend on the order of `incomes`.
pub fn compute_gini_and_curve(incomes: &[f64]) -> Result<GiniResult> {
    SortedIncomeSeries::new(incomes.to_vec())?.gini()
}

/// Income share held by the `floor(n * percentile / 100)` largest (`Top`) or
/// smallest (`Bottom`) values of an ascending slice.
///
/// `total_income` must be the total of the same slice. A group that rounds
/// down to zero members has a share of zero rather than an error.
pub fn group_share(
    sorted: &[f64],
    total_income: f64,
    percentile: f64,
    direction: Direction,
) -> Result<GroupShareResult> {
    if !(percentile > 0.0 && percentile <= 100.0) {
        return Err(InequalityError::InvalidInput(format!(
            "percentile must lie in (0, 100], got {percentile}"
        )));
    }

    let count = group_size(sorted.len(), percentile);
    if count == 0 {
        return Ok(GroupShareResult {
            direction,
            percentile,
            count: 0,
            income_share: 0.0,
        });
    }
    if total_income == 0.0 {
        return Err(InequalityError::DivisionByZero);
    }

    let group = match direction {
        Direction::Top => &sorted[sorted.len() - count..],
        Direction::Bottom => &sorted[..count],
    };
    let group_income: f64 = group.iter().sum();

    Ok(GroupShareResult {
        direction,
        percentile,
        count,
        income_share: group_income / total_income,
    })
}

/// Ratio of the top group's share to the bottom group's share.
/// `None` when the bottom group holds nothing.
pub fn share_ratio(top: &GroupShareResult, bottom: &GroupShareResult) -> Option<f64> {
    if bottom.income_share > 0.0 {
        Some(top.income_share / bottom.income_share)
    } else {
        None
    }
}

/// Rounds the exact binary value of `value` to `decimals` places, ties to even.
///
/// Exact for `decimals` in `0..=22`, where the scale factor is a whole `f64`.
pub fn round_half_even(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let scaled = value * factor;

    // The multiply can itself round onto a .5 tie. The fused residual is the
    // exact error of that multiply and tells which side the true product is on.
    let residual = value.mul_add(factor, -scaled);
    let rounded = if (scaled - scaled.trunc()).abs() == 0.5 && residual != 0.0 {
        if residual > 0.0 {
            scaled.ceil()
        } else {
            scaled.floor()
        }
    } else {
        scaled.round_ties_even()
    };

    rounded / factor
}

fn validate(incomes: &[f64]) -> Result<()> {
    if incomes.is_empty() {
        return Err(InequalityError::InvalidInput(
            "income sample is empty".to_string(),
        ));
    }

    for (i, &income) in incomes.iter().enumerate() {
        if !income.is_finite() {
            return Err(InequalityError::InvalidInput(format!(
                "income at position {i} is not a finite number ({income})"
            )));
        }
        if income < 0.0 {
            return Err(InequalityError::InvalidInput(format!(
                "income at position {i} is negative ({income})"
            )));
        }
    }

    Ok(())
}

fn group_size(n: usize, percentile: f64) -> usize {
    ((n as f64 * percentile / 100.0).floor() as usize).min(n)
}

fn lorenz_points(sorted: &[f64], total: f64) -> Vec<LorenzPoint> {
    let n = sorted.len() as f64;
    let mut points = Vec::with_capacity(sorted.len() + 1);
    points.push(LorenzPoint::ORIGIN);

    let mut cumulative = 0.0;
    for (i, &income) in sorted.iter().enumerate() {
        cumulative += income;
        points.push(LorenzPoint {
            population_share: (i + 1) as f64 / n,
            income_share: cumulative / total,
        });
    }

    points
}
