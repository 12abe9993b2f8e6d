//! # Sales Comparator
//!
//! Directional sales-volume comparison between two "sides".
//!
//! ## Modes
//! ```text
//! ┌──────────────────────────┬──────────────────────┬──────────────────────┬──────┐
//! │ Mode                     │ Side A               │ Side B               │ Show │
//! ├──────────────────────────┼──────────────────────┼──────────────────────┼──────┤
//! │ ExactDates               │ target on day A      │ target on day B      │ yes  │
//! │ RangeTotal               │ 0 (no query)         │ target over range    │ no   │
//! │ RangeVsBaseline          │ baseline over range  │ target over range    │ yes  │
//! │ PeriodVsPeriod           │ target over range A  │ target over range B  │ yes  │
//! │ ProductVsProduct         │ other over range     │ target over range    │ yes  │
//! └──────────────────────────┴──────────────────────┴──────────────────────┴──────┘
//! ```
//!
//! ## Zero Baseline
//! When side A is zero the percentage is undefined. `RangeVsBaseline` reports
//! 100, every other mode reports 0. The asymmetry is kept on purpose and
//! tested per mode.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::cooccurrence::RelatedProduct;
use super::rounded_percentage;
use crate::error::ValidationError;
use crate::period::{DatePredicate, DateRange};
use crate::types::ProductId;
use crate::validation::date_range;

// =============================================================================
// Sales Difference
// =============================================================================

/// What to report when the baseline side sold nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroBaseline {
    /// Report 0%.
    Zero,
    /// Report 100%.
    Hundred,
}

/// Delta between side A (baseline) and side B.
///
/// Both numbers are magnitudes; direction lives only in `is_increase`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SalesDifference {
    pub percentage: u32,
    #[serde(rename = "absoluteValue")]
    pub absolute: u64,
    pub is_increase: bool,
}

impl SalesDifference {
    /// Computes `side_b − side_a` and its percentage of `side_a`.
    ///
    /// ## Example
    /// ```rust
    /// use synergy_core::analytics::comparison::{SalesDifference, ZeroBaseline};
    ///
    /// let drop = SalesDifference::between(8, 6, ZeroBaseline::Zero);
    /// assert_eq!(drop.absolute, 2);
    /// assert_eq!(drop.percentage, 25);
    /// assert!(!drop.is_increase);
    ///
    /// let fresh = SalesDifference::between(0, 5, ZeroBaseline::Hundred);
    /// assert_eq!(fresh.percentage, 100);
    /// ```
    pub fn between(side_a: u64, side_b: u64, zero_baseline: ZeroBaseline) -> Self {
        let is_increase = side_b >= side_a;
        let absolute = side_a.abs_diff(side_b);
        let percentage = match rounded_percentage(absolute, side_a) {
            Some(pct) => pct,
            None => match zero_baseline {
                ZeroBaseline::Zero => 0,
                ZeroBaseline::Hundred => 100,
            },
        };

        SalesDifference {
            percentage,
            absolute,
            is_increase,
        }
    }
}

// =============================================================================
// Comparison Mode
// =============================================================================

/// One side of a comparison: whose sales, over which days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideQuery {
    pub product_id: ProductId,
    pub predicate: DatePredicate,
}

/// The five mutually exclusive comparison modes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum ComparisonMode {
    /// Target product on two specific days.
    ExactDates { first: NaiveDate, second: NaiveDate },
    /// Target product total over one range, nothing to compare against.
    RangeTotal { range: DateRange },
    /// Target product against the product shown before it on the dashboard.
    RangeVsBaseline {
        range: DateRange,
        baseline_product_id: ProductId,
    },
    /// Target product over two ranges.
    PeriodVsPeriod { first: DateRange, second: DateRange },
    /// Target product against an explicitly chosen product.
    ProductVsProduct {
        range: DateRange,
        comparison_product_id: ProductId,
    },
}

impl ComparisonMode {
    /// Short label for logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            ComparisonMode::ExactDates { .. } => "exact-date compare",
            ComparisonMode::RangeTotal { .. } => "range total",
            ComparisonMode::RangeVsBaseline { .. } => "range total vs baseline product",
            ComparisonMode::PeriodVsPeriod { .. } => "period vs period",
            ComparisonMode::ProductVsProduct { .. } => "product vs product",
        }
    }

    /// Side A query. `None` means side A is fixed at zero.
    pub fn side_a(&self, target: ProductId) -> Option<SideQuery> {
        match self {
            ComparisonMode::ExactDates { first, .. } => Some(SideQuery {
                product_id: target,
                predicate: DatePredicate::On(*first),
            }),
            ComparisonMode::RangeTotal { .. } => None,
            ComparisonMode::RangeVsBaseline {
                range,
                baseline_product_id,
            } => Some(SideQuery {
                product_id: *baseline_product_id,
                predicate: DatePredicate::Between(*range),
            }),
            ComparisonMode::PeriodVsPeriod { first, .. } => Some(SideQuery {
                product_id: target,
                predicate: DatePredicate::Between(*first),
            }),
            ComparisonMode::ProductVsProduct {
                range,
                comparison_product_id,
            } => Some(SideQuery {
                product_id: *comparison_product_id,
                predicate: DatePredicate::Between(*range),
            }),
        }
    }

    /// Side B query. Always the target product.
    pub fn side_b(&self, target: ProductId) -> SideQuery {
        let predicate = match self {
            ComparisonMode::ExactDates { second, .. } => DatePredicate::On(*second),
            ComparisonMode::RangeTotal { range }
            | ComparisonMode::RangeVsBaseline { range, .. }
            | ComparisonMode::ProductVsProduct { range, .. } => DatePredicate::Between(*range),
            ComparisonMode::PeriodVsPeriod { second, .. } => DatePredicate::Between(*second),
        };
        SideQuery {
            product_id: target,
            predicate,
        }
    }

    /// The baskets fed to the co-occurrence ranker.
    ///
    /// Exactly the union of the day sets the two sides count over.
    pub fn basket_predicate(&self) -> DatePredicate {
        match self {
            ComparisonMode::ExactDates { first, second } => {
                DatePredicate::either_day(*first, *second)
            }
            ComparisonMode::RangeTotal { range }
            | ComparisonMode::RangeVsBaseline { range, .. }
            | ComparisonMode::ProductVsProduct { range, .. } => DatePredicate::Between(*range),
            ComparisonMode::PeriodVsPeriod { first, second } => {
                DatePredicate::AnyOf(vec![*first, *second])
            }
        }
    }

    pub fn show_comparison(&self) -> bool {
        !matches!(self, ComparisonMode::RangeTotal { .. })
    }

    pub fn zero_baseline(&self) -> ZeroBaseline {
        match self {
            ComparisonMode::RangeVsBaseline { .. } => ZeroBaseline::Hundred,
            _ => ZeroBaseline::Zero,
        }
    }
}

// =============================================================================
// Flat Parameters
// =============================================================================

/// Top-level switch of the dashboard request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ComparisonType {
    /// Compare two days or two periods.
    #[default]
    Compare,
    /// Total "until" an end date, optionally against another product.
    Until,
}

impl std::str::FromStr for ComparisonType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compare" => Ok(ComparisonType::Compare),
            "until" => Ok(ComparisonType::Until),
            other => Err(ValidationError::InvalidFormat {
                field: "comparison_type".to_string(),
                reason: format!("'{}' is not one of: compare, until", other),
            }),
        }
    }
}

/// The flat parameter set a caller supplies; `resolve` picks the mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonParams {
    #[serde(default)]
    pub comparison_type: ComparisonType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub is_second_product: bool,
    #[serde(default)]
    pub first_product_id: Option<ProductId>,
    #[serde(default)]
    pub compare_periods: bool,
    #[serde(default)]
    pub second_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub second_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub comparison_product_id: Option<ProductId>,
}

impl ComparisonParams {
    /// Parameters for the plain two-day comparison.
    pub fn compare(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        ComparisonParams {
            comparison_type: ComparisonType::Compare,
            start_date,
            end_date,
            is_second_product: false,
            first_product_id: None,
            compare_periods: false,
            second_start_date: None,
            second_end_date: None,
            comparison_product_id: None,
        }
    }

    /// Parameters for a range total.
    pub fn until(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        ComparisonParams {
            comparison_type: ComparisonType::Until,
            ..Self::compare(start_date, end_date)
        }
    }

    /// Selects exactly one mode from the supplied parameters.
    ///
    /// ## Resolution
    /// ```text
    /// compare ─┬─ compare_periods ──────────────► PeriodVsPeriod
    ///          └─ otherwise ────────────────────► ExactDates
    /// until ───┬─ comparison_product_id ────────► ProductVsProduct
    ///          ├─ is_second_product + first id ─► RangeVsBaseline
    ///          └─ otherwise ────────────────────► RangeTotal
    /// ```
    pub fn resolve(&self) -> Result<ComparisonMode, ValidationError> {
        match self.comparison_type {
            ComparisonType::Compare if self.compare_periods => {
                let missing = |parameter: &str| ValidationError::MissingParameter {
                    mode: "period vs period".to_string(),
                    parameter: parameter.to_string(),
                };
                let second_start = self
                    .second_start_date
                    .ok_or_else(|| missing("second_start_date"))?;
                let second_end = self
                    .second_end_date
                    .ok_or_else(|| missing("second_end_date"))?;

                Ok(ComparisonMode::PeriodVsPeriod {
                    first: date_range("first period", self.start_date, self.end_date)?,
                    second: date_range("second period", second_start, second_end)?,
                })
            }
            ComparisonType::Compare => Ok(ComparisonMode::ExactDates {
                first: self.start_date,
                second: self.end_date,
            }),
            ComparisonType::Until => {
                let range = date_range("period", self.start_date, self.end_date)?;

                if let Some(comparison_product_id) = self.comparison_product_id {
                    return Ok(ComparisonMode::ProductVsProduct {
                        range,
                        comparison_product_id,
                    });
                }

                match (self.is_second_product, self.first_product_id) {
                    (true, Some(baseline_product_id)) => Ok(ComparisonMode::RangeVsBaseline {
                        range,
                        baseline_product_id,
                    }),
                    _ => Ok(ComparisonMode::RangeTotal { range }),
                }
            }
        }
    }
}

// =============================================================================
// Result
// =============================================================================

/// Outcome of `compare`.
///
/// Field names on the wire follow the dashboard contract
/// (`startDateSales` is side A, `endDateSales` is side B).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SalesComparison {
    pub product_id: ProductId,
    pub product_name: String,
    #[serde(rename = "startDateSales")]
    pub side_a_sales: u64,
    #[serde(rename = "endDateSales")]
    pub side_b_sales: u64,
    #[serde(rename = "salesDifference")]
    pub difference: SalesDifference,
    pub related_products: Vec<RelatedProduct>,
    pub show_comparison: bool,
}

// =============================================================================
// Unit Tests
// =============================================================================
