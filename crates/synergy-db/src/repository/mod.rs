//! # Repository Module
//!
//! Database repository implementations for Sales Synergy.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  AnalyticsStore impl (store.rs)                                        │
//! │       │                                                                 │
//! │       │  db.purchases().ids_matching(&predicate)                       │
//! │       ▼                                                                 │
//! │  ProductRepository    get_by_id, find_by_name, get_many, insert        │
//! │  PurchaseRepository   ids_matching, line_items, sale_dates, insert     │
//! │  StockRepository      inbound, lots, insert                            │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Queries are built at runtime with `QueryBuilder` because the date filter
//! and the identifier lists vary per call.

pub mod product;
pub mod purchase;
pub mod stock;

use sqlx::{QueryBuilder, Sqlite};
use synergy_core::DatePredicate;

/// Upper bound on identifiers bound into one `IN (...)` list.
///
/// SQLite caps host parameters per statement; longer lists are split.
pub(crate) const MAX_IDS_PER_QUERY: usize = 500;

/// Appends `<column> <predicate>` to a query.
///
/// ```text
/// On(d)           column = ?
/// Between(r)      column BETWEEN ? AND ?
/// AnyOf([r1,r2])  (column BETWEEN ? AND ? OR column BETWEEN ? AND ?)
/// AnyOf([])       0
/// Before(d)       column < ?
/// ```
pub(crate) fn push_date_filter(
    builder: &mut QueryBuilder<'_, Sqlite>,
    column: &str,
    predicate: &DatePredicate,
) {
    match predicate {
        DatePredicate::On(day) => {
            builder.push(column).push(" = ").push_bind(*day);
        }
        DatePredicate::Between(range) => {
            builder
                .push(column)
                .push(" BETWEEN ")
                .push_bind(range.start())
                .push(" AND ")
                .push_bind(range.end());
        }
        DatePredicate::AnyOf(ranges) if ranges.is_empty() => {
            builder.push("0");
        }
        DatePredicate::AnyOf(ranges) => {
            builder.push("(");
            for (n, range) in ranges.iter().enumerate() {
                if n > 0 {
                    builder.push(" OR ");
                }
                builder
                    .push(column)
                    .push(" BETWEEN ")
                    .push_bind(range.start())
                    .push(" AND ")
                    .push_bind(range.end());
            }
            builder.push(")");
        }
        DatePredicate::Before(day) => {
            builder.push(column).push(" < ").push_bind(*day);
        }
    }
}

/// Appends `<column> IN (?, ?, ...)`.
pub(crate) fn push_id_list(builder: &mut QueryBuilder<'_, Sqlite>, column: &str, ids: &[i64]) {
    builder.push(column).push(" IN (");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use synergy_core::DateRange;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn render(predicate: &DatePredicate) -> String {
        let mut builder = QueryBuilder::<Sqlite>::new("WHERE ");
        push_date_filter(&mut builder, "d", predicate);
        builder.sql().to_string()
    }

    #[test]
    fn test_date_filter_sql() {
        assert_eq!(render(&DatePredicate::On(day(2024, 1, 1))), "WHERE d = ?");
        assert_eq!(render(&DatePredicate::Before(day(2024, 1, 1))), "WHERE d < ?");

        let jan = DateRange::new(day(2024, 1, 1), day(2024, 1, 31)).unwrap();
        let mar = DateRange::new(day(2024, 3, 1), day(2024, 3, 31)).unwrap();
        assert_eq!(
            render(&DatePredicate::Between(jan)),
            "WHERE d BETWEEN ? AND ?"
        );
        assert_eq!(
            render(&DatePredicate::AnyOf(vec![jan, mar])),
            "WHERE (d BETWEEN ? AND ? OR d BETWEEN ? AND ?)"
        );
        assert_eq!(render(&DatePredicate::AnyOf(vec![])), "WHERE 0");
    }

    #[test]
    fn test_id_list_sql() {
        let mut builder = QueryBuilder::<Sqlite>::new("WHERE ");
        push_id_list(&mut builder, "id", &[1, 2, 3]);
        assert_eq!(builder.sql().to_string(), "WHERE id IN (?, ?, ?)");
    }
}
