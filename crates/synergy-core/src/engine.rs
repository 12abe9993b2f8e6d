//! # Analytics Engine
//!
//! Runs the aggregation passes against an [`AnalyticsStore`].
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  caller ──► validate input ──► resolve product ──► store reads         │
//! │                 │                     │                  │             │
//! │                 ▼                     ▼                  ▼             │
//! │           ValidationError      ProductNotFound     CoreError::Store    │
//! │                                                          │             │
//! │                                   pure pass (analytics::*) ◄──┘        │
//! │                                          │                             │
//! │                                          ▼                             │
//! │                                   result struct                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine holds no connection and no mutable state. Reads inside one
//! operation run one after another.

use std::collections::HashMap;
use std::time::Instant;

use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use crate::analytics::classification::{classify_lots, SalesVelocity, StockClassification, StockTotals};
use crate::analytics::comparison::{
    ComparisonMode, ComparisonParams, SalesComparison, SalesDifference, SideQuery,
};
use crate::analytics::cooccurrence::{CooccurrenceTally, RelatedProduct};
use crate::analytics::stock_history::{self, DailyFlows, StockHistory};
use crate::error::{CoreError, CoreResult};
use crate::period::{DatePredicate, DateRange};
use crate::settings::AnalyticsSettings;
use crate::store::AnalyticsStore;
use crate::types::{Product, ProductId, PurchaseId, SearchType};
use crate::validation::{date_range, parse_product_id, require_query};

/// Entry point for every analytics operation.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine<S> {
    store: S,
    settings: AnalyticsSettings,
}

impl<S: AnalyticsStore> AnalyticsEngine<S> {
    /// Creates an engine with default thresholds.
    pub fn new(store: S) -> Self {
        Self::with_settings(store, AnalyticsSettings::default())
    }

    pub fn with_settings(store: S, settings: AnalyticsSettings) -> Self {
        AnalyticsEngine { store, settings }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &AnalyticsSettings {
        &self.settings
    }

    // =========================================================================
    // Product Lookup
    // =========================================================================

    /// Finds one product by name fragment or identifier.
    ///
    /// Blank queries and non-numeric identifiers fail before any read.
    pub async fn find_product(&self, query: &str, search_type: SearchType) -> CoreResult<Product> {
        let query = require_query("query", query)?;
        debug!(query = %query, ?search_type, "find_product");

        let found = match search_type {
            SearchType::Id => {
                let id = parse_product_id("query", query)?;
                self.store.product_by_id(id).await.map_err(CoreError::store)?
            }
            SearchType::Name => self
                .store
                .product_by_name(query)
                .await
                .map_err(CoreError::store)?,
        };

        found.ok_or_else(|| CoreError::ProductNotFound(query.to_string()))
    }

    async fn require_product(&self, product_id: ProductId) -> CoreResult<Product> {
        self.store
            .product_by_id(product_id)
            .await
            .map_err(CoreError::store)?
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))
    }

    // =========================================================================
    // Co-occurrence
    // =========================================================================

    /// Products bought together with `target` in the given purchases.
    pub async fn rank_related(
        &self,
        target: ProductId,
        purchase_ids: &[PurchaseId],
    ) -> CoreResult<Vec<RelatedProduct>> {
        if purchase_ids.is_empty() {
            return Ok(Vec::new());
        }

        let items = self
            .store
            .line_items(purchase_ids, None)
            .await
            .map_err(CoreError::store)?;

        let tally = CooccurrenceTally::count(target, &items);
        debug!(
            target,
            baskets = purchase_ids.len(),
            qualifying = tally.qualifying_purchases(),
            "Co-occurrence tally"
        );
        if tally.is_empty() {
            return Ok(Vec::new());
        }

        let names: HashMap<ProductId, String> = self
            .store
            .products_by_ids(&tally.product_ids())
            .await
            .map_err(CoreError::store)?
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect();

        Ok(tally.rank(&names, self.settings.related_limit))
    }

    // =========================================================================
    // Comparison
    // =========================================================================

    /// Resolves flat request parameters, then compares.
    pub async fn compare_params(
        &self,
        product_id: ProductId,
        params: &ComparisonParams,
    ) -> CoreResult<SalesComparison> {
        let mode = params.resolve()?;
        self.compare(product_id, &mode).await
    }

    /// Compares the sales of `product_id` under `mode`.
    pub async fn compare(
        &self,
        product_id: ProductId,
        mode: &ComparisonMode,
    ) -> CoreResult<SalesComparison> {
        let start = Instant::now();
        debug!(product_id, mode = mode.name(), "compare");

        let product = self.require_product(product_id).await?;

        let side_a_sales = match mode.side_a(product_id) {
            Some(side) => self.count_sales(&side).await?,
            None => 0,
        };
        let side_b_sales = self.count_sales(&mode.side_b(product_id)).await?;

        let baskets = self
            .store
            .purchase_ids(&mode.basket_predicate())
            .await
            .map_err(CoreError::store)?;
        let related_products = self.rank_related(product_id, &baskets).await?;

        let difference = SalesDifference::between(side_a_sales, side_b_sales, mode.zero_baseline());

        info!(
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            product_id,
            side_a_sales,
            side_b_sales,
            related = related_products.len(),
            "compare complete"
        );

        Ok(SalesComparison {
            product_id,
            product_name: product.name,
            side_a_sales,
            side_b_sales,
            difference,
            related_products,
            show_comparison: mode.show_comparison(),
        })
    }

    /// Line items of one product across the purchases a predicate selects.
    async fn count_sales(&self, side: &SideQuery) -> CoreResult<u64> {
        let purchase_ids = self
            .store
            .purchase_ids(&side.predicate)
            .await
            .map_err(CoreError::store)?;
        if purchase_ids.is_empty() {
            return Ok(0);
        }

        let items = self
            .store
            .line_items(&purchase_ids, Some(side.product_id))
            .await
            .map_err(CoreError::store)?;
        Ok(items.len() as u64)
    }

    // =========================================================================
    // Stock History
    // =========================================================================

    /// Daily stock balance of a product over `start..=end`.
    pub async fn history(
        &self,
        product_id: ProductId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> CoreResult<StockHistory> {
        let range = date_range("history", start, end)?;
        let started = Instant::now();
        debug!(product_id, %start, %end, "history");

        let product = self.require_product(product_id).await?;

        let before = DatePredicate::Before(range.start());
        let inbound_before: i64 = self
            .store
            .inbound_movements(product_id, &before)
            .await
            .map_err(CoreError::store)?
            .iter()
            .map(|m| m.quantity)
            .sum();
        let sold_before = self
            .store
            .sale_dates(product_id, &before)
            .await
            .map_err(CoreError::store)?
            .len() as i64;
        let opening = stock_history::initial_stock(inbound_before, sold_before);

        let window = DatePredicate::Between(range);
        let mut flows = DailyFlows::new();
        for movement in self
            .store
            .inbound_movements(product_id, &window)
            .await
            .map_err(CoreError::store)?
        {
            flows.add_entry(movement.moved_on, movement.quantity);
        }
        for day in self
            .store
            .sale_dates(product_id, &window)
            .await
            .map_err(CoreError::store)?
        {
            flows.add_output(day, 1);
        }

        let history = stock_history::reconstruct(&product, range, opening, &flows);

        info!(
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            product_id,
            days = history.history.len(),
            initial_stock = opening,
            "history complete"
        );

        Ok(history)
    }

    // =========================================================================
    // Classification
    // =========================================================================

    /// Buckets the product's available lots as of today (local time).
    pub async fn classify(&self, product_id: ProductId) -> CoreResult<StockClassification> {
        self.classify_as_of(product_id, Local::now().date_naive()).await
    }

    /// Buckets the product's available lots as of `today`.
    pub async fn classify_as_of(
        &self,
        product_id: ProductId,
        today: NaiveDate,
    ) -> CoreResult<StockClassification> {
        debug!(product_id, %today, "classify");
        self.require_product(product_id).await?;

        let lots = self.store.lots(product_id).await.map_err(CoreError::store)?;
        let window = DateRange::trailing(today, self.settings.velocity_window_days);
        let sales = self
            .store
            .sale_dates(product_id, &DatePredicate::Between(window))
            .await
            .map_err(CoreError::store)?;
        let velocity = SalesVelocity::from_sale_dates(&sales);

        let result = classify_lots(
            product_id,
            &lots,
            &velocity,
            today,
            &self.settings.classification_rules(),
        );

        debug!(
            product_id,
            lots = lots.len(),
            units_sold = velocity.units_sold,
            selling_days = velocity.selling_days,
            total = result.total,
            "classify complete"
        );

        Ok(result)
    }

    /// Available units across lots and their value at the current price.
    pub async fn stock_totals(&self, product_id: ProductId) -> CoreResult<StockTotals> {
        let product = self.require_product(product_id).await?;
        let lots = self.store.lots(product_id).await.map_err(CoreError::store)?;

        let quantity: i64 = lots
            .iter()
            .filter(|lot| lot.is_available())
            .map(|lot| lot.current_quantity())
            .sum();

        Ok(StockTotals {
            product_id,
            quantity,
            value: product.price().multiply_quantity(quantity),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::memory::InMemoryStore;
    use crate::money::Money;

    const X: ProductId = 1;
    const Y: ProductId = 2;
    const Z: ProductId = 3;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn catalogue() -> InMemoryStore {
        InMemoryStore::new()
            .with_product(X, "Café Torrado 500g", 1890)
            .with_product(Y, "Açúcar Cristal 1kg", 459)
            .with_product(Z, "Filtro de Papel", 650)
    }

    fn two_day_store() -> InMemoryStore {
        catalogue()
            .with_purchase(day(2024, 1, 1), &[X, Y])
            .with_purchase(day(2024, 1, 2), &[X])
    }

    #[tokio::test]
    async fn test_exact_dates_end_to_end() {
        let engine = AnalyticsEngine::new(two_day_store());
        let params = ComparisonParams::compare(day(2024, 1, 1), day(2024, 1, 2));

        let result = engine.compare_params(X, &params).await.unwrap();

        assert_eq!(result.product_name, "Café Torrado 500g");
        assert_eq!(result.side_a_sales, 1);
        assert_eq!(result.side_b_sales, 1);
        assert_eq!(result.difference.absolute, 0);
        assert_eq!(result.difference.percentage, 0);
        assert!(result.difference.is_increase);
        assert!(result.show_comparison);

        // Y is in one of the two baskets holding X
        assert_eq!(result.related_products.len(), 1);
        let y = &result.related_products[0];
        assert_eq!(y.product_id, Y);
        assert_eq!(y.product_name, "Açúcar Cristal 1kg");
        assert_eq!(y.occurrences, 1);
        assert_eq!(y.percentage, 50);
    }

    #[tokio::test]
    async fn test_single_basket_related_at_hundred() {
        let engine = AnalyticsEngine::new(two_day_store());
        let ids = engine
            .store()
            .purchase_ids(&DatePredicate::On(day(2024, 1, 1)))
            .await
            .unwrap();

        let related = engine.rank_related(X, &ids).await.unwrap();
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].occurrences, 1);
        assert_eq!(related[0].percentage, 100);
    }

    #[tokio::test]
    async fn test_rank_related_empty_input() {
        let engine = AnalyticsEngine::new(two_day_store());
        assert!(engine.rank_related(X, &[]).await.unwrap().is_empty());
        assert!(engine.rank_related(404, &[1, 2]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_related_limit_from_settings() {
        let store = catalogue().with_purchase(day(2024, 1, 1), &[X, Y, Z]);
        let settings = AnalyticsSettings {
            related_limit: 1,
            ..Default::default()
        };
        let engine = AnalyticsEngine::with_settings(store, settings);

        let related = engine.rank_related(X, &[1]).await.unwrap();
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].product_id, Y);
    }

    #[tokio::test]
    async fn test_compare_unknown_product_short_circuits() {
        let engine = AnalyticsEngine::new(two_day_store());
        let mode = ComparisonMode::ExactDates {
            first: day(2024, 1, 1),
            second: day(2024, 1, 2),
        };
        let err = engine.compare(404, &mode).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_range_total_hides_comparison() {
        let engine = AnalyticsEngine::new(two_day_store());
        let params = ComparisonParams::until(day(2024, 1, 1), day(2024, 1, 31));

        let result = engine.compare_params(X, &params).await.unwrap();
        assert_eq!(result.side_a_sales, 0);
        assert_eq!(result.side_b_sales, 2);
        assert_eq!(result.difference.absolute, 2);
        assert_eq!(result.difference.percentage, 0);
        assert!(result.difference.is_increase);
        assert!(!result.show_comparison);
    }

    #[tokio::test]
    async fn test_zero_baseline_product_reports_hundred() {
        let mut store = catalogue();
        for n in 0..5 {
            store = store.with_purchase(day(2024, 3, 1 + n), &[X]);
        }
        let engine = AnalyticsEngine::new(store);
        let params = ComparisonParams {
            is_second_product: true,
            first_product_id: Some(Z),
            ..ComparisonParams::until(day(2024, 3, 1), day(2024, 3, 31))
        };

        let result = engine.compare_params(X, &params).await.unwrap();
        assert_eq!(result.side_a_sales, 0);
        assert_eq!(result.side_b_sales, 5);
        assert_eq!(result.difference.percentage, 100);
        assert!(result.difference.is_increase);

        // Same counts through product vs product keep the 0 rule
        let versus = ComparisonParams {
            comparison_product_id: Some(Z),
            ..ComparisonParams::until(day(2024, 3, 1), day(2024, 3, 31))
        };
        let result = engine.compare_params(X, &versus).await.unwrap();
        assert_eq!(result.difference.percentage, 0);
    }

    #[tokio::test]
    async fn test_period_vs_period() {
        let store = catalogue()
            .with_purchase(day(2024, 1, 5), &[X, Y])
            .with_purchase(day(2024, 1, 9), &[X, X])
            .with_purchase(day(2024, 2, 3), &[X])
            .with_purchase(day(2024, 2, 20), &[Y]);
        let engine = AnalyticsEngine::new(store);
        let params = ComparisonParams {
            compare_periods: true,
            second_start_date: Some(day(2024, 2, 1)),
            second_end_date: Some(day(2024, 2, 29)),
            ..ComparisonParams::compare(day(2024, 1, 1), day(2024, 1, 31))
        };

        let result = engine.compare_params(X, &params).await.unwrap();
        assert_eq!(result.side_a_sales, 3);
        assert_eq!(result.side_b_sales, 1);
        assert_eq!(result.difference.absolute, 2);
        assert_eq!(result.difference.percentage, 67);
        assert!(!result.difference.is_increase);
        // 3 baskets hold X; Y shares one of them
        assert_eq!(result.related_products[0].percentage, 33);
    }

    #[tokio::test]
    async fn test_find_product() {
        let engine = AnalyticsEngine::new(catalogue());

        let found = engine.find_product("AÇÚCAR", SearchType::Name).await;
        // Unicode case folding: lowercase of "AÇÚCAR" is "açúcar"
        assert_eq!(found.unwrap().id, Y);

        let by_id = engine.find_product("3", SearchType::Id).await.unwrap();
        assert_eq!(by_id.name, "Filtro de Papel");

        let err = engine.find_product("abc", SearchType::Id).await.unwrap_err();
        assert!(err.is_invalid_input());

        let err = engine.find_product("pão", SearchType::Name).await.unwrap_err();
        assert!(err.is_not_found());

        let err = engine.find_product("  ", SearchType::Name).await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::Required { .. })
        ));
    }

    #[tokio::test]
    async fn test_history_walks_every_day() {
        let store = catalogue()
            .with_inbound(X, 10, day(2023, 12, 20), Some("L1"), None)
            .with_purchase(day(2023, 12, 28), &[X, X, X])
            .with_inbound(X, 6, day(2024, 1, 2), Some("L2"), None)
            .with_purchase(day(2024, 1, 4), &[X])
            .with_adjustment(X, 2, day(2024, 1, 3));
        let engine = AnalyticsEngine::new(store);

        let history = engine
            .history(X, day(2024, 1, 1), day(2024, 1, 5))
            .await
            .unwrap();

        assert_eq!(history.initial_stock, 7);
        assert_eq!(history.sku, "1");
        let quantities: Vec<_> = history.history.iter().map(|p| p.quantity).collect();
        assert_eq!(quantities, vec![7, 13, 13, 12, 12]);
        assert_eq!(history.history[1].entries, 6);
        assert_eq!(history.history[3].outputs, 1);
        assert_eq!(history.history[4].value, Money::from_cents(12 * 1890));
    }

    #[tokio::test]
    async fn test_history_initial_stock_floored() {
        let store = catalogue().with_purchase(day(2023, 6, 1), &[Y, Y]);
        let engine = AnalyticsEngine::new(store);

        let history = engine
            .history(Y, day(2024, 1, 1), day(2024, 1, 1))
            .await
            .unwrap();
        assert_eq!(history.initial_stock, 0);
        assert_eq!(history.history.len(), 1);
    }

    #[tokio::test]
    async fn test_history_errors() {
        let engine = AnalyticsEngine::new(catalogue());

        let err = engine
            .history(404, day(2024, 1, 1), day(2024, 1, 2))
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let err = engine
            .history(X, day(2024, 1, 2), day(2024, 1, 1))
            .await
            .unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[tokio::test]
    async fn test_classify_lots() {
        let today = day(2024, 6, 1);
        let far = Some(day(2026, 1, 1));
        let mut store = catalogue()
            .with_inbound(X, 5, day(2024, 1, 1), Some("EMPTY"), Some(day(2023, 1, 1)))
            .with_inbound(X, 8, day(2024, 1, 1), Some("OLD"), Some(day(2024, 5, 1)))
            .with_inbound(X, 200, day(2024, 1, 1), Some("BULK"), far);
        // Empty out the first lot; purchases are numbered from 1
        for purchase_id in 1..=5 {
            store = store
                .with_purchase(day(2024, 2, 1), &[])
                .with_line_item(purchase_id, X, Some("EMPTY"));
        }
        let engine = AnalyticsEngine::new(store);

        let result = engine.classify_as_of(X, today).await.unwrap();
        assert_eq!(result.expired, 8);
        // 200 units at 5 per selling day = 40 days
        assert_eq!(result.stock_over, 200);
        assert_eq!(result.critical_age, 0);
        assert_eq!(result.ok, 0);
        assert_eq!(result.total, 208);

        let totals = engine.stock_totals(X).await.unwrap();
        assert_eq!(totals.quantity, 208);
        assert_eq!(totals.value, Money::from_cents(208 * 1890));
    }

    #[tokio::test]
    async fn test_classify_with_extreme_windows() {
        let store =
            catalogue().with_inbound(X, 10, day(2024, 1, 1), Some("A"), Some(day(2030, 1, 1)));
        let settings = AnalyticsSettings {
            velocity_window_days: u32::MAX,
            expiry_warning_days: i64::MAX,
            ..AnalyticsSettings::default()
        };
        assert!(settings.validate().is_err());

        // unvalidated settings still classify instead of overflowing
        let engine = AnalyticsEngine::with_settings(store, settings);
        let result = engine.classify_as_of(X, day(2024, 6, 1)).await.unwrap();
        assert_eq!(result.critical_age, 10);
        assert_eq!(result.total, 10);
    }

    #[tokio::test]
    async fn test_classify_unknown_product() {
        let engine = AnalyticsEngine::new(catalogue());
        let err = engine.classify(404).await.unwrap_err();
        assert!(err.is_not_found());

        let err = engine.stock_totals(404).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
