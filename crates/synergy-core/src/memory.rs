//! In-memory [`AnalyticsStore`] backed by plain vectors.
//!
//! Used by engine tests and the CLI demo. Rows are added with the builder
//! methods; identifiers for purchases, line items and movements are assigned
//! in insertion order.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::convert::Infallible;

use chrono::NaiveDate;

use crate::period::DatePredicate;
use crate::store::AnalyticsStore;
use crate::types::{
    Lot, MovementKind, Product, ProductId, Purchase, PurchaseId, PurchaseLineItem, StockMovement,
};

/// Vector-backed store. Never fails.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    products: Vec<Product>,
    purchases: Vec<Purchase>,
    line_items: Vec<PurchaseLineItem>,
    movements: Vec<StockMovement>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_product(mut self, id: ProductId, name: &str, price_cents: i64) -> Self {
        self.products.push(Product {
            id,
            name: name.to_string(),
            price_cents,
        });
        self
    }

    /// Adds a purchase with one line item per entry of `products`.
    pub fn with_purchase(mut self, purchased_on: NaiveDate, products: &[ProductId]) -> Self {
        let purchase_id = self.purchases.len() as PurchaseId + 1;
        self.purchases.push(Purchase {
            id: purchase_id,
            purchased_on,
            customer_ref: format!("customer-{}", purchase_id),
        });
        for &product_id in products {
            self = self.with_line_item(purchase_id, product_id, None);
        }
        self
    }

    /// Adds one unit to an existing purchase, optionally taken from a lot.
    pub fn with_line_item(
        mut self,
        purchase_id: PurchaseId,
        product_id: ProductId,
        lot_ref: Option<&str>,
    ) -> Self {
        let price = self
            .products
            .iter()
            .find(|p| p.id == product_id)
            .map(|p| p.price_cents)
            .unwrap_or(0);
        self.line_items.push(PurchaseLineItem {
            id: self.line_items.len() as i64 + 1,
            purchase_id,
            product_id,
            unit_value_cents: price,
            flyer: None,
            lot_ref: lot_ref.map(str::to_string),
        });
        self
    }

    /// Records received stock.
    pub fn with_inbound(
        mut self,
        product_id: ProductId,
        quantity: i64,
        moved_on: NaiveDate,
        lot_ref: Option<&str>,
        expires_on: Option<NaiveDate>,
    ) -> Self {
        self.push_movement(
            product_id,
            MovementKind::Inbound,
            quantity,
            moved_on,
            lot_ref,
            expires_on,
        );
        self
    }

    /// Records a manual outbound correction.
    pub fn with_adjustment(mut self, product_id: ProductId, quantity: i64, moved_on: NaiveDate) -> Self {
        self.push_movement(
            product_id,
            MovementKind::OutboundAdjustment,
            quantity,
            moved_on,
            None,
            None,
        );
        self
    }

    fn push_movement(
        &mut self,
        product_id: ProductId,
        kind: MovementKind,
        quantity: i64,
        moved_on: NaiveDate,
        lot_ref: Option<&str>,
        expires_on: Option<NaiveDate>,
    ) {
        self.movements.push(StockMovement {
            id: self.movements.len() as i64 + 1,
            product_id,
            kind,
            quantity,
            moved_on,
            lot_ref: lot_ref.map(str::to_string),
            expires_on,
        });
    }

    fn purchase_dates(&self) -> HashMap<PurchaseId, NaiveDate> {
        self.purchases
            .iter()
            .map(|p| (p.id, p.purchased_on))
            .collect()
    }
}

impl AnalyticsStore for InMemoryStore {
    type Error = Infallible;

    async fn product_by_id(&self, id: ProductId) -> Result<Option<Product>, Self::Error> {
        Ok(self.products.iter().find(|p| p.id == id).cloned())
    }

    async fn product_by_name(&self, fragment: &str) -> Result<Option<Product>, Self::Error> {
        let needle = fragment.to_lowercase();
        Ok(self
            .products
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .min_by_key(|p| p.id)
            .cloned())
    }

    async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, Self::Error> {
        let wanted: HashSet<ProductId> = ids.iter().copied().collect();
        Ok(self
            .products
            .iter()
            .filter(|p| wanted.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn purchase_ids(&self, predicate: &DatePredicate) -> Result<Vec<PurchaseId>, Self::Error> {
        Ok(self
            .purchases
            .iter()
            .filter(|p| predicate.matches(p.purchased_on))
            .map(|p| p.id)
            .collect())
    }

    async fn line_items(
        &self,
        purchase_ids: &[PurchaseId],
        product_id: Option<ProductId>,
    ) -> Result<Vec<PurchaseLineItem>, Self::Error> {
        let wanted: HashSet<PurchaseId> = purchase_ids.iter().copied().collect();
        Ok(self
            .line_items
            .iter()
            .filter(|item| wanted.contains(&item.purchase_id))
            .filter(|item| product_id.map_or(true, |id| item.product_id == id))
            .cloned()
            .collect())
    }

    async fn inbound_movements(
        &self,
        product_id: ProductId,
        predicate: &DatePredicate,
    ) -> Result<Vec<StockMovement>, Self::Error> {
        Ok(self
            .movements
            .iter()
            .filter(|m| m.product_id == product_id && m.kind == MovementKind::Inbound)
            .filter(|m| predicate.matches(m.moved_on))
            .cloned()
            .collect())
    }

    async fn sale_dates(
        &self,
        product_id: ProductId,
        predicate: &DatePredicate,
    ) -> Result<Vec<NaiveDate>, Self::Error> {
        let dates = self.purchase_dates();
        Ok(self
            .line_items
            .iter()
            .filter(|item| item.product_id == product_id)
            .filter_map(|item| dates.get(&item.purchase_id).copied())
            .filter(|day| predicate.matches(*day))
            .collect())
    }

    async fn lots(&self, product_id: ProductId) -> Result<Vec<Lot>, Self::Error> {
        let mut lots: BTreeMap<&str, Lot> = BTreeMap::new();

        for movement in &self.movements {
            if movement.product_id != product_id || movement.kind != MovementKind::Inbound {
                continue;
            }
            let Some(lot_ref) = movement.lot_ref.as_deref() else {
                continue;
            };
            let lot = lots.entry(lot_ref).or_insert_with(|| Lot {
                product_id,
                lot_ref: lot_ref.to_string(),
                received_quantity: 0,
                sold_quantity: 0,
                expires_on: None,
            });
            lot.received_quantity += movement.quantity;
            lot.expires_on = match (lot.expires_on, movement.expires_on) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            };
        }

        for item in &self.line_items {
            if item.product_id != product_id {
                continue;
            }
            if let Some(lot) = item.lot_ref.as_deref().and_then(|r| lots.get_mut(r)) {
                lot.sold_quantity += 1;
            }
        }

        Ok(lots.into_values().collect())
    }
}
