//! # Seed Data Generator
//!
//! Populates the database with a small grocery catalogue, a stream of
//! purchases and stocked lots, so every analytics command has data to chew on.
//!
//! ## Usage
//! ```bash
//! # 90 days of purchases ending today (default)
//! cargo run -p synergy-db --bin seed
//!
//! # Longer history
//! cargo run -p synergy-db --bin seed -- --days 365
//!
//! # Specify database path
//! cargo run -p synergy-db --bin seed -- --db ./data/synergy.db
//! ```
//!
//! ## Generated Data
//! - One product per catalogue entry, identifiers 1..=N
//! - Each day: a handful of purchases mixing an anchor product with its
//!   usual companions (bread with butter, coffee with sugar, ...)
//! - Per product: a lot received at the start, another halfway through,
//!   and one that is already past its expiry date
//!
//! The generator is deterministic: the same `--days` gives the same rows.

use chrono::{Duration, Local, NaiveDate};
use std::env;
use synergy_core::Product;
use synergy_db::{Database, DbConfig, NewLineItem, NewMovement};

/// (name, price in cents)
const CATALOGUE: &[(&str, i64)] = &[
    ("Pão de Forma 500g", 799),
    ("Manteiga com Sal 200g", 1250),
    ("Café Torrado 500g", 1890),
    ("Açúcar Cristal 1kg", 459),
    ("Leite Integral 1L", 549),
    ("Achocolatado 400g", 899),
    ("Arroz Tipo 1 5kg", 2590),
    ("Feijão Carioca 1kg", 849),
    ("Macarrão Espaguete 500g", 479),
    ("Molho de Tomate 340g", 329),
    ("Queijo Muçarela 500g", 2490),
    ("Presunto Fatiado 200g", 1190),
];

/// Upper bound for `--days` (ten years of purchases).
const MAX_DAYS: i64 = 3_650;

/// Anchor product and the products usually bought with it.
const BASKETS: &[(i64, &[i64])] = &[
    (1, &[2, 5, 11, 12]),
    (3, &[4, 5]),
    (5, &[6, 1]),
    (7, &[8, 4]),
    (9, &[10, 11]),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut days: i64 = 90;
    let mut db_path = String::from("./synergy_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--days" | "-n" => {
                if i + 1 < args.len() {
                    days = parse_days(&args[i + 1])?;
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Sales Synergy Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -n, --days <N>     Days of purchase history, 1..=3650 (default: 90)");
                println!("  -d, --db <PATH>    Database file path (default: ./synergy_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }
    println!("Sales Synergy Seed Data Generator");
    println!("=================================");
    println!("Database: {}", db_path);
    println!("Days:     {}", days);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = std::time::Instant::now();
    let today = Local::now().date_naive();
    let first_day = today - Duration::days(days - 1);

    seed_products(&db).await?;
    println!("✓ {} products", CATALOGUE.len());

    let lots = seed_lots(&db, first_day, today, days).await?;
    println!("✓ {} stock lots", lots);

    let purchases = seed_purchases(&db, first_day, days).await?;
    println!("✓ {} purchases", purchases);

    println!();
    println!("Done in {:.2?}", start.elapsed());

    Ok(())
}

async fn seed_products(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    for (index, (name, price_cents)) in CATALOGUE.iter().enumerate() {
        let product = Product {
            id: index as i64 + 1,
            name: (*name).to_string(),
            price_cents: *price_cents,
        };
        db.products().insert(&product).await?;
    }
    Ok(())
}

/// Three lots per product: opening stock, a mid-period restock and an
/// expired batch nobody sold.
async fn seed_lots(
    db: &Database,
    first_day: NaiveDate,
    today: NaiveDate,
    days: i64,
) -> Result<usize, Box<dyn std::error::Error>> {
    let midpoint = first_day + Duration::days(days / 2);
    let mut count = 0;

    for product_id in 1..=CATALOGUE.len() as i64 {
        let movements = [
            NewMovement::inbound(
                product_id,
                days * 3,
                first_day,
                lot_ref(product_id, "A"),
                Some(today + Duration::days(30 + product_id * 10)),
            ),
            NewMovement::inbound(
                product_id,
                days * 2,
                midpoint,
                lot_ref(product_id, "B"),
                Some(today + Duration::days(365)),
            ),
            NewMovement::inbound(
                product_id,
                5 + product_id,
                first_day,
                lot_ref(product_id, "X"),
                Some(today - Duration::days(1)),
            ),
        ];
        for movement in &movements {
            db.stock().insert(movement).await?;
            count += 1;
        }
    }

    Ok(count)
}

/// Deterministic baskets: the day index picks the anchor, the purchase
/// index picks how many companions join it.
async fn seed_purchases(
    db: &Database,
    first_day: NaiveDate,
    days: i64,
) -> Result<usize, Box<dyn std::error::Error>> {
    let mut count = 0;

    for offset in 0..days {
        let day = first_day + Duration::days(offset);
        let per_day = 2 + (offset % 4) as usize;

        for n in 0..per_day {
            let (anchor, companions) = BASKETS[(offset as usize + n) % BASKETS.len()];
            let take = (offset as usize + n * 3) % (companions.len() + 1);

            let mut products = vec![anchor];
            products.extend_from_slice(&companions[..take]);

            let items: Vec<NewLineItem> = products
                .into_iter()
                .map(|product_id| {
                    let price = CATALOGUE[(product_id - 1) as usize].1;
                    NewLineItem::new(product_id, price).from_lot(lot_ref(product_id, "A"))
                })
                .collect();

            let customer_ref = format!("{:011}", 10_000_000_000u64 + (offset as u64 * 7 + n as u64) % 97);
            db.purchases().insert(day, &customer_ref, &items).await?;
            count += 1;

            if count % 100 == 0 {
                println!("  Generated {} purchases...", count);
            }
        }
    }

    Ok(count)
}

fn lot_ref(product_id: i64, batch: &str) -> String {
    format!("P{:03}-{}", product_id, batch)
}

/// Parses `--days`, clamped to `1..=MAX_DAYS`.
fn parse_days(raw: &str) -> Result<i64, String> {
    let days: i64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("--days expects a whole number, got '{}'", raw))?;
    Ok(days.clamp(1, MAX_DAYS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_days() {
        assert_eq!(parse_days("30").unwrap(), 30);
        assert_eq!(parse_days("0").unwrap(), 1);
        assert_eq!(parse_days("-5").unwrap(), 1);
        assert_eq!(parse_days("9223372036854775807").unwrap(), MAX_DAYS);
        assert!(parse_days("ninety").is_err());
    }

    #[test]
    fn test_lot_ref() {
        assert_eq!(lot_ref(7, "A"), "P007-A");
    }
}
