//! Seed the database with sample catalog data for local development.

use rust_decimal::Decimal;

use bazaar_core::CategoryId;
use bazaar_server::db::catalog::{CategoryRepository, ProductRepository};
use bazaar_server::models::catalog::ProductInput;

use super::CommandError;

struct SeedProduct {
    name: &'static str,
    price: Decimal,
    stock: i32,
    brand: Option<&'static str>,
    size: Option<&'static str>,
    color: Option<&'static str>,
    short_description: &'static str,
    long_description: &'static str,
    category: &'static str,
}

fn sample_products() -> Vec<SeedProduct> {
    vec![
        SeedProduct {
            name: "Linen Shirt",
            price: Decimal::new(4999, 2),
            stock: 40,
            brand: Some("Seabreeze"),
            size: Some("M"),
            color: Some("white"),
            short_description: "Breathable linen shirt",
            long_description: "A relaxed-fit shirt in washed European linen.",
            category: "Clothing",
        },
        SeedProduct {
            name: "Trail Running Shoes",
            price: Decimal::new(12900, 2),
            stock: 25,
            brand: Some("Ridgeline"),
            size: Some("42"),
            color: Some("grey"),
            short_description: "Grippy trail runners",
            long_description: "Lightweight trail shoes with a rock plate and lugged outsole.",
            category: "Footwear",
        },
        SeedProduct {
            name: "Canvas Tote",
            price: Decimal::new(2450, 2),
            stock: 120,
            brand: Some("Seabreeze"),
            size: None,
            color: Some("natural"),
            short_description: "Everyday canvas tote",
            long_description: "Heavy 12oz cotton canvas tote with internal pocket.",
            category: "Accessories",
        },
        SeedProduct {
            name: "Wool Beanie",
            price: Decimal::new(1899, 2),
            stock: 80,
            brand: Some("Ridgeline"),
            size: None,
            color: Some("navy"),
            short_description: "Merino wool beanie",
            long_description: "Fine-gauge merino beanie, warm without the itch.",
            category: "Accessories",
        },
    ]
}

/// Insert sample categories and products.
///
/// Safe to re-run against an empty database; re-running against seeded data
/// fails on the category name unique constraint.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or an insert fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;
    let categories = CategoryRepository::new(&pool);
    let products = ProductRepository::new(&pool);

    let mut category_ids: Vec<(&str, CategoryId)> = Vec::new();
    for name in ["Clothing", "Footwear", "Accessories"] {
        let category = categories.create(name, None, true).await?;
        tracing::info!(name, id = %category.id, "category created");
        category_ids.push((name, category.id));
    }

    for seed in sample_products() {
        let category_id = category_ids
            .iter()
            .find(|(name, _)| *name == seed.category)
            .map(|(_, id)| *id);

        let product = products
            .create(&ProductInput {
                name: seed.name.to_owned(),
                price: seed.price,
                stock: seed.stock,
                discount: Decimal::ZERO,
                brand: seed.brand.map(str::to_owned),
                size: seed.size.map(str::to_owned),
                color: seed.color.map(str::to_owned),
                is_active: true,
                short_description: seed.short_description.to_owned(),
                long_description: seed.long_description.to_owned(),
                category_id,
            })
            .await?;

        tracing::info!(name = seed.name, id = %product.id, "product created");
    }

    tracing::info!("Seed complete");
    Ok(())
}
