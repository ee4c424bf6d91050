//! Demo dataset for local development
//!
//! Four farms with three products each, plus an optional list of standalone
//! products. Everything goes through `Marketplace`, so seeded data obeys the
//! same validation and linkage rules as API traffic.

use serde::Serialize;

use crate::market::{Marketplace, Result};
use crate::models::{
    Farm, FarmFields, Pagination, PriceInput, ProductFields, ProductFilter, ProductWithFarm,
};

/// Name, type, location, email
const DEMO_FARMS: [(&str, &str, &str, &str); 4] = [
    (
        "Sunny Valley Organic Farm",
        "Mixed",
        "Napa Valley, CA",
        "info@sunnyvalley.com",
    ),
    (
        "Green Meadows Dairy",
        "Dairy",
        "Vermont Hills, VT",
        "contact@greenmeadows.com",
    ),
    (
        "Fresh Harvest Orchards",
        "Fruit",
        "Washington State, WA",
        "hello@freshharvest.com",
    ),
    (
        "Mountain View Vegetables",
        "Vegetable",
        "Colorado Springs, CO",
        "orders@mountainview.com",
    ),
];

/// Three products per demo farm, in `DEMO_FARMS` order
const DEMO_PRODUCTS: [[(&str, f64, &str); 3]; 4] = [
    [
        ("Organic Tomatoes", 4.99, "vegetable"),
        ("Fresh Strawberries", 6.99, "fruit"),
        ("Artisan Cheese", 12.99, "dairy"),
    ],
    [
        ("Whole Milk", 3.99, "dairy"),
        ("Greek Yogurt", 5.99, "dairy"),
        ("Butter", 4.49, "dairy"),
    ],
    [
        ("Honeycrisp Apples", 3.99, "fruit"),
        ("Organic Pears", 4.99, "fruit"),
        ("Fresh Peaches", 5.99, "fruit"),
    ],
    [
        ("Organic Carrots", 2.99, "vegetable"),
        ("Fresh Spinach", 3.99, "vegetable"),
        ("Bell Peppers", 4.99, "vegetable"),
    ],
];

const STANDALONE_PRODUCTS: [(&str, f64, &str); 9] = [
    ("Apple", 0.99, "fruit"),
    ("Broccoli", 1.29, "vegetable"),
    ("Yogurt", 2.49, "dairy"),
    ("Spinach", 0.89, "vegetable"),
    ("Coconut", 2.99, "fruit"),
    ("Kale", 1.49, "vegetable"),
    ("Milk", 3.49, "dairy"),
    ("Cheese", 4.99, "dairy"),
    ("Banana", 0.99, "fruit"),
];

/// What `seed` should do besides inserting the demo farms
#[derive(Debug, Clone, Copy, Default)]
pub struct SeedOptions {
    /// Remove previously seeded data first
    pub clear: bool,
    /// Also insert the standalone product list
    pub standalone: bool,
}

/// Summary of a seeding run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeedReport {
    pub farms_removed: u64,
    pub products_removed: u64,
    pub farms_created: u64,
    pub products_created: u64,
    pub standalone_created: u64,
}

fn farm_fields((name, kind, location, email): (&str, &str, &str, &str)) -> FarmFields {
    FarmFields {
        name: Some(name.into()),
        kind: Some(kind.into()),
        location: Some(location.into()),
        email: Some(email.into()),
    }
}

fn product_fields((name, price, category): (&str, f64, &str)) -> ProductFields {
    ProductFields {
        name: Some(name.into()),
        price: Some(PriceInput::Number(price)),
        category: Some(category.into()),
    }
}

fn is_seeded_farm(farm: &Farm) -> bool {
    DEMO_FARMS.iter().any(|(name, ..)| *name == farm.name)
}

fn is_seeded_product(listing: &ProductWithFarm) -> bool {
    let name = listing.product.name.as_str();
    DEMO_PRODUCTS
        .iter()
        .flatten()
        .chain(STANDALONE_PRODUCTS.iter())
        .any(|(seeded, ..)| *seeded == name)
}

async fn all_farms(market: &Marketplace) -> Result<Vec<Farm>> {
    let mut farms = Vec::new();
    let mut page = Pagination::everything();
    loop {
        let batch = market.farms(page).await?;
        let more = batch.has_next();
        farms.extend(batch.items);
        if !more {
            return Ok(farms);
        }
        page.page += 1;
    }
}

async fn all_products(market: &Marketplace) -> Result<Vec<ProductWithFarm>> {
    let filter = ProductFilter::default();
    let mut products = Vec::new();
    let mut page = Pagination::everything();
    loop {
        let batch = market.products(&filter, page).await?;
        let more = batch.has_next();
        products.extend(batch.items);
        if !more {
            return Ok(products);
        }
        page.page += 1;
    }
}

/// Remove demo farms (with their products) and any leftover seeded products.
pub async fn clear(market: &Marketplace) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    for farm in all_farms(market).await? {
        if is_seeded_farm(&farm) {
            report.products_removed += market.delete_farm_cascade(farm.id).await?;
            report.farms_removed += 1;
        }
    }

    for listing in all_products(market).await? {
        if is_seeded_product(&listing) {
            market.detach_and_delete_product(listing.product.id).await?;
            report.products_removed += 1;
        }
    }

    tracing::info!(
        farms = report.farms_removed,
        products = report.products_removed,
        "cleared seeded data"
    );
    Ok(report)
}

/// Load the demo dataset.
pub async fn run(market: &Marketplace, options: SeedOptions) -> Result<SeedReport> {
    let mut report = if options.clear {
        clear(market).await?
    } else {
        SeedReport::default()
    };

    for (farm, products) in DEMO_FARMS.into_iter().zip(DEMO_PRODUCTS) {
        let farm = market.create_farm(farm_fields(farm)).await?;
        report.farms_created += 1;

        for product in products {
            market.attach_product(farm.id, product_fields(product)).await?;
            report.products_created += 1;
        }
    }

    if options.standalone {
        for product in STANDALONE_PRODUCTS {
            market.create_standalone_product(product_fields(product)).await?;
            report.standalone_created += 1;
        }
    }

    tracing::info!(
        farms = report.farms_created,
        products = report.products_created,
        standalone = report.standalone_created,
        "seeded demo data"
    );
    Ok(report)
}
