//! Catalog seeding through the admin API.
//!
//! Logs in with the given admin credentials, creates the sample categories
//! when they do not exist yet, and spreads `count` generated products
//! across them. Runs are additive; existing catalog rows are left alone.

use rand::Rng;
use tracing::{info, warn};

use velvet_loom_admin::backend::{
    AdminBackendClient, CategoryForm, ImageUpload, ProductForm,
};
use velvet_loom_admin::config::BackendApiConfig;
use velvet_loom_core::Category;

/// Sample categories, in (name, slug) pairs.
const CATEGORIES: &[(&str, &str)] = &[
    ("Men T-Shirts", "men_t_shirts"),
    ("Men Jeans", "men_jeans"),
    ("Men Shirts", "men_shirts"),
    ("Women Trousers", "women_trousers"),
    ("Women Shoes", "women_shoes"),
];

/// Adjectives used to vary generated product names.
const ADJECTIVES: &[&str] = &[
    "Classic", "Relaxed", "Slim Fit", "Vintage", "Everyday", "Premium", "Soft Cotton", "Linen",
];

/// Smallest valid 1x1 transparent PNG, used as the placeholder image for
/// generated products.
const PLACEHOLDER_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// Seed the catalog.
///
/// # Errors
///
/// Returns an error if login fails, the account is not an admin, or any
/// create call is rejected by the backend.
pub async fn run(
    base_url: &str,
    email: &str,
    password: &str,
    count: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let mut base_url = base_url.to_owned();
    while base_url.ends_with('/') {
        base_url.pop();
    }
    let client = AdminBackendClient::new(&BackendApiConfig { base_url });

    info!("Logging in as {email}");
    let token = client.login(email, password).await?;
    if !token.user.is_admin() {
        return Err("the given account does not have admin access".into());
    }
    let token = token.access_token;

    let categories = ensure_categories(&client, &token).await?;
    if categories.is_empty() {
        return Err("no categories available to attach products to".into());
    }

    info!("Creating {count} products across {} categories", categories.len());
    let mut rng = rand::rng();
    for i in 0..count {
        let category = &categories[i % categories.len()];
        let adjective = ADJECTIVES[rng.random_range(0..ADJECTIVES.len())];
        let name = format!("{adjective} {} {}", category.name, i + 1);
        let price = format!("{:.2}", rng.random_range(500.0..5000.0_f64));
        let stock = rng.random_range(5..=50_i32);

        let form = ProductForm {
            name: name.clone(),
            price,
            stock: stock.to_string(),
            description: Some(format!(
                "A high-quality '{name}' from our latest collection."
            )),
            category_id: category.id.to_string(),
        };
        let image = ImageUpload {
            file_name: format!("{}_{}.png", category.slug, i + 1),
            content_type: "image/png".to_owned(),
            bytes: PLACEHOLDER_PNG.to_vec(),
        };

        client.create_product(&form, image, &token).await?;
        info!("Created product '{name}'");
    }

    info!("Seeding complete");
    Ok(())
}

/// Create the sample categories that are missing, returning the full set.
async fn ensure_categories(
    client: &AdminBackendClient,
    token: &str,
) -> Result<Vec<Category>, Box<dyn std::error::Error>> {
    let existing = client.list_categories(token).await?;

    for (name, slug) in CATEGORIES {
        if existing.iter().any(|c| c.slug == *slug) {
            warn!("Category '{slug}' already exists, skipping");
            continue;
        }
        let created = client
            .create_category(
                &CategoryForm {
                    name: (*name).to_owned(),
                    slug: (*slug).to_owned(),
                },
                token,
            )
            .await?;
        info!("Created category '{}'", created.slug);
    }

    Ok(client.list_categories(token).await?)
}
