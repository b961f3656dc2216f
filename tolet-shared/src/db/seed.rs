/// Sample data for a fresh store
///
/// Three featured listings without an owner, inserted only when the
/// listings table is empty so restarts never duplicate them.

use crate::models::listing::{CreateListing, Listing, PropertyType};
use sqlx::SqlitePool;
use tracing::info;

fn sample_listings() -> Vec<CreateListing> {
    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    vec![
        CreateListing {
            title: "Modern 3BHK Apartment in Gulshan".to_string(),
            description: Some("Spacious and well-furnished apartment with modern amenities".to_string()),
            location: "Gulshan 2, Dhaka".to_string(),
            area: "1200 sq ft".to_string(),
            price: 45000,
            bedrooms: Some(3),
            bathrooms: Some(2),
            property_type: PropertyType::Apartment,
            amenities: list(&["AC", "Parking", "Security", "Lift"]),
            images: list(&["https://images.pexels.com/photos/276724/pexels-photo-276724.jpeg"]),
            owner_id: None,
            featured: true,
        },
        CreateListing {
            title: "Spacious Family House in Dhanmondi".to_string(),
            description: Some("Perfect family home with garden and parking space".to_string()),
            location: "Dhanmondi 15, Dhaka".to_string(),
            area: "1800 sq ft".to_string(),
            price: 65000,
            bedrooms: Some(4),
            bathrooms: Some(3),
            property_type: PropertyType::House,
            amenities: list(&["Garden", "Parking", "Security"]),
            images: list(&["https://images.pexels.com/photos/1396122/pexels-photo-1396122.jpeg"]),
            owner_id: None,
            featured: true,
        },
        CreateListing {
            title: "Cozy 2BHK Flat in Uttara".to_string(),
            description: Some("Comfortable flat in a quiet neighborhood".to_string()),
            location: "Uttara Sector 7, Dhaka".to_string(),
            area: "950 sq ft".to_string(),
            price: 28000,
            bedrooms: Some(2),
            bathrooms: Some(2),
            property_type: PropertyType::Flat,
            amenities: list(&["AC", "Parking", "Security"]),
            images: list(&["https://images.pexels.com/photos/1457842/pexels-photo-1457842.jpeg"]),
            owner_id: None,
            featured: true,
        },
    ]
}

/// Inserts the sample listings into an empty store
///
/// Returns the number of listings inserted (0 when listings already exist).
pub async fn seed_sample_listings(pool: &SqlitePool) -> Result<usize, sqlx::Error> {
    if Listing::count(pool).await? > 0 {
        return Ok(0);
    }

    let samples = sample_listings();
    let inserted = samples.len();
    for listing in samples {
        Listing::create(pool, listing).await?;
    }

    info!(inserted, "Sample listings inserted");
    Ok(inserted)
}
