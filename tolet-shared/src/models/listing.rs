/// Listing model, search filters and database operations
///
/// Listings are rental property records. They are created by the sample
/// data seeder or by an authenticated owner, and are never updated or
/// deleted through this crate.
///
/// Amenities and image references are ordered string sequences in the
/// model; the comma-delimited text form exists only inside the store and is
/// produced and consumed by [`encode_list`] / [`decode_list`].
///
/// # Schema
///
/// ```sql
/// CREATE TABLE listings (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     title TEXT NOT NULL,
///     description TEXT,
///     location TEXT NOT NULL,
///     area TEXT NOT NULL,
///     price INTEGER NOT NULL,
///     bedrooms INTEGER,
///     bathrooms INTEGER,
///     property_type TEXT NOT NULL,
///     amenities TEXT,
///     images TEXT,
///     owner_id INTEGER REFERENCES accounts (id),
///     status TEXT NOT NULL DEFAULT 'available',
///     featured BOOLEAN NOT NULL DEFAULT 0,
///     created_at DATETIME NOT NULL
/// );
/// ```
///
/// # Ordering
///
/// Search results are ordered featured first, then newest first. Rows
/// created within the same millisecond fall back to insertion order
/// (highest id first).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

/// Number of listings returned by the featured endpoint
pub const FEATURED_LIMIT: i64 = 6;

/// Separator used for multi-valued columns in the store
const LIST_DELIMITER: char = ',';

const LISTING_COLUMNS: &str = "id, title, description, location, area, price, bedrooms, bathrooms, \
     property_type, amenities, images, owner_id, status, featured, created_at";

/// Kind of property being let
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
pub enum PropertyType {
    Apartment,
    House,
    Flat,
    Studio,
    Commercial,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Apartment => "Apartment",
            PropertyType::House => "House",
            PropertyType::Flat => "Flat",
            PropertyType::Studio => "Studio",
            PropertyType::Commercial => "Commercial",
        }
    }
}

impl std::str::FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Apartment" => Ok(PropertyType::Apartment),
            "House" => Ok(PropertyType::House),
            "Flat" => Ok(PropertyType::Flat),
            "Studio" => Ok(PropertyType::Studio),
            "Commercial" => Ok(PropertyType::Commercial),
            other => Err(format!("Unknown property type: {}", other)),
        }
    }
}

/// Availability of a listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    /// Open for inquiries and returned by search
    #[default]
    Available,

    /// Let out; hidden from search and featured results
    Rented,
}

/// A rental listing as exposed by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub location: String,
    pub area: String,

    /// Monthly rent in whole currency units
    pub price: i64,
    pub bedrooms: Option<i64>,
    pub bathrooms: Option<i64>,
    pub property_type: PropertyType,
    pub amenities: Vec<String>,

    /// Relative paths or URLs, in upload order
    pub images: Vec<String>,

    /// None for seeded listings
    pub owner_id: Option<i64>,
    pub status: ListingStatus,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

/// Row shape of the `listings` table
#[derive(Debug, sqlx::FromRow)]
struct ListingRow {
    id: i64,
    title: String,
    description: Option<String>,
    location: String,
    area: String,
    price: i64,
    bedrooms: Option<i64>,
    bathrooms: Option<i64>,
    property_type: PropertyType,
    amenities: Option<String>,
    images: Option<String>,
    owner_id: Option<i64>,
    status: ListingStatus,
    featured: bool,
    created_at: DateTime<Utc>,
}

impl From<ListingRow> for Listing {
    fn from(row: ListingRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            location: row.location,
            area: row.area,
            price: row.price,
            bedrooms: row.bedrooms,
            bathrooms: row.bathrooms,
            property_type: row.property_type,
            amenities: decode_list(row.amenities.as_deref()),
            images: decode_list(row.images.as_deref()),
            owner_id: row.owner_id,
            status: row.status,
            featured: row.featured,
            created_at: row.created_at,
        }
    }
}

/// Input for creating a new listing
#[derive(Debug, Clone)]
pub struct CreateListing {
    pub title: String,
    pub description: Option<String>,
    pub location: String,
    pub area: String,
    pub price: i64,
    pub bedrooms: Option<i64>,
    pub bathrooms: Option<i64>,
    pub property_type: PropertyType,
    pub amenities: Vec<String>,
    pub images: Vec<String>,
    pub owner_id: Option<i64>,
    pub featured: bool,
}

/// Search criteria; every `None` field imposes no constraint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFilter {
    /// Substring of the location, matched case-insensitively
    pub location: Option<String>,
    pub property_type: Option<PropertyType>,

    /// Inclusive lower bound on price
    pub min_price: Option<i64>,

    /// Inclusive upper bound on price
    pub max_price: Option<i64>,

    /// Exact bedroom count
    pub bedrooms: Option<i64>,
}

impl ListingFilter {
    /// Returns true when the listing satisfies every supplied predicate
    /// (availability is checked separately)
    pub fn matches(&self, listing: &Listing) -> bool {
        let location_ok = self.location.as_ref().map_or(true, |needle| {
            listing
                .location
                .to_ascii_lowercase()
                .contains(&needle.to_ascii_lowercase())
        });

        location_ok
            && self.property_type.map_or(true, |t| listing.property_type == t)
            && self.min_price.map_or(true, |min| listing.price >= min)
            && self.max_price.map_or(true, |max| listing.price <= max)
            && self.bedrooms.map_or(true, |b| listing.bedrooms == Some(b))
    }

    fn push_predicates<'a>(&'a self, qb: &mut QueryBuilder<'a, Sqlite>) {
        if let Some(location) = &self.location {
            qb.push(" AND location LIKE ")
                .push_bind(format!("%{}%", escape_like(location)))
                .push(" ESCAPE '\\'");
        }

        if let Some(property_type) = self.property_type {
            qb.push(" AND property_type = ").push_bind(property_type);
        }

        if let Some(min_price) = self.min_price {
            qb.push(" AND price >= ").push_bind(min_price);
        }

        if let Some(max_price) = self.max_price {
            qb.push(" AND price <= ").push_bind(max_price);
        }

        if let Some(bedrooms) = self.bedrooms {
            qb.push(" AND bedrooms = ").push_bind(bedrooms);
        }
    }
}

impl Listing {
    /// Inserts a new listing and returns it
    ///
    /// # Errors
    ///
    /// Returns a foreign key violation if `owner_id` names an unknown account
    pub async fn create(pool: &SqlitePool, data: CreateListing) -> Result<Self, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO listings
                (title, description, location, area, price, bedrooms, bathrooms,
                 property_type, amenities, images, owner_id, featured)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {}
            "#,
            LISTING_COLUMNS
        );

        let row = sqlx::query_as::<_, ListingRow>(&sql)
            .bind(data.title)
            .bind(data.description)
            .bind(data.location)
            .bind(data.area)
            .bind(data.price)
            .bind(data.bedrooms)
            .bind(data.bathrooms)
            .bind(data.property_type)
            .bind(encode_list(&data.amenities))
            .bind(encode_list(&data.images))
            .bind(data.owner_id)
            .bind(data.featured)
            .fetch_one(pool)
            .await?;

        tracing::debug!(listing_id = row.id, owner_id = ?row.owner_id, "Listing created");
        Ok(row.into())
    }

    /// Finds a listing by id regardless of its status
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {} FROM listings WHERE id = ?", LISTING_COLUMNS);

        let row = sqlx::query_as::<_, ListingRow>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(Listing::from))
    }

    /// Returns every available listing matching `filter`, featured first and
    /// then newest first
    pub async fn search(pool: &SqlitePool, filter: &ListingFilter) -> Result<Vec<Self>, sqlx::Error> {
        let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM listings WHERE status = ", LISTING_COLUMNS));
        qb.push_bind(ListingStatus::Available);

        filter.push_predicates(&mut qb);

        qb.push(" ORDER BY featured DESC, created_at DESC, id DESC");

        let rows = qb.build_query_as::<ListingRow>().fetch_all(pool).await?;

        tracing::debug!(results = rows.len(), ?filter, "Listing search completed");
        Ok(rows.into_iter().map(Listing::from).collect())
    }

    /// Returns up to `limit` featured, available listings, newest first
    pub async fn featured(pool: &SqlitePool, limit: i64) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM listings WHERE featured = 1 AND status = ? \
             ORDER BY created_at DESC, id DESC LIMIT ?",
            LISTING_COLUMNS
        );

        let rows = sqlx::query_as::<_, ListingRow>(&sql)
            .bind(ListingStatus::Available)
            .bind(limit)
            .fetch_all(pool)
            .await?;

        Ok(rows.into_iter().map(Listing::from).collect())
    }

    /// Counts all listings, whatever their status
    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM listings")
            .fetch_one(pool)
            .await
    }

    /// Counts distinct location strings across all listings
    pub async fn count_distinct_locations(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(DISTINCT location) FROM listings")
            .fetch_one(pool)
            .await
    }
}

/// Joins a sequence into its stored form; an empty sequence is stored as NULL
pub fn encode_list(items: &[String]) -> Option<String> {
    let joined = items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .collect::<Vec<_>>()
        .join(&LIST_DELIMITER.to_string());

    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

/// Splits a stored delimited value back into its items, trimming whitespace
/// and dropping empty entries
pub fn decode_list(stored: Option<&str>) -> Vec<String> {
    stored
        .map(|s| {
            s.split(LIST_DELIMITER)
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Escapes LIKE wildcards so user input matches literally under `ESCAPE '\'`
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
