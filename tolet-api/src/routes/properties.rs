/// Listing endpoints
///
/// # Endpoints
///
/// - `GET /api/properties` - Search available listings
/// - `GET /api/properties/featured` - Newest featured listings
/// - `GET /api/properties/:id` - Listing detail
/// - `POST /api/properties` - Create a listing (bearer token, multipart)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    uploads::{discard_images, ImageUpload, UploadError, MAX_IMAGES_PER_LISTING},
};
use axum::{
    extract::{rejection::QueryRejection, Multipart, Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tolet_shared::{
    auth::bearer::AuthContext,
    models::listing::{decode_list, CreateListing, Listing, ListingFilter, PropertyType, FEATURED_LIMIT},
};

/// Multipart field carrying image files
const IMAGES_FIELD: &str = "images";

/// Search query string
///
/// Every parameter arrives as text; empty values count as absent because
/// search forms submit all of their inputs.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub location: Option<String>,
    pub property_type: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub bedrooms: Option<String>,
}

impl TryFrom<ListingQuery> for ListingFilter {
    type Error = ApiError;

    fn try_from(query: ListingQuery) -> Result<Self, Self::Error> {
        Ok(ListingFilter {
            location: non_empty(query.location),
            property_type: parse_property_type(non_empty(query.property_type))?,
            min_price: parse_integer("min_price", non_empty(query.min_price))?,
            max_price: parse_integer("max_price", non_empty(query.max_price))?,
            bedrooms: parse_integer("bedrooms", non_empty(query.bedrooms))?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: i64,
    pub message: String,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_integer(field: &str, value: Option<String>) -> ApiResult<Option<i64>> {
    value
        .map(|v| {
            v.parse::<i64>()
                .map_err(|_| ApiError::BadRequest(format!("{} must be a whole number", field)))
        })
        .transpose()
}

fn parse_property_type(value: Option<String>) -> ApiResult<Option<PropertyType>> {
    value
        .map(|v| v.parse::<PropertyType>().map_err(ApiError::BadRequest))
        .transpose()
}

/// Search available listings
///
/// Results are ordered featured first, then newest first.
///
/// # Errors
///
/// - `400 Bad Request`: Non-numeric price or bedrooms, unknown property type
pub async fn list_properties(
    State(state): State<AppState>,
    query: Result<Query<ListingQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Listing>>> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let filter = ListingFilter::try_from(query)?;

    let listings = Listing::search(&state.db, &filter).await?;
    Ok(Json(listings))
}

/// Newest featured listings that are still available
pub async fn featured_properties(State(state): State<AppState>) -> ApiResult<Json<Vec<Listing>>> {
    let listings = Listing::featured(&state.db, FEATURED_LIMIT).await?;
    Ok(Json(listings))
}

/// Listing detail, whatever its status
///
/// Ids that are not integers cannot name a listing and get 404 as well.
pub async fn get_property(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Listing>> {
    let not_found = || ApiError::NotFound("Property not found".to_string());

    let id = id.parse::<i64>().map_err(|_| not_found())?;
    let listing = Listing::find_by_id(&state.db, id).await?.ok_or_else(not_found)?;

    Ok(Json(listing))
}

/// Fields of the listing creation form, as submitted
#[derive(Debug, Default)]
pub struct ListingForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub area: Option<String>,
    pub price: Option<String>,
    pub bedrooms: Option<String>,
    pub bathrooms: Option<String>,
    pub property_type: Option<String>,
    pub amenities: Option<String>,
    pub images: Vec<ImageUpload>,
}

impl ListingForm {
    /// Reads every multipart field; unknown fields are ignored
    pub async fn from_multipart(multipart: &mut Multipart) -> ApiResult<Self> {
        let mut form = ListingForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_string();

            if name == IMAGES_FIELD {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;

                // Browsers send an empty part when no file was chosen
                if data.is_empty() && file_name.as_deref().map_or(true, str::is_empty) {
                    continue;
                }

                if form.images.len() == MAX_IMAGES_PER_LISTING {
                    return Err(UploadError::TooManyImages {
                        max: MAX_IMAGES_PER_LISTING,
                    }
                    .into());
                }

                form.images.push(ImageUpload {
                    file_name,
                    content_type,
                    data,
                });
                continue;
            }

            let slot = match name.as_str() {
                "title" => &mut form.title,
                "description" => &mut form.description,
                "location" => &mut form.location,
                "area" => &mut form.area,
                "price" => &mut form.price,
                "bedrooms" => &mut form.bedrooms,
                "bathrooms" => &mut form.bathrooms,
                "property_type" => &mut form.property_type,
                "amenities" => &mut form.amenities,
                _ => {
                    tracing::debug!(field = %name, "Ignoring unknown listing form field");
                    continue;
                }
            };

            let text = field
                .text()
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            *slot = Some(text);
        }

        Ok(form)
    }

    /// Checks the text fields and builds the listing without images
    ///
    /// # Errors
    ///
    /// - `ValidationError` listing every missing required field
    /// - `BadRequest` for non-numeric numbers or an unknown property type
    pub fn to_listing(&self, owner_id: i64) -> ApiResult<CreateListing> {
        let required = [
            ("title", &self.title),
            ("location", &self.location),
            ("area", &self.area),
            ("price", &self.price),
            ("property_type", &self.property_type),
        ];

        let missing: Vec<ValidationErrorDetail> = required
            .iter()
            .filter(|(_, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
            .map(|(field, _)| ValidationErrorDetail {
                field: field.to_string(),
                message: format!("{} is required", field),
            })
            .collect();

        if !missing.is_empty() {
            return Err(ApiError::ValidationError(missing));
        }

        let text = |value: &Option<String>| non_empty(value.clone()).unwrap_or_default();

        let price = parse_integer("price", non_empty(self.price.clone()))?.unwrap_or_default();
        let property_type = parse_property_type(non_empty(self.property_type.clone()))?
            .ok_or_else(|| ApiError::BadRequest("property_type is required".to_string()))?;

        Ok(CreateListing {
            title: text(&self.title),
            description: non_empty(self.description.clone()),
            location: text(&self.location),
            area: text(&self.area),
            price,
            bedrooms: parse_integer("bedrooms", non_empty(self.bedrooms.clone()))?,
            bathrooms: parse_integer("bathrooms", non_empty(self.bathrooms.clone()))?,
            property_type,
            amenities: decode_list(self.amenities.as_deref()),
            images: Vec::new(),
            owner_id: Some(owner_id),
            featured: false,
        })
    }
}

/// Create a listing owned by the caller
///
/// Text fields are checked before any image is stored; images keep their
/// upload order. Images already stored are removed again if the listing
/// cannot be saved.
///
/// # Errors
///
/// - `400 Bad Request`: Malformed form, bad numbers, more than five images
/// - `401 Unauthorized` / `403 Forbidden`: Missing or rejected token
/// - `422 Unprocessable Entity`: Required fields missing
pub async fn create_property(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    mut multipart: Multipart,
) -> ApiResult<Json<CreatedResponse>> {
    let form = ListingForm::from_multipart(&mut multipart).await?;
    let mut listing = form.to_listing(auth.account_id)?;

    for upload in form.images {
        match state.images.store(upload).await {
            Ok(reference) => listing.images.push(reference),
            Err(e) => {
                discard_images(state.images.as_ref(), &listing.images).await;
                return Err(e.into());
            }
        }
    }

    let stored = listing.images.clone();
    let listing = match Listing::create(&state.db, listing).await {
        Ok(listing) => listing,
        Err(e) => {
            discard_images(state.images.as_ref(), &stored).await;
            return Err(e.into());
        }
    };

    tracing::info!(
        listing_id = listing.id,
        owner_id = auth.account_id,
        images = listing.images.len(),
        "Listing created"
    );

    Ok(Json(CreatedResponse {
        id: listing.id,
        message: "Property added successfully".to_string(),
    }))
}
