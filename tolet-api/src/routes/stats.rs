/// Marketplace statistics endpoint
///
/// ```json
/// { "totalProperties": 3, "totalTenants": 0, "totalLocations": 3 }
/// ```

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use serde::Serialize;
use tolet_shared::models::{
    account::{Account, AccountRole},
    listing::Listing,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    /// Every listing, whatever its status
    pub total_properties: i64,

    /// Accounts with the tenant role
    pub total_tenants: i64,

    /// Distinct location strings across all listings
    pub total_locations: i64,
}

pub async fn get_stats(State(state): State<AppState>) -> ApiResult<Json<StatsResponse>> {
    let (total_properties, total_tenants, total_locations) = tokio::try_join!(
        Listing::count(&state.db),
        Account::count_by_role(&state.db, AccountRole::Tenant),
        Listing::count_distinct_locations(&state.db),
    )?;

    Ok(Json(StatsResponse {
        total_properties,
        total_tenants,
        total_locations,
    }))
}
