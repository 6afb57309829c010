use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::wine;
use crate::error::AppError;
use crate::models::shared::validate_text;

#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateWineRequest {
    #[schema(example = "Clos de la Roche")]
    pub name: String,
    #[schema(example = "Domaine Ponsot")]
    pub producer: String,
    #[schema(example = "France")]
    pub country: String,
    #[schema(example = "Pinot Noir")]
    pub varietal: String,
    #[schema(example = 2019)]
    pub vintage: i32,
    pub image_url: Option<String>,
}

/// Full-replacement update; the same shape as creation.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWineRequest {
    pub name: String,
    pub producer: String,
    pub country: String,
    pub varietal: String,
    pub vintage: i32,
    pub image_url: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WineResponse {
    pub id: i32,
    pub name: String,
    pub producer: String,
    pub country: String,
    pub varietal: String,
    pub vintage: i32,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<wine::Model> for WineResponse {
    fn from(m: wine::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            producer: m.producer,
            country: m.country,
            varietal: m.varietal,
            vintage: m.vintage,
            image_url: m.image_url,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct WineListQuery {
    /// Zero-based page number (default 0).
    pub page: Option<u64>,
    /// Page size (default 20, max 100).
    pub size: Option<u64>,
    /// Exact-match filter on country.
    pub country: Option<String>,
    /// Exact-match filter on varietal.
    pub varietal: Option<String>,
    /// Case-insensitive substring match on name.
    pub search: Option<String>,
    /// One of: `name`, `vintage`, `createdAt`.
    pub sort_by: Option<String>,
    /// `asc` or `desc` (default `asc`).
    pub sort_order: Option<String>,
}

pub fn validate_wine_fields(
    name: &str,
    producer: &str,
    country: &str,
    varietal: &str,
    vintage: i32,
) -> Result<(), AppError> {
    validate_text(name, "Name", 256)?;
    validate_text(producer, "Producer", 256)?;
    validate_text(country, "Country", 128)?;
    validate_text(varietal, "Varietal", 128)?;
    if !(1800..=2100).contains(&vintage) {
        return Err(AppError::Validation(
            "Vintage year must be between 1800 and 2100".into(),
        ));
    }
    Ok(())
}

pub fn validate_create_wine(req: &CreateWineRequest) -> Result<(), AppError> {
    validate_wine_fields(
        &req.name,
        &req.producer,
        &req.country,
        &req.varietal,
        req.vintage,
    )
}

pub fn validate_update_wine(req: &UpdateWineRequest) -> Result<(), AppError> {
    validate_wine_fields(
        &req.name,
        &req.producer,
        &req.country,
        &req.varietal,
        req.vintage,
    )
}
