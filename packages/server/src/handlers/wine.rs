use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr, LockType};
use sea_orm::*;
use tracing::instrument;

use crate::entity::wine;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::lifecycle;
use crate::models::shared::{Page, escape_like, page_params};
use crate::models::wine::*;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/",
    tag = "Wines",
    operation_id = "createWine",
    summary = "Add a wine to the catalog",
    request_body = CreateWineRequest,
    responses(
        (status = 201, description = "Wine created", body = WineResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 403, description = "No valid session (UNAUTHENTICATED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, payload), fields(name = %payload.name))]
pub async fn create_wine(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateWineRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_wine(&payload)?;

    let now = chrono::Utc::now();
    let new_wine = wine::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        producer: Set(payload.producer.trim().to_string()),
        country: Set(payload.country.trim().to_string()),
        varietal: Set(payload.varietal.trim().to_string()),
        vintage: Set(payload.vintage),
        image_url: Set(payload.image_url),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = new_wine.insert(&state.db).await?;

    Ok((StatusCode::CREATED, Json(WineResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Wines",
    operation_id = "listWines",
    summary = "List wines with filters, search, sorting, and pagination",
    description = "Filters combine with AND semantics. Unsorted listings come \
        back in stable insertion order.",
    params(WineListQuery),
    responses(
        (status = 200, description = "Page of wines", body = Page<WineResponse>),
        (status = 400, description = "Unknown sort field (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_wines(
    State(state): State<AppState>,
    Query(query): Query<WineListQuery>,
) -> Result<Json<Page<WineResponse>>, AppError> {
    let (page, size) = page_params(query.page, query.size);

    let mut select = wine::Entity::find();

    if let Some(ref country) = query.country {
        select = select.filter(wine::Column::Country.eq(country.trim()));
    }
    if let Some(ref varietal) = query.varietal {
        select = select.filter(wine::Column::Varietal.eq(varietal.trim()));
    }
    if let Some(ref search) = query.search {
        let term = escape_like(search.trim());
        if !term.is_empty() {
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(wine::Column::Name)))
                    .like(LikeExpr::new(format!("%{}%", term.to_lowercase())).escape('\\')),
            );
        }
    }

    select = apply_sort(select, query.sort_by.as_deref(), query.sort_order.as_deref())?;

    let total = select.clone().count(&state.db).await?;

    let rows = select
        .offset(Some(page * size))
        .limit(Some(size))
        .all(&state.db)
        .await?;

    let content = rows.into_iter().map(WineResponse::from).collect();

    Ok(Json(Page::new(content, total, page, size)))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Wines",
    operation_id = "getWine",
    summary = "Get a wine by ID",
    params(("id" = i32, Path, description = "Wine ID")),
    responses(
        (status = 200, description = "Wine details", body = WineResponse),
        (status = 404, description = "Wine not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_wine(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<WineResponse>, AppError> {
    let model = find_wine(&state.db, id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Wines",
    operation_id = "updateWine",
    summary = "Replace a wine's catalog fields",
    params(("id" = i32, Path, description = "Wine ID")),
    request_body = UpdateWineRequest,
    responses(
        (status = 200, description = "Wine updated", body = WineResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 403, description = "No valid session (UNAUTHENTICATED)", body = ErrorBody),
        (status = 404, description = "Wine not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, payload), fields(id))]
pub async fn update_wine(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateWineRequest>,
) -> Result<Json<WineResponse>, AppError> {
    validate_update_wine(&payload)?;

    let txn = state.db.begin().await?;

    let existing = find_wine_for_update(&txn, id).await?;
    let mut active: wine::ActiveModel = existing.into();

    active.name = Set(payload.name.trim().to_string());
    active.producer = Set(payload.producer.trim().to_string());
    active.country = Set(payload.country.trim().to_string());
    active.varietal = Set(payload.varietal.trim().to_string());
    active.vintage = Set(payload.vintage);
    active.image_url = Set(payload.image_url);
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&txn).await?;
    txn.commit().await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Wines",
    operation_id = "deleteWine",
    summary = "Delete a wine from the catalog",
    description = "Removes the wine together with every review referencing it \
        and all comments on those reviews, in one transaction.",
    params(("id" = i32, Path, description = "Wine ID")),
    responses(
        (status = 204, description = "Wine deleted"),
        (status = 403, description = "No valid session (UNAUTHENTICATED)", body = ErrorBody),
        (status = 404, description = "Wine not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(id))]
pub async fn delete_wine(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;

    find_wine_for_update(&txn, id).await?;
    lifecycle::delete_wine(&txn, id).await?;

    txn.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

fn apply_sort(
    select: Select<wine::Entity>,
    sort_by: Option<&str>,
    sort_order: Option<&str>,
) -> Result<Select<wine::Entity>, AppError> {
    let Some(sort_by) = sort_by else {
        return Ok(select.order_by_asc(wine::Column::Id));
    };

    let column = match sort_by {
        "name" => wine::Column::Name,
        "vintage" => wine::Column::Vintage,
        "createdAt" => wine::Column::CreatedAt,
        _ => {
            return Err(AppError::Validation(
                "sortBy must be one of: name, vintage, createdAt".into(),
            ));
        }
    };
    let order = if sort_order == Some("desc") {
        Order::Desc
    } else {
        Order::Asc
    };

    Ok(select.order_by(column, order))
}

async fn find_wine<C: ConnectionTrait>(db: &C, id: i32) -> Result<wine::Model, AppError> {
    wine::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Wine not found".into()))
}

async fn find_wine_for_update(
    txn: &DatabaseTransaction,
    id: i32,
) -> Result<wine::Model, AppError> {
    wine::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Wine not found".into()))
}
