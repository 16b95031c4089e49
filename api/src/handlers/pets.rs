//! Pet handlers
//!
//! Endpoints under `/v2/pet`.

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::StatusCode,
    Form, Json,
};
use serde::Deserialize;

use crate::domain::entities::{Pet, PetId, PetStatus};
use crate::domain::ports::{ImageStore, Storage};
use crate::error::{ApiResponse, AppError};
use crate::AppState;

/// Query parameters for finding pets
#[derive(Debug, Deserialize)]
pub struct FindByStatusQuery {
    /// Comma-separated statuses, e.g. `available,pending`
    #[serde(default)]
    pub status: String,
}

/// Form fields for patching a pet. Empty means unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdatePetForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
}

/// POST /v2/pet
pub async fn add_pet<S, IS>(
    State(state): State<AppState<S, IS>>,
    Json(pet): Json<Pet>,
) -> Result<Json<Pet>, AppError>
where
    S: Storage + 'static,
    IS: ImageStore + 'static,
{
    state.pet_service.add_pet(&pet).await?;
    Ok(Json(pet))
}

/// PUT /v2/pet
///
/// Replace an existing pet.
pub async fn update_pet<S, IS>(
    State(state): State<AppState<S, IS>>,
    Json(pet): Json<Pet>,
) -> Result<Json<Pet>, AppError>
where
    S: Storage + 'static,
    IS: ImageStore + 'static,
{
    state.pet_service.update_pet(&pet).await?;
    Ok(Json(pet))
}

/// GET /v2/pet/findByStatus?status=available,pending
pub async fn find_pets_by_status<S, IS>(
    State(state): State<AppState<S, IS>>,
    Query(query): Query<FindByStatusQuery>,
) -> Result<Json<Vec<Pet>>, AppError>
where
    S: Storage + 'static,
    IS: ImageStore + 'static,
{
    let statuses = parse_statuses(&query.status)?;
    let pets = state.pet_service.find_pets_by_status(&statuses).await?;
    Ok(Json(pets))
}

/// GET /v2/pet/:pet_id
pub async fn get_pet<S, IS>(
    State(state): State<AppState<S, IS>>,
    Path(pet_id): Path<i64>,
) -> Result<Json<Pet>, AppError>
where
    S: Storage + 'static,
    IS: ImageStore + 'static,
{
    let pet = state.pet_service.find_pet_by_id(PetId(pet_id)).await?;
    Ok(Json(pet))
}

/// POST /v2/pet/:pet_id
///
/// Patch name and/or status from form data.
pub async fn update_pet_with_form<S, IS>(
    State(state): State<AppState<S, IS>>,
    Path(pet_id): Path<i64>,
    Form(form): Form<UpdatePetForm>,
) -> Result<Json<ApiResponse>, AppError>
where
    S: Storage + 'static,
    IS: ImageStore + 'static,
{
    state
        .pet_service
        .update_pet_by_id(PetId(pet_id), form.name.trim(), form.status.trim())
        .await?;

    Ok(Json(ApiResponse::new(
        200,
        "ok",
        format!("pet {} updated", pet_id),
    )))
}

/// DELETE /v2/pet/:pet_id
pub async fn delete_pet<S, IS>(
    State(state): State<AppState<S, IS>>,
    Path(pet_id): Path<i64>,
) -> Result<StatusCode, AppError>
where
    S: Storage + 'static,
    IS: ImageStore + 'static,
{
    state.pet_service.delete_pet_by_id(PetId(pet_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v2/pet/:pet_id/uploadImage
///
/// Multipart upload; the image is read from the `file` field. The response
/// message carries the public URL of the stored image.
pub async fn upload_image<S, IS>(
    State(state): State<AppState<S, IS>>,
    Path(pet_id): Path<i64>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse>, AppError>
where
    S: Storage + 'static,
    IS: ImageStore + 'static,
{
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("malformed multipart body", e))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let original_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::BadRequest("file field has no filename".to_string()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error("cannot read upload", e))?;

        let url = state
            .pet_service
            .add_image_url_for_pet_by_id(PetId(pet_id), &original_name, &bytes)
            .await?;
        return Ok(Json(ApiResponse::new(200, "ok", url)));
    }

    Err(AppError::BadRequest("missing file field".to_string()))
}

/// A body over the route's limit surfaces as a multipart error carrying 413
fn multipart_error(context: &str, e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("{}: {}", context, e.body_text()))
    } else {
        AppError::BadRequest(format!("{}: {}", context, e.body_text()))
    }
}

/// Split a comma-separated status list, rejecting unknown values
fn parse_statuses(raw: &str) -> Result<Vec<PetStatus>, AppError> {
    let statuses = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<PetStatus>().map_err(AppError::BadRequest))
        .collect::<Result<Vec<_>, _>>()?;

    if statuses.is_empty() {
        return Err(AppError::BadRequest(
            "at least one status is required".to_string(),
        ));
    }
    Ok(statuses)
}
