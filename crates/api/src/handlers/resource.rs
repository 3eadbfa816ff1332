//! List, get, create, replace, patch and delete over any [`Resource`].
//!
//! The per-resource handler modules are thin axum adapters: they extract
//! their concrete payload and filter types and call into these functions.

use axum::http::StatusCode;
use axum::Json;
use cinecat_core::assets::Upload;
use cinecat_core::error::CoreError;
use cinecat_core::patch::PatchDocument;
use cinecat_core::types::DbId;
use cinecat_db::mapping::{AssetField, EntityMapping};
use cinecat_db::resource::{self, CreateOf, ReadOf, Resource};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::query::ListParams;
use crate::response::{Created, Paginated};
use crate::state::AppState;

fn not_found<R: Resource>(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: R::NAME,
        id,
    })
}

fn validate<T: Validate>(input: &T) -> Result<(), CoreError> {
    input.validate().map_err(CoreError::from)
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Filter, count, order and slice, then project each row to its read DTO.
///
/// The count runs against the filtered set before slicing, so a page past
/// the end comes back empty with the real total.
pub async fn list<R: Resource>(
    state: &AppState,
    filter: &R::Filter,
    params: &ListParams,
) -> AppResult<Paginated<ReadOf<R>>> {
    let ordering = params.ordering::<R::SortKey>(R::NAME);
    let page = params.page_request();

    let total = resource::count::<R>(&state.pool, filter).await?;
    let rows = resource::fetch_page::<R>(&state.pool, filter, &ordering, &page).await?;

    tracing::debug!(
        resource = R::NAME,
        total,
        page = page.page,
        page_size = page.page_size,
        returned = rows.len(),
        "Listed page"
    );

    Ok(Paginated {
        items: rows.into_iter().map(EntityMapping::to_read).collect(),
        total,
    })
}

pub async fn get<R: Resource>(state: &AppState, id: DbId) -> AppResult<Json<R::Detail>> {
    let detail = R::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| not_found::<R>(id))?;
    Ok(Json(detail))
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// Validate, map to a draft, insert. `collection` is the path segment used
/// for the `Location` header.
pub async fn create<R: Resource>(
    state: &AppState,
    collection: &str,
    input: CreateOf<R>,
) -> AppResult<Created<ReadOf<R>>> {
    validate(&input)?;
    let draft = <R::Entity as EntityMapping>::to_draft(&input);
    let entity = R::insert(&state.pool, draft).await?;
    Ok(created::<R>(collection, entity))
}

/// Like [`create`], storing the attached asset first and writing its
/// reference onto the draft. If the insert then fails the stored asset is
/// removed again.
pub async fn create_with_asset<R>(
    state: &AppState,
    collection: &str,
    input: CreateOf<R>,
    upload: Option<Upload>,
) -> AppResult<Created<ReadOf<R>>>
where
    R: Resource,
    R::Entity: AssetField,
{
    validate(&input)?;
    let mut draft = <R::Entity as EntityMapping>::to_draft(&input);

    let mut stored = None;
    if let Some(upload) = upload {
        let extension = checked_extension::<R::Entity>(&upload)?;
        let reference = state
            .assets
            .store(
                &upload.bytes,
                &extension,
                <R::Entity as AssetField>::CONTAINER,
                &upload.content_type,
            )
            .await?;
        <R::Entity as AssetField>::set_draft_asset(&mut draft, reference.clone());
        stored = Some(reference);
    }

    match R::insert(&state.pool, draft).await {
        Ok(entity) => Ok(created::<R>(collection, entity)),
        Err(err) => {
            if let Some(reference) = stored {
                discard_asset(state, &reference, <R::Entity as AssetField>::CONTAINER).await;
            }
            Err(err.into())
        }
    }
}

fn created<R: Resource>(collection: &str, entity: R::Entity) -> Created<ReadOf<R>> {
    let id = entity.id();
    tracing::info!(resource = R::NAME, id, "Created");
    Created {
        location: format!("/api/v1/{collection}/{id}"),
        body: entity.to_read(),
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

/// Full replace: every mapped field is overwritten from `input`, owned
/// relations included. The asset reference is left as it was.
pub async fn update<R: Resource>(
    state: &AppState,
    id: DbId,
    input: CreateOf<R>,
) -> AppResult<StatusCode> {
    validate(&input)?;
    let mut entity = resource::find_by_id::<R>(&state.pool, id)
        .await?
        .ok_or_else(|| not_found::<R>(id))?;

    entity.apply_update(&input);
    R::replace(&state.pool, &entity).await?;

    tracing::info!(resource = R::NAME, id, "Replaced");
    Ok(StatusCode::NO_CONTENT)
}

/// Like [`update`]; an attached asset replaces the previous one. Without an
/// upload the stored reference is untouched.
pub async fn update_with_asset<R>(
    state: &AppState,
    id: DbId,
    input: CreateOf<R>,
    upload: Option<Upload>,
) -> AppResult<StatusCode>
where
    R: Resource,
    R::Entity: AssetField,
{
    validate(&input)?;
    let extension = upload
        .as_ref()
        .map(checked_extension::<R::Entity>)
        .transpose()?;

    let mut entity = resource::find_by_id::<R>(&state.pool, id)
        .await?
        .ok_or_else(|| not_found::<R>(id))?;
    entity.apply_update(&input);

    let container = <R::Entity as AssetField>::CONTAINER;
    let previous = entity.asset().map(str::to_owned);
    let mut stored = None;
    if let (Some(upload), Some(extension)) = (upload, extension) {
        let reference = state
            .assets
            .store(&upload.bytes, &extension, container, &upload.content_type)
            .await?;
        entity.set_asset(reference.clone());
        stored = Some(reference);
    }

    if let Err(err) = R::replace(&state.pool, &entity).await {
        if let Some(reference) = stored {
            discard_asset(state, &reference, container).await;
        }
        return Err(err.into());
    }

    // The previous asset goes only once the row points at the new one.
    if let (Some(_), Some(previous)) = (&stored, previous) {
        discard_asset(state, &previous, container).await;
    }

    tracing::info!(resource = R::NAME, id, "Replaced");
    Ok(StatusCode::NO_CONTENT)
}

/// Apply a patch document to the entity's patch projection, re-validate the
/// result, and persist only if it passes. A rejected patch leaves the store
/// untouched.
pub async fn patch<R: Resource>(
    state: &AppState,
    id: DbId,
    document: PatchDocument,
) -> AppResult<StatusCode> {
    let mut entity = resource::find_by_id::<R>(&state.pool, id)
        .await?
        .ok_or_else(|| not_found::<R>(id))?;

    let patched = document.apply_to(&entity.to_patch())?;
    entity.merge_patch(patched);
    R::save(&state.pool, &entity).await?;

    tracing::info!(resource = R::NAME, id, operations = document.0.len(), "Patched");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

/// Existence is checked separately from the delete so that "absent" is a 404
/// rather than a silent no-op.
pub async fn delete<R: Resource>(state: &AppState, id: DbId) -> AppResult<StatusCode> {
    if !resource::exists::<R>(&state.pool, id).await? {
        return Err(not_found::<R>(id));
    }
    if !resource::delete::<R>(&state.pool, id).await? {
        // Removed by someone else between the two statements.
        return Err(not_found::<R>(id));
    }

    tracing::info!(resource = R::NAME, id, "Deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

/// Check an upload against the entity's rules and return its extension.
fn checked_extension<E: AssetField>(upload: &Upload) -> Result<String, CoreError> {
    E::RULES.check(E::FIELD, upload.bytes.len(), &upload.content_type)?;
    upload.extension().ok_or_else(|| {
        CoreError::InvalidFields(
            [(
                E::FIELD.to_string(),
                vec!["file name must have an extension".to_string()],
            )]
            .into(),
        )
    })
}

async fn discard_asset(state: &AppState, reference: &str, container: &str) {
    if let Err(err) = state.assets.remove(reference, container).await {
        tracing::warn!(error = %err, reference, "Failed to remove orphaned asset");
    }
}
