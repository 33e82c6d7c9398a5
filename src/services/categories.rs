//! Category use cases.
//!
//! Reads go straight to the store. Every write runs through a [`GatedWrite`]:
//! the local change is staged in a transaction, mirrored to the book service
//! and committed only once the book service acknowledges it. If the book
//! service fails, nothing is committed locally. The book service's own state
//! is unknown in that case (see [`crate::mirror`]).

use serde::Deserialize;

use crate::domain::category::CategoryDraft;
use crate::domain::types::CategoryId;
use crate::dto::categories::CategoryDto;
use crate::forms::categories::{
    CreateCategoryForm, CreateCategoryPayload, UpdateCategoryForm, UpdateCategoryPayload,
};
use crate::mirror::CategoryMirror;
use crate::pagination::{Paginated, Pagination};
use crate::repository::{
    CategoryListQuery, CategoryReader, CategoryWriter, RepositoryError, Transactional,
};

use super::gated_write::GatedWrite;
use super::{ServiceError, ServiceResult};

/// Query parameters accepted when listing categories.
#[derive(Debug, Default, Deserialize)]
pub struct ListCategoriesParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Translate a store failure into the service taxonomy, logging anything
/// that becomes an opaque internal error.
fn store_failure(action: &str, err: RepositoryError) -> ServiceError {
    match err {
        RepositoryError::NotFound => ServiceError::NotFound,
        RepositoryError::ConstraintViolation(_) => {
            ServiceError::Conflict("category name already exists".to_string())
        }
        other => {
            log::error!("Failed to {action}: {other}");
            ServiceError::Internal
        }
    }
}

/// Identifiers that cannot exist are reported as missing.
fn parse_id(category_id: i32) -> ServiceResult<CategoryId> {
    CategoryId::new(category_id).map_err(|_| ServiceError::NotFound)
}

pub fn show_category<R>(category_id: i32, repo: &R) -> ServiceResult<CategoryDto>
where
    R: CategoryReader,
{
    let id = parse_id(category_id)?;

    match repo.get_category_by_id(id) {
        Ok(Some(category)) => Ok(category.into()),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => Err(store_failure("get category", e)),
    }
}

pub fn list_categories<R>(
    params: ListCategoriesParams,
    repo: &R,
) -> ServiceResult<Paginated<CategoryDto>>
where
    R: CategoryReader,
{
    let pagination = Pagination::from_query(params.page, params.limit);

    match repo.list_categories(CategoryListQuery::new().paginate(pagination)) {
        Ok((total, categories)) => {
            Ok(Paginated::new(categories, pagination, total).map(CategoryDto::from))
        }
        Err(e) => Err(store_failure("list categories", e)),
    }
}

/// Insert a category and mirror it to the book service.
pub async fn create_category<R, M>(
    form: CreateCategoryForm,
    repo: &R,
    mirror: &M,
) -> ServiceResult<CategoryDto>
where
    R: Transactional + Clone + Send + 'static,
    R::Scope: Send + 'static,
    M: CategoryMirror,
{
    let payload: CreateCategoryPayload = form.try_into()?;
    let draft = CategoryDraft::new(payload.name);

    let (write, category) = GatedWrite::stage(repo, move |scope| scope.save_category(&draft))
        .await
        .map_err(|e| store_failure("create category", e))?;

    write
        .resolve(mirror.mirror(category.id, &category.name).await)
        .await?;

    log::info!("Created category {} ({})", category.id, category.name);
    Ok(category.into())
}

/// Apply the given changes and mirror the resulting full state.
///
/// An empty update still saves and mirrors, re-affirming the book service's
/// copy.
pub async fn update_category<R, M>(
    category_id: i32,
    form: UpdateCategoryForm,
    repo: &R,
    mirror: &M,
) -> ServiceResult<CategoryDto>
where
    R: Transactional + Clone + Send + 'static,
    R::Scope: Send + 'static,
    M: CategoryMirror,
{
    let id = parse_id(category_id)?;
    let payload: UpdateCategoryPayload = form.try_into()?;

    let (write, category) = GatedWrite::stage(repo, move |scope| {
        let current = scope
            .find_category(id)?
            .ok_or(RepositoryError::NotFound)?;

        let mut draft = CategoryDraft::existing(&current);
        if let Some(name) = payload.name {
            draft = draft.rename(name);
        }
        scope.save_category(&draft)
    })
    .await
    .map_err(|e| store_failure("update category", e))?;

    write
        .resolve(mirror.mirror(category.id, &category.name).await)
        .await?;

    log::info!("Updated category {} ({})", category.id, category.name);
    Ok(category.into())
}

/// Soft-delete a category and retract it from the book service.
pub async fn delete_category<R, M>(category_id: i32, repo: &R, mirror: &M) -> ServiceResult<()>
where
    R: Transactional + Clone + Send + 'static,
    R::Scope: Send + 'static,
    M: CategoryMirror,
{
    let id = parse_id(category_id)?;

    let (write, deleted) = GatedWrite::stage(repo, move |scope| scope.delete_category(id))
        .await
        .map_err(|e| store_failure("delete category", e))?;

    write.resolve(mirror.retract(deleted.id).await).await?;

    log::info!("Deleted category {}", deleted.id);
    Ok(())
}
