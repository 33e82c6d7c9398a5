use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};

use crate::auth::AuthenticatedUser;
use crate::forms::categories::{CreateCategoryForm, UpdateCategoryForm};
use crate::mirror::CategoryMirror;
use crate::repository::DieselRepository;
use crate::routes::{error_response, failure, success, success_paginated};
use crate::services::ServiceError;
use crate::services::categories::{
    ListCategoriesParams, create_category as create_category_service,
    delete_category as delete_category_service, list_categories as list_categories_service,
    show_category as show_category_service, update_category as update_category_service,
};

/// Register the category routes for a given mirror implementation.
pub fn configure<M>(cfg: &mut web::ServiceConfig)
where
    M: CategoryMirror + 'static,
{
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        InternalError::from_response(
            err,
            failure(StatusCode::BAD_REQUEST, "Invalid request payload"),
        )
        .into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        InternalError::from_response(
            err,
            failure(StatusCode::BAD_REQUEST, "Invalid category id"),
        )
        .into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        InternalError::from_response(
            err,
            failure(StatusCode::BAD_REQUEST, "Invalid query parameters"),
        )
        .into()
    }))
    .service(
        web::resource("/categories")
            .route(web::get().to(list_categories))
            .route(web::post().to(create_category::<M>)),
    )
    .service(
        web::resource("/categories/{category_id}")
            .route(web::get().to(show_category))
            .route(web::patch().to(update_category::<M>))
            .route(web::delete().to(delete_category::<M>)),
    );
}

pub async fn list_categories(
    _user: AuthenticatedUser,
    params: web::Query<ListCategoriesParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let repo = repo.get_ref().clone();
    let result = web::block(move || list_categories_service(params.into_inner(), &repo)).await;

    match result {
        Ok(Ok(page)) => success_paginated("Categories retrieved successfully", page),
        Ok(Err(err)) => error_response(err),
        Err(err) => {
            log::error!("List categories task failed: {err}");
            error_response(ServiceError::Internal)
        }
    }
}

pub async fn show_category(
    _user: AuthenticatedUser,
    category_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let repo = repo.get_ref().clone();
    let category_id = category_id.into_inner();
    let result = web::block(move || show_category_service(category_id, &repo)).await;

    match result {
        Ok(Ok(category)) => success(
            StatusCode::OK,
            "Category retrieved successfully",
            Some(category),
        ),
        Ok(Err(err)) => error_response(err),
        Err(err) => {
            log::error!("Show category task failed: {err}");
            error_response(ServiceError::Internal)
        }
    }
}

pub async fn create_category<M>(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    mirror: web::Data<M>,
    web::Json(form): web::Json<CreateCategoryForm>,
) -> HttpResponse
where
    M: CategoryMirror + 'static,
{
    log::debug!("Category create requested by {}", user.sub);

    match create_category_service(form, repo.get_ref(), mirror.get_ref()).await {
        Ok(category) => success(
            StatusCode::CREATED,
            "Category created successfully",
            Some(category),
        ),
        Err(err) => error_response(err),
    }
}

pub async fn update_category<M>(
    user: AuthenticatedUser,
    category_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    mirror: web::Data<M>,
    web::Json(form): web::Json<UpdateCategoryForm>,
) -> HttpResponse
where
    M: CategoryMirror + 'static,
{
    let category_id = category_id.into_inner();
    log::debug!("Category {category_id} update requested by {}", user.sub);

    match update_category_service(category_id, form, repo.get_ref(), mirror.get_ref()).await {
        Ok(category) => success(
            StatusCode::OK,
            "Category updated successfully",
            Some(category),
        ),
        Err(err) => error_response(err),
    }
}

pub async fn delete_category<M>(
    user: AuthenticatedUser,
    category_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    mirror: web::Data<M>,
) -> HttpResponse
where
    M: CategoryMirror + 'static,
{
    let category_id = category_id.into_inner();
    log::debug!("Category {category_id} delete requested by {}", user.sub);

    match delete_category_service(category_id, repo.get_ref(), mirror.get_ref()).await {
        Ok(()) => success::<()>(StatusCode::OK, "Category deleted successfully", None),
        Err(err) => error_response(err),
    }
}
