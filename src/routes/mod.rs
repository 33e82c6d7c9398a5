use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;

use crate::pagination::Paginated;
use crate::services::ServiceError;

pub mod categories;

/// Envelope shared by every JSON response.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationMeta>,
}

#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub current_page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

pub fn success<T: Serialize>(status: StatusCode, message: &str, data: Option<T>) -> HttpResponse {
    HttpResponse::build(status).json(ApiResponse {
        success: true,
        message: message.to_string(),
        data,
        pagination: None,
    })
}

pub fn success_paginated<T: Serialize>(message: &str, page: Paginated<T>) -> HttpResponse {
    let pagination = PaginationMeta {
        current_page: page.page,
        page_size: page.per_page,
        total_pages: page.total_pages,
        total_items: page.total_items,
    };

    HttpResponse::Ok().json(ApiResponse {
        success: true,
        message: message.to_string(),
        data: Some(page.items),
        pagination: Some(pagination),
    })
}

pub fn failure(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(ApiResponse::<()> {
        success: false,
        message: message.to_string(),
        data: None,
        pagination: None,
    })
}

/// Map a service error onto a status code and a message safe to show callers.
pub fn error_response(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => failure(StatusCode::UNAUTHORIZED, "Unauthorized"),
        ServiceError::Validation(message) => failure(StatusCode::BAD_REQUEST, &message),
        ServiceError::NotFound => failure(StatusCode::NOT_FOUND, "Category not found"),
        ServiceError::Conflict(message) => failure(StatusCode::CONFLICT, &message),
        ServiceError::Remote(message) => {
            failure(StatusCode::BAD_GATEWAY, &format!("Book service error: {message}"))
        }
        ServiceError::Internal => {
            failure(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}
