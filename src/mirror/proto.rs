//! Wire types for the `category.CategoryService` RPCs.
//!
//! Messages are declared with prost derives (standard protobuf wire format,
//! no `.proto` file); the client and server stubs are generated by
//! `build.rs`.

#[derive(Clone, PartialEq, prost::Message)]
pub struct SaveCategoryRequest {
    #[prost(int64, tag = "1")]
    pub category_id: i64,
    #[prost(string, tag = "2")]
    pub name: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SaveCategoryResponse {
    #[prost(bool, tag = "1")]
    pub success: bool,
    #[prost(string, tag = "2")]
    pub message: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct DeleteCategoryRequest {
    #[prost(int64, tag = "1")]
    pub category_id: i64,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct DeleteCategoryResponse {
    #[prost(bool, tag = "1")]
    pub success: bool,
    #[prost(string, tag = "2")]
    pub message: String,
}

include!(concat!(env!("OUT_DIR"), "/category.CategoryService.rs"));

pub use category_service_client::CategoryServiceClient;
pub use category_service_server::{CategoryService, CategoryServiceServer};
