fn main() {
    // The book service contract is only needed by the server build.
    // Cargo sets CARGO_FEATURE_SERVER when compiling with the `server` feature.
    if std::env::var("CARGO_FEATURE_SERVER").is_ok() {
        let service = tonic_build::manual::Service::builder()
            .name("CategoryService")
            .package("category")
            .method(
                tonic_build::manual::Method::builder()
                    .name("save_category")
                    .route_name("SaveCategory")
                    .input_type("crate::mirror::proto::SaveCategoryRequest")
                    .output_type("crate::mirror::proto::SaveCategoryResponse")
                    .codec_path("tonic::codec::ProstCodec")
                    .build(),
            )
            .method(
                tonic_build::manual::Method::builder()
                    .name("delete_category")
                    .route_name("DeleteCategory")
                    .input_type("crate::mirror::proto::DeleteCategoryRequest")
                    .output_type("crate::mirror::proto::DeleteCategoryResponse")
                    .codec_path("tonic::codec::ProstCodec")
                    .build(),
            )
            .build();

        tonic_build::manual::Builder::new().compile(&[service]);
    }
}
