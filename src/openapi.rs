use utoipa::OpenApi;

use crate::api;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health,
        api::formats,
        api::generate,
    ),
    components(
        schemas(api::CardRequest, api::IconRequest, api::HealthResponse, api::FormatInfo)
    ),
    tags(
        (name = "cardgen", description = "Travel promo card rendering API")
    )
)]
pub struct ApiDoc;
