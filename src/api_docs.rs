use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::books::create_book,
        api::books::update_book,
        api::books::delete_book,
        api::actions::category_report,
        api::actions::fetch_metadata,
    ),
    components(schemas(
        crate::models::book::Book,
        crate::models::book::Category,
        crate::models::notification::Notification,
        crate::domain::BookFilter,
    )),
    tags(
        (name = "library-book", description = "Library book catalogue API")
    )
)]
pub struct ApiDoc;
