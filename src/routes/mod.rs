// Route exports
pub mod profiles;

use actix_web::{error, http::StatusCode, web, HttpRequest, HttpResponse};
use std::fmt;

use crate::models::ErrorResponse;

pub use profiles::{AppState, USER_ID_HEADER};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(profiles::configure),
    );
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl error::ResponseError for ErrorResponse {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    ErrorResponse {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("Query error on {}: {}", req.path(), err);
    ErrorResponse {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ProfileStore, RecommendationEngine};
    use crate::services::InMemoryProfileRepository;
    use actix_web::{test, App};
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_malformed_json_uses_error_shape() {
        let state = AppState {
            store: ProfileStore::new(Arc::new(InMemoryProfileRepository::new())),
            engine: RecommendationEngine::default(),
            max_limit: 10,
            postgres: None,
        };
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/v1/profiles/search")
            .insert_header((USER_ID_HEADER, "u1"))
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.error, "invalid_json");
    }
}
