use axum::response::Response;

use super::{ErrorCode, error_response};

/// Router fallback for unmatched paths
pub async fn not_found() -> Response {
    error_response(
        ErrorCode::NotFound,
        "The requested resource was not found",
        None,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_not_found_fallback_status() {
        let response = not_found().await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
