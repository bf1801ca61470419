use serde::Serialize;
use utoipa::ToSchema;

/// Success envelope shared by every endpoint:
/// `{ "success": true, "message": "...", "data": ... }`
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_shape() {
        let json = serde_json::to_value(ApiResponse::success("Fetched", vec![1, 2])).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Fetched");
        assert_eq!(json["data"], serde_json::json!([1, 2]));
    }
}
