//! Reusable OpenAPI responses so every handler documents the same failure envelope.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "success": false,
        "message": "An unexpected internal server error occurred.",
        "error": { "name": "InternalServerError", "details": [] }
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Validation Error",
    content_type = "application/json",
    example = json!({
        "success": false,
        "message": "Invalid request body.",
        "error": {
            "name": "BadRequestError",
            "details": {
                "name": [{
                    "code": "length",
                    "message": null,
                    "params": {"min": 1, "value": ""}
                }]
            }
        }
    })
)]
pub struct BadRequestValidationResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Invalid UUID",
    content_type = "application/json",
    example = json!({
        "success": false,
        "message": "Invalid UUID: abc",
        "error": { "name": "BadRequestError", "details": [] }
    })
)]
pub struct BadRequestUuidResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Business rule violated",
    content_type = "application/json",
    example = json!({
        "success": false,
        "message": "Insufficient stock. Available: 4, Requested: 10",
        "error": { "name": "BadRequestError", "details": [] }
    })
)]
pub struct BadRequestResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({
        "success": false,
        "message": "Product not found",
        "error": { "name": "NotFoundError", "details": [] }
    })
)]
pub struct NotFoundResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Unauthorized - Authentication required",
    content_type = "application/json",
    example = json!({
        "success": false,
        "message": "No Token Provided",
        "error": { "name": "UnauthorizedError", "details": [] }
    })
)]
pub struct UnauthorizedResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Forbidden - Admin role required",
    content_type = "application/json",
    example = json!({
        "success": false,
        "message": "Only Admin can Do this Operation!",
        "error": { "name": "ForbiddenError", "details": [] }
    })
)]
pub struct ForbiddenResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Conflict - Resource still in use",
    content_type = "application/json",
    example = json!({
        "success": false,
        "message": "Cannot remove storage with products. Please remove all products first.",
        "error": { "name": "ConflictError", "details": [] }
    })
)]
pub struct ConflictResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Not Implemented",
    content_type = "application/json",
    example = json!({
        "success": false,
        "message": "Not Implemented",
        "error": { "name": "NotImplementedError", "details": [] }
    })
)]
pub struct NotImplementedResponse(pub ErrorResponse);
