//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::OpenApi;

use crate::bank::{Account, TransferRecord};
use crate::gateway::handlers::HealthResponse;
use crate::gateway::types::{CreateAccountRequest, ErrorBody, TransferRequest};

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bank Transfer API",
        version = "0.1.0",
        description = "Bank accounts per user and atomic funds transfer between accounts.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health::health_check,
        crate::gateway::handlers::account::create_account,
        crate::gateway::handlers::account::list_accounts,
        crate::gateway::handlers::account::delete_account,
        crate::gateway::handlers::transfer::create_transfer,
        crate::gateway::handlers::transfer::list_transfers,
    ),
    components(
        schemas(
            HealthResponse,
            Account,
            TransferRecord,
            CreateAccountRequest,
            TransferRequest,
            ErrorBody,
        )
    ),
    tags(
        (name = "Accounts", description = "Account creation, listing and deletion"),
        (name = "Transactions", description = "Funds transfer and transfer history"),
        (name = "System", description = "Health check")
    )
)]
pub struct ApiDoc;
