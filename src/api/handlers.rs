use axum::{
    extract::State,
    response::{Json, Redirect},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::extract::{ClientUserAgent, ValidJson, ValidQuery};
use crate::logic::{Counters, RequestClassifier, Verdict};
use crate::model::{parse_day, CustomerId, TrackingRequest};
use crate::store::traits::Store;

pub type AppState<S> = Arc<S>;

const DATE_FORMAT_ERROR: &str =
    "Validation Error: Date should be in the format day/month/year. ex: 02/08/2020";

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub success: bool,
    pub message: String,
    pub data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub customer_id: CustomerId,
    pub date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CustomerStats {
    pub id: CustomerId,
    pub valid_requests_count: i64,
    pub invalid_requests_count: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsData {
    pub customer: CustomerStats,
    pub daily_total_all_customers: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub success: bool,
    pub message: String,
    pub data: StatsData,
}

/// Hand an accepted request to downstream processing
fn process_valid_request(request: &TrackingRequest) {
    log::debug!(
        "Accepted request: customer={} tag={} user={}",
        request.customer_id,
        request.tag_id,
        request.user_id
    );
}

/// `POST /api/v1/process`
///
/// Every request that passes validation is counted in its hour bucket,
/// whether or not it is accepted, before the response is produced.
pub async fn process_request<S: Store>(
    State(store): State<AppState<S>>,
    ClientUserAgent(user_agent): ClientUserAgent,
    ValidJson(request): ValidJson<TrackingRequest>,
) -> Result<Json<ProcessResponse>, ApiError> {
    request.validate()?;
    let bucket = request.bucket()?;

    let classification =
        RequestClassifier::classify(&*store, &request, user_agent.as_deref()).await?;
    Counters::record(&*store, &classification, bucket).await?;

    if let Verdict::Rejected(rejection) = classification.verdict {
        log::info!(
            "Rejected request for customer {} from {}: {}",
            request.customer_id,
            request.remote_ip,
            rejection.message()
        );
        return Err(ApiError::Rejected(rejection));
    }

    process_valid_request(&request);

    Ok(Json(ProcessResponse {
        success: true,
        message: "Request was processed".to_string(),
        data: serde_json::json!({}),
    }))
}

/// `GET /api/v1/stats?customer_id=..&date=dd/mm/yyyy`
///
/// Unknown customers report zero counts rather than an error.
pub async fn get_statistics<S: Store>(
    State(store): State<AppState<S>>,
    ValidQuery(query): ValidQuery<StatsQuery>,
) -> Result<Json<StatsResponse>, ApiError> {
    let day = query
        .date
        .as_deref()
        .and_then(parse_day)
        .ok_or_else(|| ApiError::Validation(DATE_FORMAT_ERROR.to_string()))?;

    let report = Counters::daily_report(&*store, query.customer_id, day).await?;

    Ok(Json(StatsResponse {
        success: true,
        message: "Returning User Stats".to_string(),
        data: StatsData {
            customer: CustomerStats {
                id: report.customer_id,
                valid_requests_count: report.customer.valid,
                invalid_requests_count: report.customer.invalid,
            },
            daily_total_all_customers: report.all_customers,
        },
    }))
}

pub async fn redirect_to_docs() -> Redirect {
    Redirect::temporary("/docs")
}

/// OpenAPI document for the service
pub async fn get_api_docs() -> Json<serde_json::Value> {
    let error_response = serde_json::json!({
        "description": "Error",
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    });

    Json(serde_json::json!({
        "openapi": "3.0.0",
        "info": {
            "title": "API to process user requests",
            "description": "API for processing user requests and gathering stats per user.",
            "version": env!("CARGO_PKG_VERSION")
        },
        "paths": {
            "/api/v1/process": {
                "post": {
                    "tags": ["Processing"],
                    "summary": "Process a request sent by the collector",
                    "description": "Validates the request against the customer registry and the IP and User-Agent blocklists, then counts it in the customer's hourly statistics.",
                    "parameters": [
                        {
                            "name": "User-Agent",
                            "in": "header",
                            "required": false,
                            "schema": { "type": "string" }
                        }
                    ],
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/TrackingRequest" }
                            }
                        }
                    },
                    "responses": {
                        "200": {
                            "description": "Request was processed",
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/ProcessResponse" }
                                }
                            }
                        },
                        "401": error_response,
                        "403": error_response,
                        "404": error_response,
                        "422": error_response
                    }
                }
            },
            "/api/v1/stats": {
                "get": {
                    "tags": ["Statistics"],
                    "summary": "Daily statistics of a customer",
                    "description": "Valid and invalid request counts of one customer for a day, with the total number of requests of all customers that day.",
                    "parameters": [
                        {
                            "name": "customer_id",
                            "in": "query",
                            "required": true,
                            "schema": { "type": "integer" }
                        },
                        {
                            "name": "date",
                            "in": "query",
                            "required": true,
                            "description": "Day in day/month/year format, e.g. 02/08/2020",
                            "schema": { "type": "string" }
                        }
                    ],
                    "responses": {
                        "200": {
                            "description": "Returning User Stats",
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/StatsResponse" }
                                }
                            }
                        },
                        "422": error_response
                    }
                }
            },
            "/health": {
                "get": {
                    "summary": "Health check",
                    "responses": { "200": { "description": "Service is healthy" } }
                }
            }
        },
        "components": {
            "schemas": {
                "TrackingRequest": {
                    "type": "object",
                    "required": ["customerID", "tagID", "userID", "remoteIP", "timestamp"],
                    "properties": {
                        "customerID": { "type": "integer", "minimum": 2 },
                        "tagID": { "type": "integer" },
                        "userID": { "type": "string" },
                        "remoteIP": { "type": "string" },
                        "timestamp": { "type": "integer", "minimum": 1, "description": "Milliseconds since the Unix epoch" }
                    }
                },
                "ProcessResponse": {
                    "type": "object",
                    "properties": {
                        "success": { "type": "boolean" },
                        "message": { "type": "string" },
                        "data": { "type": "object" }
                    }
                },
                "StatsResponse": {
                    "type": "object",
                    "properties": {
                        "success": { "type": "boolean" },
                        "message": { "type": "string" },
                        "data": {
                            "type": "object",
                            "properties": {
                                "customer": {
                                    "type": "object",
                                    "properties": {
                                        "id": { "type": "integer" },
                                        "valid_requests_count": { "type": "integer" },
                                        "invalid_requests_count": { "type": "integer" }
                                    }
                                },
                                "daily_total_all_customers": { "type": "integer" }
                            }
                        }
                    }
                },
                "ErrorResponse": {
                    "type": "object",
                    "properties": {
                        "detail": { "type": "string" }
                    }
                }
            }
        }
    }))
}
