use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};
use tracing::error;
use waypost_routing::router::{QueryCost, RouteResponse};
use waypost_routing::routing::route_result::RouteOutcome;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct QueryParams {
    curr_lat: f64,
    curr_lng: f64,
    dest_lat: f64,
    dest_lng: f64,
    alpha: f64,
    beta: f64,
}

impl QueryParams {
    fn validate(&self) -> Result<(), ApiError> {
        let values = [
            ("curr_lat", self.curr_lat),
            ("curr_lng", self.curr_lng),
            ("dest_lat", self.dest_lat),
            ("dest_lng", self.dest_lng),
            ("alpha", self.alpha),
            ("beta", self.beta),
        ];

        match values.iter().find(|(_, value)| !value.is_finite()) {
            Some((name, _)) => Err(ApiError::BadRequest(format!("`{}` must be a finite number", name))),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    coords: Vec<[f64; 2]>,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'static str>,
}

impl From<RouteResponse> for QueryResponse {
    fn from(response: RouteResponse) -> Self {
        match response.outcome {
            RouteOutcome::Succeeded => QueryResponse {
                coords: response.coords,
                status: response.outcome.as_str(),
                reason: None,
            },
            outcome => QueryResponse {
                coords: Vec::new(),
                status: outcome.as_str(),
                reason: Some(outcome.description()),
            },
        }
    }
}

impl QueryResponse {
    fn internal_error() -> Self {
        QueryResponse {
            coords: Vec::new(),
            status: "error",
            reason: Some("the route could not be computed"),
        }
    }
}

pub async fn query_handler(
    State(state): State<Arc<AppState>>,
    params: Result<Query<QueryParams>, QueryRejection>,
) -> Result<Json<QueryResponse>, ApiError> {
    let Query(params) = params?;
    params.validate()?;

    let search = tokio::task::spawn_blocking(move || {
        state.router.route_between(
            params.curr_lat,
            params.curr_lng,
            params.dest_lat,
            params.dest_lng,
            QueryCost::new(params.alpha, params.beta),
        )
    })
    .await;

    match search {
        Ok(response) => Ok(Json(response.into())),
        Err(join_error) => {
            error!("Route search failed: {}", join_error);
            Ok(Json(QueryResponse::internal_error()))
        }
    }
}
