//! HTTP routes.
//!
//! - `POST /suggest_g` with `{"equation"}` returns `{"g_functions": [...]}`
//! - `POST /solve` with `{"equation", "g_function", "x0", "tolerance",
//!   "max_iter"}` returns a [`SolveResponse`](crate::api::SolveResponse)
//! - `GET /health` returns the service status and version
//!
//! Every failure, including malformed bodies and unknown paths, is answered
//! with a JSON body of the form `{"status": "error", "message": ...}`.
//!
//! Iteration runs on tokio's blocking pool so a long solve does not hold up
//! other requests.

use std::convert::Infallible;

use serde::Serialize;
use serde_json::json;
use tracing::{error, warn};
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

use crate::api::{self, SolveRequest, SuggestRequest};

/// Builds every route, with JSON bodies capped at `body_limit` bytes and
/// `/solve` requests capped at `max_iter_limit` iterations.
pub fn routes(
    body_limit: u64,
    max_iter_limit: usize,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    suggest_g(body_limit)
        .or(solve(body_limit, max_iter_limit))
        .or(health())
        .recover(handle_rejection)
}

fn json_body<T>(limit: u64) -> impl Filter<Extract = (T,), Error = Rejection> + Clone
where
    T: for<'de> serde::Deserialize<'de> + Send,
{
    warp::body::content_length_limit(limit).and(warp::body::json())
}

fn suggest_g(limit: u64) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path("suggest_g")
        .and(warp::path::end())
        .and(warp::post())
        .and(json_body(limit))
        .map(|request: SuggestRequest| {
            warp::reply::json(&api::generate_candidates(&request.equation))
        })
}

fn solve(
    limit: u64,
    max_iter_limit: usize,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path("solve")
        .and(warp::path::end())
        .and(warp::post())
        .and(json_body(limit))
        .and_then(move |request: SolveRequest| run_solve(request, max_iter_limit))
}

async fn run_solve(request: SolveRequest, max_iter_limit: usize) -> Result<Response, Rejection> {
    let task = tokio::task::spawn_blocking(move || api::solve(&request, max_iter_limit));
    match task.await {
        Ok(response) => Ok(warp::reply::json(&response).into_response()),
        Err(join_error) => {
            error!(%join_error, "solve task failed");
            let body = ErrorBody {
                status: "error",
                message: "internal server error".to_owned(),
            };
            Ok(warp::reply::with_status(
                warp::reply::json(&body),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
            .into_response())
        }
    }
}

fn health() -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| warp::reply::json(&json!({"status": "ok", "version": crate::VERSION})))
}

#[derive(Serialize)]
struct ErrorBody {
    status: &'static str,
    message: String,
}

async fn handle_rejection(rejection: Rejection) -> Result<impl Reply, Infallible> {
    let (code, message) = if rejection.is_not_found() {
        (StatusCode::NOT_FOUND, "not found".to_owned())
    } else if let Some(error) = rejection.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, format!("invalid request body: {error}"))
    } else if rejection.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "request body too large".to_owned())
    } else if rejection.find::<warp::reject::LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, "content length required".to_owned())
    } else if rejection.find::<warp::reject::UnsupportedMediaType>().is_some() {
        (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "expected a JSON body".to_owned(),
        )
    } else if rejection.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "method not allowed".to_owned())
    } else {
        warn!(?rejection, "unhandled rejection");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal server error".to_owned(),
        )
    };

    let body = ErrorBody {
        status: "error",
        message,
    };
    Ok(warp::reply::with_status(warp::reply::json(&body), code))
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::Value;

    use crate::config::ServiceConfig;
    use warp::http::StatusCode;
    use warp::test::request;

    fn body(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).expect("JSON body")
    }

    fn default_routes() -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
        let config = ServiceConfig::default();
        routes(config.body_limit, config.max_iter_limit)
    }

    #[tokio::test]
    async fn suggest_g_lists_candidates() {
        let filter = default_routes();
        let response = request()
            .method("POST")
            .path("/suggest_g")
            .json(&json!({"equation": "x**2 - 2"}))
            .reply(&filter)
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body(response.body());
        let candidates = body["g_functions"].as_array().expect("array");
        assert_eq!(candidates.len(), 5);
        assert_eq!(candidates[3]["name"], "Fractional form: x = x / (1 + f(x))");
        assert_eq!(candidates[3]["expression"], "x/(x**2 - 1)");
    }

    #[tokio::test]
    async fn solve_reports_the_trace() {
        let filter = default_routes();
        let response = request()
            .method("POST")
            .path("/solve")
            .json(&json!({
                "equation": "x**2 - 2",
                "g_function": "x + 1",
                "x0": "0",
                "tolerance": "1e-9",
                "max_iter": "3"
            }))
            .reply(&filter)
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body(response.body()),
            json!({
                "status": "success",
                "iterations": [1, 2, 3],
                "x_values": [0.0, 1.0, 2.0],
                "g_values": [1.0, 2.0, 3.0],
                "errors": [1.0, 1.0, 1.0],
                "solution": 3.0,
                "converged": false
            })
        );
    }

    #[tokio::test]
    async fn solve_errors_are_still_ok_responses() {
        let filter = default_routes();
        let response = request()
            .method("POST")
            .path("/solve")
            .json(&json!({
                "equation": "x",
                "g_function": "log(x)",
                "x0": 0,
                "tolerance": 1e-6,
                "max_iter": 10
            }))
            .reply(&filter)
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body(response.body());
        assert_eq!(body["status"], "error");
        assert_eq!(
            body["message"],
            "g(x) evaluation failed at x=0.0000. Try a different g(x)."
        );
    }

    #[tokio::test]
    async fn solve_refuses_iteration_counts_over_the_limit() {
        let filter = routes(ServiceConfig::default().body_limit, 100);
        let response = request()
            .method("POST")
            .path("/solve")
            .json(&json!({
                "equation": "x",
                "g_function": "x/2",
                "x0": 1,
                "tolerance": 0,
                "max_iter": 1_000_000_000_000_000_u64
            }))
            .reply(&filter)
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body(response.body()),
            json!({"status": "error", "message": "max_iter must not exceed 100"})
        );
    }

    #[tokio::test]
    async fn malformed_bodies_are_rejected_with_json() {
        let filter = default_routes();
        let response = request()
            .method("POST")
            .path("/solve")
            .json(&json!({"equation": "x"}))
            .reply(&filter)
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body(response.body())["status"], "error");
    }

    #[tokio::test]
    async fn oversized_bodies_are_rejected() {
        let config = ServiceConfig {
            body_limit: 16,
            ..ServiceConfig::default()
        };
        let filter = routes(config.body_limit, config.max_iter_limit);
        let response = request()
            .method("POST")
            .path("/suggest_g")
            .json(&json!({"equation": "x**2 - 2*x + 1 - sin(x)"}))
            .reply(&filter)
            .await;

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn unknown_paths_are_not_found() {
        let filter = default_routes();
        let response = request().path("/plot").reply(&filter).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body(response.body())["message"], "not found");
    }

    #[tokio::test]
    async fn health_reports_version() {
        let filter = default_routes();
        let response = request().path("/health").reply(&filter).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body(response.body()),
            json!({"status": "ok", "version": crate::VERSION})
        );
    }
}
