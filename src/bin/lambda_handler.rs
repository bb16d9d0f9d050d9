//! AWS Lambda handler for the calculate endpoint
//!
//! Accepts planner parameters as a JSON object and returns the year-by-year
//! ledger. Supports Lambda Function URLs for direct HTTP access.

use lambda_http::http::response::Builder;
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use wealth_planner::api::handle_calculate;

fn with_cors(builder: Builder) -> Builder {
    builder
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
}

fn json_response(status: u16, body: String) -> Result<Response<Body>, Error> {
    Ok(with_cors(Response::builder())
        .status(status)
        .header("Content-Type", "application/json")
        .body(Body::Text(body))?)
}

/// Lambda handler function
async fn handler(event: Request) -> Result<Response<Body>, Error> {
    let start = std::time::Instant::now();

    // Handle CORS preflight
    match event.method().as_str() {
        "OPTIONS" => {
            return Ok(with_cors(Response::builder()).status(200).body(Body::Empty)?);
        }
        "POST" => {}
        other => {
            log::warn!("Rejected {} request", other);
            return json_response(
                405,
                r#"{"success":false,"error":"method not allowed"}"#.to_string(),
            );
        }
    }

    // Parse request body
    let body_str = match event.body() {
        Body::Text(s) => s.clone(),
        Body::Binary(b) => String::from_utf8_lossy(b).to_string(),
        Body::Empty => String::new(),
    };

    let reply = handle_calculate(&body_str);
    let body = reply.to_json()?;

    log::info!(
        "Calculate request answered with {} in {} ms",
        reply.status,
        start.elapsed().as_millis()
    );
    json_response(reply.status, body)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
