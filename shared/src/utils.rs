use crate::core::ResponseEnvelope;
use lambda_http::http::StatusCode;
use lambda_http::{Error, Response};

pub const ALLOW_ORIGIN_HEADER: &str = "Access-Control-Allow-Origin";

pub fn json_response(
    status: &StatusCode,
    envelope: &ResponseEnvelope,
) -> Result<Response<String>, Error> {
    let response = Response::builder()
        .status(status)
        .header(ALLOW_ORIGIN_HEADER, "*")
        .header("content-type", "application/json")
        .body(serde_json::to_string(envelope)?)
        .map_err(Box::new)?;

    Ok(response)
}
