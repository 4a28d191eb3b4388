//! Turns action results and rejections into HTTP responses.

use std::convert::Infallible;

use serde::Serialize;
use serde_json::json;
use warp::{
    body::BodyDeserializeError,
    http::{header, StatusCode},
    reject::{InvalidQuery, MethodNotAllowed, PayloadTooLarge, Rejection},
    reply::{self, Response},
    Reply,
};

use crate::middleware::Unauthorized;

fn status_of(error: &potion::Error) -> StatusCode {
    u16::try_from(error.code)
        .ok()
        .and_then(|code| StatusCode::from_u16(code).ok())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

pub fn error_body(message: &str, status: StatusCode) -> Response {
    reply::with_status(reply::json(&json!({ "error": message })), status).into_response()
}

/// `{"error": info}` with the status carried by the error. Server errors hide their details.
pub fn error_reply(error: potion::Error) -> Response {
    let status = status_of(&error);
    if status.is_server_error() {
        return error_body("Internal server error", status);
    }

    let message = error.info.as_deref().unwrap_or("Invalid request");
    error_body(message, status)
}

pub fn json_reply<T: Serialize>(
    result: Result<T, potion::Error>,
    status: StatusCode,
) -> Result<Response, Infallible> {
    Ok(match result {
        Ok(value) => reply::with_status(reply::json(&value), status).into_response(),
        Err(e) => error_reply(e),
    })
}

pub fn no_content(result: Result<(), potion::Error>) -> Result<Response, Infallible> {
    Ok(match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_reply(e),
    })
}

/// Plain-text download served as an attachment.
pub fn attachment(result: Result<(String, String), potion::Error>) -> Result<Response, Infallible> {
    let (file_name, content) = match result {
        Ok(download) => download,
        Err(e) => return Ok(error_reply(e)),
    };

    let response = reply::with_header(
        reply::with_header(content, header::CONTENT_TYPE, "text/plain; charset=utf-8"),
        header::CONTENT_DISPOSITION,
        format!("attachment; filename=\"{file_name}\""),
    );

    Ok(response.into_response())
}

pub async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    let (message, status) = if err.is_not_found() {
        (String::from("Not found"), StatusCode::NOT_FOUND)
    } else if err.find::<Unauthorized>().is_some() {
        (
            String::from("Authentication credentials were not provided"),
            StatusCode::UNAUTHORIZED,
        )
    } else if let Some(e) = err.find::<BodyDeserializeError>() {
        (format!("Invalid body: {e}"), StatusCode::BAD_REQUEST)
    } else if let Some(e) = err.find::<InvalidQuery>() {
        (format!("{e}"), StatusCode::BAD_REQUEST)
    } else if err.find::<PayloadTooLarge>().is_some() {
        (String::from("Payload too large"), StatusCode::PAYLOAD_TOO_LARGE)
    } else if err.find::<MethodNotAllowed>().is_some() {
        (String::from("Method not allowed"), StatusCode::METHOD_NOT_ALLOWED)
    } else {
        log::error!("> Unhandled rejection: {err:?}");
        (
            String::from("Internal server error"),
            StatusCode::INTERNAL_SERVER_ERROR,
        )
    };

    Ok(error_body(&message, status))
}
