use std::convert::Infallible;
use std::sync::Arc;

use serde::Serialize;
use warp::{reject, Filter, Rejection, Reply};

use crate::config::Config;
use crate::diary_source::DiarySource;
use crate::fonts::FontSet;
use crate::image_search::ImageSearch;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    pub timestamp: String,
}

#[derive(Debug)]
pub struct RecapFailure {
    pub message: String,
}

impl reject::Reject for RecapFailure {}

#[derive(Debug)]
pub struct ValidationError {
    pub message: String,
}

impl reject::Reject for ValidationError {}

pub fn with_config(
    config: Arc<Config>,
) -> impl Filter<Extract = (Arc<Config>,), Error = Infallible> + Clone {
    warp::any().map(move || config.clone())
}

pub fn with_fonts(
    fonts: Arc<FontSet>,
) -> impl Filter<Extract = (Arc<FontSet>,), Error = Infallible> + Clone {
    warp::any().map(move || fonts.clone())
}

pub fn with_diary_source(
    source: Arc<dyn DiarySource>,
) -> impl Filter<Extract = (Arc<dyn DiarySource>,), Error = Infallible> + Clone {
    warp::any().map(move || source.clone())
}

pub fn with_image_search(
    search: Arc<dyn ImageSearch>,
) -> impl Filter<Extract = (Arc<dyn ImageSearch>,), Error = Infallible> + Clone {
    warp::any().map(move || search.clone())
}

pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;
    let timestamp = chrono::Utc::now().to_rfc3339();

    if err.is_not_found() {
        code = warp::http::StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(recap_failure) = err.find::<RecapFailure>() {
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        message = recap_failure.message.clone();
    } else if let Some(validation_error) = err.find::<ValidationError>() {
        code = warp::http::StatusCode::BAD_REQUEST;
        message = validation_error.message.clone();
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        code = warp::http::StatusCode::PAYLOAD_TOO_LARGE;
        message = "Payload too large".to_string();
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        code = warp::http::StatusCode::UNSUPPORTED_MEDIA_TYPE;
        message = "Unsupported media type".to_string();
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        code = warp::http::StatusCode::METHOD_NOT_ALLOWED;
        message = "Method not allowed".to_string();
    } else {
        log::error!("Unhandled rejection: {:?}", err);
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal server error".to_string();
    }

    let error_response = ErrorResponse {
        error: message,
        code: code.as_u16(),
        timestamp,
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&error_response),
        code,
    ))
}

pub fn cors() -> warp::cors::Builder {
    warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET", "POST", "OPTIONS"])
}
