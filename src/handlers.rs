use std::convert::Infallible;
use std::sync::Arc;

use chrono::Utc;
use log::error;
use serde::{Deserialize, Serialize};
use serde_json::json;
use warp::{reject, Rejection, Reply};

use crate::config::Config;
use crate::diary_source::DiarySource;
use crate::fonts::FontSet;
use crate::image_search::ImageSearch;
use crate::recap_generator::{generate_recap, RecapOutput};
use crate::warp_helpers::{RecapFailure, ValidationError};

#[derive(Debug, Deserialize)]
pub struct RecapRequest {
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct RecapResponse {
    pub collage_url: String,
    pub still_url: Option<String>,
}

pub async fn health_check() -> Result<impl Reply, Infallible> {
    Ok(warp::reply::json(&json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    })))
}

pub async fn create_recap(
    request: RecapRequest,
    config: Arc<Config>,
    fonts: Arc<FontSet>,
    source: Arc<dyn DiarySource>,
    search: Arc<dyn ImageSearch>,
) -> Result<impl Reply, Rejection> {
    let username = request.username.trim().to_string();
    if username.is_empty() {
        return Err(reject::custom(ValidationError {
            message: "username must not be empty".to_string(),
        }));
    }

    let now = Utc::now();
    let output = tokio::task::spawn_blocking(move || {
        generate_recap(&config, &fonts, source.as_ref(), search.as_ref(), &username, now)
    })
    .await;

    match output {
        Ok(Ok(output)) => Ok(warp::reply::json(&to_response(&output))),
        Ok(Err(e)) => {
            error!("Recap generation failed: {}", e);
            Err(reject::custom(RecapFailure {
                message: format!("Recap generation failed: {}", e),
            }))
        }
        Err(e) => {
            error!("Recap task panicked: {}", e);
            Err(reject::custom(RecapFailure {
                message: "Recap generation failed".to_string(),
            }))
        }
    }
}

fn to_response(output: &RecapOutput) -> RecapResponse {
    RecapResponse {
        collage_url: output_url(&output.collage_path),
        still_url: output.still_path.as_deref().map(output_url),
    }
}

fn output_url(path: &std::path::Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("/output/{}", name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn response_urls_use_file_names() {
        let output = RecapOutput {
            collage_path: PathBuf::from("/tmp/out/2025-08-25_0101PM-frame.png"),
            still_path: Some(PathBuf::from("/tmp/out/2025-08-25_0101PM-Heat-frame.png")),
        };
        let response = to_response(&output);
        assert_eq!(response.collage_url, "/output/2025-08-25_0101PM-frame.png");
        assert_eq!(
            response.still_url.as_deref(),
            Some("/output/2025-08-25_0101PM-Heat-frame.png")
        );
    }
}
