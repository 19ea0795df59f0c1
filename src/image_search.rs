use image::DynamicImage;
use log::{debug, warn};
use serde::Deserialize;

use crate::candidate_ranker::ThumbnailCandidate;

const SEARCH_ENDPOINT: &str = "https://customsearch.googleapis.com/customsearch/v1";
const RESULT_FIELDS: &str = "items.fileFormat, items.title, items.htmlTitle, items.link, items.image.height, items.image.width, items.image.byteSize";

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Search request failed: {0}")]
    Http(#[from] Box<ureq::Error>),
    #[error("Image decode failed: {0}")]
    Decode(#[from] image::ImageError),
}

/// Relevance-ordered image search for a movie query. Non-success responses
/// and response-shape surprises yield an empty sequence, never an error the
/// render would die on.
pub trait ImageSearch: Send + Sync {
    fn search(&self, query: &str) -> Result<Vec<ThumbnailCandidate>, SearchError>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
pub struct SearchItem {
    pub link: String,
    pub image: Option<SearchItemImage>,
}

#[derive(Debug, Deserialize)]
pub struct SearchItemImage {
    pub width: u32,
    pub height: u32,
}

pub struct GoogleImageSearch {
    api_key: Option<String>,
    engine_id: String,
}

impl GoogleImageSearch {
    pub fn new(api_key: Option<String>, engine_id: String) -> Self {
        GoogleImageSearch { api_key, engine_id }
    }
}

impl ImageSearch for GoogleImageSearch {
    fn search(&self, query: &str) -> Result<Vec<ThumbnailCandidate>, SearchError> {
        let Some(api_key) = &self.api_key else {
            warn!("No search API key configured; skipping still search");
            return Ok(Vec::new());
        };

        debug!("Searching stills for {:?}", query);
        let mut response = ureq::get(SEARCH_ENDPOINT)
            .query("cx", &self.engine_id)
            .query("excludeTerms", "poster")
            .query("imgType", "photo")
            .query("safe", "off")
            .query("searchType", "image")
            .query("fields", RESULT_FIELDS)
            .query("key", api_key)
            .query("q", query)
            .call()
            .map_err(Box::new)?;

        let parsed: SearchResponse = response.body_mut().read_json().map_err(Box::new)?;
        Ok(parsed
            .items
            .into_iter()
            .filter_map(candidate_from_item)
            .collect())
    }
}

/// Items without image metadata cannot be ranked and are dropped.
pub fn candidate_from_item(item: SearchItem) -> Option<ThumbnailCandidate> {
    let image = item.image?;
    let (source_domain, filename_hint) = split_url(&item.link);
    Some(ThumbnailCandidate {
        url: item.link,
        width: image.width,
        height: image.height,
        source_domain,
        filename_hint,
    })
}

fn split_url(url: &str) -> (String, String) {
    let rest = url.split_once("//").map_or(url, |(_, rest)| rest);
    let domain = rest.split('/').next().unwrap_or_default().to_string();
    let filename = rest.rsplit('/').next().unwrap_or_default().to_string();
    (domain, filename)
}

/// Download the chosen candidate and decode it.
pub fn fetch_image(url: &str) -> Result<DynamicImage, SearchError> {
    debug!("Downloading still {}", url);
    let mut response = ureq::get(url).call().map_err(Box::new)?;
    let bytes = response.body_mut().read_to_vec().map_err(Box::new)?;
    Ok(image::load_from_memory(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_parse_from_response_json() {
        let body = r#"{
            "items": [
                {"link": "https://images.mubicdn.net/stills/cache-overlaid.jpg",
                 "image": {"width": 1920, "height": 1080}},
                {"link": "https://a.example/film/still.png",
                 "image": {"width": 1280, "height": 720}},
                {"link": "https://b.example/no-dimensions.jpg"}
            ]
        }"#;
        let parsed: SearchResponse = serde_json::from_str(body).expect("valid json");
        let candidates: Vec<ThumbnailCandidate> = parsed
            .items
            .into_iter()
            .filter_map(candidate_from_item)
            .collect();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].source_domain, "images.mubicdn.net");
        assert_eq!(candidates[0].filename_hint, "cache-overlaid.jpg");
        assert!(!candidates[0].suitable());
        assert_eq!(candidates[1].width, 1280);
        assert!(candidates[1].suitable());
    }

    #[test]
    fn empty_response_yields_no_candidates() {
        let parsed: SearchResponse = serde_json::from_str("{}").expect("valid json");
        assert!(parsed.items.is_empty());
    }

    #[test]
    fn url_split_handles_odd_shapes() {
        assert_eq!(
            split_url("https://a.example/x/y/z.jpg"),
            ("a.example".to_string(), "z.jpg".to_string())
        );
        assert_eq!(
            split_url("a.example/z.jpg"),
            ("a.example".to_string(), "z.jpg".to_string())
        );
    }
}
