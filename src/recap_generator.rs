use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use image::{DynamicImage, ImageFormat};
use log::{info, warn};

use crate::candidate_ranker::rank_candidates;
use crate::caption::compose_caption;
use crate::config::Config;
use crate::diary_source::{self, DiarySource};
use crate::diary_types::{make_filename_safe, DiaryCollection, SelectedQuery};
use crate::fonts::FontSet;
use crate::image_search::{self, ImageSearch};
use crate::query_selector::select_thumbnail_query;
use crate::{aspect_ratio, renderer};

#[derive(Debug, thiserror::Error)]
pub enum RecapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Saved output of one render. The collage is always produced; the featured
/// still is best effort.
#[derive(Debug, Clone)]
pub struct RecapOutput {
    pub collage_path: PathBuf,
    pub still_path: Option<PathBuf>,
}

/// Run the full pipeline for one user at an explicit clock value: collect
/// the diary window, render and save the collage, then try the featured
/// still. Nothing in the still pipeline is fatal.
pub fn generate_recap(
    config: &Config,
    fonts: &FontSet,
    source: &dyn DiarySource,
    search: &dyn ImageSearch,
    username: &str,
    now: DateTime<Utc>,
) -> Result<RecapOutput, RecapError> {
    let reference_date = now.date_naive();
    let collection =
        diary_source::collect_window(source, username, reference_date, config.diary_floor_year);
    info!(
        "Collected {} entries across {} years for {}",
        collection.total_entries(),
        collection.buckets().len(),
        username
    );

    let output_dir = Path::new(&config.output_path);
    std::fs::create_dir_all(output_dir)?;
    let stamp = now.format("%Y-%m-%d_%I%M%p").to_string();

    let collage = renderer::render_collage(
        &collection,
        reference_date,
        fonts,
        config.template_path.as_deref(),
    );
    let collage_path = output_dir.join(format!("{}-frame.png", stamp));
    DynamicImage::ImageRgba8(collage).save_with_format(&collage_path, ImageFormat::Png)?;
    info!("Saved collage to {}", collage_path.display());

    let still_path = render_still(fonts, search, &collection, output_dir, &stamp);

    Ok(RecapOutput {
        collage_path,
        still_path,
    })
}

/// The optional secondary image. Every failure degrades to `None`.
fn render_still(
    fonts: &FontSet,
    search: &dyn ImageSearch,
    collection: &DiaryCollection,
    output_dir: &Path,
    stamp: &str,
) -> Option<PathBuf> {
    if collection.all_no_activity() {
        return None;
    }

    let query = select_thumbnail_query(collection)?;
    let results = match search.search(&query.display_text) {
        Ok(results) => results,
        Err(e) => {
            warn!("Still search failed for {:?}: {}", query.display_text, e);
            return None;
        }
    };

    let Some(candidate) = rank_candidates(&results) else {
        info!("No suitable still candidate for {:?}", query.display_text);
        return None;
    };

    let raw = match image_search::fetch_image(&candidate.url) {
        Ok(image) => image,
        Err(e) => {
            warn!("Failed to download still {}: {}", candidate.url, e);
            return None;
        }
    };

    let normalized = aspect_ratio::normalize(&raw);
    info!(
        "Normalized still {}x{} via {:?}",
        normalized.image.width(),
        normalized.image.height(),
        normalized.transform
    );

    let mut still = normalized.image;
    let SelectedQuery {
        display_text,
        source_year,
        raw_title,
    } = query;
    compose_caption(&mut still, &display_text, &format!(" {}", source_year), fonts);

    let still_path = output_dir.join(format!(
        "{}-{}-frame.png",
        stamp,
        make_filename_safe(&raw_title)
    ));
    if let Err(e) =
        DynamicImage::ImageRgba8(still).save_with_format(&still_path, ImageFormat::Png)
    {
        warn!("Failed to save still to {}: {}", still_path.display(), e);
        return None;
    }
    info!("Saved still to {}", still_path.display());
    Some(still_path)
}
