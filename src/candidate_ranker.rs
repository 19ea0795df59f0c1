use serde::Serialize;

/// One image-search result, in upstream relevance order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThumbnailCandidate {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub source_domain: String,
    pub filename_hint: String,
}

impl ThumbnailCandidate {
    /// Landscape images only, minus the mubi CDN's watermarked "overlaid"
    /// fallbacks.
    pub fn suitable(&self) -> bool {
        if self.source_domain.contains("mubicdn.net") && self.filename_hint.contains("overlaid") {
            return false;
        }
        self.width > self.height
    }
}

/// How many leading results the fast path may consult.
const FAST_PATH_DEPTH: usize = 3;
const FAST_PATH_MIN_WIDTH: u32 = 1280;

/// Fallback width ceilings, widest first.
const WIDTH_CEILINGS: [u32; 5] = [4092, 1920, 1280, 600, 480];

/// Maximum width-to-height ratio admitted by the fallback tiers.
const MAX_ELONGATION: f64 = 2.5;

/// Pick the candidate to download. Input order is relevance-ranked by the
/// upstream search and must be preserved by the caller.
pub fn rank_candidates(results: &[ThumbnailCandidate]) -> Option<&ThumbnailCandidate> {
    // Fast path: first suitable high-resolution hit among the top three.
    if let Some(hit) = results
        .iter()
        .take(FAST_PATH_DEPTH)
        .find(|c| c.width >= FAST_PATH_MIN_WIDTH && c.suitable())
    {
        return Some(hit);
    }

    // Fallback: widest suitable candidate under each ceiling in turn,
    // excluding overly elongated images.
    for ceiling in WIDTH_CEILINGS {
        let mut best: Option<&ThumbnailCandidate> = None;
        for candidate in results {
            if candidate.suitable()
                && candidate.width <= ceiling
                && (candidate.width as f64) <= MAX_ELONGATION * candidate.height as f64
                && best.is_none_or(|b| candidate.width > b.width)
            {
                best = Some(candidate);
            }
        }
        if best.is_some() {
            return best;
        }
    }

    None
}
