pub mod aspect_ratio;
pub mod candidate_ranker;
pub mod caption;
pub mod collage_layout;
pub mod config;
pub mod diary_source;
pub mod diary_types;
pub mod fonts;
pub mod handlers;
pub mod image_search;
pub mod query_selector;
pub mod recap_generator;
pub mod renderer;
pub mod warp_helpers;
