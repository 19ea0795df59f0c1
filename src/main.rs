use std::convert::Infallible;
use std::net::TcpListener;
use std::sync::Arc;

use log::{error, info};
use warp::Filter;

use reel_recap::config::Config;
use reel_recap::diary_source::{DiarySource, LetterboxdSource};
use reel_recap::fonts::FontSet;
use reel_recap::handlers;
use reel_recap::image_search::{GoogleImageSearch, ImageSearch};
use reel_recap::warp_helpers::{
    cors, handle_rejection, with_config, with_diary_source, with_fonts, with_image_search,
};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = Config::from_env()?;
    let port = config.port;

    info!("Starting reel-recap server on port {}", port);
    info!("Output path: {}", config.output_path);
    info!("Diary base URL: {}", config.diary_base_url);

    if !is_port_available(port) {
        error!(
            "Port {} is already in use. Please stop any existing reel-recap instances or use a different port.",
            port
        );
        return Err(format!("Port {} is already in use", port).into());
    }

    let fonts = Arc::new(FontSet::load(&config)?);
    info!("Fonts loaded");

    let diary_source: Arc<dyn DiarySource> =
        Arc::new(LetterboxdSource::new(config.diary_base_url.clone()));
    let image_search: Arc<dyn ImageSearch> = Arc::new(GoogleImageSearch::new(
        config.search_api_key.clone(),
        config.search_engine_id.clone(),
    ));
    let output_path = config.output_path.clone();
    let config = Arc::new(config);

    let recap_routes = build_recap_routes(config, fonts, diary_source, image_search);
    let health_routes = build_health_routes();
    let output_routes = warp::path("output").and(warp::fs::dir(output_path));
    let static_routes = build_static_routes();

    let routes = health_routes
        .or(recap_routes)
        .or(output_routes)
        .or(static_routes)
        .with(cors())
        .with(warp::log("reel_recap"))
        .recover(handle_rejection);

    info!(
        "Server started successfully, listening on http://localhost:{}",
        port
    );

    warp::serve(routes).run(([0, 0, 0, 0], port)).await;

    Ok(())
}

fn is_port_available(port: u16) -> bool {
    TcpListener::bind(("0.0.0.0", port)).is_ok()
}

fn build_health_routes() -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone
{
    warp::path("health")
        .and(warp::get())
        .and_then(handlers::health_check)
}

fn build_recap_routes(
    config: Arc<Config>,
    fonts: Arc<FontSet>,
    diary_source: Arc<dyn DiarySource>,
    image_search: Arc<dyn ImageSearch>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path("api")
        .and(warp::path("recap"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json::<handlers::RecapRequest>())
        .and(with_config(config))
        .and(with_fonts(fonts))
        .and(with_diary_source(diary_source))
        .and(with_image_search(image_search))
        .and_then(handlers::create_recap)
}

fn build_static_routes() -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone
{
    warp::path::end().and(warp::get()).and_then(|| async {
        Ok::<_, Infallible>(warp::reply::html(include_str!("../static/index.html")))
    })
}
