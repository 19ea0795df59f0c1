use std::env;

#[derive(Debug, Clone)]
pub struct FontConfig {
    pub display_path: String,
    pub heading_path: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub host: String,
    pub output_path: String,
    pub template_path: Option<String>,
    pub fonts: FontConfig,
    pub diary_base_url: String,
    pub diary_floor_year: i32,
    pub search_api_key: Option<String>,
    pub search_engine_id: String,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Config {
            port: env::var("REEL_RECAP_PORT")
                .unwrap_or_else(|_| "8147".to_string())
                .parse()?,
            host: env::var("REEL_RECAP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            output_path: env::var("REEL_RECAP_OUTPUT_PATH")
                .unwrap_or_else(|_| "./data/output".to_string()),
            template_path: env::var("REEL_RECAP_TEMPLATE_PATH").ok(),
            fonts: FontConfig {
                display_path: env::var("REEL_RECAP_DISPLAY_FONT")
                    .unwrap_or_else(|_| "./fonts/display.ttf".to_string()),
                heading_path: env::var("REEL_RECAP_HEADING_FONT")
                    .unwrap_or_else(|_| "./fonts/heading.ttf".to_string()),
            },
            diary_base_url: env::var("REEL_RECAP_DIARY_BASE_URL")
                .unwrap_or_else(|_| "https://letterboxd.com".to_string()),
            diary_floor_year: env::var("REEL_RECAP_DIARY_FLOOR_YEAR")
                .unwrap_or_else(|_| "2018".to_string())
                .parse()?,
            search_api_key: env::var("REEL_RECAP_SEARCH_API_KEY").ok(),
            search_engine_id: env::var("REEL_RECAP_SEARCH_ENGINE_ID")
                .unwrap_or_else(|_| "117249e9d52ed43b5".to_string()),
        })
    }
}
