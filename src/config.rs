use serde::Deserialize;

/// Application configuration loaded from environment variables
///
/// Built once at startup and passed by reference into every component;
/// nothing reads the process environment after this.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Plex server base URL
    pub plex_url: String,

    /// Plex authentication token
    pub plex_token: String,

    /// OpenAI API key
    pub openai_key: String,

    /// OpenAI API base URL
    #[serde(default = "default_openai_api_url")]
    pub openai_api_url: String,

    /// Model identifier for recommendation queries
    pub openai_model: String,

    /// Library names to process, comma-separated in the environment
    pub library_names: Vec<String>,

    /// Title of the curated collection
    pub collection_title: String,

    /// How many watch-history entries to fetch per library
    pub history_amount: u32,

    /// How many recommendations to ask the model for
    pub recommended_amount: u32,

    /// Minimum number of matched titles before the collection is touched.
    /// The gate is strict: exactly this many matches is not enough.
    pub minimum_amount: usize,

    /// Seconds to sleep between cycles
    #[serde(default = "default_seconds_to_wait")]
    pub seconds_to_wait: u64,
}

fn default_openai_api_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_seconds_to_wait() -> u64 {
    43200
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
