use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_LASTFM_URL: &str = "http://ws.audioscrobbler.com/2.0/";

/// Caps applied by the similar-artist pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationLimits {
    /// Similar artists kept per run; doubled in radio mode
    pub similar_artists: usize,
    pub albums_per_artist: usize,
    pub tracks_per_artist: usize,
    /// Page size requested from Last.fm for top tracks and top albums
    pub fetch_limit: usize,
}

impl Default for GenerationLimits {
    fn default() -> Self {
        Self {
            similar_artists: 5,
            albums_per_artist: 1,
            tracks_per_artist: 2,
            fetch_limit: 5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub plex_url: String,
    pub plex_token: String,
    /// Title of the music library section used for ownership checks
    pub plex_library: String,
    pub lastfm_api_key: String,
    pub lastfm_url: String,
    pub limits: GenerationLimits,
    /// Directory receiving the generated text files
    pub output_dir: PathBuf,
    pub http_timeout: Duration,
    /// Bearer token for mutating routes. Unset means open access.
    pub api_token: Option<String>,
    pub server_host: String,
    pub server_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        match env::var("PLEXMIX_ENV_FILE") {
            Ok(path) => {
                dotenvy::from_path(&path)
                    .map_err(|e| anyhow::anyhow!("Failed to load env file {}: {}", path, e))?;
            }
            Err(_) => {
                dotenvy::dotenv().ok();
            }
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String, anyhow::Error> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| anyhow::anyhow!("{} environment variable must be set", key))
        };

        let defaults = GenerationLimits::default();
        let limits = GenerationLimits {
            similar_artists: positive(&lookup, "SIMARTISTSLIMIT", defaults.similar_artists)?,
            albums_per_artist: positive(&lookup, "ALBLIMIT", defaults.albums_per_artist)?,
            tracks_per_artist: positive(&lookup, "TRCKLIMIT", defaults.tracks_per_artist)?,
            fetch_limit: positive(&lookup, "LFM_FETCH_LIMIT", defaults.fetch_limit)?,
        };

        let plex_url = required("PLEXURL")?.trim_end_matches('/').to_string();

        Ok(Config {
            plex_url,
            plex_token: required("PLEXTOKEN")?,
            plex_library: required("PLEXLIBRARY")?,
            lastfm_api_key: required("LFM_API_KEY")?,
            lastfm_url: lookup("LFM_BASE_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LASTFM_URL.to_string()),
            limits,
            output_dir: lookup("OUTPUT_DIR")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            http_timeout: Duration::from_secs(parse_or(&lookup, "HTTP_TIMEOUT_SECS", 30u64)?),
            api_token: lookup("API_TOKEN").filter(|v| !v.trim().is_empty()),
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            server_port: parse_or(&lookup, "SERVER_PORT", 8000u16)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, anyhow::Error>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a number, got '{}'", key, raw)),
        _ => Ok(default),
    }
}

fn positive<F>(lookup: &F, key: &str, default: usize) -> Result<usize, anyhow::Error>
where
    F: Fn(&str) -> Option<String>,
{
    let value = parse_or(lookup, key, default)?;
    if value == 0 {
        return Err(anyhow::anyhow!("{} must be at least 1", key));
    }
    Ok(value)
}
