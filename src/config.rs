//! Configuration constants and profile loading for fetchline
//!
//! Profiles live in an INI file, one section per profile name:
//!
//! ```ini
//! [default]
//! photos_url = https://jsonplaceholder.typicode.com/photos
//! photos_limit = 10
//! geocoding_url = http://api.openweathermap.org/geo/1.0/direct
//! geocoding_limit = 5
//! api_key = 0123456789abcdef
//! ```
//!
//! Every key is optional. A missing file or section yields the defaults.

use crate::endpoints::geocoding::{DEFAULT_GEOCODING_LIMIT, DEFAULT_GEOCODING_URL};
use crate::endpoints::photos::{DEFAULT_PHOTOS_LIMIT, DEFAULT_PHOTOS_URL};
use anyhow::{Context, Result};
use ini::{Ini, Properties};
use std::path::Path;
use url::Url;

/// Default profile file path for fetchline
pub const DEFAULT_PROFILE_PATH: &str = "~/.fetchline/profile";

/// Environment variable name for overriding the profile path
pub const PROFILE_PATH_ENV_VAR: &str = "FETCHLINE_PROFILE_PATH";

/// Environment variable holding the OpenWeather API key; wins over the profile
pub const API_KEY_ENV_VAR: &str = "OPENWEATHER_API_KEY";

/// Get the profile file path, checking environment variable first, then falling back to default
pub fn get_profile_path() -> String {
    std::env::var_os(PROFILE_PATH_ENV_VAR)
        .and_then(|val| val.into_string().ok())
        .unwrap_or_else(|| DEFAULT_PROFILE_PATH.to_string())
}

/// Read the API key from the environment. Empty values count as unset.
pub fn api_key_from_env() -> Option<String> {
    std::env::var(API_KEY_ENV_VAR)
        .ok()
        .filter(|key| !key.trim().is_empty())
}

/// Endpoint settings for one profile
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub photos_url: Url,
    pub photos_limit: u32,
    pub geocoding_url: Url,
    pub geocoding_limit: u32,
    pub api_key: Option<String>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            photos_url: default_url(DEFAULT_PHOTOS_URL),
            photos_limit: DEFAULT_PHOTOS_LIMIT,
            geocoding_url: default_url(DEFAULT_GEOCODING_URL),
            geocoding_limit: DEFAULT_GEOCODING_LIMIT,
            api_key: None,
        }
    }
}

impl Profile {
    /// Replace the API key when an override is present
    pub fn with_api_key_override(mut self, api_key: Option<String>) -> Self {
        if api_key.is_some() {
            self.api_key = api_key;
        }
        self
    }

    fn from_section(name: &str, section: &Properties) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            photos_url: parse_url(name, section, "photos_url")?.unwrap_or(defaults.photos_url),
            photos_limit: parse_limit(name, section, "photos_limit")?
                .unwrap_or(defaults.photos_limit),
            geocoding_url: parse_url(name, section, "geocoding_url")?
                .unwrap_or(defaults.geocoding_url),
            geocoding_limit: parse_limit(name, section, "geocoding_limit")?
                .unwrap_or(defaults.geocoding_limit),
            api_key: section
                .get("api_key")
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .map(str::to_string),
        })
    }
}

/// Profile store backed by an INI file
#[derive(Debug, Clone)]
pub struct IniProfileStore {
    path: String,
}

impl IniProfileStore {
    /// `~` and environment variables in the path are expanded
    pub fn new(path: &str) -> Self {
        Self {
            path: shellexpand::full(path)
                .map(|expanded| expanded.into_owned())
                .unwrap_or_else(|_| path.to_string()),
        }
    }

    /// Look up a profile by name. `Ok(None)` when the file or section is missing.
    pub fn get_profile(&self, name: &str) -> Result<Option<Profile>> {
        if !Path::new(&self.path).exists() {
            tracing::debug!("Profile file '{}' does not exist", self.path);
            return Ok(None);
        }

        let ini = Ini::load_from_file(&self.path)
            .with_context(|| format!("failed to read profile file '{}'", self.path))?;

        match ini.section(Some(name)) {
            Some(section) => Profile::from_section(name, section).map(Some),
            None => Ok(None),
        }
    }
}

/// Load a profile, falling back to the defaults when it is not configured
pub fn load_profile(profile_name: &str, profile_path: &str) -> Result<Profile> {
    tracing::debug!("Loading profile '{}' from '{}'", profile_name, profile_path);

    let store = IniProfileStore::new(profile_path);
    let profile = match store.get_profile(profile_name)? {
        Some(profile) => {
            tracing::debug!("Profile '{}' loaded", profile_name);
            profile
        }
        None => {
            tracing::debug!("Profile '{}' not found, using defaults", profile_name);
            Profile::default()
        }
    };

    Ok(profile.with_api_key_override(api_key_from_env()))
}

fn default_url(url: &str) -> Url {
    #[allow(clippy::expect_used)]
    Url::parse(url).expect("built-in endpoint URL is valid")
}

fn parse_url(profile: &str, section: &Properties, key: &str) -> Result<Option<Url>> {
    section
        .get(key)
        .map(|value| {
            Url::parse(value.trim())
                .with_context(|| format!("profile '{profile}': invalid {key} '{value}'"))
        })
        .transpose()
}

fn parse_limit(profile: &str, section: &Properties, key: &str) -> Result<Option<u32>> {
    section
        .get(key)
        .map(|value| {
            value
                .trim()
                .parse::<u32>()
                .with_context(|| format!("profile '{profile}': invalid {key} '{value}'"))
        })
        .transpose()
}
