use serde::Deserialize;

use crate::error::ConfigError;

#[cfg(debug_assertions)]
pub fn get_backend_url() -> &'static str {
    "http://localhost:3001"  // Development URL when running locally
}

#[cfg(not(debug_assertions))]
pub fn get_backend_url() -> &'static str {
    ""  // Production URL
}

/// Everything the landing runtime needs to know about the page it runs on.
///
/// Built once at startup and shared read-only afterwards. All fields have
/// defaults matching the stock landing markup, so a JSON override only has
/// to name what differs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub api_endpoints: ApiEndpoints,
    pub backend_url: String,
    pub images_folder: String,
    pub routes: Routes,
    pub create_buttons: Vec<String>,
    pub reveal: RevealConfig,
    pub parallax: ParallaxConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiEndpoints {
    pub register: String,
    pub login: String,
    pub google_auth: String,
}

/// Real destinations for the navigation actions. `None` keeps the
/// "not implemented yet" notification.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Routes {
    pub create_club: Option<String>,
    pub login: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RevealConfig {
    pub selectors: Vec<String>,
    pub revealed_class: String,
    pub threshold: f64,
    pub root_margin: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParallaxConfig {
    pub enabled: bool,
    pub selectors: Vec<String>,
    pub speed: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_endpoints: ApiEndpoints::default(),
            backend_url: get_backend_url().to_string(),
            images_folder: "images/".to_string(),
            routes: Routes::default(),
            create_buttons: vec![
                "header-create-button".to_string(),
                "hero-create-button".to_string(),
                "final-cta-button".to_string(),
            ],
            reveal: RevealConfig::default(),
            parallax: ParallaxConfig::default(),
        }
    }
}

impl Default for ApiEndpoints {
    fn default() -> Self {
        Self {
            register: "/api/register".to_string(),
            login: "/api/login".to_string(),
            google_auth: "/api/auth/google".to_string(),
        }
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selectors: vec![".feature-section".to_string(), ".benefit-card".to_string()],
            revealed_class: "animate-in".to_string(),
            threshold: 0.1,
            root_margin: "0px 0px -50px 0px".to_string(),
        }
    }
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            selectors: vec![".decorative-bg".to_string(), ".cta-decorative-bg".to_string()],
            speed: 0.5,
        }
    }
}

impl Config {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Joins selectors into one selector list, `.a, .b`.
pub fn selector_list(selectors: &[String]) -> String {
    selectors.join(", ")
}
