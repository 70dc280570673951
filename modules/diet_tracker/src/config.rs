use serde::{Deserialize, Serialize};

/// Configuration for the diet_tracker module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DietTrackerConfig {
    #[serde(default = "default_session_cookie_name")]
    pub session_cookie_name: String,
    #[serde(default = "default_session_max_age_days")]
    pub session_max_age_days: i64,
    #[serde(default = "default_max_name_length")]
    pub max_name_length: usize,
    #[serde(default = "default_max_description_length")]
    pub max_description_length: usize,
}

impl Default for DietTrackerConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: default_session_cookie_name(),
            session_max_age_days: default_session_max_age_days(),
            max_name_length: default_max_name_length(),
            max_description_length: default_max_description_length(),
        }
    }
}

fn default_session_cookie_name() -> String {
    "sessionId".to_string()
}

fn default_session_max_age_days() -> i64 {
    7
}

fn default_max_name_length() -> usize {
    255
}

fn default_max_description_length() -> usize {
    4096
}
