use serde::{Deserialize, Serialize};

/// BM25+ parameters
pub const K1: f32 = 1.2;
pub const B: f32 = 0.75;
pub const DELTA: f32 = 1.0;

/// Weight of title matches relative to body matches
pub const NAME_BOOST: f32 = 2.5;

pub const DEFAULT_MAX_RESULTS: usize = 20;

/// Snippet window sizes, in characters
pub const SNIPPET_BEFORE: usize = 20;
pub const SNIPPET_AFTER: usize = 40;
pub const SNIPPET_FALLBACK: usize = 60;

/// Engine configuration, deserialized from the host's config JSON.
/// Missing keys fall back to the defaults above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub k1: f32,
    pub b: f32,
    pub delta: f32,
    pub name_boost: f32,
    pub max_results: usize,
    pub snippet_before: usize,
    pub snippet_after: usize,
    pub snippet_fallback: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            k1: K1,
            b: B,
            delta: DELTA,
            name_boost: NAME_BOOST,
            max_results: DEFAULT_MAX_RESULTS,
            snippet_before: SNIPPET_BEFORE,
            snippet_after: SNIPPET_AFTER,
            snippet_fallback: SNIPPET_FALLBACK,
        }
    }
}

impl EngineConfig {
    /// Parse a config JSON string; blank input means all defaults.
    /// Parameters outside their valid range are rejected.
    pub fn from_json(config_json: &str) -> Result<Self, serde_json::Error> {
        if config_json.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_str(config_json)?;
        config
            .validate()
            .map_err(<serde_json::Error as serde::de::Error>::custom)?;
        Ok(config)
    }

    /// Check that every scoring parameter is finite and in range
    pub fn validate(&self) -> Result<(), String> {
        let checks = [
            ("k1", self.k1, self.k1 >= 0.0),
            ("b", self.b, (0.0..=1.0).contains(&self.b)),
            ("delta", self.delta, self.delta >= 0.0),
            ("nameBoost", self.name_boost, self.name_boost >= 0.0),
        ];
        for (key, value, in_range) in checks {
            if !value.is_finite() || !in_range {
                return Err(format!("invalid value for `{}`: {}", key, value));
            }
        }
        Ok(())
    }
}
