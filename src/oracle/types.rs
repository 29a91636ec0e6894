use serde::Deserialize;
use std::time::Duration;

/// Connection parameters for the scoring oracle
#[derive(Debug, Clone)]
pub struct OracleParams {
    pub api_key: String,
    /// Model name, e.g. "gemini-2.5-flash"
    pub model: String,
    /// Upper bound on one scoring call
    pub timeout: Duration,
    /// Base URL of the generative language API
    pub endpoint: String,
}

impl OracleParams {
    /// Value shipped in the sample `.env`; treated as "not configured"
    pub const PLACEHOLDER_KEY: &'static str = "your_gemini_api_key_here";
}

impl Default for OracleParams {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gemini-2.5-flash".to_string(),
            timeout: Duration::from_secs(20),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }
}

/// One ranked entry returned by the oracle
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OracleScore {
    /// Zero-based position in the job list sent to the oracle
    #[serde(default)]
    pub job_index: i64,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub reason: String,
}
