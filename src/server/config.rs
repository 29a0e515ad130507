//! Server configuration types
//!
//! Contains all configuration structures for the Cadence server.

use cadence_core::{BehaviorProfile, DelayPolicy, QuotaPolicy, RelayConfig, Viewport};
use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub admission: AdmissionSettings,
    #[serde(default)]
    pub behavior: BehaviorProfile,
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default)]
    pub executor: ExecutorSettings,
    #[serde(default)]
    pub llm: LlmSettings,
}

/// HTTP listener
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8090
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Quota and spacing limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmissionSettings {
    /// Maximum published comments per calendar day
    #[serde(default = "default_daily_cap")]
    pub daily_cap: u32,
    /// Minutes east of UTC for the daily reset
    #[serde(default)]
    pub utc_offset_minutes: i32,
    /// Minimum spacing between published comments
    #[serde(default = "default_min_gap_ms")]
    pub min_gap_ms: u64,
    /// Maximum spacing between published comments
    #[serde(default = "default_max_gap_ms")]
    pub max_gap_ms: u64,
}

fn default_daily_cap() -> u32 {
    QuotaPolicy::default().daily_cap
}
fn default_min_gap_ms() -> u64 {
    DelayPolicy::default().min_gap_ms
}
fn default_max_gap_ms() -> u64 {
    DelayPolicy::default().max_gap_ms
}

impl Default for AdmissionSettings {
    fn default() -> Self {
        Self {
            daily_cap: default_daily_cap(),
            utc_offset_minutes: 0,
            min_gap_ms: default_min_gap_ms(),
            max_gap_ms: default_max_gap_ms(),
        }
    }
}

impl AdmissionSettings {
    pub fn quota(&self) -> QuotaPolicy {
        QuotaPolicy {
            daily_cap: self.daily_cap,
            utc_offset_minutes: self.utc_offset_minutes,
        }
    }

    pub fn delay(&self) -> DelayPolicy {
        DelayPolicy::new(self.min_gap_ms, self.max_gap_ms)
    }
}

/// Which executor performs the plans
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutorKind {
    #[default]
    DryRun,
    Relay,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorSettings {
    #[serde(default)]
    pub kind: ExecutorKind,
    /// Dry-run delay multiplier
    #[serde(default = "default_time_scale")]
    pub time_scale: f64,
    #[serde(default)]
    pub relay: RelayConfig,
}

fn default_time_scale() -> f64 {
    1.0
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self {
            kind: ExecutorKind::default(),
            time_scale: default_time_scale(),
            relay: RelayConfig::default(),
        }
    }
}

/// Which comment generator to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmProviderKind {
    #[default]
    OpenaiCompat,
    Mock,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    #[serde(default)]
    pub provider: LlmProviderKind,
    /// Falls back to CADENCE_LLM_API_KEY when unset
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_llm_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_llm_temperature")]
    pub temperature: f32,
}

fn default_llm_base_url() -> String {
    cadence_llm::openai_compat::DEFAULT_API_BASE.to_string()
}
fn default_llm_model() -> String {
    cadence_llm::openai_compat::DEFAULT_MODEL.to_string()
}
fn default_llm_timeout_secs() -> u64 {
    60
}
fn default_llm_max_tokens() -> u32 {
    300
}
fn default_llm_temperature() -> f32 {
    0.8
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: LlmProviderKind::default(),
            api_key: None,
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            timeout_secs: default_llm_timeout_secs(),
            max_tokens: default_llm_max_tokens(),
            temperature: default_llm_temperature(),
        }
    }
}

// Keep the key out of logs
impl std::fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmSettings")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "****"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}
