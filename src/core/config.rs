//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.sdg-chat/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//!
//! The `[strings]` table holds every fixed text the widget shows, so the
//! assistant can be re-worded or localized without a rebuild.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SdgChatConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub strings: StringsConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub endpoint: Option<String>,
    pub typing_interval_ms: Option<u64>,
    pub fallback_release_delay_ms: Option<u64>,
    pub focus_settle_ms: Option<u64>,
    pub copy_feedback_ms: Option<u64>,
    pub fallback_release: Option<FallbackRelease>,
    pub cancel_render_on_close: Option<bool>,
    pub lock_during_greeting: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StringsConfig {
    pub assistant_name: Option<String>,
    pub greeting: Option<String>,
    pub fallback: Option<String>,
    pub quick_questions_title: Option<String>,
    pub quick_questions: Option<Vec<String>>,
    pub placeholder_enabled: Option<String>,
    pub placeholder_disabled: Option<String>,
}

/// When the session is released after a failed request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackRelease {
    /// A fixed delay after the fallback message is appended, or when its
    /// render finishes if that comes first.
    #[default]
    Delay,
    /// Only when the fallback message finishes rendering, like a normal reply.
    Render,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_ENDPOINT: &str = "https://dmiowkdi.nutt.live/chat";
pub const DEFAULT_TYPING_INTERVAL_MS: u64 = 3;
pub const DEFAULT_FALLBACK_RELEASE_DELAY_MS: u64 = 1000;
pub const DEFAULT_FOCUS_SETTLE_MS: u64 = 300;
pub const DEFAULT_COPY_FEEDBACK_MS: u64 = 1000;

const DEFAULT_ASSISTANT_NAME: &str = "AI x SDGs";
const DEFAULT_GREETING: &str = "您好！\n\n歡迎使用大葉大學 SDGs AI 助理！\n\n您可以點擊下方常見問題進行快速提問，或直接輸入您的問題，我將竭誠為您解答！";
const DEFAULT_FALLBACK: &str = "抱歉，我現在無法回應。請稍後再試。";
const DEFAULT_QUICK_QUESTIONS_TITLE: &str = "快速提問：";
const DEFAULT_QUICK_QUESTIONS: [&str; 3] = [
    "大葉大學的校園綠化牆有哪些特色？",
    "大葉大學的校園綠化牆如何實踐永續發展？",
    "作為一個學生，我可以如何以行動支持永續發展？",
];
const DEFAULT_PLACEHOLDER_ENABLED: &str = "點此輸入您的問題...";
const DEFAULT_PLACEHOLDER_DISABLED: &str = "AI 助手正在回應中...";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

/// Every fixed text shown by the chat widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strings {
    pub assistant_name: String,
    pub greeting: String,
    pub fallback: String,
    pub quick_questions_title: String,
    pub quick_questions: Vec<String>,
    pub placeholder_enabled: String,
    pub placeholder_disabled: String,
}

impl Default for Strings {
    fn default() -> Self {
        Self {
            assistant_name: DEFAULT_ASSISTANT_NAME.to_string(),
            greeting: DEFAULT_GREETING.to_string(),
            fallback: DEFAULT_FALLBACK.to_string(),
            quick_questions_title: DEFAULT_QUICK_QUESTIONS_TITLE.to_string(),
            quick_questions: DEFAULT_QUICK_QUESTIONS.iter().map(|q| q.to_string()).collect(),
            placeholder_enabled: DEFAULT_PLACEHOLDER_ENABLED.to_string(),
            placeholder_disabled: DEFAULT_PLACEHOLDER_DISABLED.to_string(),
        }
    }
}

/// Session timings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Delay between typewriter emissions.
    pub typing_interval: Duration,
    /// Error path: delay between appending the fallback and releasing input.
    pub fallback_release_delay: Duration,
    /// Delay between opening the widget and focusing the composer.
    pub focus_settle: Duration,
    /// How long the "copied" confirmation stays up.
    pub copy_feedback: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            typing_interval: Duration::from_millis(DEFAULT_TYPING_INTERVAL_MS),
            fallback_release_delay: Duration::from_millis(DEFAULT_FALLBACK_RELEASE_DELAY_MS),
            focus_settle: Duration::from_millis(DEFAULT_FOCUS_SETTLE_MS),
            copy_feedback: Duration::from_millis(DEFAULT_COPY_FEEDBACK_MS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub endpoint: String,
    pub timing: Timing,
    pub fallback_release: FallbackRelease,
    pub cancel_render_on_close: bool,
    /// Whether the composer stays disabled while the greeting types out.
    pub lock_during_greeting: bool,
    pub strings: Strings,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timing: Timing::default(),
            fallback_release: FallbackRelease::default(),
            cancel_render_on_close: false,
            lock_during_greeting: true,
            strings: Strings::default(),
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.sdg-chat/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".sdg-chat").join("config.toml"))
}

/// Load config from `~/.sdg-chat/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `SdgChatConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<SdgChatConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(SdgChatConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(SdgChatConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: SdgChatConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    let default_content = r#"# SDGs chat assistant configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# endpoint = "https://dmiowkdi.nutt.live/chat"   # Or set SDG_CHAT_ENDPOINT
# typing_interval_ms = 3
# fallback_release_delay_ms = 1000
# focus_settle_ms = 300
# copy_feedback_ms = 1000
# fallback_release = "delay"        # "delay" or "render"
# cancel_render_on_close = false
# lock_during_greeting = true       # false keeps the composer usable while the greeting types

# [strings]
# assistant_name = "AI x SDGs"
# greeting = "您好！\n\n歡迎使用大葉大學 SDGs AI 助理！\n\n您可以點擊下方常見問題進行快速提問，或直接輸入您的問題，我將竭誠為您解答！"
# fallback = "抱歉，我現在無法回應。請稍後再試。"
# quick_questions_title = "快速提問："
# quick_questions = [
#     "大葉大學的校園綠化牆有哪些特色？",
#     "大葉大學的校園綠化牆如何實踐永續發展？",
#     "作為一個學生，我可以如何以行動支持永續發展？",
# ]
# placeholder_enabled = "點此輸入您的問題..."
# placeholder_disabled = "AI 助手正在回應中..."
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_endpoint` and `cli_typing_interval_ms` come from CLI flags (None = not specified).
pub fn resolve(
    config: &SdgChatConfig,
    cli_endpoint: Option<&str>,
    cli_typing_interval_ms: Option<u64>,
) -> ResolvedConfig {
    // Endpoint: CLI → env → config → default
    let endpoint = cli_endpoint
        .map(|s| s.to_string())
        .or_else(|| std::env::var("SDG_CHAT_ENDPOINT").ok())
        .or_else(|| config.general.endpoint.clone())
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

    let general = &config.general;
    let millis = |value: Option<u64>, default: u64| Duration::from_millis(value.unwrap_or(default));

    let timing = Timing {
        typing_interval: millis(
            cli_typing_interval_ms.or(general.typing_interval_ms),
            DEFAULT_TYPING_INTERVAL_MS,
        ),
        fallback_release_delay: millis(
            general.fallback_release_delay_ms,
            DEFAULT_FALLBACK_RELEASE_DELAY_MS,
        ),
        focus_settle: millis(general.focus_settle_ms, DEFAULT_FOCUS_SETTLE_MS),
        copy_feedback: millis(general.copy_feedback_ms, DEFAULT_COPY_FEEDBACK_MS),
    };

    ResolvedConfig {
        endpoint,
        timing,
        fallback_release: general.fallback_release.unwrap_or_default(),
        cancel_render_on_close: general.cancel_render_on_close.unwrap_or(false),
        lock_during_greeting: general.lock_during_greeting.unwrap_or(true),
        strings: resolve_strings(&config.strings),
    }
}

/// Each configured string replaces its default; missing ones keep the default.
fn resolve_strings(config: &StringsConfig) -> Strings {
    let defaults = Strings::default();
    let pick = |value: &Option<String>, default: String| value.clone().unwrap_or(default);

    let quick_questions = match &config.quick_questions {
        Some(questions) if questions.iter().any(|q| q.trim().is_empty()) => {
            warn!("Ignoring blank entries in strings.quick_questions");
            questions
                .iter()
                .filter(|q| !q.trim().is_empty())
                .cloned()
                .collect()
        }
        Some(questions) => questions.clone(),
        None => defaults.quick_questions,
    };

    Strings {
        assistant_name: pick(&config.assistant_name, defaults.assistant_name),
        greeting: pick(&config.greeting, defaults.greeting),
        fallback: pick(&config.fallback, defaults.fallback),
        quick_questions_title: pick(&config.quick_questions_title, defaults.quick_questions_title),
        quick_questions,
        placeholder_enabled: pick(&config.placeholder_enabled, defaults.placeholder_enabled),
        placeholder_disabled: pick(&config.placeholder_disabled, defaults.placeholder_disabled),
    }
}
