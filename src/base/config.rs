//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, sync::Arc};

use serde::Deserialize;

use crate::base::prompts;

use super::types::Res;

/// Default policy page to scrape at startup.
fn default_policy_url() -> String {
    "https://resources.workable.com/company-holiday-policy".to_string()
}

/// Default marker phrase where the useful policy text begins.
fn default_policy_marker() -> String {
    "Policy brief & purpose".to_string()
}

/// Default chat-completions endpoint (OpenRouter, OpenAI-compatible).
fn default_completion_endpoint() -> String {
    "https://openrouter.ai/api/v1/chat/completions".to_string()
}

/// Default completion model to use.
fn default_completion_model() -> String {
    "gpt-3.5-turbo".to_string()
}

/// Default max output tokens for the completion model.
fn default_completion_max_tokens() -> u32 {
    500
}

/// Default sampling temperature; low, to favor factual answers.
fn default_completion_temperature() -> f32 {
    0.3
}

/// Default total timeout for one completion call, in seconds.
fn default_completion_timeout_secs() -> u64 {
    120
}

fn default_completion_referer() -> String {
    "Slack-AI-Assistant".to_string()
}

fn default_completion_title() -> String {
    "Slack HR Assistant".to_string()
}

/// Default system directive for the completion model.
fn default_system_directive() -> String {
    prompts::SYSTEM_DIRECTIVE.to_string()
}

/// Configuration for the holiday policy bot.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ConfigInner {
    /// Completion API key (`OPENAI_API_KEY`).
    pub openai_api_key: String,
    /// Slack app-level token used for Socket Mode (`SLACK_APP_TOKEN`).
    pub slack_app_token: String,
    /// Slack bot token (`SLACK_BOT_TOKEN`).
    pub slack_bot_token: String,
    /// Policy page fetched once at startup (`POLICY_URL`).
    #[serde(default = "default_policy_url")]
    pub policy_url: String,
    /// Text before this phrase is dropped from the policy (`POLICY_MARKER`).
    #[serde(default = "default_policy_marker")]
    pub policy_marker: String,
    /// Chat-completions endpoint (`COMPLETION_ENDPOINT`).
    #[serde(default = "default_completion_endpoint")]
    pub completion_endpoint: String,
    /// Completion model name (`COMPLETION_MODEL`).
    #[serde(default = "default_completion_model")]
    pub completion_model: String,
    /// Max output tokens (`COMPLETION_MAX_TOKENS`).
    #[serde(default = "default_completion_max_tokens")]
    pub completion_max_tokens: u32,
    /// Sampling temperature (`COMPLETION_TEMPERATURE`).
    /// Value between 0 and 2. Lower values make output more focused and deterministic.
    #[serde(default = "default_completion_temperature")]
    pub completion_temperature: f32,
    /// Total timeout for one completion call, in seconds (`COMPLETION_TIMEOUT_SECS`).
    #[serde(default = "default_completion_timeout_secs")]
    pub completion_timeout_secs: u64,
    /// Sent as `HTTP-Referer` to identify the app (`COMPLETION_REFERER`).
    #[serde(default = "default_completion_referer")]
    pub completion_referer: String,
    /// Sent as `X-Title` to identify the app (`COMPLETION_TITLE`).
    #[serde(default = "default_completion_title")]
    pub completion_title: String,
    /// Optional custom system directive to override the default (`SYSTEM_DIRECTIVE`).
    #[serde(default = "default_system_directive")]
    pub system_directive: String,
}

impl Default for ConfigInner {
    fn default() -> Self {
        Self {
            openai_api_key: String::new(),
            slack_app_token: String::new(),
            slack_bot_token: String::new(),
            policy_url: default_policy_url(),
            policy_marker: default_policy_marker(),
            completion_endpoint: default_completion_endpoint(),
            completion_model: default_completion_model(),
            completion_max_tokens: default_completion_max_tokens(),
            completion_temperature: default_completion_temperature(),
            completion_timeout_secs: default_completion_timeout_secs(),
            completion_referer: default_completion_referer(),
            completion_title: default_completion_title(),
            system_directive: default_system_directive(),
        }
    }
}

impl Config {
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder();

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        // Environment wins over the file, using the plain variable names (`SLACK_BOT_TOKEN`, ...).
        cfg = cfg.add_source(config::Environment::default());

        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        result.validate()?;

        Ok(result)
    }

    /// Check the loaded values for ranges and required secrets.
    pub fn validate(&self) -> Res<()> {
        if self.completion_temperature < 0.0 || self.completion_temperature > 2.0 {
            return Err(anyhow::anyhow!("Completion temperature must be between 0 and 2."));
        }

        if self.completion_max_tokens < 1 || self.completion_max_tokens > 128000 {
            return Err(anyhow::anyhow!("Completion max tokens must be between 1 and 128000."));
        }

        if self.completion_timeout_secs == 0 {
            return Err(anyhow::anyhow!("Completion timeout must be at least one second."));
        }

        for (name, value) in [
            ("OPENAI_API_KEY", &self.openai_api_key),
            ("SLACK_APP_TOKEN", &self.slack_app_token),
            ("SLACK_BOT_TOKEN", &self.slack_bot_token),
        ] {
            if value.trim().is_empty() {
                return Err(anyhow::anyhow!("{name} must be set."));
            }
        }

        Ok(())
    }
}
