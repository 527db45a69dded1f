pub(crate) const MESSAGE: &str = "MESSAGE";
pub(crate) const SLACK_WEBHOOK_URL: &str = "SLACK_WEBHOOK_URL";
pub(crate) const SLACK_CHANNEL: &str = "SLACK_CHANNEL";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub(crate) enum ConfigError {
    #[error("{0} environment variable is not set")]
    Missing(&'static str),
}

pub(crate) struct Config {
    pub(crate) message: String,
    pub(crate) webhook_url: String,
    pub(crate) channel: String,
}

// The webhook url is the only credential, keep it out of the logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("message", &self.message)
            .field("webhook_url", &"<redacted>")
            .field("channel", &self.channel)
            .finish()
    }
}

impl Config {
    /// Reads the configuration from the process environment. A `.env` file in the
    /// working directory is picked up if present but never overrides set variables.
    pub(crate) fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::info!(path =? path, "Loaded .env file"),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!(error =? e, "Failed to load .env file"),
        }

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Fails on the first variable, in declaration order, that is unset or empty.
    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        Ok(Self {
            message: required(MESSAGE)?,
            webhook_url: required(SLACK_WEBHOOK_URL)?,
            channel: required(SLACK_CHANNEL)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: std::collections::HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_from_lookup_all_set() {
        let config = Config::from_lookup(env(&[
            (MESSAGE, "build failed"),
            (SLACK_WEBHOOK_URL, "https://hooks.example/services/x"),
            (SLACK_CHANNEL, "#ci"),
        ]))
        .unwrap();

        assert_eq!(config.message, "build failed");
        assert_eq!(config.webhook_url, "https://hooks.example/services/x");
        assert_eq!(config.channel, "#ci");
    }

    #[test]
    fn test_from_lookup_reports_each_missing_variable() {
        let full = [
            (MESSAGE, "hello"),
            (SLACK_WEBHOOK_URL, "https://hooks.example/services/x"),
            (SLACK_CHANNEL, "#general"),
        ];

        for missing in [MESSAGE, SLACK_WEBHOOK_URL, SLACK_CHANNEL] {
            let unset: Vec<_> = full.iter().copied().filter(|(k, _)| *k != missing).collect();
            let err = Config::from_lookup(env(&unset)).unwrap_err();
            assert_eq!(err, ConfigError::Missing(missing));

            let empty: Vec<_> = full
                .iter()
                .map(|&(k, v)| if k == missing { (k, "") } else { (k, v) })
                .collect();
            let err = Config::from_lookup(env(&empty)).unwrap_err();
            assert_eq!(err, ConfigError::Missing(missing));
        }
    }

    #[test]
    fn test_first_missing_variable_wins() {
        let err = Config::from_lookup(env(&[])).unwrap_err();
        assert_eq!(err.to_string(), "MESSAGE environment variable is not set");

        let err = Config::from_lookup(env(&[(MESSAGE, "hi")])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "SLACK_WEBHOOK_URL environment variable is not set"
        );
    }

    #[test]
    fn test_values_are_not_trimmed() {
        let config = Config::from_lookup(env(&[
            (MESSAGE, "  padded "),
            (SLACK_WEBHOOK_URL, "https://hooks.example/services/x"),
            (SLACK_CHANNEL, " "),
        ]))
        .unwrap();

        assert_eq!(config.message, "  padded ");
        assert_eq!(config.channel, " ");
    }

    #[test]
    fn test_debug_redacts_webhook_url() {
        let config = Config::from_lookup(env(&[
            (MESSAGE, "hello"),
            (SLACK_WEBHOOK_URL, "https://hooks.example/services/T000/B000/secret"),
            (SLACK_CHANNEL, "#general"),
        ]))
        .unwrap();

        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
        assert!(debug.contains("#general"));
    }
}
