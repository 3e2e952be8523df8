//! Service configuration, read once at startup from `FIRSTDATE_*`
//! environment variables.

use std::net::SocketAddr;

use jiff::civil::Date;
use thiserror::Error;
use tracing::info;

use firstdate_auth::forms::EmailPolicy;
use firstdate_questionnaire::QuestionnaireSettings;
use firstdate_storage::client::AppwriteConfig;
use firstdate_storage::documents::CollectionRef;
use firstdate_storage::pagination::PAGE_SIZE;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} is required when FIRSTDATE_BACKEND=appwrite")]
    Missing { key: &'static str },

    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// The hosted Appwrite project.
    Appwrite,
    /// In-process stores; nothing survives a restart.
    Memory,
}

/// A local admin account seeded into the in-memory account store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevAdmin {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// Public origin of the web UI, used to build emailed links.
    pub origin: String,
    pub backend: BackendKind,
    pub appwrite: Option<AppwriteConfig>,
    pub questionnaire_collection: CollectionRef,
    pub email_policy: EmailPolicy,
    pub questionnaire: QuestionnaireSettings,
    pub page_size: usize,
    pub dev_admin: Option<DevAdmin>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok().filter(|v| !v.trim().is_empty()))
    }

    /// Build the config from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &'static str, default: &str| -> String {
            lookup(key).unwrap_or_else(|| {
                info!("{key} not set, using default: {default}");
                default.to_string()
            })
        };

        let bind_addr = parse("FIRSTDATE_BIND_ADDR", get("FIRSTDATE_BIND_ADDR", "0.0.0.0:8080"))?;

        let backend = match get("FIRSTDATE_BACKEND", "appwrite").to_ascii_lowercase().as_str() {
            "appwrite" => BackendKind::Appwrite,
            "memory" => BackendKind::Memory,
            other => {
                return Err(ConfigError::Invalid {
                    key: "FIRSTDATE_BACKEND",
                    value: other.to_string(),
                    reason: "expected `appwrite` or `memory`".to_string(),
                });
            }
        };

        let appwrite = match backend {
            BackendKind::Appwrite => {
                let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing { key });
                Some(AppwriteConfig {
                    endpoint: required("FIRSTDATE_APPWRITE_ENDPOINT")?,
                    project_id: required("FIRSTDATE_APPWRITE_PROJECT_ID")?,
                    api_key: Some(required("FIRSTDATE_APPWRITE_API_KEY")?),
                })
            }
            BackendKind::Memory => None,
        };

        let email_policy = match lookup("FIRSTDATE_EMAIL_DOMAINS") {
            Some(raw) => EmailPolicy {
                domains: split_list(&raw).map(str::to_ascii_lowercase).collect(),
            },
            None => EmailPolicy::default(),
        };

        let questionnaire = match lookup("FIRSTDATE_EVENT_DATES") {
            Some(raw) => QuestionnaireSettings {
                event_dates: split_list(&raw)
                    .map(|d| parse::<Date>("FIRSTDATE_EVENT_DATES", d.to_string()))
                    .collect::<Result<_, _>>()?,
            },
            None => QuestionnaireSettings::default(),
        };

        let page_size: usize = parse("FIRSTDATE_PAGE_SIZE", get("FIRSTDATE_PAGE_SIZE", &PAGE_SIZE.to_string()))?;
        if page_size == 0 {
            return Err(ConfigError::Invalid {
                key: "FIRSTDATE_PAGE_SIZE",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let dev_admin = match (lookup("FIRSTDATE_DEV_ADMIN_EMAIL"), lookup("FIRSTDATE_DEV_ADMIN_PASSWORD")) {
            (Some(email), Some(password)) if backend == BackendKind::Memory => Some(DevAdmin { email, password }),
            _ => None,
        };

        Ok(Self {
            bind_addr,
            origin: get("FIRSTDATE_ORIGIN", "http://localhost:3000"),
            backend,
            appwrite,
            questionnaire_collection: CollectionRef::new(
                get("FIRSTDATE_DATABASE_ID", "firstdate"),
                get("FIRSTDATE_QUESTIONNAIRE_COLLECTION_ID", "questionnaire"),
            ),
            email_policy,
            questionnaire,
            page_size,
            dev_admin,
        })
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn parse<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use jiff::civil::date;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn memory_backend_needs_no_credentials() {
        let config = config(&[("FIRSTDATE_BACKEND", "memory")]).unwrap();
        assert_eq!(config.backend, BackendKind::Memory);
        assert!(config.appwrite.is_none());
        assert_eq!(config.page_size, 25);
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.email_policy, EmailPolicy::default());
        assert_eq!(config.questionnaire.event_dates, [date(2024, 11, 21), date(2024, 11, 22)]);
    }

    #[test]
    fn appwrite_backend_requires_credentials() {
        let err = config(&[("FIRSTDATE_APPWRITE_ENDPOINT", "https://cloud.appwrite.io/v1")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { key: "FIRSTDATE_APPWRITE_PROJECT_ID" }));

        let config = config(&[
            ("FIRSTDATE_APPWRITE_ENDPOINT", "https://cloud.appwrite.io/v1"),
            ("FIRSTDATE_APPWRITE_PROJECT_ID", "proj"),
            ("FIRSTDATE_APPWRITE_API_KEY", "key"),
        ])
        .unwrap();
        assert_eq!(config.appwrite.unwrap().api_key.as_deref(), Some("key"));
    }

    #[test]
    fn lists_are_parsed() {
        let config = config(&[
            ("FIRSTDATE_BACKEND", "memory"),
            ("FIRSTDATE_EMAIL_DOMAINS", "Example.ac.uk, other.ac.uk"),
            ("FIRSTDATE_EVENT_DATES", "2025-02-13,2025-02-14"),
        ])
        .unwrap();
        assert_eq!(config.email_policy.domains, ["example.ac.uk", "other.ac.uk"]);
        assert_eq!(config.questionnaire.event_dates, [date(2025, 2, 13), date(2025, 2, 14)]);
    }

    #[test]
    fn bad_values_are_reported() {
        assert!(matches!(
            config(&[("FIRSTDATE_BACKEND", "postgres")]),
            Err(ConfigError::Invalid { key: "FIRSTDATE_BACKEND", .. })
        ));
        assert!(matches!(
            config(&[("FIRSTDATE_BACKEND", "memory"), ("FIRSTDATE_EVENT_DATES", "next friday")]),
            Err(ConfigError::Invalid { key: "FIRSTDATE_EVENT_DATES", .. })
        ));
    }
}
