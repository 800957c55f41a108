// src/config.rs

use directories::UserDirs;
use lazy_static::lazy_static;
use std::path::PathBuf;
use std::time::Duration;
use strum::{Display, EnumIter, EnumString};
use tracing::warn;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";
/// Language-model analyses routinely take tens of seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

pub const API_URL_ENV: &str = "EMOLETR_API_URL";
pub const TIMEOUT_ENV: &str = "EMOLETR_TIMEOUT_SECS";
pub const EXPORT_DIR_ENV: &str = "EMOLETR_EXPORT_DIR";
pub const LOCALE_ENV: &str = "EMOLETR_LOCALE";

lazy_static! {
    static ref DEFAULT_BASE_URL: Url =
        parse_base_url(DEFAULT_API_BASE_URL).expect("default API base URL is valid");
}

/// Interface languages shipped in `locales/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Locale {
    #[default]
    Fr,
    En,
}

impl Locale {
    /// Makes this locale the one `t!` resolves against.
    pub fn apply(self) {
        rust_i18n::set_locale(&self.to_string());
    }

    pub fn next(self) -> Self {
        match self {
            Locale::Fr => Locale::En,
            Locale::En => Locale::Fr,
        }
    }
}

/// Runtime settings of the client.
///
/// Every value has a built-in default; the environment can override each one.
/// Invalid overrides are logged and ignored.
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: Url,
    pub timeout: Duration,
    pub export_dir: PathBuf,
    /// Locale forced through the environment. When `None` the saved preference wins.
    pub locale: Option<Locale>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(API_URL_ENV)
            .and_then(|raw| match parse_base_url(&raw) {
                Ok(url) => Some(url),
                Err(e) => {
                    warn!(value = %raw, error = %e, "Ignoring invalid {}.", API_URL_ENV);
                    None
                }
            })
            .unwrap_or_else(|| DEFAULT_BASE_URL.clone());

        let timeout = lookup(TIMEOUT_ENV)
            .and_then(|raw| match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Some(secs),
                _ => {
                    warn!(value = %raw, "Ignoring invalid {}.", TIMEOUT_ENV);
                    None
                }
            })
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        let export_dir = lookup(EXPORT_DIR_ENV)
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_export_dir);

        let locale = lookup(LOCALE_ENV).and_then(|raw| match raw.parse::<Locale>() {
            Ok(locale) => Some(locale),
            Err(_) => {
                warn!(value = %raw, "Ignoring unsupported {}.", LOCALE_ENV);
                None
            }
        });

        Self { base_url, timeout, export_dir, locale }
    }

    /// The environment override wins over the saved preference, which wins
    /// over the default. An unknown saved value is ignored.
    pub fn resolve_locale(&self, saved: Option<&str>) -> Locale {
        self.locale
            .or_else(|| saved.and_then(|raw| raw.parse::<Locale>().ok()))
            .unwrap_or_default()
    }
}

/// Parses an http(s) base URL and makes sure its path ends with `/`, so that
/// joining `api/...` keeps any path prefix.
pub fn parse_base_url(raw: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(raw.trim())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(url::ParseError::RelativeUrlWithoutBase);
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Exports land where a browser would put downloads.
fn default_export_dir() -> PathBuf {
    UserDirs::new()
        .and_then(|dirs| dirs.download_dir().map(|d| d.to_path_buf()))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_environment() {
        let settings = Settings::default();
        assert_eq!(settings.base_url.as_str(), "http://localhost:5000/");
        assert_eq!(settings.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert!(settings.locale.is_none());
    }

    #[test]
    fn overrides_are_applied() {
        let settings = Settings::from_lookup(|key| match key {
            API_URL_ENV => Some("https://emoletr.example.org/service".into()),
            TIMEOUT_ENV => Some("30".into()),
            EXPORT_DIR_ENV => Some("/tmp/exports".into()),
            LOCALE_ENV => Some("EN".into()),
            _ => None,
        });
        assert_eq!(settings.base_url.as_str(), "https://emoletr.example.org/service/");
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert_eq!(settings.export_dir, PathBuf::from("/tmp/exports"));
        assert_eq!(settings.locale, Some(Locale::En));
    }

    #[test]
    fn invalid_overrides_fall_back() {
        let settings = Settings::from_lookup(|key| match key {
            API_URL_ENV => Some("ftp://nope".into()),
            TIMEOUT_ENV => Some("0".into()),
            LOCALE_ENV => Some("de".into()),
            _ => None,
        });
        assert_eq!(settings.base_url.as_str(), "http://localhost:5000/");
        assert_eq!(settings.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert!(settings.locale.is_none());
    }

    #[test]
    fn environment_locale_beats_saved_preference() {
        let forced = Settings::from_lookup(|key| (key == LOCALE_ENV).then(|| "fr".to_string()));
        assert_eq!(forced.resolve_locale(Some("en")), Locale::Fr);

        let settings = Settings::default();
        assert_eq!(settings.resolve_locale(Some("en")), Locale::En);
        assert_eq!(settings.resolve_locale(Some("klingon")), Locale::Fr);
        assert_eq!(settings.resolve_locale(None), Locale::Fr);
    }

    #[test]
    fn locale_cycles() {
        assert_eq!(Locale::Fr.next(), Locale::En);
        assert_eq!(Locale::En.next().to_string(), "fr");
    }
}
