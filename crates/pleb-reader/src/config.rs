//! Reader configuration loaded from environment variables.

use std::path::PathBuf;

use anyhow::Context;

/// Reader configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// JSONL note store to load (file or directory).
    pub store_path: PathBuf,

    /// Prefix for links to embedded notes and profiles.
    /// e.g., "https://njump.me"
    pub base_url: String,

    /// Render images inline. When off, image segments become plain links.
    pub auto_load_images: bool,

    /// Maximum number of resolved embeds kept in the cache.
    pub embed_cache_capacity: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `PLEB_STORE_PATH`: JSONL note store (default: "notes.jsonl")
    /// - `PLEB_BASE_URL`: Base URL for embed links (default: "https://njump.me")
    /// - `PLEB_AUTO_LOAD_IMAGES`: Inline images (default: true)
    /// - `PLEB_EMBED_CACHE_CAPACITY`: Embed cache capacity (default: 1000)
    pub fn from_env() -> anyhow::Result<Self> {
        let store_path = std::env::var("PLEB_STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("notes.jsonl"));

        let base_url = std::env::var("PLEB_BASE_URL")
            .unwrap_or_else(|_| "https://njump.me".to_string())
            .trim_end_matches('/')
            .to_string();

        let auto_load_images = match std::env::var("PLEB_AUTO_LOAD_IMAGES") {
            Ok(value) => parse_bool(&value)
                .with_context(|| format!("PLEB_AUTO_LOAD_IMAGES: invalid value '{value}'"))?,
            Err(_) => true,
        };

        let embed_cache_capacity: u64 = match std::env::var("PLEB_EMBED_CACHE_CAPACITY") {
            Ok(value) => value
                .trim()
                .parse()
                .with_context(|| format!("PLEB_EMBED_CACHE_CAPACITY: invalid value '{value}'"))?,
            Err(_) => 1000,
        };

        tracing::info!(
            store_path = %store_path.display(),
            base_url = %base_url,
            auto_load_images,
            embed_cache_capacity,
            "reader configuration loaded"
        );

        Ok(Self {
            store_path,
            base_url,
            auto_load_images,
            embed_cache_capacity,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mutex to serialize config tests that manipulate env vars.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const ENV_KEYS: &[&str] = &[
        "PLEB_STORE_PATH",
        "PLEB_BASE_URL",
        "PLEB_AUTO_LOAD_IMAGES",
        "PLEB_EMBED_CACHE_CAPACITY",
    ];

    /// Helper to run config tests with isolated env vars.
    fn with_env_vars<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
        let _guard = ENV_MUTEX.lock().unwrap();

        let saved: Vec<_> = ENV_KEYS
            .iter()
            .map(|k| (*k, std::env::var(k).ok()))
            .collect();

        // SAFETY: Serialized by mutex; only test code touches these vars.
        unsafe {
            for k in ENV_KEYS {
                std::env::remove_var(k);
            }
            for (k, v) in vars {
                std::env::set_var(k, v);
            }
        }

        f();

        // SAFETY: Restoring original env state.
        unsafe {
            for (k, v) in &saved {
                match v {
                    Some(val) => std::env::set_var(k, val),
                    None => std::env::remove_var(k),
                }
            }
        }
    }

    #[test]
    fn config_defaults() {
        with_env_vars(&[], || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.store_path, PathBuf::from("notes.jsonl"));
            assert_eq!(config.base_url, "https://njump.me");
            assert!(config.auto_load_images);
            assert_eq!(config.embed_cache_capacity, 1000);
        });
    }

    #[test]
    fn config_custom_values() {
        with_env_vars(
            &[
                ("PLEB_STORE_PATH", "/var/lib/pleb/notes"),
                ("PLEB_BASE_URL", "https://nostr.at"),
                ("PLEB_AUTO_LOAD_IMAGES", "off"),
                ("PLEB_EMBED_CACHE_CAPACITY", "64"),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.store_path, PathBuf::from("/var/lib/pleb/notes"));
                assert_eq!(config.base_url, "https://nostr.at");
                assert!(!config.auto_load_images);
                assert_eq!(config.embed_cache_capacity, 64);
            },
        );
    }

    #[test]
    fn config_base_url_trailing_slash_stripped() {
        with_env_vars(&[("PLEB_BASE_URL", "https://nostr.at/")], || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.base_url, "https://nostr.at");
        });
    }

    #[test]
    fn config_rejects_invalid_bool() {
        with_env_vars(&[("PLEB_AUTO_LOAD_IMAGES", "maybe")], || {
            let err = Config::from_env().unwrap_err();
            assert!(err.to_string().contains("PLEB_AUTO_LOAD_IMAGES"));
        });
    }

    #[test]
    fn config_rejects_invalid_capacity() {
        with_env_vars(&[("PLEB_EMBED_CACHE_CAPACITY", "-1")], || {
            assert!(Config::from_env().is_err());
        });
    }

    #[test]
    fn parse_bool_variants() {
        assert_eq!(parse_bool(" TRUE "), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool(""), None);
    }
}
