use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use vidsage_core::config::AppConfig;

// ── File I/O ────────────────────────────────────────────────────────────

pub fn config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .context("Could not determine home directory")?;
    Ok(PathBuf::from(home).join(".config").join("vidsage"))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("vidsage.toml"))
}

/// Load config from `~/.config/vidsage/vidsage.toml`; defaults when the
/// file is missing or unreadable.
pub fn load_config() -> AppConfig {
    match config_path() {
        Ok(path) => load_config_from(&path),
        Err(_) => AppConfig::default(),
    }
}

pub fn load_config_from(path: &Path) -> AppConfig {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|s| toml::from_str(&s).ok())
        .unwrap_or_default()
}

/// Save config to `~/.config/vidsage/vidsage.toml`.
pub fn save_config(config: &AppConfig) -> Result<()> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir)?;
    save_config_to(&dir.join("vidsage.toml"), config)
}

pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<()> {
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vidsage.toml");

        let mut config = AppConfig::default();
        config.server.url = "https://api.example.com".to_string();
        config.server.access_token = "tok-123".to_string();
        config.chat.reveal_char_delay_ms = 25;

        save_config_to(&path, &config).unwrap();
        let loaded = load_config_from(&path);

        assert_eq!(loaded.server.url, "https://api.example.com");
        assert_eq!(loaded.server.access_token, "tok-123");
        assert_eq!(loaded.chat.reveal_char_delay_ms, 25);
        assert_eq!(loaded.history.limit, 10);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config_from(&dir.path().join("nope.toml"));
        assert_eq!(loaded.server.url, "http://localhost:8000");
    }

    #[test]
    fn malformed_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vidsage.toml");
        std::fs::write(&path, "this is { not toml").unwrap();
        let loaded = load_config_from(&path);
        assert_eq!(loaded.history.limit, 10);
    }
}
