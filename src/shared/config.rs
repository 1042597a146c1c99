use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Default API the client talks to when no config exists yet.
const DEFAULT_API_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Theme options
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
    Ocean,
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the todo API
    pub api_base_url: String,
    /// User whose todos are fetched and mutated; every request carries it
    pub user_id: u32,
    /// Theme mode selection
    pub theme_mode: ThemeMode,
    /// Show help overlay
    pub show_help: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            user_id: 1,
            theme_mode: ThemeMode::default(),
            show_help: false,
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if not found
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let config = if config_path.exists() {
            let content = fs::read_to_string(&config_path)?;
            serde_json::from_str(&content).unwrap_or_else(|_| {
                // If parsing fails, use default and save it
                let default_config = Config::default();
                let _ = default_config.save();
                default_config
            })
        } else {
            // Create and save default config
            let default_config = Config::default();
            let _ = default_config.save();
            default_config
        };

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, content)?;
        Ok(())
    }

    /// Get the configuration file path
    fn config_path() -> Result<PathBuf> {
        let home_dir =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;

        // Use XDG config directory standard or fallback to ~/.config
        let config_dir = if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(xdg_config)
        } else {
            home_dir.join(".config")
        };

        let app_config_dir = config_dir.join("tuido");
        fs::create_dir_all(&app_config_dir)?;

        Ok(app_config_dir.join("config.json"))
    }

    /// Set theme mode
    pub fn set_theme_mode(&mut self, theme_mode: ThemeMode) {
        self.theme_mode = theme_mode;
    }

    /// Cycle to the next theme mode
    pub fn next_theme_mode(&self) -> ThemeMode {
        match self.theme_mode {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Ocean,
            ThemeMode::Ocean => ThemeMode::Dark,
        }
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Get theme display string
    pub fn theme_display(&self) -> &str {
        match self.theme_mode {
            ThemeMode::Dark => "Dark",
            ThemeMode::Light => "Light",
            ThemeMode::Ocean => "Ocean",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.user_id, 1);
        assert_eq!(config.theme_mode, ThemeMode::Dark);
        assert!(!config.show_help);
    }

    #[test]
    fn test_theme_mode_serialization() {
        let themes = vec![ThemeMode::Dark, ThemeMode::Light, ThemeMode::Ocean];

        for theme in themes {
            let serialized = serde_json::to_string(&theme).unwrap();
            let deserialized: ThemeMode = serde_json::from_str(&serialized).unwrap();
            assert_eq!(theme, deserialized);
        }
    }

    #[test]
    fn test_config_serialization() {
        let config = Config {
            api_base_url: "http://localhost:3000".to_string(),
            user_id: 42,
            theme_mode: ThemeMode::Ocean,
            show_help: true,
        };

        let serialized = serde_json::to_string_pretty(&config).unwrap();
        let deserialized: Config = serde_json::from_str(&serialized).unwrap();

        assert_eq!(config.api_base_url, deserialized.api_base_url);
        assert_eq!(config.user_id, deserialized.user_id);
        assert_eq!(config.theme_mode, deserialized.theme_mode);
        assert_eq!(config.show_help, deserialized.show_help);
    }

    #[test]
    fn test_theme_cycle_wraps_around() {
        let mut config = Config::default();

        config.set_theme_mode(config.next_theme_mode());
        assert_eq!(config.theme_mode, ThemeMode::Light);

        config.set_theme_mode(config.next_theme_mode());
        assert_eq!(config.theme_mode, ThemeMode::Ocean);

        config.set_theme_mode(config.next_theme_mode());
        assert_eq!(config.theme_mode, ThemeMode::Dark);
    }

    #[test]
    fn test_theme_display() {
        let themes_and_displays = vec![
            (ThemeMode::Dark, "Dark"),
            (ThemeMode::Light, "Light"),
            (ThemeMode::Ocean, "Ocean"),
        ];

        for (theme, expected_display) in themes_and_displays {
            let config = Config {
                theme_mode: theme,
                ..Default::default()
            };
            assert_eq!(config.theme_display(), expected_display);
        }
    }

    #[test]
    fn test_help_toggle() {
        let mut config = Config::default();
        assert!(!config.show_help);

        config.toggle_help();
        assert!(config.show_help);

        config.toggle_help();
        assert!(!config.show_help);
    }
}
