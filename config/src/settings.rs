//! Application settings management

use crate::{PathManager, secrets};
use serde::{Deserialize, Serialize};
use std::fs;

/// Connection defaults for the database form. The password field holds the
/// encrypted blob produced by [`secrets::encrypt_secret`], never plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    /// Encrypted at rest; use `Settings::{get,set}_password`.
    pub password: Option<String>,
    pub database: String,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        ConnectionSettings {
            host: "localhost".to_string(),
            port: 3306,
            username: String::new(),
            password: None,
            database: String::new(),
        }
    }
}

/// Application settings stored in settings.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Database connection defaults
    #[serde(default)]
    pub connection: ConnectionSettings,
    /// Default model name (e.g., "llama3")
    pub default_model: Option<String>,
    /// Base URL of the Ollama server, if not the local default
    pub ollama_url: Option<String>,
}

impl Settings {
    /// Load settings from the settings file, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = PathManager::settings_path() else {
            return Self::default();
        };

        let Ok(content) = fs::read_to_string(&path) else {
            return Self::default();
        };

        toml::from_str(&content).unwrap_or_default()
    }

    /// Save settings to the settings file
    pub fn save(&self) -> Result<(), String> {
        let path = PathManager::settings_path().ok_or("Could not determine settings path")?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| format!("Failed to create config dir: {}", e))?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize settings: {}", e))?;
        fs::write(&path, content).map_err(|e| format!("Failed to write settings: {}", e))?;
        Ok(())
    }

    /// Get the decrypted database password.
    /// Returns None if not set or decryption fails.
    pub fn get_password(&self) -> Option<String> {
        self.connection
            .password
            .as_ref()
            .and_then(|encrypted| secrets::decrypt_secret(encrypted).ok())
    }

    /// Set the database password (encrypts before storing).
    pub fn set_password(&mut self, password: &str) -> Result<(), String> {
        let encrypted = secrets::encrypt_secret(password)?;
        self.connection.password = Some(encrypted);
        Ok(())
    }

    /// Remove the stored database password.
    pub fn remove_password(&mut self) {
        self.connection.password = None;
    }

    /// Check if a database password is stored.
    pub fn has_password(&self) -> bool {
        self.connection.password.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_connection_settings() {
        let settings = Settings::default();
        assert_eq!(settings.connection.host, "localhost");
        assert_eq!(settings.connection.port, 3306);
        assert!(!settings.has_password());
    }

    #[test]
    fn test_password_round_trip_is_encrypted_at_rest() {
        let mut settings = Settings::default();
        settings.set_password("hunter2").unwrap();

        let stored = settings.connection.password.clone().unwrap();
        assert_ne!(stored, "hunter2");
        assert_eq!(settings.get_password().unwrap(), "hunter2");
    }

    #[test]
    fn test_toml_round_trip() {
        let mut settings = Settings::default();
        settings.connection.host = "db.internal".to_string();
        settings.default_model = Some("llama3".to_string());

        let content = toml::to_string_pretty(&settings).unwrap();
        let back: Settings = toml::from_str(&content).unwrap();
        assert_eq!(back.connection.host, "db.internal");
        assert_eq!(back.default_model.as_deref(), Some("llama3"));
    }
}
