use std::path::PathBuf;

pub struct PathManager;

impl PathManager {
    // Helper to get the base config directory
    fn base_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("ledgerchat"))
    }

    pub fn config_dir() -> Option<PathBuf> {
        Self::base_config_dir()
    }

    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("settings.toml"))
    }

    pub fn ensure_dirs_exist() -> std::io::Result<()> {
        if let Some(d) = Self::config_dir() {
            std::fs::create_dir_all(&d)?;
        }
        Ok(())
    }
}
