use dirs::home_dir;
use std::{env, path::PathBuf};

const DEFAULT_DIR_NAME: &str = ".user_admin";
const CONFIG_FILE: &str = "config.json";

/// Returns the application-specific data directory, defaulting to `~/.user_admin`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("USER_ADMIN_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Path of the JSON configuration document inside `base`.
pub fn config_file_in(base: &std::path::Path) -> PathBuf {
    base.join(CONFIG_FILE)
}
