use std::path::Path;

use crate::models::Settings;
use crate::utils::config;

pub fn get_settings(data_dir: &Path) -> Result<Settings, String> {
    config::read_settings(data_dir)
}

/// Change one `section.field` value and write the settings file back.
pub fn update_setting(data_dir: &Path, key: &str, value: &str) -> Result<Settings, String> {
    let mut settings = config::read_settings(data_dir)?;
    settings.set(key, value)?;
    config::write_settings(data_dir, &settings)?;
    log::info!("Updated setting {}", key);
    Ok(settings)
}
