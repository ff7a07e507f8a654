//! Config serialization to TOML
//!
//! Single source of truth for the config file format: the template written by
//! `ensure_config_exists` and `config --reset` is `Config::default().to_toml()`.

use super::Config;

impl Config {
    /// Serialize field list to `[[fields]]` entries
    fn fields_to_toml(&self) -> String {
        let mut output = String::new();
        for field in &self.fields {
            output.push_str("\n[[fields]]\n");
            output.push_str(&format!("name = {:?}\n", field.name));
            output.push_str(&format!("label = {:?}\n", field.label));
            if let Some(value) = &field.value {
                output.push_str(&format!("value = {:?}\n", value));
            }
        }
        output
    }

    /// Generate TOML for the current configuration
    pub fn to_toml(&self) -> String {
        let endpoint = match &self.upload.endpoint_url {
            Some(url) => format!("endpoint_url = {:?}", url),
            None => {
                "# endpoint_url = \"https://api.cloudinary.com/v1_1/<cloud>/image/upload\"".to_string()
            }
        };
        let preset = match &self.upload.upload_preset {
            Some(preset) => format!("upload_preset = {:?}", preset),
            None => "# upload_preset = \"<unsigned preset>\"".to_string(),
        };

        format!(
            r#"# imgfield configuration

# Theme: dark, light, nord
theme = {theme:?}

# Upload destination (IMGFIELD_UPLOAD_URL / IMGFIELD_UPLOAD_PRESET override these)
[upload]
{endpoint}
{preset}
timeout_secs = {timeout}
# What a failed upload does to the field's value: retain, clear
on_failure = "{on_failure}"

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = {log_level:?}
# JSON file logging (in addition to TUI buffer or stdout)
file_enabled = {log_file_enabled}
file_dir = {log_file_dir:?}
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = {log_file_prefix:?}

# Form fields, in display order
{fields}"#,
            theme = self.theme,
            endpoint = endpoint,
            preset = preset,
            timeout = self.upload.timeout_secs,
            on_failure = self.upload.on_failure.as_str(),
            log_level = self.logging.level,
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = self.logging.file_dir.display().to_string(),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = self.logging.file_prefix,
            fields = self.fields_to_toml(),
        )
    }
}
