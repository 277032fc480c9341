use anyhow::Context;
use serde::Deserialize;

fn default_placeholder() -> String {
    "Select a date".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct PickerOptions {
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
    #[serde(default = "default_true")]
    pub need_time_picker: bool,
    #[serde(default)]
    pub no_confirm: bool,
    #[serde(default)]
    pub time_only: bool,
    #[serde(default)]
    pub extra_formats: Vec<String>,
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self {
            value: None,
            timezone: None,
            format: None,
            placeholder: default_placeholder(),
            need_time_picker: true,
            no_confirm: false,
            time_only: false,
            extra_formats: Vec::new(),
        }
    }
}

impl PickerOptions {
    pub fn from_toml_str(raw: &str) -> anyhow::Result<Self> {
        let mut options: PickerOptions =
            toml::from_str(raw).context("parse picker options from toml")?;
        options.sanitize();
        Ok(options)
    }

    pub fn sanitize(&mut self) {
        if self.placeholder.trim().is_empty() {
            tracing::warn!("blank placeholder replaced with the default");
            self.placeholder = default_placeholder();
        }
        if self.time_only && !self.need_time_picker {
            tracing::warn!("time-only mode keeps the time picker enabled");
            self.need_time_picker = true;
        }
        self.extra_formats
            .retain(|pattern| !pattern.trim().is_empty());
    }
}

#[cfg(test)]
mod tests {
    use super::PickerOptions;

    #[test]
    fn defaults_accept_dates_with_time() {
        let options = PickerOptions::default();
        assert_eq!(options.placeholder, "Select a date");
        assert!(options.need_time_picker);
        assert!(!options.no_confirm);
        assert!(!options.time_only);
        assert!(options.value.is_none());
    }

    #[test]
    fn toml_overrides_the_defaults() {
        let options = PickerOptions::from_toml_str(
            r#"
            value = "2024-06-15"
            timezone = "Asia/Tokyo"
            placeholder = "Pick a day"
            need_time_picker = false
            extra_formats = ["%Y.%m.%d"]
            "#,
        )
        .expect("parse options");

        assert_eq!(options.value.as_deref(), Some("2024-06-15"));
        assert_eq!(options.timezone.as_deref(), Some("Asia/Tokyo"));
        assert_eq!(options.placeholder, "Pick a day");
        assert!(!options.need_time_picker);
        assert_eq!(options.extra_formats, vec!["%Y.%m.%d".to_string()]);
    }

    #[test]
    fn sanitize_repairs_contradictory_options() {
        let mut options = PickerOptions {
            placeholder: "   ".to_string(),
            need_time_picker: false,
            time_only: true,
            extra_formats: vec!["%d.%m.%Y".to_string(), "  ".to_string()],
            ..PickerOptions::default()
        };
        options.sanitize();

        assert_eq!(options.placeholder, "Select a date");
        assert!(options.need_time_picker);
        assert_eq!(options.extra_formats, vec!["%d.%m.%Y".to_string()]);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(PickerOptions::from_toml_str("value = [").is_err());
    }
}
