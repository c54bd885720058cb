//! qrlogo runtime configuration handling

use crate::compositor::{RenderOptions, parse_color, parse_ecc_level};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Top-level configuration structure persisted to disk or environment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QrLogoConfig {
    /// Compositing overrides
    pub render: RenderOverrides,
    /// Where and how artifacts are written
    pub output: OutputOptions,
    /// Logging configuration
    pub logging: LoggingOptions,
}

impl QrLogoConfig {
    /// Load configuration from an explicit path or fall back to discovered defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = explicit_path {
            Self::from_file(path)?
        } else if let Some(path) = Self::discover_file()? {
            tracing::info!("Using configuration file: {}", path.display());
            Self::from_file(&path)?
        } else {
            tracing::debug!("No qrlogo.toml / qrlogo.yaml found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Attempt to locate a configuration file in common locations.
    fn discover_file() -> Result<Option<PathBuf>> {
        let cwd =
            env::current_dir().map_err(|e| Error::Config(format!("Failed to read cwd: {e}")))?;
        for candidate in ["qrlogo.toml", "qrlogo.yaml", "qrlogo.yml"] {
            let path = cwd.join(candidate);
            if path.exists() {
                return Ok(Some(path));
            }
        }

        if let Some(xdg_config) = env::var_os("XDG_CONFIG_HOME") {
            let base = PathBuf::from(xdg_config).join("qrlogo");
            for candidate in ["config.toml", "config.yaml"] {
                let path = base.join(candidate);
                if path.exists() {
                    return Ok(Some(path));
                }
            }
        }

        Ok(None)
    }

    /// Read configuration from a concrete file path.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;

        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase()
            .as_str()
        {
            "toml" => toml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse TOML {}: {e}", path.display()))
            }),
            "yaml" | "yml" => serde_yaml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse YAML {}: {e}", path.display()))
            }),
            other => Err(Error::Config(format!(
                "Unsupported config format '{}', expected toml/yaml",
                other
            ))),
        }
    }

    /// Parse TOML configuration text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| Error::Config(e.to_string()))
    }

    /// Parse YAML configuration text.
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        serde_yaml::from_str(contents).map_err(|e| Error::Config(e.to_string()))
    }

    /// Apply environment variable overrides after file/default loading.
    fn apply_env_overrides(&mut self) {
        self.render.apply_env_overrides();
        self.output.apply_env_overrides();
        self.logging.apply_env_overrides();
    }

    /// Produce fully resolved render options.
    pub fn render_options(&self) -> Result<RenderOptions> {
        self.render.to_render_options()
    }
}

/// User-friendly render overrides merged on top of `RenderOptions::default()`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOverrides {
    /// Output canvas side in pixels
    pub canvas_size: Option<u32>,
    /// Quiet zone in modules
    pub margin: Option<u32>,
    /// Dark module color (`#RRGGBB` or `#RRGGBBAA`)
    pub dark_color: Option<String>,
    /// Light module and backdrop color
    pub light_color: Option<String>,
    /// Logo side as a fraction of the canvas side
    pub logo_scale: Option<f64>,
    /// Backdrop border around the logo in pixels
    pub padding_px: Option<u32>,
    /// Error correction level (L, M, Q, H)
    pub error_correction: Option<String>,
}

impl RenderOverrides {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(size) = env::var("QRLOGO_CANVAS_SIZE") {
            self.canvas_size = size.parse::<u32>().ok();
        }
        if let Ok(margin) = env::var("QRLOGO_MARGIN") {
            self.margin = margin.parse::<u32>().ok();
        }
        if let Ok(color) = env::var("QRLOGO_DARK_COLOR") {
            self.dark_color = Some(color);
        }
        if let Ok(color) = env::var("QRLOGO_LIGHT_COLOR") {
            self.light_color = Some(color);
        }
        if let Ok(scale) = env::var("QRLOGO_LOGO_SCALE") {
            self.logo_scale = scale.parse::<f64>().ok();
        }
        if let Ok(padding) = env::var("QRLOGO_PADDING") {
            self.padding_px = padding.parse::<u32>().ok();
        }
        if let Ok(level) = env::var("QRLOGO_ERROR_CORRECTION") {
            self.error_correction = Some(level);
        }
    }

    /// Merge overrides onto the default render options and validate the result.
    pub fn to_render_options(&self) -> Result<RenderOptions> {
        let mut options = RenderOptions::default();

        if let Some(size) = self.canvas_size {
            options.canvas_size = size;
        }
        if let Some(margin) = self.margin {
            options.margin = margin;
        }
        if let Some(color) = &self.dark_color {
            options.dark_color = parse_color(color)?;
        }
        if let Some(color) = &self.light_color {
            options.light_color = parse_color(color)?;
        }
        if let Some(scale) = self.logo_scale {
            options.logo_scale = scale;
        }
        if let Some(padding) = self.padding_px {
            options.padding_px = padding;
        }
        if let Some(level) = &self.error_correction {
            options.ecc_level = parse_ecc_level(level)?;
        }

        options
            .validate()
            .map_err(|e| Error::Config(e.to_string()))?;
        Ok(options)
    }
}

/// Artifact output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Directory generated PNG files are written to
    pub directory: PathBuf,
    /// Decode each artifact after rendering to check it scans
    pub verify: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            verify: false,
        }
    }
}

impl OutputOptions {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(dir) = env::var("QRLOGO_OUTPUT_DIR") {
            if !dir.trim().is_empty() {
                self.directory = PathBuf::from(dir);
            }
        }
        if let Ok(verify) = env::var("QRLOGO_VERIFY") {
            if let Some(parsed) = parse_flag(&verify) {
                self.verify = parsed;
            }
        }
    }
}

/// Structured logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingOptions {
    /// Default log level (overridable via `QRLOGO_LOG_LEVEL`)
    pub level: String,
    /// Optional log file path for teeing structured logs
    pub file: Option<PathBuf>,
    /// ANSI colors in console logging
    pub color: bool,
    /// Optional log rotation strategy applied to `file`
    pub rotation: Option<LogRotation>,
    /// Aggregate render metrics and log them after the batch
    pub metrics: bool,
    /// Format used when metrics are printed
    pub metrics_format: MetricsFormat,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            color: true,
            rotation: None,
            metrics: false,
            metrics_format: MetricsFormat::Json,
        }
    }
}

impl LoggingOptions {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(level) = env::var("QRLOGO_LOG_LEVEL") {
            self.level = level;
        }
        if let Ok(file) = env::var("QRLOGO_LOG_FILE") {
            self.file = Some(PathBuf::from(file));
        }
        if let Ok(color) = env::var("QRLOGO_LOG_COLOR") {
            if let Some(parsed) = parse_flag(&color) {
                self.color = parsed;
            }
        }
        if let Ok(rotation) = env::var("QRLOGO_LOG_ROTATION") {
            if let Some(parsed) = LogRotation::from_str(&rotation) {
                self.rotation = Some(parsed);
            }
        }
        if let Ok(metrics) = env::var("QRLOGO_METRICS") {
            if let Some(parsed) = parse_flag(&metrics) {
                self.metrics = parsed;
            }
        }
        if let Ok(format) = env::var("QRLOGO_METRICS_FORMAT") {
            if let Ok(parsed) = format.parse::<MetricsFormat>() {
                self.metrics_format = parsed;
            }
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

/// Supported log rotation policies for file sinks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    /// Rotate log files once per hour
    Hourly,
    /// Rotate log files once per day
    Daily,
}

impl LogRotation {
    fn from_str(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "hourly" => Some(Self::Hourly),
            "daily" => Some(Self::Daily),
            _ => None,
        }
    }
}

/// Supported serialization formats for metrics output
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MetricsFormat {
    /// Emit metrics as structured JSON
    Json,
    /// Emit metrics in Prometheus text exposition format
    Prometheus,
}

impl MetricsFormat {
    /// Parse a metrics format identifier (case-insensitive) from a string slice.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "prometheus" => Some(Self::Prometheus),
            _ => None,
        }
    }
}

impl FromStr for MetricsFormat {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(value).ok_or_else(|| {
            format!("Unsupported metrics format '{value}', expected 'json' or 'prometheus'")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use qrcode::EcLevel;

    #[test]
    fn test_empty_overrides_resolve_to_defaults() {
        let options = RenderOverrides::default().to_render_options().unwrap();
        assert_eq!(options, RenderOptions::default());
    }

    #[test]
    fn test_toml_overrides() {
        let config = QrLogoConfig::from_toml_str(
            r##"
            [render]
            canvas_size = 600
            dark_color = "#102030"
            error_correction = "q"

            [output]
            directory = "out"
            verify = true

            [logging]
            level = "debug"
            metrics_format = "prometheus"
            "##,
        )
        .unwrap();

        let options = config.render_options().unwrap();
        assert_eq!(options.canvas_size, 600);
        assert_eq!(options.dark_color, Rgba([0x10, 0x20, 0x30, 255]));
        assert_eq!(options.ecc_level, EcLevel::Q);
        assert_eq!(options.margin, 2);
        assert_eq!(config.output.directory, PathBuf::from("out"));
        assert!(config.output.verify);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.metrics_format, MetricsFormat::Prometheus);
    }

    #[test]
    fn test_yaml_overrides() {
        let config = QrLogoConfig::from_yaml_str(
            "render:\n  logo_scale: 0.25\n  padding_px: 4\nlogging:\n  rotation: daily\n",
        )
        .unwrap();
        let options = config.render_options().unwrap();
        assert_eq!(options.logo_scale, 0.25);
        assert_eq!(options.padding_px, 4);
        assert_eq!(config.logging.rotation, Some(LogRotation::Daily));
    }

    #[test]
    fn test_invalid_overrides_are_config_errors() {
        let overrides = RenderOverrides {
            canvas_size: Some(0),
            ..RenderOverrides::default()
        };
        assert!(matches!(
            overrides.to_render_options(),
            Err(Error::Config(_))
        ));

        let overrides = RenderOverrides {
            light_color: Some("white".into()),
            ..RenderOverrides::default()
        };
        assert!(overrides.to_render_options().is_err());
    }

    #[test]
    fn test_metrics_format_parse() {
        assert_eq!("JSON".parse::<MetricsFormat>(), Ok(MetricsFormat::Json));
        assert!("xml".parse::<MetricsFormat>().is_err());
    }
}
