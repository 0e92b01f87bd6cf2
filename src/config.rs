use crate::error::ConfigError;
use serde::Deserialize;
use std::fs;
use std::str::FromStr;
use std::time::Duration;

pub const CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub canvas: CanvasConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub visual: VisualConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_cols")]
    pub cols: i32,
    #[serde(default = "default_rows")]
    pub rows: i32,
}

#[derive(Debug, Deserialize)]
pub struct CanvasConfig {
    #[serde(default = "default_canvas_width")]
    pub width: f32,
    #[serde(default = "default_canvas_height")]
    pub height: f32,
}

#[derive(Debug, Deserialize)]
pub struct SearchConfig {
    /// Pause after each expanded node so the renderer can show progress
    #[serde(default = "default_step_delay_micros")]
    pub step_delay_micros: u64,
}

#[derive(Debug, Deserialize)]
pub struct VisualConfig {
    #[serde(default = "default_window_title")]
    pub window_title: String,
    #[serde(default = "default_bg_r")]
    pub background_r: u8,
    #[serde(default = "default_bg_g")]
    pub background_g: u8,
    #[serde(default = "default_bg_b")]
    pub background_b: u8,
    #[serde(default = "default_show_info")]
    pub show_info: bool,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// env_logger filter used when RUST_LOG is unset
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_enable_action_log")]
    pub enable_action_log: bool,
    #[serde(default = "default_action_log_path")]
    pub action_log_path: String,
}

// Default values
fn default_cols() -> i32 { 50 }
fn default_rows() -> i32 { 50 }
fn default_canvas_width() -> f32 { 900.0 }
fn default_canvas_height() -> f32 { 900.0 }
fn default_step_delay_micros() -> u64 { 1000 }
fn default_window_title() -> String { "gridpath - A* visualizer".to_string() }
fn default_bg_r() -> u8 { 255 }
fn default_bg_g() -> u8 { 255 }
fn default_bg_b() -> u8 { 255 }
fn default_show_info() -> bool { true }
fn default_level() -> String { "info".to_string() }
fn default_enable_action_log() -> bool { true }
fn default_action_log_path() -> String { "action_log.json".to_string() }

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cols: default_cols(),
            rows: default_rows(),
        }
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_canvas_width(),
            height: default_canvas_height(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            step_delay_micros: default_step_delay_micros(),
        }
    }
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            window_title: default_window_title(),
            background_r: default_bg_r(),
            background_g: default_bg_g(),
            background_b: default_bg_b(),
            show_info: default_show_info(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            enable_action_log: default_enable_action_log(),
            action_log_path: default_action_log_path(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            canvas: CanvasConfig::default(),
            search: SearchConfig::default(),
            visual: VisualConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(contents: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(contents)?)
    }
}

impl Config {
    /// Load configuration from `config.toml`, or use defaults if it is missing or malformed.
    ///
    /// The load error is handed back so it can be reported once logging is up.
    pub fn load() -> (Self, Option<ConfigError>) {
        match Self::load_from(CONFIG_PATH) {
            Ok(config) => (config, None),
            Err(e) => (Config::default(), Some(e)),
        }
    }

    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        contents.parse()
    }

    /// Reject contradictions that make the app unusable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.cols <= 0 || self.grid.rows <= 0 {
            return Err(ConfigError::Invalid(format!(
                "grid must have at least one cell (got {}x{})",
                self.grid.cols, self.grid.rows
            )));
        }
        if self.grid.cols.checked_mul(self.grid.rows).is_none() {
            return Err(ConfigError::Invalid(format!(
                "grid of {}x{} cells is too large",
                self.grid.cols, self.grid.rows
            )));
        }
        if self.canvas.width < self.grid.cols as f32 || self.canvas.height < self.grid.rows as f32 {
            return Err(ConfigError::Invalid(format!(
                "canvas {}x{} is smaller than one pixel per cell",
                self.canvas.width, self.canvas.height
            )));
        }
        Ok(())
    }

    pub fn cell_width(&self) -> f32 {
        self.canvas.width / self.grid.cols as f32
    }

    pub fn cell_height(&self) -> f32 {
        self.canvas.height / self.grid.rows as f32
    }

    pub fn step_delay(&self) -> Duration {
        Duration::from_micros(self.search.step_delay_micros)
    }
}
