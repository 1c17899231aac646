//! Configuration loading.
//!
//! A TOML file with defaulted sections; a missing or malformed file falls
//! back to defaults with a warning, never an error. The path comes from
//! `MINITERM_CONFIG` or `~/.config/miniterm.toml`.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use miniterm_core::engine::EngineConfig;
use miniterm_core::Rgba;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub terminal: TerminalConfig,
    pub colors: ColorConfig,
    pub behavior: BehaviorConfig,
}

/// Shell and screen geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Program to run; the platform default shell when unset.
    pub shell: Option<String>,
    pub cols: u16,
    pub rows: u16,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self { shell: None, cols: 120, rows: 34 }
    }
}

/// Default color overrides, `"#RRGGBB"` hex.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub foreground: Option<String>,
    pub background: Option<String>,
}

/// Engine timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    pub repaint_interval_ms: u64,
    pub cursor_blink: bool,
    pub cursor_blink_interval_ms: u64,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self { repaint_interval_ms: 8, cursor_blink: true, cursor_blink_interval_ms: 500 }
    }
}

impl Config {
    /// Load from the configured path, falling back to defaults.
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(text) => Self::parse(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                log::warn!("could not read {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Parse a config document, falling back to defaults on error.
    pub fn parse(text: &str) -> Self {
        match toml::from_str(text) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("malformed config: {e}; using defaults");
                Self::default()
            }
        }
    }

    /// The engine timing knobs this config asks for.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            repaint_interval: Duration::from_millis(self.behavior.repaint_interval_ms.max(1)),
            blink_interval: self
                .behavior
                .cursor_blink
                .then(|| Duration::from_millis(self.behavior.cursor_blink_interval_ms.max(50))),
        }
    }

    /// Configured default foreground, or the engine's.
    pub fn foreground(&self) -> Rgba {
        self.colors
            .foreground
            .as_deref()
            .and_then(parse_hex_color)
            .unwrap_or(Rgba::FOREGROUND)
    }

    /// Configured default background, or the engine's.
    pub fn background(&self) -> Rgba {
        self.colors
            .background
            .as_deref()
            .and_then(parse_hex_color)
            .unwrap_or(Rgba::BACKGROUND)
    }
}

/// Resolve the config file path.
fn config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("MINITERM_CONFIG") {
        return Some(PathBuf::from(path));
    }
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config/miniterm.toml"))
}

/// Parse a `"#RRGGBB"` color.
pub fn parse_hex_color(s: &str) -> Option<Rgba> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Rgba::opaque(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::{parse_hex_color, Config};
    use miniterm_core::Rgba;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.terminal.cols, 120);
        assert_eq!(config.terminal.rows, 34);
        assert!(config.terminal.shell.is_none());
        assert_eq!(config.behavior.repaint_interval_ms, 8);
        assert!(config.behavior.cursor_blink);
    }

    #[test]
    fn parse_partial_document_keeps_defaults() {
        let config = Config::parse("[terminal]\ncols = 80\n");
        assert_eq!(config.terminal.cols, 80);
        assert_eq!(config.terminal.rows, 34);
        assert_eq!(config.behavior.repaint_interval_ms, 8);
    }

    #[test]
    fn parse_full_document() {
        let config = Config::parse(
            r##"
            [terminal]
            shell = "/bin/zsh"
            cols = 100
            rows = 30

            [colors]
            foreground = "#aabbcc"

            [behavior]
            repaint_interval_ms = 5
            cursor_blink = false
            "##,
        );
        assert_eq!(config.terminal.shell.as_deref(), Some("/bin/zsh"));
        assert_eq!(config.terminal.cols, 100);
        assert_eq!(config.foreground(), Rgba::opaque(0xaa, 0xbb, 0xcc));
        assert!(!config.behavior.cursor_blink);
        assert!(config.engine_config().blink_interval.is_none());
    }

    #[test]
    fn malformed_document_falls_back() {
        let config = Config::parse("this is not toml [[[");
        assert_eq!(config.terminal.cols, 120);
    }

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("#ff0080"), Some(Rgba::opaque(0xff, 0x00, 0x80)));
        assert_eq!(parse_hex_color("ff0080"), None);
        assert_eq!(parse_hex_color("#ff008"), None);
        assert_eq!(parse_hex_color("#gggggg"), None);
    }

    #[test]
    fn unconfigured_colors_use_engine_defaults() {
        let config = Config::default();
        assert_eq!(config.foreground(), Rgba::FOREGROUND);
        assert_eq!(config.background(), Rgba::BACKGROUND);
    }
}
