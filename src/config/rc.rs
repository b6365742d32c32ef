use crate::document_model::undo::DEFAULT_UNDO_LEVELS;
use crate::view::theme::{DEFAULT_FONT_SIZE, MAX_FONT_SIZE, MIN_FONT_SIZE};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const RC_FILE_NAME: &str = ".trackeditrc";
const MAX_UNDO_LEVELS: usize = 100_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RcConfig {
    pub track_changes: bool,
    pub dark_mode: bool,
    pub font_size: u16,
    pub undo_levels: usize,
    pub tab_stop: usize,
}

impl Default for RcConfig {
    fn default() -> Self {
        Self {
            track_changes: false,
            dark_mode: true,
            font_size: DEFAULT_FONT_SIZE,
            undo_levels: DEFAULT_UNDO_LEVELS,
            tab_stop: 4,
        }
    }
}

pub struct RcLoader;

impl RcLoader {
    /// Get the path to the RC file
    /// Looks for .trackeditrc in:
    /// 1. Current directory
    /// 2. Home directory (~/.trackeditrc)
    pub fn get_rc_path() -> Option<PathBuf> {
        // First check current directory
        let current_rc = Path::new(RC_FILE_NAME);
        if current_rc.exists() {
            return Some(current_rc.to_path_buf());
        }

        // Then check home directory
        if let Ok(home) = env::var("HOME") {
            let home_rc = Path::new(&home).join(RC_FILE_NAME);
            if home_rc.exists() {
                return Some(home_rc);
            }
        }

        None
    }

    /// Load the RC file from `path`, or from the default locations.
    pub fn load_config(path: Option<&Path>) -> RcConfig {
        let rc_path = match path {
            Some(path) => Some(path.to_path_buf()),
            None => Self::get_rc_path(),
        };

        let mut config = RcConfig::default();
        if let Some(rc_path) = rc_path {
            match fs::read_to_string(&rc_path) {
                Ok(content) => {
                    debug!(path = %rc_path.display(), "loading rc file");
                    Self::parse_config_content(&content, &mut config);
                }
                Err(e) => {
                    warn!(path = %rc_path.display(), error = %e, "could not read rc file");
                }
            }
        }

        config
    }

    /// Parse the content of an RC file
    fn parse_config_content(content: &str, config: &mut RcConfig) {
        for line in content.lines() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') || line.starts_with('"') {
                continue;
            }

            Self::parse_config_line(line, config);
        }
    }

    /// Parse a single configuration line
    fn parse_config_line(line: &str, config: &mut RcConfig) {
        // Remove inline comments
        let line = if let Some(pos) = line.find('#') {
            &line[..pos]
        } else {
            line
        }
        .trim();

        // Handle "set" commands (vim-style)
        if let Some(stripped) = line.strip_prefix("set ") {
            let setting = stripped.trim();

            match setting {
                "track" | "trackchanges" => config.track_changes = true,
                "notrack" | "notrackchanges" => config.track_changes = false,
                "dark" | "darkmode" => config.dark_mode = true,
                "nodark" | "nodarkmode" | "light" => config.dark_mode = false,
                _ => {
                    if let Some((key, value)) = setting.split_once('=') {
                        Self::apply_value(key.trim(), value.trim(), config);
                    } else {
                        debug!(setting, "unknown rc setting");
                    }
                }
            }
        }
        // Handle direct key-value pairs
        else if let Some((key, value)) = line.split_once('=') {
            Self::apply_value(key.trim(), value.trim(), config);
        }
    }

    fn apply_value(key: &str, value: &str, config: &mut RcConfig) {
        match key {
            "track" | "trackchanges" | "track_changes" => {
                config.track_changes = Self::parse_bool(value).unwrap_or(config.track_changes);
            }
            "dark" | "darkmode" | "dark_mode" => {
                config.dark_mode = Self::parse_bool(value).unwrap_or(config.dark_mode);
            }
            "fontsize" | "font_size" => {
                if let Ok(size) = value.parse::<u16>() {
                    if (MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&size) {
                        config.font_size = size;
                    }
                }
            }
            "undolevels" | "undo_levels" => {
                if let Ok(levels) = value.parse::<usize>() {
                    if levels > 0 && levels <= MAX_UNDO_LEVELS {
                        config.undo_levels = levels;
                    }
                }
            }
            "tabstop" | "tab_stop" => {
                if let Ok(tab_stop) = value.parse::<usize>() {
                    if tab_stop > 0 && tab_stop <= 16 {
                        config.tab_stop = tab_stop;
                    }
                }
            }
            _ => debug!(key, "unknown rc setting"),
        }
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        }
    }

    /// Generate a sample RC file content
    pub fn generate_sample_rc() -> String {
        r#"# track-edit configuration file (.trackeditrc)
# Lines starting with # or " are comments

set notrack            # Start with track changes off (or set track)
set dark               # Dark theme (or set nodark)
set fontsize=22        # Font size reported to the display, 6..96
set undolevels=1000    # Undo history depth
set tabstop=4          # Tab width on screen

# Alternative key=value syntax:
# track_changes=on
# dark_mode=true
# font_size=22
# undo_levels=1000
# tab_stop=4
"#
        .to_string()
    }
}
