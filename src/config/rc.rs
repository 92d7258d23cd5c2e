use log::{debug, warn};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const RC_FILE_NAME: &str = ".pagescoperc";

#[derive(Debug, Clone, PartialEq)]
pub struct RcConfig {
    pub color: bool,
    pub delete_orphans: bool,
    pub show_hidden: bool,
    pub name_width: usize,
}

impl Default for RcConfig {
    fn default() -> Self {
        Self {
            color: true,
            delete_orphans: false,
            show_hidden: true,
            name_width: 24,
        }
    }
}

pub struct RcLoader;

impl RcLoader {
    /// Get the path to the RC file
    /// Looks for .pagescoperc in:
    /// 1. Current directory
    /// 2. Home directory (~/.pagescoperc)
    pub fn get_rc_path() -> Option<PathBuf> {
        let current_rc = Path::new(RC_FILE_NAME);
        if current_rc.exists() {
            return Some(current_rc.to_path_buf());
        }

        if let Ok(home) = env::var("HOME") {
            let home_rc = Path::new(&home).join(RC_FILE_NAME);
            if home_rc.exists() {
                return Some(home_rc);
            }
        }

        None
    }

    /// Load the RC file found by [`get_rc_path`](Self::get_rc_path), or defaults
    pub fn load_config() -> RcConfig {
        match Self::get_rc_path() {
            Some(rc_path) => Self::load_from_path(&rc_path),
            None => RcConfig::default(),
        }
    }

    /// Load a specific RC file. An unreadable file yields the defaults.
    pub fn load_from_path(path: &Path) -> RcConfig {
        let mut config = RcConfig::default();
        match fs::read_to_string(path) {
            Ok(content) => {
                debug!("loading configuration from {}", path.display());
                Self::parse_config_content(&content, &mut config);
            }
            Err(err) => warn!("cannot read {}: {err}", path.display()),
        }
        config
    }

    fn parse_config_content(content: &str, config: &mut RcConfig) {
        for line in content.lines() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') || line.starts_with('"') {
                continue;
            }

            Self::parse_config_line(line, config);
        }
    }

    fn parse_config_line(line: &str, config: &mut RcConfig) {
        // Remove inline comments
        let line = match line.find('#') {
            Some(pos) => &line[..pos],
            None => line,
        }
        .trim();

        // vim-style "set" commands
        if let Some(stripped) = line.strip_prefix("set ") {
            let setting = stripped.trim();

            match setting {
                "color" => config.color = true,
                "nocolor" => config.color = false,
                "deleteorphans" => config.delete_orphans = true,
                "nodeleteorphans" => config.delete_orphans = false,
                "hidden" => config.show_hidden = true,
                "nohidden" => config.show_hidden = false,
                _ => {
                    if let Some(value) = setting.strip_prefix("namewidth=") {
                        Self::set_name_width(value, config);
                    } else {
                        debug!("ignoring unknown setting {setting:?}");
                    }
                }
            }
        }
        // Direct key-value pairs
        else if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            let value = value.trim();

            match key {
                "color" => config.color = Self::parse_flag(value),
                "delete_orphans" | "deleteorphans" => config.delete_orphans = Self::parse_flag(value),
                "show_hidden" | "hidden" => config.show_hidden = Self::parse_flag(value),
                "name_width" | "namewidth" => Self::set_name_width(value, config),
                _ => debug!("ignoring unknown setting {key:?}"),
            }
        }
    }

    fn parse_flag(value: &str) -> bool {
        value == "true" || value == "1" || value == "yes"
    }

    fn set_name_width(value: &str, config: &mut RcConfig) {
        if let Ok(width) = value.parse::<usize>() {
            if (4..=80).contains(&width) {
                config.name_width = width;
            }
        }
    }

    /// Generate a sample RC file content
    pub fn generate_sample_rc() -> String {
        r#"# pagescope configuration file (.pagescoperc)
# Lines starting with # or " are comments

# Display settings
set color              # Colour the page tool and stage (or set nocolor)
set hidden             # List elements hidden on the current page (or set nohidden)
set namewidth=24       # Column width for page display names (4-80)

# Page removal
set nodeleteorphans    # Keep elements left without any page (or set deleteorphans)

# Alternative key=value syntax:
# color=true
# show_hidden=true
# name_width=24
# delete_orphans=false
"#
        .to_string()
    }
}
