/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    /// Animation tick interval while idle, in milliseconds.
    pub tick_rate_ms: u64,
    /// Character grid the rain is rasterized into.
    pub display_width: usize,
    pub display_height: usize,
    /// Master switch for tone feedback.
    pub sound: bool,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    display: TomlDisplay,
    #[serde(default)]
    sound: TomlSound,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlDisplay {
    #[serde(default = "default_width")]
    width: usize,
    #[serde(default = "default_height")]
    height: usize,
}

#[derive(Deserialize, Debug)]
struct TomlSound {
    #[serde(default = "default_sound_enabled")]
    enabled: bool,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 50 }
fn default_width() -> usize { 80 }
fn default_height() -> usize { 25 }
fn default_sound_enabled() -> bool { true }

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed { tick_rate_ms: default_tick_rate() }
    }
}

impl Default for TomlDisplay {
    fn default() -> Self {
        TomlDisplay { width: default_width(), height: default_height() }
    }
}

impl Default for TomlSound {
    fn default() -> Self {
        TomlSound { enabled: default_sound_enabled() }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());

        GameConfig {
            tick_rate_ms: toml_cfg.speed.tick_rate_ms.max(1),
            display_width: toml_cfg.display.width.max(1),
            display_height: toml_cfg.display.height.max(1),
            sound: toml_cfg.sound.enabled,
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so a linked binary still finds its config.
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let cfg: TomlConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.speed.tick_rate_ms, 50);
        assert_eq!(cfg.display.width, 80);
        assert_eq!(cfg.display.height, 25);
        assert!(cfg.sound.enabled);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let cfg: TomlConfig = toml::from_str(
            "[speed]\ntick_rate_ms = 100\n\n[sound]\nenabled = false\n",
        )
        .unwrap();
        assert_eq!(cfg.speed.tick_rate_ms, 100);
        assert_eq!(cfg.display.width, 80);
        assert!(!cfg.sound.enabled);
    }
}
