//! Preview configuration
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variable: `UMBRA_SHADOW_CONFIG=shadows.toml`
//! 2. Command line: `umbra_preview [CONFIG.toml] [--frames N] [--missing-shader]`
//! 3. Built-in defaults

use std::path::PathBuf;

/// Environment variable naming the shadow settings file
pub const CONFIG_ENV: &str = "UMBRA_SHADOW_CONFIG";

/// Frames rendered with the game camera by default
pub const DEFAULT_FRAMES: u32 = 4;

/// Preview run options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewConfig {
    /// Shadow settings file; defaults are used when absent
    pub settings_path: Option<PathBuf>,
    /// Game camera frames to render
    pub frames: u32,
    /// Start without the shadow shader and register it halfway through
    pub missing_shader: bool,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            settings_path: None,
            frames: DEFAULT_FRAMES,
            missing_shader: false,
        }
    }
}

impl PreviewConfig {
    /// Load from the process arguments and environment
    pub fn load() -> Self {
        Self::from_sources(std::env::args().skip(1), std::env::var(CONFIG_ENV).ok())
    }

    /// Build from explicit arguments (without the program name) and env value
    pub fn from_sources(args: impl IntoIterator<Item = String>, env_path: Option<String>) -> Self {
        let mut config = Self::default();

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--missing-shader" => config.missing_shader = true,
                "--frames" => match args.next().map(|v| v.parse::<u32>()) {
                    Some(Ok(frames)) => config.frames = frames,
                    Some(Err(e)) => log::warn!("Ignoring invalid --frames value: {}", e),
                    None => log::warn!("--frames needs a value"),
                },
                flag if flag.starts_with("--") => log::warn!("Unknown flag: {}", flag),
                path => {
                    if config.settings_path.is_none() {
                        config.settings_path = Some(PathBuf::from(path));
                        log::info!("Settings file from args: {}", path);
                    }
                }
            }
        }

        if let Some(path) = env_path.filter(|p| !p.is_empty()) {
            log::info!("Settings file from env: {}", path);
            config.settings_path = Some(PathBuf::from(path));
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        let config = PreviewConfig::from_sources(Vec::new(), None);
        assert_eq!(config, PreviewConfig::default());
        assert_eq!(config.frames, DEFAULT_FRAMES);
    }

    #[test]
    fn test_args() {
        let config = PreviewConfig::from_sources(
            args(&["shadows.toml", "--frames", "10", "--missing-shader"]),
            None,
        );
        assert_eq!(config.settings_path, Some(PathBuf::from("shadows.toml")));
        assert_eq!(config.frames, 10);
        assert!(config.missing_shader);
    }

    #[test]
    fn test_invalid_frames_keeps_default() {
        let config = PreviewConfig::from_sources(args(&["--frames", "many"]), None);
        assert_eq!(config.frames, DEFAULT_FRAMES);
    }

    #[test]
    fn test_env_overrides_args() {
        let config =
            PreviewConfig::from_sources(args(&["a.toml"]), Some("b.toml".to_string()));
        assert_eq!(config.settings_path, Some(PathBuf::from("b.toml")));

        let config = PreviewConfig::from_sources(args(&["a.toml"]), Some(String::new()));
        assert_eq!(config.settings_path, Some(PathBuf::from("a.toml")));
    }
}
