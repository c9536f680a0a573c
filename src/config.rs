//! Configuration loading for a replay run.
//!
//! Every input and output path of the run comes from here. Relative paths in
//! the file are resolved against the directory containing the file.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::analyzer::MAX_LANES;
use crate::analyzer::log_parser::RESULTS_MARKER;
use crate::render::chart::MIN_CHART_SIZE;

/// Smallest animation frame the lane view layout fits into.
pub const MIN_FRAME_SIZE: (u32, u32) = (320, 240);

/// Output format of the per-strategy animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// One looping animated GIF.
    Gif,
    /// A directory of numbered PNG frames.
    PngSequence,
}

/// Frame sampling and canvas settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct AnimationConfig {
    /// Frames per simulated second.
    pub frame_rate: f64,
    /// Simulated seconds shown after the last cloudlet finishes.
    pub margin: f64,
    /// Playback rate of the written animation.
    pub display_fps: u32,
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
    /// Marker line opening the results section of a log.
    pub section_marker: String,
    /// Lane count override; otherwise taken from the log.
    pub vm_count: Option<u32>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            frame_rate: 10.0,
            margin: 2.0,
            display_fps: 10,
            width: 1000,
            height: 600,
            format: OutputFormat::Gif,
            section_marker: RESULTS_MARKER.to_string(),
            vm_count: None,
        }
    }
}

/// One scheduling strategy to animate.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StrategyConfig {
    /// Name used in output file names.
    pub name: String,
    pub log_path: PathBuf,
}

/// Runtime comparison chart settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct MetricsConfig {
    pub report_path: PathBuf,
    pub chart_path: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            report_path: PathBuf::from("scheduling_comparison_report.txt"),
            chart_path: PathBuf::from("execution_time_comparison.png"),
            width: 800,
            height: 600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ReplayConfig {
    pub output_dir: PathBuf,
    pub animation: AnimationConfig,
    #[serde(rename = "strategy")]
    pub strategies: Vec<StrategyConfig>,
    pub metrics: MetricsConfig,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            animation: AnimationConfig::default(),
            strategies: ["SpaceShared", "TimeShared"]
                .into_iter()
                .map(|name| StrategyConfig {
                    name: name.to_string(),
                    log_path: PathBuf::from(format!("{}_simulation_log.txt", name)),
                })
                .collect(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl ReplayConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `config_path` - Path to the TOML file
    ///
    /// # Returns
    /// * `Ok(ReplayConfig)` if the file was loaded, parsed and validated
    /// * `Err(String)` with a descriptive error message otherwise
    pub fn load(config_path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(config_path).map_err(|e| format!("Failed to read config file: {}", e))?;

        let mut config = Self::parse(&content)?;
        config.resolve_paths(config_path.parent().unwrap_or(Path::new(".")));
        Ok(config)
    }

    /// Load the file if it exists, otherwise fall back to the defaults.
    pub fn load_or_default(config_path: &Path) -> Result<Self, String> {
        if config_path.exists() {
            Self::load(config_path)
        } else {
            log::info!("No config at {}, using defaults", config_path.display());
            Ok(Self::default())
        }
    }

    /// Parse and validate TOML text without touching paths.
    pub fn parse(content: &str) -> Result<Self, String> {
        let config: Self = toml::from_str(content).map_err(|e| format!("Failed to parse config file: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), String> {
        let animation = &self.animation;
        if !animation.frame_rate.is_finite() || animation.frame_rate <= 0.0 {
            return Err(format!("Invalid frame-rate {}, must be positive", animation.frame_rate));
        }
        if !animation.margin.is_finite() || animation.margin <= 0.0 {
            return Err(format!("Invalid margin {}, must be positive", animation.margin));
        }
        if animation.display_fps == 0 {
            return Err("Invalid display-fps, must be positive".to_string());
        }
        if animation.width < MIN_FRAME_SIZE.0 || animation.height < MIN_FRAME_SIZE.1 {
            return Err(format!(
                "Animation size {}x{} is below the minimum {}x{}",
                animation.width, animation.height, MIN_FRAME_SIZE.0, MIN_FRAME_SIZE.1
            ));
        }
        if animation.format == OutputFormat::Gif && (animation.width > u16::MAX as u32 || animation.height > u16::MAX as u32) {
            return Err(format!("GIF frames are limited to {0}x{0} pixels", u16::MAX));
        }
        if animation.section_marker.trim().is_empty() {
            return Err("section-marker must not be empty".to_string());
        }
        if let Some(vm_count) = animation.vm_count {
            if vm_count == 0 || vm_count > MAX_LANES {
                return Err(format!("Invalid vm-count {}, must be between 1 and {}", vm_count, MAX_LANES));
            }
        }
        if self.metrics.width < MIN_CHART_SIZE.0 || self.metrics.height < MIN_CHART_SIZE.1 {
            return Err(format!(
                "Chart size {}x{} is below the minimum {}x{}",
                self.metrics.width, self.metrics.height, MIN_CHART_SIZE.0, MIN_CHART_SIZE.1
            ));
        }

        let mut names = std::collections::HashSet::new();
        for strategy in &self.strategies {
            let name = strategy.name.as_str();
            if name.trim().is_empty() {
                return Err("Strategy name must not be empty".to_string());
            }
            if name.trim() != name {
                return Err(format!("Strategy name {:?} must not start or end with whitespace", name));
            }
            if name.contains(['/', '\\']) {
                return Err(format!("Strategy name {:?} must not contain path separators", name));
            }
            if !names.insert(name) {
                return Err(format!("Duplicate strategy name: {}", name));
            }
        }

        Ok(())
    }

    /// Make every relative path relative to `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        resolve(&mut self.output_dir);
        resolve(&mut self.metrics.report_path);
        resolve(&mut self.metrics.chart_path);
        for strategy in &mut self.strategies {
            resolve(&mut strategy.log_path);
        }
    }
}
