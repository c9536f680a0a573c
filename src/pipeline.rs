//! Pipeline entry points: one per output artifact.
//!
//! Both pipelines are straight-line: load the input, compute, hand the result
//! to a renderer. Missing or unreadable input files are fatal; everything else
//! is reported and skipped where a best-effort result is possible.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::analyzer::{ExecutionLog, LaneLayout, RunSummary, Timeline, load_execution_log, run_animation};
use crate::common::input::read_input_file;
use crate::config::{AnimationConfig, MetricsConfig, OutputFormat, StrategyConfig};
use crate::metrics::{ComparisonError, StrategyComparison, chart_runtimes, extract_runtimes};
use crate::render::{FrameSink, GifSink, LanePainter, PngSequenceSink};

/// Result of animating one strategy.
#[derive(Debug)]
pub struct AnimationOutput {
    /// Animation artifact, `None` when there was nothing to animate.
    pub artifact: Option<PathBuf>,
    pub summary_path: PathBuf,
    pub summary: RunSummary,
}

/// Parse one strategy's log, render its animation and write its summary.
pub fn animate_strategy(
    strategy: &StrategyConfig,
    animation: &AnimationConfig,
    output_dir: &Path,
) -> anyhow::Result<AnimationOutput> {
    log::info!("Running {} animation...", strategy.name);

    let mut execution_log = load_execution_log(&strategy.log_path, &animation.section_marker)
        .with_context(|| format!("Failed to load log for strategy {}", strategy.name))?;
    if let Some(vm_count) = animation.vm_count {
        execution_log.header.vm_count = Some(vm_count);
    }
    if let Some(logged) = execution_log.header.strategy.as_deref() {
        if logged != strategy.name {
            log::warn!(
                "Log {} reports strategy {}, animating it as {}",
                strategy.log_path.display(),
                logged,
                strategy.name
            );
        }
    }

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    let layout = LaneLayout::default();
    let timeline = Timeline::new(&execution_log.records, layout, animation.frame_rate, animation.margin);

    let artifact = if execution_log.records.is_empty() {
        log::warn!("{}: no successful cloudlets to animate, skipping animation", strategy.name);
        None
    } else {
        Some(render_timeline(&strategy.name, &execution_log, &timeline, animation, output_dir)?)
    };

    let frame_count = if artifact.is_some() { timeline.plan().frame_count } else { 0 };
    let summary = RunSummary::from_log(&strategy.name, &execution_log, frame_count);
    let summary_path = output_dir.join(format!("{}_summary.json", strategy.name));
    summary.write_json(&summary_path)?;

    Ok(AnimationOutput {
        artifact,
        summary_path,
        summary,
    })
}

fn render_timeline(
    name: &str,
    execution_log: &ExecutionLog,
    timeline: &Timeline<'_>,
    animation: &AnimationConfig,
    output_dir: &Path,
) -> anyhow::Result<PathBuf> {
    let painter = LanePainter::new(
        name,
        LaneLayout::default(),
        execution_log.lane_count(),
        timeline.plan().t_max,
        animation.width,
        animation.height,
    );

    let (path, mut sink): (PathBuf, Box<dyn FrameSink>) = match animation.format {
        OutputFormat::Gif => {
            let path = output_dir.join(format!("{}_animation.gif", name));
            let sink: Box<dyn FrameSink> = Box::new(GifSink::create(&path, painter, animation.display_fps)?);
            (path, sink)
        }
        OutputFormat::PngSequence => {
            let path = output_dir.join(format!("{}_frames", name));
            let sink: Box<dyn FrameSink> = Box::new(PngSequenceSink::create(&path, painter)?);
            (path, sink)
        }
    };

    run_animation(timeline, sink.as_mut())?;
    Ok(path)
}

/// Extract both runtimes from the comparison report and chart them.
///
/// A missing report file is an error. Missing runtime values are not: the
/// chart is skipped, the diagnostic is logged and `Ok(None)` is returned.
pub fn compare_runtimes(metrics: &MetricsConfig) -> anyhow::Result<Option<StrategyComparison>> {
    let report = read_input_file(&metrics.report_path).context("Failed to load comparison report")?;
    let runtimes = extract_runtimes(&report);
    log::info!("TimeShared Execution Time: {:?}", runtimes.time_shared);
    log::info!("SpaceShared Execution Time: {:?}", runtimes.space_shared);

    match chart_runtimes(&runtimes, &metrics.chart_path, metrics.width, metrics.height) {
        Ok(comparison) => {
            log::info!(
                "Comparison chart saved as {} ({} is faster)",
                metrics.chart_path.display(),
                comparison.faster()
            );
            Ok(Some(comparison))
        }
        Err(e @ ComparisonError::MissingMetric(_)) => {
            log::error!("{}", e);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::input::InputError;

    const LOG: &str = "\
SIMULATION CONFIGURATION:
- Scheduling Strategy: TimeShared
- Number of VMs: 2

CLOUDLET EXECUTION RESULTS:
Cloudlet   Status     VM ID      Time            Start Time      Finish Time
1          SUCCESS    0          2.00            0.00            2.00
2          SUCCESS    1          3.00            1.00            4.00
";

    fn small_animation(format: OutputFormat) -> AnimationConfig {
        AnimationConfig {
            frame_rate: 2.0,
            margin: 1.0,
            width: 320,
            height: 240,
            format,
            ..Default::default()
        }
    }

    fn strategy(dir: &Path, text: &str) -> StrategyConfig {
        let log_path = dir.join("TimeShared_simulation_log.txt");
        std::fs::write(&log_path, text).unwrap();
        StrategyConfig {
            name: "TimeShared".into(),
            log_path,
        }
    }

    #[test]
    fn animate_strategy_writes_gif_and_summary() {
        let dir = tempfile::tempdir().unwrap();
        let strategy = strategy(dir.path(), LOG);
        let out = dir.path().join("output");

        let output = animate_strategy(&strategy, &small_animation(OutputFormat::Gif), &out).unwrap();
        let artifact = output.artifact.unwrap();
        assert_eq!(artifact, out.join("TimeShared_animation.gif"));
        assert!(artifact.exists());
        assert!(output.summary_path.exists());
        assert_eq!(output.summary.record_count, 2);
        // (4.0 + 1.0) * 2
        assert_eq!(output.summary.frame_count, 10);
    }

    #[test]
    fn animate_strategy_png_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let strategy = strategy(dir.path(), LOG);
        let out = dir.path().join("output");

        let output = animate_strategy(&strategy, &small_animation(OutputFormat::PngSequence), &out).unwrap();
        let frames_dir = output.artifact.unwrap();
        assert!(frames_dir.join("frame_00009.png").exists());
    }

    #[test]
    fn log_without_section_skips_animation() {
        let dir = tempfile::tempdir().unwrap();
        let strategy = strategy(dir.path(), "no results here\n");
        let out = dir.path().join("output");

        let output = animate_strategy(&strategy, &small_animation(OutputFormat::Gif), &out).unwrap();
        assert!(output.artifact.is_none());
        assert_eq!(output.summary.record_count, 0);
        assert!(!out.join("TimeShared_animation.gif").exists());
    }

    #[test]
    fn missing_log_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let strategy = StrategyConfig {
            name: "SpaceShared".into(),
            log_path: dir.path().join("missing.txt"),
        };
        let err = animate_strategy(&strategy, &small_animation(OutputFormat::Gif), dir.path()).unwrap_err();
        assert!(matches!(err.downcast_ref::<InputError>(), Some(InputError::MissingFile(_))));
    }

    #[test]
    fn compare_runtimes_skips_chart_on_missing_metric() {
        let dir = tempfile::tempdir().unwrap();
        let report_path = dir.path().join("report.txt");
        std::fs::write(&report_path, "- Time-Shared Runtime: 12.3s\n").unwrap();
        let metrics = MetricsConfig {
            report_path,
            chart_path: dir.path().join("chart.png"),
            width: 200,
            height: 150,
        };

        assert_eq!(compare_runtimes(&metrics).unwrap(), None);
        assert!(!metrics.chart_path.exists());
    }

    #[test]
    fn compare_runtimes_draws_chart() {
        let dir = tempfile::tempdir().unwrap();
        let report_path = dir.path().join("report.txt");
        std::fs::write(
            &report_path,
            "- Time-Shared Runtime: 0.153s\n- Space-Shared Runtime: 0.021s\n",
        )
        .unwrap();
        let metrics = MetricsConfig {
            report_path,
            chart_path: dir.path().join("chart.png"),
            width: 200,
            height: 150,
        };

        let comparison = compare_runtimes(&metrics).unwrap().unwrap();
        assert_eq!(comparison.faster(), "Space-Shared");
        assert!(metrics.chart_path.exists());
    }

    #[test]
    fn missing_report_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let metrics = MetricsConfig {
            report_path: dir.path().join("missing.txt"),
            ..Default::default()
        };
        assert!(compare_runtimes(&metrics).is_err());
    }
}
