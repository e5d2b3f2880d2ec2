use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use rivulet_bench::report;
use rivulet_bench::runner::{load_registry, ScenarioRunner};
use rivulet_bench::scenes;
use rivulet_liquid::LiquidConfig;

fn usage() {
    eprintln!("Usage: liquid-runner [OPTIONS]");
    eprintln!("  --scene <name>                 Run only this scene (repeatable)");
    eprintln!("  --ticks <n>                    Liquid invocations per scene (default: 200)");
    eprintln!("  --config <path>                Load liquid settings from a RON file");
    eprintln!("  --loop-max <n>                 Voxels processed per invocation");
    eprintln!("  --purge-secs <n>               Queue growth window before purging (0 disables)");
    eprintln!("  --output <path>                Save current results as JSON baseline");
    eprintln!("  --baseline <path>              Load baseline JSON for comparison");
    eprintln!("  --regression-threshold <pct>   Regression threshold percentage (default: 10)");
}

/// Value following the flag at `args[i]`, parsed or exiting with a message.
fn value<T: FromStr>(args: &[String], i: usize) -> T {
    let flag = &args[i - 1];
    let Some(raw) = args.get(i) else {
        eprintln!("Missing value for {flag}");
        process::exit(1);
    };
    raw.parse().unwrap_or_else(|_| {
        eprintln!("Invalid {flag} value: {raw}");
        process::exit(1);
    })
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    let mut scene_names: Vec<String> = Vec::new();
    let mut tick_count = 200u32;
    let mut config_path: Option<PathBuf> = None;
    let mut loop_max: Option<u32> = None;
    let mut purge_secs: Option<u32> = None;
    let mut baseline_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut regression_threshold = 10.0f64;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--scene" => {
                i += 1;
                scene_names.push(value(&args, i));
            }
            "--ticks" => {
                i += 1;
                tick_count = value(&args, i);
            }
            "--config" => {
                i += 1;
                config_path = Some(value(&args, i));
            }
            "--loop-max" => {
                i += 1;
                loop_max = Some(value(&args, i));
            }
            "--purge-secs" => {
                i += 1;
                purge_secs = Some(value(&args, i));
            }
            "--output" => {
                i += 1;
                output_path = Some(value(&args, i));
            }
            "--baseline" => {
                i += 1;
                baseline_path = Some(value(&args, i));
            }
            "--regression-threshold" => {
                i += 1;
                regression_threshold = value(&args, i);
            }
            "--help" | "-h" => {
                usage();
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let mut config = match config_path {
        Some(ref path) => {
            let parsed = std::fs::read_to_string(path)
                .map_err(|e| e.to_string())
                .and_then(|text| LiquidConfig::from_ron(&text).map_err(|e| e.to_string()));
            match parsed {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Failed to load {}: {e}", path.display());
                    process::exit(1);
                }
            }
        }
        None => LiquidConfig::default(),
    };
    if let Some(n) = loop_max {
        config.loop_max = n;
    }
    if let Some(secs) = purge_secs {
        config.queue_purge_secs = secs;
    }

    let registry = match load_registry() {
        Ok(registry) => registry,
        Err(e) => {
            log::error!("Failed to load contents: {e}");
            process::exit(1);
        }
    };
    let runner = match ScenarioRunner::new(registry, config, tick_count) {
        Ok(runner) => runner,
        Err(e) => {
            log::error!("Invalid setup: {e}");
            process::exit(1);
        }
    };

    let scene_configs: Vec<_> = if scene_names.is_empty() {
        scenes::standard_scenes()
    } else {
        scene_names
            .iter()
            .map(|name| {
                scenes::find_scene(name).unwrap_or_else(|| {
                    eprintln!("Unknown scene: {name}");
                    process::exit(1);
                })
            })
            .collect()
    };

    let mut results = Vec::new();
    for scene in &scene_configs {
        match runner.run_scene(scene) {
            Ok(result) => results.push(result),
            Err(e) => {
                log::error!("Scene '{}' failed: {e}", scene.name);
                process::exit(1);
            }
        }
    }

    println!("\n## Liquid Results\n");
    println!(
        "loop_max={} queue_purge_secs={}\n",
        config.loop_max, config.queue_purge_secs
    );
    println!("{}", report::format_markdown(&results));

    if let Some(ref path) = output_path {
        let baseline = report::Baseline {
            timestamp: run_label(),
            results: results.clone(),
        };
        match report::save_baseline(path, &baseline) {
            Ok(()) => log::info!("Saved baseline to {}", path.display()),
            Err(e) => {
                log::error!("Failed to save baseline to {}: {e}", path.display());
                process::exit(1);
            }
        }
    }

    if let Some(ref path) = baseline_path {
        if let Some(baseline) = report::load_baseline(path) {
            let regressions = report::compare(&results, &baseline, regression_threshold);
            println!(
                "{}",
                report::format_comparison(&regressions, regression_threshold)
            );
            if !regressions.is_empty() {
                eprintln!(
                    "ERROR: {} regressions detected, exiting with code 1",
                    regressions.len()
                );
                process::exit(1);
            }
        } else {
            log::warn!("Baseline file not found: {}", path.display());
        }
    }

    log::info!("Liquid run complete.");
}

/// Seconds since the Unix epoch, used to label saved baselines.
fn run_label() -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    format!("run-{secs}")
}
