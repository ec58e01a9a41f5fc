use anyhow::Result;
use bombvision_cv::detection::{ReaderRegistry, RecognitionConfig};
use clap::Parser;
use tracing::{info, warn, Level};

mod args;
mod report;

use report::{recognize_file, ReportOptions};

fn main() -> Result<()> {
    let args = args::Args::parse();
    init_tracing(args.verbose);

    let mut config = match &args.config {
        Some(path) => RecognitionConfig::load(path)?,
        None => RecognitionConfig::default(),
    };
    if let Some(dir) = &args.debug_dir {
        config = config.with_debug_dir(dir);
    }

    let registry = ReaderRegistry::standard(&config)?;
    info!(readers = ?registry.kinds(), min_confidence = registry.min_confidence(), "registry ready");

    let options = ReportOptions {
        lights: args.lights,
        with_scores: args.scores,
        debug: config.debug.clone(),
    };

    let mut failures = 0;
    for (index, path) in args.images.iter().enumerate() {
        let report = recognize_file(&registry, &options, index, path);
        if report.is_failure() {
            failures += 1;
        }
        println!("{}", serde_json::to_string(&report)?);
    }

    if failures > 0 {
        warn!(failures, total = args.images.len(), "some images could not be read");
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}
