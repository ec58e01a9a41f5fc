//! Per-image recognition report printed by the binary

use bombvision_core::{LightsState, WidgetKind};
use bombvision_cv::{
    detection::{DebugConfig, ReaderRegistry, Recognition},
    utils::{DebugOverlay, ImageUtils},
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// How each image is processed.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub lights: LightsState,
    pub with_scores: bool,
    pub debug: DebugConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreEntry {
    pub kind: WidgetKind,
    pub score: f32,
}

/// Result for one image: either a recognition or the reason it failed.
#[derive(Debug, Clone, Serialize)]
pub struct ImageReport {
    pub image: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recognition: Option<Recognition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub scores: Vec<ScoreEntry>,
}

impl ImageReport {
    fn new(image: &Path) -> Self {
        Self {
            image: image.to_path_buf(),
            recognition: None,
            error: None,
            scores: Vec::new(),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// Load `path` and recognize the widget in it. Never fails: problems end
/// up in the report's `error` field.
pub fn recognize_file(registry: &ReaderRegistry, options: &ReportOptions, index: usize, path: &Path) -> ImageReport {
    let mut report = ImageReport::new(path);

    let frame = match ImageUtils::load_frame(path, options.lights) {
        Ok(frame) => frame,
        Err(e) => {
            warn!(image = ?path, "{:#}", e);
            report.error = Some(format!("{:#}", e));
            return report;
        }
    };

    if options.with_scores {
        report.scores = registry
            .scores(&frame)
            .into_iter()
            .map(|(kind, score)| ScoreEntry { kind, score })
            .collect();
    }

    let mut overlay = options
        .debug
        .draw_overlay
        .then(|| DebugOverlay::for_frame(&frame));

    match registry.recognize(&frame, overlay.as_mut()) {
        Ok(recognition) => {
            info!(image = ?path, kind = %recognition.kind, data = %recognition.data, "recognized");
            report.recognition = Some(recognition);
        }
        Err(e) => {
            warn!(image = ?path, "recognition failed: {}", e);
            report.error = Some(e.to_string());
        }
    }

    if let Some(mut overlay) = overlay {
        if !options.debug.save_intermediate {
            overlay.clear_crops();
        }
        let stem = debug_stem(index, path);
        if let Err(e) = overlay.save(&options.debug.output_dir, &stem) {
            warn!(image = ?path, "Failed to write debug output: {:#}", e);
        }
    }

    report
}

/// `<index>_<file stem>`, unique even when two inputs share a file name.
fn debug_stem(index: usize, path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "frame".to_string());
    format!("{:03}_{}", index, stem)
}
