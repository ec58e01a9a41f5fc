//! Command-line arguments

use bombvision_core::LightsState;
use clap::Parser;
use std::path::PathBuf;

/// Read bomb widgets from still images and print one JSON line per image.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Widget images (png, jpeg, bmp)
    #[arg(required = true, value_name = "IMAGES")]
    pub images: Vec<PathBuf>,

    /// Room lighting the images were captured under: on or off
    #[arg(long, default_value = "on", value_name = "STATE")]
    pub lights: LightsState,

    /// JSON recognition configuration
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write annotated frames and intermediate crops to this directory
    #[arg(long, value_name = "DIR")]
    pub debug_dir: Option<PathBuf>,

    /// Include every reader's presence score in the output
    #[arg(long)]
    pub scores: bool,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_full_command_line() {
        let args = Args::parse_from([
            "bombvision",
            "--lights",
            "off",
            "--config",
            "tuned.json",
            "--debug-dir",
            "out",
            "--scores",
            "-vv",
            "a.png",
            "b.png",
        ]);
        assert_eq!(args.images, vec![PathBuf::from("a.png"), PathBuf::from("b.png")]);
        assert_eq!(args.lights, LightsState::Off);
        assert_eq!(args.config, Some(PathBuf::from("tuned.json")));
        assert_eq!(args.debug_dir, Some(PathBuf::from("out")));
        assert!(args.scores);
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_defaults_and_required_images() {
        let args = Args::parse_from(["bombvision", "plate.png"]);
        assert_eq!(args.lights, LightsState::On);
        assert!(args.config.is_none());
        assert!(!args.scores);

        assert!(Args::try_parse_from(["bombvision"]).is_err());
        assert!(Args::try_parse_from(["bombvision", "--lights", "dim", "x.png"]).is_err());
    }
}
