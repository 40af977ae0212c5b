//! Command-line arguments for cubit tools.

use std::path::PathBuf;

use clap::Parser;

use crate::{Config, SidePreset};

/// Largest accepted `--cube` edge. Keeps the cube's voxel ids within `i32`.
pub const MAX_CUBE_EDGE: i32 = 512;

/// cubit command-line arguments.
///
/// Values given here override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "cubit", about = "Incremental voxel scene sync")]
pub struct CliArgs {
    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log filter (error, warn, info, debug, trace or a full directive list).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Dirty voxels synced per frame.
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Face selection mode.
    #[arg(long, value_enum)]
    pub side_preset: Option<SidePreset>,

    /// Disable back-face culling.
    #[arg(long)]
    pub no_culling: bool,

    /// World-space edge length of one voxel.
    #[arg(long)]
    pub voxel_size: Option<f32>,

    /// Edge length, in voxels, of the demo cube.
    #[arg(long, value_parser = clap::value_parser!(i32).range(1..=i64::from(MAX_CUBE_EDGE)))]
    pub cube: Option<i32>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(batch) = args.batch_size {
            self.sync.batch_size = batch;
        }
        if let Some(preset) = args.side_preset {
            self.world.side_preset = preset;
        }
        if args.no_culling {
            self.world.culling = false;
        }
        if let Some(size) = args.voxel_size {
            self.world.voxel_size = size;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            batch_size: Some(32),
            side_preset: Some(SidePreset::FixedSideA),
            no_culling: true,
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.sync.batch_size, 32);
        assert_eq!(config.world.side_preset, SidePreset::FixedSideA);
        assert!(!config.world.culling);
        // Untouched fields keep their defaults
        assert_eq!(config.world.voxel_size, 0.5);
        assert_eq!(config.debug.log_level, "info");
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_parse_flags() {
        let args = CliArgs::parse_from([
            "cubit",
            "--side-preset",
            "fixed-side-b",
            "--voxel-size",
            "1.5",
            "--cube",
            "8",
            "--log-level",
            "debug",
        ]);
        assert_eq!(args.side_preset, Some(SidePreset::FixedSideB));
        assert_eq!(args.voxel_size, Some(1.5));
        assert_eq!(args.cube, Some(8));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(!args.no_culling);
    }

    #[test]
    fn test_cube_edge_out_of_range_rejected() {
        for edge in ["0", "-3", "1291", "100000"] {
            let result = CliArgs::try_parse_from(["cubit", "--cube", edge]);
            assert!(result.is_err(), "--cube {edge} should be rejected");
        }
        let args = CliArgs::parse_from(["cubit", "--cube", "512"]);
        assert_eq!(args.cube, Some(MAX_CUBE_EDGE));
        // The largest cube's ids still fit the id type.
        assert!(i32::checked_pow(MAX_CUBE_EDGE, 3).is_some());
    }

    #[test]
    fn test_unknown_preset_rejected() {
        let result = CliArgs::try_parse_from(["cubit", "--side-preset", "diagonal"]);
        assert!(result.is_err());
    }
}
