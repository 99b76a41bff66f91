use std::path::PathBuf;

use anyhow::Context as _;
use blockfall_engine::{Engine, EngineConfig, PieceSeed};

use crate::util;

/// Options shared by every command that builds an engine.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct EngineArg {
    /// Engine configuration file (JSON); missing fields take their defaults
    #[clap(long)]
    config: Option<PathBuf>,
    /// Start from the 12-column board preset
    #[clap(long)]
    wide: bool,
    /// Board width, overriding the configuration
    #[clap(long)]
    width: Option<usize>,
    /// Board height, overriding the configuration
    #[clap(long)]
    height: Option<usize>,
    /// Piece seed as 32 hex digits (random when omitted)
    #[clap(long)]
    seed: Option<PieceSeed>,
}

impl EngineArg {
    /// Resolves the configuration: file (or preset), then command line overrides.
    pub(crate) fn engine_config(&self) -> anyhow::Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_json_file("engine config", path)?,
            None if self.wide => EngineConfig::wide(),
            None => EngineConfig::default(),
        };
        if let Some(width) = self.width {
            config.board_width = width;
        }
        if let Some(height) = self.height {
            config.board_height = height;
        }
        config.validate().context("Invalid engine configuration")?;
        Ok(config)
    }

    pub(crate) fn build_engine(&self) -> anyhow::Result<Engine> {
        let config = self.engine_config()?;
        let engine = match self.seed {
            Some(seed) => Engine::with_seed(config, seed)?,
            None => Engine::new(config)?,
        };
        Ok(engine)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[clap(flatten)]
        engine: EngineArg,
    }

    fn parse(args: &[&str]) -> EngineArg {
        TestCli::parse_from(std::iter::once("blockfall").chain(args.iter().copied())).engine
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]).engine_config().unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = parse(&["--wide", "--height", "24"]).engine_config().unwrap();
        assert_eq!((config.board_width, config.board_height), (12, 24));

        let config = parse(&["--wide", "--width", "16"]).engine_config().unwrap();
        assert_eq!(config.board_width, 16);
    }

    #[test]
    fn test_invalid_override_is_reported() {
        let err = parse(&["--width", "3"]).engine_config().unwrap_err();
        assert_eq!(err.to_string(), "Invalid engine configuration");
    }

    #[test]
    fn test_missing_config_file_has_context() {
        let err = parse(&["--config", "/nonexistent/blockfall.json"])
            .engine_config()
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/blockfall.json"));
    }

    #[test]
    fn test_seed_makes_engine_deterministic() {
        let arg = parse(&["--seed", "000000000000000000000000000000ff"]);
        let mut a = arg.build_engine().unwrap();
        let mut b = arg.build_engine().unwrap();
        assert_eq!(a.seed(), PieceSeed::from(255_u128));
        a.start();
        b.start();
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_bad_seed_is_rejected() {
        assert!(TestCli::try_parse_from(["blockfall", "--seed", "xyz"]).is_err());
    }
}
