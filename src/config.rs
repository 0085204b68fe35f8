//! Command-line and environment configuration for the replay binary.
//!
//! `Cli` is the raw clap surface; `Config` is what the rest of the program
//! consumes after validation.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::error::{Result, TrackerError};
use crate::score::{FixedScorer, RandomScorer, Scorer, MAX_SCORE};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable result entries.
    Text,
    /// One JSON object per line.
    Json,
}

/// Replay recorded drawing-surface events and report light pollution scores.
#[derive(Debug, Parser)]
#[command(name = "light-pollution-tracker", version)]
pub struct Cli {
    /// JSON array of draw events, `-` for stdin.
    pub events: PathBuf,

    /// Seed for the score generator, for reproducible runs.
    /// Ignored when `--fixed-score` is given.
    #[arg(long, env = "LPT_SEED")]
    pub seed: Option<u64>,

    /// Give every region this score instead of a random one.
    #[arg(long)]
    pub fixed_score: Option<u8>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write an SVG map of the surviving regions here.
    #[arg(long)]
    pub svg: Option<PathBuf>,

    /// GeoJSON FeatureCollection drawn under the regions on the map.
    /// Only used together with `--svg`.
    #[arg(long, env = "LPT_BASEMAP_URL")]
    pub basemap_url: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreSource {
    Entropy,
    Seeded(u64),
    Fixed(u8),
}

impl ScoreSource {
    pub fn scorer(self) -> Box<dyn Scorer> {
        match self {
            ScoreSource::Entropy => Box::new(RandomScorer::from_entropy()),
            ScoreSource::Seeded(seed) => Box::new(RandomScorer::seeded(seed)),
            ScoreSource::Fixed(score) => Box::new(FixedScorer::new(score)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    /// `None` reads events from stdin.
    pub events: Option<PathBuf>,
    pub scores: ScoreSource,
    pub format: OutputFormat,
    pub svg: Option<PathBuf>,
    pub basemap_url: Option<String>,
}

impl Config {
    pub fn from_args() -> Result<Self> {
        Self::try_from(Cli::parse())
    }
}

impl TryFrom<Cli> for Config {
    type Error = TrackerError;

    fn try_from(cli: Cli) -> Result<Self> {
        let scores = match (cli.fixed_score, cli.seed) {
            (Some(score), _) if score > MAX_SCORE => {
                return Err(TrackerError::InvalidConfig(format!(
                    "--fixed-score must be at most {MAX_SCORE}, got {score}"
                )))
            }
            (Some(score), _) => ScoreSource::Fixed(score),
            (None, Some(seed)) => ScoreSource::Seeded(seed),
            (None, None) => ScoreSource::Entropy,
        };
        let events = (cli.events.as_os_str() != "-").then_some(cli.events);
        let mut basemap_url = cli.basemap_url.filter(|u| !u.trim().is_empty());
        if cli.svg.is_none() && basemap_url.is_some() {
            log::warn!("basemap URL given without --svg, ignoring it");
            basemap_url = None;
        }
        Ok(Self {
            events,
            scores,
            format: cli.format,
            svg: cli.svg,
            basemap_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(args: &[&str]) -> Result<Config> {
        let cli = Cli::try_parse_from(std::iter::once("light-pollution-tracker").chain(args.iter().copied()))
            .map_err(|e| TrackerError::InvalidConfig(e.to_string()))?;
        Config::try_from(cli)
    }

    #[test]
    fn defaults() {
        let c = config(&["events.json"]).unwrap();
        assert_eq!(c.events, Some(PathBuf::from("events.json")));
        assert_eq!(c.format, OutputFormat::Text);
        assert!(c.svg.is_none());
    }

    #[test]
    fn dash_means_stdin() {
        assert_eq!(config(&["-"]).unwrap().events, None);
    }

    #[test]
    fn score_sources() {
        assert_eq!(config(&["e.json", "--seed", "9"]).unwrap().scores, ScoreSource::Seeded(9));
        assert_eq!(
            config(&["e.json", "--fixed-score", "42"]).unwrap().scores,
            ScoreSource::Fixed(42)
        );
        assert!(config(&["e.json", "--fixed-score", "101"]).is_err());
        // a fixed score wins over any seed
        assert_eq!(
            config(&["e.json", "--fixed-score", "1", "--seed", "2"]).unwrap().scores,
            ScoreSource::Fixed(1)
        );
    }

    #[test]
    fn basemap_is_dropped_without_svg_output() {
        let c = config(&["e.json", "--basemap-url", "http://x/world.geojson"]).unwrap();
        assert!(c.basemap_url.is_none());
        let c = config(&[
            "e.json",
            "--svg",
            "map.svg",
            "--format",
            "json",
            "--basemap-url",
            "http://x/world.geojson",
        ])
        .unwrap();
        assert_eq!(c.format, OutputFormat::Json);
        assert_eq!(c.basemap_url.as_deref(), Some("http://x/world.geojson"));
    }

    #[test]
    fn environment_overrides_do_not_break_plain_runs() {
        std::env::set_var("LPT_SEED", "5");
        std::env::set_var("LPT_BASEMAP_URL", "http://x/env.geojson");

        let plain = config(&["e.json"]);
        let fixed = config(&["e.json", "--fixed-score", "10"]);
        let mapped = config(&["e.json", "--svg", "map.svg"]);

        std::env::remove_var("LPT_SEED");
        std::env::remove_var("LPT_BASEMAP_URL");

        let plain = plain.unwrap();
        assert_eq!(plain.scores, ScoreSource::Seeded(5));
        assert!(plain.basemap_url.is_none());
        assert_eq!(fixed.unwrap().scores, ScoreSource::Fixed(10));
        assert_eq!(mapped.unwrap().basemap_url.as_deref(), Some("http://x/env.geojson"));
    }
}
