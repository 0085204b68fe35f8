use std::{
    fs::{self, File},
    io::{self, BufReader},
};

use anyhow::Context;
use serde_json::Value;

use light_pollution_tracker::{
    config::{Config, OutputFormat},
    map,
    present::{JsonPresenter, Presenter, TextPresenter},
    surface::{self, DrawEvent, Session},
};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = Config::from_args()?;

    let events = load_events(&config)?;
    log::info!("Replaying {} draw events…", events.len());

    let stdout = io::stdout().lock();
    let presenter: Box<dyn Presenter> = match config.format {
        OutputFormat::Text => Box::new(TextPresenter::new(stdout)),
        OutputFormat::Json => Box::new(JsonPresenter::new(stdout)),
    };

    let mut session = Session::new(config.scores.scorer(), presenter);
    let failures = session.replay(events);
    let stats = session.snapshot();
    log::info!(
        "Done: {} regions tracked, {:.2} km², {} events skipped.",
        stats.count,
        stats.total_area_km2,
        failures
    );

    if let Some(path) = &config.svg {
        let basemap = match &config.basemap_url {
            Some(url) => fetch_basemap(url),
            None => None,
        };
        let regions: Vec<_> = session.tracker().regions().collect();
        let svg = map::render_svg(&regions, &stats, basemap.as_ref());
        fs::write(path, &svg).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Written {} ({} bytes)", path.display(), svg.len());
    }
    Ok(())
}

fn load_events(config: &Config) -> anyhow::Result<Vec<DrawEvent>> {
    let events = match &config.events {
        Some(path) => {
            log::info!("Reading draw events from {}…", path.display());
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            surface::read_events(BufReader::new(file))?
        }
        None => {
            log::info!("Reading draw events from stdin…");
            surface::read_events(io::stdin().lock())?
        }
    };
    Ok(events)
}

/// The basemap is decoration: a failed fetch is logged and the map is
/// rendered without it.
fn fetch_basemap(url: &str) -> Option<Value> {
    log::info!("Fetching basemap polygons from {url}…");
    let resp = match ureq::get(url).set("Accept-Encoding", "identity").call() {
        Ok(resp) => resp,
        Err(e) => {
            log::warn!("Basemap fetch failed: {e}");
            return None;
        }
    };
    match serde_json::from_reader(resp.into_reader()) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Basemap is not valid JSON: {e}");
            None
        }
    }
}
