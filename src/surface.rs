//! Drawing-surface events and the session that wires them to the tracker.
//!
//! Control flow is strictly one way:
//! surface event → `RegionStatsTracker::add`/`remove` → `Presenter`.

use std::io::Read;

use serde::Deserialize;
use serde_json::Value;

use crate::error::Result;
use crate::geo::{AreaModel, Geodesic, Geometry};
use crate::present::{Notification, Presenter};
use crate::score::Scorer;
use crate::tracker::{AggregateStats, Region, RegionId, RegionStatsTracker};

/// What a drawing surface reports.
///
/// ```json
/// { "event": "created", "geometry": { "type": "Polygon", "coordinates": [...] } }
/// { "event": "deleted", "ids": [1, 3] }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum DrawEvent {
    Created { geometry: Value },
    Deleted { ids: Vec<RegionId> },
}

/// Read a recorded event script: a JSON array of [`DrawEvent`]s.
pub fn read_events<R: Read>(reader: R) -> Result<Vec<DrawEvent>> {
    Ok(serde_json::from_reader(reader)?)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Created(Region),
    Deleted {
        removed: Vec<RegionId>,
        unknown: Vec<RegionId>,
    },
}

pub struct Session<S, P, M = Geodesic> {
    tracker: RegionStatsTracker<S, M>,
    presenter: P,
}

impl<S: Scorer, P: Presenter> Session<S, P, Geodesic> {
    pub fn new(scorer: S, presenter: P) -> Self {
        Self::with_tracker(RegionStatsTracker::new(scorer), presenter)
    }
}

impl<S: Scorer, P: Presenter, M: AreaModel> Session<S, P, M> {
    pub fn with_tracker(tracker: RegionStatsTracker<S, M>, presenter: P) -> Self {
        Self { tracker, presenter }
    }

    pub fn tracker(&self) -> &RegionStatsTracker<S, M> {
        &self.tracker
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn snapshot(&self) -> AggregateStats {
        self.tracker.snapshot()
    }

    pub fn into_parts(self) -> (RegionStatsTracker<S, M>, P) {
        (self.tracker, self.presenter)
    }

    pub fn handle(&mut self, event: DrawEvent) -> Result<Outcome> {
        match event {
            DrawEvent::Created { geometry } => self.created(&geometry),
            DrawEvent::Deleted { ids } => self.deleted(&ids),
        }
    }

    fn created(&mut self, geojson: &Value) -> Result<Outcome> {
        let added = Geometry::from_geojson(geojson).and_then(|g| self.tracker.add(&g));
        let region = match added {
            Ok(region) => region,
            Err(e) => {
                self.presenter.notify(&Notification::analysis_failed(&e))?;
                return Err(e);
            }
        };
        // the region stays tracked even if rendering it fails
        if let Err(e) = self.present_created(&region) {
            log::warn!("region {} tracked but not presented: {e}", region.id);
        }
        Ok(Outcome::Created(region))
    }

    fn present_created(&mut self, region: &Region) -> Result<()> {
        self.presenter.region_added(region)?;
        self.presenter.stats_changed(&self.tracker.snapshot())?;
        self.presenter.notify(&Notification::area_selected())
    }

    fn deleted(&mut self, ids: &[RegionId]) -> Result<Outcome> {
        let (removed, unknown): (Vec<RegionId>, Vec<RegionId>) =
            ids.iter().partition(|id| self.tracker.remove(**id));
        if !unknown.is_empty() {
            log::debug!("delete named {} untracked region(s)", unknown.len());
        }
        self.presenter.stats_changed(&self.tracker.snapshot())?;
        self.presenter.notify(&Notification::area_removed())?;
        Ok(Outcome::Deleted { removed, unknown })
    }

    /// Handle every event in order. Events that fail are logged and
    /// skipped; the number of failures is returned.
    pub fn replay<I>(&mut self, events: I) -> usize
    where
        I: IntoIterator<Item = DrawEvent>,
    {
        let mut failures = 0;
        for (i, event) in events.into_iter().enumerate() {
            if let Err(e) = self.handle(event) {
                log::warn!("event {i} skipped: {e}");
                failures += 1;
            }
        }
        failures
    }
}
