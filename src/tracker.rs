//! Live set of drawn regions and the aggregates derived from it.
//!
//! The tracker is the only writer of [`AggregateStats`]; everything else
//! reads snapshots. Mutation is single-threaded. Wrap the tracker in a
//! `Mutex` if it ever has to be shared, since both updates are
//! read-modify-write sequences.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geo::{AreaModel, Geodesic, Geometry, LatLng};
use crate::rating::Rating;
use crate::score::Scorer;

/// Assigned once at creation, never reused within a tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(pub u64);

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One drawn shape. Area and score are fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    pub id: RegionId,
    pub area_km2: f64,
    pub score: u8,
    pub center: LatLng,
    pub outline: Vec<LatLng>,
    pub created_at: DateTime<Utc>,
}

impl Region {
    pub fn rating(&self) -> Rating {
        Rating::from_score(self.score)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AggregateStats {
    pub count: usize,
    pub total_area_km2: f64,
    /// Exact mean of the tracked scores, 0 when nothing is tracked.
    pub average_score: f64,
}

pub struct RegionStatsTracker<S, M = Geodesic> {
    scorer: S,
    area_model: M,
    regions: BTreeMap<RegionId, Region>,
    next_id: u64,
    total_area_km2: f64,
    score_sum: u64,
}

impl<S: Scorer> RegionStatsTracker<S, Geodesic> {
    pub fn new(scorer: S) -> Self {
        Self::with_area_model(scorer, Geodesic)
    }
}

impl<S: Scorer, M: AreaModel> RegionStatsTracker<S, M> {
    pub fn with_area_model(scorer: S, area_model: M) -> Self {
        Self {
            scorer,
            area_model,
            regions: BTreeMap::new(),
            next_id: 1,
            total_area_km2: 0.0,
            score_sum: 0,
        }
    }

    /// Measure, score and start tracking a new region.
    ///
    /// Fails with `InvalidGeometry` when the shape cannot be measured; the
    /// tracker is left untouched in that case.
    pub fn add(&mut self, geometry: &Geometry) -> Result<Region> {
        let measurement = self.area_model.measure(geometry)?;
        let area_km2 = measurement.area_km2.max(0.0);
        let score = self.scorer.score(area_km2);

        let id = RegionId(self.next_id);
        self.next_id += 1;

        let region = Region {
            id,
            area_km2,
            score,
            center: measurement.center,
            outline: geometry.ring.clone(),
            created_at: Utc::now(),
        };

        // ids only grow, so this continues the id-ordered fold
        self.total_area_km2 += area_km2;
        self.score_sum += u64::from(score);
        self.regions.insert(id, region.clone());

        log::debug!(
            "tracked region {id}: {area_km2:.2} km², score {score} ({} total)",
            self.regions.len()
        );
        Ok(region)
    }

    /// Stop tracking `id`. Unknown ids are a no-op and return `false`.
    pub fn remove(&mut self, id: RegionId) -> bool {
        let Some(region) = self.regions.remove(&id) else {
            log::debug!("remove of untracked region {id} ignored");
            return false;
        };
        self.score_sum -= u64::from(region.score);
        // re-fold rather than subtract so the total never drifts
        self.total_area_km2 = self
            .regions
            .values()
            .fold(0.0, |acc, r| acc + r.area_km2);

        log::debug!("removed region {id} ({} left)", self.regions.len());
        true
    }

    pub fn snapshot(&self) -> AggregateStats {
        let count = self.regions.len();
        let average_score = if count == 0 {
            0.0
        } else {
            self.score_sum as f64 / count as f64
        };
        AggregateStats {
            count,
            total_area_km2: self.total_area_km2,
            average_score,
        }
    }

    pub fn get(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(&id)
    }

    /// Tracked regions in creation order.
    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.values()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
