//! Light pollution tracker: scores user-drawn map regions and keeps running
//! totals over whatever is currently drawn.
//!
//! A drawing surface reports [`surface::DrawEvent`]s, a [`surface::Session`]
//! feeds them to the [`tracker::RegionStatsTracker`], and a
//! [`present::Presenter`] renders what comes out.

pub mod config;
pub mod error;
pub mod geo;
pub mod map;
pub mod present;
pub mod rating;
pub mod score;
pub mod surface;
pub mod tracker;

pub use error::{Result, TrackerError};
pub use tracker::{AggregateStats, Region, RegionId, RegionStatsTracker};
