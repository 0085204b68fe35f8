//! geo.rs: drawn-shape geometry and geodesic area.
//!
//! Decodes the GeoJSON a drawing surface emits for a polygon or rectangle
//! and exposes the one measurement the tracker needs:
//!
//! ```
//! use light_pollution_tracker::geo::{AreaModel, Geodesic, Geometry, LatLng};
//!
//! let square = Geometry::new(vec![
//!     LatLng::new(0.0, 0.0),
//!     LatLng::new(0.0, 0.01),
//!     LatLng::new(0.01, 0.01),
//!     LatLng::new(0.01, 0.0),
//! ]);
//! let m = Geodesic.measure(&square).unwrap();
//! assert!(m.area_km2 > 1.0 && m.area_km2 < 1.3);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, TrackerError};

/// Equatorial radius used by the drawing layer's area approximation.
const EARTH_RADIUS_M: f64 = 6_378_137.0;
const M2_PER_KM2: f64 = 1_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Outer ring of a user-drawn polygon or rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub ring: Vec<LatLng>,
}

impl Geometry {
    pub fn new(ring: Vec<LatLng>) -> Self {
        Self { ring }
    }

    /// Decode a GeoJSON `Polygon`, or a `Feature` wrapping one.
    ///
    /// Coordinates are `[lng, lat]`. Only the outer ring is kept; holes
    /// cannot be drawn with the polygon/rectangle tools anyway.
    pub fn from_geojson(value: &Value) -> Result<Self> {
        let geom = match value["type"].as_str() {
            Some("Feature") => &value["geometry"],
            _ => value,
        };
        match geom["type"].as_str() {
            Some("Polygon") => {}
            Some(other) => {
                return Err(TrackerError::InvalidGeometry(format!(
                    "unsupported geometry type {other:?}"
                )))
            }
            None => return Err(invalid("missing geometry type")),
        }

        let outer = geom["coordinates"]
            .as_array()
            .and_then(|rings| rings.first())
            .and_then(Value::as_array)
            .ok_or_else(|| invalid("polygon has no outer ring"))?;

        let ring = outer
            .iter()
            .map(position)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { ring })
    }

    /// Spherical-excess area of the ring in square metres.
    ///
    /// Zero for rings with fewer than three vertices. Winding order does not
    /// matter and a closing duplicate vertex contributes nothing.
    pub fn geodesic_area_m2(&self) -> f64 {
        let n = self.ring.len();
        if n < 3 {
            return 0.0;
        }
        let mut area = 0.0;
        for i in 0..n {
            let p1 = self.ring[i];
            let p2 = self.ring[(i + 1) % n];
            area += (p2.lng - p1.lng).to_radians()
                * (2.0 + p1.lat.to_radians().sin() + p2.lat.to_radians().sin());
        }
        (area * EARTH_RADIUS_M * EARTH_RADIUS_M / 2.0).abs()
    }

    /// Centre of the lat/lng bounding box, `None` for an empty ring.
    pub fn bounds_center(&self) -> Option<LatLng> {
        let first = self.ring.first()?;
        let (mut south, mut north) = (first.lat, first.lat);
        let (mut west, mut east) = (first.lng, first.lng);
        for p in &self.ring[1..] {
            south = south.min(p.lat);
            north = north.max(p.lat);
            west = west.min(p.lng);
            east = east.max(p.lng);
        }
        Some(LatLng::new((south + north) / 2.0, (west + east) / 2.0))
    }

    fn validate(&self) -> Result<()> {
        for p in &self.ring {
            if !p.lat.is_finite() || !p.lng.is_finite() {
                return Err(invalid("non-finite coordinate"));
            }
            if !(-90.0..=90.0).contains(&p.lat) {
                return Err(TrackerError::InvalidGeometry(format!(
                    "latitude {} out of range",
                    p.lat
                )));
            }
        }
        Ok(())
    }
}

/// What the tracker learns about a shape at creation time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub area_km2: f64,
    pub center: LatLng,
}

/// Geometry → area and centre. Must be deterministic for equal input.
pub trait AreaModel {
    fn measure(&self, geometry: &Geometry) -> Result<Measurement>;
}

/// The drawing layer's own area approximation on a spherical earth.
#[derive(Debug, Clone, Copy, Default)]
pub struct Geodesic;

impl AreaModel for Geodesic {
    fn measure(&self, geometry: &Geometry) -> Result<Measurement> {
        geometry.validate()?;
        let center = geometry
            .bounds_center()
            .ok_or_else(|| invalid("empty ring has no centre"))?;
        Ok(Measurement {
            area_km2: geometry.geodesic_area_m2() / M2_PER_KM2,
            center,
        })
    }
}

fn position(pt: &Value) -> Result<LatLng> {
    let arr = pt
        .as_array()
        .ok_or_else(|| invalid("position is not an array"))?;
    let lng = arr.first().and_then(Value::as_f64);
    let lat = arr.get(1).and_then(Value::as_f64);
    match (lat, lng) {
        (Some(lat), Some(lng)) => Ok(LatLng::new(lat, lng)),
        _ => Err(invalid("position needs numeric [lng, lat]")),
    }
}

fn invalid(msg: &str) -> TrackerError {
    TrackerError::InvalidGeometry(msg.to_string())
}
