//! map.rs: render tracked regions as a self-contained SVG.
//!
//! Equirectangular projection fitted to the regions' bounding box, with an
//! optional GeoJSON basemap (country outlines) drawn underneath.
//!
//! Region fill follows the pollution colour bands:
//!   green  (#00ff88) below 30
//!   yellow (#ffcc00) below 60
//!   orange (#ff6b35) below 80
//!   red    (#ff3366) otherwise

use serde_json::Value;

use crate::geo::LatLng;
use crate::present::StatsDisplay;
use crate::rating::pollution_color;
use crate::tracker::{AggregateStats, Region};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const W: f64 = 1200.0;
const H: f64 = 600.0;

/// Initial map view of the drawing tool (Ludhiana).
pub const DEFAULT_CENTER: LatLng = LatLng { lat: 30.9010, lng: 75.8573 };
const DEFAULT_SPAN_DEG: f64 = 0.2;

/// Fraction of the region extent added on every side.
const PADDING: f64 = 0.15;

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// Lat/lng window mapped onto the canvas, aspect ratio preserved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    west: f64,
    north: f64,
    deg_per_px: f64,
}

impl Viewport {
    pub fn fit(regions: &[&Region]) -> Self {
        let mut pts = regions.iter().flat_map(|r| r.outline.iter());
        let Some(first) = pts.next() else {
            return Self::around(DEFAULT_CENTER, DEFAULT_SPAN_DEG, DEFAULT_SPAN_DEG);
        };
        let (mut south, mut north, mut west, mut east) = (first.lat, first.lat, first.lng, first.lng);
        for p in pts {
            south = south.min(p.lat);
            north = north.max(p.lat);
            west = west.min(p.lng);
            east = east.max(p.lng);
        }
        let center = LatLng::new((south + north) / 2.0, (west + east) / 2.0);
        // a lone point or a line still needs a visible window
        let lng_span = ((east - west) * (1.0 + 2.0 * PADDING)).max(1e-3);
        let lat_span = ((north - south) * (1.0 + 2.0 * PADDING)).max(1e-3);
        Self::around(center, lng_span, lat_span)
    }

    fn around(center: LatLng, lng_span: f64, lat_span: f64) -> Self {
        let deg_per_px = (lng_span / W).max(lat_span / H);
        Self {
            west: center.lng - deg_per_px * W / 2.0,
            north: center.lat + deg_per_px * H / 2.0,
            deg_per_px,
        }
    }

    #[inline]
    pub fn project(&self, lng: f64, lat: f64) -> (f64, f64) {
        ((lng - self.west) / self.deg_per_px, (self.north - lat) / self.deg_per_px)
    }
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

fn outline_path(view: &Viewport, ring: &[LatLng]) -> String {
    let mut d = String::new();
    for (i, p) in ring.iter().enumerate() {
        let (x, y) = view.project(p.lng, p.lat);
        if i == 0 { d.push_str(&format!("M{x:.2},{y:.2}")) }
        else      { d.push_str(&format!("L{x:.2},{y:.2}")) }
    }
    d.push('Z');
    d
}

fn geojson_ring(coords: &[Value]) -> Vec<LatLng> {
    coords
        .iter()
        .filter_map(|pt| {
            let arr = pt.as_array()?;
            let lng = arr.first()?.as_f64()?;
            let lat = arr.get(1)?.as_f64()?;
            Some(LatLng::new(lat, lng))
        })
        .collect()
}

/// Every ring of a basemap `Polygon`/`MultiPolygon`, as SVG path data.
fn basemap_paths(view: &Viewport, geom: &Value) -> Vec<String> {
    let polygons: Vec<&Value> = match geom["type"].as_str().unwrap_or("") {
        "Polygon" => vec![&geom["coordinates"]],
        "MultiPolygon" => geom["coordinates"]
            .as_array()
            .map(|polys| polys.iter().collect())
            .unwrap_or_default(),
        _ => Vec::new(),
    };
    polygons
        .into_iter()
        .filter_map(Value::as_array)
        .flatten()
        .filter_map(Value::as_array)
        .map(|pts| outline_path(view, &geojson_ring(pts)))
        .collect()
}

// ---------------------------------------------------------------------------
// SVG rendering
// ---------------------------------------------------------------------------

pub fn render_svg(regions: &[&Region], stats: &AggregateStats, basemap: Option<&Value>) -> String {
    let view = Viewport::fit(regions);
    let mut s = String::with_capacity(64 << 10);

    // header
    s.push_str(&format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{W}" height="{H}" viewBox="0 0 {W} {H}">
  <title>Light Pollution Analysis</title>
  <desc>Drawn regions coloured by pollution score.</desc>
"#
    ));

    // background
    s.push_str(&format!("  <rect width='{W}' height='{H}' fill='#050b18'/>\n"));

    // scan grid, fixed 50px spacing in screen space
    s.push_str("  <g stroke='#00fff7' stroke-opacity='0.08' stroke-width='1'>\n");
    for x in (0..=W as u32).step_by(50) {
        s.push_str(&format!("    <line x1='{x}' y1='0' x2='{x}' y2='{H}'/>\n"));
    }
    for y in (0..=H as u32).step_by(50) {
        s.push_str(&format!("    <line x1='0' y1='{y}' x2='{W}' y2='{y}'/>\n"));
    }
    s.push_str("  </g>\n");

    // basemap
    if let Some(features) = basemap.and_then(|b| b["features"].as_array()) {
        s.push_str("  <g fill='#0f1e3a' stroke='#1e3a66' stroke-width='0.5'>\n");
        for feature in features {
            for d in basemap_paths(&view, &feature["geometry"]) {
                s.push_str(&format!("    <path d='{d}'/>\n"));
            }
        }
        s.push_str("  </g>\n");
    }

    // regions, oldest at the bottom
    s.push_str("  <g stroke-width='3' fill-opacity='0.3'>\n");
    for region in regions {
        let color = pollution_color(region.score);
        let d = outline_path(&view, &region.outline);
        s.push_str(&format!(
            "    <path d='{d}' fill='{color}' stroke='{color}'><title>region {} score {}</title></path>\n",
            region.id.0, region.score
        ));
    }
    s.push_str("  </g>\n");

    // score labels
    s.push_str("  <g font-family='monospace' font-size='14' fill='#e2e8f0' text-anchor='middle'>\n");
    for region in regions {
        let (x, y) = view.project(region.center.lng, region.center.lat);
        s.push_str(&format!("    <text x='{x:.1}' y='{y:.1}'>{}</text>\n", region.score));
    }
    s.push_str("  </g>\n");

    // legend
    let legend = [
        ("#00ff88", "Dark sky (<30)"),
        ("#ffcc00", "Moderate (<60)"),
        ("#ff6b35", "High (<80)"),
        ("#ff3366", "Severe"),
    ];
    let lx = 16.0_f64;
    let mut ly = H - 100.0;
    s.push_str("  <g font-family='monospace' font-size='12' fill='#e2e8f0'>\n");
    for (color, label) in &legend {
        s.push_str(&format!("    <rect x='{lx:.1}' y='{:.1}' width='12' height='12' fill='{color}'/>\n", ly - 6.0));
        s.push_str(&format!("    <text x='{:.1}' y='{:.1}'>{label}</text>\n", lx + 18.0, ly + 4.5));
        ly += 20.0;
    }
    let shown = StatsDisplay::from(stats);
    s.push_str(&format!(
        "    <text x='{lx:.1}' y='{:.1}' font-size='10' fill='#64748b'>regions: {}  avg. pollution: {}  area: {} km²</text>\n",
        H - 8.0,
        stats.count,
        shown.average,
        shown.area
    ));
    s.push_str("  </g>\n");

    s.push_str("</svg>\n");
    s
}
