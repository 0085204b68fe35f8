//! Presenters: where tracker output goes once state has changed.
//!
//! The tracker never reads anything back from a presenter; data only flows
//! outward as `Region`s, `AggregateStats` snapshots and `Notification`s.

use std::fmt;
use std::io::Write;

use serde::Serialize;

use crate::error::Result;
use crate::rating::Rating;
use crate::tracker::{AggregateStats, Region};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Info,
    Warning,
    Error,
}

impl NotificationKind {
    pub fn icon(self) -> &'static str {
        match self {
            NotificationKind::Success => "check-circle",
            NotificationKind::Info => "info-circle",
            NotificationKind::Warning => "exclamation-triangle",
            NotificationKind::Error => "times-circle",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    #[serde(rename = "level")]
    pub kind: NotificationKind,
}

impl Notification {
    pub fn new(kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind,
        }
    }

    pub fn area_selected() -> Self {
        Self::new(
            NotificationKind::Success,
            "Area Selected",
            "Analyzing light pollution levels...",
        )
    }

    pub fn area_removed() -> Self {
        Self::new(NotificationKind::Info, "Area Removed", "Analysis data updated")
    }

    pub fn analysis_failed(reason: impl fmt::Display) -> Self {
        Self::new(NotificationKind::Error, "Analysis Failed", reason.to_string())
    }
}

/// Display form of the aggregate counters: `--` stands in for "no data".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsDisplay {
    pub average: String,
    pub area: String,
}

impl From<&AggregateStats> for StatsDisplay {
    fn from(stats: &AggregateStats) -> Self {
        let average = if stats.count > 0 {
            format!("{}", stats.average_score.round() as i64)
        } else {
            "--".to_string()
        };
        let area = if stats.total_area_km2 > 0.0 {
            format!("{:.2}", stats.total_area_km2)
        } else {
            "--".to_string()
        };
        Self { average, area }
    }
}

pub trait Presenter {
    fn region_added(&mut self, region: &Region) -> Result<()>;
    fn stats_changed(&mut self, stats: &AggregateStats) -> Result<()>;
    fn notify(&mut self, notification: &Notification) -> Result<()>;
}

impl<P: Presenter + ?Sized> Presenter for Box<P> {
    fn region_added(&mut self, region: &Region) -> Result<()> {
        (**self).region_added(region)
    }

    fn stats_changed(&mut self, stats: &AggregateStats) -> Result<()> {
        (**self).stats_changed(stats)
    }

    fn notify(&mut self, notification: &Notification) -> Result<()> {
        (**self).notify(notification)
    }
}

/// Human-readable result entries.
pub struct TextPresenter<W> {
    out: W,
}

impl<W: Write> TextPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for TextPresenter<W> {
    fn region_added(&mut self, region: &Region) -> Result<()> {
        let rating = region.rating();
        let w = &mut self.out;
        writeln!(w, "── Region {} ──────────────────────────────", region.id)?;
        writeln!(
            w,
            "Pollution Level: {:>3}   [{}] {}",
            region.score,
            rating.badge_class(),
            rating.badge()
        )?;
        writeln!(w, "{}", rating.label())?;
        writeln!(
            w,
            "Area: {:.2} km² | Center: {:.4}, {:.4}",
            region.area_km2, region.center.lat, region.center.lng
        )?;
        if let Some(note) = rating.dark_sky_note() {
            writeln!(w, "* {note}")?;
        }
        writeln!(w, "Recommended Actions")?;
        for rec in rating.recommendations() {
            writeln!(w, "  - {rec}")?;
        }
        if rating.alerts_planners() {
            writeln!(w, "[!] Alert Planners")?;
        }
        Ok(())
    }

    fn stats_changed(&mut self, stats: &AggregateStats) -> Result<()> {
        let shown = StatsDisplay::from(stats);
        writeln!(
            self.out,
            "Areas: {}   Avg. pollution: {}   Area covered: {} km²",
            stats.count, shown.average, shown.area
        )?;
        Ok(())
    }

    fn notify(&mut self, n: &Notification) -> Result<()> {
        writeln!(self.out, "({}) {}: {}", n.kind.icon(), n.title, n.message)?;
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum Record<'a> {
    Region {
        #[serde(flatten)]
        region: &'a Region,
        rating: Rating,
        color: &'static str,
    },
    Stats {
        #[serde(flatten)]
        stats: &'a AggregateStats,
    },
    Notification {
        #[serde(flatten)]
        notification: &'a Notification,
    },
}

/// One JSON object per line, tagged by `kind`.
pub struct JsonPresenter<W> {
    out: W,
}

impl<W: Write> JsonPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, record: &Record<'_>) -> Result<()> {
        serde_json::to_writer(&mut self.out, record)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }
}

impl<W: Write> Presenter for JsonPresenter<W> {
    fn region_added(&mut self, region: &Region) -> Result<()> {
        self.emit(&Record::Region {
            region,
            rating: region.rating(),
            color: crate::rating::pollution_color(region.score),
        })
    }

    fn stats_changed(&mut self, stats: &AggregateStats) -> Result<()> {
        self.emit(&Record::Stats { stats })
    }

    fn notify(&mut self, notification: &Notification) -> Result<()> {
        self.emit(&Record::Notification { notification })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::LatLng;
    use crate::tracker::RegionId;
    use chrono::Utc;
    use serde_json::Value;

    fn region(score: u8) -> Region {
        Region {
            id: RegionId(3),
            area_km2: 2.345,
            score,
            center: LatLng::new(30.90104, 75.85733),
            outline: vec![LatLng::new(30.9, 75.8)],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn stats_display_uses_placeholders_when_empty() {
        let shown = StatsDisplay::from(&AggregateStats::default());
        assert_eq!(shown.average, "--");
        assert_eq!(shown.area, "--");

        let shown = StatsDisplay::from(&AggregateStats {
            count: 3,
            total_area_km2: 6.004,
            average_score: 49.5,
        });
        assert_eq!(shown.average, "50");
        assert_eq!(shown.area, "6.00");
    }

    #[test]
    fn text_entry_for_a_dark_sky() {
        let mut p = TextPresenter::new(Vec::new());
        p.region_added(&region(12)).unwrap();
        let text = String::from_utf8(p.into_inner()).unwrap();
        assert!(text.contains("Region #3"));
        assert!(text.contains("Galaxy Guardian"));
        assert!(text.contains("Area: 2.35 km² | Center: 30.9010, 75.8573"));
        assert!(text.contains("Dark Sky Friendly Zone"));
        assert!(!text.contains("Alert Planners"));
    }

    #[test]
    fn text_entry_for_high_pollution_alerts_planners() {
        let mut p = TextPresenter::new(Vec::new());
        p.region_added(&region(91)).unwrap();
        p.notify(&Notification::area_removed()).unwrap();
        let text = String::from_utf8(p.into_inner()).unwrap();
        assert!(text.contains("Action Required"));
        assert!(text.contains("[!] Alert Planners"));
        assert!(text.contains("(info-circle) Area Removed: Analysis data updated"));
    }

    #[test]
    fn json_lines_are_tagged() {
        let mut p = JsonPresenter::new(Vec::new());
        p.region_added(&region(45)).unwrap();
        p.stats_changed(&AggregateStats {
            count: 1,
            total_area_km2: 2.345,
            average_score: 45.0,
        })
        .unwrap();
        p.notify(&Notification::area_selected()).unwrap();

        let out = String::from_utf8(p.into_inner()).unwrap();
        let lines: Vec<Value> = out
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["kind"], "region");
        assert_eq!(lines[0]["id"], 3);
        assert_eq!(lines[0]["rating"], "moderate");
        assert_eq!(lines[0]["color"], "#ffcc00");
        assert_eq!(lines[1]["kind"], "stats");
        assert_eq!(lines[1]["count"], 1);
        assert_eq!(lines[2]["kind"], "notification");
        assert_eq!(lines[2]["level"], "success");
        assert_eq!(lines[2]["title"], "Area Selected");
    }
}
