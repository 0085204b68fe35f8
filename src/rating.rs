//! Score bands and the advice attached to each.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    ExcellentDarkSky,
    Moderate,
    High,
}

impl Rating {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=29 => Rating::ExcellentDarkSky,
            30..=59 => Rating::Moderate,
            _ => Rating::High,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Rating::ExcellentDarkSky => "Excellent Dark Sky",
            Rating::Moderate => "Moderate Light Pollution",
            Rating::High => "High Light Pollution",
        }
    }

    pub fn badge(self) -> &'static str {
        match self {
            Rating::ExcellentDarkSky => "Galaxy Guardian",
            Rating::Moderate => "Moderate Impact",
            Rating::High => "Action Required",
        }
    }

    pub fn badge_class(self) -> &'static str {
        match self {
            Rating::ExcellentDarkSky => "excellent",
            Rating::Moderate => "moderate",
            Rating::High => "high",
        }
    }

    pub fn dark_sky_note(self) -> Option<&'static str> {
        match self {
            Rating::ExcellentDarkSky => Some(
                "This is a potential Dark Sky Friendly Zone. Ideal for astronomy!",
            ),
            _ => None,
        }
    }

    pub fn recommendations(self) -> &'static [&'static str] {
        match self {
            Rating::ExcellentDarkSky => &[
                "Maintain use of fully shielded, warm-color temperature lights.",
                "Ensure lights are off when not needed.",
                "Consider applying for Dark Sky certification.",
            ],
            Rating::Moderate => &[
                "Switch to downward-facing, shielded light fixtures.",
                "Consider using motion sensors for security lighting.",
                "Opt for LEDs with a color temperature below 3000K.",
                "Implement lighting curfews after midnight.",
            ],
            Rating::High => &[
                "Prioritize replacing unshielded lights (e.g., globe lights).",
                "Implement smart lighting controls and curfews.",
                "Use the lowest possible wattage for the task.",
                "Contact local authorities about excessive lighting.",
            ],
        }
    }

    /// High pollution gets an "Alert Planners" call to action.
    pub fn alerts_planners(self) -> bool {
        self == Rating::High
    }
}

/// Fill colour for a region on the map.
pub fn pollution_color(score: u8) -> &'static str {
    match score {
        0..=29 => "#00ff88",
        30..=59 => "#ffcc00",
        60..=79 => "#ff6b35",
        _ => "#ff3366",
    }
}
