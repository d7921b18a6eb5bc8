//! Advisory notes generation
//!
//! Pure text derivation: caveats about forecast provenance and seasonal
//! context for a resolved trip. No I/O and no failure modes beyond the
//! inputs being well-formed dates.

use crate::models::SeasonName;
use chrono::NaiveDate;

/// Derive advisory notes for a resolved forecast.
///
/// Rules are additive and order-preserving: at most one range caveat
/// (or the hybrid caveat), then a season-transition or single-season
/// packing note, then a season-specific packing tip.
#[must_use]
pub fn advisory_notes(
    city: &str,
    start: NaiveDate,
    end: NaiveDate,
    days_until_trip: i64,
    used_hybrid: bool,
) -> Vec<String> {
    let mut notes = Vec::new();

    if days_until_trip > 14 {
        notes.push(
            "Extended forecast uses historical seasonal data. Weather patterns can vary \
             significantly, so check closer to your travel dates."
                .to_string(),
        );
    } else if days_until_trip > 7 {
        notes.push(
            "Long-term weather forecast uses seasonal data. Consider checking weather \
             updates 1-2 weeks before your trip."
                .to_string(),
        );
    } else if days_until_trip > 5 {
        notes.push(
            "Weather forecast is based on seasonal averages. Check closer to your trip \
             date for more accurate predictions."
                .to_string(),
        );
    } else if used_hybrid {
        notes.push(
            "Forecast combines real-time data for the first 5 days with seasonal averages \
             for the remaining days. Check closer to your trip for updates on the later dates."
                .to_string(),
        );
    }

    let start_season = SeasonName::for_date(start);
    let end_season = SeasonName::for_date(end);

    if start_season != end_season {
        notes.push(format!(
            "Your trip spans {start_season} to {end_season} seasons. Pack versatile \
             clothing for changing weather."
        ));
    } else {
        notes.push(format!(
            "Your trip is during {start_season}. Pack accordingly for typical \
             {start_season} weather in {city}."
        ));
    }

    notes.push(packing_tip(start_season).to_string());

    notes
}

/// Season-specific packing tip
fn packing_tip(season: SeasonName) -> &'static str {
    match season {
        SeasonName::Winter => {
            "Winter travel tip: Pack layers and warm accessories. Weather can be \
             unpredictable with potential snow or rain."
        }
        SeasonName::Spring => {
            "Spring travel tip: Weather can be variable. Pack layers and be prepared \
             for both warm and cool days."
        }
        SeasonName::Summer => {
            "Summer travel tip: Expect warm weather. Don't forget sun protection and \
             lightweight clothing."
        }
        SeasonName::Fall => {
            "Fall travel tip: Temperatures can drop significantly. Pack layers and \
             warm clothing for cooler evenings."
        }
    }
}
