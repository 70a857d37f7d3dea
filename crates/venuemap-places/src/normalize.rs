//! Normalization of Google Maps wire types into provider-neutral place records.

use venuemap_core::{Coordinate, OpeningPeriod, PlaceDetails, PlaceSummary, PlaceTime};

use crate::types::{DayTime, NearbyResult, PlaceDetailsResult};

/// Meters per statute mile.
pub const METERS_PER_MILE: f64 = 1_609.344;

/// Largest radius the nearby-search endpoint accepts.
pub const MAX_NEARBY_RADIUS_METERS: u32 = 50_000;

/// Converts a radius in miles to the whole-meter value the nearby-search
/// endpoint expects, clamped to `1..=50_000`.
#[must_use]
pub fn miles_to_meters(radius_miles: f64) -> u32 {
    if !radius_miles.is_finite() || radius_miles <= 0.0 {
        return 1;
    }
    let meters = (radius_miles * METERS_PER_MILE).round();
    if meters >= f64::from(MAX_NEARBY_RADIUS_METERS) {
        MAX_NEARBY_RADIUS_METERS
    } else {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let meters = meters as u32;
        meters.max(1)
    }
}

#[must_use]
pub fn normalize_summary(result: NearbyResult) -> PlaceSummary {
    PlaceSummary {
        external_id: result.place_id,
        name: result.name,
        vicinity: result.vicinity,
    }
}

/// Converts a details payload into a [`PlaceDetails`].
///
/// Returns `None` when the payload lacks a name or a location, since a venue
/// cannot be stored without either.
#[must_use]
pub fn normalize_details(result: PlaceDetailsResult) -> Option<PlaceDetails> {
    let location = result.geometry?.location;
    let name = result.name.filter(|n| !n.trim().is_empty())?;

    let (open_now, opening_periods) = match result.opening_hours {
        Some(hours) => (
            hours.open_now,
            hours
                .periods
                .into_iter()
                .map(|p| OpeningPeriod {
                    open: place_time(p.open),
                    close: p.close.map(place_time),
                })
                .collect(),
        ),
        None => (None, Vec::new()),
    };

    Some(PlaceDetails {
        external_id: result.place_id,
        name,
        formatted_address: result.formatted_address.unwrap_or_default(),
        coordinate: Coordinate::new(location.lat, location.lng),
        rating: result.rating,
        rating_count: result.user_ratings_total,
        price_level: result.price_level,
        website: result.website,
        phone: result.formatted_phone_number,
        open_now,
        types: result.types,
        opening_periods,
    })
}

fn place_time(raw: DayTime) -> PlaceTime {
    PlaceTime {
        day: raw.day,
        time: raw.time,
    }
}
