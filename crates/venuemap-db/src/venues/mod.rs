//! Database operations for the `venues` table and its link tables.

mod read;
mod types;
mod write;

pub use read::{
    find_venue_by_google_place_id, get_venue_by_id, search_venues, DEFAULT_SEARCH_LIMIT,
    DEFAULT_SEARCH_RADIUS_MILES, MAX_SEARCH_LIMIT,
};
pub use types::{VenueHourRow, VenueRow, VenueSearchRow};
pub use write::insert_venue;
