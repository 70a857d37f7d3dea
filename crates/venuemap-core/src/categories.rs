//! Mapping from Google place types to the internal venue category taxonomy.

use std::collections::BTreeSet;

/// Catch-all category assigned when no provider tag is recognized.
pub const OTHER_CATEGORY: &str = "Other";

/// Google place type → internal category name.
pub const GOOGLE_TYPE_CATEGORIES: &[(&str, &str)] = &[
    ("bar", "Bar"),
    ("night_club", "Nightclub"),
    ("restaurant", "Restaurant"),
    ("cafe", "Café"),
    ("casino", "Casino"),
    ("movie_theater", "Entertainment"),
    ("amusement_park", "Entertainment"),
    ("bowling_alley", "Entertainment"),
];

fn category_for(google_type: &str) -> Option<&'static str> {
    GOOGLE_TYPE_CATEGORIES
        .iter()
        .find(|(tag, _)| *tag == google_type)
        .map(|(_, name)| *name)
}

/// Map a bag of Google place types to a deduplicated set of category names.
///
/// Unknown tags are dropped. The result is never empty: when nothing is
/// recognized it is `{"Other"}`.
pub fn map_google_types<I, S>(google_types: I) -> BTreeSet<&'static str>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut names: BTreeSet<&'static str> = google_types
        .into_iter()
        .filter_map(|t| category_for(t.as_ref()))
        .collect();

    if names.is_empty() {
        names.insert(OTHER_CATEGORY);
    }

    names
}
