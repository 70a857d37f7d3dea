use super::*;
use crate::venues::format_venue_line;
use venuemap_core::{SortBy, SortOrder, Venue, VenueCategory, VenueStatus};

#[test]
fn parses_db_ping_command() {
    let cli =
        Cli::try_parse_from(["venuemap-cli", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli =
        Cli::try_parse_from(["venuemap-cli", "db", "migrate"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["venuemap-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn search_accepts_negative_longitude_and_defaults() {
    let cli = Cli::try_parse_from([
        "venuemap-cli",
        "venues",
        "search",
        "--lat",
        "40.7",
        "--lon",
        "-74.0",
    ])
    .unwrap();

    assert!(matches!(
        cli.command,
        Some(Commands::Venues {
            command: VenuesCommands::Search {
                radius: None,
                sort: None,
                order: None,
                open_now: false,
                limit: 20,
                offset: 0,
                ..
            }
        })
    ));
}

#[test]
fn search_parses_sort_order_and_categories() {
    let cli = Cli::try_parse_from([
        "venuemap-cli",
        "venues",
        "search",
        "--lat",
        "40.7",
        "--lon",
        "-74.0",
        "--sort",
        "rating",
        "--order",
        "asc",
        "--category",
        "Bar",
        "--category",
        "Nightclub",
    ])
    .unwrap();

    match cli.command {
        Some(Commands::Venues {
            command:
                VenuesCommands::Search {
                    sort,
                    order,
                    categories,
                    ..
                },
        }) => {
            assert_eq!(sort, Some(SortBy::Rating));
            assert_eq!(order, Some(SortOrder::Asc));
            assert_eq!(categories, vec!["Bar".to_string(), "Nightclub".to_string()]);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn search_rejects_unknown_sort_key() {
    let result = Cli::try_parse_from([
        "venuemap-cli",
        "venues",
        "search",
        "--lat",
        "1",
        "--lon",
        "1",
        "--sort",
        "closest",
    ]);
    assert!(result.is_err());
}

#[test]
fn import_parses_type_hint_and_default_radius() {
    let cli = Cli::try_parse_from([
        "venuemap-cli",
        "venues",
        "import",
        "--lat",
        "-33.86",
        "--lon",
        "151.2",
        "--type",
        "bar",
    ])
    .unwrap();

    assert!(matches!(
        cli.command,
        Some(Commands::Venues {
            command: VenuesCommands::Import {
                place_type: Some(ref t),
                ..
            }
        }) if t == "bar"
    ));
    if let Some(Commands::Venues {
        command: VenuesCommands::Import { radius, lat, .. },
    }) = cli.command
    {
        assert!((radius - 10.0).abs() < f64::EPSILON);
        assert!((lat + 33.86).abs() < 1e-9);
    }
}

#[test]
fn geocode_takes_positional_address() {
    let cli = Cli::try_parse_from(["venuemap-cli", "venues", "geocode", "1 Main St"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Venues {
            command: VenuesCommands::Geocode { ref address }
        }) if address == "1 Main St"
    ));
}

#[test]
fn format_venue_line_shows_distance_rating_and_categories() {
    let now = chrono::Utc::now();
    let venue = Venue {
        id: uuid::Uuid::nil(),
        name: "Corner Tap".to_string(),
        address: "1 Main St".to_string(),
        latitude: 40.7,
        longitude: -74.0,
        google_place_id: None,
        google_rating: Some(4.25),
        google_ratings_total: None,
        price_level: None,
        website: None,
        phone: None,
        is_open_now: None,
        status: VenueStatus::Approved,
        categories: vec![VenueCategory {
            id: uuid::Uuid::nil(),
            name: "Bar".to_string(),
        }],
        hours: Vec::new(),
        distance_miles: Some(1.234),
        created_at: now,
        updated_at: now,
    };

    let line = format_venue_line(&venue);
    assert!(line.contains("1.23 mi"), "{line}");
    assert!(line.contains("4.2") || line.contains("4.3"), "{line}");
    assert!(line.contains("Corner Tap  [Bar]  1 Main St"), "{line}");
}
