use crate::properties::way_tags::WayTagSet;
use crate::transport_mode::TransportMode;

static CYCLE_HIGHWAYS: [&str; 9] = [
    "primary",
    "secondary",
    "tertiary",
    "unclassified",
    "minor",
    "cycleway",
    "residential",
    "track",
    "service",
];

static CAR_HIGHWAYS: [&str; 9] = [
    "motorway",
    "trunk",
    "primary",
    "secondary",
    "tertiary",
    "unclassified",
    "minor",
    "residential",
    "service",
];

static FOOT_ONLY_HIGHWAYS: [&str; 2] = ["footway", "steps"];

static HORSE_HIGHWAYS: [&str; 3] = ["track", "unclassified", "bridleway"];

static TRAIN_RAILWAYS: [&str; 3] = ["rail", "light_rail", "subway"];

/// Whether `mode` may use a way with these (already normalized) tags.
pub fn can_access(mode: TransportMode, tags: &WayTagSet) -> bool {
    let highway = tags.highway.as_str();

    match mode {
        TransportMode::Cycle => CYCLE_HIGHWAYS.contains(&highway),
        TransportMode::Car => CAR_HIGHWAYS.contains(&highway),
        TransportMode::Train => TRAIN_RAILWAYS.contains(&tags.railway.as_str()),
        TransportMode::Foot => {
            CYCLE_HIGHWAYS.contains(&highway) || FOOT_ONLY_HIGHWAYS.contains(&highway)
        }
        TransportMode::Horse => HORSE_HIGHWAYS.contains(&highway),
    }
}
