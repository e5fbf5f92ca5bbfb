use crate::osm::map_data::OsmWay;
use crate::transport_mode::TransportMode;

static ONEWAYS: [&str; 3] = ["yes", "true", "1"];

/// Normalized routing tags of a single way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WayTagSet {
    pub highway: String,
    pub railway: String,
    pub oneway: bool,
}

impl WayTagSet {
    pub fn new(highway: &str, railway: &str, oneway: &str) -> Self {
        WayTagSet {
            highway: equivalent(highway).to_string(),
            railway: equivalent(railway).to_string(),
            oneway: ONEWAYS.contains(&oneway),
        }
    }

    pub fn from_way(way: &OsmWay) -> Self {
        Self::new(
            way.get_tag("highway").unwrap_or(""),
            way.get_tag("railway").unwrap_or(""),
            way.get_tag("oneway").unwrap_or(""),
        )
    }

    pub fn is_reversible(&self) -> bool {
        !self.oneway
    }

    /// The class that drives access and weights for `mode`: the railway class
    /// for trains, the highway class otherwise.
    pub fn class_for(&self, mode: TransportMode) -> &str {
        match mode {
            TransportMode::Train => &self.railway,
            _ => &self.highway,
        }
    }
}

/// Collapses closely related classes onto one routing class. Unmapped values
/// pass through unchanged.
pub fn equivalent(tag: &str) -> &str {
    match tag {
        "primary_link" | "trunk" | "trunk_link" => "primary",
        "secondary_link" | "tertiary" | "tertiary_link" => "secondary",
        "residential" | "minor" => "unclassified",
        "steps" | "pedestrian" | "arcade" => "footway",
        "driveway" => "service",
        "bridleway" | "track" => "cycleway",
        "canal" | "riverbank" | "lake" => "river",
        "light_rail" => "railway",
        _ => tag,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_equivalent_classes() {
        assert_eq!(equivalent("trunk"), "primary");
        assert_eq!(equivalent("residential"), "unclassified");
        assert_eq!(equivalent("steps"), "footway");
        assert_eq!(equivalent("track"), "cycleway");
        assert_eq!(equivalent("light_rail"), "railway");
    }

    #[test]
    fn unmapped_classes_pass_through() {
        assert_eq!(equivalent("motorway"), "motorway");
        assert_eq!(equivalent("subway"), "subway");
        assert_eq!(equivalent(""), "");
    }

    #[test]
    fn oneway_values() {
        for value in ["yes", "true", "1"] {
            assert!(!WayTagSet::new("primary", "", value).is_reversible());
        }

        for value in ["no", "-1", "", "YES"] {
            assert!(WayTagSet::new("primary", "", value).is_reversible());
        }
    }

    #[test]
    fn class_depends_on_mode() {
        let tags = WayTagSet::new("tertiary", "subway", "");
        assert_eq!(tags.class_for(TransportMode::Car), "secondary");
        assert_eq!(tags.class_for(TransportMode::Train), "subway");
    }
}
