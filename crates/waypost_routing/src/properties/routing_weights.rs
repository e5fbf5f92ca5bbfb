use crate::transport_mode::TransportMode;

/// Base weight of a way class for a transport mode. Higher weights make a
/// way cheaper to traverse, `0.0` makes it impassable.
pub fn base_weight(mode: TransportMode, class: &str) -> f64 {
    use TransportMode::{Car, Cycle, Foot, Horse, Train};

    match (class, mode) {
        ("motorway", Car) => 10.0,

        ("trunk", Car) => 10.0,
        ("trunk", Cycle) => 0.05,

        ("primary", Car) => 2.0,
        ("primary", Cycle) => 0.3,
        ("primary", Foot) => 1.0,
        ("primary", Horse) => 0.1,

        ("secondary", Car) => 1.5,
        ("secondary", Cycle | Foot) => 1.0,
        ("secondary", Horse) => 0.2,

        ("tertiary", Car | Cycle | Foot) => 1.0,
        ("tertiary", Horse) => 0.3,

        ("unclassified" | "minor" | "track" | "service", Car | Cycle | Foot | Horse) => 1.0,

        ("cycleway", Cycle) => 3.0,
        ("cycleway", Foot) => 0.2,

        ("residential", Car) => 0.7,
        ("residential", Cycle) => 3.0,
        ("residential", Foot | Horse) => 1.0,

        ("bridleway", Cycle) => 0.8,
        ("bridleway", Foot) => 1.0,
        ("bridleway", Horse) => 10.0,

        ("footway", Cycle) => 0.2,
        ("footway", Foot) => 1.0,

        ("steps", Cycle) => 0.3,
        ("steps", Foot) => 1.0,

        ("rail" | "light_rail" | "subway", Train) => 1.0,

        _ => 0.0,
    }
}
