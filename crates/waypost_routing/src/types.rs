/// Map node identifier, as found in the raw way/node records.
pub type NodeId = i64;

pub type WayId = i64;
