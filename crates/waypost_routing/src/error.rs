use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Failed to read map data file")]
    Read(#[from] std::io::Error),
    #[error("Map data is not a JSON array of records: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum RiskOverlayError {
    #[error("Failed to read risk file")]
    Read(#[from] std::io::Error),
    #[error("Failed to parse risk file: {0}")]
    Csv(#[from] csv::Error),
    #[error("Malformed risk line {line}: {reason}")]
    Malformed { line: u64, reason: String },
}

#[derive(Error, Debug)]
pub enum TileError {
    #[error("Tile {0} is unavailable: {1}")]
    Unavailable(String, String),
    #[error("Failed to load tile records")]
    Records(#[from] RecordError),
}

#[derive(Error, Debug)]
pub enum GraphFileError {
    #[error("Failed to access graph file")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode graph")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("Failed to decode graph")]
    Decode(#[from] bincode::error::DecodeError),
    #[error("Failed to export edges: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown transport mode `{0}`, expected one of foot, cycle, car, train, horse")]
pub struct ParseTransportModeError(pub String);
