use std::{fs::File, io::Read, path::Path};

use fxhash::FxHashMap;
use tracing::info;

use crate::error::RiskOverlayError;
use crate::types::NodeId;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskEntry {
    pub risk_a: f64,
    pub risk_b: f64,
}

/// Risk scalar pairs keyed by directed `(parent, child)` node pairs.
#[derive(Debug, Default)]
pub struct RiskOverlay {
    entries: FxHashMap<(NodeId, NodeId), RiskEntry>,
}

impl RiskOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<RiskOverlay, RiskOverlayError> {
        let file = File::open(path.as_ref())?;
        let overlay = Self::from_reader(file)?;
        info!(
            "Loaded {} risk entries from {}",
            overlay.len(),
            path.as_ref().display()
        );
        Ok(overlay)
    }

    /// Reads headerless `parent, child, ..., risk_a, risk_b` rows. Any row
    /// that does not fit this shape fails the whole load.
    pub fn from_reader<R: Read>(reader: R) -> Result<RiskOverlay, RiskOverlayError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut overlay = RiskOverlay::new();

        for record in csv_reader.records() {
            let record = record?;
            let line = record.position().map_or(0, |position| position.line());

            if record.len() < 4 {
                return Err(RiskOverlayError::Malformed {
                    line,
                    reason: format!("expected at least 4 fields, found {}", record.len()),
                });
            }

            let parent = parse_field::<NodeId>(&record[0], "parent id", line)?;
            let child = parse_field::<NodeId>(&record[1], "child id", line)?;
            let risk_a = parse_field::<f64>(&record[record.len() - 2], "risk a", line)?;
            let risk_b = parse_field::<f64>(&record[record.len() - 1], "risk b", line)?;

            overlay.insert(parent, child, RiskEntry { risk_a, risk_b });
        }

        Ok(overlay)
    }

    pub fn insert(&mut self, parent: NodeId, child: NodeId, entry: RiskEntry) {
        self.entries.insert((parent, child), entry);
    }

    pub fn get(&self, parent: NodeId, child: NodeId) -> Option<&RiskEntry> {
        self.entries.get(&(parent, child))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_field<T: std::str::FromStr>(
    value: &str,
    name: &str,
    line: u64,
) -> Result<T, RiskOverlayError> {
    value.parse::<T>().map_err(|_| RiskOverlayError::Malformed {
        line,
        reason: format!("invalid {} `{}`", name, value),
    })
}
