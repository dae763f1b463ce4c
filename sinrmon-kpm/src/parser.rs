//! Measurement name parsing
//!
//! KPM measurement names carry the cell and UE ids in a fixed template:
//!
//! - serving: `L3servingSINR3gpp_cell_<cell>_UEID_<ue>`
//! - neighbor: `L3neighSINRListOf_UEID_<ue>_of_Cell_<cell>`
//!
//! The two templates order the ids differently. Records are identified by an
//! exact, case-sensitive prefix; text after the last id is ignored.

use sinrmon_common::{CellId, UeId};

/// Prefix of serving-cell SINR measurement names
pub const SERVING_PREFIX: &str = "L3servingSINR3gpp_cell_";
/// Prefix of neighbor SINR list measurement names
pub const NEIGHBOR_PREFIX: &str = "L3neighSINRListOf_UEID_";

const SERVING_UE_MARKER: &str = "_UEID_";
const NEIGHBOR_CELL_MARKER: &str = "_of_Cell_";

/// Kind of measurement identified from its name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasurementKind {
    /// Serving-cell SINR
    Serving,
    /// Neighbor-cell SINR list
    Neighbor,
}

/// Ids extracted from a measurement name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeasurementKey {
    /// Which template matched
    pub kind: MeasurementKind,
    /// Cell id from the name (the serving cell for both templates)
    pub cell_id: CellId,
    /// UE id from the name
    pub ue_id: UeId,
}

/// Identifies the measurement kind by prefix only.
pub fn classify(name: &str) -> Option<MeasurementKind> {
    if name.starts_with(SERVING_PREFIX) {
        Some(MeasurementKind::Serving)
    } else if name.starts_with(NEIGHBOR_PREFIX) {
        Some(MeasurementKind::Neighbor)
    } else {
        None
    }
}

/// Parses a serving measurement name (`cell` first, then `ue`).
pub fn parse_serving(name: &str) -> Option<MeasurementKey> {
    let rest = name.strip_prefix(SERVING_PREFIX)?;
    let (cell_id, rest) = leading_id(rest)?;
    let rest = rest.strip_prefix(SERVING_UE_MARKER)?;
    let (ue_id, _) = leading_id(rest)?;
    Some(MeasurementKey {
        kind: MeasurementKind::Serving,
        cell_id,
        ue_id,
    })
}

/// Parses a neighbor measurement name (`ue` first, then `cell`).
pub fn parse_neighbor(name: &str) -> Option<MeasurementKey> {
    let rest = name.strip_prefix(NEIGHBOR_PREFIX)?;
    let (ue_id, rest) = leading_id(rest)?;
    let rest = rest.strip_prefix(NEIGHBOR_CELL_MARKER)?;
    let (cell_id, _) = leading_id(rest)?;
    Some(MeasurementKey {
        kind: MeasurementKind::Neighbor,
        cell_id,
        ue_id,
    })
}

/// Parses either template; `None` for names matching neither.
pub fn parse_measurement_name(name: &str) -> Option<MeasurementKey> {
    match classify(name)? {
        MeasurementKind::Serving => parse_serving(name),
        MeasurementKind::Neighbor => parse_neighbor(name),
    }
}

/// Splits a leading decimal id off `s`.
fn leading_id(s: &str) -> Option<(u16, &str)> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    let id = s[..end].parse().ok()?;
    Some((id, &s[end..]))
}
