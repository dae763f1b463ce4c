//! Output record and its CSV form
//!
//! One line per emission:
//! `round_id,ue_id,serving_x,serving_y,serving_sinr_ma,neigh1_sinr_ma,...`
//! with every float printed to three decimals.

use std::fmt;
use std::str::FromStr;

use sinrmon_common::{RoundId, UeId};

use crate::error::RecordParseError;

const FIXED_COLUMNS: [&str; 5] = ["round_id", "ue_id", "serving_x", "serving_y", "serving_sinr_ma"];

/// CSV header line (without newline) for `published` neighbor columns
pub fn csv_header(published: usize) -> String {
    let mut columns: Vec<String> = FIXED_COLUMNS.iter().map(|c| c.to_string()).collect();
    columns.extend((1..=published).map(|i| format!("neigh{i}_sinr_ma")));
    columns.join(",")
}

/// Aggregated measurement record for one UE in one round
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRecord {
    /// Synchronized round id
    pub round_id: RoundId,
    /// UE id
    pub ue_id: UeId,
    /// Serving cell X coordinate (0 if the cell is unknown)
    pub serving_x: f64,
    /// Serving cell Y coordinate (0 if the cell is unknown)
    pub serving_y: f64,
    /// Serving SINR moving average
    pub serving_sinr_ma: f64,
    /// Neighbor SINR moving averages, strongest first, zero-padded
    pub neighbor_sinr_ma: Vec<f64>,
}

impl OutputRecord {
    /// CSV line including the trailing newline
    pub fn to_csv_line(&self) -> String {
        format!("{self}\n")
    }
}

impl fmt::Display for OutputRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{:.3},{:.3},{:.3}",
            self.round_id.value(),
            self.ue_id,
            self.serving_x,
            self.serving_y,
            self.serving_sinr_ma
        )?;
        for value in &self.neighbor_sinr_ma {
            write!(f, ",{value:.3}")?;
        }
        Ok(())
    }
}

impl FromStr for OutputRecord {
    type Err = RecordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.trim_end().split(',').collect();
        if fields.len() < FIXED_COLUMNS.len() {
            return Err(RecordParseError::FieldCount {
                expected: FIXED_COLUMNS.len(),
                found: fields.len(),
            });
        }

        let round: u64 = parse_field(FIXED_COLUMNS[0], fields[0])?;
        let neighbor_sinr_ma = fields[FIXED_COLUMNS.len()..]
            .iter()
            .map(|v| parse_field("neighbor_sinr_ma", v))
            .collect::<Result<Vec<f64>, _>>()?;

        Ok(Self {
            round_id: RoundId::new(round),
            ue_id: parse_field(FIXED_COLUMNS[1], fields[1])?,
            serving_x: parse_field(FIXED_COLUMNS[2], fields[2])?,
            serving_y: parse_field(FIXED_COLUMNS[3], fields[3])?,
            serving_sinr_ma: parse_field(FIXED_COLUMNS[4], fields[4])?,
            neighbor_sinr_ma,
        })
    }
}

fn parse_field<T: FromStr>(field: &'static str, value: &str) -> Result<T, RecordParseError> {
    value.trim().parse().map_err(|_| RecordParseError::InvalidField {
        field,
        value: value.to_string(),
    })
}
