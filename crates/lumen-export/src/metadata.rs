//! The `simulation_info.json` sidecar describing an export.
//!
//! Downstream tooling reads the sidecar to find every grid, its
//! attributes, and the steps that were written.

use std::fs;
use std::path::{Path, PathBuf};

use lumen_core::AttributeType;
use serde::{Deserialize, Serialize};

use crate::error::ExportError;

/// File name of the metadata sidecar inside the output directory.
pub const SIMULATION_INFO_FILE: &str = "simulation_info.json";

/// One exported attribute.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttributeInfo {
    /// Column name.
    pub name: String,
    /// Scalars per tuple.
    pub components: usize,
    /// Projected scalar type.
    pub scalar_type: String,
    /// `"scalar"`, `"vector"` or `"categorical"`.
    pub kind: String,
    /// Unit annotation, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
}

impl AttributeInfo {
    pub(crate) fn kind_label(attribute_type: &AttributeType) -> &'static str {
        match attribute_type {
            AttributeType::Scalar => "scalar",
            AttributeType::Vector { .. } => "vector",
            AttributeType::Categorical { .. } => "categorical",
        }
    }
}

/// One exported grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridInfo {
    /// Grid name, also the prefix of its piece files.
    pub name: String,
    /// Pieces per step.
    pub pieces: usize,
    /// Exported attributes in column order.
    pub attributes: Vec<AttributeInfo>,
}

/// Contents of the sidecar.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationInfo {
    /// Simulation name.
    pub simulation: String,
    /// Output directory as configured.
    pub output_dir: PathBuf,
    /// Export interval in steps.
    pub export_interval: u64,
    /// Simulated time per step.
    pub time_step: f64,
    /// Workers per grid.
    pub workers: usize,
    /// Registered grids.
    pub grids: Vec<GridInfo>,
    /// Steps exported so far, ascending.
    pub steps: Vec<u64>,
}

impl SimulationInfo {
    /// Compact JSON, as attached to in-situ frames.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Write the sidecar into `dir`, returning its path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        let path = dir.join(SIMULATION_INFO_FILE);
        let text = serde_json::to_string_pretty(self).map_err(|source| ExportError::Json {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, text).map_err(|e| ExportError::io(&path, e))?;
        Ok(path)
    }

    /// Read a sidecar back.
    pub fn read_from(path: &Path) -> Result<Self, ExportError> {
        let text = fs::read_to_string(path).map_err(|e| ExportError::io(path, e))?;
        serde_json::from_str(&text).map_err(|source| ExportError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}
