//! Piece files and the piece-list index.
//!
//! Each worker writes its slice of a grid as one piece,
//! `{grid}-{step}_{worker}.json`. A per-step index `{grid}-{step}.pindex`
//! lists every piece. The index is first written from a template naming
//! only piece 0, then patched in place: the single placeholder entry is
//! replaced by one entry per worker.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ExportError;

/// One column of a piece, widened to `f64`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PieceColumn {
    /// Column name.
    pub name: String,
    /// Scalars per tuple.
    pub components: usize,
    /// Name of the projected scalar type before widening.
    pub scalar_type: String,
    /// Values in logical order.
    pub values: Vec<f64>,
}

/// The slice of a grid owned by one worker at one step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    /// Grid name.
    pub grid: String,
    /// Simulation step.
    pub step: u64,
    /// Simulated time.
    pub time: f64,
    /// Worker that produced the piece.
    pub worker: u32,
    /// First object index (inclusive).
    pub start: usize,
    /// Last object index (exclusive).
    pub end: usize,
    /// Projected columns.
    pub columns: Vec<PieceColumn>,
}

/// `{grid}-{step}_{worker}.json`
pub fn piece_file_name(grid: &str, step: u64, worker: u32) -> String {
    format!("{grid}-{step}_{worker}.json")
}

/// `{grid}-{step}.pindex`
pub fn index_file_name(grid: &str, step: u64) -> String {
    format!("{grid}-{step}.pindex")
}

fn piece_entry(grid: &str, step: u64, worker: u32) -> String {
    format!("<Piece Source=\"{}\"/>", piece_file_name(grid, step, worker))
}

/// The index as first written, naming only piece 0.
pub fn index_template(grid: &str, step: u64, time: f64) -> String {
    format!(
        "<?xml version=\"1.0\"?>\n\
         <PieceIndex grid=\"{grid}\" step=\"{step}\" time=\"{time}\">\n\
         {}\n\
         </PieceIndex>\n",
        piece_entry(grid, step, 0)
    )
}

/// Replace the piece-0 placeholder in `index` with one entry per piece.
///
/// Returns `None` if the placeholder is absent. Text around the
/// placeholder is preserved byte for byte.
pub fn expand_piece_list(index: &str, grid: &str, step: u64, pieces: u32) -> Option<String> {
    let placeholder = piece_entry(grid, step, 0);
    let pos = index.find(&placeholder)?;
    let mut out = String::with_capacity(index.len() + pieces as usize * placeholder.len());
    out.push_str(&index[..pos]);
    for worker in 0..pieces {
        out.push_str(&piece_entry(grid, step, worker));
        out.push('\n');
    }
    let rest = &index[pos + placeholder.len()..];
    // The placeholder's own line break is replaced by the one after the last entry.
    out.push_str(rest.strip_prefix('\n').unwrap_or(rest));
    Some(out)
}

/// Serialize `piece` to `dir`, returning the path written.
pub fn write_piece(dir: &Path, piece: &Piece) -> Result<PathBuf, ExportError> {
    let path = dir.join(piece_file_name(&piece.grid, piece.step, piece.worker));
    let file = fs::File::create(&path).map_err(|e| ExportError::io(&path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, piece).map_err(|source| ExportError::Json {
        path: path.clone(),
        source,
    })?;
    writer.flush().map_err(|e| ExportError::io(&path, e))?;
    Ok(path)
}

/// Write the index template for `grid` at `step`, then patch it to list
/// `pieces` pieces.
pub fn write_index(
    dir: &Path,
    grid: &str,
    step: u64,
    time: f64,
    pieces: u32,
) -> Result<PathBuf, ExportError> {
    let path = dir.join(index_file_name(grid, step));
    fs::write(&path, index_template(grid, step, time)).map_err(|e| ExportError::io(&path, e))?;
    patch_index(&path, grid, step, pieces)?;
    Ok(path)
}

/// Expand the placeholder entry of the index file at `path` in place.
pub fn patch_index(path: &Path, grid: &str, step: u64, pieces: u32) -> Result<(), ExportError> {
    let index = fs::read_to_string(path).map_err(|e| ExportError::io(path, e))?;
    let patched = expand_piece_list(&index, grid, step, pieces).ok_or_else(|| {
        ExportError::PlaceholderMissing {
            path: path.to_path_buf(),
            placeholder: piece_entry(grid, step, 0),
        }
    })?;
    fs::write(path, patched).map_err(|e| ExportError::io(path, e))
}
