//! Benchmark populations and workloads for the Lumen framework.
//!
//! - [`cell_population`]: deterministic cells scattered in a cube
//! - [`InhibitionRule`]: the concentration-threshold rule used as the
//!   per-step workload between exports
//! - [`binding_cells_adaptor`]: an adaptor exporting the standard cell
//!   attributes

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use lumen_core::{AttributeDef, AttributeType, MemberAccessor};
use lumen_export::{ExportConfig, ExportError, VisualizationAdaptor};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Side length of the cube cells are scattered in.
pub const SPACE_EXTENT: f64 = 100.0;

/// A cell of the binding-cells scenario.
#[derive(Clone, Debug, PartialEq)]
pub struct BindingCell {
    /// Stable identifier.
    pub id: u64,
    /// Centre position.
    pub position: [f64; 3],
    /// Diameter.
    pub diameter: f64,
    /// Cell type index (0 = T cell, 1 = monocyte).
    pub cell_type: u32,
    /// 1 once inhibited from binding, else 0.
    pub inhibited: u32,
}

impl BindingCell {
    /// Mark the cell as unable to bind.
    pub fn inhibit(&mut self) {
        self.inhibited = 1;
    }

    /// Whether the cell has been inhibited.
    pub fn is_inhibited(&self) -> bool {
        self.inhibited != 0
    }
}

/// `n` cells with seeded positions in `[0, SPACE_EXTENT)^3`, diameters in
/// `[5, 15)` and alternating cell types.
pub fn cell_population(n: usize, seed: u64) -> Vec<BindingCell> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|i| BindingCell {
            id: i as u64,
            position: [
                rng.random::<f64>() * SPACE_EXTENT,
                rng.random::<f64>() * SPACE_EXTENT,
                rng.random::<f64>() * SPACE_EXTENT,
            ],
            diameter: rng.random_range(5.0..15.0),
            cell_type: (i % 2) as u32,
            inhibited: 0,
        })
        .collect()
}

/// Substance concentration falling off linearly from the cube's centre:
/// 2.0 at the centre, 0.0 at distance `SPACE_EXTENT / 2` and beyond.
pub fn radial_concentration(position: [f64; 3]) -> f64 {
    let c = SPACE_EXTENT / 2.0;
    let d = position
        .iter()
        .map(|p| (p - c) * (p - c))
        .sum::<f64>()
        .sqrt();
    (2.0 * (1.0 - d / c)).max(0.0)
}

/// With some probability, inhibit cells sitting in a high concentration.
#[derive(Clone, Debug, PartialEq)]
pub struct InhibitionRule {
    /// Minimum concentration at the cell's position. Default: 1.0.
    pub concentration_threshold: f64,
    /// Per-step chance of inhibition above the threshold. Default: 0.05.
    pub probability: f64,
}

impl Default for InhibitionRule {
    fn default() -> Self {
        Self {
            concentration_threshold: 1.0,
            probability: 0.05,
        }
    }
}

impl InhibitionRule {
    /// Apply the rule to one cell. Returns `true` if this call inhibited it.
    pub fn apply(
        &self,
        cell: &mut BindingCell,
        concentration: impl Fn([f64; 3]) -> f64,
        rng: &mut impl Rng,
    ) -> bool {
        let conc = concentration(cell.position);
        // Draw unconditionally so the stream does not depend on the field.
        let draw: f64 = rng.random();
        if conc >= self.concentration_threshold && draw.abs() < self.probability {
            let newly = !cell.is_inhibited();
            cell.inhibit();
            return newly;
        }
        false
    }

    /// Apply the rule to every cell; returns how many became inhibited.
    pub fn step(
        &self,
        cells: &mut [BindingCell],
        concentration: impl Fn([f64; 3]) -> f64,
        rng: &mut impl Rng,
    ) -> usize {
        let mut newly = 0;
        for cell in cells {
            if self.apply(cell, &concentration, &mut *rng) {
                newly += 1;
            }
        }
        newly
    }
}

fn read_position(cell: &BindingCell) -> &[f64] {
    &cell.position
}

fn read_diameter(cell: &BindingCell) -> &[f64] {
    std::slice::from_ref(&cell.diameter)
}

fn read_cell_type(cell: &BindingCell) -> &[u32] {
    std::slice::from_ref(&cell.cell_type)
}

fn read_inhibited(cell: &BindingCell) -> &[u32] {
    std::slice::from_ref(&cell.inhibited)
}

/// Accessor for [`BindingCell::position`].
pub fn position_accessor() -> MemberAccessor<BindingCell, f64> {
    MemberAccessor::new(3, read_position)
}

/// Accessor for [`BindingCell::diameter`].
pub fn diameter_accessor() -> MemberAccessor<BindingCell, f64> {
    MemberAccessor::new(1, read_diameter)
}

/// An adaptor with a `cells` grid exporting position, diameter, cell
/// type and inhibition state.
pub fn binding_cells_adaptor(
    config: ExportConfig,
) -> Result<VisualizationAdaptor<BindingCell>, ExportError> {
    let mut adaptor = VisualizationAdaptor::new(config)?;
    let grid = adaptor.add_grid("cells")?;
    grid.add_attribute(AttributeDef::vector("position", 3).with_units("um"), position_accessor())?;
    grid.add_attribute(AttributeDef::scalar("diameter").with_units("um"), diameter_accessor())?;
    grid.add_attribute(
        AttributeDef {
            name: "cell_type".into(),
            attribute_type: AttributeType::Categorical { n_values: 2 },
            units: None,
        },
        MemberAccessor::new(1, read_cell_type),
    )?;
    grid.add_attribute(
        AttributeDef {
            name: "inhibited".into(),
            attribute_type: AttributeType::Categorical { n_values: 2 },
            units: None,
        },
        MemberAccessor::new(1, read_inhibited),
    )?;
    Ok(adaptor)
}
