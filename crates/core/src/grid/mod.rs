//! Procedural grid placement.
//!
//! Cells are laid out on an upright plane centred on x = 0. Cells near the
//! grid centre are pulled towards the viewer and edge cells pushed back, each
//! cell gets jittered position, scale and yaw, and every cell is turned to
//! face a fixed aim target.

use serde::{Deserialize, Serialize};

use crate::{
    error::ensure_finite,
    geometry::orient,
    random::{choose, jitter, RandomSource},
    scene::{Euler, Placement, Transform, Vec3},
    teardown::TeardownSet,
    timeline::TimelineSink,
    BeatTime, Result, SequencerError,
};

/// Fixed constants shared by every grid in a show.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridLayout {
    /// Height of the bottom row.
    pub origin_y: f64,
    /// Depth of a cell with no centre offset.
    pub base_depth: f64,
    /// Uniform scale before jitter.
    pub base_scale: f64,
    /// Point every cell turns to face.
    pub aim_target: Vec3,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            origin_y: 1.0,
            base_depth: 10.0,
            base_scale: 1.0,
            aim_target: Vec3::new(0.0, 1.5, 0.0),
        }
    }
}

/// One grid instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSpec {
    pub beat: BeatTime,
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
    pub spacing_x: f64,
    pub spacing_y: f64,
    /// How far the centre cell is pulled towards the viewer.
    pub depth: f64,
    pub scale_jitter: f64,
    pub position_jitter: f64,
    /// Yaw jitter in degrees.
    pub rotation_jitter: f64,
    /// Interchangeable assets; each cell picks one uniformly.
    pub variants: Vec<String>,
    pub track: Option<String>,
}

impl GridSpec {
    pub fn new(beat: BeatTime, width: u32, height: u32, variants: Vec<String>) -> Self {
        Self {
            beat,
            width,
            height,
            spacing_x: 1.0,
            spacing_y: 1.0,
            depth: 0.0,
            scale_jitter: 0.0,
            position_jitter: 0.0,
            rotation_jitter: 0.0,
            variants,
            track: None,
        }
    }

    pub fn spacing(mut self, x: f64, y: f64) -> Self {
        self.spacing_x = x;
        self.spacing_y = y;
        self
    }

    pub fn depth(mut self, depth: f64) -> Self {
        self.depth = depth;
        self
    }

    pub fn jitter(mut self, scale: f64, position: f64, rotation: f64) -> Self {
        self.scale_jitter = scale;
        self.position_jitter = position;
        self.rotation_jitter = rotation;
        self
    }

    pub fn on_track(mut self, track: impl Into<String>) -> Self {
        self.track = Some(track.into());
        self
    }

    fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SequencerError::invalid(format!(
                "grid dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.variants.is_empty() {
            return Err(SequencerError::invalid("grid has no asset variants"));
        }
        ensure_finite("grid beat", self.beat)?;
        ensure_finite("grid spacing", self.spacing_x)?;
        ensure_finite("grid spacing", self.spacing_y)?;
        ensure_finite("grid depth", self.depth)?;
        for (what, amount) in [
            ("scale jitter", self.scale_jitter),
            ("position jitter", self.position_jitter),
            ("rotation jitter", self.rotation_jitter),
        ] {
            ensure_finite(what, amount)?;
            if amount < 0.0 {
                return Err(SequencerError::invalid(format!(
                    "{what} must not be negative, got {amount}"
                )));
            }
        }
        Ok(())
    }
}

/// Computed attributes of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCell {
    pub row: u32,
    pub column: u32,
    pub position: Vec3,
    pub scale: Vec3,
    pub rotation: Euler,
}

/// Normalised distance of `index` from the middle of `count` cells, in
/// `[-1, 1]`. A single cell is its own centre.
fn centre_offset(index: u32, count: u32) -> f64 {
    let half = (count as f64 - 1.0) / 2.0;
    if half == 0.0 {
        0.0
    } else {
        (index as f64 - half) / half
    }
}

/// Computes every cell of `spec` in row-major order without placing anything.
pub fn layout_cells<R: RandomSource + ?Sized>(
    rng: &mut R,
    spec: &GridSpec,
    layout: &GridLayout,
) -> Result<Vec<GridCell>> {
    spec.validate()?;

    let centre_x = (spec.width as f64 - 1.0) / 2.0;
    let mut cells = Vec::with_capacity(spec.width as usize * spec.height as usize);

    for row in 0..spec.height {
        for column in 0..spec.width {
            let x = (column as f64 - centre_x) * spec.spacing_x
                + jitter(rng, spec.position_jitter);
            let y = layout.origin_y
                + row as f64 * spec.spacing_y
                + jitter(rng, spec.position_jitter);

            let dx = centre_offset(column, spec.width);
            let dy = centre_offset(row, spec.height);
            let centre_factor = 1.0 - (dx * dx + dy * dy).sqrt();
            let z = layout.base_depth - centre_factor * spec.depth;
            let position = Vec3::new(x, y, z);

            let scale = Vec3::splat(layout.base_scale + jitter(rng, spec.scale_jitter));

            // Yaw rather than roll takes the jitter, which tilts the panels.
            let mut rotation = orient(position, layout.aim_target);
            rotation.yaw += jitter(rng, spec.rotation_jitter);

            cells.push(GridCell {
                row,
                column,
                position,
                scale,
                rotation,
            });
        }
    }

    Ok(cells)
}

/// Places one randomly chosen variant per cell and returns every placed
/// instance for a later staggered teardown.
pub fn place_grid<S, R>(
    sink: &mut S,
    rng: &mut R,
    spec: &GridSpec,
    layout: &GridLayout,
) -> Result<TeardownSet>
where
    S: TimelineSink + ?Sized,
    R: RandomSource + ?Sized,
{
    let cells = layout_cells(rng, spec, layout)?;
    let mut placed = TeardownSet::with_capacity(cells.len());

    for cell in &cells {
        let asset = choose(rng, &spec.variants)
            .ok_or_else(|| SequencerError::invalid("grid has no asset variants"))?;
        let transform = Transform::default()
            .with_position(cell.position)
            .with_rotation(cell.rotation)
            .with_scale(cell.scale);
        let placement = Placement {
            track: spec.track.clone(),
            transform,
        };
        placed.push(sink.place(asset, spec.beat, placement)?);
    }

    tracing::debug!(
        beat = spec.beat,
        width = spec.width,
        height = spec.height,
        instances = placed.len(),
        "placed grid"
    );
    Ok(placed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::Timeline;
    use assert_approx_eq::assert_approx_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn variants() -> Vec<String> {
        vec!["auctioneertext".to_string(), "auctioneertext2".to_string()]
    }

    #[test]
    fn three_by_three_is_symmetric_with_deepest_centre() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let layout = GridLayout::default();
        let spec = GridSpec::new(0.0, 3, 3, variants()).spacing(2.0, 1.5).depth(4.0);

        let cells = layout_cells(&mut rng, &spec, &layout).unwrap();
        assert_eq!(cells.len(), 9);

        for cell in &cells {
            let mirror = cells
                .iter()
                .find(|other| other.row == cell.row && other.column == 2 - cell.column)
                .unwrap();
            assert_approx_eq!(cell.position.x, -mirror.position.x);
        }

        let offset = |cell: &GridCell| (cell.position.z - layout.base_depth).abs();
        let centre = cells
            .iter()
            .find(|cell| cell.row == 1 && cell.column == 1)
            .unwrap();
        assert_approx_eq!(offset(centre), 4.0);
        for cell in cells.iter().filter(|cell| !(cell.row == 1 && cell.column == 1)) {
            assert!(offset(cell) < offset(centre));
        }
    }

    #[test]
    fn edge_midpoints_have_no_depth_offset() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let layout = GridLayout::default();
        let spec = GridSpec::new(0.0, 3, 3, variants()).depth(4.0);

        let cells = layout_cells(&mut rng, &spec, &layout).unwrap();
        let edge = cells
            .iter()
            .find(|cell| cell.row == 0 && cell.column == 1)
            .unwrap();
        assert_approx_eq!(edge.position.z, layout.base_depth);
    }

    #[test]
    fn rows_rise_from_origin() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let layout = GridLayout::default();
        let spec = GridSpec::new(0.0, 2, 4, variants()).spacing(1.0, 0.5);

        let cells = layout_cells(&mut rng, &spec, &layout).unwrap();
        let top = cells.last().unwrap();
        assert_eq!((top.row, top.column), (3, 1));
        assert_approx_eq!(top.position.y, layout.origin_y + 1.5);
        assert_approx_eq!(top.position.x, 0.5);
    }

    #[test]
    fn single_row_and_column_stay_finite() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let layout = GridLayout::default();

        for (width, height) in [(1, 1), (1, 5), (7, 1)] {
            let spec = GridSpec::new(0.0, width, height, variants())
                .depth(3.0)
                .jitter(0.1, 0.2, 5.0);
            let cells = layout_cells(&mut rng, &spec, &layout).unwrap();
            assert_eq!(cells.len(), (width * height) as usize);
            for cell in cells {
                assert!(cell.position.x.is_finite());
                assert!(cell.position.z.is_finite());
                assert!(cell.rotation.pitch.is_finite());
                assert!(cell.rotation.yaw.is_finite());
            }
        }
    }

    #[test]
    fn unjittered_cells_face_the_aim_target() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let layout = GridLayout::default();
        let spec = GridSpec::new(0.0, 4, 2, variants()).depth(2.0);

        for cell in layout_cells(&mut rng, &spec, &layout).unwrap() {
            assert_eq!(cell.rotation, orient(cell.position, layout.aim_target));
            assert_eq!(cell.scale, Vec3::splat(layout.base_scale));
        }
    }

    #[test]
    fn jitter_stays_within_bounds_and_scale_is_uniform() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let layout = GridLayout::default();
        let spec = GridSpec::new(0.0, 15, 7, variants()).jitter(0.2, 0.3, 10.0);

        for cell in layout_cells(&mut rng, &spec, &layout).unwrap() {
            assert_eq!(cell.scale.x, cell.scale.y);
            assert_eq!(cell.scale.y, cell.scale.z);
            assert!((cell.scale.x - layout.base_scale).abs() <= 0.2);

            let expected_x = cell.column as f64 - 7.0;
            assert!((cell.position.x - expected_x).abs() <= 0.3);

            let aimed = orient(cell.position, layout.aim_target);
            assert!((cell.rotation.yaw - aimed.yaw).abs() <= 10.0);
            assert_eq!(cell.rotation.pitch, aimed.pitch);
        }
    }

    #[test]
    fn places_one_variant_per_cell() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut timeline = Timeline::new();
        let spec = GridSpec::new(16.0, 15, 7, variants()).on_track("auction");

        let placed = place_grid(&mut timeline, &mut rng, &spec, &GridLayout::default()).unwrap();
        assert_eq!(placed.len(), 105);
        assert_eq!(timeline.instances().len(), 105);

        let pool = variants();
        for instance in timeline.instances() {
            assert!(pool.iter().any(|name| name == instance.asset()));
            assert_eq!(instance.beat(), 16.0);
            assert_eq!(instance.track.as_deref(), Some("auction"));
            assert!(instance.transform.position.is_some());
        }
        for name in &pool {
            assert!(timeline.instances().iter().any(|i| i.asset() == name));
        }
    }

    #[test]
    fn rejects_invalid_specs() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let layout = GridLayout::default();

        let empty = GridSpec::new(0.0, 0, 3, variants());
        assert!(layout_cells(&mut rng, &empty, &layout).is_err());

        let no_variants = GridSpec::new(0.0, 3, 3, Vec::new());
        assert!(layout_cells(&mut rng, &no_variants, &layout).is_err());

        let negative = GridSpec::new(0.0, 3, 3, variants()).jitter(-0.1, 0.0, 0.0);
        assert!(layout_cells(&mut rng, &negative, &layout).is_err());
    }
}
