//! Caller-facing instruction set for authoring a show.
//!
//! [`Show`] owns the timeline, the random source and the grid constants and
//! forwards each beat-timed instruction to the component that expands it.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::{
    animation::TrackAnimation,
    assets::AssetCatalog,
    config::SequencerConfig,
    export::ShowDocument,
    grid::{place_grid, GridLayout, GridSpec},
    material::{MaterialHandle, ParameterSet},
    ramp::{apply_ramp, Ramp},
    scene::{InstanceHandle, ObjectKind, PlacedInstance, Placement, PrefabAssignment},
    sequence::{play_sequence, FrameSequence},
    teardown::{stagger_remove, TeardownSet},
    timeline::{Timeline, TimelineSink},
    BeatTime, Result,
};

/// A show under construction.
#[derive(Debug)]
pub struct Show {
    timeline: Timeline,
    rng: ChaCha8Rng,
    layout: GridLayout,
    requirements: Vec<String>,
}

impl Show {
    /// Unchecked show with default grid constants and a fresh random seed.
    pub fn new() -> Self {
        Self::from_parts(Timeline::new(), ChaCha8Rng::from_entropy(), GridLayout::default())
    }

    /// Show that validates names against `catalog` and takes its seed and
    /// grid constants from `config`.
    pub fn with_catalog(catalog: AssetCatalog, config: &SequencerConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::from_parts(Timeline::with_catalog(catalog), rng, config.grid)
    }

    pub fn from_parts(timeline: Timeline, rng: ChaCha8Rng, layout: GridLayout) -> Self {
        Self {
            timeline,
            rng,
            layout,
            requirements: Vec::new(),
        }
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Declares a capability the exported show depends on.
    pub fn require(&mut self, requirement: impl Into<String>) {
        let requirement = requirement.into();
        if !self.requirements.contains(&requirement) {
            self.requirements.push(requirement);
        }
    }

    /// Draws every `object` on `track` with the `asset` prefab.
    pub fn assign_object_prefab(
        &mut self,
        object: ObjectKind,
        track: &str,
        asset: &str,
    ) -> Result<()> {
        self.timeline
            .assign_object_prefab(PrefabAssignment::new(object, track, asset))
    }

    pub fn instantiate(
        &mut self,
        asset: &str,
        beat: BeatTime,
        placement: Placement,
    ) -> Result<InstanceHandle> {
        self.timeline.place(asset, beat, placement)
    }

    pub fn instance_mut(&mut self, handle: InstanceHandle) -> Result<&mut PlacedInstance> {
        self.timeline.instance_mut(handle)
    }

    pub fn destroy(&mut self, handle: InstanceHandle, beat: BeatTime) -> Result<()> {
        self.timeline.schedule_removal(handle, beat)
    }

    pub fn set_material(
        &mut self,
        material: &MaterialHandle,
        values: ParameterSet,
        beat: BeatTime,
    ) -> Result<()> {
        self.timeline.set_parameter(material, values, beat)
    }

    /// Ramps `parameter` on every listed material in lockstep.
    pub fn fade(
        &mut self,
        materials: &[MaterialHandle],
        parameter: &str,
        ramp: Ramp,
    ) -> Result<usize> {
        apply_ramp(&mut self.timeline, materials, parameter, &ramp)
    }

    pub fn animate_track(&mut self, animation: TrackAnimation) -> Result<()> {
        self.timeline.animate_track(animation)
    }

    /// Lays out a grid with this show's grid constants.
    pub fn scatter_grid(&mut self, spec: &GridSpec) -> Result<TeardownSet> {
        place_grid(&mut self.timeline, &mut self.rng, spec, &self.layout)
    }

    pub fn stagger_remove(
        &mut self,
        set: TeardownSet,
        beat: BeatTime,
        duration: BeatTime,
    ) -> Result<()> {
        stagger_remove(&mut self.timeline, &mut self.rng, set, beat, duration)
    }

    pub fn play_sequence(
        &mut self,
        material: &MaterialHandle,
        parameter: &str,
        base: BeatTime,
        sequence: &FrameSequence,
    ) -> Result<()> {
        play_sequence(&mut self.timeline, material, parameter, base, sequence)
    }

    /// Freezes the show into its exportable form.
    pub fn finish(self) -> ShowDocument {
        tracing::info!(
            instances = self.timeline.instances().len(),
            material_events = self.timeline.material_events().len(),
            animations = self.timeline.animations().len(),
            object_prefabs = self.timeline.prefab_assignments().len(),
            "finished show"
        );
        ShowDocument::from_timeline(self.timeline, self.requirements)
    }
}

impl Default for Show {
    fn default() -> Self {
        Self::new()
    }
}
