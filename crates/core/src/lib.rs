//! Core library for the show sequencer.
//!
//! Turns beat-timed authoring instructions (fades, scattered grids, staggered
//! teardowns, scripted frame sequences, track animations) into a flat set of
//! time-stamped events on named channels. Every component pushes into a
//! [`TimelineSink`]; none of them reads state back, so they compose in any
//! order.

pub mod animation;
pub mod assets;
pub mod config;
pub mod error;
pub mod export;
pub mod geometry;
pub mod grid;
pub mod material;
pub mod ramp;
pub mod random;
pub mod scene;
pub mod sequence;
pub mod show;
pub mod teardown;
pub mod timeline;

/// Musical position in beats. Sub-beat precision is expected.
pub type BeatTime = f64;

pub use animation::{AnimationCurve, Easing, Keyframe, TrackAnimation, TrackPose};
pub use assets::{AssetCatalog, BundleManifest};
pub use config::SequencerConfig;
pub use error::{Result, SequencerError};
pub use export::{ExportSettings, Exporter, ShowDocument};
pub use geometry::orient;
pub use grid::{layout_cells, place_grid, GridCell, GridLayout, GridSpec};
pub use material::{MaterialHandle, ParameterSet};
pub use ramp::{apply_ramp, sample_ramp, Ramp, RampSample, Resolution, MAX_RAMP_STEPS};
pub use random::{choose, permute, RandomSource};
pub use scene::{
    Euler, InstanceHandle, ObjectKind, PlacedInstance, Placement, PrefabAssignment, Transform, Vec3,
};
pub use sequence::{play_sequence, FrameSequence, SequenceEntry};
pub use show::Show;
pub use teardown::{stagger_remove, TeardownSet};
pub use timeline::{MaterialEvent, Timeline, TimelineSink};
