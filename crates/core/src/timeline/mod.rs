//! Event sink that collects everything a show emits.
//!
//! The sequencing components only ever push into a [`TimelineSink`]; nothing
//! reads state back. [`Timeline`] is the in-memory sink used for export.

use serde::Serialize;

use crate::{
    animation::TrackAnimation,
    assets::AssetCatalog,
    error::ensure_finite,
    material::{MaterialHandle, ParameterSet},
    scene::{InstanceHandle, PlacedInstance, Placement, PrefabAssignment},
    BeatTime, Result, SequencerError,
};

/// Primitive capabilities the sequencing components depend on.
pub trait TimelineSink {
    /// Places `asset` at `beat` and returns a handle to the new instance.
    fn place(
        &mut self,
        asset: &str,
        beat: BeatTime,
        placement: Placement,
    ) -> Result<InstanceHandle>;

    /// Mutable access to a placed instance's transform and track.
    fn instance_mut(&mut self, handle: InstanceHandle) -> Result<&mut PlacedInstance>;

    /// Schedules the instance to disappear at `beat`.
    ///
    /// Fails when `beat` precedes the placement beat or a removal is already
    /// scheduled.
    fn schedule_removal(&mut self, handle: InstanceHandle, beat: BeatTime) -> Result<()>;

    /// Records a parameter snapshot on `material` at `beat`.
    fn set_parameter(
        &mut self,
        material: &MaterialHandle,
        values: ParameterSet,
        beat: BeatTime,
    ) -> Result<()>;

    /// Records a keyframed transform animation on a track.
    fn animate_track(&mut self, animation: TrackAnimation) -> Result<()>;

    /// Swaps the model of every object of one kind on a track for a prefab.
    ///
    /// Fails when the prefab is unknown or the kind/track pair already has a
    /// prefab.
    fn assign_object_prefab(&mut self, assignment: PrefabAssignment) -> Result<()>;
}

/// A parameter snapshot applied to one material.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialEvent {
    pub beat: BeatTime,
    pub material: MaterialHandle,
    pub properties: ParameterSet,
}

/// In-memory [`TimelineSink`] that keeps events in emission order.
#[derive(Debug, Default)]
pub struct Timeline {
    catalog: Option<AssetCatalog>,
    instances: Vec<PlacedInstance>,
    material_events: Vec<MaterialEvent>,
    animations: Vec<TrackAnimation>,
    prefab_assignments: Vec<PrefabAssignment>,
}

/// Everything a [`Timeline`] collected, in emission order.
pub(crate) struct TimelineParts {
    pub instances: Vec<PlacedInstance>,
    pub material_events: Vec<MaterialEvent>,
    pub animations: Vec<TrackAnimation>,
    pub prefab_assignments: Vec<PrefabAssignment>,
}

impl Timeline {
    /// Timeline that accepts any asset or material name.
    pub fn new() -> Self {
        Self::default()
    }

    /// Timeline that rejects names missing from `catalog`.
    pub fn with_catalog(catalog: AssetCatalog) -> Self {
        Self {
            catalog: Some(catalog),
            ..Self::default()
        }
    }

    pub fn instances(&self) -> &[PlacedInstance] {
        &self.instances
    }

    pub fn instance(&self, handle: InstanceHandle) -> Result<&PlacedInstance> {
        self.instances
            .get(handle.0)
            .ok_or(SequencerError::UnknownInstance(handle.0))
    }

    pub fn material_events(&self) -> &[MaterialEvent] {
        &self.material_events
    }

    pub fn animations(&self) -> &[TrackAnimation] {
        &self.animations
    }

    pub fn prefab_assignments(&self) -> &[PrefabAssignment] {
        &self.prefab_assignments
    }

    /// `(beat, value)` pairs written to one parameter of one material, in
    /// emission order.
    pub fn parameter_history(&self, material: &str, parameter: &str) -> Vec<(BeatTime, f64)> {
        self.material_events
            .iter()
            .filter(|event| event.material.name() == material)
            .filter_map(|event| {
                event
                    .properties
                    .get(parameter)
                    .map(|value| (event.beat, value))
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
            && self.material_events.is_empty()
            && self.animations.is_empty()
            && self.prefab_assignments.is_empty()
    }

    pub(crate) fn into_parts(self) -> TimelineParts {
        TimelineParts {
            instances: self.instances,
            material_events: self.material_events,
            animations: self.animations,
            prefab_assignments: self.prefab_assignments,
        }
    }
}

/// Fails unless `instance` can still be removed at `beat`.
pub(crate) fn check_removal(
    handle: InstanceHandle,
    instance: &PlacedInstance,
    beat: BeatTime,
) -> Result<()> {
    if let Some(existing) = instance.removal() {
        return Err(SequencerError::AlreadyScheduled {
            instance: handle.0,
            existing,
        });
    }
    if beat < instance.beat() {
        return Err(SequencerError::RemovalBeforePlacement {
            instance: handle.0,
            placed: instance.beat(),
            removal: beat,
        });
    }
    Ok(())
}

impl TimelineSink for Timeline {
    fn place(
        &mut self,
        asset: &str,
        beat: BeatTime,
        placement: Placement,
    ) -> Result<InstanceHandle> {
        ensure_finite("placement beat", beat)?;
        if let Some(catalog) = &self.catalog {
            catalog.prefab(asset)?;
        }

        let handle = InstanceHandle(self.instances.len());
        self.instances.push(PlacedInstance::new(asset, beat, placement));
        Ok(handle)
    }

    fn instance_mut(&mut self, handle: InstanceHandle) -> Result<&mut PlacedInstance> {
        self.instances
            .get_mut(handle.0)
            .ok_or(SequencerError::UnknownInstance(handle.0))
    }

    fn schedule_removal(&mut self, handle: InstanceHandle, beat: BeatTime) -> Result<()> {
        ensure_finite("removal beat", beat)?;
        let instance = self.instance_mut(handle)?;
        check_removal(handle, instance, beat)?;
        instance.set_removal(beat);
        Ok(())
    }

    fn set_parameter(
        &mut self,
        material: &MaterialHandle,
        values: ParameterSet,
        beat: BeatTime,
    ) -> Result<()> {
        ensure_finite("parameter beat", beat)?;
        if values.is_empty() {
            return Err(SequencerError::invalid(format!(
                "empty parameter snapshot for material `{}`",
                material.name()
            )));
        }
        for (name, value) in values.iter() {
            ensure_finite(name, value)?;
        }
        if let Some(catalog) = &self.catalog {
            catalog.material(material.name())?;
        }

        self.material_events.push(MaterialEvent {
            beat,
            material: material.clone(),
            properties: values,
        });
        Ok(())
    }

    fn animate_track(&mut self, animation: TrackAnimation) -> Result<()> {
        animation.validate()?;
        self.animations.push(animation);
        Ok(())
    }

    fn assign_object_prefab(&mut self, mut assignment: PrefabAssignment) -> Result<()> {
        if assignment.track.is_empty() {
            return Err(SequencerError::invalid(format!(
                "{:?} prefab `{}` needs a track",
                assignment.object, assignment.asset
            )));
        }
        if let Some(catalog) = &self.catalog {
            assignment.path = Some(catalog.prefab(&assignment.asset)?.to_string());
        }
        if let Some(existing) = self.prefab_assignments.iter().find(|existing| {
            existing.object == assignment.object && existing.track == assignment.track
        }) {
            return Err(SequencerError::invalid(format!(
                "{:?} on track `{}` already use prefab `{}`",
                assignment.object, assignment.track, existing.asset
            )));
        }

        self.prefab_assignments.push(assignment);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{animation::Keyframe, scene::ObjectKind};

    #[test]
    fn places_and_removes_instances() {
        let mut timeline = Timeline::new();
        let handle = timeline.place("ajrlogo", 6.0, Placement::new()).unwrap();
        timeline.schedule_removal(handle, 15.0).unwrap();

        let instance = timeline.instance(handle).unwrap();
        assert_eq!(instance.asset(), "ajrlogo");
        assert_eq!(instance.removal(), Some(15.0));
    }

    #[test]
    fn rejects_removal_before_placement() {
        let mut timeline = Timeline::new();
        let handle = timeline.place("floor", 8.0, Placement::new()).unwrap();

        let err = timeline.schedule_removal(handle, 7.5).unwrap_err();
        assert!(matches!(err, SequencerError::RemovalBeforePlacement { .. }));
        assert_eq!(timeline.instance(handle).unwrap().removal(), None);

        timeline.schedule_removal(handle, 8.0).unwrap();
    }

    #[test]
    fn rejects_second_removal() {
        let mut timeline = Timeline::new();
        let handle = timeline.place("floor", 0.0, Placement::new()).unwrap();
        timeline.schedule_removal(handle, 4.0).unwrap();

        let err = timeline.schedule_removal(handle, 6.0).unwrap_err();
        assert!(matches!(
            err,
            SequencerError::AlreadyScheduled { existing, .. } if existing == 4.0
        ));
    }

    #[test]
    fn unknown_handles_error() {
        let mut timeline = Timeline::new();
        let err = timeline
            .schedule_removal(InstanceHandle(3), 1.0)
            .unwrap_err();
        assert!(matches!(err, SequencerError::UnknownInstance(3)));
    }

    #[test]
    fn catalog_guards_names() {
        let mut catalog = AssetCatalog::new();
        catalog.register_prefab("skybox", "skybox.prefab");
        catalog.register_material("skyboxmaterial", "skybox.mat");
        let mut timeline = Timeline::with_catalog(catalog);

        assert!(timeline.place("skybox", 0.0, Placement::new()).is_ok());
        assert!(matches!(
            timeline.place("nope", 0.0, Placement::new()),
            Err(SequencerError::UnknownAsset(_))
        ));

        let values = ParameterSet::single("_Exposure", 1.0);
        assert!(timeline
            .set_parameter(&"skyboxmaterial".into(), values.clone(), 2.0)
            .is_ok());
        assert!(timeline
            .set_parameter(&"floormaterial".into(), values, 2.0)
            .is_err());
    }

    #[test]
    fn keeps_emission_order_for_equal_beats() {
        let mut timeline = Timeline::new();
        let material = MaterialHandle::new("text");
        for value in [1.0, 2.0, 3.0] {
            timeline
                .set_parameter(&material, ParameterSet::single("_CurrentTexture", value), 4.0)
                .unwrap();
        }

        let history = timeline.parameter_history("text", "_CurrentTexture");
        assert_eq!(history, vec![(4.0, 1.0), (4.0, 2.0), (4.0, 3.0)]);
    }

    #[test]
    fn rejects_invalid_snapshots_and_animations() {
        let mut timeline = Timeline::new();
        let material = MaterialHandle::new("text");
        assert!(timeline
            .set_parameter(&material, ParameterSet::new(), 0.0)
            .is_err());
        assert!(timeline
            .set_parameter(&material, ParameterSet::single("_Opacity", f64::NAN), 0.0)
            .is_err());
        assert!(timeline
            .set_parameter(&material, ParameterSet::single("_Opacity", 1.0), f64::INFINITY)
            .is_err());

        let bad = TrackAnimation::new("spheres", 12.0, 4.0)
            .position(vec![Keyframe::new([0.0; 3], 2.0)]);
        assert!(timeline.animate_track(bad).is_err());
        assert!(timeline.is_empty());
    }

    #[test]
    fn object_prefabs_resolve_against_the_catalog() {
        let mut catalog = AssetCatalog::new();
        catalog.register_prefab("customnote", "assets/customnote.prefab");
        let mut timeline = Timeline::with_catalog(catalog);

        timeline
            .assign_object_prefab(PrefabAssignment::new(
                ObjectKind::ColorNotes,
                "myColorNotes",
                "customnote",
            ))
            .unwrap();
        assert_eq!(
            timeline.prefab_assignments()[0].path.as_deref(),
            Some("assets/customnote.prefab")
        );

        assert!(matches!(
            timeline.assign_object_prefab(PrefabAssignment::new(
                ObjectKind::BombNotes,
                "myBombs",
                "custombomb",
            )),
            Err(SequencerError::UnknownAsset(_))
        ));
        assert_eq!(timeline.prefab_assignments().len(), 1);
    }

    #[test]
    fn one_prefab_per_object_kind_and_track() {
        let mut timeline = Timeline::new();
        let notes = |asset: &str| PrefabAssignment::new(ObjectKind::ColorNotes, "notes", asset);

        timeline.assign_object_prefab(notes("first")).unwrap();
        assert!(timeline.assign_object_prefab(notes("second")).is_err());
        assert!(timeline
            .assign_object_prefab(PrefabAssignment::new(ObjectKind::Saber, "notes", "second"))
            .is_ok());
        assert!(timeline
            .assign_object_prefab(PrefabAssignment::new(ObjectKind::Saber, "", "second"))
            .is_err());
        assert_eq!(timeline.prefab_assignments().len(), 2);
        assert!(timeline.prefab_assignments()[0].path.is_none());
    }
}
