use serde::{Deserialize, Serialize};

use crate::BeatTime;

/// Position or scale triple.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Uniform triple, used for scales that apply identically to every axis.
    pub const fn splat(value: f64) -> Self {
        Self::new(value, value, value)
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

/// Rotation in degrees, ordered (pitch, yaw, roll).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Euler {
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
}

impl Euler {
    pub const fn new(pitch: f64, yaw: f64, roll: f64) -> Self {
        Self { pitch, yaw, roll }
    }
}

/// Initial or updated transform of a placed asset. Missing fields keep the
/// asset's authored default.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Transform {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Euler>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Vec3>,
}

impl Transform {
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_rotation(mut self, rotation: Euler) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = Some(scale);
        self
    }
}

/// Everything a caller supplies when placing an asset besides its name and beat.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Placement {
    pub track: Option<String>,
    pub transform: Transform,
}

impl Placement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_track(mut self, track: impl Into<String>) -> Self {
        self.track = Some(track.into());
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }
}

/// Opaque reference to an instance owned by a timeline sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct InstanceHandle(pub(crate) usize);

impl InstanceHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A placed occurrence of a reusable asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedInstance {
    asset: String,
    beat: BeatTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track: Option<String>,
    #[serde(flatten)]
    pub transform: Transform,
    #[serde(rename = "destroyAt", skip_serializing_if = "Option::is_none")]
    removal: Option<BeatTime>,
}

impl PlacedInstance {
    pub fn new(asset: impl Into<String>, beat: BeatTime, placement: Placement) -> Self {
        Self {
            asset: asset.into(),
            beat,
            track: placement.track,
            transform: placement.transform,
            removal: None,
        }
    }

    pub fn asset(&self) -> &str {
        &self.asset
    }

    /// Beat at which the instance appears.
    pub fn beat(&self) -> BeatTime {
        self.beat
    }

    /// Beat at which the instance is scheduled to disappear, if any.
    pub fn removal(&self) -> Option<BeatTime> {
        self.removal
    }

    pub(crate) fn set_removal(&mut self, beat: BeatTime) {
        self.removal = Some(beat);
    }
}

/// Gameplay object kinds whose visuals can be swapped for a prefab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ObjectKind {
    ColorNotes,
    BombNotes,
    BurstSliders,
    BurstSliderElements,
    Saber,
}

/// Renders every object of `object` that carries `track` with the `asset`
/// prefab instead of its stock model. Not tied to a beat.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrefabAssignment {
    pub object: ObjectKind,
    pub track: String,
    pub asset: String,
    /// Bundle path of `asset`, filled in when a catalog is present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl PrefabAssignment {
    pub fn new(object: ObjectKind, track: impl Into<String>, asset: impl Into<String>) -> Self {
        Self {
            object,
            track: track.into(),
            asset: asset.into(),
            path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_builders_fill_only_requested_fields() {
        let transform = Transform::default().with_scale(Vec3::splat(0.0));
        assert_eq!(transform.scale, Some(Vec3::ZERO));
        assert!(transform.position.is_none());
        assert!(transform.rotation.is_none());
    }

    #[test]
    fn instance_serialises_flat_transform() {
        let placement = Placement::new()
            .on_track("AJRLogo")
            .with_transform(Transform::default().with_position(Vec3::new(0.0, 1.5, 7.0)));
        let mut instance = PlacedInstance::new("ajrlogo", 6.0, placement);
        instance.set_removal(15.0);

        let json = serde_json::to_value(&instance).unwrap();
        assert_eq!(json["track"], "AJRLogo");
        assert_eq!(json["position"]["z"], 7.0);
        assert_eq!(json["destroyAt"], 15.0);
        assert!(json.get("scale").is_none());
    }

    #[test]
    fn prefab_assignment_uses_object_kind_keys() {
        let assignment = PrefabAssignment::new(ObjectKind::ColorNotes, "myColorNotes", "customnote");
        let json = serde_json::to_value(&assignment).unwrap();
        assert_eq!(json["object"], "colorNotes");
        assert_eq!(json["track"], "myColorNotes");
        assert!(json.get("path").is_none());

        let kind: ObjectKind = serde_json::from_str("\"burstSliderElements\"").unwrap();
        assert_eq!(kind, ObjectKind::BurstSliderElements);
    }
}
