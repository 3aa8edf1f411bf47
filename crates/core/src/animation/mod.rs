//! Keyframed transform curves recorded on animation tracks.
//!
//! Keyframe times are normalised to the animation's duration, so `0.11`
//! means 11% of the way through regardless of how many beats it spans.

use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};

use crate::error::ensure_finite;
use crate::{BeatTime, Result, SequencerError};

const BACK_OVERSHOOT: f64 = 1.70158;

/// Easing applied to the segment that ends at a keyframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Easing {
    #[serde(rename = "easeLinear")]
    Linear,
    #[serde(rename = "easeInQuad")]
    InQuad,
    #[serde(rename = "easeOutQuad")]
    OutQuad,
    #[serde(rename = "easeInOutQuad")]
    InOutQuad,
    #[serde(rename = "easeInCubic")]
    InCubic,
    #[serde(rename = "easeOutCubic")]
    OutCubic,
    #[serde(rename = "easeInOutCubic")]
    InOutCubic,
    #[serde(rename = "easeInBack")]
    InBack,
    #[serde(rename = "easeOutBack")]
    OutBack,
    #[serde(rename = "easeInOutBack")]
    InOutBack,
}

impl Easing {
    /// Maps linear progress in `[0, 1]` through the curve. Back easings
    /// overshoot outside `[0, 1]` between the endpoints.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        let c3 = BACK_OVERSHOOT + 1.0;
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Self::InBack => c3 * t * t * t - BACK_OVERSHOOT * t * t,
            Self::OutBack => 1.0 + c3 * (t - 1.0).powi(3) + BACK_OVERSHOOT * (t - 1.0).powi(2),
            Self::InOutBack => {
                let c2 = BACK_OVERSHOOT * 1.525;
                if t < 0.5 {
                    (2.0 * t).powi(2) * ((c2 + 1.0) * 2.0 * t - c2) / 2.0
                } else {
                    ((2.0 * t - 2.0).powi(2) * ((c2 + 1.0) * (2.0 * t - 2.0) + c2) + 2.0) / 2.0
                }
            }
        }
    }
}

/// One sample of a transform curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub value: [f64; 3],
    /// Normalised time in `[0, 1]`.
    pub time: f64,
    pub easing: Option<Easing>,
}

impl Keyframe {
    pub fn new(value: [f64; 3], time: f64) -> Self {
        Self {
            value,
            time,
            easing: None,
        }
    }

    pub fn eased(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }
}

/// Serialised as `[x, y, z, t]` or `[x, y, z, t, "easing"]`.
impl Serialize for Keyframe {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let len = if self.easing.is_some() { 5 } else { 4 };
        let mut seq = serializer.serialize_seq(Some(len))?;
        for component in self.value {
            seq.serialize_element(&component)?;
        }
        seq.serialize_element(&self.time)?;
        if let Some(easing) = &self.easing {
            seq.serialize_element(easing)?;
        }
        seq.end()
    }
}

/// Ordered keyframes for one transform property.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AnimationCurve(Vec<Keyframe>);

impl AnimationCurve {
    pub fn new(keyframes: Vec<Keyframe>) -> Self {
        Self(keyframes)
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.0
    }

    /// Non-empty, finite, with times in `[0, 1]` that never go backwards.
    pub fn validate(&self) -> Result<()> {
        if self.0.is_empty() {
            return Err(SequencerError::invalid("animation curve has no keyframes"));
        }

        let mut previous = 0.0;
        for keyframe in &self.0 {
            for component in keyframe.value {
                ensure_finite("keyframe value", component)?;
            }
            ensure_finite("keyframe time", keyframe.time)?;
            if !(0.0..=1.0).contains(&keyframe.time) {
                return Err(SequencerError::invalid(format!(
                    "keyframe time {} lies outside [0, 1]",
                    keyframe.time
                )));
            }
            if keyframe.time < previous {
                return Err(SequencerError::invalid(format!(
                    "keyframe time {} precedes the previous keyframe at {previous}",
                    keyframe.time
                )));
            }
            previous = keyframe.time;
        }
        Ok(())
    }

    /// Value of the curve at normalised time `t`, holding the first and last
    /// keyframes outside their range.
    pub fn sample(&self, t: f64) -> Option<[f64; 3]> {
        let first = self.0.first()?;
        if t <= first.time {
            return Some(first.value);
        }

        let next = match self.0.iter().position(|keyframe| keyframe.time >= t) {
            Some(index) => index,
            None => return self.0.last().map(|keyframe| keyframe.value),
        };
        let end = self.0[next];
        let start = self.0[next - 1];
        let span = end.time - start.time;
        if span <= 0.0 {
            return Some(end.value);
        }

        let local = (t - start.time) / span;
        let progress = end.easing.map_or(local, |easing| easing.apply(local));
        let mut value = [0.0; 3];
        for (axis, slot) in value.iter_mut().enumerate() {
            *slot = start.value[axis] + (end.value[axis] - start.value[axis]) * progress;
        }
        Some(value)
    }
}

/// Evaluated transform of a track at one beat. Properties the animation does
/// not touch are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrackPose {
    pub position: Option<[f64; 3]>,
    pub local_position: Option<[f64; 3]>,
    pub scale: Option<[f64; 3]>,
    pub rotation: Option<[f64; 3]>,
}

impl From<Vec<Keyframe>> for AnimationCurve {
    fn from(value: Vec<Keyframe>) -> Self {
        Self::new(value)
    }
}

/// Keyframed transform animation applied to every object on a track.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackAnimation {
    pub track: String,
    pub beat: BeatTime,
    pub duration: BeatTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<AnimationCurve>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_position: Option<AnimationCurve>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<AnimationCurve>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<AnimationCurve>,
}

impl TrackAnimation {
    pub fn new(track: impl Into<String>, beat: BeatTime, duration: BeatTime) -> Self {
        Self {
            track: track.into(),
            beat,
            duration,
            repeat: None,
            position: None,
            local_position: None,
            scale: None,
            rotation: None,
        }
    }

    pub fn repeat(mut self, times: u32) -> Self {
        self.repeat = Some(times);
        self
    }

    pub fn position(mut self, curve: impl Into<AnimationCurve>) -> Self {
        self.position = Some(curve.into());
        self
    }

    pub fn local_position(mut self, curve: impl Into<AnimationCurve>) -> Self {
        self.local_position = Some(curve.into());
        self
    }

    pub fn scale(mut self, curve: impl Into<AnimationCurve>) -> Self {
        self.scale = Some(curve.into());
        self
    }

    pub fn rotation(mut self, curve: impl Into<AnimationCurve>) -> Self {
        self.rotation = Some(curve.into());
        self
    }

    /// Normalised progress at `beat`, or `None` before the animation starts.
    ///
    /// Each repeat restarts from 0; after the last one the final keyframes
    /// hold.
    pub fn progress_at(&self, beat: BeatTime) -> Option<f64> {
        if !(beat >= self.beat) {
            return None;
        }
        if self.duration <= 0.0 {
            return Some(1.0);
        }

        let cycles = f64::from(self.repeat.unwrap_or(0)) + 1.0;
        let elapsed = beat - self.beat;
        if elapsed >= self.duration * cycles {
            return Some(1.0);
        }
        Some((elapsed % self.duration) / self.duration)
    }

    /// Transform the track holds at `beat`.
    pub fn pose_at(&self, beat: BeatTime) -> Option<TrackPose> {
        let t = self.progress_at(beat)?;
        let sample = |curve: &Option<AnimationCurve>| curve.as_ref().and_then(|c| c.sample(t));
        Some(TrackPose {
            position: sample(&self.position),
            local_position: sample(&self.local_position),
            scale: sample(&self.scale),
            rotation: sample(&self.rotation),
        })
    }

    fn curves(&self) -> impl Iterator<Item = &AnimationCurve> {
        [
            &self.position,
            &self.local_position,
            &self.scale,
            &self.rotation,
        ]
        .into_iter()
        .flatten()
    }

    pub fn validate(&self) -> Result<()> {
        if self.track.is_empty() {
            return Err(SequencerError::invalid("animation track name is empty"));
        }
        ensure_finite("animation beat", self.beat)?;
        ensure_finite("animation duration", self.duration)?;
        if self.duration < 0.0 {
            return Err(SequencerError::invalid(format!(
                "animation duration {} is negative",
                self.duration
            )));
        }
        if self.curves().next().is_none() {
            return Err(SequencerError::invalid(format!(
                "animation on track `{}` animates no property",
                self.track
            )));
        }
        self.curves().try_for_each(AnimationCurve::validate)
    }
}
