//! Discretised linear ramps of material parameters.
//!
//! Sample beats come from an integer step index so the endpoint never drifts,
//! and every ramp is closed by one exact event at the end beat.

use crate::{
    error::ensure_finite,
    material::{MaterialHandle, ParameterSet},
    timeline::TimelineSink,
    BeatTime, Result, SequencerError,
};

/// Upper bound on the steps a single ramp may expand into.
pub const MAX_RAMP_STEPS: u32 = 65_536;

/// How finely a ramp is sampled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// Exactly this many evenly spaced steps across the whole ramp.
    Steps(u32),
    /// One step every this many beats, counted from the ramp start. The last
    /// gap before the endpoint may be shorter.
    StepSize(BeatTime),
}

impl Resolution {
    /// Upper bound on the step count for a ramp lasting `duration` beats.
    pub fn steps(self, duration: BeatTime) -> Result<u32> {
        let steps = match self {
            Self::Steps(0) => {
                return Err(SequencerError::invalid("ramp needs at least one step"))
            }
            Self::Steps(steps) => f64::from(steps),
            Self::StepSize(size) => {
                if !(size.is_finite() && size > 0.0) {
                    return Err(SequencerError::invalid(format!(
                        "ramp step size must be a positive number of beats, got {size}"
                    )));
                }
                (duration / size).ceil().max(1.0)
            }
        };
        if steps > f64::from(MAX_RAMP_STEPS) {
            return Err(SequencerError::invalid(format!(
                "{self:?} over {duration} beats needs {steps} steps, more than {MAX_RAMP_STEPS}"
            )));
        }
        Ok(steps as u32)
    }

    /// Offset of step `index` from the ramp start.
    fn offset(self, index: u32, steps: u32, duration: BeatTime) -> BeatTime {
        match self {
            Self::Steps(_) => duration * f64::from(index) / f64::from(steps),
            Self::StepSize(size) => size * f64::from(index),
        }
    }
}

/// One sampled point of a ramp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RampSample {
    pub beat: BeatTime,
    pub value: f64,
}

/// Samples a linear ramp from `from` to `to` over `duration` beats starting at
/// `beat`.
///
/// Yields one sample per step strictly before the end beat, then one final
/// sample at exactly `beat + duration` holding `to`. With `Steps(n)` the steps
/// sit at `i * duration / n`; with `StepSize(size)` they sit at every multiple
/// of `size`. A zero duration yields only that final sample.
pub fn sample_ramp(
    beat: BeatTime,
    duration: BeatTime,
    from: f64,
    to: f64,
    resolution: Resolution,
) -> Result<Vec<RampSample>> {
    ensure_finite("ramp beat", beat)?;
    ensure_finite("ramp duration", duration)?;
    ensure_finite("ramp start value", from)?;
    ensure_finite("ramp end value", to)?;
    if duration < 0.0 {
        return Err(SequencerError::invalid(format!(
            "ramp duration {duration} is negative"
        )));
    }

    let end = RampSample {
        beat: beat + duration,
        value: to,
    };
    if duration == 0.0 {
        return Ok(vec![end]);
    }

    let steps = resolution.steps(duration)?;
    let mut samples = Vec::with_capacity(steps as usize + 1);
    for i in 0..steps {
        let offset = resolution.offset(i, steps, duration);
        if offset >= duration {
            break;
        }
        samples.push(RampSample {
            beat: beat + offset,
            value: from + (to - from) * (offset / duration),
        });
    }
    samples.push(end);
    Ok(samples)
}

/// A linear transition of one numeric parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ramp {
    pub beat: BeatTime,
    pub duration: BeatTime,
    pub from: f64,
    pub to: f64,
    pub resolution: Resolution,
}

impl Ramp {
    pub fn new(beat: BeatTime, duration: BeatTime, from: f64, to: f64) -> Self {
        Self {
            beat,
            duration,
            from,
            to,
            resolution: Resolution::StepSize(DEFAULT_STEP_SIZE),
        }
    }

    pub fn resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn samples(&self) -> Result<Vec<RampSample>> {
        sample_ramp(self.beat, self.duration, self.from, self.to, self.resolution)
    }
}

/// Sampling density used when a ramp does not specify one: eight sets per beat.
pub const DEFAULT_STEP_SIZE: BeatTime = 0.125;

/// Writes a sampled ramp of `parameter` to every material in `materials`, so
/// surfaces that must stay visually in sync receive identical snapshots.
/// Returns the number of samples written per material.
pub fn apply_ramp<S: TimelineSink + ?Sized>(
    sink: &mut S,
    materials: &[MaterialHandle],
    parameter: &str,
    ramp: &Ramp,
) -> Result<usize> {
    if materials.is_empty() {
        return Err(SequencerError::invalid(format!(
            "ramp of `{parameter}` targets no materials"
        )));
    }

    let samples = ramp.samples()?;
    for sample in &samples {
        for material in materials {
            sink.set_parameter(
                material,
                ParameterSet::single(parameter, sample.value),
                sample.beat,
            )?;
        }
    }

    tracing::debug!(
        parameter,
        beat = ramp.beat,
        duration = ramp.duration,
        samples = samples.len(),
        materials = materials.len(),
        "applied ramp"
    );
    Ok(samples.len())
}
