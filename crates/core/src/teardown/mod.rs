//! Randomised, evenly spread removal of a batch of instances.

use std::collections::HashMap;

use crate::{
    error::ensure_finite,
    random::{permute, RandomSource},
    scene::InstanceHandle,
    timeline::{check_removal, TimelineSink},
    BeatTime, Result, SequencerError,
};

/// Instances collected by a placement step and handed to
/// [`stagger_remove`], which consumes the set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeardownSet {
    instances: Vec<InstanceHandle>,
}

impl TeardownSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, handle: InstanceHandle) {
        self.instances.push(handle);
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl FromIterator<InstanceHandle> for TeardownSet {
    fn from_iter<T: IntoIterator<Item = InstanceHandle>>(iter: T) -> Self {
        Self {
            instances: iter.into_iter().collect(),
        }
    }
}

/// Removes every instance in `set` across `duration` beats starting at `beat`.
///
/// The set is shuffled, then walked from its last element to its first; the
/// k-th instance visited disappears at `beat + k * duration / count`. Every
/// slot is checked before any removal is written, so a failure leaves the
/// sink untouched.
pub fn stagger_remove<S, R>(
    sink: &mut S,
    rng: &mut R,
    set: TeardownSet,
    beat: BeatTime,
    duration: BeatTime,
) -> Result<()>
where
    S: TimelineSink + ?Sized,
    R: RandomSource + ?Sized,
{
    ensure_finite("teardown beat", beat)?;
    ensure_finite("teardown duration", duration)?;
    if duration < 0.0 {
        return Err(SequencerError::invalid(format!(
            "teardown duration {duration} is negative"
        )));
    }
    if set.is_empty() {
        return Err(SequencerError::EmptyTeardown);
    }

    let mut order = set.instances;
    permute(rng, &mut order);

    let count = order.len();
    let interval = duration / count as f64;
    let slots: Vec<(InstanceHandle, BeatTime)> = order
        .into_iter()
        .rev()
        .enumerate()
        .map(|(slot, handle)| (handle, beat + slot as f64 * interval))
        .collect();

    let mut claimed = HashMap::with_capacity(count);
    for &(handle, removal) in &slots {
        if let Some(&existing) = claimed.get(&handle) {
            return Err(SequencerError::AlreadyScheduled {
                instance: handle.index(),
                existing,
            });
        }
        check_removal(handle, sink.instance_mut(handle)?, removal)?;
        claimed.insert(handle, removal);
    }

    for (handle, removal) in slots {
        sink.schedule_removal(handle, removal)?;
    }

    tracing::debug!(beat, duration, count, "staggered removal");
    Ok(())
}
