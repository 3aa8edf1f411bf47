//! Scripted sequences of discrete parameter values.
//!
//! A [`FrameSequence`] is written once (for example the texture frame for
//! every word of a spoken line) and replayed at any number of base beats.

use serde::{Deserialize, Serialize};

use crate::{
    error::ensure_finite,
    material::{MaterialHandle, ParameterSet},
    timeline::TimelineSink,
    BeatTime, Result, SequencerError,
};

/// A value set at `offset` beats after the sequence's base beat.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SequenceEntry {
    pub offset: BeatTime,
    pub value: f64,
}

/// Ordered list of discrete parameter values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameSequence {
    entries: Vec<SequenceEntry>,
}

impl FrameSequence {
    pub fn new(entries: Vec<SequenceEntry>) -> Self {
        Self { entries }
    }

    /// Builds a sequence from `(offset, value)` pairs.
    pub fn from_pairs(pairs: &[(BeatTime, f64)]) -> Self {
        pairs
            .iter()
            .map(|&(offset, value)| SequenceEntry { offset, value })
            .collect()
    }

    pub fn entries(&self) -> &[SequenceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Offset of the last entry, i.e. how long one playback lasts.
    pub fn span(&self) -> BeatTime {
        self.entries
            .iter()
            .map(|entry| entry.offset)
            .fold(0.0, f64::max)
    }
}

impl FromIterator<SequenceEntry> for FrameSequence {
    fn from_iter<T: IntoIterator<Item = SequenceEntry>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Sets `parameter` on `material` to each entry's value at
/// `base + entry.offset`. No interpolation happens between entries.
pub fn play_sequence<S: TimelineSink + ?Sized>(
    sink: &mut S,
    material: &MaterialHandle,
    parameter: &str,
    base: BeatTime,
    sequence: &FrameSequence,
) -> Result<()> {
    ensure_finite("sequence base beat", base)?;
    if sequence.is_empty() {
        return Err(SequencerError::invalid(format!(
            "sequence for `{}` has no entries",
            material.name()
        )));
    }

    for entry in sequence.entries() {
        ensure_finite("sequence offset", entry.offset)?;
        if entry.offset < 0.0 {
            return Err(SequencerError::invalid(format!(
                "sequence offset {} is negative",
                entry.offset
            )));
        }
    }

    for entry in sequence.entries() {
        sink.set_parameter(
            material,
            ParameterSet::single(parameter, entry.value),
            base + entry.offset,
        )?;
    }

    tracing::debug!(
        material = material.name(),
        parameter,
        base,
        entries = sequence.len(),
        "played sequence"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::Timeline;

    fn utterance() -> FrameSequence {
        FrameSequence::from_pairs(&[(0.0, 1.0), (0.5, 2.0), (0.75, 3.0), (1.5, 0.0)])
    }

    #[test]
    fn emits_one_set_per_entry() {
        let mut timeline = Timeline::new();
        let material = MaterialHandle::new("auctioneertext");

        play_sequence(&mut timeline, &material, "_CurrentTexture", 32.0, &utterance()).unwrap();

        let history = timeline.parameter_history("auctioneertext", "_CurrentTexture");
        assert_eq!(
            history,
            vec![(32.0, 1.0), (32.5, 2.0), (32.75, 3.0), (33.5, 0.0)]
        );
    }

    #[test]
    fn replays_are_offset_copies() {
        let mut timeline = Timeline::new();
        let material = MaterialHandle::new("auctioneertext");
        let line = utterance();

        play_sequence(&mut timeline, &material, "_CurrentTexture", 8.0, &line).unwrap();
        play_sequence(&mut timeline, &material, "_CurrentTexture", 20.0, &line).unwrap();

        let history = timeline.parameter_history("auctioneertext", "_CurrentTexture");
        let (first, second) = history.split_at(line.len());
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second) {
            assert_eq!(b.0 - a.0, 12.0);
            assert_eq!(a.1, b.1);
        }
        assert!(first.iter().all(|(beat, _)| *beat < 20.0));
    }

    #[test]
    fn span_is_the_latest_offset() {
        assert_eq!(utterance().span(), 1.5);
        assert_eq!(FrameSequence::default().span(), 0.0);
    }

    #[test]
    fn rejects_empty_and_negative_sequences() {
        let mut timeline = Timeline::new();
        let material = MaterialHandle::new("text");

        let empty = FrameSequence::default();
        assert!(play_sequence(&mut timeline, &material, "_CurrentTexture", 0.0, &empty).is_err());

        let negative = FrameSequence::from_pairs(&[(0.0, 1.0), (-0.5, 2.0)]);
        assert!(play_sequence(&mut timeline, &material, "_CurrentTexture", 4.0, &negative).is_err());
        assert!(timeline.is_empty());
    }
}
