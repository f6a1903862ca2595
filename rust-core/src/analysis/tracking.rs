//! Frame-to-frame partial tracking
//!
//! Links the peaks of consecutive frames into [`Track`]s with greedy
//! nearest-neighbour matching:
//!
//! 1. Every peak of frame 0 starts a track.
//! 2. For each later frame the active tracks are sorted by current frequency
//!    and visited once, lowest first. A track claims the nearest free peak
//!    within the matching radius unless one of the tracks still waiting in
//!    this frame sits at exactly its frequency, in which case it settles for
//!    the next lower peak. A track that gets nothing is closed with a
//!    zero-amplitude entry.
//! 3. Peaks nobody claimed start new tracks with a silent first entry.
//!
//! The result depends on the visiting order, so the per-frame loop must stay
//! sequential.
//!
//! Output order is: tracks in the order they died, then the tracks still
//! active after the last frame. This is not birth order.

use tracing::{debug, trace};

use super::peaks::keep_highest;
use crate::error::{ModelError, Result};
use crate::model::{Frame, Peak, Track};

/// Partial tracker configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackerConfig {
    /// Largest frequency jump in Hz a track may make between frames (inclusive)
    pub matching_radius: f64,

    /// Cap every incoming frame to its highest-frequency peaks before matching
    pub max_peaks: Option<usize>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            matching_radius: 200.0,
            max_peaks: None,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.matching_radius >= 0.0) {
            return Err(ModelError::InvalidMatchingRadius(self.matching_radius));
        }
        Ok(())
    }
}

/// Counters collected during one tracking run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackingStats {
    /// Frames processed
    pub frames: usize,

    /// Tracks created, including the ones started by frame 0
    pub births: usize,

    /// Tracks closed with a fade-out entry
    pub deaths: usize,

    /// Tracks still active after the last frame
    pub survivors: usize,
}

/// Links per-frame peaks into partial tracks
#[derive(Debug, Clone)]
pub struct PartialTracker {
    config: TrackerConfig,
}

impl PartialTracker {
    /// Create a tracker, validating the configuration
    pub fn new(config: TrackerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Track partials across frames
    ///
    /// # Arguments
    /// * `frames` - Per-frame peaks, ascending by frequency
    ///
    /// # Returns
    /// Dead tracks in order of death, followed by the tracks alive at the end
    pub fn track(&self, frames: &[Frame]) -> Vec<Track> {
        self.track_with_stats(frames).0
    }

    /// Same as [`PartialTracker::track`], also returning run counters
    pub fn track_with_stats(&self, frames: &[Frame]) -> (Vec<Track>, TrackingStats) {
        let mut stats = TrackingStats::default();
        let Some((first, rest)) = frames.split_first() else {
            return (Vec::new(), stats);
        };
        stats.frames = frames.len();

        let mut active: Vec<Track> = self
            .prepare(first)
            .into_iter()
            .map(|peak| Track::start(0, peak))
            .collect();
        stats.births = active.len();

        let mut finalized = Vec::new();
        for (offset, frame) in rest.iter().enumerate() {
            active = self.advance(offset + 1, active, self.prepare(frame), &mut finalized, &mut stats);
        }

        stats.survivors = active.len();
        debug!(
            frames = stats.frames,
            births = stats.births,
            deaths = stats.deaths,
            survivors = stats.survivors,
            "partial tracking finished"
        );

        // Survivors end as they are: no forced fade-out at end of input
        finalized.extend(active);
        (finalized, stats)
    }

    /// Copy a frame into a sorted, capped matching pool
    fn prepare(&self, frame: &Frame) -> Frame {
        let mut pool = frame.clone();
        pool.sort_by(|a, b| a.freq.total_cmp(&b.freq));
        if let Some(max_peaks) = self.config.max_peaks {
            keep_highest(&mut pool, max_peaks);
        }
        pool
    }

    /// Extend the active tracks with the peaks of one frame
    ///
    /// Dead tracks are moved to `finalized`. Returns the new active set:
    /// extended tracks in visiting order, then tracks born in this frame.
    fn advance(
        &self,
        frame_index: usize,
        mut active: Vec<Track>,
        mut pool: Frame,
        finalized: &mut Vec<Track>,
        stats: &mut TrackingStats,
    ) -> Vec<Track> {
        active.sort_by(|a, b| a.last_freq().total_cmp(&b.last_freq()));

        // Frozen before any track is extended; entries past the current
        // position are the tracks still waiting in this frame.
        let current: Vec<f64> = active.iter().map(Track::last_freq).collect();

        let mut survivors = Vec::with_capacity(active.len() + pool.len());
        let mut matched = 0;
        let mut died = 0;

        for (position, mut track) in active.into_iter().enumerate() {
            match self.claim(current[position], &current[position + 1..], &pool) {
                Some(k) => {
                    track.push(pool.remove(k));
                    survivors.push(track);
                    matched += 1;
                }
                None => {
                    track.fade_out();
                    finalized.push(track);
                    died += 1;
                }
            }
        }

        let born = pool.len();
        survivors.extend(pool.into_iter().map(|peak| Track::fade_in(frame_index, peak)));

        trace!(frame = frame_index, matched, died, born, "frame tracked");
        stats.births += born;
        stats.deaths += died;

        survivors
    }

    /// Pick the pool index a track at `freq` takes, if any
    ///
    /// `pending` holds the current frequencies of the tracks not yet visited
    /// in this frame, ascending.
    fn claim(&self, freq: f64, pending: &[f64], pool: &[Peak]) -> Option<usize> {
        let radius = self.config.matching_radius;
        let k = nearest(pool, |p| p.freq, freq, radius)?;

        let contender = nearest(pending, |&f| f, pool[k].freq, radius).map(|i| pending[i]);
        if contender != Some(freq) {
            return Some(k);
        }

        // A waiting track shares this frequency: leave it the candidate
        let lower = k.checked_sub(1)?;
        ((pool[lower].freq - freq).abs() <= radius).then_some(lower)
    }

    /// Get current configuration
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Update configuration
    pub fn update_config(&mut self, config: TrackerConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }
}

/// Index of the item nearest to `target`, no further than `radius`
///
/// `items` must be ascending by `key`. Only the items at the insertion point
/// of `target` and its two neighbours are examined. Two equally near
/// candidates count as no candidate.
fn nearest<T>(items: &[T], key: impl Fn(&T) -> f64, target: f64, radius: f64) -> Option<usize> {
    if items.is_empty() {
        return None;
    }

    let m = items.partition_point(|item| key(item) < target);
    let lo = m.saturating_sub(1);
    let hi = (m + 1).min(items.len() - 1);

    let mut best: Option<(usize, f64)> = None;
    let mut tied = false;
    for (i, item) in items.iter().enumerate().take(hi + 1).skip(lo) {
        let distance = (key(item) - target).abs();
        if distance > radius {
            continue;
        }
        match best {
            Some((_, d)) if distance == d => tied = true,
            Some((_, d)) if distance > d => {}
            _ => {
                best = Some((i, distance));
                tied = false;
            }
        }
    }

    if tied {
        None
    } else {
        best.map(|(i, _)| i)
    }
}

/// Track partials with a one-off tracker
///
/// # Arguments
/// * `frames` - Per-frame peaks, ascending by frequency
/// * `matching_radius` - Largest frequency jump in Hz between frames
/// * `max_peaks` - Optional per-frame cap (highest frequencies kept)
pub fn track_partials(
    frames: &[Frame],
    matching_radius: f64,
    max_peaks: Option<usize>,
) -> Result<Vec<Track>> {
    let tracker = PartialTracker::new(TrackerConfig {
        matching_radius,
        max_peaks,
    })?;
    Ok(tracker.track(frames))
}
