/*!
 * Greedy aggregation of subtitle cues into duration-capped chunks.
 *
 * A chunk's `length_seconds` is the sum of its cues' own durations, so
 * silences between cues are not counted against the cap. Chunk boundaries
 * are still reported on the wall clock:
 *
 * - a chunk closed because the next cue would overflow it ends where that
 *   next cue starts, so consecutive chunks touch;
 * - the last chunk ends at `start + length`, which only matches the last
 *   cue's end when the chunk has no internal gaps.
 */

use log::debug;
use serde::Serialize;

use crate::errors::ConfigError;
use crate::subtitle_processor::SubtitleEntry;

/// Default cap on cumulative cue duration per chunk, in seconds
pub const DEFAULT_MAX_CHUNK_DURATION_SECS: f64 = 15.0;

/// Turns the texts of a chunk's cues into the chunk text
pub type JoinPolicy = fn(&[String]) -> String;

/// Joins cue texts with a single space, verbatim
pub fn space_join(texts: &[String]) -> String {
    texts.join(" ")
}

/// A group of consecutive cues
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chunk {
    /// 1-based, contiguous
    pub id: usize,
    pub text: String,
    pub start_seconds: f64,
    pub end_seconds: f64,
    /// Sum of the constituent cue durations
    pub length_seconds: f64,
}

impl Chunk {
    /// Reported end minus reported start, silences included
    pub fn wall_clock_span(&self) -> f64 {
        self.end_seconds - self.start_seconds
    }
}

/// Packs cues into chunks whose cumulative cue duration stays under a cap
#[derive(Debug, Clone, Copy)]
pub struct ChunkAggregator {
    max_duration: f64,
    join: JoinPolicy,
}

impl ChunkAggregator {
    /// Create an aggregator with the given cap and space-joined text
    pub fn new(max_duration: f64) -> Result<Self, ConfigError> {
        if !max_duration.is_finite() || max_duration <= 0.0 {
            return Err(ConfigError::InvalidMaxDuration(max_duration));
        }

        Ok(Self {
            max_duration,
            join: space_join,
        })
    }

    /// Replace the text joining policy
    pub fn with_join_policy(mut self, join: JoinPolicy) -> Self {
        self.join = join;
        self
    }

    pub fn max_duration(&self) -> f64 {
        self.max_duration
    }

    /// Consume the entries in order and return the chunk sequence.
    ///
    /// Empty input gives no chunks. A single cue longer than the cap is
    /// still emitted, alone, as its own chunk.
    pub fn aggregate<I>(&self, entries: I) -> Vec<Chunk>
    where
        I: IntoIterator<Item = SubtitleEntry>,
    {
        let chunks = entries
            .into_iter()
            .fold(ChunkAccumulator::new(*self), |mut acc, entry| {
                acc.push(entry);
                acc
            })
            .finish();

        debug!(
            "Aggregated into {} chunk(s) with max duration {:.2}s",
            chunks.len(),
            self.max_duration
        );
        chunks
    }
}

impl Default for ChunkAggregator {
    fn default() -> Self {
        Self {
            max_duration: DEFAULT_MAX_CHUNK_DURATION_SECS,
            join: space_join,
        }
    }
}

struct ChunkAccumulator {
    settings: ChunkAggregator,
    chunks: Vec<Chunk>,
    texts: Vec<String>,
    start: Option<f64>,
    duration: f64,
    next_id: usize,
}

impl ChunkAccumulator {
    fn new(settings: ChunkAggregator) -> Self {
        Self {
            settings,
            chunks: Vec::new(),
            texts: Vec::new(),
            start: None,
            duration: 0.0,
            next_id: 1,
        }
    }

    fn push(&mut self, entry: SubtitleEntry) {
        let entry_start = entry.start_seconds();
        let entry_duration = entry.duration();
        let start = *self.start.get_or_insert(entry_start);

        // Nothing pending means nothing to close, even for an over-long cue
        if !self.texts.is_empty() && self.duration + entry_duration > self.settings.max_duration {
            self.close(start, entry_start);
            self.start = Some(entry_start);
            self.duration = entry_duration;
        } else {
            self.duration += entry_duration;
        }
        self.texts.push(entry.text);
    }

    fn close(&mut self, start: f64, end: f64) {
        let texts = std::mem::take(&mut self.texts);
        let chunk = Chunk {
            id: self.next_id,
            text: (self.settings.join)(&texts),
            start_seconds: start,
            end_seconds: end,
            length_seconds: self.duration,
        };

        debug!(
            "Chunk {}: {} cue(s), {:.2}s spoken, {:.2}s-{:.2}s",
            chunk.id,
            texts.len(),
            chunk.length_seconds,
            chunk.start_seconds,
            chunk.end_seconds
        );
        self.chunks.push(chunk);
        self.next_id += 1;
    }

    fn finish(mut self) -> Vec<Chunk> {
        if let Some(start) = self.start.filter(|_| !self.texts.is_empty()) {
            let end = start + self.duration;
            self.close(start, end);
        }
        self.chunks
    }
}
