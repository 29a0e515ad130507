//! Behavior synthesis
//!
//! Turns a comment text and a viewport into a timed sequence of low-level
//! interaction steps. The synthesizer only produces data; pausing before each
//! step is the executor's job.

use crate::jitter::{CountRange, DelayRange, JitterSampler};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Inclusive pixel range for a scroll offset (negative scrolls up)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetRange {
    /// Lower bound (inclusive)
    pub min_px: i32,
    /// Upper bound (inclusive)
    pub max_px: i32,
}

impl OffsetRange {
    /// Create a new offset range
    #[must_use]
    pub const fn new(min_px: i32, max_px: i32) -> Self {
        Self { min_px, max_px }
    }
}

/// Bounds for every randomized aspect of an interaction trace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviorProfile {
    /// Delay before each keystroke
    #[serde(default = "default_keystroke_delay")]
    pub keystroke_delay: DelayRange,
    /// Number of pointer moves per noise burst
    #[serde(default = "default_pointer_move_count")]
    pub pointer_move_count: CountRange,
    /// Delay before each pointer move
    #[serde(default = "default_pointer_move_delay")]
    pub pointer_move_delay: DelayRange,
    /// Delay before a scroll
    #[serde(default = "default_scroll_delay")]
    pub scroll_delay: DelayRange,
    /// Scroll distance
    #[serde(default = "default_scroll_offset")]
    pub scroll_offset: OffsetRange,
}

fn default_keystroke_delay() -> DelayRange {
    DelayRange::new(50, 250)
}
fn default_pointer_move_count() -> CountRange {
    CountRange::new(3, 7)
}
fn default_pointer_move_delay() -> DelayRange {
    DelayRange::new(100, 400)
}
fn default_scroll_delay() -> DelayRange {
    DelayRange::new(300, 1200)
}
fn default_scroll_offset() -> OffsetRange {
    OffsetRange::new(120, 600)
}

impl Default for BehaviorProfile {
    fn default() -> Self {
        Self {
            keystroke_delay: default_keystroke_delay(),
            pointer_move_count: default_pointer_move_count(),
            pointer_move_delay: default_pointer_move_delay(),
            scroll_delay: default_scroll_delay(),
            scroll_offset: default_scroll_offset(),
        }
    }
}

impl BehaviorProfile {
    /// Check that no range has inverted bounds
    pub fn validate(&self) -> Result<(), String> {
        self.keystroke_delay
            .validate()
            .map_err(|e| format!("keystroke_delay: {e}"))?;
        self.pointer_move_count
            .validate()
            .map_err(|e| format!("pointer_move_count: {e}"))?;
        self.pointer_move_delay
            .validate()
            .map_err(|e| format!("pointer_move_delay: {e}"))?;
        self.scroll_delay
            .validate()
            .map_err(|e| format!("scroll_delay: {e}"))?;
        if self.scroll_offset.min_px > self.scroll_offset.max_px {
            return Err("scroll_offset: min_px must not exceed max_px".to_string());
        }
        Ok(())
    }
}

/// Visible page area in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width
    pub width: u32,
    /// Height
    pub height: u32,
}

impl Viewport {
    /// Create a viewport
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether a point lies inside `[0,width) x [0,height)`
    #[must_use]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1366, 768)
    }
}

/// One low-level interaction step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Interaction {
    /// Type a single character
    Keystroke {
        /// Character to type
        key: char,
    },
    /// Move the pointer to a viewport coordinate
    PointerMove {
        /// Horizontal position
        x: u32,
        /// Vertical position
        y: u32,
    },
    /// Scroll vertically by an offset in pixels
    Scroll {
        /// Offset (positive scrolls down)
        offset: i32,
    },
}

/// An interaction paired with the delay to wait before performing it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedAction {
    /// Milliseconds to wait before executing
    pub delay_ms: u64,
    /// The interaction itself
    #[serde(flatten)]
    pub interaction: Interaction,
}

impl TimedAction {
    /// Create a timed action
    #[must_use]
    pub const fn new(delay_ms: u64, interaction: Interaction) -> Self {
        Self {
            delay_ms,
            interaction,
        }
    }
}

/// Ordered interaction trace handed to an executor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPlan {
    /// Steps in execution order
    pub steps: Vec<TimedAction>,
}

impl ActionPlan {
    /// Number of steps
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the plan has no steps
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Sum of all step delays
    #[must_use]
    pub fn total_delay_ms(&self) -> u64 {
        self.steps.iter().map(|s| s.delay_ms).sum()
    }

    /// Text typed by the keystroke steps, in order
    #[must_use]
    pub fn typed_text(&self) -> String {
        self.steps
            .iter()
            .filter_map(|s| match s.interaction {
                Interaction::Keystroke { key } => Some(key),
                _ => None,
            })
            .collect()
    }
}

impl FromIterator<TimedAction> for ActionPlan {
    fn from_iter<I: IntoIterator<Item = TimedAction>>(iter: I) -> Self {
        Self {
            steps: iter.into_iter().collect(),
        }
    }
}

/// Builds randomized interaction traces within a [`BehaviorProfile`].
///
/// Each call draws fresh randomness; returned iterators are one-shot and
/// borrow the synthesizer until consumed.
#[derive(Debug)]
pub struct BehaviorSynthesizer<R = StdRng> {
    profile: BehaviorProfile,
    sampler: JitterSampler<R>,
}

impl<R: Rng> BehaviorSynthesizer<R> {
    /// Create a synthesizer over the given profile and sampler
    #[must_use]
    pub fn new(profile: BehaviorProfile, sampler: JitterSampler<R>) -> Self {
        Self { profile, sampler }
    }

    /// The active profile
    #[must_use]
    pub fn profile(&self) -> &BehaviorProfile {
        &self.profile
    }

    /// One keystroke per character, in input order
    pub fn typing<'a>(&'a mut self, text: &'a str) -> impl Iterator<Item = TimedAction> + 'a {
        let range = self.profile.keystroke_delay;
        let sampler = &mut self.sampler;
        text.chars().map(move |key| {
            TimedAction::new(sampler.sample_delay(&range), Interaction::Keystroke { key })
        })
    }

    /// A burst of pointer moves at random coordinates inside the viewport.
    ///
    /// The move count is drawn when this is called. A zero-area viewport
    /// produces no moves.
    pub fn pointer_noise(&mut self, viewport: Viewport) -> impl Iterator<Item = TimedAction> + '_ {
        let count = if viewport.is_empty() {
            0
        } else {
            self.sampler.sample_count(&self.profile.pointer_move_count)
        };
        let range = self.profile.pointer_move_delay;
        let sampler = &mut self.sampler;
        (0..count).map(move |_| {
            let x = sampler.sample_below(viewport.width);
            let y = sampler.sample_below(viewport.height);
            TimedAction::new(
                sampler.sample_delay(&range),
                Interaction::PointerMove { x, y },
            )
        })
    }

    /// A single scroll step
    pub fn scroll(&mut self) -> TimedAction {
        let offset = self.sampler.sample_signed(
            self.profile.scroll_offset.min_px,
            self.profile.scroll_offset.max_px,
        );
        let delay = self.sampler.sample_delay(&self.profile.scroll_delay);
        TimedAction::new(delay, Interaction::Scroll { offset })
    }

    /// Full trace for publishing `text`: pointer noise, a scroll, then typing
    pub fn plan(&mut self, text: &str, viewport: Viewport) -> ActionPlan {
        let mut steps: Vec<TimedAction> = self.pointer_noise(viewport).collect();
        steps.push(self.scroll());
        steps.extend(self.typing(text));
        ActionPlan { steps }
    }
}

#[cfg(test)]
mod tests;
