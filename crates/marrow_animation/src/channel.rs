use std::fmt;

use crate::error::ChannelError;
use crate::values::Interpolatable;

/// Which transform component a channel drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Translation,
    Rotation,
    Scale,
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Translation => "translation",
            Self::Rotation => "rotation",
            Self::Scale => "scale",
        })
    }
}

/// A single time-stamped sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe<T> {
    /// In clip ticks.
    pub timestamp: f32,
    pub value: T,
}

impl<T> Keyframe<T> {
    #[inline]
    #[must_use]
    pub const fn new(timestamp: f32, value: T) -> Self {
        Self { timestamp, value }
    }
}

/// A non-empty, strictly time-ordered keyframe sequence.
#[derive(Debug, Clone)]
pub struct KeyframeChannel<T: Interpolatable> {
    keyframes: Vec<Keyframe<T>>,
}

impl<T: Interpolatable> KeyframeChannel<T> {
    /// Validates and canonicalizes a keyframe sequence.
    pub fn new(mut keyframes: Vec<Keyframe<T>>) -> Result<Self, ChannelError> {
        if keyframes.is_empty() {
            return Err(ChannelError::Empty);
        }

        let mut previous = f32::NEG_INFINITY;
        for (index, key) in keyframes.iter_mut().enumerate() {
            if !key.timestamp.is_finite() {
                return Err(ChannelError::InvalidValue { index });
            }
            if key.timestamp <= previous {
                return Err(ChannelError::NonMonotonic { index });
            }
            key.value = key
                .value
                .canonicalize()
                .ok_or(ChannelError::InvalidValue { index })?;
            previous = key.timestamp;
        }

        Ok(Self { keyframes })
    }

    #[inline]
    #[must_use]
    pub fn keyframes(&self) -> &[Keyframe<T>] {
        &self.keyframes
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    /// Always `false`; channels are validated non-empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.keyframes.len() == 1
    }

    #[inline]
    #[must_use]
    pub fn last_timestamp(&self) -> f32 {
        self.keyframes.last().map_or(0.0, |k| k.timestamp)
    }

    /// Index `i` of the segment `[keyframes[i], keyframes[i + 1])` containing `time`.
    ///
    /// Linear scan from the start; per-clip keyframe counts are small. Returns `None`
    /// when `time` is at or past the last keyframe.
    #[must_use]
    pub fn segment_index(&self, time: f32) -> Option<usize> {
        self.keyframes
            .windows(2)
            .position(|pair| time < pair[1].timestamp)
    }

    /// Samples the channel at `time`.
    ///
    /// A single-keyframe channel returns its value for any time. Otherwise `time` must
    /// lie before the last keyframe: the animator wraps clip time into
    /// `[0, duration)` and the clip loader pads channels to the duration. Sampling
    /// past the end panics in debug builds and holds the last value in release.
    #[must_use]
    pub fn sample(&self, time: f32) -> T {
        let keys = &self.keyframes;
        if keys.len() == 1 {
            return keys[0].value;
        }

        let index = match self.segment_index(time) {
            Some(index) => index,
            None => {
                if cfg!(debug_assertions) {
                    panic!(
                        "sample time {time} is past the last keyframe at {}",
                        self.last_timestamp()
                    );
                }
                keys.len() - 2
            }
        };

        let k0 = &keys[index];
        let k1 = &keys[index + 1];
        // Times before the first keyframe hold the first value.
        let t = ((time - k0.timestamp) / (k1.timestamp - k0.timestamp)).clamp(0.0, 1.0);

        T::interpolate_linear(k0.value, k1.value, t)
    }

    /// Appends a hold keyframe at `end` when the channel stops short of it, so every
    /// time in `[0, end)` has a segment. Static channels are left alone.
    /// Returns whether a keyframe was added.
    pub(crate) fn extend_to(&mut self, end: f32) -> bool {
        if self.is_static() {
            return false;
        }
        match self.keyframes.last() {
            Some(last) if last.timestamp < end => {
                let hold = Keyframe::new(end, last.value);
                self.keyframes.push(hold);
                true
            }
            _ => false,
        }
    }
}
