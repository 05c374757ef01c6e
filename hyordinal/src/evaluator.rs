//! Deferred-continuation scheduler.
//!
//! Computations that would naturally recurse through large substructures are written as a set
//! of tagged continuation frames. The [`Evaluator`] keeps those frames on a LIFO work-list and
//! drains it iteratively: each popped frame is resumed with the value produced by the frame
//! popped before it, and either produces a value of its own or schedules more frames (usually
//! itself again, followed by the sub-computation whose result it is waiting for).
//!
//! ```
//! use hyordinal::evaluator::{Continuation, Evaluator};
//!
//! // Sum 1..=n without recursion: each frame adds its number to the value it is resumed with.
//! enum Sum {
//!     Upto(u64),
//!     Add(u64),
//! }
//!
//! impl Continuation for Sum {
//!     type Value = u64;
//!     type Error = ();
//!
//!     fn resume(self, input: Option<u64>, ev: &mut Evaluator<Self>) -> Result<Option<u64>, ()> {
//!         match self {
//!             Sum::Upto(0) => Ok(Some(0)),
//!             Sum::Upto(n) => {
//!                 ev.schedule(Sum::Add(n));
//!                 ev.schedule(Sum::Upto(n - 1));
//!                 Ok(None)
//!             }
//!             Sum::Add(n) => Ok(input.map(|acc| acc + n)),
//!         }
//!     }
//! }
//!
//! let mut ev = Evaluator::new();
//! ev.schedule(Sum::Upto(100_000));
//! assert_eq!(ev.run(), Ok(Some(5_000_050_000)));
//! ```
use log::trace;

/// One suspended step of a computation driven by an [`Evaluator`].
pub trait Continuation: Sized {
    type Value;
    type Error;

    /// Resume this frame with the value produced by the previously completed frame (`None`
    /// when the previous frame only scheduled work, or when nothing ran before).
    ///
    /// Return `Ok(Some(v))` to hand `v` to the next frame, or `Ok(None)` after scheduling
    /// further frames.
    fn resume(
        self,
        input: Option<Self::Value>,
        evaluator: &mut Evaluator<Self>,
    ) -> Result<Option<Self::Value>, Self::Error>;
}

/// LIFO work-list of continuation frames.
pub struct Evaluator<K: Continuation> {
    pending: Vec<K>,
    processed: usize,
}

impl<K: Continuation> Evaluator<K> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            processed: 0,
        }
    }

    /// Push a frame; the most recently scheduled frame runs first.
    #[inline]
    pub fn schedule(&mut self, frame: K) {
        self.pending.push(frame);
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of frames resumed so far.
    #[inline]
    pub fn processed(&self) -> usize {
        self.processed
    }

    /// Drain the work-list, returning the value produced by the last frame.
    ///
    /// The first error aborts the run; frames still pending are dropped.
    pub fn run(&mut self) -> Result<Option<K::Value>, K::Error> {
        let mut value = None;
        while let Some(frame) = self.pending.pop() {
            self.processed += 1;
            value = match frame.resume(value, self) {
                Ok(value) => value,
                Err(err) => {
                    self.pending.clear();
                    return Err(err);
                }
            };
        }
        trace!("evaluator drained after {} frames", self.processed);
        Ok(value)
    }
}

impl<K: Continuation> Default for Evaluator<K> {
    fn default() -> Self {
        Self::new()
    }
}
