use tracing::debug;

use crate::error::{Result, TopologyError};
use crate::topology::{Primitive, SegmentData, SegmentId};

use super::AppendSegment;

/// Turns the fill of a primitive on or off.
pub struct SetFill {
    filled: bool,
    force: bool,
}

impl SetFill {
    /// Creates a new `SetFill` operation.
    #[must_use]
    pub fn new(filled: bool) -> Self {
        Self {
            filled,
            force: false,
        }
    }

    /// Closes an open chain with a straight segment before filling it.
    #[must_use]
    pub fn forced(mut self) -> Self {
        self.force = true;
        self
    }

    /// Executes the operation, returning the closing segment if one was appended.
    ///
    /// Clearing the fill always succeeds. Filling needs a closed chain; a forced fill
    /// of an open chain first appends a straight segment from the tail's end back to
    /// the head's start.
    ///
    /// # Errors
    ///
    /// Returns an error if filling is requested on an empty chain, or on an open chain
    /// without forcing. The fill flag is left unchanged in both cases.
    pub fn execute(&self, primitive: &mut Primitive) -> Result<Option<SegmentId>> {
        if !self.filled {
            primitive.set_filled(false);
            debug!("fill cleared");
            return Ok(None);
        }

        let (Some(head), Some(tail)) = (primitive.head(), primitive.tail()) else {
            return Err(TopologyError::EmptyChain.into());
        };

        let mut closing = None;
        if !primitive.is_closed() {
            if !self.force {
                return Err(TopologyError::NotClosed.into());
            }
            let from = *primitive.segment(tail)?.end();
            let to = *primitive.segment(head)?.start();
            closing = Some(AppendSegment::new(SegmentData::line(from, to)).execute(primitive)?);
        }

        primitive.set_filled(true);
        debug!(closed_by_force = closing.is_some(), "fill set");
        Ok(closing)
    }
}
