//! Unique bind variable names for iterated template regions.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::types::Value;

static NEXT_LOOP_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one loop instance.
///
/// Every loop an evaluator enters gets a fresh id, so two loops whose elements
/// happen to be equal never share an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoopId(u64);

impl LoopId {
    /// Allocates a new, never before used loop id.
    #[must_use]
    pub fn next() -> Self {
        LoopId(NEXT_LOOP_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Iteration marker: one step of a loop, supplied by the template evaluator.
#[derive(Debug, Clone)]
pub struct IterationStatus {
    loop_id: LoopId,
    index: usize,
    size: Option<usize>,
    current: Value,
}

impl IterationStatus {
    /// Creates the marker for element `index` of the loop `loop_id`.
    #[must_use]
    pub fn new(loop_id: LoopId, index: usize, current: Value) -> Self {
        IterationStatus {
            loop_id,
            index,
            size: None,
            current,
        }
    }

    /// Records the total number of elements in the loop.
    #[must_use]
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    /// Creates the markers for iterating over `items` as one new loop.
    #[must_use]
    pub fn sequence(items: &[Value]) -> Vec<IterationStatus> {
        let loop_id = LoopId::next();
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                IterationStatus::new(loop_id, index, item.clone()).with_size(items.len())
            })
            .collect()
    }

    /// Returns the loop this step belongs to.
    #[must_use]
    pub fn loop_id(&self) -> LoopId {
        self.loop_id
    }

    /// Returns the zero-based position of this step within its loop.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the loop size, if known.
    #[must_use]
    pub fn size(&self) -> Option<usize> {
        self.size
    }

    /// Returns the current element.
    #[must_use]
    pub fn current(&self) -> &Value {
        &self.current
    }

    /// Returns true for the first step.
    #[must_use]
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    /// Returns true for the last step, if the size is known.
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.size.is_some_and(|size| self.index + 1 == size)
    }
}

/// Generates `{base}_{sequence}_{index}` names, memoized per base name.
///
/// For each base name the service keeps the loops it has seen, in first-seen
/// order. The sequence is append-only, so a loop keeps its position for the
/// lifetime of the service.
#[derive(Debug, Default)]
pub struct IterationNamingService {
    sequences: HashMap<String, Vec<LoopId>>,
}

impl IterationNamingService {
    /// Creates an empty naming service.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the unique variable name for `status` under `base_name`.
    pub fn unique_name(&mut self, base_name: &str, status: &IterationStatus) -> String {
        let sequence = self.sequences.entry(base_name.to_string()).or_default();
        let position = match sequence.iter().position(|id| *id == status.loop_id) {
            Some(position) => position,
            None => {
                sequence.push(status.loop_id);
                sequence.len() - 1
            }
        };
        let name = format!("{base_name}_{position}_{}", status.index);
        log::trace!("Iteration variable {name} for loop {:?}", status.loop_id);
        name
    }
}
