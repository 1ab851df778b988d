use std::sync::atomic::{AtomicUsize, Ordering};

use log::debug;

use crate::{Backend, RotationRegistry, SelectError};

/// Round-robin over an ordered registry, skipping backends that report dead.
///
/// Every candidate examined advances the cursor by one, dead ones included. A call
/// examines at most `len` candidates, so a fully dead registry fails instead of spinning.
pub struct RoundRobin<B> {
    registry: RotationRegistry<B>,
    cursor: AtomicUsize,
}

impl<B: Backend> RoundRobin<B> {
    pub fn new(registry: RotationRegistry<B>) -> Self {
        Self {
            registry,
            cursor: AtomicUsize::new(0),
        }
    }

    pub fn select(&self) -> Result<&B, SelectError> {
        let backends = self.registry.all();
        let len = backends.len();
        let mut current = self.cursor.load(Ordering::Acquire);

        loop {
            // Scan from a snapshot, then claim [current, current + advance) in one CAS so
            // concurrent callers never share a cursor value.
            let found = (0..len).find_map(|offset| {
                let idx = current.wrapping_add(offset) % len;
                let backend = &backends[idx];
                if backend.is_alive() {
                    Some((offset, backend))
                } else {
                    debug!("Skipping dead backend {}", backend.address());
                    None
                }
            });
            let advance = found.map_or(len, |(offset, _)| offset + 1);

            match self.cursor.compare_exchange_weak(
                current,
                current.wrapping_add(advance),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    return found
                        .map(|(_, backend)| backend)
                        .ok_or(SelectError::AllBackendsUnavailable);
                }
                Err(actual) => current = actual,
            }
        }
    }

    /// Number of candidates examined so far.
    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::Acquire)
    }

    pub fn registry(&self) -> &RotationRegistry<B> {
        &self.registry
    }
}
