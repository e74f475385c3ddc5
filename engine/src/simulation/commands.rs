//! Spawn command queue
//!
//! User actions may arrive from any thread (an input callback, a stdin
//! reader). They are pushed here and drained by the frame loop before the
//! next step, which serializes them onto the simulation thread.

use super::spawn::BodyKind;
use std::sync::{Arc, PoisonError, RwLock};

/// User request to spawn bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnCommand {
    /// Kind of body to create
    pub kind: BodyKind,
    /// Number of bodies; `None` uses the configured batch size
    pub count: Option<usize>,
}

impl SpawnCommand {
    /// One configured batch of boxes
    pub fn boxes() -> Self {
        Self {
            kind: BodyKind::Box,
            count: None,
        }
    }

    /// One configured batch of spheres
    pub fn spheres() -> Self {
        Self {
            kind: BodyKind::Sphere,
            count: None,
        }
    }

    /// An explicit number of bodies
    pub fn exact(kind: BodyKind, count: usize) -> Self {
        Self {
            kind,
            count: Some(count),
        }
    }
}

/// Thread-safe spawn command queue. Clones share the same queue.
#[derive(Debug, Clone, Default)]
pub struct SpawnCommandQueue {
    inner: Arc<RwLock<Vec<SpawnCommand>>>,
}

impl SpawnCommandQueue {
    /// Create a new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a command
    pub fn push(&self, command: SpawnCommand) {
        // A panicked producer cannot leave a Vec half-written, so a poisoned
        // lock is still safe to use
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(command);
    }

    /// Take every pending command in submission order
    pub fn drain(&self) -> Vec<SpawnCommand> {
        std::mem::take(&mut *self.inner.write().unwrap_or_else(PoisonError::into_inner))
    }

    /// Number of pending commands
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no commands are pending
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_drain_preserves_order() {
        let queue = SpawnCommandQueue::new();
        queue.push(SpawnCommand::boxes());
        queue.push(SpawnCommand::exact(BodyKind::Sphere, 3));

        assert_eq!(queue.len(), 2);
        assert_eq!(
            queue.drain(),
            vec![
                SpawnCommand::boxes(),
                SpawnCommand::exact(BodyKind::Sphere, 3)
            ]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_push_from_other_thread() {
        let queue = SpawnCommandQueue::new();
        let producer = queue.clone();
        thread::spawn(move || {
            for _ in 0..4 {
                producer.push(SpawnCommand::spheres());
            }
        })
        .join()
        .unwrap();

        assert_eq!(queue.drain().len(), 4);
    }
}
