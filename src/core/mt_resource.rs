use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::warn;

/// A thread-safe, reference-counted resource container with read-write locking.
///
/// `MtResource` provides synchronized access to a value of type `T` that can be shared
/// across threads. It uses an `Arc<RwLock<T>>` internally to manage concurrent access.
///
/// The voxel world is only ever mutated from inside a tick. When an engine is
/// shared between threads, wrap it in an `MtResource` and run each whole tick
/// inside `exclusive` so streaming, edits and queries never interleave.
///
/// A lock poisoned by a panicking holder is recovered with a warning instead
/// of panicking again.
///
/// # Type Parameters
/// - `T`: The type of the contained resource, must be `Send + Sync`
///
/// # Examples
///
/// ## Basic Usage
/// ```
/// use voxel_world::core::MtResource;
///
/// let counter = MtResource::new(0);
/// *counter.get_mut() += 1;
/// assert_eq!(*counter.get(), 1);
/// ```
///
/// ## Serializing ticks between threads
/// ```
/// # use std::thread;
/// use voxel_world::core::MtResource;
///
/// let ticks = MtResource::new(Vec::new());
/// let ticks_clone = ticks.clone();
///
/// let handle = thread::spawn(move || {
///     ticks_clone.exclusive(|log| log.push("worker"));
/// });
/// ticks.exclusive(|log| log.push("main"));
///
/// handle.join().unwrap();
/// assert_eq!(ticks.get().len(), 2);
/// ```
pub struct MtResource<T: Send + Sync> {
    resource: Arc<RwLock<T>>,
}

impl<T: Send + Sync + 'static> MtResource<T> {
    /// Creates a new `MtResource` containing the given value.
    ///
    /// # Arguments
    /// * `resource` - The value to be stored in the resource
    ///
    /// # Returns
    /// A new `MtResource` containing the provided value
    pub fn new(resource: T) -> Self {
        Self {
            resource: Arc::new(RwLock::new(resource)),
        }
    }

    /// Returns a read-only guard that allows reading the contained value.
    ///
    /// # Returns
    /// A guard that provides read access to the contained value
    pub fn get(&self) -> RwLockReadGuard<'_, T> {
        self.resource.read().unwrap_or_else(|poisoned| {
            warn!("recovering poisoned resource lock for reading");
            PoisonError::into_inner(poisoned)
        })
    }

    /// Returns a mutable guard that allows modifying the contained value.
    ///
    /// # Returns
    /// A guard that provides mutable access to the contained value
    pub fn get_mut(&self) -> RwLockWriteGuard<'_, T> {
        self.resource.write().unwrap_or_else(|poisoned| {
            warn!("recovering poisoned resource lock for writing");
            PoisonError::into_inner(poisoned)
        })
    }

    /// Runs `section` with exclusive access to the value.
    ///
    /// No other reader or writer observes the value until `section` returns.
    ///
    /// # Returns
    /// Whatever `section` returns
    pub fn exclusive<R>(&self, section: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.get_mut();
        section(&mut guard)
    }
}

impl<T: Send + Sync> Clone for MtResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn exclusive_sections_do_not_interleave() {
        let value = MtResource::new((0u32, 0u32));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let value = value.clone();
                thread::spawn(move || {
                    for _ in 0..1000 {
                        value.exclusive(|(a, b)| {
                            *a += 1;
                            thread::yield_now();
                            *b += 1;
                            assert_eq!(a, b);
                        });
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(*value.get(), (4000, 4000));
    }

    #[test]
    fn engine_ticks_from_two_threads_are_serialized() {
        use crate::config::EngineConfig;
        use crate::engine_state::rendering::NullObserver;
        use crate::engine_state::{EngineState, FrameInput};
        use web_time::Duration;

        let engine = MtResource::new(EngineState::new(EngineConfig::default()));
        let handles: Vec<_> = (0..2)
            .map(|_| {
                let engine = engine.clone();
                thread::spawn(move || {
                    for _ in 0..30 {
                        engine.exclusive(|engine| {
                            let before = engine.ticks();
                            engine.tick(
                                &FrameInput::default(),
                                Duration::from_millis(16),
                                &mut NullObserver,
                            );
                            assert_eq!(engine.ticks(), before + 1);
                        });
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let engine = engine.get();
        assert_eq!(engine.ticks(), 60);
        assert_eq!(engine.world().store().len(), 25);
        assert!(engine.player().grounded);
    }

    #[test]
    fn poisoned_lock_is_recovered() {
        let value = MtResource::new(1);
        let clone = value.clone();
        let result = thread::spawn(move || {
            clone.exclusive(|_| panic!("tick failed"));
        })
        .join();
        assert!(result.is_err());

        *value.get_mut() += 1;
        assert_eq!(*value.get(), 2);
    }
}
