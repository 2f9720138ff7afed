//! Host service bundle injected into the desktop runtime.
//!
//! The runtime never reaches for a content service, a clock, or an executor directly. The entry
//! layer assembles a [`DesktopHostContext`] and every side effect goes through it, which keeps the
//! reducer host-agnostic and lets tests drive time and streams by hand.

use std::rc::Rc;

use futures::task::LocalSpawn;
use platform_host::{Clock, ContentGenerator};

#[derive(Clone)]
/// Host service bundle for desktop runtime side effects.
pub struct DesktopHostContext {
    generator: Rc<dyn ContentGenerator>,
    clock: Rc<dyn Clock>,
    spawner: Rc<dyn LocalSpawn>,
}

impl DesktopHostContext {
    /// Builds a host bundle from its services.
    pub fn new(
        generator: Rc<dyn ContentGenerator>,
        clock: Rc<dyn Clock>,
        spawner: Rc<dyn LocalSpawn>,
    ) -> Self {
        Self {
            generator,
            clock,
            spawner,
        }
    }

    /// Returns the configured content generation service.
    pub fn content_generator(&self) -> Rc<dyn ContentGenerator> {
        self.generator.clone()
    }

    /// Returns the configured time source.
    pub fn clock(&self) -> Rc<dyn Clock> {
        self.clock.clone()
    }

    /// Returns the executor that drives content streams.
    pub fn spawner(&self) -> Rc<dyn LocalSpawn> {
        self.spawner.clone()
    }
}

impl std::fmt::Debug for DesktopHostContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DesktopHostContext").finish_non_exhaustive()
    }
}
