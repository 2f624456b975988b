//! What a controller injects into every animation it builds.

use std::fmt;
use std::rc::Rc;

use crate::clock::Clock;
use crate::easing::EasingFunction;
use crate::registry::Registry;
use crate::strategy::MergeStrategy;

/// Shared defaults plus the registry animations register into.
///
/// Per-animation options left unset fall back to these values; they are
/// resolved once, when the animation is constructed.
#[derive(Clone)]
pub struct AnimationContext {
    pub clock: Rc<dyn Clock>,
    pub easing: EasingFunction,
    pub merge_strategy: MergeStrategy,
    pub array_merge_strategy: MergeStrategy,
    pub registry: Registry,
}

impl AnimationContext {
    /// Context with default easing and strategies.
    pub fn new(registry: Registry, clock: impl Clock + 'static) -> Self {
        Self {
            clock: Rc::new(clock),
            easing: EasingFunction::default(),
            merge_strategy: MergeStrategy::default(),
            array_merge_strategy: MergeStrategy::default(),
            registry,
        }
    }

    #[inline]
    pub fn now(&self) -> f64 {
        self.clock.now()
    }
}

impl fmt::Debug for AnimationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationContext")
            .field("merge_strategy", &self.merge_strategy)
            .field("array_merge_strategy", &self.array_merge_strategy)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
