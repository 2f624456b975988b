//! Controller: a registry plus the defaults injected into every animation.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::animation::{create_animation, AnimationParams};
use crate::clock::{Clock, SystemClock};
use crate::collection::{create_collection_animation, CollectionParams};
use crate::context::AnimationContext;
use crate::easing::{Easing, EasingFunction};
use crate::ids::CallbackId;
use crate::registry::Registry;
use crate::strategy::MergeStrategy;

/// Serializable controller defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub easing: Easing,
    pub merge_strategy: MergeStrategy,
    pub array_merge_strategy: MergeStrategy,
}

/// Entry point for hosts: create animations, then call [`Controller::tick`]
/// once per frame (or whatever cadence the host uses).
#[derive(Debug)]
pub struct Controller {
    ctx: AnimationContext,
}

impl Controller {
    /// Controller using [`SystemClock`] (milliseconds).
    pub fn new(cfg: ControllerConfig) -> Self {
        let mut ctx = AnimationContext::new(Registry::new(), SystemClock::new());
        ctx.easing = cfg.easing.into();
        ctx.merge_strategy = cfg.merge_strategy;
        ctx.array_merge_strategy = cfg.array_merge_strategy;
        Self { ctx }
    }

    /// Replace the timestamp source. Affects animations created afterwards.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.ctx.clock = Rc::new(clock);
        self
    }

    /// Replace the default easing with an arbitrary curve.
    pub fn with_easing_fn(mut self, easing: EasingFunction) -> Self {
        self.ctx.easing = easing;
        self
    }

    /// Advance every active animation by one step.
    #[inline]
    pub fn tick(&self) {
        self.ctx.registry.tick();
    }

    pub fn animate(&self, params: AnimationParams) -> CallbackId {
        create_animation(&self.ctx, params)
    }

    pub fn animate_collection(&self, params: CollectionParams) -> CallbackId {
        create_collection_animation(&self.ctx, params)
    }

    #[inline]
    pub fn registry(&self) -> &Registry {
        &self.ctx.registry
    }

    #[inline]
    pub fn context(&self) -> &AnimationContext {
        &self.ctx
    }

    /// Number of registered update callbacks (children of a collection count
    /// individually).
    #[inline]
    pub fn active_count(&self) -> usize {
        self.ctx.registry.len()
    }

    #[inline]
    pub fn now(&self) -> f64 {
        self.ctx.now()
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(ControllerConfig::default())
    }
}
