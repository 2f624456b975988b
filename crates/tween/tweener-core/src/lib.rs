//! Tweener Core (host-agnostic)
//!
//! Time-driven tweening of numeric record fields, plus reconciliation of two
//! keyed, ordered collections where matched entities are tweened one by one
//! and unmatched ones are inserted under a merge policy.
//!
//! Nothing here owns a timer: the host creates animations through a
//! [`Controller`] and calls [`Controller::tick`] at its own cadence. All work
//! happens synchronously inside `tick`, on one thread.

pub mod animation;
pub mod clock;
pub mod collection;
pub mod context;
pub mod controller;
pub mod easing;
pub mod error;
pub mod ids;
pub mod registry;
pub mod strategy;
pub mod transition;
pub mod value;

// Re-exports for hosts
pub use animation::{create_animation, AnimationParams, EntityTween};
pub use clock::{Clock, ManualClock, SystemClock};
pub use collection::{create_collection_animation, CollectionParams, KeyExtractor, OrderedSlots};
pub use context::AnimationContext;
pub use controller::{Controller, ControllerConfig};
pub use easing::{Easing, EasingFunction};
pub use error::TweenError;
pub use ids::CallbackId;
pub use registry::{Registry, TickStatus, UpdateCallback};
pub use strategy::MergeStrategy;
pub use transition::{CollectionTransitionSpec, TransitionSpec};
pub use value::{Key, State, Value};

pub type Result<T> = core::result::Result<T, TweenError>;
