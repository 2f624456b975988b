//! Entity animation: tweens the included numeric fields of one record from a
//! start snapshot toward an end snapshot over a fixed duration.
//!
//! Each tick computes `elapsed = clamp((now - start) / time, 0, 1)`, applies
//! the easing curve and reports a fresh snapshot through `on_update`. The tick
//! where `elapsed` reaches exactly 1 also fires `on_finish` (once) and
//! deregisters the animation.
//!
//! Fields outside the include list are carried over from `from` untouched.
//! Included fields missing from `from` follow the [`MergeStrategy`]:
//! - `MergeWithFirstTick`: the field starts at its target value (zero delta).
//! - `MergeWithLastTick`: the field is left out until the finishing tick,
//!   where it is written as its target value.
//!
//! `time` must be strictly positive. Other durations are a caller error and
//! are only reported through the log.

use std::rc::Rc;

use log::{debug, warn};

use crate::clock::Clock;
use crate::context::AnimationContext;
use crate::easing::EasingFunction;
use crate::ids::CallbackId;
use crate::registry::TickStatus;
use crate::strategy::MergeStrategy;
use crate::value::State;

/// Everything needed to start one entity animation.
pub struct AnimationParams {
    pub from: State,
    pub to: State,
    /// Numeric fields to interpolate.
    pub include: Vec<String>,
    /// Duration, in the clock's unit.
    pub time: f64,
    /// Overrides the controller's easing when set.
    pub easing: Option<EasingFunction>,
    /// Overrides the controller's merge strategy when set.
    pub merge_strategy: Option<MergeStrategy>,
    pub on_update: Box<dyn FnMut(State)>,
    pub on_finish: Option<Box<dyn FnOnce()>>,
}

impl AnimationParams {
    pub fn new(from: State, to: State, time: f64, on_update: impl FnMut(State) + 'static) -> Self {
        Self {
            from,
            to,
            include: Vec::new(),
            time,
            easing: None,
            merge_strategy: None,
            on_update: Box::new(on_update),
            on_finish: None,
        }
    }

    pub fn include<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn easing(mut self, easing: impl Into<EasingFunction>) -> Self {
        self.easing = Some(easing.into());
        self
    }

    pub fn merge_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.merge_strategy = Some(strategy);
        self
    }

    pub fn on_finish(mut self, on_finish: impl FnOnce() + 'static) -> Self {
        self.on_finish = Some(Box::new(on_finish));
        self
    }
}

/// Resolved, immutable description of one entity transition.
///
/// Pure: sampling never mutates the tween, so every snapshot it hands out
/// is independent of later ticks.
#[derive(Clone, Debug)]
pub struct EntityTween {
    from: State,
    to: State,
    include: Vec<String>,
    duration: f64,
    easing: EasingFunction,
    merge_strategy: MergeStrategy,
}

impl EntityTween {
    pub fn new(
        from: State,
        to: State,
        include: Vec<String>,
        duration: f64,
        easing: EasingFunction,
        merge_strategy: MergeStrategy,
    ) -> Self {
        Self {
            from,
            to,
            include,
            duration,
            easing,
            merge_strategy,
        }
    }

    #[inline]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    #[inline]
    pub fn merge_strategy(&self) -> MergeStrategy {
        self.merge_strategy
    }

    /// Fraction of the duration covered after `elapsed_time`, clamped to `[0, 1]`.
    #[inline]
    pub fn progress(&self, elapsed_time: f64) -> f64 {
        // max/min rather than clamp: NaN from a zero duration maps to 0 instead of propagating.
        (elapsed_time / self.duration).max(0.0).min(1.0)
    }

    /// Snapshot at `progress` (already clamped to `[0, 1]`).
    pub fn sample(&self, progress: f64) -> State {
        let eased = self.easing.apply(progress);
        let finished = progress >= 1.0;
        let mut snapshot = self.from.clone();

        for key in &self.include {
            let Some(target) = self.to.number(key) else {
                continue;
            };
            let base = match (self.from.number(key), self.merge_strategy) {
                (Some(base), _) => base,
                (None, MergeStrategy::MergeWithFirstTick) => target,
                (None, MergeStrategy::MergeWithLastTick) if finished => target,
                (None, MergeStrategy::MergeWithLastTick) => continue,
            };
            // A curve at exactly 1 writes the target as-is so the end state is exact.
            let value = if eased == 1.0 {
                target
            } else {
                base + (target - base) * eased
            };
            snapshot.insert(key.as_str(), value);
        }

        snapshot
    }
}

/// Runtime half of an entity animation: the tween plus its callbacks.
struct EntityAnimation {
    tween: EntityTween,
    clock: Rc<dyn Clock>,
    start: f64,
    on_update: Box<dyn FnMut(State)>,
    on_finish: Option<Box<dyn FnOnce()>>,
    finished: bool,
}

impl EntityAnimation {
    fn update(&mut self) -> TickStatus {
        if self.finished {
            return TickStatus::Finished;
        }

        let progress = self.tween.progress(self.clock.now() - self.start);
        (self.on_update)(self.tween.sample(progress));

        if progress < 1.0 {
            return TickStatus::Continue;
        }

        self.finished = true;
        debug!("entity animation finished (time={})", self.tween.duration());
        if let Some(on_finish) = self.on_finish.take() {
            on_finish();
        }
        TickStatus::Finished
    }
}

/// Build an entity animation and register it with the context's registry.
///
/// The start timestamp is read now; the first report happens on the next tick.
pub fn create_animation(ctx: &AnimationContext, params: AnimationParams) -> CallbackId {
    let AnimationParams {
        from,
        to,
        include,
        time,
        easing,
        merge_strategy,
        on_update,
        on_finish,
    } = params;

    if !(time > 0.0 && time.is_finite()) {
        warn!("animation duration must be > 0, got {time}");
    }
    for key in &include {
        if to.number(key).is_none() {
            warn!("included field '{key}' has no numeric target; it will not be interpolated");
        }
    }

    let tween = EntityTween::new(
        from,
        to,
        include,
        time,
        easing.unwrap_or_else(|| ctx.easing.clone()),
        merge_strategy.unwrap_or(ctx.merge_strategy),
    );
    let clock = Rc::clone(&ctx.clock);
    let start = clock.now();

    let mut animation = EntityAnimation {
        tween,
        clock,
        start,
        on_update,
        on_finish,
        finished: false,
    };
    let id = ctx.registry.register(move || animation.update());
    debug!("entity animation {:?} registered (time={time}, start={start})", id);
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::easing::Easing;
    use crate::registry::Registry;
    use crate::state;
    use std::cell::{Cell, RefCell};

    fn tween(from: State, to: State, include: &[&str], strategy: MergeStrategy) -> EntityTween {
        EntityTween::new(
            from,
            to,
            include.iter().map(|k| k.to_string()).collect(),
            1000.0,
            Easing::Linear.into(),
            strategy,
        )
    }

    fn harness() -> (AnimationContext, ManualClock) {
        let clock = ManualClock::new(0.0);
        (AnimationContext::new(Registry::new(), clock.clone()), clock)
    }

    #[test]
    fn progress_is_clamped() {
        let t = tween(state! {}, state! {}, &[], MergeStrategy::MergeWithFirstTick);
        assert_eq!(t.progress(-50.0), 0.0);
        assert_eq!(t.progress(250.0), 0.25);
        assert_eq!(t.progress(5000.0), 1.0);
    }

    #[test]
    fn sample_interpolates_included_fields() {
        let t = tween(
            state! { "x" => 0, "y" => 50 },
            state! { "x" => 100, "y" => 100 },
            &["x", "y"],
            MergeStrategy::MergeWithFirstTick,
        );
        assert_eq!(t.sample(0.0), state! { "x" => 0, "y" => 50 });
        assert_eq!(t.sample(0.5), state! { "x" => 50, "y" => 75 });
        assert_eq!(t.sample(1.0), state! { "x" => 100, "y" => 100 });
    }

    #[test]
    fn sample_carries_excluded_fields_from_start() {
        let t = tween(
            state! { "x" => 0, "y" => 50 },
            state! { "x" => 100, "y" => 100 },
            &["x"],
            MergeStrategy::MergeWithFirstTick,
        );
        assert_eq!(t.sample(1.0), state! { "x" => 100, "y" => 50 });
    }

    #[test]
    fn first_tick_strategy_writes_target_immediately() {
        let t = tween(
            state! { "x" => 0 },
            state! { "x" => 100, "y" => 100 },
            &["x", "y"],
            MergeStrategy::MergeWithFirstTick,
        );
        assert_eq!(t.sample(0.0), state! { "x" => 0, "y" => 100 });
        assert_eq!(t.sample(0.5), state! { "x" => 50, "y" => 100 });
    }

    #[test]
    fn last_tick_strategy_waits_for_completion() {
        let t = tween(
            state! { "x" => 0 },
            state! { "x" => 100, "y" => 100 },
            &["x", "y"],
            MergeStrategy::MergeWithLastTick,
        );
        assert_eq!(t.sample(0.0), state! { "x" => 0 });
        assert_eq!(t.sample(0.5), state! { "x" => 50 });
        assert_eq!(t.sample(1.0), state! { "x" => 100, "y" => 100 });
    }

    #[test]
    fn non_numeric_targets_pass_through() {
        let t = tween(
            state! { "x" => 0, "label" => "a" },
            state! { "x" => 10, "label" => "b" },
            &["x", "label", "missing"],
            MergeStrategy::MergeWithFirstTick,
        );
        assert_eq!(t.sample(1.0), state! { "x" => 10, "label" => "a" });
    }

    #[test]
    fn non_numeric_start_is_treated_as_absent() {
        let t = tween(
            state! { "x" => "n/a" },
            state! { "x" => 10 },
            &["x"],
            MergeStrategy::MergeWithFirstTick,
        );
        assert_eq!(t.sample(0.0), state! { "x" => 10 });
    }

    #[test]
    fn easing_shapes_the_curve() {
        let t = EntityTween::new(
            state! { "x" => 0 },
            state! { "x" => 100 },
            vec!["x".into()],
            1000.0,
            Easing::QuadraticIn.into(),
            MergeStrategy::MergeWithFirstTick,
        );
        assert_eq!(t.sample(0.5), state! { "x" => 25 });
    }

    #[test]
    fn finishing_sample_follows_the_curve_value() {
        let t = EntityTween::new(
            state! { "x" => 0 },
            state! { "x" => 100 },
            vec!["x".into()],
            1000.0,
            crate::easing::EasingFunction::new(|t| t * 0.5),
            MergeStrategy::MergeWithFirstTick,
        );
        assert_eq!(t.sample(1.0), state! { "x" => 50 });
    }

    #[test]
    fn runtime_reports_every_tick_and_finishes_once() {
        let (ctx, clock) = harness();
        let updates = Rc::new(RefCell::new(Vec::new()));
        let finishes = Rc::new(Cell::new(0));

        let sink = Rc::clone(&updates);
        let done = Rc::clone(&finishes);
        let id = create_animation(
            &ctx,
            AnimationParams::new(state! { "x" => 0 }, state! { "x" => 100 }, 1000.0, move |s| {
                sink.borrow_mut().push(s.number("x").unwrap_or(f64::NAN))
            })
            .include(["x"])
            .on_finish(move || done.set(done.get() + 1)),
        );
        assert!(ctx.registry.is_registered(id));
        assert!(updates.borrow().is_empty());

        ctx.registry.tick();
        clock.set(500.0);
        ctx.registry.tick();
        clock.set(999.0);
        ctx.registry.tick();
        assert_eq!(finishes.get(), 0);

        clock.set(1000.0);
        ctx.registry.tick();
        assert_eq!(finishes.get(), 1);
        assert!(!ctx.registry.is_registered(id));

        clock.set(2000.0);
        ctx.registry.tick();
        let updates = updates.borrow();
        assert_eq!(updates.len(), 4);
        assert_eq!(updates[0], 0.0);
        assert_eq!(updates[1], 50.0);
        assert!((updates[2] - 99.9).abs() < 1e-9);
        assert_eq!(updates[3], 100.0);
        assert_eq!(finishes.get(), 1);
    }

    #[test]
    fn completion_follows_elapsed_time_not_the_eased_value() {
        let (ctx, clock) = harness();
        let finished = Rc::new(Cell::new(false));
        let flag = Rc::clone(&finished);
        let last = Rc::new(RefCell::new(State::new()));
        let sink = Rc::clone(&last);

        create_animation(
            &ctx,
            AnimationParams::new(state! { "x" => 0 }, state! { "x" => 100 }, 1000.0, move |s| {
                *sink.borrow_mut() = s
            })
            .include(["x"])
            .easing(crate::easing::EasingFunction::new(|_| 1.0))
            .on_finish(move || flag.set(true)),
        );

        ctx.registry.tick();
        assert_eq!(*last.borrow(), state! { "x" => 100 });
        assert!(!finished.get());

        clock.set(1000.0);
        ctx.registry.tick();
        assert!(finished.get());
    }

    #[test]
    fn start_time_is_taken_at_construction() {
        let (ctx, clock) = harness();
        clock.set(500.0);
        let last = Rc::new(Cell::new(f64::NAN));
        let sink = Rc::clone(&last);
        create_animation(
            &ctx,
            AnimationParams::new(state! { "x" => 0 }, state! { "x" => 100 }, 1000.0, move |s| {
                sink.set(s.number("x").unwrap_or(f64::NAN))
            })
            .include(["x"]),
        );
        clock.set(750.0);
        ctx.registry.tick();
        assert_eq!(last.get(), 25.0);
    }

    #[test]
    fn per_animation_options_override_context_defaults() {
        let (mut ctx, _clock) = harness();
        ctx.merge_strategy = MergeStrategy::MergeWithLastTick;
        let last = Rc::new(RefCell::new(State::new()));
        let sink = Rc::clone(&last);
        create_animation(
            &ctx,
            AnimationParams::new(state! {}, state! { "y" => 7 }, 1000.0, move |s| {
                *sink.borrow_mut() = s
            })
            .include(["y"])
            .merge_strategy(MergeStrategy::MergeWithFirstTick),
        );
        ctx.registry.tick();
        assert_eq!(*last.borrow(), state! { "y" => 7 });
    }
}
