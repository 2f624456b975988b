//! Collection animation: reconciles two ordered collections of keyed entities.
//!
//! Entities are matched by key. Every matched pair gets its own entity
//! animation; `to` entities without a counterpart in `from` are inserted
//! according to the array-level [`MergeStrategy`]. The aggregated output keeps
//! insertion order: `from` entities first, in `from` order (matched ones are
//! updated in place), then inserted entities in `to` order.
//!
//! `from` entities whose key never appears in `to` are neither animated nor
//! removed; they stay in the output verbatim.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use hashbrown::HashMap;
use log::{debug, trace, warn};

use crate::animation::{create_animation, AnimationParams};
use crate::context::AnimationContext;
use crate::easing::EasingFunction;
use crate::ids::CallbackId;
use crate::registry::TickStatus;
use crate::strategy::MergeStrategy;
use crate::value::{Key, State};

/// Maps an entity to its identity within a collection.
#[derive(Clone)]
pub struct KeyExtractor(Rc<dyn Fn(&State) -> Key>);

impl KeyExtractor {
    pub fn new(f: impl Fn(&State) -> Key + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Key by the value of one field. Entities without a usable value for
    /// that field all share the empty text key.
    pub fn field(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(move |entity| {
            entity
                .get(&name)
                .and_then(Key::from_value)
                .unwrap_or_else(|| Key::Text(String::new()))
        })
    }

    #[inline]
    pub fn key(&self, entity: &State) -> Key {
        (self.0)(entity)
    }
}

impl fmt::Debug for KeyExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyExtractor(..)")
    }
}

/// Everything needed to start one collection animation.
pub struct CollectionParams {
    pub from: Vec<State>,
    pub to: Vec<State>,
    pub include: Vec<String>,
    pub time: f64,
    pub key_extractor: KeyExtractor,
    pub easing: Option<EasingFunction>,
    /// Per-pair policy for fields missing from a `from` entity.
    pub merge_strategy: Option<MergeStrategy>,
    /// Policy for `to` entities missing from `from`.
    pub array_merge_strategy: Option<MergeStrategy>,
    pub on_update: Box<dyn FnMut(Vec<State>)>,
    pub on_finish: Option<Box<dyn FnOnce()>>,
}

impl CollectionParams {
    pub fn new(
        from: Vec<State>,
        to: Vec<State>,
        time: f64,
        key_extractor: KeyExtractor,
        on_update: impl FnMut(Vec<State>) + 'static,
    ) -> Self {
        Self {
            from,
            to,
            include: Vec::new(),
            time,
            key_extractor,
            easing: None,
            merge_strategy: None,
            array_merge_strategy: None,
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

    pub fn array_merge_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.array_merge_strategy = Some(strategy);
        self
    }

    pub fn on_finish(mut self, on_finish: impl FnOnce() + 'static) -> Self {
        self.on_finish = Some(Box::new(on_finish));
        self
    }
}

/// Insertion-ordered map from key to entity.
///
/// Writing an existing key replaces its value in place; new keys are appended.
#[derive(Clone, Debug, Default)]
pub struct OrderedSlots {
    index: HashMap<Key, usize>,
    slots: Vec<(Key, State)>,
}

impl OrderedSlots {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            index: HashMap::with_capacity(capacity),
            slots: Vec::with_capacity(capacity),
        }
    }

    pub fn set(&mut self, key: Key, entity: State) {
        match self.index.get(&key) {
            Some(&slot) => self.slots[slot].1 = entity,
            None => {
                self.index.insert(key.clone(), self.slots.len());
                self.slots.push((key, entity));
            }
        }
    }

    pub fn get(&self, key: &Key) -> Option<&State> {
        self.index.get(key).map(|&slot| &self.slots[slot].1)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.slots.iter().map(|(key, _)| key)
    }

    /// Clone of every entity, in slot order.
    pub fn values(&self) -> Vec<State> {
        self.slots.iter().map(|(_, entity)| entity.clone()).collect()
    }
}

/// Mutable bookkeeping shared between the aggregation callback and the
/// child animations' callbacks.
#[derive(Debug, Default)]
struct CollectionState {
    output: OrderedSlots,
    registered: usize,
    finished: usize,
    initial_insertion_done: bool,
}

impl CollectionState {
    #[inline]
    fn is_complete(&self) -> bool {
        self.finished == self.registered
    }

    fn insert_unmatched(&mut self, unmatched: &[(Key, State)]) {
        for (key, entity) in unmatched {
            self.output.set(key.clone(), entity.clone());
        }
    }
}

/// The aggregation half of a collection animation. Registered after all of
/// its children, so each tick it sees that tick's child updates.
struct CollectionAnimation {
    state: Rc<RefCell<CollectionState>>,
    unmatched: Vec<(Key, State)>,
    array_merge_strategy: MergeStrategy,
    time: f64,
    on_update: Box<dyn FnMut(Vec<State>)>,
    on_finish: Option<Box<dyn FnOnce()>>,
    done: bool,
}

impl CollectionAnimation {
    fn update(&mut self) -> TickStatus {
        if self.done {
            return TickStatus::Finished;
        }

        let (entities, complete) = {
            let mut state = self.state.borrow_mut();

            if !state.initial_insertion_done {
                if self.array_merge_strategy == MergeStrategy::MergeWithFirstTick {
                    state.insert_unmatched(&self.unmatched);
                }
                state.initial_insertion_done = true;
            }

            let complete = state.is_complete();
            if complete && self.array_merge_strategy == MergeStrategy::MergeWithLastTick {
                state.insert_unmatched(&self.unmatched);
            }
            trace!(
                "collection tick: {}/{} pairs finished, {} entities",
                state.finished,
                state.registered,
                state.output.len()
            );
            (state.output.values(), complete)
        };

        let count = entities.len();
        (self.on_update)(entities);

        if !complete {
            return TickStatus::Continue;
        }

        self.done = true;
        debug!(
            "collection animation finished (time={}, {} entities)",
            self.time, count
        );
        if let Some(on_finish) = self.on_finish.take() {
            on_finish();
        }
        TickStatus::Finished
    }
}

/// Build a collection animation.
///
/// Children are registered with the context's registry first, one per matched
/// pair, in `to` order; the aggregation callback is registered last and its id
/// is returned.
pub fn create_collection_animation(ctx: &AnimationContext, params: CollectionParams) -> CallbackId {
    let CollectionParams {
        from,
        to,
        include,
        time,
        key_extractor,
        easing,
        merge_strategy,
        array_merge_strategy,
        on_update,
        on_finish,
    } = params;

    if !(time > 0.0 && time.is_finite()) {
        warn!("collection animation duration must be > 0, got {time}");
    }

    let easing = easing.unwrap_or_else(|| ctx.easing.clone());
    let merge_strategy = merge_strategy.unwrap_or(ctx.merge_strategy);
    let array_merge_strategy = array_merge_strategy.unwrap_or(ctx.array_merge_strategy);

    // Later duplicates overwrite earlier ones in the index; in the output they
    // keep the first position with the later value.
    let mut from_by_key: HashMap<Key, State> = HashMap::with_capacity(from.len());
    let mut output = OrderedSlots::with_capacity(from.len() + to.len());
    for entity in from {
        let key = key_extractor.key(&entity);
        output.set(key.clone(), entity.clone());
        from_by_key.insert(key, entity);
    }

    let mut matched: Vec<(Key, State, State)> = Vec::new();
    let mut unmatched: Vec<(Key, State)> = Vec::new();
    for entity in to {
        let key = key_extractor.key(&entity);
        match from_by_key.get(&key) {
            Some(start) => matched.push((key, start.clone(), entity)),
            None => unmatched.push((key, entity)),
        }
    }

    debug!(
        "collection animation: {} from, {} matched, {} unmatched (array strategy {:?})",
        from_by_key.len(),
        matched.len(),
        unmatched.len(),
        array_merge_strategy
    );

    let state = Rc::new(RefCell::new(CollectionState {
        output,
        ..CollectionState::default()
    }));

    for (key, start, target) in matched {
        let slot_state = Rc::clone(&state);
        let finish_state = Rc::clone(&state);
        let params = AnimationParams::new(start, target, time, move |snapshot| {
            slot_state.borrow_mut().output.set(key.clone(), snapshot);
        })
        .include(include.iter().cloned())
        .easing(easing.clone())
        .merge_strategy(merge_strategy)
        .on_finish(move || finish_state.borrow_mut().finished += 1);

        create_animation(ctx, params);
        state.borrow_mut().registered += 1;
    }

    let mut animation = CollectionAnimation {
        state,
        unmatched,
        array_merge_strategy,
        time,
        on_update,
        on_finish,
        done: false,
    };
    ctx.registry.register(move || animation.update())
}
