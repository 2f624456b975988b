use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::Deserialize;
use tweener_core::{
    CollectionTransitionSpec, Controller, ManualClock, State, TransitionSpec, Value,
};

#[derive(Debug, Deserialize)]
struct Frame<T> {
    at: f64,
    #[serde(default)]
    expect: Option<T>,
}

#[derive(Debug, Deserialize)]
struct EntityScenario {
    #[serde(flatten)]
    spec: TransitionSpec,
    frames: Vec<Frame<State>>,
    finishes_at: f64,
}

#[derive(Debug, Deserialize)]
struct CollectionScenario {
    #[serde(flatten)]
    spec: CollectionTransitionSpec,
    frames: Vec<Frame<Vec<State>>>,
    finishes_at: f64,
}

fn assert_state_approx(actual: &State, expected: &State, ctx: &str) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "{ctx}: field count differs: actual={actual:?} expected={expected:?}"
    );
    for (key, want) in expected.iter() {
        let got = actual
            .get(key)
            .unwrap_or_else(|| panic!("{ctx}: missing field '{key}' in {actual:?}"));
        match (got, want) {
            (Value::Number(a), Value::Number(b)) => {
                assert!((a - b).abs() <= 1e-9, "{ctx}: {key}: left={a} right={b}")
            }
            _ => assert_eq!(got, want, "{ctx}: {key}"),
        }
    }
}

fn run_entity(name: &str) {
    let scenario: EntityScenario =
        tweener_test_fixtures::transitions::load(name).expect("load transition fixture");
    scenario.spec.validate().expect("fixture is valid");

    let clock = ManualClock::new(0.0);
    let ctl = Controller::default().with_clock(clock.clone());
    let last = Rc::new(RefCell::new(None::<State>));
    let finished = Rc::new(Cell::new(0u32));

    let sink = Rc::clone(&last);
    let done = Rc::clone(&finished);
    let mut params = scenario
        .spec
        .into_params(move |s| *sink.borrow_mut() = Some(s));
    params.on_finish = Some(Box::new(move || done.set(done.get() + 1)));
    ctl.animate(params);

    for frame in &scenario.frames {
        clock.set(frame.at);
        ctl.tick();
        let ctx = format!("{name}@{}", frame.at);
        if let Some(expected) = &frame.expect {
            let actual = last.borrow().clone().expect("update was reported");
            assert_state_approx(&actual, expected, &ctx);
        }
        let want = u32::from(frame.at >= scenario.finishes_at);
        assert_eq!(finished.get(), want, "{ctx}: finish count");
    }
    assert_eq!(ctl.active_count(), 0, "{name}: still registered");
}

fn run_collection(name: &str) {
    let scenario: CollectionScenario =
        tweener_test_fixtures::collections::load(name).expect("load collection fixture");
    scenario.spec.validate().expect("fixture is valid");

    let clock = ManualClock::new(0.0);
    let ctl = Controller::default().with_clock(clock.clone());
    let last = Rc::new(RefCell::new(None::<Vec<State>>));
    let finished = Rc::new(Cell::new(0u32));

    let sink = Rc::clone(&last);
    let done = Rc::clone(&finished);
    let mut params = scenario
        .spec
        .into_params(move |list| *sink.borrow_mut() = Some(list));
    params.on_finish = Some(Box::new(move || done.set(done.get() + 1)));
    ctl.animate_collection(params);

    for frame in &scenario.frames {
        clock.set(frame.at);
        ctl.tick();
        let ctx = format!("{name}@{}", frame.at);
        if let Some(expected) = &frame.expect {
            let actual = last.borrow().clone().expect("update was reported");
            assert_eq!(
                actual.len(),
                expected.len(),
                "{ctx}: entity count: {actual:?}"
            );
            for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
                assert_state_approx(a, e, &format!("{ctx}[{i}]"));
            }
        }
        let want = u32::from(frame.at >= scenario.finishes_at);
        assert_eq!(finished.get(), want, "{ctx}: finish count");
    }
    assert_eq!(ctl.active_count(), 0, "{name}: still registered");
}

#[test]
fn all_transition_fixtures() {
    let names = tweener_test_fixtures::transitions::keys();
    assert!(!names.is_empty());
    for name in names {
        run_entity(&name);
    }
}

#[test]
fn all_collection_fixtures() {
    let names = tweener_test_fixtures::collections::keys();
    assert!(!names.is_empty());
    for name in names {
        run_collection(&name);
    }
}

#[test]
fn transition_fixture_json_round_trips_through_the_spec_type() {
    let json = tweener_test_fixtures::transitions::json("merge-last-tick").unwrap();
    let spec = TransitionSpec::from_json_str(&json).expect("extra fields are ignored");
    assert_eq!(spec.include, vec!["x".to_string(), "y".to_string()]);
    let again: TransitionSpec =
        serde_json::from_value(serde_json::to_value(&spec).unwrap()).unwrap();
    assert_eq!(again, spec);
}
