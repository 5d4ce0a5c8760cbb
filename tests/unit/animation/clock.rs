use std::rc::Rc;

use super::*;

fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> TimerCallback) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    let make = move |label: &'static str| -> TimerCallback {
        let sink = Rc::clone(&sink);
        Box::new(move |_| sink.borrow_mut().push(label))
    };
    (log, make)
}

#[test]
fn nothing_fires_before_its_deadline() {
    let clock = VirtualClock::new();
    let (log, cb) = recorder();
    clock.schedule(Millis(100), cb("a"));

    assert_eq!(clock.advance_by(Millis(99)), 0);
    assert!(log.borrow().is_empty());
    assert_eq!(clock.now(), Millis(99));

    assert_eq!(clock.advance_by(Millis(1)), 1);
    assert_eq!(*log.borrow(), vec!["a"]);
    assert_eq!(clock.pending(), 0);
    assert_eq!(clock.fired(), 1);
}

#[test]
fn fires_in_deadline_then_schedule_order() {
    let clock = VirtualClock::new();
    let (log, cb) = recorder();
    clock.schedule(Millis(50), cb("late"));
    clock.schedule(Millis(10), cb("first"));
    clock.schedule(Millis(10), cb("second"));

    assert_eq!(clock.next_due(), Some(Millis(10)));
    clock.advance_to(Millis(100));
    assert_eq!(*log.borrow(), vec!["first", "second", "late"]);
}

#[test]
fn cancelled_callbacks_never_fire() {
    let clock = VirtualClock::new();
    let (log, cb) = recorder();
    let id = clock.schedule(Millis(10), cb("cancelled"));
    clock.schedule(Millis(20), cb("kept"));

    assert!(clock.cancel(id));
    assert!(!clock.cancel(id));
    assert_eq!(clock.pending(), 1);

    clock.advance_by(Millis(1_000));
    assert_eq!(*log.borrow(), vec!["kept"]);
    assert!(!clock.cancel(TimerId(999)));
}

#[test]
fn callbacks_scheduled_during_advance_fire_within_the_window() {
    let clock = Rc::new(VirtualClock::new());
    let hits = Rc::new(RefCell::new(Vec::new()));

    let inner_clock = Rc::clone(&clock);
    let inner_hits = Rc::clone(&hits);
    clock.schedule(
        Millis(10),
        Box::new(move |_| {
            inner_hits.borrow_mut().push(inner_clock.now());
            let hits = Rc::clone(&inner_hits);
            let clock = Rc::clone(&inner_clock);
            inner_clock.schedule(
                Millis(15),
                Box::new(move |_| hits.borrow_mut().push(clock.now())),
            );
        }),
    );

    assert_eq!(clock.advance_by(Millis(30)), 2);
    assert_eq!(*hits.borrow(), vec![Millis(10), Millis(25)]);
    assert_eq!(clock.now(), Millis(30));
}

#[test]
fn callback_receives_its_own_id() {
    let clock = VirtualClock::new();
    let seen = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&seen);
    let id = clock.schedule(Millis(0), Box::new(move |id| *sink.borrow_mut() = Some(id)));

    clock.advance_by(Millis::ZERO);
    assert_eq!(*seen.borrow(), Some(id));
}

#[test]
fn advance_to_never_moves_backwards() {
    let clock = VirtualClock::new();
    clock.advance_to(Millis(500));
    clock.advance_to(Millis(100));
    assert_eq!(clock.now(), Millis(500));
}

#[test]
fn pending_ids_are_listed_earliest_first() {
    let clock = VirtualClock::new();
    let late = clock.schedule(Millis(50), Box::new(|_| {}));
    let early = clock.schedule(Millis(5), Box::new(|_| {}));
    assert_eq!(clock.pending_ids(), vec![early, late]);

    clock.cancel(early);
    assert_eq!(clock.pending_ids(), vec![late]);
}
