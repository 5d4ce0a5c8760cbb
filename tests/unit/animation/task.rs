use std::cell::Cell;

use super::*;
use crate::animation::clock::VirtualClock;

fn setup() -> (Rc<VirtualClock>, Rc<TaskScope>) {
    let clock = Rc::new(VirtualClock::new());
    let queue: Rc<dyn TimerQueue> = clock.clone();
    (clock, TaskScope::new(queue))
}

fn repeat_every(scope: &Rc<TaskScope>, period: Millis, hits: Rc<Cell<u32>>) {
    scope.schedule(period, move |scope| {
        hits.set(hits.get() + 1);
        repeat_every(scope, period, hits);
    });
}

#[test]
fn self_rescheduling_task_keeps_exactly_one_timer_pending() {
    let (clock, scope) = setup();
    let hits = Rc::new(Cell::new(0));
    repeat_every(&scope, Millis(100), Rc::clone(&hits));

    clock.advance_by(Millis(1_050));
    assert_eq!(hits.get(), 10);
    assert_eq!(scope.pending(), 1);
    assert_eq!(clock.pending(), 1);
}

#[test]
fn cancel_removes_pending_timers_from_the_queue() {
    let (clock, scope) = setup();
    let hits = Rc::new(Cell::new(0));
    repeat_every(&scope, Millis(100), Rc::clone(&hits));
    repeat_every(&scope, Millis(70), Rc::clone(&hits));

    assert_eq!(scope.cancel(), 2);
    assert!(scope.is_cancelled());
    assert_eq!(clock.pending(), 0);

    clock.advance_by(Millis(10_000));
    assert_eq!(hits.get(), 0);
    assert_eq!(clock.fired(), 0);
}

#[test]
fn cancelled_scope_refuses_new_timers() {
    let (clock, scope) = setup();
    scope.cancel();
    assert!(scope.schedule(Millis(1), |_| {}).is_none());
    assert_eq!(clock.pending(), 0);
}

#[test]
fn dropping_the_handle_cancels_everything() {
    let (clock, scope) = setup();
    let hits = Rc::new(Cell::new(0));
    repeat_every(&scope, Millis(10), Rc::clone(&hits));
    let handle = AnimationHandle::new(scope);
    clock.advance_by(Millis(25));
    assert_eq!(hits.get(), 2);
    assert_eq!(handle.pending(), 1);

    drop(handle);
    assert_eq!(clock.pending(), 0);
    clock.advance_by(Millis(1_000));
    assert_eq!(hits.get(), 2);
}

#[test]
fn explicit_cancel_is_idempotent() {
    let (clock, scope) = setup();
    scope.schedule(Millis(5), |_| {});
    let handle = AnimationHandle::new(scope);
    handle.cancel();
    handle.cancel();
    assert!(handle.is_cancelled());
    assert_eq!(handle.pending(), 0);
    assert_eq!(clock.pending(), 0);
}
