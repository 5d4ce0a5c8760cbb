use std::{
    cell::RefCell,
    collections::{BTreeMap, HashMap},
};

use crate::foundation::core::Millis;

/// Identifier of one scheduled callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

/// One-shot callback; receives the id it was scheduled under.
pub type TimerCallback = Box<dyn FnOnce(TimerId)>;

/// Deferred one-shot callbacks on a single cooperative event queue.
///
/// Methods take `&self` so callbacks may schedule and cancel while the queue is running.
pub trait TimerQueue {
    /// Run `callback` once after `delay`.
    fn schedule(&self, delay: Millis, callback: TimerCallback) -> TimerId;

    /// Drop a pending callback. Returns `false` if it already fired or was cancelled.
    fn cancel(&self, id: TimerId) -> bool;
}

struct ClockState {
    now: Millis,
    next_id: u64,
    // Ids are handed out monotonically, so `(due, id)` orders equal deadlines by schedule order.
    queue: BTreeMap<(Millis, TimerId), TimerCallback>,
    due_of: HashMap<TimerId, Millis>,
    fired: u64,
}

/// Manually driven [`TimerQueue`] over virtual time.
///
/// Nothing fires until the owner advances the clock; `advance_by` runs every callback that
/// falls due inside the window, including ones scheduled by callbacks during the advance.
pub struct VirtualClock {
    state: RefCell<ClockState>,
}

impl Default for VirtualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for VirtualClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let st = self.state.borrow();
        f.debug_struct("VirtualClock")
            .field("now", &st.now)
            .field("pending", &st.queue.len())
            .field("fired", &st.fired)
            .finish()
    }
}

impl VirtualClock {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(ClockState {
                now: Millis::ZERO,
                next_id: 0,
                queue: BTreeMap::new(),
                due_of: HashMap::new(),
                fired: 0,
            }),
        }
    }

    pub fn now(&self) -> Millis {
        self.state.borrow().now
    }

    /// Callbacks waiting to fire.
    pub fn pending(&self) -> usize {
        self.state.borrow().queue.len()
    }

    /// Ids of the pending callbacks, earliest first.
    pub fn pending_ids(&self) -> Vec<TimerId> {
        self.state
            .borrow()
            .queue
            .keys()
            .map(|&(_, id)| id)
            .collect()
    }

    /// Callbacks fired since construction.
    pub fn fired(&self) -> u64 {
        self.state.borrow().fired
    }

    /// Deadline of the earliest pending callback.
    pub fn next_due(&self) -> Option<Millis> {
        self.state
            .borrow()
            .queue
            .keys()
            .next()
            .map(|&(due, _)| due)
    }

    /// Advance virtual time by `delta`. Returns the number of callbacks fired.
    pub fn advance_by(&self, delta: Millis) -> u64 {
        let target = self.now().saturating_add(delta);
        self.advance_to(target)
    }

    /// Advance virtual time to `target` (never backwards). Returns the number of callbacks fired.
    pub fn advance_to(&self, target: Millis) -> u64 {
        let mut fired = 0;
        loop {
            let (id, callback) = {
                let mut st = self.state.borrow_mut();
                let due_now = st
                    .queue
                    .first_key_value()
                    .is_some_and(|(&(due, _), _)| due <= target);
                let entry = if due_now { st.queue.pop_first() } else { None };
                let Some(((due, id), callback)) = entry else {
                    break;
                };
                st.due_of.remove(&id);
                st.now = st.now.max(due);
                st.fired += 1;
                (id, callback)
            };
            // The borrow is released here so the callback can reschedule.
            callback(id);
            fired += 1;
        }

        let mut st = self.state.borrow_mut();
        st.now = st.now.max(target);
        fired
    }
}

impl TimerQueue for VirtualClock {
    fn schedule(&self, delay: Millis, callback: TimerCallback) -> TimerId {
        let mut st = self.state.borrow_mut();
        let id = TimerId(st.next_id);
        st.next_id += 1;
        let due = st.now.saturating_add(delay);
        st.queue.insert((due, id), callback);
        st.due_of.insert(id, due);
        id
    }

    fn cancel(&self, id: TimerId) -> bool {
        let mut st = self.state.borrow_mut();
        match st.due_of.remove(&id) {
            Some(due) => st.queue.remove(&(due, id)).is_some(),
            None => false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/clock.rs"]
mod tests;
