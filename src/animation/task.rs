use std::{
    cell::RefCell,
    collections::BTreeSet,
    rc::{Rc, Weak},
};

use crate::{
    animation::clock::{TimerId, TimerQueue},
    foundation::core::Millis,
};

#[derive(Default)]
struct ScopeState {
    pending: BTreeSet<TimerId>,
    cancelled: bool,
}

/// A group of timers that is cancelled as a unit.
///
/// Every id the scope schedules stays in its pending set until it fires, so cancelling the
/// scope cancels each outstanding timer on the queue instead of leaving it to no-op.
pub struct TaskScope {
    queue: Rc<dyn TimerQueue>,
    state: RefCell<ScopeState>,
}

impl std::fmt::Debug for TaskScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let st = self.state.borrow();
        f.debug_struct("TaskScope")
            .field("pending", &st.pending.len())
            .field("cancelled", &st.cancelled)
            .finish()
    }
}

impl TaskScope {
    pub fn new(queue: Rc<dyn TimerQueue>) -> Rc<Self> {
        Rc::new(Self {
            queue,
            state: RefCell::new(ScopeState::default()),
        })
    }

    /// Schedule `task` after `delay`. Returns `None` once the scope is cancelled.
    ///
    /// The queued callback only holds a weak reference to the scope; the task runs with the
    /// scope so it can schedule its own continuation.
    pub fn schedule<F>(self: &Rc<Self>, delay: Millis, task: F) -> Option<TimerId>
    where
        F: FnOnce(&Rc<TaskScope>) + 'static,
    {
        if self.state.borrow().cancelled {
            return None;
        }
        let scope: Weak<TaskScope> = Rc::downgrade(self);
        let id = self.queue.schedule(
            delay,
            Box::new(move |id| {
                let Some(scope) = scope.upgrade() else {
                    return;
                };
                if !scope.state.borrow_mut().pending.remove(&id) {
                    return;
                }
                task(&scope);
            }),
        );
        self.state.borrow_mut().pending.insert(id);
        Some(id)
    }

    /// Cancel every pending timer and refuse new ones. Returns how many were cancelled.
    pub fn cancel(&self) -> usize {
        let pending = {
            let mut st = self.state.borrow_mut();
            st.cancelled = true;
            std::mem::take(&mut st.pending)
        };
        pending
            .into_iter()
            .filter(|&id| self.queue.cancel(id))
            .count()
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.borrow().cancelled
    }

    /// Timers scheduled by this scope that have neither fired nor been cancelled.
    pub fn pending(&self) -> usize {
        self.state.borrow().pending.len()
    }
}

/// Owner of a running set of animation chains.
///
/// Cancelling, or dropping, the handle cancels every pending timer of every chain.
#[derive(Debug)]
pub struct AnimationHandle {
    scope: Rc<TaskScope>,
}

impl AnimationHandle {
    pub fn new(scope: Rc<TaskScope>) -> Self {
        Self { scope }
    }

    pub fn cancel(&self) {
        let cancelled = self.scope.cancel();
        if cancelled > 0 {
            tracing::debug!(cancelled, "cancelled animation timers");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.scope.is_cancelled()
    }

    pub fn pending(&self) -> usize {
        self.scope.pending()
    }
}

impl Drop for AnimationHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/task.rs"]
mod tests;
