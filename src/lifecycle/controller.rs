use std::{cell::RefCell, rc::Rc};

use crate::{
    animation::{
        behaviors::{self, AnimationConfig, Behavior},
        clock::TimerQueue,
        task::AnimationHandle,
    },
    compose::compositor::compose,
    config::AvatarConfig,
    customization::{
        palette::{Accessory, PartKey, PartValue},
        state::{CustomizationState, StoreKeys},
        store::KeyValueStore,
    },
    foundation::{core::Point, math::Rng64},
    scene::{
        live::{LiveAvatar, SharedSurface},
        model::PartTree,
    },
};

/// Whether an avatar instance currently exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    Shown,
}

/// The live pairing of an attached tree and the chains animating it.
struct AvatarInstance {
    live: Rc<RefCell<LiveAvatar>>,
    animations: AnimationHandle,
}

impl AvatarInstance {
    /// Cancel every chain, then detach and destroy the tree.
    fn teardown(self) {
        self.animations.cancel();
        self.live.borrow_mut().destroy();
    }
}

/// Owns the customization state and at most one live avatar.
///
/// Every change while shown is a full rebuild: the old instance is torn down
/// (cancel-then-destroy) before the new tree is composed and attached. Calls that do not
/// apply return `false` and change nothing.
pub struct AvatarController {
    state: CustomizationState,
    store: Box<dyn KeyValueStore>,
    surface: SharedSurface,
    queue: Rc<dyn TimerQueue>,
    animations: AnimationConfig,
    rng: Rng64,
    instance: Option<AvatarInstance>,
}

impl std::fmt::Debug for AvatarController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvatarController")
            .field("state", &self.state)
            .field("visibility", &self.visibility())
            .field("animations", &self.animations)
            .finish()
    }
}

impl AvatarController {
    /// Load the customization from `store` under the default keys; starts hidden.
    pub fn new(
        store: Box<dyn KeyValueStore>,
        surface: SharedSurface,
        queue: Rc<dyn TimerQueue>,
    ) -> Self {
        Self::with_config(&AvatarConfig::default(), store, surface, queue)
    }

    pub fn with_config(
        config: &AvatarConfig,
        store: Box<dyn KeyValueStore>,
        surface: SharedSurface,
        queue: Rc<dyn TimerQueue>,
    ) -> Self {
        let keys: StoreKeys = config.store_keys.clone();
        let state = CustomizationState::load_with_keys(store.as_ref(), keys);
        Self {
            state,
            store,
            surface,
            queue,
            animations: config.animations.clone(),
            rng: Rng64::new(config.seed),
            instance: None,
        }
    }

    pub fn state(&self) -> &CustomizationState {
        &self.state
    }

    pub fn visibility(&self) -> Visibility {
        if self.instance.is_some() {
            Visibility::Shown
        } else {
            Visibility::Hidden
        }
    }

    pub fn is_shown(&self) -> bool {
        self.instance.is_some()
    }

    pub fn animations(&self) -> &AnimationConfig {
        &self.animations
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Run `f` against the live avatar, if one is shown.
    pub fn with_live<R>(&self, f: impl FnOnce(&LiveAvatar) -> R) -> Option<R> {
        self.instance.as_ref().map(|inst| f(&*inst.live.borrow()))
    }

    /// Snapshot of the live tree, including any animation pose in progress.
    pub fn live_tree(&self) -> Option<PartTree> {
        self.with_live(|live| live.tree().clone())
    }

    /// Timers pending for the live instance; zero when hidden.
    pub fn pending_timers(&self) -> usize {
        self.instance
            .as_ref()
            .map_or(0, |inst| inst.animations.pending())
    }

    /// Hidden -> Shown: compose, attach, start the chains and center.
    #[tracing::instrument(skip(self))]
    pub fn show(&mut self) -> bool {
        if self.instance.is_some() {
            return false;
        }
        self.build();
        true
    }

    /// Shown -> Hidden: cancel the chains, then destroy the tree.
    #[tracing::instrument(skip(self))]
    pub fn hide(&mut self) -> bool {
        match self.instance.take() {
            Some(instance) => {
                instance.teardown();
                true
            }
            None => false,
        }
    }

    /// Show when hidden, hide when shown. Returns the new visibility.
    pub fn toggle(&mut self) -> Visibility {
        if self.is_shown() {
            self.hide();
        } else {
            self.show();
        }
        self.visibility()
    }

    /// Change one part. Rejected values are no-ops; accepted ones persist and, while
    /// shown, always rebuild the avatar, even when the value is unchanged.
    pub fn recolor(&mut self, part: PartKey, value: PartValue) -> bool {
        if !self.state.set_part(self.store.as_mut(), part, value) {
            return false;
        }
        self.rebuild_if_shown();
        true
    }

    /// [`Self::recolor`] from raw part-name and value text.
    pub fn recolor_str(&mut self, part: &str, value: &str) -> bool {
        if !self.state.set_part_str(self.store.as_mut(), part, value) {
            return false;
        }
        self.rebuild_if_shown();
        true
    }

    pub fn set_accessory(&mut self, accessory: Accessory) -> bool {
        self.state.set_accessory(self.store.as_mut(), accessory);
        self.rebuild_if_shown();
        true
    }

    pub fn set_accessory_str(&mut self, tag: &str) -> bool {
        if !self.state.set_accessory_str(self.store.as_mut(), tag) {
            return false;
        }
        self.rebuild_if_shown();
        true
    }

    /// Turn one behavior chain on or off; a shown avatar is rebuilt with the new set.
    pub fn toggle_behavior(&mut self, behavior: Behavior) -> bool {
        let enabled = self.animations.toggle(behavior);
        if self.is_shown() {
            self.rebuild();
        }
        enabled
    }

    /// Recenter the live avatar on the current viewport. No-op while hidden.
    pub fn reposition(&mut self) -> bool {
        let Some(instance) = &self.instance else {
            return false;
        };
        let viewport = self.surface.borrow().viewport();
        let center = Point::new(viewport.width / 2.0, viewport.height / 2.0);
        instance.live.borrow_mut().place_at(center);
        tracing::debug!(x = center.x, y = center.y, "avatar recentered");
        true
    }

    fn rebuild_if_shown(&mut self) {
        if self.is_shown() {
            self.rebuild();
        }
    }

    #[tracing::instrument(skip(self))]
    fn rebuild(&mut self) {
        if let Some(instance) = self.instance.take() {
            instance.teardown();
        }
        self.build();
    }

    fn build(&mut self) {
        let tree = compose(self.state.colors(), self.state.accessory());
        let live = Rc::new(RefCell::new(LiveAvatar::attach(
            tree,
            Rc::clone(&self.surface),
        )));
        // Each instance draws its own stream so rebuilds do not replay the same schedule.
        let rng = Rng64::new(self.rng.next_u64());
        let animations = behaviors::start(&live, Rc::clone(&self.queue), rng, &self.animations);
        self.instance = Some(AvatarInstance { live, animations });
        self.reposition();
    }
}

impl Drop for AvatarController {
    fn drop(&mut self) {
        self.hide();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/lifecycle/controller.rs"]
mod tests;
