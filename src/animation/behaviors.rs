use std::{
    cell::RefCell,
    f64::consts::FRAC_PI_4,
    rc::{Rc, Weak},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{
    animation::{
        clock::TimerQueue,
        task::{AnimationHandle, TaskScope},
    },
    compose::compositor::WHACK_FX_OFFSET,
    foundation::{
        core::{Millis, Point, Vec2},
        error::AvatarError,
        math::Rng64,
    },
    scene::{
        live::LiveAvatar,
        model::{Primitive, Rig},
    },
};

pub const BLINK_SCALE_Y: f64 = 0.1;
pub const EAR_TWITCH_MAX_RAD: f64 = 0.3;
pub const WHISKER_TWITCH_MAX_RAD: f64 = 0.2;
pub const TAIL_FLICK_RISE: f64 = 12.0;
pub const LOOK_MAX_DX: f64 = 2.0;
pub const LOOK_MAX_DY: f64 = 1.0;
pub const WHACK_LIFT: f64 = 25.0;
pub const WHACK_REACH: f64 = 12.0;
pub const WHACK_SCALE: f64 = 1.3;
/// Delay between lifting the paw and striking.
pub const WHACK_STRIKE_DELAY: Millis = Millis(200);
/// Delay between striking and putting the paw back.
pub const WHACK_RECOVER_DELAY: Millis = Millis(500);
pub const BUBBLE_RADIUS: f64 = 70.0;
pub const BUBBLE_TILT_RAD: f64 = FRAC_PI_4;

/// One ambient micro-animation chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Behavior {
    Blink,
    EarTwitch,
    WhiskerTwitch,
    TailFlick,
    EyeLook,
    PawWhack,
    SpeechBubble,
}

impl Behavior {
    pub const ALL: [Self; 7] = [
        Self::Blink,
        Self::EarTwitch,
        Self::WhiskerTwitch,
        Self::TailFlick,
        Self::EyeLook,
        Self::PawWhack,
        Self::SpeechBubble,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Self::Blink => "blink",
            Self::EarTwitch => "earTwitch",
            Self::WhiskerTwitch => "whiskerTwitch",
            Self::TailFlick => "tailFlick",
            Self::EyeLook => "eyeLook",
            Self::PawWhack => "pawWhack",
            Self::SpeechBubble => "speechBubble",
        }
    }

    /// Half-open range the idle delay before each firing is drawn from.
    pub fn delay_range(self) -> (Millis, Millis) {
        let (lo, hi) = match self {
            Self::Blink => (2_500, 7_500),
            Self::EarTwitch => (2_000, 8_000),
            Self::WhiskerTwitch => (1_500, 6_500),
            Self::TailFlick => (4_000, 10_000),
            Self::EyeLook => (1_800, 5_800),
            Self::PawWhack => (5_000, 12_000),
            Self::SpeechBubble => (3_000, 10_000),
        };
        (Millis(lo), Millis(hi))
    }

    /// How long the pose holds before it is reverted.
    ///
    /// The paw whack has no single hold; it runs its own staged delays.
    pub fn hold(self) -> Option<Millis> {
        match self {
            Self::Blink => Some(Millis(120)),
            Self::EarTwitch | Self::WhiskerTwitch | Self::TailFlick => Some(Millis(150)),
            Self::EyeLook => Some(Millis(800)),
            Self::PawWhack => None,
            Self::SpeechBubble => Some(Millis(1_000)),
        }
    }
}

impl std::fmt::Display for Behavior {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Behavior {
    type Err = AvatarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|b| b.tag().to_ascii_lowercase() == wanted)
            .ok_or_else(|| AvatarError::validation(format!("unknown behavior '{s}'")))
    }
}

/// Which chains run when an avatar is shown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub enabled: Vec<Behavior>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            enabled: Behavior::ALL.to_vec(),
        }
    }
}

impl AnimationConfig {
    /// No chains at all; the avatar stays still.
    pub fn none() -> Self {
        Self {
            enabled: Vec::new(),
        }
    }

    pub fn only(behaviors: impl IntoIterator<Item = Behavior>) -> Self {
        let mut cfg = Self::none();
        for b in behaviors {
            if !cfg.is_enabled(b) {
                cfg.enabled.push(b);
            }
        }
        cfg
    }

    pub fn is_enabled(&self, behavior: Behavior) -> bool {
        self.enabled.contains(&behavior)
    }

    /// Flip one behavior on or off. Returns whether it is now enabled.
    pub fn toggle(&mut self, behavior: Behavior) -> bool {
        if self.is_enabled(behavior) {
            self.enabled.retain(|b| *b != behavior);
            false
        } else {
            self.enabled.push(behavior);
            true
        }
    }

    /// Enabled behaviors in canonical order, without duplicates.
    pub fn active(&self) -> impl Iterator<Item = Behavior> + '_ {
        Behavior::ALL.into_iter().filter(|b| self.is_enabled(*b))
    }
}

/// State shared by every chain of one running avatar.
struct Chains {
    live: Weak<RefCell<LiveAvatar>>,
    rng: RefCell<Rng64>,
}

impl Chains {
    fn idle_delay(&self, behavior: Behavior) -> Millis {
        let (lo, hi) = behavior.delay_range();
        Millis(self.rng.borrow_mut().range_u64(lo.0, hi.0))
    }

    fn uniform(&self, lo: f64, hi: f64) -> f64 {
        self.rng.borrow_mut().range_f64(lo, hi)
    }

    fn coin(&self) -> bool {
        self.rng.borrow_mut().coin()
    }

    /// The live avatar and its rig, if it is still attached.
    fn target(&self) -> Option<(Rc<RefCell<LiveAvatar>>, Rig)> {
        let live = self.live.upgrade()?;
        let rig = {
            let avatar = live.borrow();
            if !avatar.is_attached() {
                return None;
            }
            avatar.rig()?.clone()
        };
        Some((live, rig))
    }
}

/// Start every enabled behavior chain on `live`.
///
/// Each chain waits a random idle delay, poses, holds, reverts and re-arms itself with a
/// fresh delay, forever. Chains only hold weak references to the avatar; the returned
/// handle cancels all of their pending timers.
#[tracing::instrument(skip(live, queue, rng))]
pub fn start(
    live: &Rc<RefCell<LiveAvatar>>,
    queue: Rc<dyn TimerQueue>,
    rng: Rng64,
    config: &AnimationConfig,
) -> AnimationHandle {
    let scope = TaskScope::new(queue);
    let chains = Rc::new(Chains {
        live: Rc::downgrade(live),
        rng: RefCell::new(rng),
    });
    for behavior in config.active() {
        arm(&scope, &chains, behavior);
    }
    AnimationHandle::new(scope)
}

fn arm(scope: &Rc<TaskScope>, chains: &Rc<Chains>, behavior: Behavior) {
    let delay = chains.idle_delay(behavior);
    let chains = Rc::clone(chains);
    scope.schedule(delay, move |scope| fire(scope, &chains, behavior));
}

/// Schedule the revert for a posed behavior; the revert re-arms the chain.
fn hold_then<F>(scope: &Rc<TaskScope>, chains: &Rc<Chains>, behavior: Behavior, revert: F)
where
    F: FnOnce(&mut LiveAvatar) + 'static,
{
    let Some(hold) = behavior.hold() else {
        return;
    };
    let chains = Rc::clone(chains);
    scope.schedule(hold, move |scope| {
        let Some((live, _)) = chains.target() else {
            return;
        };
        revert(&mut *live.borrow_mut());
        arm(scope, &chains, behavior);
    });
}

fn fire(scope: &Rc<TaskScope>, chains: &Rc<Chains>, behavior: Behavior) {
    let Some((live, rig)) = chains.target() else {
        return;
    };
    tracing::trace!(%behavior, "behavior fired");
    match behavior {
        Behavior::Blink => {
            let parts: Vec<_> = rig
                .eyes
                .into_iter()
                .chain(rig.eye_shades)
                .chain(rig.pupils)
                .collect();
            {
                let mut avatar = live.borrow_mut();
                for &id in &parts {
                    avatar.update_transform(id, |t| t.scale.y = BLINK_SCALE_Y);
                }
            }
            hold_then(scope, chains, behavior, move |avatar| {
                for &id in &parts {
                    avatar.update_transform(id, |t| t.scale.y = 1.0);
                }
            });
        }
        Behavior::EarTwitch => {
            let ear = rig.ears[usize::from(chains.coin())];
            let angle = chains.uniform(-EAR_TWITCH_MAX_RAD, EAR_TWITCH_MAX_RAD);
            live.borrow_mut()
                .update_transform(ear, |t| t.rotation_rad = angle);
            hold_then(scope, chains, behavior, move |avatar| {
                avatar.update_transform(ear, |t| t.rotation_rad = 0.0);
            });
        }
        Behavior::WhiskerTwitch => {
            let angle = chains.uniform(-WHISKER_TWITCH_MAX_RAD, WHISKER_TWITCH_MAX_RAD);
            let whiskers = rig.whiskers;
            live.borrow_mut()
                .update_transform(whiskers, |t| t.rotation_rad = angle);
            hold_then(scope, chains, behavior, move |avatar| {
                avatar.update_transform(whiskers, |t| t.rotation_rad = 0.0);
            });
        }
        Behavior::TailFlick => {
            let tip = rig.tail_tip;
            let rest_y = live.borrow().tree().node(tip).transform.translate.y;
            live.borrow_mut()
                .update_transform(tip, |t| t.translate.y = rest_y - TAIL_FLICK_RISE);
            hold_then(scope, chains, behavior, move |avatar| {
                avatar.update_transform(tip, |t| t.translate.y = rest_y);
            });
        }
        Behavior::EyeLook => {
            let offset = Vec2::new(
                chains.uniform(-LOOK_MAX_DX, LOOK_MAX_DX),
                chains.uniform(-LOOK_MAX_DY, LOOK_MAX_DY),
            );
            // Pupils rest centered on their eyes; the look is an offset from there.
            let rest = {
                let avatar = live.borrow();
                rig.eyes.map(|eye| avatar.tree().node(eye).transform.translate)
            };
            {
                let mut avatar = live.borrow_mut();
                for (pupil, base) in rig.pupils.into_iter().zip(rest) {
                    avatar.update_transform(pupil, |t| t.translate = base + offset);
                }
            }
            let pupils = rig.pupils;
            hold_then(scope, chains, behavior, move |avatar| {
                for (pupil, base) in pupils.into_iter().zip(rest) {
                    avatar.update_transform(pupil, |t| t.translate = base);
                }
            });
        }
        Behavior::PawWhack => paw_whack(scope, chains, &live, &rig),
        Behavior::SpeechBubble => {
            let side = if chains.coin() { -1.0 } else { 1.0 };
            let angle = side * BUBBLE_TILT_RAD;
            let spot = Point::new(BUBBLE_RADIUS * angle.sin(), -BUBBLE_RADIUS * angle.cos());
            let anchor = rig.mouth_anchor;
            {
                let mut avatar = live.borrow_mut();
                avatar.update_transform(rig.bubble, |t| {
                    t.translate = Vec2::new(spot.x, spot.y);
                });
                avatar.redraw(rig.bubble_connector, |node| {
                    if let Primitive::Segments { lines, .. } = &mut node.primitive {
                        *lines = vec![[anchor, spot]];
                    }
                });
                avatar.set_visible(rig.bubble, true);
                avatar.set_visible(rig.bubble_connector, true);
            }
            let (bubble, connector) = (rig.bubble, rig.bubble_connector);
            hold_then(scope, chains, behavior, move |avatar| {
                avatar.set_visible(bubble, false);
                avatar.set_visible(connector, false);
            });
        }
    }
}

/// Lift, strike with the effect shown, then recover and re-arm.
fn paw_whack(scope: &Rc<TaskScope>, chains: &Rc<Chains>, live: &Rc<RefCell<LiveAvatar>>, rig: &Rig) {
    let (paw, fx) = (rig.whack_paw, rig.whack_fx);
    let rest = live.borrow().tree().node(paw).transform;
    live.borrow_mut()
        .update_transform(paw, |t| t.translate.y = rest.translate.y - WHACK_LIFT);

    let chains = Rc::clone(chains);
    scope.schedule(WHACK_STRIKE_DELAY, move |scope| {
        let Some((live, _)) = chains.target() else {
            return;
        };
        let struck = Vec2::new(
            rest.translate.x + WHACK_REACH,
            rest.translate.y - WHACK_LIFT,
        );
        {
            let mut avatar = live.borrow_mut();
            avatar.update_transform(paw, |t| {
                t.translate = struck;
                t.scale = rest.scale * WHACK_SCALE;
            });
            avatar.update_transform(fx, |t| {
                t.translate = struck + Vec2::new(WHACK_FX_OFFSET.0, WHACK_FX_OFFSET.1);
            });
            avatar.set_visible(fx, true);
        }

        scope.schedule(WHACK_RECOVER_DELAY, move |scope| {
            let Some((live, _)) = chains.target() else {
                return;
            };
            {
                let mut avatar = live.borrow_mut();
                avatar.update_transform(paw, |t| *t = rest);
                avatar.set_visible(fx, false);
            }
            arm(scope, &chains, Behavior::PawWhack);
        });
    });
}

#[cfg(test)]
#[path = "../../tests/unit/animation/behaviors.rs"]
mod tests;
