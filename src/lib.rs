//! Catvatar is a procedurally composed, customizable 2D cat avatar.
//!
//! The crate is split leaves-first:
//!
//! - [`customization`]: per-part colors and variants, persisted through a [`KeyValueStore`]
//! - [`compose`]: a pure [`compose()`] turning a customization into a [`PartTree`]
//! - [`animation`]: seven self-rescheduling behavior chains on a [`TimerQueue`]
//! - [`lifecycle`]: the [`AvatarController`] owning at most one live avatar
//!
//! The core never touches pixels. It drives an abstract [`SceneSurface`]; the in-memory
//! [`RetainedScene`] plus [`CpuRenderer`] cover offline rendering.
#![forbid(unsafe_code)]

mod foundation;

pub mod animation;
pub mod compose;
/// Host-level session configuration.
pub mod config;
pub mod customization;
pub mod lifecycle;
pub mod render;
pub mod scene;

pub use crate::foundation::color::{Rgb, shade};
pub use crate::foundation::core::{
    Affine, BezPath, Canvas, Millis, Point, Rect, Size, Transform2D, Vec2,
};
pub use crate::foundation::error::{AvatarError, AvatarResult};
pub use crate::foundation::math::Rng64;

pub use crate::animation::behaviors::{AnimationConfig, Behavior, start};
pub use crate::animation::clock::{TimerId, TimerQueue, VirtualClock};
pub use crate::animation::task::{AnimationHandle, TaskScope};
pub use crate::compose::compositor::compose;
pub use crate::config::AvatarConfig;
pub use crate::customization::palette::{
    Accessory, EyeStyle, NoseStyle, PartKey, PartValue, Pattern, TailStyle,
};
pub use crate::customization::state::{CatColors, CustomizationState, StoreKeys};
pub use crate::customization::store::{JsonFileStore, KeyValueStore, MemoryStore};
pub use crate::lifecycle::controller::{AvatarController, Visibility};
pub use crate::render::FrameRGBA;
pub use crate::render::cpu::{CpuRenderer, RenderSettings};
pub use crate::scene::live::{LiveAvatar, SharedSurface};
pub use crate::scene::model::{NodeId, PartNode, PartTree, Primitive, Rig};
pub use crate::scene::retained::{DrawItem, RetainedScene};
pub use crate::scene::surface::{SceneHandle, SceneSurface};
