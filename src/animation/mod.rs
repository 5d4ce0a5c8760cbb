//! Self-rescheduling ambient animations on a cooperative timer queue.

/// The seven behavior chains and their configuration.
pub mod behaviors;
/// Timer queue interface and the virtual-time implementation.
pub mod clock;
/// Cancellable timer scopes and the animation handle.
pub mod task;
