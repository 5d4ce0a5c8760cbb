//! Show, hide and rebuild the single live avatar.

pub mod controller;
