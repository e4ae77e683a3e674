//! Engine-free gameplay core: everything that decides what happens in a
//! match, with no rendering, audio or windowing. The client drives
//! [`session::Session::tick`] once per frame and mirrors the result.

pub mod character;
pub mod combat;
pub mod enemy;
pub mod geometry;
pub mod health;
pub mod input;
pub mod notice;
pub mod projectile;
pub mod rifle;
pub mod session;
pub mod tuning;
pub mod visual;

pub use geometry::{Obstacles, RayHit};
pub use input::{InputState, Key};
pub use session::{GameEvent, Phase, Session};
pub use tuning::Tuning;
