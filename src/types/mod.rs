//! Type definitions

pub mod game;
pub mod plan;
pub mod route;

pub use game::*;
pub use plan::*;
pub use route::*;
