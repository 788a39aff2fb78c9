//! Infrastructure layer - Framework implementations
//!
//! This layer contains:
//! - Repository implementations (repositories)
//! - Application state (state)
//!
//! Database init/migrations and configuration live in the crate root
//! (`db`, `config`) and are re-exported from `lib.rs`.

pub mod repositories;
pub mod state;

pub use repositories::*;
pub use state::AppState;
