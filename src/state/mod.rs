//! State management module.
//!
//! Holds the gameplay orchestrator. It is the only place where the core
//! components are wired together.

pub mod game;

pub use game::GameEngine;
