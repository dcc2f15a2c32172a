//! Number Snake - a Snake game where numbered apples must be eaten in order
//!
//! This library provides:
//! - Core game logic (game module): placement, movement, ordering rules, scheduling
//! - Advisory messages (advice module)
//! - TUI rendering (render module) and keyboard input (input module)
//! - Session metrics (metrics module)
//! - The interactive terminal mode (modes module)

pub mod advice;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
