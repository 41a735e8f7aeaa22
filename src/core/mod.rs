//! # Core Application Logic
//!
//! This module contains the chat session's business logic.
//! It knows nothing about any specific UI technology or about HTTP.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • Timers (virtual)     │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!                 ┌──────────────┴──────────────┐
//!                 ▼                             ▼
//!          ┌────────────┐                ┌────────────┐
//!          │    TUI     │                │    API     │
//!          │  Adapter   │                │  (reqwest) │
//!          │ (ratatui)  │                │            │
//!          └────────────┘                └────────────┘
//! ```
//!
//! Time enters only through `Action::Tick(now)`. The host reads a [`clock::Clock`]
//! and the core fires whatever [`timer::Timer`]s came due, so every delay in
//! the session can be driven deterministically from tests.
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all session state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`message`]: Message records and their copy affordance
//! - [`typewriter`]: Progressive rendering, one emission per step
//! - [`surface`]: Render targets the typewriter writes into
//! - [`timer`]: The virtual timer queue
//! - [`clock`]: Monotonic time sources
//! - [`config`]: Layered configuration

pub mod action;
pub mod clock;
pub mod config;
pub mod message;
pub mod state;
pub mod surface;
pub mod timer;
pub mod typewriter;
