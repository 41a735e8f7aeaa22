//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::time::Duration;

use crate::core::action::{Action, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Creates a closed test App with the default strings and timings.
pub fn test_app() -> App {
    App::from_config(&ResolvedConfig::default())
}

/// An App that has been opened and has finished typing the greeting.
pub fn opened_app() -> App {
    let mut app = test_app();
    update(&mut app, Action::Open);
    run_until_quiet(&mut app);
    assert!(!app.is_processing(), "greeting should have released the session");
    app
}

/// Moves virtual time forward by `delta` and fires whatever came due.
pub fn advance(app: &mut App, delta: Duration) {
    let now = app.now + delta;
    update(app, Action::Tick(now));
}

/// Jumps from deadline to deadline until no timers remain.
pub fn run_until_quiet(app: &mut App) {
    let mut guard = 0;
    while let Some(deadline) = app.timers.next_deadline() {
        update(app, Action::Tick(deadline));
        guard += 1;
        assert!(guard < 100_000, "timers never settled");
    }
}
