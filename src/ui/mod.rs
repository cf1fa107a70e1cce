//! Terminal UI: the game view for playing against the computer, with
//! searches running on a background worker thread.

mod app;
mod game_view;
pub mod worker;

pub use app::{App, Opponent};
