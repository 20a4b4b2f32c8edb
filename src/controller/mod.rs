//! Session control: level selection and screen flow.
//!
//! The controller is the thin layer between a renderer and the rules: it
//! walks the main menu / level selection / game screens, deals a session
//! for the chosen level, forwards player intents, and drops the session on
//! reset or shortly after a win.

mod screens;

pub use screens::SessionController;
