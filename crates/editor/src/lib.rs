// Library crate: the editor core plus its headless surfaces (command protocol,
// harness, fixtures). Rendering and widgets live with the host application.

pub mod command;
pub mod fixtures;
pub mod harness;
pub mod state;
pub mod viewport;
