//! Test utilities for bridge types
//!
//! Provides a surface wired to a capturing channel so tests can assert
//! on the exact commands a session or navigator issued.

use tokio::sync::mpsc::UnboundedReceiver;

use crate::protocol::{CommandSender, SurfaceCommand};
use crate::surface::WebSurface;

/// Create a surface whose outbound commands can be inspected
pub fn recording_surface() -> (WebSurface, UnboundedReceiver<SurfaceCommand>) {
    let (sender, rx) = CommandSender::channel();
    (WebSurface::new(sender), rx)
}

/// Drain every command sent so far
pub fn drain_commands(rx: &mut UnboundedReceiver<SurfaceCommand>) -> Vec<SurfaceCommand> {
    let mut commands = Vec::new();
    while let Ok(command) = rx.try_recv() {
        commands.push(command);
    }
    commands
}
