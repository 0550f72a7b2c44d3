//! The shared rendering-surface handle
//!
//! One `WebSurface` instance is shared and reattached between screens
//! within a session. At most one screen holds it at a time; attach and
//! detach are idempotent. The handle is passed by reference through the
//! component graph -- there is no ambient/global lookup.

use hybridnav_core::prelude::*;
use hybridnav_core::{Location, VisitOptions};

use crate::protocol::{CommandSender, SurfaceCommand};

/// Opaque key identifying the screen currently holding the surface
pub type ScreenKey = u64;

/// Handle to the single shared rendering surface of a session
#[derive(Debug)]
pub struct WebSurface {
    /// Channel toward the embedded runtime
    commands: CommandSender,

    /// Screen currently holding the surface, if any
    attached_to: Option<ScreenKey>,

    /// Whether the bootstrap script has been installed for the current
    /// page generation
    bridge_installed: bool,
}

impl WebSurface {
    pub fn new(commands: CommandSender) -> Self {
        Self {
            commands,
            attached_to: None,
            bridge_installed: false,
        }
    }

    /// Attach the surface to a screen.
    ///
    /// Attaching an already-attached surface is a no-op; attaching while
    /// another screen holds it steals the attachment (the previous
    /// holder must already have navigated away).
    pub fn attach(&mut self, screen: ScreenKey) {
        if self.attached_to == Some(screen) {
            return;
        }
        if let Some(previous) = self.attached_to {
            debug!(previous, screen, "surface reattached");
        }
        self.attached_to = Some(screen);
    }

    /// Detach the surface from a screen.
    ///
    /// Detaching when the surface is held by a different screen (or not
    /// held at all) is a no-op, not an error.
    pub fn detach(&mut self, screen: ScreenKey) {
        if self.attached_to == Some(screen) {
            self.attached_to = None;
        }
    }

    /// The screen currently holding the surface
    pub fn attached_to(&self) -> Option<ScreenKey> {
        self.attached_to
    }

    pub fn is_attached_to(&self, screen: ScreenKey) -> bool {
        self.attached_to == Some(screen)
    }

    /// Whether the bootstrap script is installed
    pub fn is_bridge_installed(&self) -> bool {
        self.bridge_installed
    }

    /// Install the bootstrap script. Idempotent per page generation.
    pub fn install_bridge(&mut self) -> Result<()> {
        if self.bridge_installed {
            return Ok(());
        }
        self.commands.send(SurfaceCommand::InstallBridge)?;
        self.bridge_installed = true;
        Ok(())
    }

    /// A new page generation invalidated the installed bridge (full
    /// load or page invalidation)
    pub fn invalidate_bridge(&mut self) {
        self.bridge_installed = false;
    }

    /// Perform a scripted visit on the booted page
    pub fn visit(
        &self,
        location: &Location,
        options: &VisitOptions,
        restoration_identifier: &str,
    ) -> Result<()> {
        self.commands.send(SurfaceCommand::VisitLocation {
            location: location.clone(),
            options_json: options.to_json(),
            restoration_identifier: restoration_identifier.to_string(),
        })
    }

    /// Load a location from scratch
    pub fn load(&mut self, location: &Location) -> Result<()> {
        self.bridge_installed = false;
        self.commands.send(SurfaceCommand::LoadLocation {
            location: location.clone(),
        })
    }

    /// Reload the current resource
    pub fn reload(&mut self) -> Result<()> {
        self.bridge_installed = false;
        self.commands.send(SurfaceCommand::Reload)
    }

    /// Render the cold-boot visit's completion directly
    pub fn render_cold_boot(&self, identifier: &str) -> Result<()> {
        self.commands.send(SurfaceCommand::RenderColdBoot {
            identifier: identifier.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::CommandSender;

    fn surface() -> (WebSurface, tokio::sync::mpsc::UnboundedReceiver<SurfaceCommand>) {
        let (sender, rx) = CommandSender::channel();
        (WebSurface::new(sender), rx)
    }

    #[test]
    fn test_attach_is_idempotent() {
        let (mut surface, _rx) = surface();
        surface.attach(1);
        surface.attach(1);
        assert_eq!(surface.attached_to(), Some(1));
    }

    #[test]
    fn test_attach_steals_from_previous_holder() {
        let (mut surface, _rx) = surface();
        surface.attach(1);
        surface.attach(2);
        assert!(surface.is_attached_to(2));
        assert!(!surface.is_attached_to(1));
    }

    #[test]
    fn test_detach_only_releases_own_attachment() {
        let (mut surface, _rx) = surface();
        surface.attach(1);

        // A stale screen detaching is a no-op
        surface.detach(2);
        assert_eq!(surface.attached_to(), Some(1));

        surface.detach(1);
        assert_eq!(surface.attached_to(), None);

        // Detaching an absent surface is a no-op
        surface.detach(1);
        assert_eq!(surface.attached_to(), None);
    }

    #[test]
    fn test_install_bridge_once() {
        let (mut surface, mut rx) = surface();
        surface.install_bridge().unwrap();
        surface.install_bridge().unwrap();
        assert_eq!(rx.try_recv().unwrap(), SurfaceCommand::InstallBridge);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_load_resets_bridge_installed() {
        let (mut surface, _rx) = surface();
        surface.install_bridge().unwrap();
        assert!(surface.is_bridge_installed());

        surface
            .load(&Location::parse("https://example.com/home").unwrap())
            .unwrap();
        assert!(!surface.is_bridge_installed());
    }
}
