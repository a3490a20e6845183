//! Admin channel handshake.
//!
//! Drives the registration/login sequence:
//! `Disconnected → Connected → Registered`. The daemon announces
//! itself with periodic stats lines; the first one triggers client
//! registration, and the registration acknowledgement triggers the
//! login bundle.

use crate::EventSender;
use iqlink_core::BridgeEvent;
use iqlink_net::{ChannelHandle, ChannelState, ChunkHandler, LineBuffer};
use tracing::{debug, info};

const STATS_PREFIX: &str = "S,STATS,";
const REGISTER_COMPLETED_PREFIX: &str = "S,REGISTER CLIENT APP COMPLETED";

/// Application identity and login credentials for the handshake.
#[derive(Debug, Clone)]
pub struct AdminSettings {
    pub app_name: String,
    pub app_version: String,
    pub login_id: String,
    pub password: String,
}

/// Handshake state machine over the admin channel.
pub struct AdminHandler {
    settings: AdminSettings,
    handle: ChannelHandle,
    events: EventSender,
    lines: LineBuffer,
    registered: bool,
}

impl AdminHandler {
    pub fn new(settings: AdminSettings, handle: ChannelHandle, events: EventSender) -> Self {
        Self {
            settings,
            handle,
            events,
            lines: LineBuffer::new(),
            registered: false,
        }
    }

    fn handle_line(&mut self, line: &str) {
        if line.starts_with(STATS_PREFIX) {
            if !self.registered {
                self.handle.send(format!(
                    "S,REGISTER CLIENT APP,{},{}\r\n",
                    self.settings.app_name, self.settings.app_version
                ));
                self.registered = true;
                self.handle.set_state(ChannelState::Registered);
                let _ = self.events.send(BridgeEvent::Connected(true));
                info!(app = %self.settings.app_name, "Registered with feed daemon");
            }
        } else if line.starts_with(REGISTER_COMPLETED_PREFIX) {
            // Sent on every sighting; duplicate login bundles are
            // harmless to the daemon.
            self.handle.send(format!(
                "S,SET LOGINID,{}\r\nS,SET PASSWORD,{}\r\nS,SET SAVE LOGIN INFO,On\r\nS,SET AUTOCONNECT,On\r\nS,CONNECT\r\n",
                self.settings.login_id, self.settings.password
            ));
            info!("Login bundle sent");
        } else {
            // Unknown admin lines are informational, not errors.
            debug!(line, "Ignoring admin line");
        }
    }
}

impl ChunkHandler for AdminHandler {
    fn on_chunk(&mut self, chunk: &str) {
        for line in self.lines.push(chunk) {
            self.handle_line(&line);
        }
    }
}
