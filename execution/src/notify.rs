use tracing::debug;

/// Audio/notification collaborator. Calls are fire-and-forget.
pub trait Notifier: Send {
    fn play_hit(&self);
    fn play_success(&self);
    /// Flip the mute flag and return the new value.
    fn toggle_mute(&mut self) -> bool;
}

/// Drops every cue.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silent;

impl Notifier for Silent {
    fn play_hit(&self) {}

    fn play_success(&self) {}

    fn toggle_mute(&mut self) -> bool {
        true
    }
}

/// Emits cues as debug events, honouring mute.
#[derive(Clone, Copy, Debug, Default)]
pub struct Logged {
    muted: bool,
}

impl Logged {
    pub fn is_muted(&self) -> bool {
        self.muted
    }
}

impl Notifier for Logged {
    fn play_hit(&self) {
        if !self.muted {
            debug!(cue = "hit", "notify");
        }
    }

    fn play_success(&self) {
        if !self.muted {
            debug!(cue = "success", "notify");
        }
    }

    fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        debug!(muted = self.muted, "sound toggled");
        self.muted
    }
}
