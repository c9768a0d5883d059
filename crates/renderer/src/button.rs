use dash_core::ServiceAction;

/// Idle / pending state of one action button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionButton {
    action:  ServiceAction,
    pending: bool,
}

impl ActionButton {
    pub fn new(action: ServiceAction) -> Self {
        Self { action, pending: false }
    }

    pub fn action(&self) -> ServiceAction {
        self.action
    }

    /// Disable the button. Returns `false` if it was already pending.
    pub fn press(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    /// Re-enable the button with its original label.
    pub fn release(&mut self) {
        self.pending = false;
    }

    pub fn is_enabled(&self) -> bool {
        !self.pending
    }

    pub fn label(&self) -> &'static str {
        if self.pending {
            self.action.pending_label()
        } else {
            self.action.label()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_disables_and_relabels() {
        let mut button = ActionButton::new(ServiceAction::RestartPbx);
        assert!(button.press());
        assert!(!button.is_enabled());
        assert_eq!(button.label(), "Starting PBX…");
        assert!(!button.press());

        button.release();
        assert!(button.is_enabled());
        assert_eq!(button.label(), "Restart PBX");
    }
}
