//! Confirmation gate: at most one scan waits for operator input at a time.

use std::time::Duration;

use tokio::time::Instant;

use crate::error::{Error, Result};
use crate::models::{ScanCandidate, CUSTOM_PRODUCT};

/// Default quiet period after a confirmation closes.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(1000);

/// A scan held for operator confirmation, with its editable label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEscalation {
    candidate: ScanCandidate,
    label: String,
}

impl PendingEscalation {
    #[must_use]
    pub const fn candidate(&self) -> &ScanCandidate {
        &self.candidate
    }

    /// Current value of the editable label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    Idle,
    AwaitingInput(PendingEscalation),
}

#[derive(Debug)]
pub struct ConfirmationGate {
    state: GateState,
    cooldown: Duration,
    cooldown_until: Option<Instant>,
}

impl Default for ConfirmationGate {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}

impl ConfirmationGate {
    #[must_use]
    pub const fn new(cooldown: Duration) -> Self {
        Self {
            state: GateState::Idle,
            cooldown,
            cooldown_until: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &GateState {
        &self.state
    }

    #[must_use]
    pub const fn is_awaiting(&self) -> bool {
        matches!(self.state, GateState::AwaitingInput(_))
    }

    #[must_use]
    pub const fn pending(&self) -> Option<&PendingEscalation> {
        match &self.state {
            GateState::AwaitingInput(pending) => Some(pending),
            GateState::Idle => None,
        }
    }

    /// Whether polling should hold off: awaiting input or still cooling down.
    #[must_use]
    pub fn is_busy(&self, now: Instant) -> bool {
        self.is_awaiting() || self.cooldown_until.is_some_and(|until| now < until)
    }

    /// Hold `candidate` for confirmation.
    ///
    /// Fails with `InvalidState` while another escalation is pending; the
    /// pending one is left untouched. Opening during the cooldown is allowed.
    pub fn open(&mut self, candidate: ScanCandidate) -> Result<()> {
        if let GateState::AwaitingInput(pending) = &self.state {
            return Err(Error::InvalidState(format!(
                "confirmation already pending for '{}'",
                pending.candidate.data
            )));
        }

        let label = candidate
            .recognized_product()
            .map(ToString::to_string)
            .unwrap_or_default();
        self.cooldown_until = None;
        self.state = GateState::AwaitingInput(PendingEscalation { candidate, label });
        Ok(())
    }

    /// Replace the editable label of the pending escalation.
    pub fn set_label(&mut self, label: impl Into<String>) -> Result<()> {
        match &mut self.state {
            GateState::AwaitingInput(pending) => {
                pending.label = label.into();
                Ok(())
            }
            GateState::Idle => Err(Error::InvalidState("no confirmation pending".to_string())),
        }
    }

    /// Accept the pending scan under `label` and return it for persistence.
    ///
    /// The label is stored as typed; an empty one falls back to `Custom Product`.
    pub fn resolve_accept(&mut self, label: &str, now: Instant) -> Result<ScanCandidate> {
        let pending = self.take_pending(now)?;
        let product_name = if label.is_empty() {
            CUSTOM_PRODUCT.to_string()
        } else {
            label.to_string()
        };
        Ok(pending.candidate.with_product_name(product_name))
    }

    /// Drop the pending scan without persisting it.
    pub fn resolve_ignore(&mut self, now: Instant) -> Result<ScanCandidate> {
        self.take_pending(now).map(|pending| pending.candidate)
    }

    fn take_pending(&mut self, now: Instant) -> Result<PendingEscalation> {
        match std::mem::replace(&mut self.state, GateState::Idle) {
            GateState::AwaitingInput(pending) => {
                self.cooldown_until = Some(now + self.cooldown);
                Ok(pending)
            }
            GateState::Idle => Err(Error::InvalidState("no confirmation pending".to_string())),
        }
    }
}
