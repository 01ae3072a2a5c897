use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::catalog::{self, Path};
use crate::guidance::{Guidance, GuidanceClient};

/// Where a session is in the consultation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Intake,
    Preparing,
    Selection,
    Reveal,
}

/// One seeker's consultation. Owned by whoever drives it; never shared.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    dilemma: String,
    paths: Vec<Path>,
    selected: Option<usize>,
    guidance: Option<Guidance>,
    phase: Phase,
    // Bumped on reset so answers for an earlier consultation are dropped.
    epoch: u64,
}

/// Everything needed to run the one guidance request for a selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionTicket {
    pub epoch: u64,
    pub index: usize,
    pub path: Path,
    pub dilemma: String,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            dilemma: String::new(),
            paths: Vec::new(),
            selected: None,
            guidance: None,
            phase: Phase::Intake,
            epoch: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn dilemma(&self) -> &str {
        &self.dilemma
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_path(&self) -> Option<&Path> {
        self.selected.and_then(|i| self.paths.get(i))
    }

    pub fn guidance(&self) -> Option<&Guidance> {
        self.guidance.as_ref()
    }

    /// A card has been picked but its guidance has not landed yet.
    pub fn is_awaiting_guidance(&self) -> bool {
        self.phase == Phase::Selection && self.selected.is_some()
    }

    /// Accept the seeker's dilemma. Blank text leaves the session in Intake.
    pub fn submit_dilemma(&mut self, text: &str) -> bool {
        if self.phase != Phase::Intake {
            debug!(session = %self.id, phase = ?self.phase, "Dilemma ignored outside intake");
            return false;
        }
        if text.trim().is_empty() {
            debug!(session = %self.id, "Empty dilemma rejected");
            return false;
        }
        self.dilemma = text.to_string();
        self.paths = catalog::all().to_vec();
        self.phase = Phase::Preparing;
        info!(session = %self.id, "Dilemma accepted");
        true
    }

    /// Lay out the cards: Preparing -> Selection.
    pub fn finish_preparing(&mut self) -> bool {
        if self.phase != Phase::Preparing {
            return false;
        }
        self.phase = Phase::Selection;
        true
    }

    /// Pick a card. Only the first valid pick counts.
    pub fn select(&mut self, index: usize) -> Option<SelectionTicket> {
        if self.phase != Phase::Selection || self.selected.is_some() {
            debug!(session = %self.id, index, "Selection ignored");
            return None;
        }
        let path = *self.paths.get(index)?;
        self.selected = Some(index);
        info!(session = %self.id, index, path = path.name, "Card selected");
        Some(SelectionTicket {
            epoch: self.epoch,
            index,
            path,
            dilemma: self.dilemma.clone(),
        })
    }

    /// Land guidance for a ticket. Stale or mismatched guidance is dropped.
    pub fn apply_guidance(&mut self, ticket: &SelectionTicket, guidance: Guidance) -> bool {
        let current = ticket.epoch == self.epoch
            && self.phase == Phase::Selection
            && self.selected == Some(ticket.index)
            && self.selected_path().map(|p| p.id) == Some(guidance.path_id);
        if !current {
            debug!(session = %self.id, epoch = ticket.epoch, "Dropping stale guidance");
            return false;
        }
        self.guidance = Some(guidance);
        self.phase = Phase::Reveal;
        info!(session = %self.id, "Guidance revealed");
        true
    }

    /// Start over from the card table or a revealed reading. Any guidance
    /// still in flight becomes stale. Returns `false` before the cards are laid out.
    pub fn reset(&mut self) -> bool {
        if matches!(self.phase, Phase::Intake | Phase::Preparing) {
            debug!(session = %self.id, phase = ?self.phase, "Ignoring reset before selection");
            return false;
        }
        self.dilemma.clear();
        self.paths.clear();
        self.selected = None;
        self.guidance = None;
        self.phase = Phase::Intake;
        self.epoch += 1;
        info!(session = %self.id, "Session reset");
        true
    }
}

/// Select a card on an exclusively owned session and wait for its guidance.
/// Returns `false` when the pick was a no-op.
pub async fn choose(session: &mut Session, index: usize, client: &GuidanceClient) -> bool {
    let Some(ticket) = session.select(index) else {
        return false;
    };
    let guidance = client.generate(&ticket.path, &ticket.dilemma).await;
    session.apply_guidance(&ticket, guidance)
}
