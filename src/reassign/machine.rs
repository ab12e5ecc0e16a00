//! Pure reassignment state machine.
//!
//! No I/O and no clocks: every pointer or dialog event is a method call, so
//! the whole lifecycle is testable without a UI.

use org_hierarchy_types::NodeId;
use thiserror::Error;

use super::{DragSession, DropTarget, EmployeeRef, PendingReassignment, ReassignState};

/// Why an event was ignored. These are expected no-ops, not user errors.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("editing is not enabled")]
    EditingDisabled,
    #[error("a commit is in flight")]
    CommitInFlight,
    #[error("a reassignment is waiting for confirmation")]
    ConfirmationPending,
    #[error("no drag in progress")]
    NoActiveDrag,
    #[error("cannot drop an employee onto itself")]
    SelfTarget,
    #[error("nothing to confirm")]
    NothingPending,
}

#[derive(Debug, Clone, Default)]
pub struct ReassignMachine {
    edit_mode: bool,
    can_edit: bool,
    drag: DragSession,
    pending: Option<PendingReassignment>,
    committing: bool,
}

impl ReassignMachine {
    /// `can_edit` is the caller's permission check result
    pub fn new(can_edit: bool) -> Self {
        Self {
            can_edit,
            ..Default::default()
        }
    }

    pub fn state(&self) -> ReassignState {
        if self.committing {
            ReassignState::Committing
        } else if self.pending.is_some() {
            ReassignState::PendingConfirm
        } else if self.drag.drop_target_id.is_some() {
            ReassignState::TargetHover
        } else if self.drag.is_active() {
            ReassignState::Dragging
        } else {
            ReassignState::Idle
        }
    }

    pub fn drag_session(&self) -> &DragSession {
        &self.drag
    }

    pub fn pending(&self) -> Option<&PendingReassignment> {
        self.pending.as_ref()
    }

    pub fn is_committing(&self) -> bool {
        self.committing
    }

    pub fn editing_allowed(&self) -> bool {
        self.edit_mode && self.can_edit
    }

    /// Leaving edit mode abandons any drag in progress
    pub fn set_edit_mode(&mut self, enabled: bool) {
        self.edit_mode = enabled;
        if !enabled {
            self.drag = DragSession::default();
        }
    }

    pub fn start_drag(&mut self, employee: EmployeeRef) -> Result<(), Rejection> {
        if !self.editing_allowed() {
            return Err(Rejection::EditingDisabled);
        }
        if self.committing {
            return Err(Rejection::CommitInFlight);
        }
        if self.pending.is_some() {
            return Err(Rejection::ConfirmationPending);
        }
        self.drag = DragSession {
            dragged_employee: Some(employee),
            drop_target_id: None,
        };
        Ok(())
    }

    /// Self-targets are never highlighted
    pub fn hover_target(&mut self, target_id: &NodeId) -> Result<(), Rejection> {
        let dragged = self
            .drag
            .dragged_employee
            .as_ref()
            .ok_or(Rejection::NoActiveDrag)?;
        if &dragged.id == target_id {
            return Err(Rejection::SelfTarget);
        }
        self.drag.drop_target_id = Some(target_id.clone());
        Ok(())
    }

    pub fn end_drag(&mut self) {
        self.drag = DragSession::default();
    }

    /// Stage a reassignment. The gesture is over either way, so the drag
    /// session is cleared even when the drop is rejected.
    pub fn drop_on(&mut self, target: DropTarget) -> Result<&PendingReassignment, Rejection> {
        let drag = std::mem::take(&mut self.drag);
        let employee = drag.dragged_employee.ok_or(Rejection::NoActiveDrag)?;
        if self.committing {
            return Err(Rejection::CommitInFlight);
        }
        if employee.id == target.id {
            return Err(Rejection::SelfTarget);
        }
        Ok(&*self
            .pending
            .insert(PendingReassignment { employee, target }))
    }

    /// Enter `Committing`; the pending reassignment stays visible until
    /// [`finish_commit`](Self::finish_commit)
    pub fn begin_commit(&mut self) -> Result<PendingReassignment, Rejection> {
        if self.committing {
            return Err(Rejection::CommitInFlight);
        }
        let pending = self.pending.clone().ok_or(Rejection::NothingPending)?;
        self.committing = true;
        Ok(pending)
    }

    /// Success and failure both land in `Idle`; a failed commit is re-initiated by dragging again
    pub fn finish_commit(&mut self) {
        self.committing = false;
        self.pending = None;
    }

    pub fn cancel(&mut self) -> Result<PendingReassignment, Rejection> {
        if self.committing {
            return Err(Rejection::CommitInFlight);
        }
        self.pending.take().ok_or(Rejection::NothingPending)
    }
}
