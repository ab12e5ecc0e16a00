//! Reassignment controller: the state machine plus the directory round-trip.
//!
//! All methods take `&self` so the UI can share one controller. The machine
//! sits behind a mutex that is never held across an `.await`; the
//! `committing` flag is what keeps a second confirm from overlapping the first.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use directory_client::DirectoryClient;
use org_hierarchy_types::{EmployeeRecord, ManagerAssignment, NodeId};

use super::{
    DragSession, DropTarget, EmployeeRef, ManagerType, PendingReassignment, ReassignMachine,
    ReassignOutcome, ReassignState, Rejection, TargetKind,
};
use crate::config::ControllerConfig;
use crate::error::{ReassignError, ReassignResult};
use crate::managers::ManagerListEditor;

pub struct ReassignmentController<C: ?Sized> {
    editor: ManagerListEditor<C>,
    machine: Mutex<ReassignMachine>,
    commit_timeout: Option<Duration>,
}

impl<C: DirectoryClient + ?Sized> ReassignmentController<C> {
    /// `can_edit_hierarchy` comes from the caller's permission check
    pub fn new(client: Arc<C>, can_edit_hierarchy: bool, config: &ControllerConfig) -> Self {
        Self {
            editor: ManagerListEditor::new(client),
            machine: Mutex::new(ReassignMachine::new(can_edit_hierarchy)),
            commit_timeout: config.commit_timeout(),
        }
    }

    fn machine(&self) -> MutexGuard<'_, ReassignMachine> {
        self.machine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> ReassignState {
        self.machine().state()
    }

    pub fn drag_session(&self) -> DragSession {
        self.machine().drag_session().clone()
    }

    pub fn pending(&self) -> Option<PendingReassignment> {
        self.machine().pending().cloned()
    }

    pub fn set_edit_mode(&self, enabled: bool) {
        self.machine().set_edit_mode(enabled);
    }

    pub fn start_drag(&self, employee: EmployeeRef) -> Result<(), Rejection> {
        let employee_id = employee.id.clone();
        let result = self.machine().start_drag(employee);
        log_rejection("start_drag", &employee_id, result)
    }

    pub fn hover_target(&self, target_id: &NodeId) -> Result<(), Rejection> {
        let result = self.machine().hover_target(target_id);
        log_rejection("hover_target", target_id, result)
    }

    pub fn end_drag(&self) {
        self.machine().end_drag();
    }

    /// Stage the drop for confirmation; never touches the directory
    pub fn drop_on(&self, target: DropTarget) -> Result<PendingReassignment, Rejection> {
        let target_id = target.id.clone();
        let result = self.machine().drop_on(target).cloned();
        if let Ok(pending) = &result {
            tracing::debug!(
                employee = %pending.employee.id,
                target = %pending.target.id,
                kind = ?pending.target.kind,
                "reassignment staged"
            );
        }
        log_rejection("drop", &target_id, result)
    }

    pub fn cancel(&self) -> ReassignResult<ReassignOutcome> {
        match self.machine().cancel() {
            Ok(pending) => {
                tracing::debug!(employee = %pending.employee.id, "reassignment cancelled");
                Ok(ReassignOutcome::Cancelled)
            }
            Err(Rejection::CommitInFlight) => Err(ReassignError::CommitInFlight),
            Err(_) => Err(ReassignError::NothingPending),
        }
    }

    /// Commit the pending reassignment.
    ///
    /// `manager_type` is ignored for department targets. Whatever the
    /// outcome, the pending reassignment is gone afterwards and the
    /// controller is back in `Idle`.
    pub async fn confirm(&self, manager_type: ManagerType) -> ReassignResult<ReassignOutcome> {
        let pending = match self.machine().begin_commit() {
            Ok(pending) => pending,
            Err(Rejection::CommitInFlight) => {
                tracing::debug!("confirm ignored, commit already in flight");
                return Err(ReassignError::CommitInFlight);
            }
            Err(_) => return Err(ReassignError::NothingPending),
        };

        let result = match self.commit_timeout {
            Some(limit) => match tokio::time::timeout(limit, self.commit(&pending, manager_type)).await {
                Ok(result) => result,
                Err(_) => {
                    let after_ms = whole_millis(limit);
                    // The PATCH may still land server-side; the next refresh shows it
                    tracing::warn!(
                        employee = %pending.employee.id,
                        after_ms,
                        "reassignment commit timed out"
                    );
                    Err(ReassignError::CommitTimedOut { after_ms })
                }
            },
            None => self.commit(&pending, manager_type).await,
        };

        self.machine().finish_commit();

        match result {
            Ok(_) => {
                tracing::info!(
                    employee = %pending.employee.id,
                    target = %pending.target.id,
                    "reassignment committed"
                );
                Ok(ReassignOutcome::HierarchyChanged {
                    employee_id: pending.employee.id,
                })
            }
            Err(err) => {
                if err.is_warning() {
                    tracing::debug!(error = %err, "reassignment rejected locally");
                }
                Err(err)
            }
        }
    }

    async fn commit(
        &self,
        pending: &PendingReassignment,
        manager_type: ManagerType,
    ) -> ReassignResult<EmployeeRecord> {
        let employee_id = &pending.employee.id;
        let target = &pending.target;
        match target.kind {
            TargetKind::Department => {
                // A department drop is a direct update; the read only surfaces a missing employee
                self.editor.load(employee_id).await?;
                self.editor.assign_department(employee_id, &target.id).await
            }
            TargetKind::Employee => {
                let assignment = ManagerAssignment {
                    manager_id: target.id.clone(),
                    department_id: target.department_id.clone(),
                    job_position_id: target.job_position_id.clone(),
                };
                self.editor
                    .add_manager(employee_id, manager_type, assignment)
                    .await
            }
        }
    }
}

fn whole_millis(limit: Duration) -> u64 {
    u64::try_from(limit.as_millis()).unwrap_or(u64::MAX)
}

fn log_rejection<T>(event: &str, id: &NodeId, result: Result<T, Rejection>) -> Result<T, Rejection> {
    if let Err(rejection) = &result {
        tracing::debug!(event = event, id = %id, %rejection, "reassignment event ignored");
    }
    result
}
