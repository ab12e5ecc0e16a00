//! Manager list editing
//!
//! Read-modify-write helpers over an employee's primary/secondary manager
//! lists. The directory replaces lists wholesale, so every write re-reads the
//! current record first and sends the full updated list. This narrows, but
//! does not close, the window for overwriting a concurrent edit.

use std::sync::Arc;

use directory_client::DirectoryClient;
use org_hierarchy_types::{EmployeePatch, EmployeeRecord, ManagerAssignment, NodeId};

use crate::error::{ReassignError, ReassignResult};
use crate::reassign::ManagerType;

/// The list a manager type refers to
pub fn managers_of(record: &EmployeeRecord, manager_type: ManagerType) -> &[ManagerAssignment] {
    match manager_type {
        ManagerType::Primary => &record.primary_managers,
        ManagerType::Secondary => &record.secondary_managers,
    }
}

/// Patch replacing exactly one manager list
pub fn manager_patch(manager_type: ManagerType, managers: Vec<ManagerAssignment>) -> EmployeePatch {
    match manager_type {
        ManagerType::Primary => EmployeePatch {
            primary_managers: Some(managers),
            ..Default::default()
        },
        ManagerType::Secondary => EmployeePatch {
            secondary_managers: Some(managers),
            ..Default::default()
        },
    }
}

/// Backs the "edit managers" context menu and the drag-and-drop commit
pub struct ManagerListEditor<C: ?Sized> {
    client: Arc<C>,
}

impl<C: ?Sized> Clone for ManagerListEditor<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<C: DirectoryClient + ?Sized> ManagerListEditor<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    pub async fn load(&self, employee_id: &NodeId) -> ReassignResult<EmployeeRecord> {
        Ok(self.client.get_employee(employee_id).await?)
    }

    /// Append `assignment` unless that manager is already in the list
    pub async fn add_manager(
        &self,
        employee_id: &NodeId,
        manager_type: ManagerType,
        assignment: ManagerAssignment,
    ) -> ReassignResult<EmployeeRecord> {
        let record = self.client.get_employee(employee_id).await?;
        let current = managers_of(&record, manager_type);

        if current
            .iter()
            .any(|m| m.manager_id == assignment.manager_id)
        {
            tracing::warn!(
                employee = %employee_id,
                manager = %assignment.manager_id,
                %manager_type,
                "manager already assigned, skipping write"
            );
            return Err(ReassignError::AlreadyAssigned {
                employee_id: employee_id.clone(),
                manager_id: assignment.manager_id,
                manager_type,
            });
        }

        let mut updated = current.to_vec();
        updated.push(assignment);
        self.write(employee_id, manager_patch(manager_type, updated))
            .await
    }

    pub async fn remove_manager(
        &self,
        employee_id: &NodeId,
        manager_type: ManagerType,
        manager_id: &NodeId,
    ) -> ReassignResult<EmployeeRecord> {
        let record = self.client.get_employee(employee_id).await?;
        let current = managers_of(&record, manager_type);

        let remaining: Vec<ManagerAssignment> = current
            .iter()
            .filter(|m| &m.manager_id != manager_id)
            .cloned()
            .collect();
        if remaining.len() == current.len() {
            return Err(ReassignError::NotAssigned {
                employee_id: employee_id.clone(),
                manager_id: manager_id.clone(),
                manager_type,
            });
        }

        self.write(employee_id, manager_patch(manager_type, remaining))
            .await
    }

    /// Overwrite one list. Duplicate manager ids keep their first occurrence.
    pub async fn replace_managers(
        &self,
        employee_id: &NodeId,
        manager_type: ManagerType,
        managers: Vec<ManagerAssignment>,
    ) -> ReassignResult<EmployeeRecord> {
        let mut unique: Vec<ManagerAssignment> = Vec::with_capacity(managers.len());
        for manager in managers {
            if !unique.iter().any(|m| m.manager_id == manager.manager_id) {
                unique.push(manager);
            }
        }
        self.write(employee_id, manager_patch(manager_type, unique))
            .await
    }

    /// Department change from the edit form; rejects a move to the current department
    pub async fn move_to_department(
        &self,
        employee_id: &NodeId,
        department_id: &NodeId,
    ) -> ReassignResult<EmployeeRecord> {
        let record = self.client.get_employee(employee_id).await?;
        if record.department.as_ref() == Some(department_id) {
            return Err(ReassignError::AlreadyInDepartment {
                employee_id: employee_id.clone(),
                department_id: department_id.clone(),
            });
        }
        self.assign_department(employee_id, department_id).await
    }

    /// PATCH `{department}` as is
    pub async fn assign_department(
        &self,
        employee_id: &NodeId,
        department_id: &NodeId,
    ) -> ReassignResult<EmployeeRecord> {
        let patch = EmployeePatch {
            department: Some(department_id.clone()),
            ..Default::default()
        };
        self.write(employee_id, patch).await
    }

    async fn write(&self, employee_id: &NodeId, patch: EmployeePatch) -> ReassignResult<EmployeeRecord> {
        match self.client.patch_employee(employee_id, patch).await {
            Ok(record) => {
                tracing::info!(employee = %employee_id, "employee assignment updated");
                Ok(record)
            }
            Err(err) => {
                tracing::warn!(employee = %employee_id, error = %err, "employee update failed");
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use directory_client::{DirectoryError, InMemoryDirectory};

    fn record(primary: &[&str], secondary: &[&str]) -> EmployeeRecord {
        EmployeeRecord {
            primary_managers: primary.iter().map(|id| ManagerAssignment::new(*id)).collect(),
            secondary_managers: secondary.iter().map(|id| ManagerAssignment::new(*id)).collect(),
            department: Some("10".into()),
            ..Default::default()
        }
    }

    fn editor(directory: &Arc<InMemoryDirectory>) -> ManagerListEditor<InMemoryDirectory> {
        ManagerListEditor::new(Arc::clone(directory))
    }

    #[tokio::test]
    async fn test_add_manager_appends_full_list() {
        let directory = Arc::new(InMemoryDirectory::default().with_employee("3", record(&["8"], &[])));
        let id = NodeId::from("3");

        let updated = editor(&directory)
            .add_manager(&id, ManagerType::Primary, ManagerAssignment::new("1"))
            .await
            .unwrap();

        let ids: Vec<&str> = updated
            .primary_managers
            .iter()
            .map(|m| m.manager_id.as_str())
            .collect();
        assert_eq!(ids, vec!["8", "1"]);
        let (_, patch) = &directory.patches()[0];
        assert!(patch.secondary_managers.is_none());
        assert_eq!(patch.primary_managers.as_ref().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_add_duplicate_is_warning_without_write() {
        let directory = Arc::new(InMemoryDirectory::default().with_employee("3", record(&[], &["1"])));
        let err = editor(&directory)
            .add_manager(&"3".into(), ManagerType::Secondary, ManagerAssignment::new("1"))
            .await
            .unwrap_err();
        assert!(err.is_warning());
        assert_eq!(directory.patch_count(), 0);
    }

    #[tokio::test]
    async fn test_remove_manager() {
        let directory = Arc::new(InMemoryDirectory::default().with_employee("3", record(&["1", "2"], &[])));
        let editor = editor(&directory);
        let id = NodeId::from("3");

        let updated = editor
            .remove_manager(&id, ManagerType::Primary, &"1".into())
            .await
            .unwrap();
        assert_eq!(updated.primary_managers, vec![ManagerAssignment::new("2")]);

        let err = editor
            .remove_manager(&id, ManagerType::Primary, &"1".into())
            .await
            .unwrap_err();
        assert!(matches!(err, ReassignError::NotAssigned { .. }));
        assert_eq!(directory.patch_count(), 1);
    }

    #[tokio::test]
    async fn test_replace_dedupes() {
        let directory = Arc::new(InMemoryDirectory::default().with_employee("3", record(&[], &[])));
        let updated = editor(&directory)
            .replace_managers(
                &"3".into(),
                ManagerType::Secondary,
                vec![
                    ManagerAssignment::new("1"),
                    ManagerAssignment::new("2"),
                    ManagerAssignment::new("1"),
                ],
            )
            .await
            .unwrap();
        assert_eq!(updated.secondary_managers.len(), 2);
    }

    #[tokio::test]
    async fn test_move_to_same_department_is_noop() {
        let directory = Arc::new(InMemoryDirectory::default().with_employee("3", record(&[], &[])));
        let editor = editor(&directory);

        let err = editor
            .move_to_department(&"3".into(), &"10".into())
            .await
            .unwrap_err();
        assert!(matches!(err, ReassignError::AlreadyInDepartment { .. }));

        let updated = editor
            .move_to_department(&"3".into(), &"20".into())
            .await
            .unwrap();
        assert_eq!(updated.department, Some(NodeId::from("20")));
        assert_eq!(directory.patch_count(), 1);
    }

    #[tokio::test]
    async fn test_server_failure_propagates() {
        let directory = Arc::new(InMemoryDirectory::default().with_employee("3", record(&[], &[])));
        directory.fail_next_patch(DirectoryError::from_status(
            400,
            r#"{"detail": "Geçersiz yönetici"}"#.to_string(),
        ));
        let err = editor(&directory)
            .add_manager(&"3".into(), ManagerType::Primary, ManagerAssignment::new("1"))
            .await
            .unwrap_err();
        assert!(!err.is_warning());
        assert_eq!(err.user_message(), "Geçersiz yönetici");
    }
}
