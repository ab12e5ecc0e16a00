//! In-process directory: keeps the hierarchy and employee records in memory.
//!
//! Used by tests and demos. Every PATCH is recorded so callers can assert on
//! exactly which writes were issued.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use org_hierarchy_types::{EmployeePatch, EmployeeRecord, NodeId, RawDepartment};

use crate::{DirectoryClient, DirectoryError, Result};

#[derive(Default)]
struct State {
    hierarchy: Vec<RawDepartment>,
    employees: HashMap<NodeId, EmployeeRecord>,
    patches: Vec<(NodeId, EmployeePatch)>,
    reads: usize,
    next_patch_error: Option<DirectoryError>,
    next_read_error: Option<DirectoryError>,
}

#[derive(Default)]
pub struct InMemoryDirectory {
    state: Mutex<State>,
    latency: Option<Duration>,
}

impl InMemoryDirectory {
    pub fn new(hierarchy: Vec<RawDepartment>) -> Self {
        let directory = Self::default();
        directory.lock().hierarchy = hierarchy;
        directory
    }

    /// Delay every call, to keep a commit in flight in tests
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn with_employee(self, id: impl Into<NodeId>, record: EmployeeRecord) -> Self {
        self.insert_employee(id, record);
        self
    }

    pub fn insert_employee(&self, id: impl Into<NodeId>, record: EmployeeRecord) {
        let id = id.into();
        let record = EmployeeRecord {
            id: Some(id.clone()),
            ..record
        };
        self.lock().employees.insert(id, record);
    }

    pub fn set_hierarchy(&self, hierarchy: Vec<RawDepartment>) {
        self.lock().hierarchy = hierarchy;
    }

    /// Fail the next PATCH with `error`
    pub fn fail_next_patch(&self, error: DirectoryError) {
        self.lock().next_patch_error = Some(error);
    }

    /// Fail the next employee read with `error`
    pub fn fail_next_read(&self, error: DirectoryError) {
        self.lock().next_read_error = Some(error);
    }

    pub fn patches(&self) -> Vec<(NodeId, EmployeePatch)> {
        self.lock().patches.clone()
    }

    pub fn patch_count(&self) -> usize {
        self.lock().patches.len()
    }

    pub fn read_count(&self) -> usize {
        self.lock().reads
    }

    pub fn employee(&self, id: &NodeId) -> Option<EmployeeRecord> {
        self.lock().employees.get(id).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl DirectoryClient for InMemoryDirectory {
    async fn get_hierarchy(&self) -> Result<Vec<RawDepartment>> {
        self.simulate_latency().await;
        Ok(self.lock().hierarchy.clone())
    }

    async fn get_employee(&self, id: &NodeId) -> Result<EmployeeRecord> {
        self.simulate_latency().await;
        let mut state = self.lock();
        state.reads += 1;
        if let Some(err) = state.next_read_error.take() {
            return Err(err);
        }
        state
            .employees
            .get(id)
            .cloned()
            .ok_or_else(|| DirectoryError::not_found(id, ""))
    }

    async fn patch_employee(&self, id: &NodeId, patch: EmployeePatch) -> Result<EmployeeRecord> {
        self.simulate_latency().await;
        let mut state = self.lock();
        if let Some(err) = state.next_patch_error.take() {
            return Err(err);
        }
        state.patches.push((id.clone(), patch.clone()));

        let record = state
            .employees
            .get_mut(id)
            .ok_or_else(|| DirectoryError::not_found(id, ""))?;
        if let Some(primary) = patch.primary_managers {
            record.primary_managers = primary;
        }
        if let Some(secondary) = patch.secondary_managers {
            record.secondary_managers = secondary;
        }
        if let Some(department) = patch.department {
            record.department = Some(department);
        }
        Ok(record.clone())
    }
}
