//! Chart loading: fetch the hierarchy and transform it.
//!
//! Called on first render and again whenever a reassignment reports
//! [`ReassignOutcome::HierarchyChanged`](crate::reassign::ReassignOutcome).

use std::sync::Arc;

use directory_client::DirectoryClient;
use org_hierarchy_types::OrgNode;

use crate::config::EngineConfig;
use crate::error::ReassignResult;
use crate::reassign::ReassignmentController;
use crate::transform::{count_employees, HierarchyTransformer};

pub struct OrgChartService<C: ?Sized> {
    client: Arc<C>,
    transformer: HierarchyTransformer,
    config: EngineConfig,
}

impl<C: DirectoryClient + ?Sized> OrgChartService<C> {
    pub fn new(client: Arc<C>, config: EngineConfig) -> Self {
        let transformer =
            HierarchyTransformer::new(config.rules.clone(), config.transform.clone());
        Self {
            client,
            transformer,
            config,
        }
    }

    pub fn transformer(&self) -> &HierarchyTransformer {
        &self.transformer
    }

    /// Fetch and transform. `None` when no department is visible.
    pub async fn load(&self) -> ReassignResult<Option<OrgNode>> {
        let raw = self.client.get_hierarchy().await?;
        let ingested = self.transformer.ingest(&raw);
        let visible: usize = ingested.iter().map(count_employees).sum();

        let chart = self.transformer.transform(&raw);
        let rendered = chart.as_ref().map(count_employees).unwrap_or(0);
        if rendered != visible {
            tracing::warn!(visible, rendered, "employee count changed during transform");
        }
        tracing::info!(
            departments = raw.len(),
            employees = rendered,
            "org chart loaded"
        );
        Ok(chart)
    }

    /// Controller sharing this service's directory client
    pub fn reassignment_controller(&self, can_edit_hierarchy: bool) -> ReassignmentController<C> {
        ReassignmentController::new(
            Arc::clone(&self.client),
            can_edit_hierarchy,
            &self.config.controller,
        )
    }
}
