use std::sync::Arc;

use tokenops_repository::{NewTokenContract, RepositoryManager, TableCounts};

use super::{OrchestratorError, TemplateRegistry};

/// Phrase a caller must send to wipe the store.
pub(crate) const CONFIRMATION_PHRASE: &str = "DELETE ALL DATA";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ResetOutcome {
    pub deleted: TableCounts,
    pub seeded: usize,
}

/// Maintenance operations over the whole store.
pub(crate) struct DatabaseAdmin {
    repository: Arc<RepositoryManager>,
    templates: TemplateRegistry,
    seeds: Vec<NewTokenContract>,
}

impl DatabaseAdmin {
    pub(crate) fn new(
        repository: Arc<RepositoryManager>,
        templates: TemplateRegistry,
        seeds: Vec<NewTokenContract>,
    ) -> Self {
        Self {
            repository,
            templates,
            seeds,
        }
    }

    pub(crate) async fn stats(&self) -> Result<TableCounts, OrchestratorError> {
        Ok(self.repository.table_counts().await?)
    }

    /// Deletes every row. Returns the rows removed per table.
    pub(crate) async fn clear(&self, confirmation: &str) -> Result<TableCounts, OrchestratorError> {
        ensure_confirmed(confirmation)?;
        Ok(self.repository.purge_all().await?)
    }

    /// Deletes every row, then reinstalls the configured seed templates.
    pub(crate) async fn reset(&self, confirmation: &str) -> Result<ResetOutcome, OrchestratorError> {
        ensure_confirmed(confirmation)?;
        let deleted = self.repository.purge_all().await?;
        let seeded = self.templates.install_seeds(&self.seeds).await?;
        tracing::info!(
            deleted = deleted.total(),
            seeded,
            "Database reset"
        );
        Ok(ResetOutcome { deleted, seeded })
    }

    /// Startup seeding; existing templates are left alone.
    pub(crate) async fn seed(&self) -> Result<usize, OrchestratorError> {
        self.templates.install_seeds(&self.seeds).await
    }
}

fn ensure_confirmed(confirmation: &str) -> Result<(), OrchestratorError> {
    if confirmation == CONFIRMATION_PHRASE {
        Ok(())
    } else {
        Err(OrchestratorError::ConfirmationRequired {
            expected: CONFIRMATION_PHRASE,
        })
    }
}
