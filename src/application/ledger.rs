use tokenops_repository::{TransactionRecord, TransactionRepository};

use super::OrchestratorError;

/// Read access to the write ledger.
#[derive(Clone)]
pub(crate) struct TransactionLedger {
    transactions: TransactionRepository,
}

impl TransactionLedger {
    pub(crate) fn new(transactions: TransactionRepository) -> Self {
        Self { transactions }
    }

    pub(crate) async fn list(&self) -> Result<Vec<TransactionRecord>, OrchestratorError> {
        Ok(self.transactions.list_all().await?)
    }

    /// Unknown deployment ids yield an empty list.
    pub(crate) async fn by_deployment(
        &self,
        deployment_id: &str,
    ) -> Result<Vec<TransactionRecord>, OrchestratorError> {
        Ok(self.transactions.list_by_deployment(deployment_id).await?)
    }
}
