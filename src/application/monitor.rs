use std::{sync::Arc, time::Instant};

use tokenops_blockchain::{B256, ChainReader};
use tokenops_domain::TransactionStatus;
use tokenops_observability::record_confirmation;
use tokenops_repository::{Completion, TransactionRepository};
use tokio::task::JoinHandle;

const RECEIPT_UNAVAILABLE: &str = "Failed to get transaction receipt";

/// Waits once for a submitted transaction's receipt and settles its ledger row.
///
/// Each monitor is detached from the request that spawned it; nothing is
/// retried and an unavailable receipt settles the row as failed.
#[derive(Clone)]
pub(crate) struct ConfirmationMonitor {
    transactions: TransactionRepository,
}

impl ConfirmationMonitor {
    pub(crate) fn new(transactions: TransactionRepository) -> Self {
        Self { transactions }
    }

    pub(crate) fn spawn(
        &self,
        reader: Arc<dyn ChainReader>,
        transaction_hash: B256,
        record_id: String,
    ) -> JoinHandle<()> {
        let monitor = self.clone();
        tokio::spawn(async move {
            monitor
                .reconcile(reader.as_ref(), transaction_hash, &record_id)
                .await
        })
    }

    pub(crate) async fn reconcile(
        &self,
        reader: &dyn ChainReader,
        transaction_hash: B256,
        record_id: &str,
    ) {
        let started = Instant::now();
        let completion = match reader.wait_for_receipt(transaction_hash).await {
            Ok(receipt) => Completion {
                status: if receipt.success {
                    TransactionStatus::Confirmed
                } else {
                    TransactionStatus::Failed
                },
                gas_used: Some(receipt.gas_used.to_string()),
                error_message: None,
            },
            Err(error) => {
                tracing::warn!(
                    tx_hash = %transaction_hash,
                    record_id = %record_id,
                    error = %error,
                    "Receipt unavailable, marking transaction failed"
                );
                Completion {
                    status: TransactionStatus::Failed,
                    gas_used: None,
                    error_message: Some(RECEIPT_UNAVAILABLE.to_string()),
                }
            }
        };
        let status = completion.status;

        match self.transactions.complete(record_id, completion).await {
            Ok(true) => {
                record_confirmation(status.as_str(), started.elapsed());
                tracing::info!(
                    tx_hash = %transaction_hash,
                    record_id = %record_id,
                    status = %status.as_str(),
                    "Transaction settled"
                );
            }
            Ok(false) => {
                tracing::debug!(
                    tx_hash = %transaction_hash,
                    record_id = %record_id,
                    "Transaction record already settled"
                );
            }
            Err(error) => {
                tracing::error!(
                    tx_hash = %transaction_hash,
                    record_id = %record_id,
                    error = %error,
                    "Failed to update transaction status"
                );
            }
        }
    }
}
