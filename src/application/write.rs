//! Write orchestration: resolve, simulate, submit, record, hand off.
//!
//! A write is recorded exactly once in the ledger. Rejected simulations and
//! failed submissions become `failed` rows with the sentinel hash; accepted
//! submissions become `pending` rows that only the confirmation monitor
//! moves on.

use std::{sync::Arc, time::Instant};

use serde_json::Value;
use tokenops_blockchain::{
    AccountRegistry, Address, B256, ContractCall, PrivateKeySigner, RevertDecoder, simulate,
};
use tokenops_domain::{AccountRole, CallArg, SENTINEL_TRANSACTION_HASH, TransactionStatus};
use tokenops_observability::record_write_outcome;
use tokenops_repository::{NewTransactionRecord, TransactionRecord, TransactionRepository};

use super::{
    ConfirmationMonitor, OrchestratorConfig, OrchestratorError, ResolvedToken, TokenResolver,
    resolution::prepare_arguments,
};

#[derive(Debug, Clone)]
pub(crate) struct WriteRequest {
    pub contract_address: String,
    /// Falls back to the chain's default endpoint.
    pub rpc_url: Option<String>,
    pub account: AccountRole,
    pub function: String,
    pub args: Vec<CallArg>,
}

#[derive(Debug, Clone)]
pub(crate) struct WriteOutcome {
    pub transaction_hash: B256,
    pub record: TransactionRecord,
}

pub(crate) struct WriteOrchestrator {
    resolver: TokenResolver,
    accounts: Arc<AccountRegistry>,
    transactions: TransactionRepository,
    monitor: ConfirmationMonitor,
    gas_limit: u64,
}

impl WriteOrchestrator {
    pub(crate) fn new(
        resolver: TokenResolver,
        accounts: Arc<AccountRegistry>,
        transactions: TransactionRepository,
        config: &OrchestratorConfig,
    ) -> Self {
        Self {
            resolver,
            accounts,
            monitor: ConfirmationMonitor::new(transactions.clone()),
            transactions,
            gas_limit: config.write_gas_limit,
        }
    }

    /// Returns as soon as the transaction is accepted by the node; the
    /// receipt is reconciled in the background.
    pub(crate) async fn execute_write(
        &self,
        request: WriteRequest,
    ) -> Result<WriteOutcome, OrchestratorError> {
        let started = Instant::now();
        let result = self.run(&request).await;

        let outcome = match &result {
            Ok(_) => "submitted",
            Err(error) => error.outcome_label(),
        };
        record_write_outcome(&request.function, outcome, started.elapsed());
        result
    }

    async fn run(&self, request: &WriteRequest) -> Result<WriteOutcome, OrchestratorError> {
        let token = self.resolver.resolve(&request.contract_address).await?;
        let signer = self.resolve_signer(request.account)?;
        let from = signer.address();

        let (values, parameters) =
            prepare_arguments(request.args.clone(), token.deployment.decimals)?;
        let call = token
            .abi
            .encode_call(token.address, &request.function, values)
            .map_err(|e| OrchestratorError::InvalidCall(e.to_string()))?;

        let rpc_url = request.rpc_url.as_deref();
        let reader = self.resolver.reader(token.chain_id(), rpc_url)?;
        let writer = self
            .resolver
            .chains()
            .writer(token.chain_id(), rpc_url, signer)
            .map_err(OrchestratorError::from_connector)?;

        let decoder = RevertDecoder::new(&token.abi);
        if let Err(reason) = simulate(reader.as_ref(), &decoder, &call, from).await {
            tracing::info!(
                contract_address = %token.address,
                function = %request.function,
                from = %from,
                reason = %reason,
                "Write rejected by simulation"
            );
            self.record_rejection(&token, &call, parameters, from, reason.to_string())
                .await;
            return Err(OrchestratorError::SimulationRejected(reason));
        }

        let transaction_hash = match writer.submit_call(&call, Some(self.gas_limit)).await {
            Ok(hash) => hash,
            Err(error) => {
                let message = error.to_string();
                self.recover(request, &parameters, &message).await;
                return Err(OrchestratorError::SubmissionFailed { message });
            }
        };

        let pending = NewTransactionRecord {
            deployment_id: token.deployment.id.clone(),
            transaction_hash: transaction_hash.to_string(),
            function_name: call.function.clone(),
            parameters: parameters.clone(),
            from_address: from.to_checksum(None),
            status: TransactionStatus::Pending,
            error_message: None,
        };
        let record = match self.transactions.create(pending).await {
            Ok(record) => record,
            Err(error) => {
                tracing::error!(
                    tx_hash = %transaction_hash,
                    function = %request.function,
                    error = %error,
                    "Transaction submitted but pending record could not be stored"
                );
                let message = error.to_string();
                self.recover(request, &parameters, &message).await;
                return Err(OrchestratorError::SubmissionFailed { message });
            }
        };

        tracing::info!(
            contract_address = %token.address,
            function = %request.function,
            from = %from,
            tx_hash = %transaction_hash,
            record_id = %record.id,
            "Transaction submitted"
        );

        self.monitor
            .spawn(reader, transaction_hash, record.id.clone());

        Ok(WriteOutcome {
            transaction_hash,
            record,
        })
    }

    fn resolve_signer(&self, role: AccountRole) -> Result<PrivateKeySigner, OrchestratorError> {
        self.accounts.resolve_signer(role).map_err(|_| {
            OrchestratorError::MisconfiguredAccount(format!(
                "Private key for account {} not configured in environment",
                role
            ))
        })
    }

    async fn record_rejection(
        &self,
        token: &ResolvedToken,
        call: &ContractCall,
        parameters: Value,
        from: Address,
        error_message: String,
    ) {
        let record = NewTransactionRecord {
            deployment_id: token.deployment.id.clone(),
            transaction_hash: SENTINEL_TRANSACTION_HASH.to_string(),
            function_name: call.function.clone(),
            parameters,
            from_address: from.to_checksum(None),
            status: TransactionStatus::Failed,
            error_message: Some(error_message),
        };
        if let Err(error) = self.transactions.create(record).await {
            tracing::error!(
                contract_address = %token.address,
                function = %call.function,
                error = %error,
                "Failed to record rejected write"
            );
        }
    }

    /// Best-effort `failed` row after a submission-phase error. Resolution is
    /// repeated from scratch and every error here is logged and dropped.
    async fn recover(&self, request: &WriteRequest, parameters: &Value, message: &str) {
        let deployment = match self
            .resolver
            .find_deployment(&request.contract_address)
            .await
        {
            Ok(Some(deployment)) => deployment,
            Ok(None) => {
                tracing::error!(
                    contract_address = %request.contract_address,
                    "Deployment vanished before the failed write could be recorded"
                );
                return;
            }
            Err(error) => {
                tracing::error!(
                    contract_address = %request.contract_address,
                    error = %error,
                    "Failed to record error in database"
                );
                return;
            }
        };
        let Some(from) = self.accounts.address(request.account) else {
            return;
        };

        let record = NewTransactionRecord {
            deployment_id: deployment.id,
            transaction_hash: SENTINEL_TRANSACTION_HASH.to_string(),
            function_name: request.function.clone(),
            parameters: parameters.clone(),
            from_address: from.to_checksum(None),
            status: TransactionStatus::Failed,
            error_message: Some(message.to_string()),
        };
        if let Err(error) = self.transactions.create(record).await {
            tracing::error!(
                contract_address = %request.contract_address,
                function = %request.function,
                error = %error,
                "Failed to record error in database"
            );
        }
    }
}
