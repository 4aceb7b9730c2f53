pub(crate) mod deployment_repository;
pub(crate) mod token_contract_repository;
pub(crate) mod transaction_repository;
