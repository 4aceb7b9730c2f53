use alloy::primitives::Address;

use crate::{
    client::{ChainReader, ContractCall},
    revert::{RevertDecoder, RevertReason},
};

/// Dry-runs `call` as `from` against current state.
///
/// Every write must pass this before it is signed; a rejection carries the
/// decoded revert reason.
pub async fn simulate(
    reader: &dyn ChainReader,
    decoder: &RevertDecoder,
    call: &ContractCall,
    from: Address,
) -> Result<(), RevertReason> {
    match reader.simulate_call(call, from).await {
        Ok(_) => Ok(()),
        Err(failure) => {
            let reason = decoder.decode(&failure);
            tracing::debug!(
                chain_id = %reader.chain_id(),
                function = %call.function,
                to = %call.to,
                from = %from,
                frames = failure.frames().len(),
                reason = %reason,
                "Simulation rejected call"
            );
            Err(reason)
        }
    }
}
