use leverset::{
    error::{ErrorCode, LeverResult},
    validate,
};
use soroban_sdk::{log, Env};

use crate::{
    ledger::PositionLedger,
    storage::{is_locked, set_locked},
};

/// Runs `operation` against a fresh ledger snapshot while holding the index
/// lock. The snapshot is committed only if the operation succeeds; on error it
/// is dropped and the contract call fails, which also reverts every gateway
/// effect made in between.
pub fn atomically<T, F>(env: &Env, operation: F) -> LeverResult<T>
where
    F: FnOnce(&mut PositionLedger) -> LeverResult<T>,
{
    validate!(
        env,
        !is_locked(env),
        ErrorCode::OperationInProgress,
        "Leveraged Index: another operation is in flight"
    )?;
    set_locked(env, true);

    let mut ledger = PositionLedger::load(env);
    let result = operation(&mut ledger);

    let result = match result {
        Ok(output) => ledger.commit(env).map(|_| output),
        Err(error_code) => {
            log!(env, "Leveraged Index: operation rolled back with error {}", error_code as u32);
            Err(error_code)
        }
    };

    set_locked(env, false);
    result
}
