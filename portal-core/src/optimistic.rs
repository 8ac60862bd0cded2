//! Optimistic update helper
//!
//! The local state is changed before the request is sent so the UI reflects
//! the user's intent immediately. `mutate` returns the original value of
//! whatever it touched (one entity, one field); if the request fails,
//! `rollback` puts exactly that back. Anything else that changed the state
//! while the request was in flight (a page fetch, a detail load, another
//! mutation) is left alone.
//!
//! The write lock is only held while mutating or restoring, never across the
//! request. Concurrent mutations are not serialized: whichever response
//! resolves last determines the final state.

use std::future::Future;

use tokio::sync::RwLock;

/// Apply `mutate`, await `request`, and hand the original value returned by
/// `mutate` to `rollback` on error.
pub async fn apply_optimistic<S, O, T, E, M, F, B>(
    state: &RwLock<S>,
    mutate: M,
    request: F,
    rollback: B,
) -> Result<T, E>
where
    M: FnOnce(&mut S) -> O,
    F: Future<Output = Result<T, E>>,
    B: FnOnce(&mut S, O),
{
    apply_optimistic_with(state, mutate, request, rollback, |_, _| {}).await
}

/// Like [`apply_optimistic`], and on success also apply `reconcile` with the
/// server's response (e.g. replace the optimistic entity with the returned one).
pub async fn apply_optimistic_with<S, O, T, E, M, F, B, R>(
    state: &RwLock<S>,
    mutate: M,
    request: F,
    rollback: B,
    reconcile: R,
) -> Result<T, E>
where
    M: FnOnce(&mut S) -> O,
    F: Future<Output = Result<T, E>>,
    B: FnOnce(&mut S, O),
    R: FnOnce(&mut S, &T),
{
    let original = mutate(&mut *state.write().await);

    match request.await {
        Ok(value) => {
            reconcile(&mut *state.write().await, &value);
            Ok(value)
        }
        Err(err) => {
            log::debug!("Optimistic update failed, restoring previous value");
            rollback(&mut *state.write().await, original);
            Err(err)
        }
    }
}
