use alloc::vec::Vec;
use core::marker::PhantomData;
use polkadot_sdk::frame_support::{pallet_prelude::*, storage::with_transaction};
use polkadot_sdk::sp_runtime::TransactionOutcome;
use primitives::{traits::CommunityPool, Coin};

/// Result of converting a fee coin to the base asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeeConversion {
  /// Fee now held in the base asset (unchanged if it already was).
  Converted(Coin),
  /// Unregistered asset, or the conversion swap failed and was rolled back.
  Unswappable,
}

/// Where an unswappable fee ended up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnswappableDisposition {
  CommunityPool,
  Burned,
}

impl UnswappableDisposition {
  pub fn is_community_pool(&self) -> bool {
    matches!(self, UnswappableDisposition::CommunityPool)
  }
}

/// Disposal of fees that cannot be converted to the base asset.
///
/// Receives the original fee coin, held by `source`.
pub trait UnswappableFeePolicy<AccountId> {
  fn dispose(source: &AccountId, fee: Coin) -> Result<UnswappableDisposition, DispatchError>;
}

/// Sends unswappable fees to the community pool.
pub struct FundCommunityPool<C>(PhantomData<C>);

impl<AccountId, C: CommunityPool<AccountId>> UnswappableFeePolicy<AccountId>
  for FundCommunityPool<C>
{
  fn dispose(source: &AccountId, fee: Coin) -> Result<UnswappableDisposition, DispatchError> {
    C::fund_community_pool(source, fee)?;
    Ok(UnswappableDisposition::CommunityPool)
  }
}

/// Nested revertible execution scope.
///
/// State written inside the scope is committed only when the closure succeeds. Events
/// recorded through [`ExecutionScope::record`] are returned separately so that the caller
/// decides whether to deposit them, independently of the state commit.
pub struct ExecutionScope<E> {
  events: Vec<E>,
}

/// State commit result of a scope plus the events it buffered.
pub struct ScopeOutcome<R, E> {
  pub result: Result<R, DispatchError>,
  /// Empty when the scope rolled back.
  pub events: Vec<E>,
}

impl<E> ExecutionScope<E> {
  pub fn run<R>(f: impl FnOnce(&mut Self) -> Result<R, DispatchError>) -> ScopeOutcome<R, E> {
    let mut scope = Self { events: Vec::new() };
    let result = with_transaction(|| match f(&mut scope) {
      Ok(value) => TransactionOutcome::Commit(Ok(value)),
      Err(err) => TransactionOutcome::Rollback(Err(err)),
    });
    let events = if result.is_ok() {
      scope.events
    } else {
      Vec::new()
    };
    ScopeOutcome { result, events }
  }

  pub fn record(&mut self, event: E) {
    self.events.push(event);
  }
}
