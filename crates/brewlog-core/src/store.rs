//! The `CoffeeStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `brewlog-store-sqlite`).
//! Front-ends (`brewlog-cli`, a desktop UI) depend on this abstraction, not on
//! any concrete backend.

use std::future::Future;

use crate::{
  bean::{CoffeeBean, CoffeeBeanPatch, NewCoffeeBean},
  session::{BrewingSessionPatch, BrewingSessionWithBean, NewBrewingSession},
  stats::Statistics,
};

/// Abstraction over a coffee journal backend.
///
/// Every method is one independent, immediately committed operation. Update
/// and delete report a missing id as `Ok(false)`; an `Err` always means the
/// backend refused or failed to carry out the operation.
pub trait CoffeeStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Beans ─────────────────────────────────────────────────────────────

  /// Persist a new bean and return its id.
  fn add_coffee_bean(
    &self,
    bean: NewCoffeeBean,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// All beans, newest first.
  fn get_all_coffee_beans(
    &self,
  ) -> impl Future<Output = Result<Vec<CoffeeBean>, Self::Error>> + Send + '_;

  /// A single bean, or `None` if no bean has this id.
  fn get_coffee_bean(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<CoffeeBean>, Self::Error>> + Send + '_;

  /// Write only the columns present in `patch`. An empty patch succeeds
  /// without touching the store.
  fn update_coffee_bean(
    &self,
    id: i64,
    patch: CoffeeBeanPatch,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Delete a bean and, by cascade, all of its sessions. Returns whether a
  /// row was removed.
  fn delete_coffee_bean(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Case-insensitive substring search over name, roaster, origin and
  /// tasting notes, newest first.
  fn search_coffee_beans<'a>(
    &'a self,
    query: &'a str,
  ) -> impl Future<Output = Result<Vec<CoffeeBean>, Self::Error>> + Send + 'a;

  fn count_coffee_beans_with_image(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── Sessions ──────────────────────────────────────────────────────────

  /// Persist a new session. Fails if the referenced bean does not exist.
  fn add_brewing_session(
    &self,
    session: NewBrewingSession,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// All sessions joined with their bean's name, newest first.
  fn get_all_brewing_sessions(
    &self,
  ) -> impl Future<Output = Result<Vec<BrewingSessionWithBean>, Self::Error>> + Send + '_;

  fn get_brewing_session(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<BrewingSessionWithBean>, Self::Error>> + Send + '_;

  /// Sessions brewed from one bean, newest first.
  fn get_sessions_for_bean(
    &self,
    bean_id: i64,
  ) -> impl Future<Output = Result<Vec<BrewingSessionWithBean>, Self::Error>> + Send + '_;

  fn update_brewing_session(
    &self,
    id: i64,
    patch: BrewingSessionPatch,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn delete_brewing_session(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Case-insensitive substring search over the bean name, brew method and
  /// notes, newest first.
  fn search_brewing_sessions<'a>(
    &'a self,
    query: &'a str,
  ) -> impl Future<Output = Result<Vec<BrewingSessionWithBean>, Self::Error>> + Send + 'a;

  // ── Aggregates ────────────────────────────────────────────────────────

  fn get_detailed_statistics(
    &self,
  ) -> impl Future<Output = Result<Statistics, Self::Error>> + Send + '_;
}
