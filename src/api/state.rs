//! Application state for the workforce ledger API.

use crate::services::Ledger;

/// Shared application state.
///
/// Wraps the [`Ledger`] facade; every service handle inside it is cheap to
/// clone and shares one store.
#[derive(Clone)]
pub struct AppState {
    ledger: Ledger,
}

impl AppState {
    /// Creates a new application state around an opened ledger.
    pub fn new(ledger: Ledger) -> Self {
        Self { ledger }
    }

    /// Returns the ledger.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }
}
