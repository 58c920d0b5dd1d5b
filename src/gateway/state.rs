use std::sync::Arc;

use crate::bank::{AccountService, BankStore, TransferService};

/// Gateway shared state
#[derive(Clone)]
pub struct AppState {
    /// Store handle, used directly only for health probes
    pub store: Arc<dyn BankStore>,
    pub accounts: AccountService,
    pub transfers: TransferService,
}

impl AppState {
    pub fn new(store: Arc<dyn BankStore>) -> Self {
        Self {
            accounts: AccountService::new(store.clone()),
            transfers: TransferService::new(store.clone()),
            store,
        }
    }
}
