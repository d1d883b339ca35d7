//! Bank HTTP service
//!
//! One binary, one bank: the instance is configured with a bank name, a
//! biller catalog file, and a seed account file. The same routes serve every
//! bank in the network; the clearing house talks to them over HTTP.

pub mod config;
pub mod error;
pub mod routes;

use bank_core::TransferEngine;
use std::sync::Arc;

/// Shared handler state: the bank's transfer engine
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<TransferEngine>,
}

impl AppState {
    pub fn new(engine: TransferEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}
