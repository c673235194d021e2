//! # Header Oracle
//!
//! Thread safe entry point to the header chain verifier. All accept calls on
//! one oracle are serialized behind a single lock, so concurrent submitters
//! observe them in a total order and never see a half applied batch.

use crate::errors::OracleError;
use oracle_lib::{
    BlockHeader, ChainEvent, HeaderChainVerifier, SettlementSink, TrailingChainStore,
};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};

/// Summary of the canonical chain as the oracle sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleStatus {
    pub tip_height: u64,
    #[serde(with = "hex::serde")]
    pub tip_hash: [u8; 32],
    pub tip_timestamp: u32,
    pub settled_height: u64,
    /// Number of headers in the trailing window.
    pub window_len: usize,
    /// Lower bound for the next header's timestamp.
    pub median_time_past: u32,
}

#[derive(Debug)]
pub struct HeaderOracle<S> {
    verifier: Mutex<HeaderChainVerifier<S>>,
}

impl<S: SettlementSink> HeaderOracle<S> {
    /// Bootstraps the oracle from trust anchors. This is the only way to seed
    /// a fresh chain; there is no way to rebootstrap a running oracle.
    pub fn bootstrap(
        anchors: &[BlockHeader],
        tip_height: u64,
        settlement_sink: Option<S>,
    ) -> Result<Self, OracleError> {
        let verifier = HeaderChainVerifier::bootstrap(anchors, tip_height)?;
        tracing::info!(tip_height, "Oracle bootstrapped");

        Ok(Self::new(verifier, settlement_sink))
    }

    /// Resumes from a previously persisted store.
    pub fn from_store(
        store: TrailingChainStore,
        settlement_sink: Option<S>,
    ) -> Result<Self, OracleError> {
        let verifier = HeaderChainVerifier::from_store(store)?;
        tracing::info!(
            tip_height = verifier.tip_height(),
            "Oracle resumed from snapshot"
        );

        Ok(Self::new(verifier, settlement_sink))
    }

    fn new(mut verifier: HeaderChainVerifier<S>, settlement_sink: Option<S>) -> Self {
        if let Some(sink) = settlement_sink {
            verifier.set_settlement_sink(sink);
        }
        Self {
            verifier: Mutex::new(verifier),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HeaderChainVerifier<S>>, OracleError> {
        self.verifier.lock().map_err(|_| OracleError::LockPoisoned)
    }

    pub fn set_settlement_sink(&self, sink: S) -> Result<(), OracleError> {
        self.lock()?.set_settlement_sink(sink);
        Ok(())
    }

    /// Submits the header that extends the current tip.
    pub fn submit_header(&self, header: &BlockHeader) -> Result<Vec<ChainEvent>, OracleError> {
        let mut verifier = self.lock()?;

        verifier.accept_next(header).map_err(|e| {
            tracing::warn!(
                code = e.code(),
                category = ?e.category(),
                tip_height = verifier.tip_height(),
                "Header rejected: {e}"
            );
            OracleError::from(e)
        })
    }

    /// Submits a batch that forks off, or extends, a stored header.
    pub fn submit_chain(&self, headers: &[BlockHeader]) -> Result<Vec<ChainEvent>, OracleError> {
        let mut verifier = self.lock()?;

        verifier.accept_chain(headers).map_err(|e| {
            tracing::warn!(
                code = e.code(),
                category = ?e.category(),
                batch_len = headers.len(),
                tip_height = verifier.tip_height(),
                "Chain rejected: {e}"
            );
            OracleError::from(e)
        })
    }

    /// Copy of the current store, for persisting.
    pub fn snapshot(&self) -> Result<TrailingChainStore, OracleError> {
        Ok(self.lock()?.store().clone())
    }

    pub fn status(&self) -> Result<OracleStatus, OracleError> {
        let verifier = self.lock()?;
        let store = verifier.store();
        let tip = store.tip();

        Ok(OracleStatus {
            tip_height: store.tip_height(),
            tip_hash: tip.hash,
            tip_timestamp: tip.header.time,
            settled_height: store.settled_height(),
            window_len: store.len(),
            median_time_past: verifier.median_time_past()?,
        })
    }

    pub fn tip_height(&self) -> Result<u64, OracleError> {
        Ok(self.lock()?.tip_height())
    }
}
