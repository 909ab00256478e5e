//! Anonymous threshold multi-sig executor for smart accounts.
//!
//! Members of an account's Semaphore group approve calls with group
//! membership proofs; a call runs once enough distinct approvals have been
//! collected. [`gateway::AuthorizationGateway`] restricts what a bare member
//! credential may do to the executor's own entry points.

#![deny(unsafe_code)]
#![warn(clippy::all)]

pub mod account;
pub mod collaborators;
pub mod config;
pub mod gateway;
pub mod ledger;
pub mod memory;
pub mod module;
pub mod nullifier;
pub mod proofs;
pub mod roster;
pub mod sequence;

pub use collaborators::{
    CallExecutor, CallRevert, Clock, GroupRegistry, MemberPublicKey, MemberSignatureScheme,
    MerkleRoot, ProofVerifier, SystemClock,
};
pub use config::{ModuleConfig, NullifierRetention};
pub use gateway::{AllowedOp, AuthorizationGateway, UserOperation, ValidationOutcome};
pub use module::{Collaborators, DispatchOutcome, SemaphoreMsaModule};
