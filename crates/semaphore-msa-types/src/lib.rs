#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod account;
pub mod commitment;
pub mod constants;
pub mod error;
pub mod event;
pub mod proof;
pub mod transaction;

pub use account::*;
pub use commitment::*;
pub use constants::*;
pub use error::*;
pub use event::*;
pub use proof::*;
pub use transaction::*;

pub use ethers::types::{Address, Bytes, H256, U256};

/// Identifier of an external Semaphore group.
pub type GroupId = U256;
