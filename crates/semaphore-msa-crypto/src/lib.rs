#![deny(unsafe_code)]
#![warn(clippy::all)]

pub mod abi;
pub mod install_data;
pub mod keccak;
pub mod selectors;

pub use abi::*;
pub use install_data::*;
pub use keccak::*;
pub use selectors::*;

pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    use subtle::ConstantTimeEq;
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
