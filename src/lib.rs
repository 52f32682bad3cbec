// src/lib.rs

#![cfg_attr(not(test), no_std)]

pub mod common;
pub mod modem;
pub mod pdu;
pub mod remote;

// Re-export key types for convenience
pub use common::{CommandHash, ModemError, TpAddress};
pub use modem::{ModemConfig, ModemHandler, Sim7000};
pub use remote::RemoteControl;
