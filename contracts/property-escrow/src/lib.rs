#![no_std]

mod contract;
mod engine;
mod entities;
mod errors;
mod ledger;

pub use contract::{PropertyEscrowContract, PropertyEscrowContractClient};
pub use engine::{is_buyer, is_owner, is_participant, DAY_IN_SECONDS};
pub use entities::{DataKey, Listing, MAX_RATING};
pub use errors::Error;
pub use ledger::{Ledger, TokenLedger};
