use crate::errors::Error;
use soroban_sdk::{token, Address, Env};

/// Custody of escrowed funds.
///
/// Implementations must either move the whole amount or fail; the engine
/// only mutates a listing after the ledger call has succeeded.
pub trait Ledger {
    /// Moves `amount` from `from` into custody.
    fn deposit(&self, from: &Address, amount: i128) -> Result<(), Error>;

    /// Moves `amount` out of custody to `to`. A zero amount is a no-op.
    fn transfer(&self, amount: i128, to: &Address) -> Result<(), Error>;
}

/// Ledger backed by a SEP-41 token, with the contract's own address as the
/// custody account.
pub struct TokenLedger {
    env: Env,
    token: Address,
}

impl TokenLedger {
    pub fn new(env: &Env, token: Address) -> Self {
        Self {
            env: env.clone(),
            token,
        }
    }

    fn client(&self) -> token::Client<'_> {
        token::Client::new(&self.env, &self.token)
    }
}

impl Ledger for TokenLedger {
    fn deposit(&self, from: &Address, amount: i128) -> Result<(), Error> {
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        let client = self.client();
        if client.balance(from) < amount {
            return Err(Error::InsufficientFunds);
        }
        client.transfer(from, &self.env.current_contract_address(), &amount);
        Ok(())
    }

    fn transfer(&self, amount: i128, to: &Address) -> Result<(), Error> {
        if amount < 0 {
            return Err(Error::InvalidAmount);
        }
        if amount == 0 {
            return Ok(());
        }
        self.client()
            .transfer(&self.env.current_contract_address(), to, &amount);
        Ok(())
    }
}
