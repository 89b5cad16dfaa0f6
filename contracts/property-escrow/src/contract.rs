use crate::engine;
use crate::entities::*;
use crate::errors::*;
use crate::ledger::TokenLedger;
use soroban_sdk::{contract, contractimpl, log, symbol_short, Address, Bytes, Env};

const DAY_IN_LEDGERS: u32 = 17280;
pub const LISTING_TTL_EXTEND: u32 = 30 * DAY_IN_LEDGERS;
pub const LISTING_TTL_THRESHOLD: u32 = LISTING_TTL_EXTEND - DAY_IN_LEDGERS;

#[contract]
pub struct PropertyEscrowContract;

#[contractimpl]
impl PropertyEscrowContract {
    /// Binds the contract to the token that escrow is held in.
    pub fn __constructor(env: Env, token: Address) {
        env.storage().persistent().set(&DataKey::Token, &token);
        Self::bump(&env, &DataKey::Token);
    }

    pub fn create_listing(
        env: Env,
        caller: Address,
        description: Bytes,
        price: i128,
        expiration_days: u64,
    ) -> Result<u64, Error> {
        caller.require_auth();

        let listing_id = env
            .storage()
            .persistent()
            .get(&DataKey::ListingCounter)
            .unwrap_or(0u64)
            .checked_add(1)
            .ok_or(Error::ArithmeticOverflow)?;

        let listing = engine::create_listing(
            &env,
            listing_id,
            caller.clone(),
            description,
            price,
            expiration_days,
            env.ledger().timestamp(),
        )?;

        env.storage()
            .persistent()
            .set(&DataKey::ListingCounter, &listing_id);
        Self::bump(&env, &DataKey::ListingCounter);
        Self::save(&env, &listing);

        env.events().publish(
            (symbol_short!("created"), listing_id),
            (caller, price, listing.expiration_time),
        );
        log!(&env, "Listing {} created at price {}", listing_id, price);
        Ok(listing_id)
    }

    pub fn place_bid(
        env: Env,
        listing_id: u64,
        caller: Address,
        escrow_amount: i128,
    ) -> Result<(), Error> {
        caller.require_auth();
        let mut listing = Self::load(&env, listing_id)?;
        let ledger = Self::ledger(&env)?;

        engine::place_bid(&ledger, &mut listing, &caller, escrow_amount, env.ledger().timestamp())?;
        Self::save(&env, &listing);

        env.events()
            .publish((symbol_short!("bid"), listing_id), (caller, escrow_amount));
        log!(&env, "Listing {} bid with escrow {}", listing_id, escrow_amount);
        Ok(())
    }

    pub fn submit_property(env: Env, listing_id: u64, caller: Address) -> Result<(), Error> {
        caller.require_auth();
        let mut listing = Self::load(&env, listing_id)?;

        engine::submit_property(&mut listing, &caller)?;
        Self::save(&env, &listing);

        env.events()
            .publish((symbol_short!("submitted"), listing_id), caller);
        Ok(())
    }

    pub fn dispute_listing(env: Env, listing_id: u64, caller: Address) -> Result<(), Error> {
        caller.require_auth();
        let mut listing = Self::load(&env, listing_id)?;

        engine::dispute_listing(&mut listing, &caller)?;
        Self::save(&env, &listing);

        env.events()
            .publish((symbol_short!("disputed"), listing_id), caller);
        log!(&env, "Listing {} disputed", listing_id);
        Ok(())
    }

    pub fn resolve_dispute(
        env: Env,
        listing_id: u64,
        caller: Address,
        resolved: bool,
    ) -> Result<(), Error> {
        caller.require_auth();
        let mut listing = Self::load(&env, listing_id)?;
        let ledger = Self::ledger(&env)?;

        let amount = engine::resolve_dispute(&ledger, &mut listing, &caller, resolved)?;
        Self::save(&env, &listing);

        env.events()
            .publish((symbol_short!("resolved"), listing_id), (resolved, amount));
        log!(&env, "Listing {} dispute resolved, {} released", listing_id, amount);
        Ok(())
    }

    pub fn complete_purchase(env: Env, listing_id: u64, caller: Address) -> Result<(), Error> {
        caller.require_auth();
        let mut listing = Self::load(&env, listing_id)?;
        let ledger = Self::ledger(&env)?;

        let amount = engine::complete_purchase(&ledger, &mut listing, &caller)?;
        Self::save(&env, &listing);

        env.events()
            .publish((symbol_short!("completed"), listing_id), amount);
        log!(&env, "Listing {} completed, {} released", listing_id, amount);
        Ok(())
    }

    pub fn cancel_listing(env: Env, listing_id: u64, caller: Address) -> Result<(), Error> {
        caller.require_auth();
        let mut listing = Self::load(&env, listing_id)?;
        let ledger = Self::ledger(&env)?;

        let refunded = engine::cancel_listing(&ledger, &mut listing, &caller)?;
        Self::save(&env, &listing);

        env.events()
            .publish((symbol_short!("cancelled"), listing_id), (caller, refunded));
        Ok(())
    }

    pub fn update_description(
        env: Env,
        listing_id: u64,
        caller: Address,
        description: Bytes,
    ) -> Result<(), Error> {
        caller.require_auth();
        let mut listing = Self::load(&env, listing_id)?;

        engine::update_description(&mut listing, &caller, description)?;
        Self::save(&env, &listing);

        env.events()
            .publish((symbol_short!("updated"), listing_id), symbol_short!("desc"));
        Ok(())
    }

    pub fn update_price(
        env: Env,
        listing_id: u64,
        caller: Address,
        price: i128,
    ) -> Result<(), Error> {
        caller.require_auth();
        let mut listing = Self::load(&env, listing_id)?;

        engine::update_price(&mut listing, &caller, price)?;
        Self::save(&env, &listing);

        env.events()
            .publish((symbol_short!("updated"), listing_id), symbol_short!("price"));
        Ok(())
    }

    pub fn update_property_details(
        env: Env,
        listing_id: u64,
        caller: Address,
        details: Bytes,
    ) -> Result<(), Error> {
        caller.require_auth();
        let mut listing = Self::load(&env, listing_id)?;

        engine::update_property_details(&mut listing, &caller, details)?;
        Self::save(&env, &listing);

        env.events()
            .publish((symbol_short!("updated"), listing_id), symbol_short!("details"));
        Ok(())
    }

    pub fn add_funds_to_listing(
        env: Env,
        listing_id: u64,
        caller: Address,
        amount: i128,
    ) -> Result<(), Error> {
        caller.require_auth();
        let mut listing = Self::load(&env, listing_id)?;
        let ledger = Self::ledger(&env)?;

        engine::add_funds_to_listing(&ledger, &mut listing, &caller, amount)?;
        Self::save(&env, &listing);

        env.events()
            .publish((symbol_short!("funded"), listing_id), (amount, listing.escrow));
        Ok(())
    }

    pub fn request_withdrawal(env: Env, listing_id: u64, caller: Address) -> Result<(), Error> {
        caller.require_auth();
        let mut listing = Self::load(&env, listing_id)?;
        let ledger = Self::ledger(&env)?;

        let amount = engine::request_withdrawal(&ledger, &mut listing, &caller)?;
        Self::save(&env, &listing);

        env.events()
            .publish((symbol_short!("withdrawn"), listing_id), amount);
        log!(&env, "Listing {} withdrew {}", listing_id, amount);
        Ok(())
    }

    pub fn extend_dispute_period(
        env: Env,
        listing_id: u64,
        caller: Address,
        extra_days: u64,
    ) -> Result<(), Error> {
        caller.require_auth();
        let mut listing = Self::load(&env, listing_id)?;

        engine::extend_dispute_period(&mut listing, &caller, extra_days)?;
        Self::save(&env, &listing);

        env.events()
            .publish((symbol_short!("extended"), listing_id), listing.expiration_time);
        Ok(())
    }

    pub fn mark_listing_as_sold(env: Env, listing_id: u64, caller: Address) -> Result<(), Error> {
        caller.require_auth();
        let mut listing = Self::load(&env, listing_id)?;

        engine::mark_listing_as_sold(&mut listing, &caller)?;
        Self::save(&env, &listing);

        env.events().publish((symbol_short!("sold"), listing_id), ());
        Ok(())
    }

    pub fn transfer_listing_ownership(
        env: Env,
        listing_id: u64,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), Error> {
        caller.require_auth();
        let mut listing = Self::load(&env, listing_id)?;

        engine::transfer_listing_ownership(&mut listing, &caller, new_owner.clone())?;
        Self::save(&env, &listing);

        env.events()
            .publish((symbol_short!("transfer"), listing_id), (caller, new_owner));
        Ok(())
    }

    pub fn rate_transaction(
        env: Env,
        listing_id: u64,
        caller: Address,
        seller_rating: Option<u32>,
        buyer_rating: Option<u32>,
    ) -> Result<(), Error> {
        caller.require_auth();
        let mut listing = Self::load(&env, listing_id)?;

        engine::rate_transaction(&mut listing, &caller, seller_rating, buyer_rating)?;
        Self::save(&env, &listing);

        env.events().publish(
            (symbol_short!("rated"), listing_id),
            (listing.seller_rating, listing.buyer_rating),
        );
        Ok(())
    }

    pub fn get_listing(env: Env, listing_id: u64) -> Result<Listing, Error> {
        Self::load(&env, listing_id)
    }

    pub fn listing_count(env: Env) -> u64 {
        env.storage()
            .persistent()
            .get(&DataKey::ListingCounter)
            .unwrap_or(0)
    }

    pub fn get_token(env: Env) -> Result<Address, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Token)
            .ok_or(Error::NotInitialized)
    }
}

impl PropertyEscrowContract {
    fn ledger(env: &Env) -> Result<TokenLedger, Error> {
        let token = Self::get_token(env.clone())?;
        Ok(TokenLedger::new(env, token))
    }

    fn load(env: &Env, listing_id: u64) -> Result<Listing, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Listing(listing_id))
            .ok_or(Error::ListingNotFound)
    }

    fn save(env: &Env, listing: &Listing) {
        let key = DataKey::Listing(listing.id);
        env.storage().persistent().set(&key, listing);
        Self::bump(env, &key);
    }

    fn bump(env: &Env, key: &DataKey) {
        env.storage()
            .persistent()
            .extend_ttl(key, LISTING_TTL_THRESHOLD, LISTING_TTL_EXTEND);
    }
}
