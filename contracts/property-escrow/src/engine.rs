//! Listing lifecycle transitions.
//!
//! Every function here checks all of its preconditions before touching the
//! listing or the ledger, so a returned `Err` means nothing changed. Funds
//! always leave custody whole: the ledger moves the full escrow first and the
//! listing is only zeroed and reset once that succeeded.

use crate::entities::{Listing, MAX_RATING};
use crate::errors::Error;
use crate::ledger::Ledger;
use soroban_sdk::{Address, Bytes, Env};

pub const DAY_IN_SECONDS: u64 = 86400;

/// Rating recorded by `mark_listing_as_sold`.
pub const SOLD_SELLER_RATING: u32 = 5;

pub fn is_owner(caller: &Address, listing: &Listing) -> bool {
    listing.owner == *caller
}

pub fn is_buyer(caller: &Address, listing: &Listing) -> bool {
    listing.buyer.as_ref() == Some(caller)
}

pub fn is_participant(caller: &Address, listing: &Listing) -> bool {
    is_owner(caller, listing) || is_buyer(caller, listing)
}

fn days_to_seconds(days: u64) -> Result<u64, Error> {
    days.checked_mul(DAY_IN_SECONDS).ok_or(Error::ArithmeticOverflow)
}

fn require_owner(caller: &Address, listing: &Listing) -> Result<(), Error> {
    if !is_owner(caller, listing) {
        return Err(Error::NotOwner);
    }
    Ok(())
}

fn require_settled_submission(listing: &Listing) -> Result<(), Error> {
    if !listing.property_submitted || listing.dispute {
        return Err(Error::InvalidProperty);
    }
    Ok(())
}

fn require_buyer(listing: &Listing) -> Result<&Address, Error> {
    listing.buyer.as_ref().ok_or(Error::InvalidBid)
}

/// Pays the whole escrow to `to` and zeroes it. Returns the amount moved.
fn release_escrow<L: Ledger>(
    ledger: &L,
    listing: &mut Listing,
    to: &Address,
) -> Result<i128, Error> {
    let amount = listing.escrow;
    if amount == 0 {
        return Ok(0);
    }
    ledger.transfer(amount, to)?;
    listing.escrow = 0;
    Ok(amount)
}

pub fn create_listing(
    env: &Env,
    id: u64,
    caller: Address,
    description: Bytes,
    price: i128,
    expiration_days: u64,
    now: u64,
) -> Result<Listing, Error> {
    if price < 0 {
        return Err(Error::InvalidAmount);
    }
    let expiration_time = now
        .checked_add(days_to_seconds(expiration_days)?)
        .ok_or(Error::ArithmeticOverflow)?;

    Ok(Listing {
        id,
        owner: caller,
        buyer: None,
        description,
        property_details: Bytes::new(env),
        price,
        escrow: 0,
        property_submitted: false,
        dispute: false,
        seller_rating: None,
        buyer_rating: None,
        expiration_time,
    })
}

pub fn place_bid<L: Ledger>(
    ledger: &L,
    listing: &mut Listing,
    caller: &Address,
    escrow_amount: i128,
    now: u64,
) -> Result<(), Error> {
    if listing.buyer.is_some() {
        return Err(Error::InvalidBid);
    }
    if listing.is_expired(now) {
        return Err(Error::InvalidProperty);
    }
    if escrow_amount < listing.price {
        return Err(Error::InsufficientFunds);
    }
    if escrow_amount <= 0 {
        return Err(Error::InvalidAmount);
    }
    let escrow = listing
        .escrow
        .checked_add(escrow_amount)
        .ok_or(Error::ArithmeticOverflow)?;

    ledger.deposit(caller, escrow_amount)?;
    listing.buyer = Some(caller.clone());
    listing.escrow = escrow;
    Ok(())
}

pub fn submit_property(listing: &mut Listing, caller: &Address) -> Result<(), Error> {
    require_buyer(listing)?;
    if !is_buyer(caller, listing) {
        return Err(Error::NotOwner);
    }
    listing.property_submitted = true;
    Ok(())
}

pub fn dispute_listing(listing: &mut Listing, caller: &Address) -> Result<(), Error> {
    if !is_owner(caller, listing) {
        return Err(Error::DisputeError);
    }
    require_buyer(listing)?;
    listing.dispute = true;
    Ok(())
}

/// Settles an open dispute. `resolved` pays the buyer, otherwise the owner
/// is refunded.
pub fn resolve_dispute<L: Ledger>(
    ledger: &L,
    listing: &mut Listing,
    caller: &Address,
    resolved: bool,
) -> Result<i128, Error> {
    require_owner(caller, listing)?;
    if !listing.dispute {
        return Err(Error::AlreadyResolved);
    }
    let buyer = require_buyer(listing)?.clone();
    let recipient = if resolved { buyer } else { listing.owner.clone() };

    let amount = release_escrow(ledger, listing, &recipient)?;
    listing.reset();
    Ok(amount)
}

pub fn complete_purchase<L: Ledger>(
    ledger: &L,
    listing: &mut Listing,
    caller: &Address,
) -> Result<i128, Error> {
    require_owner(caller, listing)?;
    require_settled_submission(listing)?;
    let buyer = require_buyer(listing)?.clone();
    if listing.escrow < listing.price {
        return Err(Error::InsufficientFunds);
    }

    let amount = release_escrow(ledger, listing, &buyer)?;
    listing.seller_rating = None;
    listing.buyer_rating = None;
    listing.reset();
    Ok(amount)
}

/// Refunds the owner and reopens the listing unless a submitted property
/// or an open dispute still holds the escrow. Returns the refunded amount.
pub fn cancel_listing<L: Ledger>(
    ledger: &L,
    listing: &mut Listing,
    caller: &Address,
) -> Result<i128, Error> {
    if !is_participant(caller, listing) {
        return Err(Error::NotOwner);
    }
    if listing.buyer.is_some() && (listing.property_submitted || listing.dispute) {
        return Ok(0);
    }

    let owner = listing.owner.clone();
    let amount = release_escrow(ledger, listing, &owner)?;
    listing.reset();
    Ok(amount)
}

pub fn update_description(
    listing: &mut Listing,
    caller: &Address,
    description: Bytes,
) -> Result<(), Error> {
    require_owner(caller, listing)?;
    listing.description = description;
    Ok(())
}

pub fn update_price(listing: &mut Listing, caller: &Address, price: i128) -> Result<(), Error> {
    require_owner(caller, listing)?;
    if price < 0 {
        return Err(Error::InvalidAmount);
    }
    listing.price = price;
    Ok(())
}

pub fn update_property_details(
    listing: &mut Listing,
    caller: &Address,
    details: Bytes,
) -> Result<(), Error> {
    require_owner(caller, listing)?;
    listing.property_details = details;
    Ok(())
}

pub fn add_funds_to_listing<L: Ledger>(
    ledger: &L,
    listing: &mut Listing,
    caller: &Address,
    amount: i128,
) -> Result<(), Error> {
    require_owner(caller, listing)?;
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }
    let escrow = listing
        .escrow
        .checked_add(amount)
        .ok_or(Error::ArithmeticOverflow)?;

    ledger.deposit(caller, amount)?;
    listing.escrow = escrow;
    Ok(())
}

pub fn request_withdrawal<L: Ledger>(
    ledger: &L,
    listing: &mut Listing,
    caller: &Address,
) -> Result<i128, Error> {
    require_owner(caller, listing)?;
    if listing.property_submitted {
        return Err(Error::InvalidWithdrawal);
    }

    let owner = listing.owner.clone();
    let amount = release_escrow(ledger, listing, &owner)?;
    listing.buyer = None;
    listing.dispute = false;
    Ok(amount)
}

pub fn extend_dispute_period(
    listing: &mut Listing,
    caller: &Address,
    extra_days: u64,
) -> Result<(), Error> {
    if !is_owner(caller, listing) || !listing.dispute {
        return Err(Error::DisputeError);
    }
    listing.expiration_time = listing
        .expiration_time
        .checked_add(days_to_seconds(extra_days)?)
        .ok_or(Error::ArithmeticOverflow)?;
    Ok(())
}

pub fn mark_listing_as_sold(listing: &mut Listing, caller: &Address) -> Result<(), Error> {
    require_owner(caller, listing)?;
    require_settled_submission(listing)?;
    require_buyer(listing)?;
    listing.seller_rating = Some(SOLD_SELLER_RATING);
    Ok(())
}

pub fn transfer_listing_ownership(
    listing: &mut Listing,
    caller: &Address,
    new_owner: Address,
) -> Result<(), Error> {
    require_owner(caller, listing)?;
    listing.owner = new_owner;
    Ok(())
}

pub fn rate_transaction(
    listing: &mut Listing,
    caller: &Address,
    seller_rating: Option<u32>,
    buyer_rating: Option<u32>,
) -> Result<(), Error> {
    if !is_participant(caller, listing) {
        return Err(Error::NotOwner);
    }
    require_settled_submission(listing)?;
    let out_of_range = |rating: Option<u32>| rating.is_some_and(|r| r > MAX_RATING);
    if out_of_range(seller_rating) || out_of_range(buyer_rating) {
        return Err(Error::InvalidRating);
    }

    if seller_rating.is_some() {
        listing.seller_rating = seller_rating;
    }
    if buyer_rating.is_some() {
        listing.buyer_rating = buyer_rating;
    }
    Ok(())
}
