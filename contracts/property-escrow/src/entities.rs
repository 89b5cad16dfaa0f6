use soroban_sdk::{contracttype, Address, Bytes};

/// Highest value accepted for either side's rating.
pub const MAX_RATING: u32 = 5;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Listing {
    pub id: u64,
    pub owner: Address,
    pub buyer: Option<Address>,
    pub description: Bytes,
    pub property_details: Bytes,
    /// Minimum escrow required to complete a sale.
    pub price: i128,
    /// Funds held in custody by the contract on behalf of this listing.
    pub escrow: i128,
    pub property_submitted: bool,
    pub dispute: bool,
    pub seller_rating: Option<u32>,
    pub buyer_rating: Option<u32>,
    /// Ledger timestamp after which bids are rejected.
    pub expiration_time: u64,
}

impl Listing {
    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.expiration_time
    }

    /// Returns the listing to a re-biddable state.
    pub fn reset(&mut self) {
        self.buyer = None;
        self.property_submitted = false;
        self.dispute = false;
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Listing(u64),
    ListingCounter,
    Token,
}
