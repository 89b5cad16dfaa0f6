use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    InvalidBid = 1,
    InvalidProperty = 2,
    DisputeError = 3,
    AlreadyResolved = 4,
    NotOwner = 5,
    InvalidWithdrawal = 6,
    InsufficientFunds = 7,
    NotInitialized = 8,
    ListingNotFound = 9,
    InvalidAmount = 10,
    InvalidRating = 11,
    ArithmeticOverflow = 12,
}
