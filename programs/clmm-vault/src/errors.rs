use anchor_lang::prelude::*;

/// Custom error codes for the CLMM vault program
///
/// Every check runs before the first CPI, so a failure leaves the vault untouched.
#[error_code]
pub enum VaultError {
    #[msg("Vault is already initialized for this whirlpool")]
    AlreadyInitialized,

    #[msg("Lower tick must be below upper tick and both within whirlpool bounds")]
    InvalidRange,

    #[msg("Reference price must be non-zero and within bounds")]
    InvalidPrice,

    #[msg("Unauthorized - only the vault admin can perform this action")]
    Unauthorized,

    #[msg("Deposit amounts must not both be zero")]
    ZeroDeposit,

    #[msg("Withdraw share amount must be greater than zero")]
    ZeroWithdraw,

    #[msg("Deposit is too small to mint a single share")]
    DepositTooSmall,

    #[msg("Withdrawal is too small to pay out any tokens")]
    WithdrawTooSmall,

    #[msg("Insufficient token balance for deposit")]
    InsufficientFunds,

    #[msg("Insufficient share balance for withdrawal")]
    InsufficientShares,

    #[msg("Custody balance is deployed in the position - remove liquidity first")]
    InsufficientIdleBalance,

    #[msg("Payout below the requested minimum")]
    SlippageExceeded,

    #[msg("Math overflow occurred during calculation")]
    ArithmeticOverflow,

    #[msg("Account does not match the derived vault account")]
    AccountMismatch,

    #[msg("Token mints must be ordered with token A before token B")]
    InvalidMintOrder,

    #[msg("A position is already open for this vault")]
    PositionOpen,

    #[msg("Vault has no open position")]
    NoPosition,

    #[msg("Position still holds liquidity")]
    PositionNotEmpty,

    #[msg("Liquidity amount must be greater than zero")]
    ZeroLiquidity,

    #[msg("Liquidity amount exceeds the position liquidity")]
    InsufficientLiquidity,

    #[msg("Account is not a valid whirlpool pool or position")]
    InvalidPoolAccount,

    #[msg("The vault's open position account must be supplied")]
    MissingPositionAccount,

    #[msg("No shares outstanding to credit collected fees to")]
    NoShareholders,
}
