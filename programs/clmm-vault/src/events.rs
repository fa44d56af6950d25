use anchor_lang::prelude::*;

/// Event emitted when a new vault is initialized
#[event]
pub struct VaultInitialized {
    pub vault: Pubkey,
    pub admin: Pubkey,
    pub whirlpool: Pubkey,
    pub token_a_mint: Pubkey,
    pub token_b_mint: Pubkey,
    pub share_mint: Pubkey,
    pub lower_tick: i32,
    pub upper_tick: i32,
    pub timestamp: i64,
}

/// Event emitted when tokens are deposited
#[event]
pub struct Deposited {
    pub vault: Pubkey,
    pub user: Pubkey,
    pub amount_a: u64,
    pub amount_b: u64,
    pub shares_minted: u64,
    pub total_shares: u64,
    pub timestamp: i64,
}

/// Event emitted when shares are redeemed
#[event]
pub struct Withdrawn {
    pub vault: Pubkey,
    pub user: Pubkey,
    pub shares_burned: u64,
    pub amount_a: u64,
    pub amount_b: u64,
    pub total_shares: u64,
    pub timestamp: i64,
}

#[event]
pub struct PricesUpdated {
    pub vault: Pubkey,
    pub token_a_price: u64,
    pub token_b_price: u64,
    pub timestamp: i64,
}

#[event]
pub struct TicksUpdated {
    pub vault: Pubkey,
    pub lower_tick: i32,
    pub upper_tick: i32,
    pub timestamp: i64,
}

#[event]
pub struct PositionOpened {
    pub vault: Pubkey,
    pub position: Pubkey,
    pub position_mint: Pubkey,
    pub lower_tick: i32,
    pub upper_tick: i32,
    pub timestamp: i64,
}

/// Amounts are what actually left custody, not the requested maxima
#[event]
pub struct LiquidityAdded {
    pub vault: Pubkey,
    pub liquidity: u128,
    pub amount_a: u64,
    pub amount_b: u64,
    pub timestamp: i64,
}

#[event]
pub struct LiquidityRemoved {
    pub vault: Pubkey,
    pub liquidity: u128,
    pub amount_a: u64,
    pub amount_b: u64,
    pub timestamp: i64,
}

#[event]
pub struct FeesCollected {
    pub vault: Pubkey,
    pub amount_a: u64,
    pub amount_b: u64,
    pub timestamp: i64,
}

#[event]
pub struct PositionClosed {
    pub vault: Pubkey,
    pub position: Pubkey,
    pub timestamp: i64,
}
