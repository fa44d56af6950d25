// CLMM Vault - two-asset custody vault deployed into a concentrated-liquidity position
// Security: every custody account is re-derived from the vault record, admin-only
// operations are gated by has_one, and all checks run before the first CPI
// Accounting: deposits are priced with admin reference prices, withdrawals are a
// pro-rata claim on reserves

use anchor_lang::prelude::*;

pub mod constants;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod ledger;
pub mod state;
pub mod whirlpool;

use instructions::*;

declare_id!("3A6RUfKQe3NDKYX9aFyBS21juUnbtkZi3djaoHmgXTef");

#[program]
pub mod clmm_vault {
    use super::*;

    /// Create the vault for a whirlpool
    ///
    /// Security considerations:
    /// - Admin must be signer and is stored in state
    /// - Mints must be the pool's mints, canonically ordered
    /// - Custody accounts and share mint are PDAs owned by the vault authority
    /// - Decimals are read from the mints, never passed in
    pub fn initialize_vault(
        ctx: Context<InitializeVault>,
        token_a_price: u64,
        token_b_price: u64,
        lower_tick: i32,
        upper_tick: i32,
    ) -> Result<()> {
        instructions::initialize_vault::handler(ctx, token_a_price, token_b_price, lower_tick, upper_tick)
    }

    /// Deposit token A and/or B and receive shares
    ///
    /// Security considerations:
    /// - Shares priced against reserves before the deposit (no dilution)
    /// - Open position valued at the pool's current price, fees owed included
    /// - Rounds down in favour of existing holders
    pub fn deposit(ctx: Context<Deposit>, amount_a: u64, amount_b: u64) -> Result<()> {
        instructions::deposit::handler(ctx, amount_a, amount_b)
    }

    /// Burn shares for a pro-rata share of the reserves
    ///
    /// Security considerations:
    /// - Payout from the pre-burn snapshot, independent of reference prices
    /// - Slippage floors are all-or-nothing
    /// - Payout must be covered by idle custody; liquidity is never unwound here
    pub fn withdraw(
        ctx: Context<Withdraw>,
        share_amount: u64,
        token_min_a_amount: u64,
        token_min_b_amount: u64,
    ) -> Result<()> {
        instructions::withdraw::handler(ctx, share_amount, token_min_a_amount, token_min_b_amount)
    }

    /// Admin-only reference price update
    pub fn update_prices(
        ctx: Context<UpdatePrices>,
        token_a_price: u64,
        token_b_price: u64,
    ) -> Result<()> {
        instructions::update_prices::handler(ctx, token_a_price, token_b_price)
    }

    /// Admin-only tick range update; requires no open position
    pub fn update_ticks(ctx: Context<UpdateTicks>, lower_tick: i32, upper_tick: i32) -> Result<()> {
        instructions::update_ticks::handler(ctx, lower_tick, upper_tick)
    }

    /// Open a whirlpool position over the vault's tick range
    ///
    /// Security considerations:
    /// - Admin only (has_one)
    /// - Position is owned by the vault authority PDA, which signs the CPI
    /// - Position written by the pool is re-read and checked against the request
    pub fn open_position(ctx: Context<OpenPosition>) -> Result<()> {
        instructions::open_position::handler(ctx)
    }

    /// Deploy custody into the open position
    ///
    /// Security considerations:
    /// - Admin only (has_one); pool vaults checked against the whirlpool account
    /// - Vault authority signs the CPI, tokens leave only the custody accounts
    /// - Reported amounts measured from custody balance changes
    pub fn add_liquidity(
        ctx: Context<ModifyLiquidity>,
        liquidity_amount: u128,
        token_max_a: u64,
        token_max_b: u64,
    ) -> Result<()> {
        instructions::liquidity::add_handler(ctx, liquidity_amount, token_max_a, token_max_b)
    }

    /// Return liquidity from the position to custody
    ///
    /// Security considerations:
    /// - Admin only (has_one)
    /// - Cannot remove more than the vault added
    /// - Pool minima guard the amounts; received amounts measured from custody
    ///   balance changes
    pub fn remove_liquidity(
        ctx: Context<ModifyLiquidity>,
        liquidity_amount: u128,
        token_min_a: u64,
        token_min_b: u64,
    ) -> Result<()> {
        instructions::liquidity::remove_handler(ctx, liquidity_amount, token_min_a, token_min_b)
    }

    /// Collect position fees into custody
    ///
    /// Security considerations:
    /// - Admin only (has_one); vault authority signs the CPI
    /// - Refused while no shares are outstanding, so fees cannot sit unowned
    pub fn collect_fees(ctx: Context<CollectFees>) -> Result<()> {
        instructions::collect_fees::handler(ctx)
    }

    /// Close the emptied position
    ///
    /// Security considerations:
    /// - Admin only (has_one)
    /// - Requires all vault liquidity removed; vault authority signs the CPI
    pub fn close_position(ctx: Context<ClosePosition>) -> Result<()> {
        instructions::close_position::handler(ctx)
    }
}
