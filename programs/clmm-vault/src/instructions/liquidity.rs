use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::{
    constants::*,
    errors::*,
    events::*,
    state::*,
    whirlpool::{self, ModifyLiquidityAccounts, PoolView},
};

/// Accounts for moving custody tokens into and out of the open position
///
/// Shared by `add_liquidity` and `remove_liquidity`; both are admin-only.
#[derive(Accounts)]
pub struct ModifyLiquidity<'info> {
    pub admin: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault.whirlpool.as_ref()],
        bump = vault.bump,
        has_one = admin @ VaultError::Unauthorized,
        constraint = vault.has_position() @ VaultError::NoPosition,
    )]
    pub vault: Box<Account<'info, Vault>>,

    /// CHECK: PDA that owns the position and custody, validated by seeds
    #[account(
        seeds = [VAULT_AUTHORITY_SEED, vault.whirlpool.as_ref()],
        bump = vault.authority_bump,
    )]
    pub vault_authority: UncheckedAccount<'info>,

    /// CHECK: must be the vault's whirlpool; parsed with PoolView::load
    #[account(mut, address = vault.whirlpool @ VaultError::AccountMismatch)]
    pub whirlpool: UncheckedAccount<'info>,

    /// CHECK: must be the vault's recorded position
    #[account(mut, address = vault.position @ VaultError::AccountMismatch)]
    pub position: UncheckedAccount<'info>,

    #[account(
        constraint = position_token_account.mint == vault.position_mint @ VaultError::AccountMismatch,
        constraint = position_token_account.owner == vault_authority.key() @ VaultError::AccountMismatch,
        constraint = position_token_account.amount == 1 @ VaultError::AccountMismatch,
    )]
    pub position_token_account: Box<Account<'info, TokenAccount>>,

    #[account(mut, address = vault.token_a_vault @ VaultError::AccountMismatch)]
    pub token_a_vault: Box<Account<'info, TokenAccount>>,

    #[account(mut, address = vault.token_b_vault @ VaultError::AccountMismatch)]
    pub token_b_vault: Box<Account<'info, TokenAccount>>,

    /// CHECK: compared against the pool's token_vault_a in the handler
    #[account(mut)]
    pub pool_token_vault_a: UncheckedAccount<'info>,

    /// CHECK: compared against the pool's token_vault_b in the handler
    #[account(mut)]
    pub pool_token_vault_b: UncheckedAccount<'info>,

    /// CHECK: validated by the whirlpool program
    #[account(mut)]
    pub tick_array_lower: UncheckedAccount<'info>,

    /// CHECK: validated by the whirlpool program
    #[account(mut)]
    pub tick_array_upper: UncheckedAccount<'info>,

    /// CHECK: address checked against the whirlpool program id
    #[account(address = WHIRLPOOL_PROGRAM_ID @ VaultError::AccountMismatch)]
    pub whirlpool_program: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
}

impl<'info> ModifyLiquidity<'info> {
    fn check_pool_vaults(&self) -> Result<()> {
        let pool = PoolView::load(&self.whirlpool.to_account_info())?;
        require_keys_eq!(pool.token_vault_a, self.pool_token_vault_a.key(), VaultError::AccountMismatch);
        require_keys_eq!(pool.token_vault_b, self.pool_token_vault_b.key(), VaultError::AccountMismatch);
        Ok(())
    }

    fn invoke(&self, discriminator: [u8; 8], liquidity: u128, token_a: u64, token_b: u64) -> Result<()> {
        let whirlpool = self.whirlpool.to_account_info();
        let token_program = self.token_program.to_account_info();
        let position_authority = self.vault_authority.to_account_info();
        let position = self.position.to_account_info();
        let position_token_account = self.position_token_account.to_account_info();
        let token_owner_account_a = self.token_a_vault.to_account_info();
        let token_owner_account_b = self.token_b_vault.to_account_info();
        let token_vault_a = self.pool_token_vault_a.to_account_info();
        let token_vault_b = self.pool_token_vault_b.to_account_info();
        let tick_array_lower = self.tick_array_lower.to_account_info();
        let tick_array_upper = self.tick_array_upper.to_account_info();

        let authority_seeds = self.vault.authority_seeds();
        whirlpool::modify_liquidity(
            &self.whirlpool_program.to_account_info(),
            ModifyLiquidityAccounts {
                whirlpool: &whirlpool,
                token_program: &token_program,
                position_authority: &position_authority,
                position: &position,
                position_token_account: &position_token_account,
                token_owner_account_a: &token_owner_account_a,
                token_owner_account_b: &token_owner_account_b,
                token_vault_a: &token_vault_a,
                token_vault_b: &token_vault_b,
                tick_array_lower: &tick_array_lower,
                tick_array_upper: &tick_array_upper,
            },
            discriminator,
            liquidity,
            token_a,
            token_b,
            &[&authority_seeds[..]],
        )
    }
}

/// Deploy custody tokens into the position. The event reports what actually left
/// custody, not the requested maxima.
pub fn add_handler(
    ctx: Context<ModifyLiquidity>,
    liquidity_amount: u128,
    token_max_a: u64,
    token_max_b: u64,
) -> Result<()> {
    ctx.accounts.check_pool_vaults()?;
    ctx.accounts.vault.record_liquidity_added(liquidity_amount)?;

    let before_a = ctx.accounts.token_a_vault.amount;
    let before_b = ctx.accounts.token_b_vault.amount;

    msg!("CPI: whirlpool increase_liquidity {}", liquidity_amount);
    ctx.accounts
        .invoke(INCREASE_LIQUIDITY_IX, liquidity_amount, token_max_a, token_max_b)?;

    ctx.accounts.token_a_vault.reload()?;
    ctx.accounts.token_b_vault.reload()?;
    let spent_a = before_a
        .checked_sub(ctx.accounts.token_a_vault.amount)
        .ok_or(VaultError::ArithmeticOverflow)?;
    let spent_b = before_b
        .checked_sub(ctx.accounts.token_b_vault.amount)
        .ok_or(VaultError::ArithmeticOverflow)?;

    emit!(LiquidityAdded {
        vault: ctx.accounts.vault.key(),
        liquidity: liquidity_amount,
        amount_a: spent_a,
        amount_b: spent_b,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

/// Pull liquidity back into custody
pub fn remove_handler(
    ctx: Context<ModifyLiquidity>,
    liquidity_amount: u128,
    token_min_a: u64,
    token_min_b: u64,
) -> Result<()> {
    ctx.accounts.check_pool_vaults()?;

    // EFFECTS before the CPI; validates the amount against recorded liquidity
    ctx.accounts.vault.record_liquidity_removed(liquidity_amount)?;

    let before_a = ctx.accounts.token_a_vault.amount;
    let before_b = ctx.accounts.token_b_vault.amount;

    msg!("CPI: whirlpool decrease_liquidity {}", liquidity_amount);
    ctx.accounts
        .invoke(DECREASE_LIQUIDITY_IX, liquidity_amount, token_min_a, token_min_b)?;

    ctx.accounts.token_a_vault.reload()?;
    ctx.accounts.token_b_vault.reload()?;
    let received_a = ctx
        .accounts
        .token_a_vault
        .amount
        .checked_sub(before_a)
        .ok_or(VaultError::ArithmeticOverflow)?;
    let received_b = ctx
        .accounts
        .token_b_vault
        .amount
        .checked_sub(before_b)
        .ok_or(VaultError::ArithmeticOverflow)?;

    emit!(LiquidityRemoved {
        vault: ctx.accounts.vault.key(),
        liquidity: liquidity_amount,
        amount_a: received_a,
        amount_b: received_b,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
