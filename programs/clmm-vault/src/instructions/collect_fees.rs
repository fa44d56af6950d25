use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::{
    constants::*,
    errors::*,
    events::*,
    state::*,
    whirlpool::{self, CollectFeesAccounts, PoolView},
};

/// Collect position fees into custody; they accrue to every share holder, so
/// collection is refused while no shares are outstanding
#[derive(Accounts)]
pub struct CollectFees<'info> {
    pub admin: Signer<'info>,

    #[account(
        seeds = [VAULT_SEED, vault.whirlpool.as_ref()],
        bump = vault.bump,
        has_one = admin @ VaultError::Unauthorized,
    )]
    pub vault: Box<Account<'info, Vault>>,

    #[account(address = vault.share_mint @ VaultError::AccountMismatch)]
    pub share_mint: Box<Account<'info, Mint>>,

    /// CHECK: PDA that owns the position, validated by seeds
    #[account(
        seeds = [VAULT_AUTHORITY_SEED, vault.whirlpool.as_ref()],
        bump = vault.authority_bump,
    )]
    pub vault_authority: UncheckedAccount<'info>,

    /// CHECK: must be the vault's whirlpool; parsed with PoolView::load
    #[account(address = vault.whirlpool @ VaultError::AccountMismatch)]
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

    /// CHECK: address checked against the whirlpool program id
    #[account(address = WHIRLPOOL_PROGRAM_ID @ VaultError::AccountMismatch)]
    pub whirlpool_program: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
}

pub fn handler(ctx: Context<CollectFees>) -> Result<()> {
    ctx.accounts
        .vault
        .check_fee_collection(ctx.accounts.share_mint.supply)?;
    let pool = PoolView::load(&ctx.accounts.whirlpool.to_account_info())?;
    require_keys_eq!(pool.token_vault_a, ctx.accounts.pool_token_vault_a.key(), VaultError::AccountMismatch);
    require_keys_eq!(pool.token_vault_b, ctx.accounts.pool_token_vault_b.key(), VaultError::AccountMismatch);

    let before_a = ctx.accounts.token_a_vault.amount;
    let before_b = ctx.accounts.token_b_vault.amount;

    let accounts = &ctx.accounts;
    let whirlpool_info = accounts.whirlpool.to_account_info();
    let position_authority = accounts.vault_authority.to_account_info();
    let position = accounts.position.to_account_info();
    let position_token_account = accounts.position_token_account.to_account_info();
    let token_owner_account_a = accounts.token_a_vault.to_account_info();
    let token_vault_a = accounts.pool_token_vault_a.to_account_info();
    let token_owner_account_b = accounts.token_b_vault.to_account_info();
    let token_vault_b = accounts.pool_token_vault_b.to_account_info();
    let token_program = accounts.token_program.to_account_info();

    msg!("CPI: whirlpool collect_fees");
    let authority_seeds = accounts.vault.authority_seeds();
    whirlpool::collect_fees(
        &accounts.whirlpool_program.to_account_info(),
        CollectFeesAccounts {
            whirlpool: &whirlpool_info,
            position_authority: &position_authority,
            position: &position,
            position_token_account: &position_token_account,
            token_owner_account_a: &token_owner_account_a,
            token_vault_a: &token_vault_a,
            token_owner_account_b: &token_owner_account_b,
            token_vault_b: &token_vault_b,
            token_program: &token_program,
        },
        &[&authority_seeds[..]],
    )?;

    ctx.accounts.token_a_vault.reload()?;
    ctx.accounts.token_b_vault.reload()?;
    let amount_a = ctx
        .accounts
        .token_a_vault
        .amount
        .checked_sub(before_a)
        .ok_or(VaultError::ArithmeticOverflow)?;
    let amount_b = ctx
        .accounts
        .token_b_vault
        .amount
        .checked_sub(before_b)
        .ok_or(VaultError::ArithmeticOverflow)?;

    emit!(FeesCollected {
        vault: ctx.accounts.vault.key(),
        amount_a,
        amount_b,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
