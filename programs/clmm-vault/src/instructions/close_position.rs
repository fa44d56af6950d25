use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::{
    constants::*,
    errors::*,
    events::*,
    state::*,
    whirlpool::{self, ClosePositionAccounts},
};

/// Close an emptied position and clear it from the vault record
#[derive(Accounts)]
pub struct ClosePosition<'info> {
    pub admin: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault.whirlpool.as_ref()],
        bump = vault.bump,
        has_one = admin @ VaultError::Unauthorized,
        constraint = vault.has_position() @ VaultError::NoPosition,
    )]
    pub vault: Box<Account<'info, Vault>>,

    /// CHECK: PDA that owns the position, validated by seeds
    #[account(
        seeds = [VAULT_AUTHORITY_SEED, vault.whirlpool.as_ref()],
        bump = vault.authority_bump,
    )]
    pub vault_authority: UncheckedAccount<'info>,

    /// CHECK: receives the rent of the closed position accounts
    #[account(mut)]
    pub receiver: UncheckedAccount<'info>,

    /// CHECK: must be the vault's recorded position
    #[account(mut, address = vault.position @ VaultError::AccountMismatch)]
    pub position: UncheckedAccount<'info>,

    /// CHECK: must be the vault's recorded position mint
    #[account(mut, address = vault.position_mint @ VaultError::AccountMismatch)]
    pub position_mint: UncheckedAccount<'info>,

    #[account(
        mut,
        constraint = position_token_account.mint == vault.position_mint @ VaultError::AccountMismatch,
        constraint = position_token_account.owner == vault_authority.key() @ VaultError::AccountMismatch,
        constraint = position_token_account.amount == 1 @ VaultError::AccountMismatch,
    )]
    pub position_token_account: Box<Account<'info, TokenAccount>>,

    /// CHECK: address checked against the whirlpool program id
    #[account(address = WHIRLPOOL_PROGRAM_ID @ VaultError::AccountMismatch)]
    pub whirlpool_program: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
}

pub fn handler(ctx: Context<ClosePosition>) -> Result<()> {
    let position_key = ctx.accounts.vault.position;

    // EFFECTS: rejects a position that still holds liquidity
    ctx.accounts.vault.close_position()?;

    let position_authority = ctx.accounts.vault_authority.to_account_info();
    let receiver = ctx.accounts.receiver.to_account_info();
    let position = ctx.accounts.position.to_account_info();
    let position_mint = ctx.accounts.position_mint.to_account_info();
    let position_token_account = ctx.accounts.position_token_account.to_account_info();
    let token_program = ctx.accounts.token_program.to_account_info();

    msg!("CPI: whirlpool close_position");
    let authority_seeds = ctx.accounts.vault.authority_seeds();
    whirlpool::close_position(
        &ctx.accounts.whirlpool_program.to_account_info(),
        ClosePositionAccounts {
            position_authority: &position_authority,
            receiver: &receiver,
            position: &position,
            position_mint: &position_mint,
            position_token_account: &position_token_account,
            token_program: &token_program,
        },
        &[&authority_seeds[..]],
    )?;

    emit!(PositionClosed {
        vault: ctx.accounts.vault.key(),
        position: position_key,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
