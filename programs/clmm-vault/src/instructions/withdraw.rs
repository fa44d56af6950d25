use anchor_lang::prelude::*;
use anchor_spl::token::{self, Burn, Mint, Token, TokenAccount, Transfer};

use crate::{
    constants::*,
    errors::*,
    events::*,
    state::*,
    whirlpool::{PoolView, PositionView},
};

/// Burn shares for a pro-rata slice of the vault reserves
#[derive(Accounts)]
pub struct Withdraw<'info> {
    #[account(mut)]
    pub user: Signer<'info>,

    #[account(
        seeds = [VAULT_SEED, vault.whirlpool.as_ref()],
        bump = vault.bump,
    )]
    pub vault: Box<Account<'info, Vault>>,

    /// CHECK: PDA that owns the custody accounts, validated by seeds
    #[account(
        seeds = [VAULT_AUTHORITY_SEED, vault.whirlpool.as_ref()],
        bump = vault.authority_bump,
    )]
    pub vault_authority: UncheckedAccount<'info>,

    #[account(
        mut,
        constraint = user_token_a.mint == vault.token_a_mint @ VaultError::AccountMismatch,
        constraint = user_token_a.owner == user.key() @ VaultError::AccountMismatch,
    )]
    pub user_token_a: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = user_token_b.mint == vault.token_b_mint @ VaultError::AccountMismatch,
        constraint = user_token_b.owner == user.key() @ VaultError::AccountMismatch,
    )]
    pub user_token_b: Box<Account<'info, TokenAccount>>,

    /// CHECK: must be the vault's whirlpool; parsed with PoolView::load
    #[account(address = vault.whirlpool @ VaultError::AccountMismatch)]
    pub whirlpool: UncheckedAccount<'info>,

    /// CHECK: the vault's open position; required while one is recorded
    #[account(address = vault.position @ VaultError::AccountMismatch)]
    pub position: Option<UncheckedAccount<'info>>,

    #[account(mut, address = vault.token_a_vault @ VaultError::AccountMismatch)]
    pub token_a_vault: Box<Account<'info, TokenAccount>>,

    #[account(mut, address = vault.token_b_vault @ VaultError::AccountMismatch)]
    pub token_b_vault: Box<Account<'info, TokenAccount>>,

    #[account(mut, address = vault.share_mint @ VaultError::AccountMismatch)]
    pub share_mint: Box<Account<'info, Mint>>,

    #[account(
        mut,
        constraint = user_share.mint == vault.share_mint @ VaultError::AccountMismatch,
        constraint = user_share.owner == user.key() @ VaultError::AccountMismatch,
    )]
    pub user_share: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}

pub fn handler(
    ctx: Context<Withdraw>,
    share_amount: u64,
    token_min_a_amount: u64,
    token_min_b_amount: u64,
) -> Result<()> {
    // CHECKS: everything is priced on the pre-burn snapshot
    require!(share_amount > 0, VaultError::ZeroWithdraw);
    require!(
        ctx.accounts.user_share.amount >= share_amount,
        VaultError::InsufficientShares
    );

    let vault = &ctx.accounts.vault;
    let total_shares = ctx.accounts.share_mint.supply;
    let pool = PoolView::load(&ctx.accounts.whirlpool.to_account_info())?;
    let position = ctx
        .accounts
        .position
        .as_ref()
        .map(|position| PositionView::load(&position.to_account_info()))
        .transpose()?;
    let holdings = vault.holdings(
        ctx.accounts.token_a_vault.amount,
        ctx.accounts.token_b_vault.amount,
        &pool,
        position.as_ref(),
        false,
    )?;
    let (amount_a, amount_b) = vault.withdraw_amounts(
        share_amount,
        token_min_a_amount,
        token_min_b_amount,
        &holdings,
        total_shares,
    )?;

    // INTERACTIONS
    token::burn(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Burn {
                mint: ctx.accounts.share_mint.to_account_info(),
                from: ctx.accounts.user_share.to_account_info(),
                authority: ctx.accounts.user.to_account_info(),
            },
        ),
        share_amount,
    )?;

    let authority_seeds = vault.authority_seeds();
    let signer_seeds = &[&authority_seeds[..]];

    if amount_a > 0 {
        token::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.token_a_vault.to_account_info(),
                    to: ctx.accounts.user_token_a.to_account_info(),
                    authority: ctx.accounts.vault_authority.to_account_info(),
                },
                signer_seeds,
            ),
            amount_a,
        )?;
    }

    if amount_b > 0 {
        token::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.token_b_vault.to_account_info(),
                    to: ctx.accounts.user_token_b.to_account_info(),
                    authority: ctx.accounts.vault_authority.to_account_info(),
                },
                signer_seeds,
            ),
            amount_b,
        )?;
    }

    emit!(Withdrawn {
        vault: vault.key(),
        user: ctx.accounts.user.key(),
        shares_burned: share_amount,
        amount_a,
        amount_b,
        total_shares: total_shares - share_amount,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
