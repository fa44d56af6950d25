use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, MintTo, Token, TokenAccount, Transfer};

use crate::{
    constants::*,
    errors::*,
    events::*,
    state::*,
    whirlpool::{PoolView, PositionView},
};

/// Deposit token A and/or token B and receive shares
///
/// Security checklist:
/// - User must be signer
/// - Vault and vault authority validated by seeds
/// - Custody accounts and share mint must be the ones recorded on the vault
/// - User token accounts validated for mint and owner
/// - Shares priced against reserves before the transfer lands, with the open
///   position marked to the pool's current price
#[derive(Accounts)]
pub struct Deposit<'info> {
    #[account(mut)]
    pub user: Signer<'info>,

    #[account(
        seeds = [VAULT_SEED, vault.whirlpool.as_ref()],
        bump = vault.bump,
    )]
    pub vault: Box<Account<'info, Vault>>,

    /// CHECK: PDA used as mint authority, validated by seeds
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

pub fn handler(ctx: Context<Deposit>, amount_a: u64, amount_b: u64) -> Result<()> {
    // CHECKS
    require!(amount_a > 0 || amount_b > 0, VaultError::ZeroDeposit);
    require!(
        ctx.accounts.user_token_a.amount >= amount_a
            && ctx.accounts.user_token_b.amount >= amount_b,
        VaultError::InsufficientFunds
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
    // Position valued rounding up so the depositor never gains from rounding
    let holdings = vault.holdings(
        ctx.accounts.token_a_vault.amount,
        ctx.accounts.token_b_vault.amount,
        &pool,
        position.as_ref(),
        true,
    )?;
    let shares_to_mint = vault.shares_for_deposit(amount_a, amount_b, &holdings, total_shares)?;
    let new_total_shares = total_shares
        .checked_add(shares_to_mint)
        .ok_or(VaultError::ArithmeticOverflow)?;

    // INTERACTIONS
    if amount_a > 0 {
        token::transfer(
            CpiContext::new(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.user_token_a.to_account_info(),
                    to: ctx.accounts.token_a_vault.to_account_info(),
                    authority: ctx.accounts.user.to_account_info(),
                },
            ),
            amount_a,
        )?;
    }

    if amount_b > 0 {
        token::transfer(
            CpiContext::new(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.user_token_b.to_account_info(),
                    to: ctx.accounts.token_b_vault.to_account_info(),
                    authority: ctx.accounts.user.to_account_info(),
                },
            ),
            amount_b,
        )?;
    }

    let authority_seeds = vault.authority_seeds();
    let signer_seeds = &[&authority_seeds[..]];
    token::mint_to(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            MintTo {
                mint: ctx.accounts.share_mint.to_account_info(),
                to: ctx.accounts.user_share.to_account_info(),
                authority: ctx.accounts.vault_authority.to_account_info(),
            },
            signer_seeds,
        ),
        shares_to_mint,
    )?;

    emit!(Deposited {
        vault: vault.key(),
        user: ctx.accounts.user.key(),
        amount_a,
        amount_b,
        shares_minted: shares_to_mint,
        total_shares: new_total_shares,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
