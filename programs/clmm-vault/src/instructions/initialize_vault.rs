use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::{constants::*, events::*, state::*, whirlpool::PoolView};

/// Initialize the vault for a whirlpool
///
/// Accounts use `init_if_needed` so that a second initialization reaches the
/// handler and fails with `AlreadyInitialized` instead of a system program error.
#[derive(Accounts)]
pub struct InitializeVault<'info> {
    /// Vault admin
    /// Security: Must be signer, stored in state
    #[account(mut)]
    pub admin: Signer<'info>,

    /// Vault PDA, one per whirlpool
    #[account(
        init_if_needed,
        payer = admin,
        space = VAULT_SIZE,
        seeds = [VAULT_SEED, whirlpool.key().as_ref()],
        bump
    )]
    pub vault: Box<Account<'info, Vault>>,

    /// Whirlpool the vault deploys into
    /// CHECK: owner and discriminator validated by PoolView::load in the handler
    pub whirlpool: UncheckedAccount<'info>,

    /// Authority over custody, share mint and position
    /// CHECK: PDA used as authority, validated by seeds
    #[account(
        seeds = [VAULT_AUTHORITY_SEED, whirlpool.key().as_ref()],
        bump
    )]
    pub vault_authority: UncheckedAccount<'info>,

    pub token_a_mint: Box<Account<'info, Mint>>,
    pub token_b_mint: Box<Account<'info, Mint>>,

    #[account(
        init_if_needed,
        payer = admin,
        seeds = [TOKEN_A_VAULT_SEED, vault.key().as_ref()],
        bump,
        token::mint = token_a_mint,
        token::authority = vault_authority,
    )]
    pub token_a_vault: Box<Account<'info, TokenAccount>>,

    #[account(
        init_if_needed,
        payer = admin,
        seeds = [TOKEN_B_VAULT_SEED, vault.key().as_ref()],
        bump,
        token::mint = token_b_mint,
        token::authority = vault_authority,
    )]
    pub token_b_vault: Box<Account<'info, TokenAccount>>,

    /// Share mint PDA
    /// Security: Mint and freeze authority is vault_authority PDA
    #[account(
        init_if_needed,
        payer = admin,
        seeds = [SHARE_MINT_SEED, vault.key().as_ref()],
        bump,
        mint::decimals = SHARE_DECIMALS,
        mint::authority = vault_authority,
        mint::freeze_authority = vault_authority,
    )]
    pub share_mint: Box<Account<'info, Mint>>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn handler(
    ctx: Context<InitializeVault>,
    token_a_price: u64,
    token_b_price: u64,
    lower_tick: i32,
    upper_tick: i32,
) -> Result<()> {
    let pool = PoolView::load(&ctx.accounts.whirlpool.to_account_info())?;
    let init = VaultInit {
        admin: ctx.accounts.admin.key(),
        whirlpool: ctx.accounts.whirlpool.key(),
        token_a_mint: ctx.accounts.token_a_mint.key(),
        token_b_mint: ctx.accounts.token_b_mint.key(),
        token_a_decimal: ctx.accounts.token_a_mint.decimals,
        token_b_decimal: ctx.accounts.token_b_mint.decimals,
        token_a_vault: ctx.accounts.token_a_vault.key(),
        token_b_vault: ctx.accounts.token_b_vault.key(),
        share_mint: ctx.accounts.share_mint.key(),
        token_a_price,
        token_b_price,
        lower_tick,
        upper_tick,
        bumps: VaultBumps {
            vault: ctx.bumps.vault,
            authority: ctx.bumps.vault_authority,
            share_mint: ctx.bumps.share_mint,
            token_a_vault: ctx.bumps.token_a_vault,
            token_b_vault: ctx.bumps.token_b_vault,
        },
    };

    // CHECKS + EFFECTS: rejects an Active record, bad mints, range or prices
    let vault = &mut ctx.accounts.vault;
    vault.initialize(&ReferencePriceGuard, &pool, init)?;

    emit!(VaultInitialized {
        vault: vault.key(),
        admin: vault.admin,
        whirlpool: vault.whirlpool,
        token_a_mint: vault.token_a_mint,
        token_b_mint: vault.token_b_mint,
        share_mint: vault.share_mint,
        lower_tick,
        upper_tick,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
