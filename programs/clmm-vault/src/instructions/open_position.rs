use anchor_lang::prelude::*;
use anchor_spl::{associated_token::AssociatedToken, token::Token};

use crate::{
    constants::*,
    errors::*,
    events::*,
    state::*,
    whirlpool::{self, OpenPositionAccounts, PositionView},
};

/// Open a whirlpool position over the vault's tick range, owned by the vault authority
#[derive(Accounts)]
pub struct OpenPosition<'info> {
    /// Admin pays for the position accounts
    #[account(mut)]
    pub admin: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault.whirlpool.as_ref()],
        bump = vault.bump,
        has_one = admin @ VaultError::Unauthorized,
        constraint = !vault.has_position() @ VaultError::PositionOpen,
    )]
    pub vault: Box<Account<'info, Vault>>,

    /// CHECK: PDA that will own the position, validated by seeds
    #[account(
        seeds = [VAULT_AUTHORITY_SEED, vault.whirlpool.as_ref()],
        bump = vault.authority_bump,
    )]
    pub vault_authority: UncheckedAccount<'info>,

    /// CHECK: must be the vault's whirlpool; validated by the whirlpool program
    #[account(address = vault.whirlpool @ VaultError::AccountMismatch)]
    pub whirlpool: UncheckedAccount<'info>,

    /// CHECK: initialized by the whirlpool program
    #[account(mut)]
    pub position: UncheckedAccount<'info>,

    /// Fresh keypair for the position NFT mint
    #[account(mut)]
    pub position_mint: Signer<'info>,

    /// CHECK: initialized by the whirlpool program
    #[account(mut)]
    pub position_token_account: UncheckedAccount<'info>,

    /// CHECK: address checked against the whirlpool program id
    #[account(address = WHIRLPOOL_PROGRAM_ID @ VaultError::AccountMismatch)]
    pub whirlpool_program: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
    pub associated_token_program: Program<'info, AssociatedToken>,
}

pub fn handler(ctx: Context<OpenPosition>) -> Result<()> {
    let vault = &ctx.accounts.vault;
    let (lower_tick, upper_tick) = (vault.lower_tick, vault.upper_tick);

    let funder = ctx.accounts.admin.to_account_info();
    let owner = ctx.accounts.vault_authority.to_account_info();
    let position = ctx.accounts.position.to_account_info();
    let position_mint = ctx.accounts.position_mint.to_account_info();
    let position_token_account = ctx.accounts.position_token_account.to_account_info();
    let pool = ctx.accounts.whirlpool.to_account_info();
    let token_program = ctx.accounts.token_program.to_account_info();
    let system_program = ctx.accounts.system_program.to_account_info();
    let rent = ctx.accounts.rent.to_account_info();
    let associated_token_program = ctx.accounts.associated_token_program.to_account_info();

    msg!("CPI: whirlpool open_position [{}, {}]", lower_tick, upper_tick);
    let authority_seeds = vault.authority_seeds();
    whirlpool::open_position(
        &ctx.accounts.whirlpool_program.to_account_info(),
        OpenPositionAccounts {
            funder: &funder,
            owner: &owner,
            position: &position,
            position_mint: &position_mint,
            position_token_account: &position_token_account,
            whirlpool: &pool,
            token_program: &token_program,
            system_program: &system_program,
            rent: &rent,
            associated_token_program: &associated_token_program,
        },
        lower_tick,
        upper_tick,
        &[&authority_seeds[..]],
    )?;

    // The pool program wrote the position; confirm it is the one we asked for
    let opened = PositionView::load(&position)?;
    require_keys_eq!(opened.whirlpool, pool.key(), VaultError::AccountMismatch);
    require_keys_eq!(opened.position_mint, position_mint.key(), VaultError::AccountMismatch);
    require!(
        opened.tick_lower_index == lower_tick && opened.tick_upper_index == upper_tick,
        VaultError::InvalidRange
    );

    let vault = &mut ctx.accounts.vault;
    vault.open_position(position.key(), position_mint.key())?;

    emit!(PositionOpened {
        vault: vault.key(),
        position: vault.position,
        position_mint: vault.position_mint,
        lower_tick,
        upper_tick,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
