use anchor_lang::prelude::*;

use crate::{constants::*, errors::*, events::*, state::*};

/// Admin-only tick range update
///
/// Only the record changes. With a position open this fails with `PositionOpen`;
/// moving live liquidity is remove_liquidity, close_position, update_ticks,
/// open_position and add_liquidity in turn.
#[derive(Accounts)]
pub struct UpdateTicks<'info> {
    pub admin: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault.whirlpool.as_ref()],
        bump = vault.bump,
        has_one = admin @ VaultError::Unauthorized,
    )]
    pub vault: Box<Account<'info, Vault>>,
}

pub fn handler(ctx: Context<UpdateTicks>, lower_tick: i32, upper_tick: i32) -> Result<()> {
    let vault = &mut ctx.accounts.vault;
    vault.set_ticks(lower_tick, upper_tick)?;

    emit!(TicksUpdated {
        vault: vault.key(),
        lower_tick,
        upper_tick,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
