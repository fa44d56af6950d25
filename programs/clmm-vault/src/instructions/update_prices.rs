use anchor_lang::prelude::*;

use crate::{constants::*, errors::*, events::*, state::*};

/// Admin-only reference price update
#[derive(Accounts)]
pub struct UpdatePrices<'info> {
    pub admin: Signer<'info>,

    /// Security: has_one constraint validates admin from state
    #[account(
        mut,
        seeds = [VAULT_SEED, vault.whirlpool.as_ref()],
        bump = vault.bump,
        has_one = admin @ VaultError::Unauthorized,
    )]
    pub vault: Box<Account<'info, Vault>>,
}

pub fn handler(ctx: Context<UpdatePrices>, token_a_price: u64, token_b_price: u64) -> Result<()> {
    let vault = &mut ctx.accounts.vault;
    vault.set_prices(&ReferencePriceGuard, token_a_price, token_b_price)?;

    emit!(PricesUpdated {
        vault: vault.key(),
        token_a_price,
        token_b_price,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
