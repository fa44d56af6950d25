// In-memory stand-in for the token and whirlpool programs around a Vault record.
//
// Each operation runs the same Vault methods, in the same order, as its
// instruction handler and then applies the balance changes the CPIs would make.
// Pool price and position amounts come from the whirlpool math the program uses.

#![allow(dead_code)]

use std::collections::HashMap;

use anchor_lang::prelude::*;
use clmm_vault::{
    errors::VaultError,
    ledger::Holdings,
    state::*,
    whirlpool::{liquidity_amounts, PoolView, PositionView},
};
use orca_whirlpools_core::tick_index_to_sqrt_price;

pub const TICK_SPACING: u16 = 64;
pub const LOWER_TICK: i32 = -6400;
pub const UPPER_TICK: i32 = 6400;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Wallet {
    pub token_a: u64,
    pub token_b: u64,
    pub shares: u64,
}

#[derive(Clone)]
pub struct Harness {
    pub vault: Vault,
    pub pool: PoolView,
    pub position: Option<PositionView>,
    pub custody_a: u64,
    pub custody_b: u64,
    pub share_supply: u64,
    pub wallets: HashMap<Pubkey, Wallet>,
}

/// Pool with canonically ordered mints, priced at tick 0
pub fn test_pool() -> PoolView {
    let mut mints = [Pubkey::new_unique(), Pubkey::new_unique()];
    mints.sort();
    PoolView {
        tick_spacing: TICK_SPACING,
        liquidity: 0,
        sqrt_price: tick_index_to_sqrt_price(0),
        tick_current_index: 0,
        token_mint_a: mints[0],
        token_vault_a: Pubkey::new_unique(),
        token_mint_b: mints[1],
        token_vault_b: Pubkey::new_unique(),
    }
}

/// A freshly allocated, zeroed vault account
pub fn blank_vault() -> Vault {
    Vault {
        admin: Pubkey::default(),
        whirlpool: Pubkey::default(),
        token_a_mint: Pubkey::default(),
        token_b_mint: Pubkey::default(),
        token_a_vault: Pubkey::default(),
        token_b_vault: Pubkey::default(),
        share_mint: Pubkey::default(),
        token_a_price: 0,
        token_b_price: 0,
        token_a_decimal: 0,
        token_b_decimal: 0,
        lower_tick: 0,
        upper_tick: 0,
        tick_spacing: 0,
        position: Pubkey::default(),
        position_mint: Pubkey::default(),
        position_liquidity: 0,
        bump: 0,
        authority_bump: 0,
        share_bump: 0,
        token_a_vault_bump: 0,
        token_b_vault_bump: 0,
        _reserved: [0; 64],
    }
}

/// Valid initialization arguments for `pool`; tests override single fields
pub fn vault_init(pool: &PoolView, admin: Pubkey) -> VaultInit {
    VaultInit {
        admin,
        whirlpool: Pubkey::new_unique(),
        token_a_mint: pool.token_mint_a,
        token_b_mint: pool.token_mint_b,
        token_a_decimal: 9,
        token_b_decimal: 6,
        token_a_vault: Pubkey::new_unique(),
        token_b_vault: Pubkey::new_unique(),
        share_mint: Pubkey::new_unique(),
        token_a_price: 100,
        token_b_price: 1000,
        lower_tick: LOWER_TICK,
        upper_tick: UPPER_TICK,
        bumps: VaultBumps {
            vault: 255,
            authority: 254,
            share_mint: 253,
            token_a_vault: 252,
            token_b_vault: 251,
        },
    }
}

impl Harness {
    /// SOL (9 decimals) / USDC (6 decimals) vault priced 100 / 1000
    pub fn sol_usdc() -> Self {
        Self::new(100, 1000, 9, 6)
    }

    pub fn new(price_a: u64, price_b: u64, decimals_a: u8, decimals_b: u8) -> Self {
        let pool = test_pool();
        let mut vault = blank_vault();
        let init = VaultInit {
            token_a_price: price_a,
            token_b_price: price_b,
            token_a_decimal: decimals_a,
            token_b_decimal: decimals_b,
            ..vault_init(&pool, Pubkey::new_unique())
        };
        vault
            .initialize(&ReferencePriceGuard, &pool, init)
            .expect("valid initialization");

        Self {
            vault,
            pool,
            position: None,
            custody_a: 0,
            custody_b: 0,
            share_supply: 0,
            wallets: HashMap::new(),
        }
    }

    pub fn admin(&self) -> Pubkey {
        self.vault.admin
    }

    pub fn fund(&mut self, user: Pubkey, token_a: u64, token_b: u64) {
        let wallet = self.wallets.entry(user).or_default();
        wallet.token_a += token_a;
        wallet.token_b += token_b;
    }

    pub fn wallet(&self, user: &Pubkey) -> Wallet {
        self.wallets.get(user).copied().unwrap_or_default()
    }

    pub fn holdings(&self, round_up: bool) -> Result<Holdings> {
        self.vault.holdings(
            self.custody_a,
            self.custody_b,
            &self.pool,
            self.position.as_ref(),
            round_up,
        )
    }

    pub fn deposit(&mut self, user: Pubkey, amount_a: u64, amount_b: u64) -> Result<u64> {
        let wallet = self.wallet(&user);
        require!(amount_a > 0 || amount_b > 0, VaultError::ZeroDeposit);
        require!(
            wallet.token_a >= amount_a && wallet.token_b >= amount_b,
            VaultError::InsufficientFunds
        );
        let holdings = self.holdings(true)?;
        let shares =
            self.vault
                .shares_for_deposit(amount_a, amount_b, &holdings, self.share_supply)?;

        let wallet = self.wallets.entry(user).or_default();
        wallet.token_a -= amount_a;
        wallet.token_b -= amount_b;
        wallet.shares += shares;
        self.custody_a += amount_a;
        self.custody_b += amount_b;
        self.share_supply += shares;
        Ok(shares)
    }

    pub fn withdraw(&mut self, user: Pubkey, shares: u64, min_a: u64, min_b: u64) -> Result<(u64, u64)> {
        require!(shares > 0, VaultError::ZeroWithdraw);
        require!(self.wallet(&user).shares >= shares, VaultError::InsufficientShares);
        let holdings = self.holdings(false)?;
        let (amount_a, amount_b) =
            self.vault
                .withdraw_amounts(shares, min_a, min_b, &holdings, self.share_supply)?;

        let wallet = self.wallets.entry(user).or_default();
        wallet.shares -= shares;
        wallet.token_a += amount_a;
        wallet.token_b += amount_b;
        self.custody_a -= amount_a;
        self.custody_b -= amount_b;
        self.share_supply -= shares;
        Ok((amount_a, amount_b))
    }

    pub fn update_prices(&mut self, caller: Pubkey, price_a: u64, price_b: u64) -> Result<()> {
        require_keys_eq!(caller, self.vault.admin, VaultError::Unauthorized);
        self.vault.set_prices(&ReferencePriceGuard, price_a, price_b)
    }

    pub fn update_ticks(&mut self, caller: Pubkey, lower_tick: i32, upper_tick: i32) -> Result<()> {
        require_keys_eq!(caller, self.vault.admin, VaultError::Unauthorized);
        self.vault.set_ticks(lower_tick, upper_tick)
    }

    /// Move the pool price to `tick`
    pub fn move_price(&mut self, tick: i32) {
        self.pool.tick_current_index = tick;
        self.pool.sqrt_price = tick_index_to_sqrt_price(tick);
    }

    pub fn open_position(&mut self) -> Result<()> {
        let position_mint = Pubkey::new_unique();
        self.vault.open_position(Pubkey::new_unique(), position_mint)?;
        self.position = Some(PositionView {
            whirlpool: self.vault.whirlpool,
            position_mint,
            liquidity: 0,
            tick_lower_index: self.vault.lower_tick,
            tick_upper_index: self.vault.upper_tick,
            fee_owed_a: 0,
            fee_owed_b: 0,
        });
        Ok(())
    }

    /// Mirrors add_liquidity; the pool takes the rounded-up token amounts
    pub fn deploy(&mut self, liquidity: u128) -> Result<(u64, u64)> {
        self.vault.record_liquidity_added(liquidity)?;
        let position = self.position.as_mut().expect("open position");
        let (amount_a, amount_b) = liquidity_amounts(
            &self.pool,
            liquidity,
            position.tick_lower_index,
            position.tick_upper_index,
            true,
        )?;
        self.custody_a = self.custody_a.checked_sub(amount_a).expect("custody covers token A");
        self.custody_b = self.custody_b.checked_sub(amount_b).expect("custody covers token B");
        position.liquidity += liquidity;
        Ok((amount_a, amount_b))
    }

    /// Mirrors remove_liquidity; the pool returns the rounded-down token amounts
    pub fn undeploy(&mut self, liquidity: u128) -> Result<(u64, u64)> {
        self.vault.record_liquidity_removed(liquidity)?;
        let position = self.position.as_mut().expect("open position");
        let (amount_a, amount_b) = liquidity_amounts(
            &self.pool,
            liquidity,
            position.tick_lower_index,
            position.tick_upper_index,
            false,
        )?;
        position.liquidity -= liquidity;
        self.custody_a += amount_a;
        self.custody_b += amount_b;
        Ok((amount_a, amount_b))
    }

    /// Swap fees checkpointed into the position
    pub fn accrue_fees(&mut self, fee_a: u64, fee_b: u64) {
        let position = self.position.as_mut().expect("open position");
        position.fee_owed_a += fee_a;
        position.fee_owed_b += fee_b;
    }

    pub fn collect_fees(&mut self) -> Result<(u64, u64)> {
        self.vault.check_fee_collection(self.share_supply)?;
        let position = self.position.as_mut().expect("open position");
        let fees = (position.fee_owed_a, position.fee_owed_b);
        position.fee_owed_a = 0;
        position.fee_owed_b = 0;
        self.custody_a += fees.0;
        self.custody_b += fees.1;
        Ok(fees)
    }

    pub fn close_position(&mut self) -> Result<()> {
        self.vault.close_position()?;
        self.position = None;
        Ok(())
    }

    pub fn shares_held(&self) -> u64 {
        self.wallets.values().map(|w| w.shares).sum()
    }
}

pub fn assert_vault_error<T: std::fmt::Debug>(result: Result<T>, expected: VaultError) {
    match result {
        Err(anchor_lang::error::Error::AnchorError(err)) => {
            assert_eq!(err.error_code_number, u32::from(expected), "{}", err.error_msg)
        }
        other => panic!("expected {}, got {:?}", expected, other),
    }
}
