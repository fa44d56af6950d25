use anchor_lang::prelude::*;

use crate::{
    constants::*,
    errors::VaultError,
    ledger::{self, Holdings, Valuation},
    whirlpool::{self, PoolView, PositionView},
};

/// Vault record, one per whirlpool
///
/// Security considerations:
/// - Admin stored in state (not instruction args)
/// - Every custody address stored here is also a PDA re-derived by each instruction
/// - Bumps stored for efficient PDA signing
/// - 64 bytes padding for future upgrades
#[account]
pub struct Vault {
    /// Identity allowed to change prices, ticks and manage the position
    pub admin: Pubkey,

    /// External pool the vault deploys into
    pub whirlpool: Pubkey,

    /// Underlying mints, ordered so that token_a_mint < token_b_mint
    pub token_a_mint: Pubkey,
    pub token_b_mint: Pubkey,

    /// Custody token accounts owned by the vault authority
    pub token_a_vault: Pubkey,
    pub token_b_vault: Pubkey,

    /// Mint of the vault share token
    pub share_mint: Pubkey,

    /// Admin reference prices, price per whole token
    pub token_a_price: u64,
    pub token_b_price: u64,

    /// Decimals copied from the underlying mints
    pub token_a_decimal: u8,
    pub token_b_decimal: u8,

    /// Tick range the position is opened over
    pub lower_tick: i32,
    pub upper_tick: i32,

    /// Copied from the pool; both range ends must be multiples of it
    pub tick_spacing: u16,

    /// Open whirlpool position, default key when none
    pub position: Pubkey,
    pub position_mint: Pubkey,

    /// Liquidity the vault has added to the position and not yet removed
    pub position_liquidity: u128,

    pub bump: u8,
    pub authority_bump: u8,
    pub share_bump: u8,
    pub token_a_vault_bump: u8,
    pub token_b_vault_bump: u8,

    // Padding for future upgrades
    pub _reserved: [u8; 64],
}

/// Lifecycle of a vault record
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VaultStatus {
    Uninitialized,
    Active,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct VaultBumps {
    pub vault: u8,
    pub authority: u8,
    pub share_mint: u8,
    pub token_a_vault: u8,
    pub token_b_vault: u8,
}

/// Everything `initialize_vault` fixes on a fresh record
#[derive(Clone, Copy, Debug)]
pub struct VaultInit {
    pub admin: Pubkey,
    pub whirlpool: Pubkey,
    pub token_a_mint: Pubkey,
    pub token_b_mint: Pubkey,
    pub token_a_decimal: u8,
    pub token_b_decimal: u8,
    pub token_a_vault: Pubkey,
    pub token_b_vault: Pubkey,
    pub share_mint: Pubkey,
    pub token_a_price: u64,
    pub token_b_price: u64,
    pub lower_tick: i32,
    pub upper_tick: i32,
    pub bumps: VaultBumps,
}

/// Validation hook for admin-supplied reference prices.
///
/// Prices are a trust boundary: nothing checks them against the pool, so every
/// code path that stores a price runs it through a guard first.
pub trait PriceGuard {
    fn check(&self, price_a: u64, price_b: u64) -> Result<()>;
}

/// Rejects zero prices and prices above `MAX_REFERENCE_PRICE`
pub struct ReferencePriceGuard;

impl PriceGuard for ReferencePriceGuard {
    fn check(&self, price_a: u64, price_b: u64) -> Result<()> {
        for price in [price_a, price_b] {
            require!(
                price > 0 && price <= MAX_REFERENCE_PRICE,
                VaultError::InvalidPrice
            );
        }
        Ok(())
    }
}

/// `lower < upper`, both inside the whirlpool tick bounds and on the pool's
/// tick spacing
pub fn validate_range(lower_tick: i32, upper_tick: i32, tick_spacing: u16) -> Result<()> {
    require!(lower_tick < upper_tick, VaultError::InvalidRange);
    require!(
        lower_tick >= MIN_TICK_INDEX && upper_tick <= MAX_TICK_INDEX,
        VaultError::InvalidRange
    );
    let spacing = i32::from(tick_spacing);
    require!(spacing > 0, VaultError::InvalidPoolAccount);
    require!(
        lower_tick % spacing == 0 && upper_tick % spacing == 0,
        VaultError::InvalidRange
    );
    Ok(())
}

impl Vault {
    pub fn status(&self) -> VaultStatus {
        if self.admin == Pubkey::default() {
            VaultStatus::Uninitialized
        } else {
            VaultStatus::Active
        }
    }

    /// Fill a fresh record from the pool it will deploy into
    pub fn initialize(&mut self, guard: &impl PriceGuard, pool: &PoolView, init: VaultInit) -> Result<()> {
        require!(
            self.status() == VaultStatus::Uninitialized,
            VaultError::AlreadyInitialized
        );
        require!(init.admin != Pubkey::default(), VaultError::Unauthorized);
        require!(
            init.token_a_mint < init.token_b_mint,
            VaultError::InvalidMintOrder
        );
        require_keys_eq!(init.token_a_mint, pool.token_mint_a, VaultError::AccountMismatch);
        require_keys_eq!(init.token_b_mint, pool.token_mint_b, VaultError::AccountMismatch);
        validate_range(init.lower_tick, init.upper_tick, pool.tick_spacing)?;
        guard.check(init.token_a_price, init.token_b_price)?;

        self.admin = init.admin;
        self.whirlpool = init.whirlpool;
        self.token_a_mint = init.token_a_mint;
        self.token_b_mint = init.token_b_mint;
        self.token_a_vault = init.token_a_vault;
        self.token_b_vault = init.token_b_vault;
        self.share_mint = init.share_mint;
        self.token_a_price = init.token_a_price;
        self.token_b_price = init.token_b_price;
        self.token_a_decimal = init.token_a_decimal;
        self.token_b_decimal = init.token_b_decimal;
        self.lower_tick = init.lower_tick;
        self.upper_tick = init.upper_tick;
        self.tick_spacing = pool.tick_spacing;
        self.position = Pubkey::default();
        self.position_mint = Pubkey::default();
        self.position_liquidity = 0;
        self.bump = init.bumps.vault;
        self.authority_bump = init.bumps.authority;
        self.share_bump = init.bumps.share_mint;
        self.token_a_vault_bump = init.bumps.token_a_vault;
        self.token_b_vault_bump = init.bumps.token_b_vault;
        self._reserved = [0; 64];
        Ok(())
    }

    /// Signer seeds of the vault authority PDA
    pub fn authority_seeds(&self) -> [&[u8]; 3] {
        [
            VAULT_AUTHORITY_SEED,
            self.whirlpool.as_ref(),
            std::slice::from_ref(&self.authority_bump),
        ]
    }

    pub fn has_position(&self) -> bool {
        self.position != Pubkey::default()
    }

    pub fn valuation(&self) -> Valuation {
        Valuation {
            price_a: self.token_a_price,
            price_b: self.token_b_price,
            decimals_a: self.token_a_decimal,
            decimals_b: self.token_b_decimal,
        }
    }

    /// Idle custody plus the open position at the pool's current price.
    ///
    /// Deposits value the position rounding up and withdrawals rounding down, so
    /// neither side gains from the rounding.
    pub fn holdings(
        &self,
        idle_a: u64,
        idle_b: u64,
        pool: &PoolView,
        position: Option<&PositionView>,
        round_up: bool,
    ) -> Result<Holdings> {
        if !self.has_position() {
            return Ok(Holdings::idle(idle_a, idle_b));
        }
        let position = position.ok_or(VaultError::MissingPositionAccount)?;
        require_keys_eq!(position.whirlpool, self.whirlpool, VaultError::AccountMismatch);
        require_keys_eq!(position.position_mint, self.position_mint, VaultError::AccountMismatch);

        let (position_a, position_b) = whirlpool::position_amounts(pool, position, round_up)?;
        Ok(Holdings {
            idle_a,
            idle_b,
            position_a,
            position_b,
        })
    }

    pub fn set_prices(&mut self, guard: &impl PriceGuard, price_a: u64, price_b: u64) -> Result<()> {
        guard.check(price_a, price_b)?;
        self.token_a_price = price_a;
        self.token_b_price = price_b;
        Ok(())
    }

    /// Range changes are only allowed while no position is open
    pub fn set_ticks(&mut self, lower_tick: i32, upper_tick: i32) -> Result<()> {
        validate_range(lower_tick, upper_tick, self.tick_spacing)?;
        require!(!self.has_position(), VaultError::PositionOpen);
        self.lower_tick = lower_tick;
        self.upper_tick = upper_tick;
        Ok(())
    }

    /// Shares owed for a deposit, valued against the pre-deposit holdings
    pub fn shares_for_deposit(
        &self,
        amount_a: u64,
        amount_b: u64,
        holdings: &Holdings,
        total_shares: u64,
    ) -> Result<u64> {
        require!(amount_a > 0 || amount_b > 0, VaultError::ZeroDeposit);
        let (reserve_a, reserve_b) = holdings.reserves()?;
        let shares = ledger::shares_for_deposit(
            &self.valuation(),
            amount_a,
            amount_b,
            reserve_a,
            reserve_b,
            total_shares,
        )?;
        require!(shares > 0, VaultError::DepositTooSmall);
        Ok(shares)
    }

    /// Payout for burning `share_amount`, enforcing slippage floors and that the
    /// payout is covered by idle custody
    pub fn withdraw_amounts(
        &self,
        share_amount: u64,
        min_a: u64,
        min_b: u64,
        holdings: &Holdings,
        total_shares: u64,
    ) -> Result<(u64, u64)> {
        require!(share_amount > 0, VaultError::ZeroWithdraw);
        let (reserve_a, reserve_b) = holdings.reserves()?;
        let (amount_a, amount_b) =
            ledger::withdraw_amounts(share_amount, reserve_a, reserve_b, total_shares)?;

        require!(amount_a > 0 || amount_b > 0, VaultError::WithdrawTooSmall);
        require!(
            amount_a >= min_a && amount_b >= min_b,
            VaultError::SlippageExceeded
        );
        require!(
            amount_a <= holdings.idle_a && amount_b <= holdings.idle_b,
            VaultError::InsufficientIdleBalance
        );
        Ok((amount_a, amount_b))
    }

    /// Fees may only land in custody while someone holds shares to own them
    pub fn check_fee_collection(&self, total_shares: u64) -> Result<()> {
        require!(self.has_position(), VaultError::NoPosition);
        require!(total_shares > 0, VaultError::NoShareholders);
        Ok(())
    }

    pub fn record_liquidity_added(&mut self, liquidity: u128) -> Result<()> {
        require!(liquidity > 0, VaultError::ZeroLiquidity);
        self.position_liquidity = self
            .position_liquidity
            .checked_add(liquidity)
            .ok_or(VaultError::ArithmeticOverflow)?;
        Ok(())
    }

    pub fn record_liquidity_removed(&mut self, liquidity: u128) -> Result<()> {
        require!(liquidity > 0, VaultError::ZeroLiquidity);
        require!(
            liquidity <= self.position_liquidity,
            VaultError::InsufficientLiquidity
        );
        self.position_liquidity -= liquidity;
        Ok(())
    }

    pub fn open_position(&mut self, position: Pubkey, position_mint: Pubkey) -> Result<()> {
        require!(!self.has_position(), VaultError::PositionOpen);
        self.position = position;
        self.position_mint = position_mint;
        self.position_liquidity = 0;
        Ok(())
    }

    pub fn close_position(&mut self) -> Result<()> {
        require!(self.has_position(), VaultError::NoPosition);
        require!(self.position_liquidity == 0, VaultError::PositionNotEmpty);
        self.position = Pubkey::default();
        self.position_mint = Pubkey::default();
        Ok(())
    }
}
