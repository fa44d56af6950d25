//! Orca whirlpool boundary.
//!
//! Pool and position accounts are read through owner and discriminator checked
//! views at fixed Borsh offsets. The instructions the vault needs are encoded by
//! hand (8-byte sighash + Borsh args) and invoked with the vault authority as
//! signer. Position valuation uses the pool's own math from `orca_whirlpools_core`.

use anchor_lang::prelude::*;
use anchor_lang::solana_program::{
    instruction::{AccountMeta, Instruction},
    program::invoke_signed,
};
use orca_whirlpools_core::{tick_index_to_sqrt_price, try_get_amount_delta_a, try_get_amount_delta_b};

use crate::{constants::*, errors::VaultError};

// Whirlpool account layout
const POOL_TICK_SPACING_OFF: usize = 41;
const POOL_LIQUIDITY_OFF: usize = 49;
const POOL_SQRT_PRICE_OFF: usize = 65;
const POOL_TICK_CURRENT_OFF: usize = 81;
const POOL_TOKEN_MINT_A_OFF: usize = 101;
const POOL_TOKEN_VAULT_A_OFF: usize = 133;
const POOL_TOKEN_MINT_B_OFF: usize = 181;
const POOL_TOKEN_VAULT_B_OFF: usize = 213;
const POOL_MIN_LEN: usize = 245;

// Position account layout
const POSITION_WHIRLPOOL_OFF: usize = 8;
const POSITION_MINT_OFF: usize = 40;
const POSITION_LIQUIDITY_OFF: usize = 72;
const POSITION_TICK_LOWER_OFF: usize = 88;
const POSITION_TICK_UPPER_OFF: usize = 92;
const POSITION_FEE_OWED_A_OFF: usize = 112;
const POSITION_FEE_OWED_B_OFF: usize = 136;
const POSITION_MIN_LEN: usize = 144;

/// Fields of a whirlpool pool account the vault relies on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolView {
    pub tick_spacing: u16,
    pub liquidity: u128,
    pub sqrt_price: u128,
    pub tick_current_index: i32,
    pub token_mint_a: Pubkey,
    pub token_vault_a: Pubkey,
    pub token_mint_b: Pubkey,
    pub token_vault_b: Pubkey,
}

/// Fields of a whirlpool position account the vault relies on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PositionView {
    pub whirlpool: Pubkey,
    pub position_mint: Pubkey,
    pub liquidity: u128,
    pub tick_lower_index: i32,
    pub tick_upper_index: i32,
    /// Fees checkpointed into the position and not yet collected
    pub fee_owed_a: u64,
    pub fee_owed_b: u64,
}

fn read_pubkey(data: &[u8], off: usize) -> Pubkey {
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&data[off..off + 32]);
    Pubkey::new_from_array(bytes)
}

fn read_u128(data: &[u8], off: usize) -> u128 {
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&data[off..off + 16]);
    u128::from_le_bytes(bytes)
}

fn read_u64(data: &[u8], off: usize) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&data[off..off + 8]);
    u64::from_le_bytes(bytes)
}

fn read_u16(data: &[u8], off: usize) -> u16 {
    let mut bytes = [0u8; 2];
    bytes.copy_from_slice(&data[off..off + 2]);
    u16::from_le_bytes(bytes)
}

fn read_i32(data: &[u8], off: usize) -> i32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&data[off..off + 4]);
    i32::from_le_bytes(bytes)
}

impl PoolView {
    pub fn parse(data: &[u8]) -> Result<Self> {
        require!(
            data.len() >= POOL_MIN_LEN && data[..8] == WHIRLPOOL_DISCRIMINATOR,
            VaultError::InvalidPoolAccount
        );
        let tick_spacing = read_u16(data, POOL_TICK_SPACING_OFF);
        require!(tick_spacing > 0, VaultError::InvalidPoolAccount);
        Ok(Self {
            tick_spacing,
            liquidity: read_u128(data, POOL_LIQUIDITY_OFF),
            sqrt_price: read_u128(data, POOL_SQRT_PRICE_OFF),
            tick_current_index: read_i32(data, POOL_TICK_CURRENT_OFF),
            token_mint_a: read_pubkey(data, POOL_TOKEN_MINT_A_OFF),
            token_vault_a: read_pubkey(data, POOL_TOKEN_VAULT_A_OFF),
            token_mint_b: read_pubkey(data, POOL_TOKEN_MINT_B_OFF),
            token_vault_b: read_pubkey(data, POOL_TOKEN_VAULT_B_OFF),
        })
    }

    /// Parse a pool account, checking it is owned by the whirlpool program
    pub fn load(info: &AccountInfo) -> Result<Self> {
        require_keys_eq!(*info.owner, WHIRLPOOL_PROGRAM_ID, VaultError::InvalidPoolAccount);
        let data = info.try_borrow_data()?;
        Self::parse(&data)
    }
}

impl PositionView {
    pub fn parse(data: &[u8]) -> Result<Self> {
        require!(
            data.len() >= POSITION_MIN_LEN && data[..8] == POSITION_DISCRIMINATOR,
            VaultError::InvalidPoolAccount
        );
        Ok(Self {
            whirlpool: read_pubkey(data, POSITION_WHIRLPOOL_OFF),
            position_mint: read_pubkey(data, POSITION_MINT_OFF),
            liquidity: read_u128(data, POSITION_LIQUIDITY_OFF),
            tick_lower_index: read_i32(data, POSITION_TICK_LOWER_OFF),
            tick_upper_index: read_i32(data, POSITION_TICK_UPPER_OFF),
            fee_owed_a: read_u64(data, POSITION_FEE_OWED_A_OFF),
            fee_owed_b: read_u64(data, POSITION_FEE_OWED_B_OFF),
        })
    }

    pub fn load(info: &AccountInfo) -> Result<Self> {
        require_keys_eq!(*info.owner, WHIRLPOOL_PROGRAM_ID, VaultError::InvalidPoolAccount);
        let data = info.try_borrow_data()?;
        Self::parse(&data)
    }
}

/// Tokens `liquidity` is worth over `[tick_lower, tick_upper]` at the pool's
/// current price. Below the range it is all token A, above it all token B.
pub fn liquidity_amounts(
    pool: &PoolView,
    liquidity: u128,
    tick_lower: i32,
    tick_upper: i32,
    round_up: bool,
) -> Result<(u64, u64)> {
    let sqrt_price_lower = tick_index_to_sqrt_price(tick_lower);
    let sqrt_price_upper = tick_index_to_sqrt_price(tick_upper);
    let delta_a = |from: u128, to: u128| {
        try_get_amount_delta_a(from, to, liquidity, round_up)
            .map_err(|_| error!(VaultError::ArithmeticOverflow))
    };
    let delta_b = |from: u128, to: u128| {
        try_get_amount_delta_b(from, to, liquidity, round_up)
            .map_err(|_| error!(VaultError::ArithmeticOverflow))
    };

    if pool.tick_current_index < tick_lower {
        Ok((delta_a(sqrt_price_lower, sqrt_price_upper)?, 0))
    } else if pool.tick_current_index < tick_upper {
        Ok((
            delta_a(pool.sqrt_price, sqrt_price_upper)?,
            delta_b(sqrt_price_lower, pool.sqrt_price)?,
        ))
    } else {
        Ok((0, delta_b(sqrt_price_lower, sqrt_price_upper)?))
    }
}

/// What the position would return if fully withdrawn now: its liquidity marked
/// to the pool price plus uncollected fees
pub fn position_amounts(pool: &PoolView, position: &PositionView, round_up: bool) -> Result<(u64, u64)> {
    let (amount_a, amount_b) = liquidity_amounts(
        pool,
        position.liquidity,
        position.tick_lower_index,
        position.tick_upper_index,
        round_up,
    )?;
    Ok((
        amount_a
            .checked_add(position.fee_owed_a)
            .ok_or(VaultError::ArithmeticOverflow)?,
        amount_b
            .checked_add(position.fee_owed_b)
            .ok_or(VaultError::ArithmeticOverflow)?,
    ))
}

/// open_position(bumps: OpenPositionBumps { position_bump }, tick_lower, tick_upper)
pub fn open_position_data(tick_lower: i32, tick_upper: i32) -> Vec<u8> {
    let mut data = Vec::with_capacity(17);
    data.extend_from_slice(&OPEN_POSITION_IX);
    // Position bump is ignored by the whirlpool program
    data.push(0);
    data.extend_from_slice(&tick_lower.to_le_bytes());
    data.extend_from_slice(&tick_upper.to_le_bytes());
    data
}

/// increase_liquidity / decrease_liquidity share one argument layout
pub fn modify_liquidity_data(discriminator: [u8; 8], liquidity: u128, token_a: u64, token_b: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(40);
    data.extend_from_slice(&discriminator);
    data.extend_from_slice(&liquidity.to_le_bytes());
    data.extend_from_slice(&token_a.to_le_bytes());
    data.extend_from_slice(&token_b.to_le_bytes());
    data
}

/// Accounts of the whirlpool `open_position` instruction, in program order
pub struct OpenPositionAccounts<'a, 'info> {
    pub funder: &'a AccountInfo<'info>,
    pub owner: &'a AccountInfo<'info>,
    pub position: &'a AccountInfo<'info>,
    pub position_mint: &'a AccountInfo<'info>,
    pub position_token_account: &'a AccountInfo<'info>,
    pub whirlpool: &'a AccountInfo<'info>,
    pub token_program: &'a AccountInfo<'info>,
    pub system_program: &'a AccountInfo<'info>,
    pub rent: &'a AccountInfo<'info>,
    pub associated_token_program: &'a AccountInfo<'info>,
}

/// Accounts shared by `increase_liquidity` and `decrease_liquidity`
pub struct ModifyLiquidityAccounts<'a, 'info> {
    pub whirlpool: &'a AccountInfo<'info>,
    pub token_program: &'a AccountInfo<'info>,
    pub position_authority: &'a AccountInfo<'info>,
    pub position: &'a AccountInfo<'info>,
    pub position_token_account: &'a AccountInfo<'info>,
    pub token_owner_account_a: &'a AccountInfo<'info>,
    pub token_owner_account_b: &'a AccountInfo<'info>,
    pub token_vault_a: &'a AccountInfo<'info>,
    pub token_vault_b: &'a AccountInfo<'info>,
    pub tick_array_lower: &'a AccountInfo<'info>,
    pub tick_array_upper: &'a AccountInfo<'info>,
}

pub struct CollectFeesAccounts<'a, 'info> {
    pub whirlpool: &'a AccountInfo<'info>,
    pub position_authority: &'a AccountInfo<'info>,
    pub position: &'a AccountInfo<'info>,
    pub position_token_account: &'a AccountInfo<'info>,
    pub token_owner_account_a: &'a AccountInfo<'info>,
    pub token_vault_a: &'a AccountInfo<'info>,
    pub token_owner_account_b: &'a AccountInfo<'info>,
    pub token_vault_b: &'a AccountInfo<'info>,
    pub token_program: &'a AccountInfo<'info>,
}

pub struct ClosePositionAccounts<'a, 'info> {
    pub position_authority: &'a AccountInfo<'info>,
    pub receiver: &'a AccountInfo<'info>,
    pub position: &'a AccountInfo<'info>,
    pub position_mint: &'a AccountInfo<'info>,
    pub position_token_account: &'a AccountInfo<'info>,
    pub token_program: &'a AccountInfo<'info>,
}

fn invoke_whirlpool<'info>(
    program: &AccountInfo<'info>,
    metas: Vec<AccountMeta>,
    infos: &[AccountInfo<'info>],
    data: Vec<u8>,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    require_keys_eq!(program.key(), WHIRLPOOL_PROGRAM_ID, VaultError::AccountMismatch);
    let ix = Instruction {
        program_id: WHIRLPOOL_PROGRAM_ID,
        accounts: metas,
        data,
    };
    let mut all = infos.to_vec();
    all.push(program.clone());
    invoke_signed(&ix, &all, signer_seeds)?;
    Ok(())
}

pub fn open_position<'info>(
    program: &AccountInfo<'info>,
    accounts: OpenPositionAccounts<'_, 'info>,
    tick_lower: i32,
    tick_upper: i32,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    let metas = vec![
        AccountMeta::new(accounts.funder.key(), true),
        AccountMeta::new_readonly(accounts.owner.key(), false),
        AccountMeta::new(accounts.position.key(), false),
        AccountMeta::new(accounts.position_mint.key(), true),
        AccountMeta::new(accounts.position_token_account.key(), false),
        AccountMeta::new_readonly(accounts.whirlpool.key(), false),
        AccountMeta::new_readonly(accounts.token_program.key(), false),
        AccountMeta::new_readonly(accounts.system_program.key(), false),
        AccountMeta::new_readonly(accounts.rent.key(), false),
        AccountMeta::new_readonly(accounts.associated_token_program.key(), false),
    ];
    let infos = [
        accounts.funder.clone(),
        accounts.owner.clone(),
        accounts.position.clone(),
        accounts.position_mint.clone(),
        accounts.position_token_account.clone(),
        accounts.whirlpool.clone(),
        accounts.token_program.clone(),
        accounts.system_program.clone(),
        accounts.rent.clone(),
        accounts.associated_token_program.clone(),
    ];
    invoke_whirlpool(
        program,
        metas,
        &infos,
        open_position_data(tick_lower, tick_upper),
        signer_seeds,
    )
}

/// Shared by increase (`INCREASE_LIQUIDITY_IX`, token maxima) and decrease
/// (`DECREASE_LIQUIDITY_IX`, token minima)
pub fn modify_liquidity<'info>(
    program: &AccountInfo<'info>,
    accounts: ModifyLiquidityAccounts<'_, 'info>,
    discriminator: [u8; 8],
    liquidity: u128,
    token_a: u64,
    token_b: u64,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    let metas = vec![
        AccountMeta::new(accounts.whirlpool.key(), false),
        AccountMeta::new_readonly(accounts.token_program.key(), false),
        AccountMeta::new_readonly(accounts.position_authority.key(), true),
        AccountMeta::new(accounts.position.key(), false),
        AccountMeta::new_readonly(accounts.position_token_account.key(), false),
        AccountMeta::new(accounts.token_owner_account_a.key(), false),
        AccountMeta::new(accounts.token_owner_account_b.key(), false),
        AccountMeta::new(accounts.token_vault_a.key(), false),
        AccountMeta::new(accounts.token_vault_b.key(), false),
        AccountMeta::new(accounts.tick_array_lower.key(), false),
        AccountMeta::new(accounts.tick_array_upper.key(), false),
    ];
    let infos = [
        accounts.whirlpool.clone(),
        accounts.token_program.clone(),
        accounts.position_authority.clone(),
        accounts.position.clone(),
        accounts.position_token_account.clone(),
        accounts.token_owner_account_a.clone(),
        accounts.token_owner_account_b.clone(),
        accounts.token_vault_a.clone(),
        accounts.token_vault_b.clone(),
        accounts.tick_array_lower.clone(),
        accounts.tick_array_upper.clone(),
    ];
    invoke_whirlpool(
        program,
        metas,
        &infos,
        modify_liquidity_data(discriminator, liquidity, token_a, token_b),
        signer_seeds,
    )
}

pub fn collect_fees<'info>(
    program: &AccountInfo<'info>,
    accounts: CollectFeesAccounts<'_, 'info>,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    let metas = vec![
        AccountMeta::new_readonly(accounts.whirlpool.key(), false),
        AccountMeta::new_readonly(accounts.position_authority.key(), true),
        AccountMeta::new(accounts.position.key(), false),
        AccountMeta::new_readonly(accounts.position_token_account.key(), false),
        AccountMeta::new(accounts.token_owner_account_a.key(), false),
        AccountMeta::new(accounts.token_vault_a.key(), false),
        AccountMeta::new(accounts.token_owner_account_b.key(), false),
        AccountMeta::new(accounts.token_vault_b.key(), false),
        AccountMeta::new_readonly(accounts.token_program.key(), false),
    ];
    let infos = [
        accounts.whirlpool.clone(),
        accounts.position_authority.clone(),
        accounts.position.clone(),
        accounts.position_token_account.clone(),
        accounts.token_owner_account_a.clone(),
        accounts.token_vault_a.clone(),
        accounts.token_owner_account_b.clone(),
        accounts.token_vault_b.clone(),
        accounts.token_program.clone(),
    ];
    invoke_whirlpool(program, metas, &infos, COLLECT_FEES_IX.to_vec(), signer_seeds)
}

pub fn close_position<'info>(
    program: &AccountInfo<'info>,
    accounts: ClosePositionAccounts<'_, 'info>,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    let metas = vec![
        AccountMeta::new_readonly(accounts.position_authority.key(), true),
        AccountMeta::new(accounts.receiver.key(), false),
        AccountMeta::new(accounts.position.key(), false),
        AccountMeta::new(accounts.position_mint.key(), false),
        AccountMeta::new(accounts.position_token_account.key(), false),
        AccountMeta::new_readonly(accounts.token_program.key(), false),
    ];
    let infos = [
        accounts.position_authority.clone(),
        accounts.receiver.clone(),
        accounts.position.clone(),
        accounts.position_mint.clone(),
        accounts.position_token_account.clone(),
        accounts.token_program.clone(),
    ];
    invoke_whirlpool(program, metas, &infos, CLOSE_POSITION_IX.to_vec(), signer_seeds)
}
