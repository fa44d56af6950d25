use anchor_lang::prelude::*;
use clmm_vault::{
    constants::*,
    ledger::{self, Valuation},
    whirlpool::{liquidity_amounts, modify_liquidity_data, position_amounts, PoolView, PositionView},
};
use orca_whirlpools_core::tick_index_to_sqrt_price;

#[test]
fn test_pda_derivation_per_whirlpool() {
    let program_id = clmm_vault::id();
    let whirlpool_1 = Pubkey::new_unique();
    let whirlpool_2 = Pubkey::new_unique();

    let (vault_1, _) = Pubkey::find_program_address(&[VAULT_SEED, whirlpool_1.as_ref()], &program_id);
    let (vault_2, _) = Pubkey::find_program_address(&[VAULT_SEED, whirlpool_2.as_ref()], &program_id);
    assert_ne!(vault_1, vault_2, "One vault per whirlpool");

    // Re-deriving gives the same address
    let (again, _) = Pubkey::find_program_address(&[VAULT_SEED, whirlpool_1.as_ref()], &program_id);
    assert_eq!(vault_1, again);
}

#[test]
fn test_custody_pdas_are_distinct() {
    let program_id = clmm_vault::id();
    let whirlpool = Pubkey::new_unique();

    let (vault, _) = Pubkey::find_program_address(&[VAULT_SEED, whirlpool.as_ref()], &program_id);
    let (authority, _) =
        Pubkey::find_program_address(&[VAULT_AUTHORITY_SEED, whirlpool.as_ref()], &program_id);
    let (share_mint, _) =
        Pubkey::find_program_address(&[SHARE_MINT_SEED, vault.as_ref()], &program_id);
    let (token_a_vault, _) =
        Pubkey::find_program_address(&[TOKEN_A_VAULT_SEED, vault.as_ref()], &program_id);
    let (token_b_vault, _) =
        Pubkey::find_program_address(&[TOKEN_B_VAULT_SEED, vault.as_ref()], &program_id);

    let all = [vault, authority, share_mint, token_a_vault, token_b_vault];
    for (i, a) in all.iter().enumerate() {
        for b in &all[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn test_authority_seeds_sign_for_derived_address() {
    let program_id = clmm_vault::id();
    let whirlpool = Pubkey::new_unique();
    let (authority, bump) =
        Pubkey::find_program_address(&[VAULT_AUTHORITY_SEED, whirlpool.as_ref()], &program_id);

    let vault = common_vault(whirlpool, bump);
    let seeds = vault.authority_seeds();
    let derived = Pubkey::create_program_address(&seeds, &program_id).unwrap();
    assert_eq!(derived, authority);
}

fn common_vault(whirlpool: Pubkey, authority_bump: u8) -> clmm_vault::state::Vault {
    clmm_vault::state::Vault {
        admin: Pubkey::new_unique(),
        whirlpool,
        token_a_mint: Pubkey::default(),
        token_b_mint: Pubkey::default(),
        token_a_vault: Pubkey::default(),
        token_b_vault: Pubkey::default(),
        share_mint: Pubkey::default(),
        token_a_price: 1,
        token_b_price: 1,
        token_a_decimal: 6,
        token_b_decimal: 6,
        lower_tick: -64,
        upper_tick: 64,
        tick_spacing: 64,
        position: Pubkey::default(),
        position_mint: Pubkey::default(),
        position_liquidity: 0,
        bump: 0,
        authority_bump,
        share_bump: 0,
        token_a_vault_bump: 0,
        token_b_vault_bump: 0,
        _reserved: [0; 64],
    }
}

#[test]
fn test_vault_fits_allocated_space() {
    let vault = common_vault(Pubkey::new_unique(), 255);
    let mut serialized = Vec::new();
    vault.try_serialize(&mut serialized).unwrap();
    assert_eq!(serialized.len(), VAULT_SIZE);
}

#[test]
fn test_modify_liquidity_encoding() {
    let data = modify_liquidity_data(DECREASE_LIQUIDITY_IX, 7, 8, 9);
    assert_eq!(data.len(), 40);
    assert_eq!(data[..8], DECREASE_LIQUIDITY_IX);
    assert_eq!(u128::from_le_bytes(data[8..24].try_into().unwrap()), 7);
    assert_eq!(u64::from_le_bytes(data[24..32].try_into().unwrap()), 8);
    assert_eq!(u64::from_le_bytes(data[32..40].try_into().unwrap()), 9);
}

#[test]
fn test_position_view_reads_range() {
    let whirlpool = Pubkey::new_unique();
    let mint = Pubkey::new_unique();
    let mut data = vec![0u8; 216];
    data[..8].copy_from_slice(&POSITION_DISCRIMINATOR);
    data[8..40].copy_from_slice(whirlpool.as_ref());
    data[40..72].copy_from_slice(mint.as_ref());
    data[72..88].copy_from_slice(&42u128.to_le_bytes());
    data[88..92].copy_from_slice(&(-1000i32).to_le_bytes());
    data[92..96].copy_from_slice(&1000i32.to_le_bytes());
    data[112..120].copy_from_slice(&5u64.to_le_bytes());
    data[136..144].copy_from_slice(&6u64.to_le_bytes());

    let position = PositionView::parse(&data).unwrap();
    assert_eq!(position.whirlpool, whirlpool);
    assert_eq!(position.position_mint, mint);
    assert_eq!(position.liquidity, 42);
    assert_eq!((position.tick_lower_index, position.tick_upper_index), (-1000, 1000));
    assert_eq!((position.fee_owed_a, position.fee_owed_b), (5, 6));

    assert!(PositionView::parse(&data[..143]).is_err());
}

fn pool_at(tick: i32) -> PoolView {
    PoolView {
        tick_spacing: 64,
        liquidity: 0,
        sqrt_price: tick_index_to_sqrt_price(tick),
        tick_current_index: tick,
        token_mint_a: Pubkey::new_unique(),
        token_vault_a: Pubkey::new_unique(),
        token_mint_b: Pubkey::new_unique(),
        token_vault_b: Pubkey::new_unique(),
    }
}

#[test]
fn test_liquidity_below_range_is_all_token_a() {
    let (amount_a, amount_b) = liquidity_amounts(&pool_at(-7000), 1_000_000, -6400, 6400, false).unwrap();
    assert!(amount_a > 0);
    assert_eq!(amount_b, 0);
    // Same amount wherever the price sits below the range
    assert_eq!(
        liquidity_amounts(&pool_at(-100_000), 1_000_000, -6400, 6400, false).unwrap(),
        (amount_a, 0)
    );
}

#[test]
fn test_liquidity_above_range_is_all_token_b() {
    let (amount_a, amount_b) = liquidity_amounts(&pool_at(6400), 1_000_000, -6400, 6400, false).unwrap();
    assert_eq!(amount_a, 0);
    assert!(amount_b > 0);
}

#[test]
fn test_liquidity_in_range_holds_both() {
    let pool = pool_at(0);
    let (down_a, down_b) = liquidity_amounts(&pool, 3_000_000, -6400, 6400, false).unwrap();
    let (up_a, up_b) = liquidity_amounts(&pool, 3_000_000, -6400, 6400, true).unwrap();

    // Symmetric range around tick 0 holds roughly equal amounts
    assert!(down_a > 800_000 && down_a < 850_000);
    assert!(down_a.abs_diff(down_b) <= 2);
    assert!(up_a >= down_a && up_a - down_a <= 1);
    assert!(up_b >= down_b && up_b - down_b <= 1);

    // Price rising through the range converts A into more B
    let (high_a, high_b) = liquidity_amounts(&pool_at(3200), 3_000_000, -6400, 6400, false).unwrap();
    assert!(high_a < down_a);
    assert!(high_b > down_b);
}

#[test]
fn test_position_amounts_include_fees_owed() {
    let pool = pool_at(0);
    let mut position = PositionView {
        whirlpool: Pubkey::new_unique(),
        position_mint: Pubkey::new_unique(),
        liquidity: 0,
        tick_lower_index: -6400,
        tick_upper_index: 6400,
        fee_owed_a: 11,
        fee_owed_b: 22,
    };
    assert_eq!(position_amounts(&pool, &position, false).unwrap(), (11, 22));

    position.liquidity = 3_000_000;
    let (amount_a, amount_b) = liquidity_amounts(&pool, 3_000_000, -6400, 6400, false).unwrap();
    assert_eq!(
        position_amounts(&pool, &position, false).unwrap(),
        (amount_a + 11, amount_b + 22)
    );

    position.fee_owed_a = u64::MAX;
    assert!(position_amounts(&pool, &position, false).is_err());
}

#[test]
fn test_share_calculation_prevents_overflow() {
    let valuation = Valuation {
        price_a: MAX_REFERENCE_PRICE,
        price_b: MAX_REFERENCE_PRICE,
        decimals_a: 9,
        decimals_b: 6,
    };
    // u64::MAX of each token at the highest allowed price still fits u128
    let value = valuation.value(u64::MAX, u64::MAX);
    assert!(value.is_ok());

    // ...but the first-deposit share count does not fit u64
    assert!(ledger::shares_for_deposit(&valuation, u64::MAX, u64::MAX, 0, 0, 0).is_err());
}
