// Constants for the CLMM vault program

use anchor_lang::prelude::*;

/// Seed for vault state PDA (keyed by the whirlpool)
pub const VAULT_SEED: &[u8] = b"vault";

/// Seed for the PDA that owns custody accounts, the share mint and the position
pub const VAULT_AUTHORITY_SEED: &[u8] = b"vault_authority";

/// Seed for share mint PDA (keyed by the vault)
pub const SHARE_MINT_SEED: &[u8] = b"shares";

/// Seeds for the two custody token accounts (keyed by the vault)
pub const TOKEN_A_VAULT_SEED: &[u8] = b"token_a_vault";
pub const TOKEN_B_VAULT_SEED: &[u8] = b"token_b_vault";

/// Decimals of the share mint; the first deposit is scaled to this base
pub const SHARE_DECIMALS: u8 = 6;

/// Tick bounds accepted by the whirlpool program
pub const MIN_TICK_INDEX: i32 = -443_636;
pub const MAX_TICK_INDEX: i32 = 443_636;

/// Upper bound on an admin reference price (price per whole token, fixed-point)
pub const MAX_REFERENCE_PRICE: u64 = 1_000_000_000_000_000;

/// Space for Vault account (8 discriminator + 7 pubkeys + 2 prices + 2 decimals +
/// 2 ticks + tick spacing + position + position_mint + liquidity + 5 bumps +
/// 64 padding)
pub const VAULT_SIZE: usize =
    8 + 32 * 7 + 8 + 8 + 1 + 1 + 4 + 4 + 2 + 32 + 32 + 16 + 5 + 64;

/// Orca whirlpool program
pub const WHIRLPOOL_PROGRAM_ID: Pubkey = pubkey!("whirLbMiicVdio4qvUfM5KAg6Ct8VwpYzGff3uctyCc");

/// Anchor account discriminators of the whirlpool program
pub const WHIRLPOOL_DISCRIMINATOR: [u8; 8] = [63, 149, 209, 12, 225, 128, 99, 9];
pub const POSITION_DISCRIMINATOR: [u8; 8] = [170, 188, 143, 228, 122, 64, 247, 208];

/// Anchor instruction sighashes of the whirlpool program
pub const OPEN_POSITION_IX: [u8; 8] = [135, 128, 47, 77, 15, 152, 240, 49];
pub const INCREASE_LIQUIDITY_IX: [u8; 8] = [46, 156, 243, 118, 13, 205, 251, 178];
pub const DECREASE_LIQUIDITY_IX: [u8; 8] = [160, 38, 208, 111, 104, 91, 44, 1];
pub const COLLECT_FEES_IX: [u8; 8] = [164, 152, 207, 99, 30, 186, 19, 182];
pub const CLOSE_POSITION_IX: [u8; 8] = [123, 134, 81, 0, 49, 68, 98, 98];
