//! # Swap Instructions
//!
//! Builders for the Phoenix `Swap` instruction (an immediate-or-cancel order
//! packet) and the compute budget instructions used for priority fees.

use super::market::Market;
use super::types::Side;
use super::{log_authority, PHOENIX_PROGRAM_ID};
use lib_core::{AppError, Result};
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use spl_associated_token_account::get_associated_token_address;
use spl_associated_token_account::instruction::create_associated_token_account_idempotent;

/// Compute unit limit requested when a priority fee is set.
pub const COMPUTE_UNIT_LIMIT: u32 = 1_000_000;
pub const MICROLAMPORTS_PER_LAMPORT: u64 = 1_000_000;
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;
pub const MICROLAMPORTS_PER_SOL: f64 = (LAMPORTS_PER_SOL * MICROLAMPORTS_PER_LAMPORT) as f64;

pub const COMPUTE_BUDGET_PROGRAM_ID: Pubkey =
    Pubkey::from_str_const("ComputeBudget111111111111111111111111111111");

const SWAP_INSTRUCTION_TAG: u8 = 0;
const IMMEDIATE_OR_CANCEL_TAG: u8 = 2;
const SELF_TRADE_CANCEL_PROVIDE: u8 = 1;

/// Lot-denominated swap order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapOrder {
    pub side: Side,
    pub num_base_lots: u64,
    pub num_quote_lots: u64,
    pub min_base_lots_to_fill: u64,
    pub min_quote_lots_to_fill: u64,
}

impl SwapOrder {
    /// Size an order for `in_amount` UI units, accepting `slippage` below the expected output.
    pub fn for_market(market: &Market, side: Side, in_amount: f64, slippage: f64) -> Result<Self> {
        if !(in_amount > 0.0) {
            return Err(AppError::InvalidInput("Swap amount must be positive".to_string()));
        }
        if !(0.0..1.0).contains(&slippage) {
            return Err(AppError::InvalidInput("Slippage must be between 0 and 1".to_string()));
        }

        let header = &market.header;
        let min_out = market.expected_out(side, in_amount) * (1.0 - slippage);
        let order = match side {
            Side::Bid => SwapOrder {
                side,
                num_base_lots: 0,
                num_quote_lots: header.quote_units_to_lots(in_amount),
                min_base_lots_to_fill: header.base_units_to_lots(min_out),
                min_quote_lots_to_fill: 0,
            },
            Side::Ask => SwapOrder {
                side,
                num_base_lots: header.base_units_to_lots(in_amount),
                num_quote_lots: 0,
                min_base_lots_to_fill: 0,
                min_quote_lots_to_fill: header.quote_units_to_lots(min_out),
            },
        };

        if order.num_base_lots == 0 && order.num_quote_lots == 0 {
            return Err(AppError::InvalidInput(
                "Swap amount is smaller than one lot".to_string(),
            ));
        }
        Ok(order)
    }

    /// Borsh encoding of `PhoenixInstruction::Swap(OrderPacket::ImmediateOrCancel { .. })`.
    pub fn encode(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(80);
        data.push(SWAP_INSTRUCTION_TAG);
        data.push(IMMEDIATE_OR_CANCEL_TAG);
        data.push(self.side.discriminant());
        data.push(0); // price_in_ticks: None
        data.extend_from_slice(&self.num_base_lots.to_le_bytes());
        data.extend_from_slice(&self.num_quote_lots.to_le_bytes());
        data.extend_from_slice(&self.min_base_lots_to_fill.to_le_bytes());
        data.extend_from_slice(&self.min_quote_lots_to_fill.to_le_bytes());
        data.push(SELF_TRADE_CANCEL_PROVIDE);
        data.push(0); // match_limit: None
        data.extend_from_slice(&0u128.to_le_bytes()); // client_order_id
        data.push(0); // use_only_deposited_funds
        data.push(0); // last_valid_slot: None
        data.push(0); // last_valid_unix_timestamp_in_seconds: None
        data
    }
}

/// Instructions for a market swap: idempotent ATA creation for the output mint, then the swap.
///
/// The input account must already hold the tokens being paid, so only the
/// receiving side may need creating.
pub fn swap_instructions(
    market: &Market,
    side: Side,
    in_amount: f64,
    slippage: f64,
    trader: &Pubkey,
) -> Result<Vec<Instruction>> {
    let order = SwapOrder::for_market(market, side, in_amount, slippage)?;
    let token_program = spl_token::id();
    let base_mint = market.header.base_mint;
    let quote_mint = market.header.quote_mint;
    let base_account = get_associated_token_address(trader, &base_mint);
    let quote_account = get_associated_token_address(trader, &quote_mint);

    let swap = Instruction {
        program_id: PHOENIX_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new_readonly(PHOENIX_PROGRAM_ID, false),
            AccountMeta::new_readonly(log_authority(), false),
            AccountMeta::new(market.address, false),
            AccountMeta::new_readonly(*trader, true),
            AccountMeta::new(base_account, false),
            AccountMeta::new(quote_account, false),
            AccountMeta::new(market.header.base_vault, false),
            AccountMeta::new(market.header.quote_vault, false),
            AccountMeta::new_readonly(token_program, false),
        ],
        data: order.encode(),
    };

    let out_mint = match side {
        Side::Bid => base_mint,
        Side::Ask => quote_mint,
    };

    Ok(vec![
        create_associated_token_account_idempotent(trader, trader, &out_mint, &token_program),
        swap,
    ])
}

/// Micro-lamports per compute unit that spend `priority_fee_sol` over [`COMPUTE_UNIT_LIMIT`].
pub fn priority_fee_micro_lamports(priority_fee_sol: f64) -> u64 {
    (priority_fee_sol * MICROLAMPORTS_PER_SOL / COMPUTE_UNIT_LIMIT as f64).round() as u64
}

pub fn set_compute_unit_limit(units: u32) -> Instruction {
    let mut data = Vec::with_capacity(5);
    data.push(2);
    data.extend_from_slice(&units.to_le_bytes());
    Instruction {
        program_id: COMPUTE_BUDGET_PROGRAM_ID,
        accounts: vec![],
        data,
    }
}

pub fn set_compute_unit_price(micro_lamports: u64) -> Instruction {
    let mut data = Vec::with_capacity(9);
    data.push(3);
    data.extend_from_slice(&micro_lamports.to_le_bytes());
    Instruction {
        program_id: COMPUTE_BUDGET_PROGRAM_ID,
        accounts: vec![],
        data,
    }
}

/// Compute budget pair for a non-zero priority fee; empty when the fee is zero.
pub fn priority_fee_instructions(priority_fee_sol: f64) -> Vec<Instruction> {
    if !(priority_fee_sol > 0.0) {
        return Vec::new();
    }
    vec![
        set_compute_unit_limit(COMPUTE_UNIT_LIMIT),
        set_compute_unit_price(priority_fee_micro_lamports(priority_fee_sol)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phoenix::market::test_support::sample_market;

    #[test]
    fn test_priority_fee_conversion() {
        assert_eq!(priority_fee_micro_lamports(0.000005), 5_000);
        assert_eq!(priority_fee_micro_lamports(0.0005), 500_000);
        assert!(priority_fee_instructions(0.0).is_empty());
    }

    #[test]
    fn test_compute_budget_encoding() {
        let ixs = priority_fee_instructions(0.000005);
        assert_eq!(ixs.len(), 2);
        assert_eq!(ixs[0].data, vec![2, 0x40, 0x42, 0x0f, 0x00]);
        assert_eq!(ixs[1].data[0], 3);
        assert_eq!(u64::from_le_bytes(ixs[1].data[1..9].try_into().unwrap()), 5_000);
    }

    #[test]
    fn test_bid_order_sizes_quote_lots() {
        let market = sample_market(0);
        let order = SwapOrder::for_market(&market, Side::Bid, 10.0, 0.5).unwrap();
        assert_eq!(order.num_quote_lots, 10_000_000);
        assert_eq!(order.num_base_lots, 0);
        // 0.5 base expected, 0.25 after slippage = 250 lots of 0.001
        assert_eq!(order.min_base_lots_to_fill, 250);
    }

    #[test]
    fn test_ask_order_sizes_base_lots() {
        let market = sample_market(0);
        let order = SwapOrder::for_market(&market, Side::Ask, 1.0, 0.0).unwrap();
        assert_eq!(order.num_base_lots, 1_000);
        assert_eq!(order.min_quote_lots_to_fill, 19_000_000);
    }

    #[test]
    fn test_order_rejects_bad_inputs() {
        let market = sample_market(0);
        assert!(SwapOrder::for_market(&market, Side::Ask, 0.0, 0.005).is_err());
        assert!(SwapOrder::for_market(&market, Side::Ask, 1.0, 1.5).is_err());
        assert!(SwapOrder::for_market(&market, Side::Ask, 0.0000001, 0.005).is_err());
    }

    #[test]
    fn test_swap_instruction_layout() {
        let market = sample_market(0);
        let trader = Pubkey::new_from_array([9; 32]);
        let ixs = swap_instructions(&market, Side::Ask, 1.0, 0.005, &trader).unwrap();
        assert_eq!(ixs.len(), 2);

        let swap = &ixs[1];
        assert_eq!(swap.program_id, PHOENIX_PROGRAM_ID);
        assert_eq!(swap.accounts.len(), 9);
        assert!(swap.accounts[3].is_signer);
        assert_eq!(swap.accounts[2].pubkey, market.address);
        assert_eq!(swap.data[0], 0);
        assert_eq!(swap.data[1], 2);
        assert_eq!(swap.data[2], 1);
        assert_eq!(swap.data.len(), 1 + 1 + 1 + 1 + 32 + 1 + 1 + 16 + 1 + 1 + 1);
    }

    #[test]
    fn test_only_output_account_is_created() {
        let market = sample_market(0);
        let trader = Pubkey::new_from_array([9; 32]);
        // Create-idempotent lists the new account at index 1 and the mint at index 3
        let created = |side: Side| {
            let ixs = swap_instructions(&market, side, 1.0, 0.005, &trader).unwrap();
            let creates: Vec<_> = ixs.iter().filter(|ix| ix.program_id != PHOENIX_PROGRAM_ID).collect();
            assert_eq!(creates.len(), 1);
            (creates[0].accounts[1].pubkey, creates[0].accounts[3].pubkey)
        };

        let quote_mint = market.header.quote_mint;
        let base_mint = market.header.base_mint;
        assert_eq!(
            created(Side::Ask),
            (get_associated_token_address(&trader, &quote_mint), quote_mint)
        );
        assert_eq!(
            created(Side::Bid),
            (get_associated_token_address(&trader, &base_mint), base_mint)
        );
    }
}
