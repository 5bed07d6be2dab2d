//! # Swap Flow
//!
//! Token selection rules, the quick swap command, and transaction submission.
//!
//! Submission builds the Phoenix swap (plus compute budget instructions when
//! a priority fee is set), signs it with the connected wallet, sends it
//! without preflight, and waits for `processed`.

use crate::core::error::{Result, TerminalError};
use crate::core::service::TransactionSigner;
use crate::services::wallet::WalletError;
use lib_solana::phoenix::instructions::{priority_fee_instructions, swap_instructions};
use lib_solana::{Connection, Market, Side, Token};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

pub const INVALID_SWAP_COMMAND: &str = "Invalid swap command";
pub const SWAP_CANCELLED: &str = "Swap transaction cancelled.";
pub const SWAP_FAILED: &str = "Swap transaction failed.";

// region: --- Token selection

/// `Bid` when paying with the market's quote token.
pub fn side_for(market: &Market, in_token: &Token) -> Side {
    market.side_for_input(&in_token.mint)
}

fn pairs_with(markets: &[Arc<Market>], a: &Token, b: &Token) -> bool {
    markets.iter().any(|m| {
        (m.base_token.symbol == a.symbol && m.quote_token.symbol == b.symbol)
            || (m.base_token.symbol == b.symbol && m.quote_token.symbol == a.symbol)
    })
}

/// Tokens that share a market with `other`, or every token when nothing is selected.
pub fn token_options(markets: &[Arc<Market>], tokens: &[Token], other: Option<&Token>) -> Vec<Token> {
    match other {
        Some(other) => tokens
            .iter()
            .filter(|t| pairs_with(markets, other, t))
            .cloned()
            .collect(),
        None => tokens.to_vec(),
    }
}

/// First market listing `token` on either side.
pub fn market_for_token(markets: &[Arc<Market>], token: &Token) -> Option<Arc<Market>> {
    markets.iter().find(|m| m.contains_token(&token.symbol)).cloned()
}

/// Market trading `a` against `b`, in either direction.
pub fn market_for_pair(markets: &[Arc<Market>], a: &Token, b: &Token) -> Option<Arc<Market>> {
    markets
        .iter()
        .find(|m| {
            (m.base_token.mint == a.mint && m.quote_token.mint == b.mint)
                || (m.base_token.mint == b.mint && m.quote_token.mint == a.mint)
        })
        .cloned()
}

// endregion: --- Token selection

// region: --- Quick swap

/// Parsed `"5 wSOL to USDC"`.
#[derive(Debug, Clone, PartialEq)]
pub struct QuickSwap {
    pub market: Pubkey,
    pub in_token: Token,
    pub out_token: Token,
    /// Empty when the command carried no amount
    pub in_amount: String,
}

/// Parse a quick swap command: `[amount] IN [to] OUT`, symbols case-insensitive.
pub fn parse_quick_swap(command: &str, markets: &[Arc<Market>], tokens: &[Token]) -> Result<QuickSwap> {
    let invalid = || TerminalError::Validation(INVALID_SWAP_COMMAND.to_string());
    let segments: Vec<&str> = command.split_whitespace().filter(|s| *s != "to").collect();

    let has_amount = segments.first().is_some_and(|s| s.parse::<f64>().is_ok());
    let offset = usize::from(has_amount);
    let find = |i: usize| {
        segments
            .get(i + offset)
            .and_then(|sym| tokens.iter().find(|t| t.symbol.eq_ignore_ascii_case(sym)))
    };

    let (in_token, out_token) = match (find(0), find(1)) {
        (Some(i), Some(o)) => (i.clone(), o.clone()),
        _ => return Err(invalid()),
    };

    let market = market_for_pair(markets, &in_token, &out_token).ok_or_else(invalid)?;

    Ok(QuickSwap {
        market: market.address,
        in_amount: if has_amount { segments[0].to_string() } else { String::new() },
        in_token,
        out_token,
    })
}

// endregion: --- Quick swap

// region: --- Submission

#[derive(Debug, Clone)]
pub struct SwapRequest {
    pub market: Arc<Market>,
    pub in_token: Token,
    pub out_token: Token,
    pub in_amount: f64,
    pub slippage: f64,
    /// SOL; zero adds no compute budget instructions
    pub priority_fee: f64,
}

impl SwapRequest {
    pub fn side(&self) -> Side {
        side_for(&self.market, &self.in_token)
    }

    pub fn expected_out(&self) -> f64 {
        self.market.expected_out(self.side(), self.in_amount)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwapReceipt {
    pub signature: Signature,
    pub in_amount: f64,
    pub out_amount: f64,
    /// Set when the transaction landed but failed on-chain
    pub on_chain_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SwapOutcome {
    Landed(SwapReceipt),
    Cancelled,
}

/// Unsigned swap transaction paid by `payer`.
pub fn build_swap_transaction(request: &SwapRequest, payer: &Pubkey) -> Result<Transaction> {
    let mut instructions = priority_fee_instructions(request.priority_fee);
    instructions.extend(swap_instructions(
        &request.market,
        request.side(),
        request.in_amount,
        request.slippage,
        payer,
    )?);
    Ok(Transaction::new_with_payer(&instructions, Some(payer)))
}

/// Build, sign, send and confirm a swap.
///
/// A wallet that goes away before signing yields [`SwapOutcome::Cancelled`].
pub async fn execute_swap(
    connection: &Connection,
    signer: &dyn TransactionSigner,
    request: &SwapRequest,
) -> Result<SwapOutcome> {
    let start = Instant::now();
    let payer = signer
        .pubkey()
        .ok_or_else(|| TerminalError::Wallet("Connect a wallet to swap".to_string()))?;

    let out_amount = request.expected_out();
    let mut transaction = build_swap_transaction(request, &payer)?;
    let blockhash = connection.latest_blockhash().await?;

    match signer.sign(&mut transaction, blockhash) {
        Ok(_) => {}
        Err(WalletError::Rejected(reason)) => {
            warn!(reason = %reason, "Swap signing rejected");
            return Ok(SwapOutcome::Cancelled);
        }
        Err(e) => return Err(e.into()),
    }

    let signature = connection.send_transaction_skip_preflight(&transaction).await?;
    info!(
        market = %request.market.address,
        side = ?request.side(),
        in_amount = request.in_amount,
        signature = %signature,
        "Swap submitted"
    );

    let on_chain_error = connection.confirm_processed(&signature).await?;
    match &on_chain_error {
        Some(err) => error!(signature = %signature, error = %err, "Swap transaction failed"),
        None => info!(
            signature = %signature,
            duration_ms = start.elapsed().as_millis() as u64,
            "Swap confirmed"
        ),
    }

    Ok(SwapOutcome::Landed(SwapReceipt {
        signature,
        in_amount: request.in_amount,
        out_amount,
        on_chain_error,
    }))
}

/// `"1.00 USDC ⇄ 0.05 wSOL"`
pub fn success_message(receipt: &SwapReceipt, in_symbol: &str, out_symbol: &str) -> String {
    format!(
        "{:.2} {} ⇄ {:.2} {}",
        receipt.in_amount, in_symbol, receipt.out_amount, out_symbol
    )
}

// endregion: --- Submission

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures;
    use lib_solana::phoenix::instructions::COMPUTE_BUDGET_PROGRAM_ID;

    fn catalog() -> (Vec<Arc<Market>>, Vec<Token>) {
        let (markets, tokens) = fixtures::sample_markets();
        (markets.into_iter().map(Arc::new).collect(), tokens)
    }

    fn symbols(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.symbol.as_str()).collect()
    }

    #[test]
    fn test_quick_swap_with_amount() {
        let (markets, tokens) = catalog();
        let parsed = parse_quick_swap("5 wsol to USDC", &markets, &tokens).unwrap();
        assert_eq!(parsed.in_amount, "5");
        assert_eq!(parsed.in_token.symbol, "wSOL");
        assert_eq!(parsed.out_token.symbol, "USDC");
        assert_eq!(parsed.market, Pubkey::new_from_array([11; 32]));
    }

    #[test]
    fn test_quick_swap_reverse_pair_without_amount() {
        let (markets, tokens) = catalog();
        let parsed = parse_quick_swap("USDC to wSOL", &markets, &tokens).unwrap();
        assert!(parsed.in_amount.is_empty());
        assert_eq!(parsed.in_token.symbol, "USDC");
        assert_eq!(parsed.market, Pubkey::new_from_array([11; 32]));
    }

    #[test]
    fn test_quick_swap_rejects_unlisted_pair() {
        let (markets, tokens) = catalog();
        for command in ["5 BONK to JUP", "5 DOGE to USDC", "", "wSOL"] {
            let err = parse_quick_swap(command, &markets, &tokens).unwrap_err();
            assert_eq!(err.user_message(), INVALID_SWAP_COMMAND);
        }
    }

    #[test]
    fn test_token_options_follow_markets() {
        let (markets, tokens) = catalog();
        let usdc = &tokens[1];
        assert_eq!(symbols(&token_options(&markets, &tokens, Some(usdc))), vec!["wSOL", "BONK"]);
        let wsol = &tokens[0];
        assert_eq!(symbols(&token_options(&markets, &tokens, Some(wsol))), vec!["USDC", "JUP"]);
        assert_eq!(token_options(&markets, &tokens, None).len(), 4);
    }

    #[test]
    fn test_market_for_token_takes_first_listing() {
        let (markets, tokens) = catalog();
        let usdc = &tokens[1];
        assert_eq!(market_for_token(&markets, usdc).unwrap().name, "BONK/USDC");
        let wsol = &tokens[0];
        assert_eq!(market_for_pair(&markets, usdc, wsol).unwrap().name, "wSOL/USDC");
        assert!(market_for_pair(&markets, usdc, &tokens[3]).is_none());
    }

    #[test]
    fn test_side_and_expected_out() {
        let (markets, tokens) = catalog();
        let request = SwapRequest {
            market: markets[1].clone(),
            in_token: tokens[1].clone(),
            out_token: tokens[0].clone(),
            in_amount: 20.0,
            slippage: 0.005,
            priority_fee: 0.0,
        };
        assert_eq!(request.side(), Side::Bid);
        assert!((request.expected_out() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_priority_fee_adds_compute_budget() {
        let (markets, tokens) = catalog();
        let payer = Pubkey::new_from_array([60; 32]);
        let mut request = SwapRequest {
            market: markets[1].clone(),
            in_token: tokens[0].clone(),
            out_token: tokens[1].clone(),
            in_amount: 1.0,
            slippage: 0.005,
            priority_fee: 0.0,
        };

        let plain = build_swap_transaction(&request, &payer).unwrap();
        request.priority_fee = 0.000005;
        let boosted = build_swap_transaction(&request, &payer).unwrap();

        let budget_ix = |tx: &Transaction| {
            tx.message
                .instructions
                .iter()
                .filter(|ix| tx.message.account_keys[ix.program_id_index as usize] == COMPUTE_BUDGET_PROGRAM_ID)
                .count()
        };
        assert_eq!(budget_ix(&plain), 0);
        assert_eq!(budget_ix(&boosted), 2);
        assert_eq!(boosted.message.account_keys[0], payer);
    }

    #[test]
    fn test_success_message() {
        let receipt = SwapReceipt {
            signature: Signature::default(),
            in_amount: 5.0,
            out_amount: 97.456,
            on_chain_error: None,
        };
        assert_eq!(success_message(&receipt, "wSOL", "USDC"), "5.00 wSOL ⇄ 97.46 USDC");
    }
}
