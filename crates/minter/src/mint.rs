//! Builds and submits the create-and-mint transaction for a fungible token

use mpl_token_metadata::{
    accounts::Metadata,
    instructions::{CreateV1Builder, MintV1Builder},
    types::TokenStandard,
};
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
};
use spl_associated_token_account::get_associated_token_address;

use crate::client::TransactionSubmitter;
use crate::config::TokenParams;
use crate::core::{
    MinterError, MinterResult, IS_MUTABLE, MAX_URI_LENGTH, SELLER_FEE_BASIS_POINTS,
};

/// What to mint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintRequest {
    pub name: String,
    pub symbol: String,
    /// URI of the uploaded metadata document
    pub uri: String,
    pub decimals: u8,
    /// Supply in whole tokens
    pub amount: u64,
}

impl MintRequest {
    pub fn from_params(params: &TokenParams, uri: String) -> Self {
        Self {
            name: params.name.clone(),
            symbol: params.symbol.clone(),
            uri,
            decimals: params.decimals,
            amount: params.amount,
        }
    }
}

/// Result of a confirmed mint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintOutcome {
    pub signature: Signature,
    /// Address of the new mint
    pub mint: Pubkey,
    /// Token account credited with the supply
    pub token_account: Pubkey,
    /// Supply in base units
    pub amount: u64,
}

/// Instructions of one create-and-mint transaction and what they mint
#[derive(Debug, Clone)]
pub struct MintPlan {
    pub instructions: Vec<Instruction>,
    /// Associated token account receiving the supply
    pub token_account: Pubkey,
    /// Supply in base units, as encoded in `MintV1`
    pub amount: u64,
}

/// `amount` whole tokens expressed in base units of a mint with `decimals`
pub fn scale_amount(amount: u64, decimals: u8) -> MinterResult<u64> {
    10u64
        .checked_pow(decimals as u32)
        .and_then(|factor| amount.checked_mul(factor))
        .ok_or_else(|| {
            MinterError::MathOverflow(format!(
                "{} tokens with {} decimals exceeds u64",
                amount, decimals
            ))
        })
}

/// Instructions creating the metadata-backed mint and minting the supply to
/// `authority`'s associated token account
pub fn build_create_and_mint(
    authority: &Pubkey,
    mint: &Pubkey,
    request: &MintRequest,
) -> MinterResult<MintPlan> {
    if request.uri.is_empty() || request.uri.len() > MAX_URI_LENGTH {
        return Err(MinterError::Mint(format!(
            "metadata uri must be 1 to {} bytes, got {}",
            MAX_URI_LENGTH,
            request.uri.len()
        )));
    }

    let amount = scale_amount(request.amount, request.decimals)?;
    let (metadata, _) = Metadata::find_pda(mint);
    let token_account = get_associated_token_address(authority, mint);

    let create_ix = CreateV1Builder::new()
        .metadata(metadata)
        .mint(*mint, true)
        .authority(*authority)
        .payer(*authority)
        .update_authority(*authority, true)
        .spl_token_program(Some(spl_token::ID))
        .name(request.name.clone())
        .symbol(request.symbol.clone())
        .uri(request.uri.clone())
        .seller_fee_basis_points(SELLER_FEE_BASIS_POINTS)
        .primary_sale_happened(false)
        .is_mutable(IS_MUTABLE)
        .token_standard(TokenStandard::Fungible)
        .decimals(request.decimals)
        .instruction();

    let mint_ix = MintV1Builder::new()
        .token(token_account)
        .token_owner(Some(*authority))
        .metadata(metadata)
        .mint(*mint)
        .authority(*authority)
        .payer(*authority)
        .amount(amount)
        .instruction();

    Ok(MintPlan {
        instructions: vec![create_ix, mint_ix],
        token_account,
        amount,
    })
}

pub struct MintExecutor<'a> {
    submitter: &'a dyn TransactionSubmitter,
}

impl<'a> MintExecutor<'a> {
    pub fn new(submitter: &'a dyn TransactionSubmitter) -> Self {
        Self { submitter }
    }

    /// Mint a new fungible token under a freshly generated address, signed
    /// and paid for by `identity`
    pub async fn execute(&self, identity: &Keypair, request: &MintRequest) -> MinterResult<MintOutcome> {
        let mint = Keypair::new();
        let authority = identity.pubkey();

        let plan = build_create_and_mint(&authority, &mint.pubkey(), request).map_err(|e| {
            log::error!("Failed to build mint instructions: {}", e);
            e
        })?;

        let signature = self
            .submitter
            .send_and_confirm(&plan.instructions, identity, &[&mint])
            .await
            .map_err(|e| {
                log::error!("Mint transaction failed: {}", e);
                e
            })?;

        log::info!("Transaction signature: {}", signature);
        log::info!("Mint address: {}", mint.pubkey());

        Ok(MintOutcome {
            signature,
            mint: mint.pubkey(),
            token_account: plan.token_account,
            amount: plan.amount,
        })
    }
}
