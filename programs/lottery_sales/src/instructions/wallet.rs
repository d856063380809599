use anchor_lang::prelude::*;
use anchor_spl::token::{self, Transfer};

use crate::errors::LotteryError;
use crate::events::{WalletOpened, WalletRecharged};
use crate::state::{LedgerEntry, LedgerEntryView, TransactionKind};
use crate::utils::{expect_pda, history_window, load_program_account, replay_ledger, validate_recharge};
use crate::{OpenWallet, ReadWallet, Recharge, ReconcileWallet, LEDGER_SEED};

/// Creates the Wallet PDA and its vault TokenAccount
pub fn open_wallet(ctx: Context<OpenWallet>) -> Result<()> {
    require!(!ctx.accounts.config.paused, LotteryError::Paused);

    let now = Clock::get()?.unix_timestamp;
    let wallet = &mut ctx.accounts.wallet;

    wallet.user = ctx.accounts.user.key();
    wallet.bump = ctx.bumps.wallet;
    wallet.vault = ctx.accounts.wallet_vault.key();
    wallet.vault_bump = ctx.bumps.wallet_vault;
    wallet.balance = 0;
    wallet.entry_count = 0;
    wallet.created_at = now;
    wallet.updated_at = now;

    emit!(WalletOpened {
        user: wallet.user,
        wallet: wallet.key(),
        timestamp: now,
    });
    Ok(())
}

/// User moves funds from their own token account into the wallet (normal signed tx)
pub fn recharge(ctx: Context<Recharge>, amount: u64) -> Result<()> {
    require!(!ctx.accounts.config.paused, LotteryError::Paused);
    validate_recharge(amount)?;

    let now = Clock::get()?.unix_timestamp;
    let wallet_key = ctx.accounts.wallet.key();
    ctx.accounts.wallet.append(
        wallet_key,
        &mut ctx.accounts.ledger_entry,
        ctx.bumps.ledger_entry,
        TransactionKind::Recharge,
        amount,
        Pubkey::default(),
        now,
    )?;

    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.user_token_account.to_account_info(),
                to: ctx.accounts.wallet_vault.to_account_info(),
                authority: ctx.accounts.user.to_account_info(),
            },
        ),
        amount,
    )?;

    let wallet = &ctx.accounts.wallet;
    msg!("wallet {} recharged {}, balance {}", wallet.user, amount, wallet.balance);
    emit!(WalletRecharged {
        user: wallet.user,
        amount,
        balance_after: wallet.balance,
        seq: ctx.accounts.ledger_entry.seq,
        timestamp: now,
    });
    Ok(())
}

pub fn get_balance(ctx: Context<ReadWallet>) -> Result<u64> {
    let wallet = &ctx.accounts.wallet;
    wallet.ensure_backed_by(ctx.accounts.wallet_vault.amount)?;
    Ok(wallet.balance)
}

/// One page of the ledger, newest first. The caller passes exactly the
/// entries `history_window` names, in that order.
pub fn get_history(ctx: Context<ReadWallet>, limit: u16, page: u32) -> Result<Vec<LedgerEntryView>> {
    let wallet_key = ctx.accounts.wallet.key();
    let seqs = history_window(ctx.accounts.wallet.entry_count, limit, page)?;

    let rem = ctx.remaining_accounts;
    require!(rem.len() == seqs.len(), LotteryError::LedgerEntryMismatch);

    rem.iter()
        .zip(seqs)
        .map(|(ai, seq)| {
            let entry = load_entry(ai, &wallet_key, ctx.program_id)?;
            require!(entry.seq == seq, LotteryError::LedgerEntryMismatch);
            Ok(LedgerEntryView::from(&entry))
        })
        .collect()
}

/// Replays the full ledger against the cached balance. The vault only has to cover it.
pub fn reconcile_wallet(ctx: Context<ReconcileWallet>) -> Result<u64> {
    let wallet = &ctx.accounts.wallet;
    let wallet_key = wallet.key();

    let rem = ctx.remaining_accounts;
    require!(
        rem.len() as u64 == wallet.entry_count,
        LotteryError::LedgerEntryMismatch
    );

    let entries = rem
        .iter()
        .map(|ai| load_entry(ai, &wallet_key, ctx.program_id))
        .collect::<Result<Vec<_>>>()?;

    let replayed = replay_ledger(&wallet_key, &entries)?;
    require!(replayed == wallet.balance, LotteryError::LedgerMismatch);
    wallet.ensure_backed_by(ctx.accounts.wallet_vault.amount)?;

    msg!("wallet {} reconciled over {} entries", wallet.user, entries.len());
    Ok(replayed)
}

fn load_entry(ai: &AccountInfo, wallet_key: &Pubkey, program_id: &Pubkey) -> Result<LedgerEntry> {
    let entry: LedgerEntry = load_program_account(ai, program_id)?;
    require_keys_eq!(entry.wallet, *wallet_key, LotteryError::LedgerEntryMismatch);
    let seq_le = entry.seq.to_le_bytes();
    expect_pda(
        ai.key,
        &[LEDGER_SEED, wallet_key.as_ref(), &seq_le, &[entry.bump]],
        program_id,
    )?;
    Ok(entry)
}
