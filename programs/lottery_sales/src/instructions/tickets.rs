use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::LotteryError;
use crate::events::{TicketDeleted, TicketPurchased, TicketRefunded, TicketStateChanged};
use crate::state::{DrawStatus, EntryStatus, LedgerEntry, Ticket, TicketStatus, TicketView, TransactionKind};
use crate::utils::{
    create_ledger_entry_account, evaluate_core, load_program_account, purchase_core, refund_core,
    store_program_account, transfer_signed, TicketScope,
};
use crate::{DeleteTicket, ListTickets, PurchaseTicket, UpdateTicketState, DRAW_SEED, WALLET_SEED};

pub fn purchase_ticket(ctx: Context<PurchaseTicket>, nonce: u64, numbers: Vec<u8>) -> Result<()> {
    require!(!ctx.accounts.config.paused, LotteryError::Paused);

    let now = Clock::get()?.unix_timestamp;
    let user_pk = ctx.accounts.user.key();
    let wallet_key = ctx.accounts.wallet.key();
    let ticket_key = ctx.accounts.ticket.key();

    let price = purchase_core(
        &mut ctx.accounts.draw,
        &mut ctx.accounts.wallet,
        wallet_key,
        &mut ctx.accounts.ticket,
        ticket_key,
        ctx.bumps.ticket,
        &mut ctx.accounts.ledger_entry,
        ctx.bumps.ledger_entry,
        nonce,
        numbers,
        now,
    )?;

    // Wallet PDA signs the move of the ticket price into the pot
    let wallet_bump = ctx.accounts.wallet.bump;
    let signer_seeds: &[&[&[u8]]] = &[&[WALLET_SEED, user_pk.as_ref(), &[wallet_bump]]];
    transfer_signed(
        &ctx.accounts.token_program.to_account_info(),
        &ctx.accounts.wallet_vault.to_account_info(),
        &ctx.accounts.draw_vault.to_account_info(),
        &ctx.accounts.wallet.to_account_info(),
        signer_seeds,
        price,
    )?;

    let ticket = &ctx.accounts.ticket;
    msg!("ticket {} bought for draw {}", ticket_key, ticket.draw_id);
    emit!(TicketPurchased {
        draw_id: ticket.draw_id,
        ticket: ticket_key,
        user: user_pk,
        numbers: ticket.numbers.clone(),
        total: ticket.total,
        balance_after: ctx.accounts.wallet.balance,
        timestamp: now,
    });
    Ok(())
}

pub fn list_tickets(ctx: Context<ListTickets>, scope: TicketScope) -> Result<Vec<TicketView>> {
    let viewer = ctx.accounts.viewer.key();
    if scope == TicketScope::All {
        require_keys_eq!(ctx.accounts.config.admin, viewer, LotteryError::Unauthorized);
    }

    let rem = ctx.remaining_accounts;
    require!(rem.len() <= MAX_LIST_ITEMS, LotteryError::TooManyEntries);

    let mut out = Vec::with_capacity(rem.len());
    for ai in rem.iter() {
        let ticket: Ticket = load_program_account(ai, ctx.program_id)?;
        if scope == TicketScope::Own && ticket.user != viewer {
            continue;
        }
        out.push(TicketView::from(&ticket));
    }
    Ok(out)
}

/// Admin override. Winner follows the match rule; Cancelled refunds a paid ticket.
pub fn update_ticket_state(ctx: Context<UpdateTicketState>, new_state: TicketStatus) -> Result<()> {
    let cfg = &ctx.accounts.config;
    require!(!cfg.paused, LotteryError::Paused);
    require_keys_eq!(cfg.admin, ctx.accounts.admin.key(), LotteryError::Unauthorized);

    let now = Clock::get()?.unix_timestamp;
    let ticket_key = ctx.accounts.ticket.key();
    let from = ctx.accounts.ticket.status;

    match new_state {
        TicketStatus::Winner => {
            let draw = &mut ctx.accounts.draw;
            let ticket = &mut ctx.accounts.ticket;
            require!(draw.status == DrawStatus::Drawn, LotteryError::DrawNotDrawn);
            require!(!ticket.status.is_terminal(), LotteryError::TicketTerminal);
            require!(ticket.matches(&draw.winning_numbers), LotteryError::NotWinner);
            evaluate_core(draw, ticket, now)?;
        }
        TicketStatus::Cancelled => {
            require!(
                ctx.accounts.draw.status != DrawStatus::Drawn,
                LotteryError::DrawTerminal
            );
            if from == TicketStatus::Paid {
                refund_into_wallet(&mut *ctx.accounts, ctx.program_id, ticket_key, now)?;
            } else {
                ctx.accounts.ticket.cancel(now)?;
            }
        }
        _ => return err!(LotteryError::IllegalTicketTransition),
    }

    emit!(TicketStateChanged {
        ticket: ticket_key,
        from,
        to: ctx.accounts.ticket.status,
        timestamp: now,
    });
    Ok(())
}

// The ledger entry only exists on this path, so it is created by hand.
fn refund_into_wallet(
    accounts: &mut UpdateTicketState<'_>,
    program_id: &Pubkey,
    ticket_key: Pubkey,
    now: i64,
) -> Result<()> {
    let wallet_key = accounts.wallet.key();
    let seq = accounts.wallet.entry_count;
    let entry_ai = accounts.ledger_entry.to_account_info();

    let entry_bump = create_ledger_entry_account(
        &entry_ai,
        &accounts.admin.to_account_info(),
        &accounts.system_program.to_account_info(),
        &wallet_key,
        seq,
        program_id,
    )?;

    let mut entry = LedgerEntry {
        wallet: wallet_key,
        seq,
        bump: entry_bump,
        kind: TransactionKind::Credit,
        amount: 0,
        balance_after: 0,
        timestamp: now,
        status: EntryStatus::Completed,
        reference: ticket_key,
    };

    let amount = refund_core(
        &mut accounts.draw,
        &mut accounts.ticket,
        ticket_key,
        &mut accounts.wallet,
        wallet_key,
        &mut entry,
        entry_bump,
        now,
    )?;
    store_program_account(&entry_ai, &entry)?;

    let draw_id = accounts.draw.draw_id;
    let draw_le = draw_id.to_le_bytes();
    let signer_seeds: &[&[&[u8]]] = &[&[DRAW_SEED, &draw_le, &[accounts.draw.bump]]];
    transfer_signed(
        &accounts.token_program.to_account_info(),
        &accounts.draw_vault.to_account_info(),
        &accounts.wallet_vault.to_account_info(),
        &accounts.draw.to_account_info(),
        signer_seeds,
        amount,
    )?;

    msg!("ticket {} cancelled, {} refunded", ticket_key, amount);
    emit!(TicketRefunded {
        draw_id,
        ticket: ticket_key,
        user: accounts.ticket.user,
        amount,
        timestamp: now,
    });
    Ok(())
}

pub fn delete_ticket(ctx: Context<DeleteTicket>) -> Result<()> {
    let cfg = &ctx.accounts.config;
    require!(!cfg.paused, LotteryError::Paused);

    let authority = ctx.accounts.authority.key();
    let ticket = &ctx.accounts.ticket;
    require!(
        authority == ticket.user || authority == cfg.admin,
        LotteryError::Unauthorized
    );

    let draw = &mut ctx.accounts.draw;
    require!(
        ticket.is_deletable(draw.status),
        LotteryError::TicketNotDeletable
    );
    draw.record_ticket_closed()?;

    // rent goes back to the owner via `close = owner`
    emit!(TicketDeleted {
        draw_id: draw.draw_id,
        ticket: ticket.key(),
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}
