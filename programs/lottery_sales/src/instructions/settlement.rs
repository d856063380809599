use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::LotteryError;
use crate::events::{DrawSettled, PrizeClaimed, TicketRefunded, TicketsEvaluated};
use crate::state::{DrawStatus, Ticket};
use crate::utils::{
    claim_core, evaluate_core, expect_pda, load_program_account, refund_core, store_program_account,
    transfer_signed,
};
use crate::{ClaimPrize, EvaluateTickets, ManageDraw, RefundTicket, DRAW_SEED, TICKET_SEED};

pub fn settle_draw(ctx: Context<ManageDraw>, winning_numbers: Vec<u8>) -> Result<()> {
    let cfg = &ctx.accounts.config;
    require!(!cfg.paused, LotteryError::Paused);
    require_keys_eq!(cfg.admin, ctx.accounts.admin.key(), LotteryError::Unauthorized);

    let now = Clock::get()?.unix_timestamp;
    let draw = &mut ctx.accounts.draw;
    draw.settle(winning_numbers, now)?;

    msg!(
        "draw {} drawn: {:?}, {} tickets to evaluate",
        draw.draw_id,
        draw.winning_numbers,
        draw.paid_tickets
    );
    emit!(DrawSettled {
        draw_id: draw.draw_id,
        winning_numbers: draw.winning_numbers.clone(),
        paid_tickets: draw.paid_tickets,
        pot: draw.pot,
        timestamp: now,
    });
    Ok(())
}

/// Permissionless crank. remaining_accounts: up to MAX_BATCH writable tickets of the draw.
pub fn evaluate_tickets<'info>(ctx: Context<'_, '_, 'info, 'info, EvaluateTickets<'info>>) -> Result<()> {
    require!(!ctx.accounts.config.paused, LotteryError::Paused);

    let rem = ctx.remaining_accounts;
    require!(rem.len() <= MAX_BATCH, LotteryError::TooManyEntries);

    let now = Clock::get()?.unix_timestamp;
    let program_id = ctx.program_id;
    let draw = &mut ctx.accounts.draw;
    let draw_le = draw.draw_id.to_le_bytes();

    let mut winners: u64 = 0;
    for ai in rem.iter() {
        let mut ticket: Ticket = load_program_account(ai, program_id)?;
        let nonce_le = ticket.nonce.to_le_bytes();
        expect_pda(
            ai.key,
            &[TICKET_SEED, &draw_le, ticket.user.as_ref(), &nonce_le, &[ticket.bump]],
            program_id,
        )?;

        if evaluate_core(draw, &mut ticket, now)? {
            winners += 1;
        }
        store_program_account(ai, &ticket)?;
    }

    emit!(TicketsEvaluated {
        draw_id: draw.draw_id,
        evaluated: rem.len() as u64,
        winners,
        payout_ready: draw.payout_ready,
    });
    if draw.payout_ready {
        msg!(
            "draw {} payout ready: {} winners, {} each",
            draw.draw_id,
            draw.winner_count,
            draw.prize_per_winner
        );
    }
    Ok(())
}

pub fn claim_prize(ctx: Context<ClaimPrize>) -> Result<()> {
    require!(!ctx.accounts.config.paused, LotteryError::Paused);

    let now = Clock::get()?.unix_timestamp;
    let ticket_key = ctx.accounts.ticket.key();
    let wallet_key = ctx.accounts.wallet.key();

    let amount = claim_core(
        &mut ctx.accounts.draw,
        &mut ctx.accounts.ticket,
        ticket_key,
        &mut ctx.accounts.wallet,
        wallet_key,
        &mut ctx.accounts.ledger_entry,
        ctx.bumps.ledger_entry,
        now,
    )?;

    // Draw PDA signs the payout out of the pot
    let draw_id = ctx.accounts.draw.draw_id;
    let draw_le = draw_id.to_le_bytes();
    let signer_seeds: &[&[&[u8]]] = &[&[DRAW_SEED, &draw_le, &[ctx.accounts.draw.bump]]];
    transfer_signed(
        &ctx.accounts.token_program.to_account_info(),
        &ctx.accounts.draw_vault.to_account_info(),
        &ctx.accounts.wallet_vault.to_account_info(),
        &ctx.accounts.draw.to_account_info(),
        signer_seeds,
        amount,
    )?;

    msg!("prize {} claimed on ticket {}", amount, ticket_key);
    emit!(PrizeClaimed {
        draw_id,
        ticket: ticket_key,
        user: ctx.accounts.user.key(),
        amount,
        timestamp: now,
    });
    Ok(())
}

/// Void draws only. Owner or admin.
pub fn refund_ticket(ctx: Context<RefundTicket>) -> Result<()> {
    let cfg = &ctx.accounts.config;
    require!(!cfg.paused, LotteryError::Paused);

    let authority = ctx.accounts.authority.key();
    require!(
        authority == ctx.accounts.ticket.user || authority == cfg.admin,
        LotteryError::Unauthorized
    );
    require!(
        ctx.accounts.draw.status == DrawStatus::Void,
        LotteryError::DrawNotVoid
    );

    let now = Clock::get()?.unix_timestamp;
    let ticket_key = ctx.accounts.ticket.key();
    let wallet_key = ctx.accounts.wallet.key();

    let amount = refund_core(
        &mut ctx.accounts.draw,
        &mut ctx.accounts.ticket,
        ticket_key,
        &mut ctx.accounts.wallet,
        wallet_key,
        &mut ctx.accounts.ledger_entry,
        ctx.bumps.ledger_entry,
        now,
    )?;

    let draw_id = ctx.accounts.draw.draw_id;
    let draw_le = draw_id.to_le_bytes();
    let signer_seeds: &[&[&[u8]]] = &[&[DRAW_SEED, &draw_le, &[ctx.accounts.draw.bump]]];
    transfer_signed(
        &ctx.accounts.token_program.to_account_info(),
        &ctx.accounts.draw_vault.to_account_info(),
        &ctx.accounts.wallet_vault.to_account_info(),
        &ctx.accounts.draw.to_account_info(),
        signer_seeds,
        amount,
    )?;

    msg!("ticket {} refunded {}", ticket_key, amount);
    emit!(TicketRefunded {
        draw_id,
        ticket: ticket_key,
        user: ctx.accounts.ticket.user,
        amount,
        timestamp: now,
    });
    Ok(())
}
