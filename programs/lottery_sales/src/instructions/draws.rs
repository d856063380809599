use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::LotteryError;
use crate::events::{DrawClosed, DrawCreated, DrawDeleted, DrawRescheduled, DrawVoided};
use crate::state::{Draw, DrawView, Ticket};
use crate::utils::{close_program_account, expect_pda, load_program_account, quick_pick as pick, retire_draw_vault};
use crate::{CreateDraw, DeleteDraw, ListDraws, ManageDraw, QuickPick, TICKET_SEED};

pub fn create_draw(ctx: Context<CreateDraw>, closes_at: i64) -> Result<()> {
    let cfg = &mut ctx.accounts.config;
    require!(!cfg.paused, LotteryError::Paused);
    require_keys_eq!(cfg.admin, ctx.accounts.admin.key(), LotteryError::Unauthorized);

    let now = Clock::get()?.unix_timestamp;
    let draw_id = cfg.next_draw_id;
    let game = &mut ctx.accounts.game;

    let draw = &mut ctx.accounts.draw;
    draw.set_inner(Draw::new(
        draw_id,
        ctx.bumps.draw,
        game.game_id,
        game.rules,
        closes_at,
        ctx.accounts.draw_vault.key(),
        ctx.bumps.draw_vault,
        now,
    )?);

    game.live_draws = game.live_draws.checked_add(1).ok_or(LotteryError::MathOverflow)?;
    cfg.next_draw_id = cfg.next_draw_id.checked_add(1).ok_or(LotteryError::MathOverflow)?;

    msg!("draw {} for game {} closes at {}", draw_id, game.game_id, closes_at);
    emit!(DrawCreated {
        draw_id,
        game_id: game.game_id,
        closes_at,
        price: draw.rules.price,
    });
    Ok(())
}

pub fn update_draw(ctx: Context<ManageDraw>, closes_at: i64) -> Result<()> {
    let cfg = &ctx.accounts.config;
    require!(!cfg.paused, LotteryError::Paused);
    require_keys_eq!(cfg.admin, ctx.accounts.admin.key(), LotteryError::Unauthorized);

    let now = Clock::get()?.unix_timestamp;
    let draw = &mut ctx.accounts.draw;
    draw.reschedule(closes_at, now)?;

    emit!(DrawRescheduled {
        draw_id: draw.draw_id,
        closes_at,
        timestamp: now,
    });
    Ok(())
}

pub fn close_draw(ctx: Context<ManageDraw>) -> Result<()> {
    let cfg = &ctx.accounts.config;
    require!(!cfg.paused, LotteryError::Paused);
    require_keys_eq!(cfg.admin, ctx.accounts.admin.key(), LotteryError::Unauthorized);

    let now = Clock::get()?.unix_timestamp;
    let draw = &mut ctx.accounts.draw;
    draw.close_sales(now)?;

    msg!("draw {} closed", draw.draw_id);
    emit!(DrawClosed {
        draw_id: draw.draw_id,
        closed_at: draw.closed_at,
    });
    Ok(())
}

/// Allowed while paused.
pub fn void_draw(ctx: Context<ManageDraw>) -> Result<()> {
    let cfg = &ctx.accounts.config;
    require_keys_eq!(cfg.admin, ctx.accounts.admin.key(), LotteryError::Unauthorized);

    let now = Clock::get()?.unix_timestamp;
    let draw = &mut ctx.accounts.draw;
    draw.void(now)?;

    msg!("draw {} voided, {} tickets to refund", draw.draw_id, draw.paid_tickets);
    emit!(DrawVoided {
        draw_id: draw.draw_id,
        paid_tickets: draw.paid_tickets,
        timestamp: now,
    });
    Ok(())
}

pub fn delete_draw<'info>(ctx: Context<'_, '_, 'info, 'info, DeleteDraw<'info>>) -> Result<()> {
    let cfg = &ctx.accounts.config;
    require!(!cfg.paused, LotteryError::Paused);
    require_keys_eq!(cfg.admin, ctx.accounts.admin.key(), LotteryError::Unauthorized);

    let rem = ctx.remaining_accounts;
    require!(rem.len() % 2 == 0, LotteryError::TicketMismatch);
    require!(rem.len() / 2 <= MAX_BATCH, LotteryError::TooManyEntries);

    let program_id = ctx.program_id;
    let draw = &mut ctx.accounts.draw;
    let draw_id = draw.draw_id;
    let draw_le = draw_id.to_le_bytes();

    let mut removed: u64 = 0;
    for pair in rem.chunks_exact(2) {
        let ticket_ai = &pair[0];
        let owner_ai = &pair[1];

        let ticket: Ticket = load_program_account(ticket_ai, program_id)?;
        let nonce_le = ticket.nonce.to_le_bytes();
        expect_pda(
            ticket_ai.key,
            &[TICKET_SEED, &draw_le, ticket.user.as_ref(), &nonce_le, &[ticket.bump]],
            program_id,
        )?;
        require!(ticket.draw_id == draw_id, LotteryError::DrawMismatch);
        require_keys_eq!(ticket.user, *owner_ai.key, LotteryError::TicketMismatch);
        require!(
            ticket.is_deletable(draw.status),
            LotteryError::TicketNotDeletable
        );

        close_program_account(ticket_ai, owner_ai)?;
        draw.record_ticket_closed()?;
        removed = removed.checked_add(1).ok_or(LotteryError::MathOverflow)?;
    }

    require!(draw.live_tickets == 0, LotteryError::CascadeIncomplete);

    let leftover = ctx.accounts.draw_vault.amount;
    let draw_bump = ctx.accounts.draw.bump;
    retire_draw_vault(
        &ctx.accounts.token_program.to_account_info(),
        &ctx.accounts.draw_vault.to_account_info(),
        leftover,
        &ctx.accounts.treasury.to_account_info(),
        &ctx.accounts.draw.to_account_info(),
        draw_id,
        draw_bump,
        &ctx.accounts.admin.to_account_info(),
    )?;

    let game = &mut ctx.accounts.game;
    game.live_draws = game.live_draws.checked_sub(1).ok_or(LotteryError::MathOverflow)?;

    // draw account is closed by the `close = admin` constraint
    msg!("draw {} deleted, {} tickets, {} swept", draw_id, removed, leftover);
    emit!(DrawDeleted {
        draw_id,
        game_id: game.game_id,
        tickets_removed: removed,
        swept_to_treasury: leftover,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}

pub fn list_draws(ctx: Context<ListDraws>) -> Result<Vec<DrawView>> {
    let rem = ctx.remaining_accounts;
    require!(rem.len() <= MAX_LIST_ITEMS, LotteryError::TooManyEntries);

    let now = Clock::get()?.unix_timestamp;
    rem.iter()
        .map(|ai| {
            let draw: Draw = load_program_account(ai, ctx.program_id)?;
            Ok(draw.view(now))
        })
        .collect()
}

pub fn quick_pick(ctx: Context<QuickPick>, seed: [u8; 32]) -> Result<Vec<u8>> {
    Ok(pick(&ctx.accounts.draw.rules, &seed))
}
