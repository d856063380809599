use anchor_lang::prelude::*;
use anchor_spl::token::TokenAccount;

use crate::constants::*;
use crate::errors::LotteryError;
use crate::events::{GameCreated, GameDeleted, GameUpdated};
use crate::state::{Draw, Game, GameRules, GameView};
use crate::utils::{
    close_program_account, expect_pda, load_program_account, retire_draw_vault,
    validate_game_definition,
};
use crate::{CreateGame, DeleteGame, ListGames, UpdateGame, DRAW_SEED};

pub fn create_game(
    ctx: Context<CreateGame>,
    name: String,
    description: String,
    rules_summary: String,
    rules: GameRules,
) -> Result<()> {
    let cfg = &mut ctx.accounts.config;
    require!(!cfg.paused, LotteryError::Paused);
    require_keys_eq!(cfg.admin, ctx.accounts.admin.key(), LotteryError::Unauthorized);

    validate_game_definition(&name, &description, &rules_summary, &rules)?;

    let now = Clock::get()?.unix_timestamp;
    let game_id = cfg.next_game_id;

    let game = &mut ctx.accounts.game;
    game.game_id = game_id;
    game.bump = ctx.bumps.game;
    game.name = name;
    game.description = description;
    game.rules_summary = rules_summary;
    game.rules = rules;
    game.live_draws = 0;
    game.created_at = now;
    game.updated_at = now;

    cfg.next_game_id = cfg.next_game_id.checked_add(1).ok_or(LotteryError::MathOverflow)?;

    msg!("game {} created: {}", game_id, game.name);
    emit!(GameCreated {
        game_id,
        name: game.name.clone(),
        rules,
        timestamp: now,
    });
    Ok(())
}

/// Existing draws keep the rules they were created with.
pub fn update_game(
    ctx: Context<UpdateGame>,
    name: String,
    description: String,
    rules_summary: String,
    rules: GameRules,
) -> Result<()> {
    let cfg = &ctx.accounts.config;
    require!(!cfg.paused, LotteryError::Paused);
    require_keys_eq!(cfg.admin, ctx.accounts.admin.key(), LotteryError::Unauthorized);

    validate_game_definition(&name, &description, &rules_summary, &rules)?;

    let now = Clock::get()?.unix_timestamp;
    let game = &mut ctx.accounts.game;
    game.name = name;
    game.description = description;
    game.rules_summary = rules_summary;
    game.rules = rules;
    game.updated_at = now;

    emit!(GameUpdated {
        game_id: game.game_id,
        rules,
        timestamp: now,
    });
    Ok(())
}

pub fn delete_game<'info>(
    ctx: Context<'_, '_, 'info, 'info, DeleteGame<'info>>,
    acknowledge_irreversible: bool,
) -> Result<()> {
    let cfg = &ctx.accounts.config;
    require!(!cfg.paused, LotteryError::Paused);
    require_keys_eq!(cfg.admin, ctx.accounts.admin.key(), LotteryError::Unauthorized);
    require!(acknowledge_irreversible, LotteryError::IrreversibleNotAcknowledged);

    let rem = ctx.remaining_accounts;
    require!(rem.len() % 2 == 0, LotteryError::DrawMismatch);
    require!(rem.len() / 2 <= MAX_BATCH, LotteryError::TooManyEntries);

    let game_id = ctx.accounts.game.game_id;
    let token_program = ctx.accounts.token_program.to_account_info();
    let treasury = ctx.accounts.treasury.to_account_info();
    let admin = ctx.accounts.admin.to_account_info();

    let mut removed: u64 = 0;
    for pair in rem.chunks_exact(2) {
        let draw_ai = &pair[0];
        let vault_ai = &pair[1];

        let draw: Draw = load_program_account(draw_ai, ctx.program_id)?;
        let draw_le = draw.draw_id.to_le_bytes();
        expect_pda(draw_ai.key, &[DRAW_SEED, &draw_le, &[draw.bump]], ctx.program_id)?;
        require!(draw.game_id == game_id, LotteryError::GameMismatch);
        require_keys_eq!(draw.vault, *vault_ai.key, LotteryError::PdaMismatch);

        // tickets go first, through delete_draw
        require!(draw.live_tickets == 0, LotteryError::CascadeIncomplete);

        let vault = Account::<TokenAccount>::try_from(vault_ai)?;
        retire_draw_vault(
            &token_program,
            vault_ai,
            vault.amount,
            &treasury,
            draw_ai,
            draw.draw_id,
            draw.bump,
            &admin,
        )?;
        close_program_account(draw_ai, &admin)?;

        msg!("draw {} removed with game {}", draw.draw_id, game_id);
        removed = removed.checked_add(1).ok_or(LotteryError::MathOverflow)?;
    }

    let game = &mut ctx.accounts.game;
    game.live_draws = game
        .live_draws
        .checked_sub(removed)
        .ok_or(LotteryError::MathOverflow)?;
    require!(game.live_draws == 0, LotteryError::CascadeIncomplete);

    // game account itself is closed by the `close = admin` constraint
    emit!(GameDeleted {
        game_id,
        draws_removed: removed,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}

pub fn list_games(ctx: Context<ListGames>) -> Result<Vec<GameView>> {
    let rem = ctx.remaining_accounts;
    require!(rem.len() <= MAX_GAME_LIST_ITEMS, LotteryError::TooManyEntries);

    rem.iter()
        .map(|ai| {
            let game: Game = load_program_account(ai, ctx.program_id)?;
            Ok(GameView::from(&game))
        })
        .collect()
}
