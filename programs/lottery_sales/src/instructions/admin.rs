use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::LotteryError;
use crate::events::{ConfigInitialized, PauseChanged};
use crate::state::Config;
use crate::{InitializeConfig, SetPause};

pub fn initialize_config(ctx: Context<InitializeConfig>) -> Result<()> {
    require!(
        ctx.accounts.currency_mint.decimals == CURRENCY_DECIMALS,
        LotteryError::InvalidCurrencyMint
    );

    let cfg: &mut Account<Config> = &mut ctx.accounts.config;

    cfg.admin = ctx.accounts.admin.key();
    cfg.bump = ctx.bumps.config;

    cfg.currency_mint = ctx.accounts.currency_mint.key();

    cfg.treasury = ctx.accounts.treasury.key();
    cfg.treasury_bump = ctx.bumps.treasury;

    cfg.paused = false;
    cfg.next_game_id = INITIAL_GAME_ID;
    cfg.next_draw_id = INITIAL_DRAW_ID;

    cfg.version = INITIAL_VERSION;

    msg!("config initialized, admin {}", cfg.admin);
    emit!(ConfigInitialized {
        admin: cfg.admin,
        currency_mint: cfg.currency_mint,
        treasury: cfg.treasury,
    });

    Ok(())
}

pub fn set_pause(ctx: Context<SetPause>, paused: bool) -> Result<()> {
    let cfg = &mut ctx.accounts.config;
    require_keys_eq!(cfg.admin, ctx.accounts.admin.key(), LotteryError::Unauthorized);
    cfg.paused = paused;

    msg!("paused = {}", paused);
    emit!(PauseChanged {
        paused,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}
