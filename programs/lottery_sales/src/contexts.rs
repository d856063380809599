// programs/lottery_sales/src/contexts.rs

use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::state::{Config, Draw, Game, LedgerEntry, Ticket, Wallet};

// ----------------------------
// Config
// ----------------------------
#[derive(Accounts)]
pub struct InitializeConfig<'info> {
    #[account(
        init,
        payer = admin,
        space = 8 + Config::INIT_SPACE,
        seeds = [crate::CONFIG_SEED],
        bump
    )]
    pub config: Account<'info, Config>,

    /// SPL mint every amount is denominated in (must have 2 decimals)
    pub currency_mint: Account<'info, Mint>,

    /// Treasury = TokenAccount PDA controlled by the program (authority = config PDA)
    #[account(
        init,
        payer = admin,
        seeds = [crate::TREASURY_SEED],
        bump,
        token::mint = currency_mint,
        token::authority = config
    )]
    pub treasury: Account<'info, TokenAccount>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

#[derive(Accounts)]
pub struct SetPause<'info> {
    #[account(
        mut,
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    pub admin: Signer<'info>,
}

// ----------------------------
// Game catalog
// ----------------------------
#[derive(Accounts)]
pub struct CreateGame<'info> {
    #[account(
        mut,
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        init,
        payer = admin,
        space = 8 + Game::INIT_SPACE,
        seeds = [crate::GAME_SEED, config.next_game_id.to_le_bytes().as_ref()],
        bump
    )]
    pub game: Account<'info, Game>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct UpdateGame<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [crate::GAME_SEED, game.game_id.to_le_bytes().as_ref()],
        bump = game.bump
    )]
    pub game: Account<'info, Game>,

    pub admin: Signer<'info>,
}

/// remaining_accounts: (draw, draw_vault) pairs for every draw of the game
#[derive(Accounts)]
pub struct DeleteGame<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [crate::GAME_SEED, game.game_id.to_le_bytes().as_ref()],
        bump = game.bump,
        close = admin
    )]
    pub game: Account<'info, Game>,

    #[account(mut, address = config.treasury)]
    pub treasury: Account<'info, TokenAccount>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

/// remaining_accounts: Game accounts
#[derive(Accounts)]
pub struct ListGames {}

// ----------------------------
// Draws
// ----------------------------
#[derive(Accounts)]
pub struct CreateDraw<'info> {
    #[account(
        mut,
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [crate::GAME_SEED, game.game_id.to_le_bytes().as_ref()],
        bump = game.bump
    )]
    pub game: Account<'info, Game>,

    #[account(address = config.currency_mint)]
    pub currency_mint: Account<'info, Mint>,

    #[account(
        init,
        payer = admin,
        space = 8 + Draw::INIT_SPACE,
        seeds = [crate::DRAW_SEED, config.next_draw_id.to_le_bytes().as_ref()],
        bump
    )]
    pub draw: Account<'info, Draw>,

    // Pot vault per draw
    #[account(
        init,
        payer = admin,
        seeds = [crate::DRAW_VAULT_SEED, config.next_draw_id.to_le_bytes().as_ref()],
        bump,
        token::mint = currency_mint,
        token::authority = draw
    )]
    pub draw_vault: Account<'info, TokenAccount>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

/// Admin-only transitions that touch nothing but the draw itself.
#[derive(Accounts)]
pub struct ManageDraw<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [crate::DRAW_SEED, draw.draw_id.to_le_bytes().as_ref()],
        bump = draw.bump
    )]
    pub draw: Account<'info, Draw>,

    pub admin: Signer<'info>,
}

/// remaining_accounts: (ticket, owner) pairs, owner receives the ticket rent
#[derive(Accounts)]
pub struct DeleteDraw<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [crate::GAME_SEED, draw.game_id.to_le_bytes().as_ref()],
        bump = game.bump
    )]
    pub game: Account<'info, Game>,

    #[account(
        mut,
        seeds = [crate::DRAW_SEED, draw.draw_id.to_le_bytes().as_ref()],
        bump = draw.bump,
        close = admin
    )]
    pub draw: Account<'info, Draw>,

    #[account(
        mut,
        seeds = [crate::DRAW_VAULT_SEED, draw.draw_id.to_le_bytes().as_ref()],
        bump = draw.vault_bump,
        token::authority = draw
    )]
    pub draw_vault: Account<'info, TokenAccount>,

    #[account(mut, address = config.treasury)]
    pub treasury: Account<'info, TokenAccount>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

/// remaining_accounts: Draw accounts
#[derive(Accounts)]
pub struct ListDraws {}

#[derive(Accounts)]
pub struct QuickPick<'info> {
    #[account(
        seeds = [crate::DRAW_SEED, draw.draw_id.to_le_bytes().as_ref()],
        bump = draw.bump
    )]
    pub draw: Account<'info, Draw>,
}

// ----------------------------
// Tickets
// ----------------------------
#[derive(Accounts)]
#[instruction(nonce: u64)]
pub struct PurchaseTicket<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [crate::DRAW_SEED, draw.draw_id.to_le_bytes().as_ref()],
        bump = draw.bump
    )]
    pub draw: Account<'info, Draw>,

    #[account(
        mut,
        seeds = [crate::DRAW_VAULT_SEED, draw.draw_id.to_le_bytes().as_ref()],
        bump = draw.vault_bump
    )]
    pub draw_vault: Account<'info, TokenAccount>,

    #[account(
        mut,
        seeds = [crate::WALLET_SEED, user.key().as_ref()],
        bump = wallet.bump
    )]
    pub wallet: Account<'info, Wallet>,

    #[account(
        mut,
        seeds = [crate::WALLET_VAULT_SEED, user.key().as_ref()],
        bump = wallet.vault_bump
    )]
    pub wallet_vault: Account<'info, TokenAccount>,

    // The nonce in the seeds makes a retried purchase collide instead of duplicating
    #[account(
        init,
        payer = user,
        space = 8 + Ticket::INIT_SPACE,
        seeds = [
            crate::TICKET_SEED,
            draw.draw_id.to_le_bytes().as_ref(),
            user.key().as_ref(),
            nonce.to_le_bytes().as_ref()
        ],
        bump
    )]
    pub ticket: Account<'info, Ticket>,

    #[account(
        init,
        payer = user,
        space = 8 + LedgerEntry::INIT_SPACE,
        seeds = [crate::LEDGER_SEED, wallet.key().as_ref(), wallet.entry_count.to_le_bytes().as_ref()],
        bump
    )]
    pub ledger_entry: Account<'info, LedgerEntry>,

    #[account(mut)]
    pub user: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

/// remaining_accounts: Ticket accounts
#[derive(Accounts)]
pub struct ListTickets<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    pub viewer: Signer<'info>,
}

#[derive(Accounts)]
pub struct UpdateTicketState<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [crate::DRAW_SEED, draw.draw_id.to_le_bytes().as_ref()],
        bump = draw.bump
    )]
    pub draw: Account<'info, Draw>,

    #[account(
        mut,
        seeds = [crate::DRAW_VAULT_SEED, draw.draw_id.to_le_bytes().as_ref()],
        bump = draw.vault_bump
    )]
    pub draw_vault: Account<'info, TokenAccount>,

    #[account(
        mut,
        seeds = [
            crate::TICKET_SEED,
            draw.draw_id.to_le_bytes().as_ref(),
            ticket.user.as_ref(),
            ticket.nonce.to_le_bytes().as_ref()
        ],
        bump = ticket.bump
    )]
    pub ticket: Account<'info, Ticket>,

    #[account(
        mut,
        seeds = [crate::WALLET_SEED, ticket.user.as_ref()],
        bump = wallet.bump
    )]
    pub wallet: Account<'info, Wallet>,

    #[account(
        mut,
        seeds = [crate::WALLET_VAULT_SEED, ticket.user.as_ref()],
        bump = wallet.vault_bump
    )]
    pub wallet_vault: Account<'info, TokenAccount>,

    /// CHECK: next ledger entry PDA; created in the handler only when a refund is due.
    #[account(mut)]
    pub ledger_entry: UncheckedAccount<'info>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct DeleteTicket<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [crate::DRAW_SEED, draw.draw_id.to_le_bytes().as_ref()],
        bump = draw.bump
    )]
    pub draw: Account<'info, Draw>,

    #[account(
        mut,
        seeds = [
            crate::TICKET_SEED,
            draw.draw_id.to_le_bytes().as_ref(),
            owner.key().as_ref(),
            ticket.nonce.to_le_bytes().as_ref()
        ],
        bump = ticket.bump,
        constraint = ticket.user == owner.key() @ crate::errors::LotteryError::TicketMismatch,
        close = owner
    )]
    pub ticket: Account<'info, Ticket>,

    /// CHECK: ticket owner, receives the rent. Bound to the ticket by the constraint above.
    #[account(mut)]
    pub owner: UncheckedAccount<'info>,

    /// Owner or admin
    pub authority: Signer<'info>,
}

// ----------------------------
// Wallet
// ----------------------------
#[derive(Accounts)]
pub struct OpenWallet<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(address = config.currency_mint)]
    pub currency_mint: Account<'info, Mint>,

    #[account(
        init,
        payer = user,
        space = 8 + Wallet::INIT_SPACE,
        seeds = [crate::WALLET_SEED, user.key().as_ref()],
        bump
    )]
    pub wallet: Account<'info, Wallet>,

    #[account(
        init,
        payer = user,
        seeds = [crate::WALLET_VAULT_SEED, user.key().as_ref()],
        bump,
        token::mint = currency_mint,
        token::authority = wallet
    )]
    pub wallet_vault: Account<'info, TokenAccount>,

    #[account(mut)]
    pub user: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

#[derive(Accounts)]
pub struct Recharge<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [crate::WALLET_SEED, user.key().as_ref()],
        bump = wallet.bump
    )]
    pub wallet: Account<'info, Wallet>,

    #[account(
        mut,
        seeds = [crate::WALLET_VAULT_SEED, user.key().as_ref()],
        bump = wallet.vault_bump
    )]
    pub wallet_vault: Account<'info, TokenAccount>,

    #[account(
        init,
        payer = user,
        space = 8 + LedgerEntry::INIT_SPACE,
        seeds = [crate::LEDGER_SEED, wallet.key().as_ref(), wallet.entry_count.to_le_bytes().as_ref()],
        bump
    )]
    pub ledger_entry: Account<'info, LedgerEntry>,

    #[account(
        mut,
        constraint = user_token_account.owner == user.key(),
        constraint = user_token_account.mint == config.currency_mint
    )]
    pub user_token_account: Account<'info, TokenAccount>,

    #[account(mut)]
    pub user: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

/// Read-only access to one user's wallet. remaining_accounts: ledger entries.
#[derive(Accounts)]
pub struct ReadWallet<'info> {
    #[account(
        seeds = [crate::WALLET_SEED, owner.key().as_ref()],
        bump = wallet.bump
    )]
    pub wallet: Account<'info, Wallet>,

    #[account(
        seeds = [crate::WALLET_VAULT_SEED, owner.key().as_ref()],
        bump = wallet.vault_bump
    )]
    pub wallet_vault: Account<'info, TokenAccount>,

    pub owner: Signer<'info>,
}

/// remaining_accounts: every ledger entry of the wallet, oldest first
#[derive(Accounts)]
pub struct ReconcileWallet<'info> {
    #[account(
        seeds = [crate::WALLET_SEED, owner.key().as_ref()],
        bump = wallet.bump
    )]
    pub wallet: Account<'info, Wallet>,

    #[account(
        seeds = [crate::WALLET_VAULT_SEED, owner.key().as_ref()],
        bump = wallet.vault_bump
    )]
    pub wallet_vault: Account<'info, TokenAccount>,

    /// CHECK: only used as a seed; reconciliation reads public data.
    pub owner: UncheckedAccount<'info>,
}

// ----------------------------
// Settlement
// ----------------------------

/// remaining_accounts: Ticket accounts of the draw (writable)
#[derive(Accounts)]
pub struct EvaluateTickets<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [crate::DRAW_SEED, draw.draw_id.to_le_bytes().as_ref()],
        bump = draw.bump
    )]
    pub draw: Account<'info, Draw>,

    pub cranker: Signer<'info>,
}

#[derive(Accounts)]
pub struct ClaimPrize<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [crate::DRAW_SEED, draw.draw_id.to_le_bytes().as_ref()],
        bump = draw.bump
    )]
    pub draw: Account<'info, Draw>,

    #[account(
        mut,
        seeds = [crate::DRAW_VAULT_SEED, draw.draw_id.to_le_bytes().as_ref()],
        bump = draw.vault_bump
    )]
    pub draw_vault: Account<'info, TokenAccount>,

    #[account(
        mut,
        seeds = [
            crate::TICKET_SEED,
            draw.draw_id.to_le_bytes().as_ref(),
            user.key().as_ref(),
            ticket.nonce.to_le_bytes().as_ref()
        ],
        bump = ticket.bump,
        has_one = user
    )]
    pub ticket: Account<'info, Ticket>,

    #[account(
        mut,
        seeds = [crate::WALLET_SEED, user.key().as_ref()],
        bump = wallet.bump
    )]
    pub wallet: Account<'info, Wallet>,

    #[account(
        mut,
        seeds = [crate::WALLET_VAULT_SEED, user.key().as_ref()],
        bump = wallet.vault_bump
    )]
    pub wallet_vault: Account<'info, TokenAccount>,

    #[account(
        init,
        payer = user,
        space = 8 + LedgerEntry::INIT_SPACE,
        seeds = [crate::LEDGER_SEED, wallet.key().as_ref(), wallet.entry_count.to_le_bytes().as_ref()],
        bump
    )]
    pub ledger_entry: Account<'info, LedgerEntry>,

    #[account(mut)]
    pub user: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct RefundTicket<'info> {
    #[account(
        seeds = [crate::CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [crate::DRAW_SEED, draw.draw_id.to_le_bytes().as_ref()],
        bump = draw.bump
    )]
    pub draw: Account<'info, Draw>,

    #[account(
        mut,
        seeds = [crate::DRAW_VAULT_SEED, draw.draw_id.to_le_bytes().as_ref()],
        bump = draw.vault_bump
    )]
    pub draw_vault: Account<'info, TokenAccount>,

    #[account(
        mut,
        seeds = [
            crate::TICKET_SEED,
            draw.draw_id.to_le_bytes().as_ref(),
            ticket.user.as_ref(),
            ticket.nonce.to_le_bytes().as_ref()
        ],
        bump = ticket.bump
    )]
    pub ticket: Account<'info, Ticket>,

    #[account(
        mut,
        seeds = [crate::WALLET_SEED, ticket.user.as_ref()],
        bump = wallet.bump
    )]
    pub wallet: Account<'info, Wallet>,

    #[account(
        mut,
        seeds = [crate::WALLET_VAULT_SEED, ticket.user.as_ref()],
        bump = wallet.vault_bump
    )]
    pub wallet_vault: Account<'info, TokenAccount>,

    #[account(
        init,
        payer = authority,
        space = 8 + LedgerEntry::INIT_SPACE,
        seeds = [crate::LEDGER_SEED, wallet.key().as_ref(), wallet.entry_count.to_le_bytes().as_ref()],
        bump
    )]
    pub ledger_entry: Account<'info, LedgerEntry>,

    /// Ticket owner or admin
    #[account(mut)]
    pub authority: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}
