use anchor_lang::prelude::*;

pub mod errors;
pub mod events;
pub mod instructions;
pub mod state;
pub mod utils;
pub mod contexts;
pub mod constants;

pub use utils::*;
pub use instructions::*;
pub use state::*;
pub use errors::*;
pub use contexts::*;
pub use constants::*;

use solana_security_txt::security_txt;

#[cfg(not(feature = "no-entrypoint"))]
security_txt! {
    // Required fields
    name: "Lottery Sales",
    project_url: "https://lottery-sales.invalid",
    contacts: "email:security@lottery-sales.invalid",
    policy: "https://lottery-sales.invalid/SECURITY.md",

    // Optional fields
    preferred_languages: "en,es"
}

declare_id!("8nkXRrxKPKNPtDjrd7yL4h4WMsUBZFaBYGNQtaMctHWv");

#[program]
pub mod lottery_sales {
    use super::*;
    use crate::instructions::{admin, catalog, draws, settlement, tickets, wallet};

    // ----------------------------
    // Config
    // ----------------------------
    pub fn initialize_config(ctx: Context<InitializeConfig>) -> Result<()> {
        admin::initialize_config(ctx)
    }

    pub fn set_pause(ctx: Context<SetPause>, paused: bool) -> Result<()> {
        admin::set_pause(ctx, paused)
    }

    // ----------------------------
    // Game catalog
    // ----------------------------
    pub fn create_game(
        ctx: Context<CreateGame>,
        name: String,
        description: String,
        rules_summary: String,
        rules: GameRules,
    ) -> Result<()> {
        catalog::create_game(ctx, name, description, rules_summary, rules)
    }

    pub fn update_game(
        ctx: Context<UpdateGame>,
        name: String,
        description: String,
        rules_summary: String,
        rules: GameRules,
    ) -> Result<()> {
        catalog::update_game(ctx, name, description, rules_summary, rules)
    }

    pub fn delete_game<'info>(
        ctx: Context<'_, '_, 'info, 'info, DeleteGame<'info>>,
        acknowledge_irreversible: bool,
    ) -> Result<()> {
        catalog::delete_game(ctx, acknowledge_irreversible)
    }

    pub fn list_games(ctx: Context<ListGames>) -> Result<Vec<GameView>> {
        catalog::list_games(ctx)
    }

    // ----------------------------
    // Draws
    // ----------------------------
    pub fn create_draw(ctx: Context<CreateDraw>, closes_at: i64) -> Result<()> {
        draws::create_draw(ctx, closes_at)
    }

    pub fn update_draw(ctx: Context<ManageDraw>, closes_at: i64) -> Result<()> {
        draws::update_draw(ctx, closes_at)
    }

    pub fn close_draw(ctx: Context<ManageDraw>) -> Result<()> {
        draws::close_draw(ctx)
    }

    pub fn void_draw(ctx: Context<ManageDraw>) -> Result<()> {
        draws::void_draw(ctx)
    }

    pub fn delete_draw<'info>(ctx: Context<'_, '_, 'info, 'info, DeleteDraw<'info>>) -> Result<()> {
        draws::delete_draw(ctx)
    }

    pub fn list_draws(ctx: Context<ListDraws>) -> Result<Vec<DrawView>> {
        draws::list_draws(ctx)
    }

    pub fn quick_pick(ctx: Context<QuickPick>, seed: [u8; 32]) -> Result<Vec<u8>> {
        draws::quick_pick(ctx, seed)
    }

    // ----------------------------
    // Tickets
    // ----------------------------
    pub fn purchase_ticket(ctx: Context<PurchaseTicket>, nonce: u64, numbers: Vec<u8>) -> Result<()> {
        tickets::purchase_ticket(ctx, nonce, numbers)
    }

    pub fn list_tickets(ctx: Context<ListTickets>, scope: TicketScope) -> Result<Vec<TicketView>> {
        tickets::list_tickets(ctx, scope)
    }

    pub fn update_ticket_state(ctx: Context<UpdateTicketState>, new_state: TicketStatus) -> Result<()> {
        tickets::update_ticket_state(ctx, new_state)
    }

    pub fn delete_ticket(ctx: Context<DeleteTicket>) -> Result<()> {
        tickets::delete_ticket(ctx)
    }

    // ----------------------------
    // Wallet
    // ----------------------------
    pub fn open_wallet(ctx: Context<OpenWallet>) -> Result<()> {
        wallet::open_wallet(ctx)
    }

    pub fn recharge(ctx: Context<Recharge>, amount: u64) -> Result<()> {
        wallet::recharge(ctx, amount)
    }

    pub fn get_balance(ctx: Context<ReadWallet>) -> Result<u64> {
        wallet::get_balance(ctx)
    }

    pub fn get_history(ctx: Context<ReadWallet>, limit: u16, page: u32) -> Result<Vec<LedgerEntryView>> {
        wallet::get_history(ctx, limit, page)
    }

    pub fn reconcile_wallet(ctx: Context<ReconcileWallet>) -> Result<u64> {
        wallet::reconcile_wallet(ctx)
    }

    // ----------------------------
    // Settlement
    // ----------------------------
    pub fn settle_draw(ctx: Context<ManageDraw>, winning_numbers: Vec<u8>) -> Result<()> {
        settlement::settle_draw(ctx, winning_numbers)
    }

    pub fn evaluate_tickets<'info>(
        ctx: Context<'_, '_, 'info, 'info, EvaluateTickets<'info>>,
    ) -> Result<()> {
        settlement::evaluate_tickets(ctx)
    }

    pub fn claim_prize(ctx: Context<ClaimPrize>) -> Result<()> {
        settlement::claim_prize(ctx)
    }

    pub fn refund_ticket(ctx: Context<RefundTicket>) -> Result<()> {
        settlement::refund_ticket(ctx)
    }
}
