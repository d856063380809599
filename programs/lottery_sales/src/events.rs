use anchor_lang::prelude::*;

use crate::state::{GameRules, TicketStatus};

#[event]
pub struct ConfigInitialized {
    pub admin: Pubkey,
    pub currency_mint: Pubkey,
    pub treasury: Pubkey,
}

#[event]
pub struct PauseChanged {
    pub paused: bool,
    pub timestamp: i64,
}

#[event]
pub struct GameCreated {
    pub game_id: u64,
    pub name: String,
    pub rules: GameRules,
    pub timestamp: i64,
}

#[event]
pub struct GameUpdated {
    pub game_id: u64,
    pub rules: GameRules,
    pub timestamp: i64,
}

#[event]
pub struct GameDeleted {
    pub game_id: u64,
    pub draws_removed: u64,
    pub timestamp: i64,
}

#[event]
pub struct DrawCreated {
    pub draw_id: u64,
    pub game_id: u64,
    pub closes_at: i64,
    pub price: u64,
}

#[event]
pub struct DrawRescheduled {
    pub draw_id: u64,
    pub closes_at: i64,
    pub timestamp: i64,
}

#[event]
pub struct DrawClosed {
    pub draw_id: u64,
    pub closed_at: i64,
}

#[event]
pub struct DrawSettled {
    pub draw_id: u64,
    pub winning_numbers: Vec<u8>,
    pub paid_tickets: u64,
    pub pot: u64,
    pub timestamp: i64,
}

#[event]
pub struct DrawVoided {
    pub draw_id: u64,
    pub paid_tickets: u64,
    pub timestamp: i64,
}

#[event]
pub struct DrawDeleted {
    pub draw_id: u64,
    pub game_id: u64,
    pub tickets_removed: u64,
    pub swept_to_treasury: u64,
    pub timestamp: i64,
}

#[event]
pub struct TicketPurchased {
    pub draw_id: u64,
    pub ticket: Pubkey,
    pub user: Pubkey,
    pub numbers: Vec<u8>,
    pub total: u64,
    pub balance_after: u64,
    pub timestamp: i64,
}

#[event]
pub struct TicketsEvaluated {
    pub draw_id: u64,
    pub evaluated: u64,
    pub winners: u64,
    pub payout_ready: bool,
}

#[event]
pub struct TicketStateChanged {
    pub ticket: Pubkey,
    pub from: TicketStatus,
    pub to: TicketStatus,
    pub timestamp: i64,
}

#[event]
pub struct TicketRefunded {
    pub draw_id: u64,
    pub ticket: Pubkey,
    pub user: Pubkey,
    pub amount: u64,
    pub timestamp: i64,
}

#[event]
pub struct TicketDeleted {
    pub draw_id: u64,
    pub ticket: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct PrizeClaimed {
    pub draw_id: u64,
    pub ticket: Pubkey,
    pub user: Pubkey,
    pub amount: u64,
    pub timestamp: i64,
}

#[event]
pub struct WalletOpened {
    pub user: Pubkey,
    pub wallet: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct WalletRecharged {
    pub user: Pubkey,
    pub amount: u64,
    pub balance_after: u64,
    pub seq: u64,
    pub timestamp: i64,
}
