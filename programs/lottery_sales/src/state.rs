use anchor_lang::prelude::*;

use crate::errors::LotteryError;
use crate::utils::validate_selection;

#[account]
#[derive(InitSpace)]
pub struct Config {
    pub admin: Pubkey,
    pub bump: u8,

    /// SPL mint every wallet, pot and treasury is denominated in (2 decimals).
    pub currency_mint: Pubkey,

    /// Receives pot leftovers when a draw is deleted.
    pub treasury: Pubkey,
    pub treasury_bump: u8,

    pub paused: bool,

    pub next_game_id: u64,
    pub next_draw_id: u64,

    pub version: u16,
}

/// The part of a Game that governs tickets. Draws keep a frozen copy.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub struct GameRules {
    /// Ticket price in cents.
    pub price: u64,
    pub range_min: u8,
    pub range_max: u8,
    pub number_count: u8,
    pub allow_duplicates: bool,
}

impl GameRules {
    /// Number of distinct values a player can pick from.
    pub fn range_size(&self) -> u16 {
        (self.range_max as u16)
            .saturating_sub(self.range_min as u16)
            .saturating_add(1)
    }
}

#[account]
#[derive(InitSpace)]
pub struct Game {
    pub game_id: u64,
    pub bump: u8,

    // Lengths are bytes; validation counts characters (up to 4 bytes each).
    #[max_len(400)]
    pub name: String,
    #[max_len(1020)]
    pub description: String,
    #[max_len(1020)]
    pub rules_summary: String,

    pub rules: GameRules,

    /// Draws still referencing this game. Deletion cascades until it hits 0.
    pub live_draws: u64,

    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub enum DrawStatus {
    Open,
    Closed,
    Drawn,
    Void,
}

impl DrawStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DrawStatus::Drawn | DrawStatus::Void)
    }
}

#[account]
#[derive(InitSpace)]
pub struct Draw {
    pub draw_id: u64,
    pub bump: u8,

    pub game_id: u64,
    /// Snapshot of the game's rules at creation; later game edits never reach it.
    pub rules: GameRules,

    pub closes_at: i64,
    pub status: DrawStatus,

    /// Written exactly once, on the transition to Drawn.
    #[max_len(20)]
    pub winning_numbers: Vec<u8>,

    // Token account PDA holding this draw's pot
    pub vault: Pubkey,
    pub vault_bump: u8,

    /// Ticket accounts that still exist for this draw.
    pub live_tickets: u64,
    /// Tickets that paid and were not refunded. Frozen once Drawn.
    pub paid_tickets: u64,
    pub evaluated_tickets: u64,
    pub winner_count: u64,

    /// Mirrors the vault balance.
    pub pot: u64,
    pub prize_per_winner: u64,
    pub payout_ready: bool,

    pub created_at: i64,
    pub closed_at: i64,
    pub drawn_at: i64,
    pub voided_at: i64,
}

impl Draw {
    /// Fresh Open draw with the game's rules frozen in and every counter at zero.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        draw_id: u64,
        bump: u8,
        game_id: u64,
        rules: GameRules,
        closes_at: i64,
        vault: Pubkey,
        vault_bump: u8,
        now: i64,
    ) -> Result<Self> {
        require!(closes_at > now, LotteryError::ClosesAtNotFuture);
        Ok(Self {
            draw_id,
            bump,
            game_id,
            rules,
            closes_at,
            status: DrawStatus::Open,
            winning_numbers: Vec::new(),
            vault,
            vault_bump,
            live_tickets: 0,
            paid_tickets: 0,
            evaluated_tickets: 0,
            winner_count: 0,
            pot: 0,
            prize_per_winner: 0,
            payout_ready: false,
            created_at: now,
            closed_at: 0,
            drawn_at: 0,
            voided_at: 0,
        })
    }

    /// Status as seen at `now`: an Open draw past its closing time reads as Closed.
    pub fn effective_status(&self, now: i64) -> DrawStatus {
        match self.status {
            DrawStatus::Open if now >= self.closes_at => DrawStatus::Closed,
            s => s,
        }
    }

    pub fn ensure_not_terminal(&self) -> Result<()> {
        require!(!self.status.is_terminal(), LotteryError::DrawTerminal);
        Ok(())
    }

    pub fn ensure_on_sale(&self, now: i64) -> Result<()> {
        self.ensure_not_terminal()?;
        require!(
            self.effective_status(now) == DrawStatus::Open,
            LotteryError::DrawNotOpen
        );
        Ok(())
    }

    pub fn reschedule(&mut self, closes_at: i64, now: i64) -> Result<()> {
        self.ensure_on_sale(now)?;
        require!(closes_at > now, LotteryError::ClosesAtNotFuture);
        self.closes_at = closes_at;
        Ok(())
    }

    /// Open -> Closed. Also persists a closure that already happened lazily.
    pub fn close_sales(&mut self, now: i64) -> Result<()> {
        self.ensure_not_terminal()?;
        require!(self.status == DrawStatus::Open, LotteryError::DrawNotOpen);
        self.status = DrawStatus::Closed;
        self.closed_at = now.min(self.closes_at);
        Ok(())
    }

    /// Open|Closed -> Drawn, once the sales window is over.
    pub fn settle(&mut self, winning_numbers: Vec<u8>, now: i64) -> Result<()> {
        self.ensure_not_terminal()?;
        require!(
            self.effective_status(now) == DrawStatus::Closed,
            LotteryError::SalesStillOpen
        );
        validate_selection(&self.rules, &winning_numbers)?;

        if self.status == DrawStatus::Open {
            self.closed_at = self.closes_at;
        }
        self.winning_numbers = winning_numbers;
        self.status = DrawStatus::Drawn;
        self.drawn_at = now;
        self.refresh_payout();
        Ok(())
    }

    /// Any non-terminal state -> Void.
    pub fn void(&mut self, now: i64) -> Result<()> {
        self.ensure_not_terminal()?;
        self.status = DrawStatus::Void;
        self.voided_at = now;
        Ok(())
    }

    pub fn record_sale(&mut self, price: u64) -> Result<()> {
        let live = self.live_tickets.checked_add(1).ok_or(LotteryError::MathOverflow)?;
        let paid = self.paid_tickets.checked_add(1).ok_or(LotteryError::MathOverflow)?;
        let pot = self.pot.checked_add(price).ok_or(LotteryError::MathOverflow)?;
        self.live_tickets = live;
        self.paid_tickets = paid;
        self.pot = pot;
        Ok(())
    }

    /// A paid ticket got its money back (void refund or admin cancel).
    pub fn record_refund(&mut self, amount: u64) -> Result<()> {
        require!(self.status != DrawStatus::Drawn, LotteryError::DrawTerminal);
        let paid = self.paid_tickets.checked_sub(1).ok_or(LotteryError::MathOverflow)?;
        let pot = self.pot.checked_sub(amount).ok_or(LotteryError::MathOverflow)?;
        self.paid_tickets = paid;
        self.pot = pot;
        Ok(())
    }

    pub fn record_evaluation(&mut self, won: bool) -> Result<()> {
        require!(self.status == DrawStatus::Drawn, LotteryError::DrawNotDrawn);
        let evaluated = self
            .evaluated_tickets
            .checked_add(1)
            .ok_or(LotteryError::MathOverflow)?;
        require!(evaluated <= self.paid_tickets, LotteryError::MathOverflow);
        let winners = if won {
            self.winner_count.checked_add(1).ok_or(LotteryError::MathOverflow)?
        } else {
            self.winner_count
        };

        self.evaluated_tickets = evaluated;
        self.winner_count = winners;
        self.refresh_payout();
        Ok(())
    }

    pub fn record_prize_paid(&mut self, amount: u64) -> Result<()> {
        self.pot = self.pot.checked_sub(amount).ok_or(LotteryError::MathOverflow)?;
        Ok(())
    }

    pub fn record_ticket_closed(&mut self) -> Result<()> {
        self.live_tickets = self.live_tickets.checked_sub(1).ok_or(LotteryError::MathOverflow)?;
        Ok(())
    }

    // Equal split, floor. The remainder stays in the vault for the treasury sweep.
    fn refresh_payout(&mut self) {
        if self.status != DrawStatus::Drawn || self.payout_ready {
            return;
        }
        if self.evaluated_tickets == self.paid_tickets {
            self.prize_per_winner = if self.winner_count > 0 {
                self.pot / self.winner_count
            } else {
                0
            };
            self.payout_ready = true;
        }
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub enum TicketStatus {
    Pending,
    Paid,
    Winner,
    Cancelled,
}

impl TicketStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TicketStatus::Winner | TicketStatus::Cancelled)
    }
}

#[account]
#[derive(InitSpace)]
pub struct Ticket {
    pub draw_id: u64,
    pub user: Pubkey,
    /// Caller-supplied idempotency key, part of the PDA seeds.
    pub nonce: u64,
    pub bump: u8,

    /// Selection rows, in the order the player picked them.
    #[max_len(20)]
    pub numbers: Vec<u8>,

    /// Price charged at purchase. Never changes afterwards.
    pub total: u64,
    pub status: TicketStatus,

    pub evaluated: bool,
    pub prize_claimed: bool,

    /// Ledger sequence of the Payment entry that funded this ticket.
    pub payment_seq: u64,

    pub purchased_at: i64,
    pub updated_at: i64,
}

impl Ticket {
    fn transition(&mut self, from: &[TicketStatus], to: TicketStatus, now: i64) -> Result<()> {
        require!(!self.status.is_terminal(), LotteryError::TicketTerminal);
        require!(from.contains(&self.status), LotteryError::IllegalTicketTransition);
        self.status = to;
        self.updated_at = now;
        Ok(())
    }

    pub fn mark_paid(&mut self, now: i64) -> Result<()> {
        self.transition(&[TicketStatus::Pending], TicketStatus::Paid, now)
    }

    pub fn mark_winner(&mut self, now: i64) -> Result<()> {
        self.transition(&[TicketStatus::Paid], TicketStatus::Winner, now)
    }

    pub fn cancel(&mut self, now: i64) -> Result<()> {
        self.transition(
            &[TicketStatus::Pending, TicketStatus::Paid],
            TicketStatus::Cancelled,
            now,
        )
    }

    /// Exact match ignoring order: same values with the same multiplicities.
    pub fn matches(&self, winning_numbers: &[u8]) -> bool {
        if self.numbers.len() != winning_numbers.len() {
            return false;
        }
        let mut mine = self.numbers.clone();
        let mut theirs = winning_numbers.to_vec();
        mine.sort_unstable();
        theirs.sort_unstable();
        mine == theirs
    }

    /// Whether removing the account loses nothing owed to anyone.
    pub fn is_deletable(&self, draw_status: DrawStatus) -> bool {
        match self.status {
            TicketStatus::Pending | TicketStatus::Cancelled => true,
            TicketStatus::Paid => draw_status == DrawStatus::Drawn && self.evaluated,
            TicketStatus::Winner => self.prize_claimed,
        }
    }
}

#[account]
#[derive(InitSpace)]
pub struct Wallet {
    pub user: Pubkey,
    pub bump: u8,

    // Token account PDA holding the prepaid funds
    pub vault: Pubkey,
    pub vault_bump: u8,

    /// Cache of the ledger's signed sum. Kept equal to the vault amount.
    pub balance: u64,
    /// Sequence number of the next ledger entry.
    pub entry_count: u64,

    pub created_at: i64,
    pub updated_at: i64,
}

impl Wallet {
    /// The vault must cover the ledger balance. Anyone can transfer into it,
    /// so a surplus is tolerated and never counted.
    pub fn ensure_backed_by(&self, vault_amount: u64) -> Result<()> {
        require!(vault_amount >= self.balance, LotteryError::LedgerMismatch);
        Ok(())
    }

    /// Appends one ledger entry and moves the cached balance with it.
    /// Nothing is written when the entry would take the balance below zero.
    pub fn append(
        &mut self,
        wallet_key: Pubkey,
        entry: &mut LedgerEntry,
        entry_bump: u8,
        kind: TransactionKind,
        amount: u64,
        reference: Pubkey,
        now: i64,
    ) -> Result<()> {
        let balance_after = match kind {
            TransactionKind::Recharge | TransactionKind::Credit => self
                .balance
                .checked_add(amount)
                .ok_or(LotteryError::MathOverflow)?,
            TransactionKind::Payment => self
                .balance
                .checked_sub(amount)
                .ok_or(LotteryError::InsufficientFunds)?,
        };
        let seq = self.entry_count;
        let next = seq.checked_add(1).ok_or(LotteryError::MathOverflow)?;

        entry.wallet = wallet_key;
        entry.seq = seq;
        entry.bump = entry_bump;
        entry.kind = kind;
        entry.amount = amount;
        entry.balance_after = balance_after;
        entry.timestamp = now;
        entry.status = EntryStatus::Completed;
        entry.reference = reference;

        self.balance = balance_after;
        self.entry_count = next;
        self.updated_at = now;
        Ok(())
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub enum TransactionKind {
    Recharge,
    Payment,
    Credit,
}

impl TransactionKind {
    pub fn signed(&self, amount: u64) -> i128 {
        match self {
            TransactionKind::Recharge | TransactionKind::Credit => amount as i128,
            TransactionKind::Payment => -(amount as i128),
        }
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub enum EntryStatus {
    Completed,
}

/// One immutable ledger row. The wallet balance is the signed sum of these.
#[account]
#[derive(InitSpace)]
pub struct LedgerEntry {
    pub wallet: Pubkey,
    pub seq: u64,
    pub bump: u8,

    pub kind: TransactionKind,
    /// Magnitude; the sign comes from `kind`.
    pub amount: u64,
    pub balance_after: u64,
    pub timestamp: i64,
    pub status: EntryStatus,

    /// Ticket the entry pays for or refunds; default for recharges.
    pub reference: Pubkey,
}

// ---------------
// Read views
// ---------------

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct GameView {
    pub game_id: u64,
    pub name: String,
    pub rules: GameRules,
    pub live_draws: u64,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct DrawView {
    pub draw_id: u64,
    pub game_id: u64,
    pub rules: GameRules,
    pub closes_at: i64,
    /// Effective status at the time of the call.
    pub status: DrawStatus,
    pub winning_numbers: Vec<u8>,
    pub live_tickets: u64,
    pub pot: u64,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct TicketView {
    pub draw_id: u64,
    pub user: Pubkey,
    pub nonce: u64,
    pub numbers: Vec<u8>,
    pub total: u64,
    pub status: TicketStatus,
    pub purchased_at: i64,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct LedgerEntryView {
    pub seq: u64,
    pub kind: TransactionKind,
    pub amount: u64,
    pub balance_after: u64,
    pub timestamp: i64,
    pub status: EntryStatus,
    pub reference: Pubkey,
}

impl From<&Game> for GameView {
    fn from(g: &Game) -> Self {
        Self {
            game_id: g.game_id,
            name: g.name.clone(),
            rules: g.rules,
            live_draws: g.live_draws,
        }
    }
}

impl Draw {
    pub fn view(&self, now: i64) -> DrawView {
        DrawView {
            draw_id: self.draw_id,
            game_id: self.game_id,
            rules: self.rules,
            closes_at: self.closes_at,
            status: self.effective_status(now),
            winning_numbers: self.winning_numbers.clone(),
            live_tickets: self.live_tickets,
            pot: self.pot,
        }
    }
}

impl From<&Ticket> for TicketView {
    fn from(t: &Ticket) -> Self {
        Self {
            draw_id: t.draw_id,
            user: t.user,
            nonce: t.nonce,
            numbers: t.numbers.clone(),
            total: t.total,
            status: t.status,
            purchased_at: t.purchased_at,
        }
    }
}

impl From<&LedgerEntry> for LedgerEntryView {
    fn from(e: &LedgerEntry) -> Self {
        Self {
            seq: e.seq,
            kind: e.kind,
            amount: e.amount,
            balance_after: e.balance_after,
            timestamp: e.timestamp,
            status: e.status,
            reference: e.reference,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn new_draw_needs_future_close_and_freezes_rules() {
        let vault = Pubkey::new_unique();
        let draw = Draw::new(3, 250, 1, rules(), NOW + HOUR, vault, 249, NOW).unwrap();
        assert_eq!(draw.status, DrawStatus::Open);
        assert_eq!(draw.rules, rules());
        assert_eq!(draw.vault, vault);
        assert_eq!(draw.created_at, NOW);
        assert_eq!((draw.live_tickets, draw.paid_tickets, draw.pot), (0, 0, 0));
        assert!(draw.winning_numbers.is_empty());

        let past = Draw::new(3, 250, 1, rules(), NOW - HOUR, vault, 249, NOW);
        assert_eq!(code_of(past), code(LotteryError::ClosesAtNotFuture));
        let now = Draw::new(3, 250, 1, rules(), NOW, vault, 249, NOW);
        assert_eq!(code_of(now), code(LotteryError::ClosesAtNotFuture));
        assert_eq!(
            LotteryError::ClosesAtNotFuture.class(),
            crate::errors::ErrorClass::Validation
        );
    }

    #[test]
    fn open_draw_reads_closed_once_deadline_passes() {
        let draw = open_draw();
        assert_eq!(draw.effective_status(NOW), DrawStatus::Open);
        assert_eq!(draw.effective_status(NOW + HOUR), DrawStatus::Closed);
        assert_eq!(draw.status, DrawStatus::Open);
    }

    #[test]
    fn terminal_draws_reject_every_mutation() {
        let mut drawn = open_draw();
        drawn.settle(vec![1, 2, 3, 4], NOW + 2 * HOUR).unwrap();
        let snapshot = drawn.clone();

        assert_eq!(code_of(drawn.reschedule(NOW + 5 * HOUR, NOW)), code(LotteryError::DrawTerminal));
        assert_eq!(code_of(drawn.close_sales(NOW + 3 * HOUR)), code(LotteryError::DrawTerminal));
        assert_eq!(code_of(drawn.void(NOW + 3 * HOUR)), code(LotteryError::DrawTerminal));
        assert_eq!(
            code_of(drawn.settle(vec![5, 6, 7, 8], NOW + 3 * HOUR)),
            code(LotteryError::DrawTerminal)
        );
        assert_eq!(drawn.winning_numbers, snapshot.winning_numbers);
        assert_eq!(drawn.closes_at, snapshot.closes_at);
        assert_eq!(drawn.status, DrawStatus::Drawn);

        let mut void = open_draw();
        void.void(NOW).unwrap();
        assert_eq!(code_of(void.reschedule(NOW + 5 * HOUR, NOW)), code(LotteryError::DrawTerminal));
        assert_eq!(code_of(void.void(NOW)), code(LotteryError::DrawTerminal));
        assert_eq!(
            code_of(void.settle(vec![1, 2, 3, 4], NOW + 2 * HOUR)),
            code(LotteryError::DrawTerminal)
        );
    }

    #[test]
    fn settle_waits_for_sales_window() {
        let mut draw = open_draw();
        assert_eq!(
            code_of(draw.settle(vec![1, 2, 3, 4], NOW)),
            code(LotteryError::SalesStillOpen)
        );
        assert!(draw.winning_numbers.is_empty());

        draw.settle(vec![4, 3, 2, 1], NOW + HOUR).unwrap();
        assert_eq!(draw.status, DrawStatus::Drawn);
        assert_eq!(draw.winning_numbers, vec![4, 3, 2, 1]);
        assert_eq!(draw.closed_at, NOW + HOUR);
        // nothing sold: payout is trivially ready
        assert!(draw.payout_ready);
    }

    #[test]
    fn settle_validates_winning_numbers() {
        let mut draw = open_draw();
        draw.close_sales(NOW).unwrap();
        assert_eq!(
            code_of(draw.settle(vec![1, 2, 3], NOW + HOUR)),
            code(LotteryError::SelectionLength)
        );
        assert_eq!(
            code_of(draw.settle(vec![1, 1, 2, 3], NOW + HOUR)),
            code(LotteryError::DuplicateNumber)
        );
        assert_eq!(draw.status, DrawStatus::Closed);
    }

    #[test]
    fn reschedule_requires_open_window_and_future_time() {
        let mut draw = open_draw();
        assert_eq!(
            code_of(draw.reschedule(NOW - 1, NOW)),
            code(LotteryError::ClosesAtNotFuture)
        );
        draw.reschedule(NOW + 2 * HOUR, NOW).unwrap();
        assert_eq!(draw.closes_at, NOW + 2 * HOUR);

        assert_eq!(
            code_of(draw.reschedule(NOW + 5 * HOUR, NOW + 3 * HOUR)),
            code(LotteryError::DrawNotOpen)
        );
    }

    #[test]
    fn closed_draw_can_still_be_voided() {
        let mut draw = open_draw();
        draw.close_sales(NOW).unwrap();
        assert_eq!(code_of(draw.close_sales(NOW)), code(LotteryError::DrawNotOpen));
        draw.void(NOW).unwrap();
        assert_eq!(draw.status, DrawStatus::Void);
        assert_eq!(draw.voided_at, NOW);
    }

    #[test]
    fn payout_is_split_once_every_paid_ticket_is_evaluated() {
        let mut draw = open_draw();
        for _ in 0..3 {
            draw.record_sale(1_000).unwrap();
        }
        draw.settle(vec![1, 2, 3, 4], NOW + HOUR).unwrap();
        assert!(!draw.payout_ready);

        draw.record_evaluation(true).unwrap();
        draw.record_evaluation(false).unwrap();
        assert!(!draw.payout_ready);
        draw.record_evaluation(true).unwrap();

        assert!(draw.payout_ready);
        assert_eq!(draw.winner_count, 2);
        assert_eq!(draw.prize_per_winner, 1_500);

        assert_eq!(
            code_of(draw.record_evaluation(true)),
            code(LotteryError::MathOverflow)
        );
    }

    #[test]
    fn refunds_are_rejected_after_drawing() {
        let mut draw = open_draw();
        draw.record_sale(1_000).unwrap();
        draw.void(NOW).unwrap();
        draw.record_refund(1_000).unwrap();
        assert_eq!(draw.pot, 0);
        assert_eq!(draw.paid_tickets, 0);
        assert_eq!(draw.live_tickets, 1);

        let mut drawn = open_draw();
        drawn.record_sale(1_000).unwrap();
        drawn.settle(vec![1, 2, 3, 4], NOW + HOUR).unwrap();
        assert_eq!(code_of(drawn.record_refund(1_000)), code(LotteryError::DrawTerminal));
    }

    #[test]
    fn ticket_transitions_follow_the_state_machine() {
        let mut t = ticket(vec![1, 2, 3, 4]);
        assert_eq!(code_of(t.mark_winner(NOW)), code(LotteryError::IllegalTicketTransition));
        t.mark_paid(NOW).unwrap();
        assert_eq!(code_of(t.mark_paid(NOW)), code(LotteryError::IllegalTicketTransition));
        t.mark_winner(NOW).unwrap();
        assert_eq!(code_of(t.cancel(NOW)), code(LotteryError::TicketTerminal));

        let mut c = ticket(vec![1, 2, 3, 4]);
        c.mark_paid(NOW).unwrap();
        c.cancel(NOW + 1).unwrap();
        assert_eq!(c.status, TicketStatus::Cancelled);
        assert_eq!(c.updated_at, NOW + 1);
        assert_eq!(code_of(c.mark_paid(NOW)), code(LotteryError::TicketTerminal));
    }

    #[test]
    fn match_rule_ignores_order_but_not_multiplicity() {
        let t = ticket(vec![9, 3, 3, 1]);
        assert!(t.matches(&[1, 3, 9, 3]));
        assert!(!t.matches(&[1, 3, 9, 9]));
        assert!(!t.matches(&[1, 3, 9]));
    }

    #[test]
    fn deletability_protects_unsettled_money() {
        let mut t = ticket(vec![1, 2, 3, 4]);
        assert!(t.is_deletable(DrawStatus::Open));

        t.mark_paid(NOW).unwrap();
        assert!(!t.is_deletable(DrawStatus::Open));
        assert!(!t.is_deletable(DrawStatus::Void));
        assert!(!t.is_deletable(DrawStatus::Drawn));
        t.evaluated = true;
        assert!(t.is_deletable(DrawStatus::Drawn));

        t.mark_winner(NOW).unwrap();
        assert!(!t.is_deletable(DrawStatus::Drawn));
        t.prize_claimed = true;
        assert!(t.is_deletable(DrawStatus::Drawn));
    }

    #[test]
    fn ledger_append_moves_balance_and_sequence() {
        let mut w = wallet(0);
        let key = Pubkey::new_unique();
        let mut e = blank_entry();
        w.append(key, &mut e, 1, TransactionKind::Recharge, 5_000, Pubkey::default(), NOW)
            .unwrap();
        assert_eq!(w.balance, 5_000);
        assert_eq!(w.entry_count, 1);
        assert_eq!(e.seq, 0);
        assert_eq!(e.balance_after, 5_000);
        assert_eq!(e.wallet, key);

        let ticket_key = Pubkey::new_unique();
        let mut p = blank_entry();
        w.append(key, &mut p, 1, TransactionKind::Payment, 1_000, ticket_key, NOW)
            .unwrap();
        assert_eq!(w.balance, 4_000);
        assert_eq!(p.seq, 1);
        assert_eq!(p.reference, ticket_key);
    }

    #[test]
    fn ledger_refuses_to_go_negative() {
        let mut w = wallet(999);
        let mut e = blank_entry();
        let res = w.append(
            Pubkey::new_unique(),
            &mut e,
            1,
            TransactionKind::Payment,
            1_000,
            Pubkey::default(),
            NOW,
        );
        assert_eq!(code_of(res), code(LotteryError::InsufficientFunds));
        assert_eq!(w.balance, 999);
        assert_eq!(w.entry_count, 0);
        assert_eq!(e.amount, 0);
    }

    #[test]
    fn vault_surplus_does_not_break_balance_reads() {
        let w = wallet(5_000);
        // someone transferred a cent straight into the vault
        w.ensure_backed_by(5_001).unwrap();
        w.ensure_backed_by(5_000).unwrap();
        assert_eq!(code_of(w.ensure_backed_by(4_999)), code(LotteryError::LedgerMismatch));
        assert_eq!(w.balance, 5_000);
    }

    #[test]
    fn signed_amounts_follow_kind() {
        assert_eq!(TransactionKind::Recharge.signed(10), 10);
        assert_eq!(TransactionKind::Credit.signed(10), 10);
        assert_eq!(TransactionKind::Payment.signed(10), -10);
    }

    #[test]
    fn draw_view_reports_effective_status() {
        let draw = open_draw();
        assert_eq!(draw.view(NOW).status, DrawStatus::Open);
        assert_eq!(draw.view(NOW + HOUR).status, DrawStatus::Closed);
    }
}
