use anchor_lang::prelude::*;
use anchor_lang::solana_program::{program::invoke_signed, system_instruction};
use anchor_spl::token::{self, CloseAccount, Transfer};
use solana_sha256_hasher::hashv;

use crate::constants::*;
use crate::{
    errors::LotteryError,
    state::{Draw, GameRules, LedgerEntry, Ticket, TicketStatus, TransactionKind, Wallet},
};

// -----------------
// Seeds
// -----------------
pub const CONFIG_SEED: &[u8] = b"config";
pub const TREASURY_SEED: &[u8] = b"treasury";
pub const GAME_SEED: &[u8] = b"game";
pub const DRAW_SEED: &[u8] = b"draw";
pub const DRAW_VAULT_SEED: &[u8] = b"draw_vault";
pub const TICKET_SEED: &[u8] = b"ticket";
pub const WALLET_SEED: &[u8] = b"wallet";
pub const WALLET_VAULT_SEED: &[u8] = b"wallet_vault";
pub const LEDGER_SEED: &[u8] = b"ledger";

// ---------------
// Payloads
// ---------------
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TicketScope {
    /// Tickets owned by the signer.
    Own,
    /// Every ticket passed in. Admin only.
    All,
}

// -------------------------
// Game definition
// -------------------------
pub fn validate_game_definition(
    name: &str,
    description: &str,
    rules_summary: &str,
    rules: &GameRules,
) -> Result<()> {
    let trimmed = name.trim().chars().count();
    require!(
        trimmed >= MIN_NAME_CHARS && name.chars().count() <= MAX_NAME_CHARS,
        LotteryError::InvalidNameLength
    );
    require!(
        description.chars().count() <= MAX_DESCRIPTION_CHARS,
        LotteryError::DescriptionTooLong
    );
    require!(
        rules_summary.chars().count() <= MAX_RULES_SUMMARY_CHARS,
        LotteryError::RulesSummaryTooLong
    );
    validate_rules(rules)
}

pub fn validate_rules(rules: &GameRules) -> Result<()> {
    require!(
        (MIN_TICKET_PRICE..=MAX_TICKET_PRICE).contains(&rules.price),
        LotteryError::PriceOutOfRange
    );
    require!(
        rules.range_min <= MAX_SELECTABLE && rules.range_max <= MAX_SELECTABLE,
        LotteryError::RangeOutOfBounds
    );
    require!(rules.range_min <= rules.range_max, LotteryError::RangeInverted);
    require!(
        (MIN_NUMBER_COUNT..=MAX_NUMBER_COUNT).contains(&rules.number_count),
        LotteryError::NumberCountOutOfRange
    );
    if !rules.allow_duplicates {
        require!(
            rules.range_size() >= rules.number_count as u16,
            LotteryError::RangeTooNarrow
        );
    }
    Ok(())
}

// -------------------------
// Number selection
// -------------------------
pub fn validate_selection(rules: &GameRules, numbers: &[u8]) -> Result<()> {
    require!(
        numbers.len() == rules.number_count as usize,
        LotteryError::SelectionLength
    );
    require!(
        numbers
            .iter()
            .all(|n| (rules.range_min..=rules.range_max).contains(n)),
        LotteryError::SelectionOutOfRange
    );
    if !rules.allow_duplicates {
        // values are <= 100, a bitmap covers them
        let mut seen = [false; MAX_SELECTABLE as usize + 1];
        for &n in numbers {
            require!(!seen[n as usize], LotteryError::DuplicateNumber);
            seen[n as usize] = true;
        }
    }
    Ok(())
}

/// Uniform picks from the game's range. Ignores the duplicate policy.
/// Deterministic per seed; never used for winning numbers.
pub fn quick_pick(rules: &GameRules, seed: &[u8; 32]) -> Vec<u8> {
    let count = rules.number_count as usize;
    let span = rules.range_size() as u32;
    // reject samples in the uneven tail so every value is equally likely
    let limit = (65_536 / span) * span;

    let mut out = Vec::with_capacity(count);
    let mut counter: u64 = 0;
    while out.len() < count {
        let h = hashv(&[
            b"quick_pick".as_ref(),
            seed.as_ref(),
            counter.to_le_bytes().as_ref(),
        ])
        .to_bytes();
        counter += 1;

        for pair in h.chunks_exact(2) {
            if out.len() == count {
                break;
            }
            let sample = u16::from_le_bytes([pair[0], pair[1]]) as u32;
            if sample < limit {
                out.push(rules.range_min + (sample % span) as u8);
            }
        }
    }
    out
}

// -------------------------
// Wallet ledger
// -------------------------
pub fn validate_recharge(amount: u64) -> Result<()> {
    require!(
        (MIN_RECHARGE..=MAX_RECHARGE).contains(&amount),
        LotteryError::RechargeOutOfRange
    );
    Ok(())
}

/// Ledger sequence numbers on a history page, newest first. `page` starts at 1.
pub fn history_window(entry_count: u64, limit: u16, page: u32) -> Result<Vec<u64>> {
    require!(
        limit >= 1 && limit <= MAX_HISTORY_PAGE,
        LotteryError::InvalidPageSize
    );
    require!(page >= 1, LotteryError::InvalidPage);

    let skip = (page as u64 - 1)
        .checked_mul(limit as u64)
        .ok_or(LotteryError::MathOverflow)?;
    if skip >= entry_count {
        return Ok(Vec::new());
    }
    let newest = entry_count - 1 - skip;
    let take = (limit as u64).min(newest + 1);
    Ok((0..take).map(|i| newest - i).collect())
}

/// Replays a wallet's full ledger in sequence order and returns the balance
/// it implies. Every entry's recorded `balance_after` must agree.
pub fn replay_ledger(wallet_key: &Pubkey, entries: &[LedgerEntry]) -> Result<u64> {
    let mut running: i128 = 0;
    for (i, e) in entries.iter().enumerate() {
        require_keys_eq!(e.wallet, *wallet_key, LotteryError::LedgerEntryMismatch);
        require!(e.seq == i as u64, LotteryError::LedgerEntryMismatch);
        running += e.kind.signed(e.amount);
        require!(running >= 0, LotteryError::LedgerMismatch);
        require!(running == e.balance_after as i128, LotteryError::LedgerMismatch);
    }
    u64::try_from(running).map_err(|_| error!(LotteryError::MathOverflow))
}

// -------------------------
// Purchase / settlement cores
// -------------------------

/// Everything a purchase changes, checked before anything is written.
/// Returns the price to move from the wallet vault to the draw vault.
pub fn purchase_core(
    draw: &mut Draw,
    wallet: &mut Wallet,
    wallet_key: Pubkey,
    ticket: &mut Ticket,
    ticket_key: Pubkey,
    ticket_bump: u8,
    entry: &mut LedgerEntry,
    entry_bump: u8,
    nonce: u64,
    numbers: Vec<u8>,
    now: i64,
) -> Result<u64> {
    draw.ensure_on_sale(now)?;
    validate_selection(&draw.rules, &numbers)?;

    let price = draw.rules.price;
    require!(wallet.balance >= price, LotteryError::InsufficientFunds);

    wallet.append(
        wallet_key,
        entry,
        entry_bump,
        TransactionKind::Payment,
        price,
        ticket_key,
        now,
    )?;

    ticket.draw_id = draw.draw_id;
    ticket.user = wallet.user;
    ticket.nonce = nonce;
    ticket.bump = ticket_bump;
    ticket.numbers = numbers;
    ticket.total = price;
    ticket.status = TicketStatus::Pending;
    ticket.evaluated = false;
    ticket.prize_claimed = false;
    ticket.payment_seq = entry.seq;
    ticket.purchased_at = now;
    ticket.updated_at = now;
    ticket.mark_paid(now)?;

    draw.record_sale(price)?;
    Ok(price)
}

/// Cancels a paid ticket and credits its total back. Returns the amount to
/// move from the draw vault to the wallet vault.
pub fn refund_core(
    draw: &mut Draw,
    ticket: &mut Ticket,
    ticket_key: Pubkey,
    wallet: &mut Wallet,
    wallet_key: Pubkey,
    entry: &mut LedgerEntry,
    entry_bump: u8,
    now: i64,
) -> Result<u64> {
    require!(ticket.draw_id == draw.draw_id, LotteryError::DrawMismatch);
    require_keys_eq!(ticket.user, wallet.user, LotteryError::WalletMismatch);
    require!(
        ticket.status == TicketStatus::Paid,
        LotteryError::TicketNotRefundable
    );

    let amount = ticket.total;
    draw.record_refund(amount)?;
    wallet.append(
        wallet_key,
        entry,
        entry_bump,
        TransactionKind::Credit,
        amount,
        ticket_key,
        now,
    )?;
    ticket.cancel(now)?;
    Ok(amount)
}

/// Marks a paid ticket evaluated against the drawn numbers. Returns whether it won.
pub fn evaluate_core(draw: &mut Draw, ticket: &mut Ticket, now: i64) -> Result<bool> {
    require!(ticket.draw_id == draw.draw_id, LotteryError::DrawMismatch);
    require!(!ticket.evaluated, LotteryError::TicketAlreadyEvaluated);
    require!(
        ticket.status == TicketStatus::Paid,
        LotteryError::IllegalTicketTransition
    );

    let won = ticket.matches(&draw.winning_numbers);
    draw.record_evaluation(won)?;
    if won {
        ticket.mark_winner(now)?;
    }
    ticket.evaluated = true;
    ticket.updated_at = now;
    Ok(won)
}

/// Credits a winner's share. Returns the amount to move out of the draw vault.
pub fn claim_core(
    draw: &mut Draw,
    ticket: &mut Ticket,
    ticket_key: Pubkey,
    wallet: &mut Wallet,
    wallet_key: Pubkey,
    entry: &mut LedgerEntry,
    entry_bump: u8,
    now: i64,
) -> Result<u64> {
    require!(ticket.draw_id == draw.draw_id, LotteryError::DrawMismatch);
    require_keys_eq!(ticket.user, wallet.user, LotteryError::WalletMismatch);
    require!(ticket.status == TicketStatus::Winner, LotteryError::NotWinner);
    require!(!ticket.prize_claimed, LotteryError::AlreadyClaimed);
    require!(draw.payout_ready, LotteryError::PayoutNotReady);

    let amount = draw.prize_per_winner;
    draw.record_prize_paid(amount)?;
    wallet.append(
        wallet_key,
        entry,
        entry_bump,
        TransactionKind::Credit,
        amount,
        ticket_key,
        now,
    )?;
    ticket.prize_claimed = true;
    ticket.updated_at = now;
    Ok(amount)
}

// -------------------------
// Raw account plumbing
// -------------------------
pub fn load_program_account<T: AccountDeserialize>(
    ai: &AccountInfo,
    program_id: &Pubkey,
) -> Result<T> {
    require_keys_eq!(*ai.owner, *program_id, LotteryError::AccountNotOwnedByProgram);
    let data = ai
        .try_borrow_data()
        .map_err(|_| error!(LotteryError::AccountBorrowFailed))?;
    let mut slice: &[u8] = &data;
    T::try_deserialize(&mut slice)
}

/// `seeds` must already carry the stored bump.
pub fn expect_pda(key: &Pubkey, seeds: &[&[u8]], program_id: &Pubkey) -> Result<()> {
    let expected = Pubkey::create_program_address(seeds, program_id)
        .map_err(|_| error!(LotteryError::PdaMismatch))?;
    require_keys_eq!(expected, *key, LotteryError::PdaMismatch);
    Ok(())
}

pub fn store_program_account<T: AccountSerialize>(ai: &AccountInfo, value: &T) -> Result<()> {
    let mut data = ai
        .try_borrow_mut_data()
        .map_err(|_| error!(LotteryError::AccountBorrowFailed))?;
    let mut w = std::io::Cursor::new(&mut data[..]);
    value.try_serialize(&mut w)
}

/// Returns all lamports to `destination` and hands the account back to the system program.
pub fn close_program_account<'info>(
    ai: &AccountInfo<'info>,
    destination: &AccountInfo<'info>,
) -> Result<()> {
    let lamports = ai.lamports();
    let dest_lamports = destination
        .lamports()
        .checked_add(lamports)
        .ok_or(LotteryError::MathOverflow)?;

    **destination.try_borrow_mut_lamports()? = dest_lamports;
    **ai.try_borrow_mut_lamports()? = 0;

    ai.assign(&anchor_lang::solana_program::system_program::ID);
    ai.resize(0)?;
    Ok(())
}

/// Creates the ledger entry PDA for `seq` when it is not declared in the context.
/// Returns its bump.
pub fn create_ledger_entry_account<'info>(
    entry_ai: &AccountInfo<'info>,
    payer: &AccountInfo<'info>,
    system_program: &AccountInfo<'info>,
    wallet_key: &Pubkey,
    seq: u64,
    program_id: &Pubkey,
) -> Result<u8> {
    let seq_le = seq.to_le_bytes();
    let (expected, bump) =
        Pubkey::find_program_address(&[LEDGER_SEED, wallet_key.as_ref(), &seq_le], program_id);
    require_keys_eq!(expected, *entry_ai.key, LotteryError::LedgerEntryMismatch);
    require!(
        entry_ai.lamports() == 0 && entry_ai.data_is_empty(),
        LotteryError::LedgerEntryMismatch
    );

    let space = 8 + LedgerEntry::INIT_SPACE;
    let lamports = Rent::get()?.minimum_balance(space);
    let ix = system_instruction::create_account(
        payer.key,
        entry_ai.key,
        lamports,
        space as u64,
        program_id,
    );
    let signer: &[&[&[u8]]] = &[&[LEDGER_SEED, wallet_key.as_ref(), &seq_le, &[bump]]];
    invoke_signed(
        &ix,
        &[payer.clone(), entry_ai.clone(), system_program.clone()],
        signer,
    )?;
    Ok(bump)
}

// -------------------------
// Token movements
// -------------------------
pub fn transfer_signed<'info>(
    token_program: &AccountInfo<'info>,
    from: &AccountInfo<'info>,
    to: &AccountInfo<'info>,
    authority: &AccountInfo<'info>,
    signer_seeds: &[&[&[u8]]],
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    token::transfer(
        CpiContext::new_with_signer(
            token_program.clone(),
            Transfer {
                from: from.clone(),
                to: to.clone(),
                authority: authority.clone(),
            },
            signer_seeds,
        ),
        amount,
    )
}

/// Sweeps whatever is left in a draw vault to the treasury, then closes it.
pub fn retire_draw_vault<'info>(
    token_program: &AccountInfo<'info>,
    draw_vault: &AccountInfo<'info>,
    vault_amount: u64,
    treasury: &AccountInfo<'info>,
    draw_ai: &AccountInfo<'info>,
    draw_id: u64,
    draw_bump: u8,
    rent_destination: &AccountInfo<'info>,
) -> Result<()> {
    let draw_le = draw_id.to_le_bytes();
    let signer: &[&[&[u8]]] = &[&[DRAW_SEED, &draw_le, &[draw_bump]]];

    transfer_signed(
        token_program,
        draw_vault,
        treasury,
        draw_ai,
        signer,
        vault_amount,
    )?;

    token::close_account(CpiContext::new_with_signer(
        token_program.clone(),
        CloseAccount {
            account: draw_vault.clone(),
            destination: rent_destination.clone(),
            authority: draw_ai.clone(),
        },
        signer,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::fixtures::*;
    use crate::state::{DrawStatus, EntryStatus};
    use std::sync::{Arc, Mutex};
    use std::thread;

    fn small_rules() -> GameRules {
        GameRules {
            price: 1_000,
            range_min: 0,
            range_max: 9,
            number_count: 3,
            allow_duplicates: false,
        }
    }

    #[test]
    fn duplicate_selection_is_rejected_when_disallowed() {
        let rules = small_rules();
        assert_eq!(
            code_of(validate_selection(&rules, &[1, 1, 2])),
            code(LotteryError::DuplicateNumber)
        );
        assert!(validate_selection(&rules, &[1, 2, 3]).is_ok());

        let lenient = GameRules { allow_duplicates: true, ..rules };
        assert!(validate_selection(&lenient, &[1, 1, 2]).is_ok());
    }

    #[test]
    fn selection_length_and_bounds() {
        let rules = GameRules { range_min: 5, ..small_rules() };
        assert_eq!(
            code_of(validate_selection(&rules, &[5, 6])),
            code(LotteryError::SelectionLength)
        );
        assert_eq!(
            code_of(validate_selection(&rules, &[5, 6, 7, 8])),
            code(LotteryError::SelectionLength)
        );
        assert_eq!(
            code_of(validate_selection(&rules, &[4, 6, 7])),
            code(LotteryError::SelectionOutOfRange)
        );
        assert_eq!(
            code_of(validate_selection(&rules, &[5, 6, 10])),
            code(LotteryError::SelectionOutOfRange)
        );
        assert!(validate_selection(&rules, &[9, 5, 7]).is_ok());
    }

    #[test]
    fn game_definition_bounds() {
        let ok = rules();
        assert!(validate_game_definition("Pick 4", "", "", &ok).is_ok());

        assert_eq!(
            code_of(validate_game_definition("ab", "", "", &ok)),
            code(LotteryError::InvalidNameLength)
        );
        assert_eq!(
            code_of(validate_game_definition("   ", "", "", &ok)),
            code(LotteryError::InvalidNameLength)
        );
        let long_name = "x".repeat(101);
        assert_eq!(
            code_of(validate_game_definition(&long_name, "", "", &ok)),
            code(LotteryError::InvalidNameLength)
        );
        assert!(validate_game_definition(&"ñ".repeat(100), "", "", &ok).is_ok());

        let long_text = "d".repeat(256);
        assert_eq!(
            code_of(validate_game_definition("Pick 4", &long_text, "", &ok)),
            code(LotteryError::DescriptionTooLong)
        );
        assert_eq!(
            code_of(validate_game_definition("Pick 4", "", &long_text, &ok)),
            code(LotteryError::RulesSummaryTooLong)
        );

        for price in [99, 100_001, 0] {
            assert_eq!(
                code_of(validate_rules(&GameRules { price, ..ok })),
                code(LotteryError::PriceOutOfRange)
            );
        }
        assert!(validate_rules(&GameRules { price: 100, ..ok }).is_ok());
        assert!(validate_rules(&GameRules { price: 100_000, ..ok }).is_ok());

        assert_eq!(
            code_of(validate_rules(&GameRules { range_max: 101, ..ok })),
            code(LotteryError::RangeOutOfBounds)
        );
        assert_eq!(
            code_of(validate_rules(&GameRules { range_min: 50, range_max: 40, ..ok })),
            code(LotteryError::RangeInverted)
        );
        for number_count in [0, 21] {
            assert_eq!(
                code_of(validate_rules(&GameRules { number_count, ..ok })),
                code(LotteryError::NumberCountOutOfRange)
            );
        }
        assert_eq!(
            code_of(validate_rules(&GameRules { range_min: 0, range_max: 2, ..ok })),
            code(LotteryError::RangeTooNarrow)
        );
        assert!(validate_rules(&GameRules {
            range_min: 0,
            range_max: 2,
            allow_duplicates: true,
            ..ok
        })
        .is_ok());
        assert!(validate_rules(&GameRules { range_min: 100, range_max: 100, number_count: 1, ..ok }).is_ok());
    }

    #[test]
    fn recharge_bounds_are_inclusive() {
        assert_eq!(
            code_of(validate_recharge(500)),
            code(LotteryError::RechargeOutOfRange)
        );
        assert!(validate_recharge(1_000).is_ok());
        assert!(validate_recharge(1_000_000).is_ok());
        assert_eq!(
            code_of(validate_recharge(1_000_001)),
            code(LotteryError::RechargeOutOfRange)
        );
    }

    #[test]
    fn quick_pick_stays_in_range_and_is_deterministic() {
        let rules = GameRules {
            range_min: 10,
            range_max: 15,
            number_count: 20,
            allow_duplicates: true,
            ..small_rules()
        };
        let seed = [7u8; 32];
        let a = quick_pick(&rules, &seed);
        let b = quick_pick(&rules, &seed);
        assert_eq!(a, b);
        assert_eq!(a.len(), 20);
        assert!(a.iter().all(|n| (10..=15).contains(n)));
        assert_ne!(a, quick_pick(&rules, &[8u8; 32]));
    }

    #[test]
    fn quick_pick_single_value_range() {
        let rules = GameRules {
            range_min: 42,
            range_max: 42,
            number_count: 3,
            allow_duplicates: true,
            ..small_rules()
        };
        assert_eq!(quick_pick(&rules, &[0u8; 32]), vec![42, 42, 42]);
    }

    #[test]
    fn history_pages_run_newest_first() {
        assert_eq!(history_window(25, 10, 1).unwrap(), (15..25).rev().collect::<Vec<_>>());
        assert_eq!(history_window(25, 10, 3).unwrap(), vec![4, 3, 2, 1, 0]);
        assert!(history_window(25, 10, 4).unwrap().is_empty());
        assert!(history_window(0, 5, 1).unwrap().is_empty());

        assert_eq!(code_of(history_window(25, 0, 1)), code(LotteryError::InvalidPageSize));
        assert_eq!(
            code_of(history_window(25, MAX_HISTORY_PAGE + 1, 1)),
            code(LotteryError::InvalidPageSize)
        );
        assert_eq!(code_of(history_window(25, 10, 0)), code(LotteryError::InvalidPage));
    }

    fn purchase(
        draw: &mut Draw,
        wallet: &mut Wallet,
        ticket: &mut Ticket,
        entry: &mut LedgerEntry,
        numbers: Vec<u8>,
        now: i64,
    ) -> Result<u64> {
        purchase_core(
            draw,
            wallet,
            Pubkey::new_unique(),
            ticket,
            Pubkey::new_unique(),
            253,
            entry,
            252,
            9,
            numbers,
            now,
        )
    }

    #[test]
    fn successful_purchase_debits_exactly_the_price() {
        let mut draw = open_draw();
        let mut wallet = wallet(2_500);
        let mut ticket = ticket(vec![]);
        let mut entry = blank_entry();

        let charged = purchase(&mut draw, &mut wallet, &mut ticket, &mut entry, vec![3, 1, 4, 15], NOW).unwrap();

        assert_eq!(charged, 1_000);
        assert_eq!(wallet.balance, 1_500);
        assert_eq!(wallet.entry_count, 1);
        assert_eq!(ticket.status, TicketStatus::Paid);
        assert_eq!(ticket.total, 1_000);
        assert_eq!(ticket.numbers, vec![3, 1, 4, 15]);
        assert_eq!(ticket.numbers.len(), draw.rules.number_count as usize);
        assert_eq!(ticket.user, wallet.user);
        assert_eq!(ticket.nonce, 9);
        assert_eq!(entry.kind, TransactionKind::Payment);
        assert_eq!(entry.amount, 1_000);
        assert_eq!(entry.status, EntryStatus::Completed);
        assert_eq!(draw.live_tickets, 1);
        assert_eq!(draw.pot, 1_000);
    }

    #[test]
    fn failed_purchases_change_nothing() {
        let cases: Vec<(Draw, u64, Vec<u8>, LotteryError)> = vec![
            (open_draw(), 500, vec![1, 2, 3, 4], LotteryError::InsufficientFunds),
            (open_draw(), 5_000, vec![1, 1, 2, 3], LotteryError::DuplicateNumber),
            (open_draw(), 5_000, vec![1, 2, 3], LotteryError::SelectionLength),
            (
                {
                    let mut d = open_draw();
                    d.close_sales(NOW).unwrap();
                    d
                },
                5_000,
                vec![1, 2, 3, 4],
                LotteryError::DrawNotOpen,
            ),
        ];

        for (mut draw, balance, numbers, expected) in cases {
            let mut wallet = wallet(balance);
            let mut ticket = ticket(vec![]);
            let mut entry = blank_entry();
            let res = purchase(&mut draw, &mut wallet, &mut ticket, &mut entry, numbers, NOW);

            assert_eq!(code_of(res), code(expected));
            assert_eq!(wallet.balance, balance);
            assert_eq!(wallet.entry_count, 0);
            assert!(ticket.numbers.is_empty());
            assert_eq!(ticket.status, TicketStatus::Pending);
            assert_eq!(draw.live_tickets, 0);
            assert_eq!(draw.pot, 0);
        }
    }

    #[test]
    fn purchase_after_deadline_is_a_state_conflict_regardless_of_balance() {
        let mut draw = open_draw();
        let mut wallet = wallet(1_000_000);
        let mut ticket = ticket(vec![]);
        let mut entry = blank_entry();
        let res = purchase(&mut draw, &mut wallet, &mut ticket, &mut entry, vec![1, 2, 3, 4], NOW + HOUR);
        assert_eq!(code_of(res), code(LotteryError::DrawNotOpen));
        assert_eq!(wallet.balance, 1_000_000);
    }

    #[test]
    fn racing_purchases_on_one_tickets_worth_of_balance() {
        // The runtime write lock on the wallet account, modeled as a mutex.
        let wallet = Arc::new(Mutex::new(wallet(1_000)));
        let draw = Arc::new(Mutex::new(open_draw()));

        let handles: Vec<_> = (0..2u8)
            .map(|i| {
                let wallet = Arc::clone(&wallet);
                let draw = Arc::clone(&draw);
                thread::spawn(move || {
                    let mut w = wallet.lock().unwrap();
                    let mut d = draw.lock().unwrap();
                    let mut t = ticket(vec![]);
                    let mut e = blank_entry();
                    purchase(&mut d, &mut w, &mut t, &mut e, vec![i, 10, 20, 30], NOW)
                        .map_err(|err| code_of::<()>(Err(err)))
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let ok = results.iter().filter(|r| r.is_ok()).count();
        let funds = results
            .iter()
            .filter(|r| **r == Err(code(LotteryError::InsufficientFunds)))
            .count();

        assert_eq!(ok, 1);
        assert_eq!(funds, 1);
        assert_eq!(wallet.lock().unwrap().balance, 0);
        assert_eq!(draw.lock().unwrap().live_tickets, 1);
    }

    #[test]
    fn void_refund_restores_the_balance() {
        let mut draw = open_draw();
        let mut wallet = wallet(1_000);
        let mut ticket = ticket(vec![]);
        let mut entry = blank_entry();
        purchase(&mut draw, &mut wallet, &mut ticket, &mut entry, vec![1, 2, 3, 4], NOW).unwrap();
        draw.void(NOW + 1).unwrap();

        let mut credit = blank_entry();
        let refunded = refund_core(
            &mut draw,
            &mut ticket,
            Pubkey::new_unique(),
            &mut wallet,
            Pubkey::new_unique(),
            &mut credit,
            1,
            NOW + 2,
        )
        .unwrap();

        assert_eq!(refunded, 1_000);
        assert_eq!(wallet.balance, 1_000);
        assert_eq!(credit.kind, TransactionKind::Credit);
        assert_eq!(credit.seq, 1);
        assert_eq!(ticket.status, TicketStatus::Cancelled);
        assert_eq!(ticket.total, 1_000);
        assert_eq!(draw.pot, 0);

        let mut again = blank_entry();
        let res = refund_core(
            &mut draw,
            &mut ticket,
            Pubkey::new_unique(),
            &mut wallet,
            Pubkey::new_unique(),
            &mut again,
            1,
            NOW + 3,
        );
        assert_eq!(code_of(res), code(LotteryError::TicketNotRefundable));
        assert_eq!(wallet.balance, 1_000);
    }

    #[test]
    fn refund_rejects_someone_elses_wallet() {
        let mut draw = open_draw();
        let mut wallet_a = wallet(1_000);
        let mut ticket = ticket(vec![]);
        let mut entry = blank_entry();
        purchase(&mut draw, &mut wallet_a, &mut ticket, &mut entry, vec![1, 2, 3, 4], NOW).unwrap();
        draw.void(NOW).unwrap();

        let mut wallet_b = wallet(0);
        let mut credit = blank_entry();
        let res = refund_core(
            &mut draw,
            &mut ticket,
            Pubkey::new_unique(),
            &mut wallet_b,
            Pubkey::new_unique(),
            &mut credit,
            1,
            NOW,
        );
        assert_eq!(code_of(res), code(LotteryError::WalletMismatch));
        assert_eq!(wallet_b.balance, 0);
    }

    #[test]
    fn settlement_evaluates_and_pays_winners() {
        let mut draw = open_draw();
        let mut alice = wallet(1_000);
        let mut bob = wallet(1_000);
        let mut t_alice = ticket(vec![]);
        let mut t_bob = ticket(vec![]);
        purchase(&mut draw, &mut alice, &mut t_alice, &mut blank_entry(), vec![4, 3, 2, 1], NOW).unwrap();
        purchase(&mut draw, &mut bob, &mut t_bob, &mut blank_entry(), vec![5, 6, 7, 8], NOW).unwrap();

        draw.settle(vec![1, 2, 3, 4], NOW + HOUR).unwrap();
        assert_eq!(draw.status, DrawStatus::Drawn);

        let mut claim_entry = blank_entry();
        let early = claim_core(
            &mut draw,
            &mut t_alice,
            Pubkey::new_unique(),
            &mut alice,
            Pubkey::new_unique(),
            &mut claim_entry,
            1,
            NOW + HOUR,
        );
        assert_eq!(code_of(early), code(LotteryError::NotWinner));

        assert!(evaluate_core(&mut draw, &mut t_alice, NOW + HOUR).unwrap());
        assert_eq!(
            code_of(evaluate_core(&mut draw, &mut t_alice, NOW + HOUR)),
            code(LotteryError::TicketAlreadyEvaluated)
        );
        assert_eq!(t_alice.status, TicketStatus::Winner);
        assert!(!draw.payout_ready);

        assert!(!evaluate_core(&mut draw, &mut t_bob, NOW + HOUR).unwrap());
        assert_eq!(t_bob.status, TicketStatus::Paid);
        assert!(t_bob.evaluated);
        assert!(draw.payout_ready);
        assert_eq!(draw.prize_per_winner, 2_000);

        let paid = claim_core(
            &mut draw,
            &mut t_alice,
            Pubkey::new_unique(),
            &mut alice,
            Pubkey::new_unique(),
            &mut claim_entry,
            1,
            NOW + HOUR,
        )
        .unwrap();
        assert_eq!(paid, 2_000);
        assert_eq!(alice.balance, 2_000);
        assert_eq!(draw.pot, 0);
        assert!(t_alice.prize_claimed);

        let twice = claim_core(
            &mut draw,
            &mut t_alice,
            Pubkey::new_unique(),
            &mut alice,
            Pubkey::new_unique(),
            &mut blank_entry(),
            1,
            NOW + HOUR,
        );
        assert_eq!(code_of(twice), code(LotteryError::AlreadyClaimed));
    }

    #[test]
    fn replay_reconciles_the_ledger() {
        let key = Pubkey::new_unique();
        let mut w = wallet(0);
        let mut entries = Vec::new();
        for (kind, amount) in [
            (TransactionKind::Recharge, 5_000),
            (TransactionKind::Payment, 1_000),
            (TransactionKind::Credit, 300),
        ] {
            let mut e = blank_entry();
            w.append(key, &mut e, 1, kind, amount, Pubkey::default(), NOW).unwrap();
            entries.push(e);
        }
        assert_eq!(replay_ledger(&key, &entries).unwrap(), 4_300);
        assert_eq!(w.balance, 4_300);

        let mut tampered = entries.clone();
        tampered[1].amount = 900;
        assert_eq!(code_of(replay_ledger(&key, &tampered)), code(LotteryError::LedgerMismatch));

        let mut gap = entries.clone();
        gap.remove(1);
        assert_eq!(code_of(replay_ledger(&key, &gap)), code(LotteryError::LedgerEntryMismatch));

        assert_eq!(
            code_of(replay_ledger(&Pubkey::new_unique(), &entries)),
            code(LotteryError::LedgerEntryMismatch)
        );
    }

    #[test]
    fn closed_account_is_emptied_and_returned_to_system() {
        // Runtime input layout: original data length sits 4 bytes before the key,
        // current data length 8 bytes before the data.
        #[repr(C, align(8))]
        struct KeySlot {
            original_len: u32,
            key: Pubkey,
        }
        let slot = KeySlot { original_len: 16, key: Pubkey::new_unique() };
        let mut raw = [16u64, 0, 0];
        let data = unsafe { std::slice::from_raw_parts_mut((raw.as_mut_ptr() as *mut u8).add(8), 16) };
        let owner = std::cell::UnsafeCell::new(crate::ID);
        let mut lamports = 2_000_000u64;

        let dest_key = Pubkey::new_unique();
        let dest_owner = Pubkey::default();
        let mut dest_lamports = 500u64;
        let mut dest_data: [u8; 0] = [];

        {
            let ai = AccountInfo::new(
                &slot.key,
                false,
                true,
                &mut lamports,
                data,
                unsafe { &*owner.get() },
                false,
                0,
            );
            let dest = AccountInfo::new(
                &dest_key,
                false,
                true,
                &mut dest_lamports,
                &mut dest_data,
                &dest_owner,
                false,
                0,
            );
            close_program_account(&ai, &dest).unwrap();
            assert!(ai.data_is_empty());
        }

        assert_eq!(lamports, 0);
        assert_eq!(dest_lamports, 2_000_500);
        assert_eq!(raw[0], 0);
        assert_eq!(unsafe { *owner.get() }, anchor_lang::solana_program::system_program::ID);
        assert_eq!(slot.original_len, 16);
    }
}
