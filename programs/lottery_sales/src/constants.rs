// Centralized Program Constants

// Currency
// ========

/// Decimals of the currency mint. Every amount in the program is a count of
/// minor units (cents), so 1.00 == 100.
pub const CURRENCY_DECIMALS: u8 = 2;

// Game catalog bounds
// ===================

pub const MIN_NAME_CHARS: usize = 3;
pub const MAX_NAME_CHARS: usize = 100;
pub const MAX_DESCRIPTION_CHARS: usize = 255;
pub const MAX_RULES_SUMMARY_CHARS: usize = 255;

/// Ticket price bounds, inclusive (1.00 ..= 1000.00).
pub const MIN_TICKET_PRICE: u64 = 100;
pub const MAX_TICKET_PRICE: u64 = 100_000;

/// Largest selectable number. The smallest is 0.
pub const MAX_SELECTABLE: u8 = 100;

/// How many numbers a ticket selects, inclusive.
pub const MIN_NUMBER_COUNT: u8 = 1;
pub const MAX_NUMBER_COUNT: u8 = 20;

// Wallet
// ======

/// Recharge bounds, inclusive (10.00 ..= 10000.00).
pub const MIN_RECHARGE: u64 = 1_000;
pub const MAX_RECHARGE: u64 = 1_000_000;

// Batches & views
// ===============

/// Max tickets processed by one crank call (evaluation, cascade delete).
pub const MAX_BATCH: usize = 16;

/// Max ledger entries per history page.
/// Bounded by the 1024-byte return data limit (~66 bytes per entry view).
pub const MAX_HISTORY_PAGE: u16 = 10;

/// Max records returned by a single list view.
pub const MAX_LIST_ITEMS: usize = 6;

/// Game views carry the name (up to 400 bytes of UTF-8), so fewer fit.
pub const MAX_GAME_LIST_ITEMS: usize = 2;

/// Initial version for account structures.
pub const INITIAL_VERSION: u16 = 1;

/// First id handed out by the config counters.
pub const INITIAL_GAME_ID: u64 = 0;
pub const INITIAL_DRAW_ID: u64 = 0;
