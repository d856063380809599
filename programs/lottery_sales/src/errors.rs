use anchor_lang::prelude::*;

#[error_code]
pub enum LotteryError {
    #[msg("Unauthorized")]
    Unauthorized,
    #[msg("Program paused")]
    Paused,
    #[msg("Currency mint must have 2 decimals")]
    InvalidCurrencyMint,

    // -----------------
    // Game definition
    // -----------------
    #[msg("Name must be 3-100 characters")]
    InvalidNameLength,
    #[msg("Description exceeds 255 characters")]
    DescriptionTooLong,
    #[msg("Rules summary exceeds 255 characters")]
    RulesSummaryTooLong,
    #[msg("Price must be between 1.00 and 1000.00")]
    PriceOutOfRange,
    #[msg("Range bounds must be between 0 and 100")]
    RangeOutOfBounds,
    #[msg("Range minimum exceeds maximum")]
    RangeInverted,
    #[msg("Number count must be between 1 and 20")]
    NumberCountOutOfRange,
    #[msg("Range too narrow for distinct numbers")]
    RangeTooNarrow,

    // -----------------
    // Number selection
    // -----------------
    #[msg("Selection length does not match the game's number count")]
    SelectionLength,
    #[msg("Selected number outside the game's range")]
    SelectionOutOfRange,
    #[msg("Duplicate numbers are not allowed for this game")]
    DuplicateNumber,

    // -----------------
    // Draw lifecycle
    // -----------------
    #[msg("Closing time must be in the future")]
    ClosesAtNotFuture,
    #[msg("Draw is not open for sales")]
    DrawNotOpen,
    #[msg("Sales window has not closed yet")]
    SalesStillOpen,
    #[msg("Draw is already drawn or void")]
    DrawTerminal,
    #[msg("Draw has not been drawn")]
    DrawNotDrawn,
    #[msg("Draw is not void")]
    DrawNotVoid,
    #[msg("Deleting requires acknowledging it is irreversible")]
    IrreversibleNotAcknowledged,
    #[msg("Cascade left dependent records behind")]
    CascadeIncomplete,

    // -----------------
    // Tickets
    // -----------------
    #[msg("Ticket is already a winner or cancelled")]
    TicketTerminal,
    #[msg("Illegal ticket state transition")]
    IllegalTicketTransition,
    #[msg("Ticket cannot be deleted in its current state")]
    TicketNotDeletable,
    #[msg("Ticket already evaluated")]
    TicketAlreadyEvaluated,
    #[msg("Ticket does not match the winning numbers")]
    NotWinner,
    #[msg("Prize already claimed")]
    AlreadyClaimed,
    #[msg("Payout not ready (tickets pending evaluation)")]
    PayoutNotReady,
    #[msg("Ticket is not refundable")]
    TicketNotRefundable,

    // -----------------
    // Wallet
    // -----------------
    #[msg("Recharge must be between 10.00 and 10000.00")]
    RechargeOutOfRange,
    #[msg("Insufficient wallet balance")]
    InsufficientFunds,
    #[msg("Invalid page size")]
    InvalidPageSize,
    #[msg("Page numbers start at 1")]
    InvalidPage,

    // -----------------
    // References
    // -----------------
    #[msg("Game does not match")]
    GameMismatch,
    #[msg("Draw does not match")]
    DrawMismatch,
    #[msg("Ticket does not match")]
    TicketMismatch,
    #[msg("Wallet does not match")]
    WalletMismatch,

    // -----------------
    // Integrity
    // -----------------
    #[msg("Ledger entries do not reconcile with the wallet")]
    LedgerMismatch,
    #[msg("Ledger entry account mismatch")]
    LedgerEntryMismatch,
    #[msg("Account PDA mismatch")]
    PdaMismatch,
    #[msg("Account not owned by program")]
    AccountNotOwnedByProgram,
    #[msg("Failed to borrow account data")]
    AccountBorrowFailed,
    #[msg("Too many entries")]
    TooManyEntries,
    #[msg("Math overflow")]
    MathOverflow,
}

/// Caller-facing category of a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    /// Malformed input; the caller fixes it and retries.
    Validation,
    /// The target is in a state that forbids the operation. Never retried.
    StateConflict,
    /// Route the user to a top-up.
    InsufficientFunds,
    NotFound,
    Unauthorized,
    /// Inconsistent accounts or arithmetic; indicates a bug or a forged account list.
    Integrity,
}

impl LotteryError {
    pub fn class(&self) -> ErrorClass {
        use LotteryError::*;
        match self {
            Unauthorized => ErrorClass::Unauthorized,

            InvalidNameLength
            | DescriptionTooLong
            | RulesSummaryTooLong
            | PriceOutOfRange
            | RangeOutOfBounds
            | RangeInverted
            | NumberCountOutOfRange
            | RangeTooNarrow
            | SelectionLength
            | SelectionOutOfRange
            | DuplicateNumber
            | ClosesAtNotFuture
            | RechargeOutOfRange
            | InvalidPageSize
            | InvalidPage
            | IrreversibleNotAcknowledged
            | InvalidCurrencyMint
            | TooManyEntries => ErrorClass::Validation,

            Paused
            | DrawNotOpen
            | SalesStillOpen
            | DrawTerminal
            | DrawNotDrawn
            | DrawNotVoid
            | CascadeIncomplete
            | TicketTerminal
            | IllegalTicketTransition
            | TicketNotDeletable
            | TicketAlreadyEvaluated
            | NotWinner
            | AlreadyClaimed
            | PayoutNotReady
            | TicketNotRefundable => ErrorClass::StateConflict,

            InsufficientFunds => ErrorClass::InsufficientFunds,

            GameMismatch | DrawMismatch | TicketMismatch | WalletMismatch => ErrorClass::NotFound,

            LedgerMismatch
            | LedgerEntryMismatch
            | PdaMismatch
            | AccountNotOwnedByProgram
            | AccountBorrowFailed
            | MathOverflow => ErrorClass::Integrity,
        }
    }

    /// Input field a validation error refers to.
    pub fn field(&self) -> Option<&'static str> {
        use LotteryError::*;
        match self {
            InvalidNameLength => Some("name"),
            DescriptionTooLong => Some("description"),
            RulesSummaryTooLong => Some("rules_summary"),
            PriceOutOfRange => Some("price"),
            RangeOutOfBounds | RangeInverted | RangeTooNarrow => Some("range"),
            NumberCountOutOfRange => Some("number_count"),
            SelectionLength | SelectionOutOfRange | DuplicateNumber => Some("numbers"),
            ClosesAtNotFuture => Some("closes_at"),
            RechargeOutOfRange => Some("amount"),
            InvalidPageSize => Some("limit"),
            InvalidPage => Some("page"),
            IrreversibleNotAcknowledged => Some("acknowledge_irreversible"),
            InvalidCurrencyMint => Some("currency_mint"),
            _ => None,
        }
    }
}
