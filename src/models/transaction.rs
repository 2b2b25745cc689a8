use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Category {
    Food,
    Travel,
    Utilities,
    Shopping,
    Investments,
    Salary,
    Rent,
    Others,
    Fees,
}

impl Category {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Travel => "Travel",
            Self::Utilities => "Utilities",
            Self::Shopping => "Shopping",
            Self::Investments => "Investments",
            Self::Salary => "Salary",
            Self::Rent => "Rent",
            Self::Others => "Others",
            Self::Fees => "Fees",
        }
    }

    pub(crate) fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "food" => Self::Food,
            "travel" => Self::Travel,
            "utilities" => Self::Utilities,
            "shopping" => Self::Shopping,
            "investments" | "investment" => Self::Investments,
            "salary" => Self::Salary,
            "rent" => Self::Rent,
            "fees" | "fee" => Self::Fees,
            _ => Self::Others,
        }
    }

    pub(crate) fn all() -> &'static [Category] {
        &[
            Self::Food,
            Self::Travel,
            Self::Utilities,
            Self::Shopping,
            Self::Investments,
            Self::Salary,
            Self::Rent,
            Self::Others,
            Self::Fees,
        ]
    }

    /// Categories whose spend never counts against a budget envelope.
    pub(crate) fn is_budget_exempt(&self) -> bool {
        matches!(self, Self::Others | Self::Fees)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

impl TransactionStatus {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "completed" | "complete" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Advisory risk grade. Ordered so the higher of two grades wins with `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum RiskScore {
    Low,
    Medium,
    High,
}

impl RiskScore {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub(crate) fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "high" => Self::High,
            "medium" => Self::Medium,
            _ => Self::Low,
        }
    }
}

impl std::fmt::Display for RiskScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TransactionKind {
    Payment,
    StockBuy,
    StockSell,
    FeeContribution,
}

impl TransactionKind {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Payment => "payment",
            Self::StockBuy => "stock_buy",
            Self::StockSell => "stock_sell",
            Self::FeeContribution => "fee_contribution",
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "payment" => Some(Self::Payment),
            "stock_buy" => Some(Self::StockBuy),
            "stock_sell" => Some(Self::StockSell),
            "fee_contribution" => Some(Self::FeeContribution),
            _ => None,
        }
    }

    /// Recover the kind of an untagged record from its recipient text
    /// ("Sell Order: TCS", "Buy Order: INFY").
    pub(crate) fn infer(recipient: &str) -> Self {
        let lower = recipient.to_lowercase();
        if lower.contains("sell order") {
            Self::StockSell
        } else if lower.contains("buy order") {
            Self::StockBuy
        } else {
            Self::Payment
        }
    }

    /// Liquidations credit the wallet; every other kind debits it.
    pub(crate) fn is_credit(&self) -> bool {
        matches!(self, Self::StockSell)
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Transaction {
    pub(crate) id: String,
    pub(crate) kind: TransactionKind,
    pub(crate) amount: Decimal,
    pub(crate) recipient: String,
    pub(crate) sender: String,
    pub(crate) category: Category,
    /// Epoch milliseconds. Records may be back-dated, so history order is
    /// insertion order, not timestamp order.
    pub(crate) timestamp: i64,
    pub(crate) status: TransactionStatus,
    pub(crate) risk_score: RiskScore,
    pub(crate) round_up_amount: Option<Decimal>,
    pub(crate) flagged_reason: Option<String>,
}

impl Transaction {
    /// A completed, low-risk transaction. The kind is inferred from the
    /// recipient; use [`Transaction::with_kind`] to tag it explicitly.
    pub(crate) fn new(
        id: String,
        amount: Decimal,
        recipient: String,
        sender: String,
        category: Category,
        timestamp: i64,
    ) -> Self {
        Self {
            id,
            kind: TransactionKind::infer(&recipient),
            amount,
            recipient,
            sender,
            category,
            timestamp,
            status: TransactionStatus::Completed,
            risk_score: RiskScore::Low,
            round_up_amount: None,
            flagged_reason: None,
        }
    }

    pub(crate) fn with_kind(mut self, kind: TransactionKind) -> Self {
        self.kind = kind;
        self
    }

    pub(crate) fn with_status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }

    pub(crate) fn is_completed(&self) -> bool {
        self.status == TransactionStatus::Completed
    }

    /// Primary amount plus any round-up sweep taken alongside it.
    pub(crate) fn total_outflow(&self) -> Decimal {
        let sweep = self.round_up_amount.unwrap_or_default();
        if self.kind.is_credit() {
            sweep
        } else {
            self.amount + sweep
        }
    }
}
