use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Income,
    Expense,
}

/// Fixed set of transaction categories, used for labels and colours only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CategoryTag {
    Products,
    Entertainment,
    Clothing,
    Transport,
    Health,
    Other,
    Salary,
    Freelance,
}

impl CategoryTag {
    pub fn display_name(self) -> &'static str {
        match self {
            CategoryTag::Products => "Groceries",
            CategoryTag::Entertainment => "Entertainment",
            CategoryTag::Clothing => "Clothing",
            CategoryTag::Transport => "Transport",
            CategoryTag::Health => "Health",
            CategoryTag::Other => "Other",
            CategoryTag::Salary => "Salary",
            CategoryTag::Freelance => "Freelance",
        }
    }

    /// RGB hex without the leading '#'.
    pub fn color(self) -> &'static str {
        match self {
            CategoryTag::Products => "2196F3",
            CategoryTag::Entertainment => "E91E63",
            CategoryTag::Clothing => "FFC107",
            CategoryTag::Transport => "4CAF50",
            CategoryTag::Health => "9C27B0",
            CategoryTag::Other => "607D8B",
            CategoryTag::Salary => "4CAF50",
            CategoryTag::Freelance => "00BCD4",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub amount: f64, // Sign is cosmetic, `kind` decides the direction
    pub kind: TransactionKind,
    pub category: CategoryTag,
    pub date_label: String, // "Today", "Yesterday", ...; grouped verbatim
    pub time_label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeFilter {
    #[default]
    All,
    Income,
    Expense,
}

impl TypeFilter {
    pub fn admits(self, kind: TransactionKind) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Income => kind == TransactionKind::Income,
            TypeFilter::Expense => kind == TransactionKind::Expense,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionGroup {
    pub date_label: String,
    pub transactions: Vec<TransactionRecord>,
}

#[derive(Debug, Serialize)]
pub struct CreateTransactionRequest {
    title: String,
    description: String,
    amount: f64,
    kind: TransactionKind,
    category: CategoryTag,
    date_label: String,
    time_label: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawCreateTransactionRequest {
    pub title: String,
    pub description: Option<String>,
    pub amount: f64,
    pub kind: TransactionKind,
    pub category: CategoryTag,
    pub date_label: Option<String>,
    pub time_label: Option<String>,
}

pub const DEFAULT_DATE_LABEL: &str = "Today";

impl CreateTransactionRequest {
    pub fn new(
        title: String,
        description: Option<String>,
        amount: f64,
        kind: TransactionKind,
        category: CategoryTag,
        date_label: Option<String>,
        time_label: Option<String>,
    ) -> Result<Self, String> {
        if title.trim().is_empty() {
            return Err("Transaction title cannot be empty".to_string());
        }

        if !amount.is_finite() || amount == 0.0 {
            return Err("Amount must be a non-zero number".to_string());
        }

        let amount = match kind {
            TransactionKind::Income => amount.abs(),
            TransactionKind::Expense => -amount.abs(),
        };

        let date_label = date_label
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| DEFAULT_DATE_LABEL.to_string());

        let time_label = time_label
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());

        Ok(Self {
            title: title.trim().to_string(),
            description: description.unwrap_or_default().trim().to_string(),
            amount,
            kind,
            category,
            date_label,
            time_label,
        })
    }

    pub fn from_raw(raw: RawCreateTransactionRequest) -> Result<Self, String> {
        Self::new(
            raw.title,
            raw.description,
            raw.amount,
            raw.kind,
            raw.category,
            raw.date_label,
            raw.time_label,
        )
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn category(&self) -> CategoryTag {
        self.category
    }

    pub fn date_label(&self) -> &str {
        &self.date_label
    }

    pub fn time_label(&self) -> Option<&str> {
        self.time_label.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceStats {
    pub balance: f64,
    pub balance_change: f64,
    pub income: f64,
    pub income_change: f64,
    pub expense: f64,
    pub expense_change: f64,
    pub savings: f64,
    pub savings_change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryExpense {
    pub category: CategoryTag,
    pub label: String,
    pub color: String,
    pub amount: f64,
    pub percentage: f64, // Share of total expenses, one decimal
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStats {
    pub month: String,
    pub income: f64,
    pub expense: f64,
}

// Everything the home screen shows at once
#[derive(Debug, Serialize)]
pub struct HomeOverview {
    pub stats: FinanceStats,
    pub category_expenses: Vec<CategoryExpense>,
    pub monthly_stats: Vec<MonthlyStats>,
    pub recent_transactions: Vec<TransactionRecord>,
}
