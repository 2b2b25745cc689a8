use super::RiskScore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AlertType {
    Velocity,
    Amount,
    Pattern,
}

impl AlertType {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Velocity => "velocity",
            Self::Amount => "amount",
            Self::Pattern => "pattern",
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "velocity" => Some(Self::Velocity),
            "amount" => Some(Self::Amount),
            "pattern" => Some(Self::Pattern),
            _ => None,
        }
    }
}

impl std::fmt::Display for AlertType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Advisory output of risk analysis. Never edited once created.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FraudAlert {
    pub(crate) id: String,
    /// Weak reference; the transaction may no longer be in history.
    pub(crate) tx_id: String,
    pub(crate) timestamp: i64,
    pub(crate) alert_type: AlertType,
    pub(crate) severity: RiskScore,
    pub(crate) description: String,
}

impl FraudAlert {
    pub(crate) fn new(
        tx_id: String,
        alert_type: AlertType,
        severity: RiskScore,
        description: String,
        timestamp: i64,
    ) -> Self {
        Self {
            id: format!("alert-{}", uuid::Uuid::new_v4().simple()),
            tx_id,
            timestamp,
            alert_type,
            severity,
            description,
        }
    }
}
