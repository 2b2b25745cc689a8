use std::collections::VecDeque;

use crate::models::FraudAlert;

/// Number of alerts kept; older ones fall off the end.
pub(crate) const ALERT_CAPACITY: usize = 20;

/// Bounded alert history, newest first.
#[derive(Debug, Clone, Default)]
pub(crate) struct AlertStore {
    alerts: VecDeque<FraudAlert>,
}

impl AlertStore {
    /// Rebuild from a newest-first list, dropping anything past capacity.
    pub(crate) fn from_newest_first(alerts: Vec<FraudAlert>) -> Self {
        let mut alerts: VecDeque<FraudAlert> = alerts.into();
        alerts.truncate(ALERT_CAPACITY);
        Self { alerts }
    }

    pub(crate) fn record(&mut self, alert: FraudAlert) {
        self.alerts.push_front(alert);
        self.alerts.truncate(ALERT_CAPACITY);
    }

    pub(crate) fn alerts(&self) -> Vec<FraudAlert> {
        self.alerts.iter().cloned().collect()
    }

    pub(crate) fn clear(&mut self) {
        self.alerts.clear();
    }
}
