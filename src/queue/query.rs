//! Snapshot reads: get, list_by_status, today, summary.
//!
//! All reads are point-in-time under the partition read lock; callers poll.

use crate::protocol::{QueueDate, QueueError, QueueSummary, TodayQueue, Token, TokenStatus};

use super::engine::QueueEngine;

impl QueueEngine {
    /// Fetch one token record.
    pub fn get(&self, date: QueueDate, number: u64) -> Result<Token, QueueError> {
        let part = self
            .partition_if_exists(date)
            .ok_or(QueueError::TokenNotFound(number))?;
        let state = part.state.read();
        state
            .records
            .get(&number)
            .cloned()
            .ok_or(QueueError::TokenNotFound(number))
    }

    /// All tokens with a given status, as a finite restartable listing.
    ///
    /// Waiting tokens come back in dispatch order; every other status in
    /// arrival order.
    pub fn list_by_status(&self, date: QueueDate, status: TokenStatus) -> Vec<Token> {
        let Some(part) = self.partition_if_exists(date) else {
            return Vec::new();
        };
        let state = part.state.read();

        if status == TokenStatus::Waiting {
            return state
                .waiting
                .iter_ordered()
                .into_iter()
                .filter_map(|n| state.records.get(&n).cloned())
                .collect();
        }

        let mut tokens: Vec<Token> = state
            .records
            .values()
            .filter(|t| t.status == status)
            .cloned()
            .collect();
        tokens.sort_unstable_by_key(|t| t.sequence);
        tokens
    }

    /// Point-in-time snapshot of the whole day, grouped by status.
    pub fn today(&self, date: QueueDate) -> TodayQueue {
        let Some(part) = self.partition_if_exists(date) else {
            return TodayQueue::default();
        };
        let state = part.state.read();

        let mut snapshot = TodayQueue::default();
        for token in state.records.values() {
            match token.status {
                TokenStatus::Waiting => snapshot.waiting.push(token.clone()),
                TokenStatus::WithDoctor => snapshot.with_doctor.push(token.clone()),
                TokenStatus::Completed => snapshot.completed.push(token.clone()),
                TokenStatus::Skipped => snapshot.skipped.push(token.clone()),
            }
        }
        snapshot.waiting.sort_unstable_by_key(Token::sort_key);
        snapshot.with_doctor.sort_unstable_by_key(|t| t.sequence);
        snapshot.completed.sort_unstable_by_key(|t| t.sequence);
        snapshot.skipped.sort_unstable_by_key(|t| t.sequence);
        snapshot
    }

    /// Derived aggregate for the end-of-day summary job.
    pub fn summary(&self, date: QueueDate) -> QueueSummary {
        let Some(part) = self.partition_if_exists(date) else {
            return QueueSummary {
                date,
                total_issued: 0,
                waiting: 0,
                with_doctor: 0,
                total_completed: 0,
                total_skipped: 0,
                average_wait_ms: None,
                current_token: None,
            };
        };
        let state = part.state.read();

        let mut waiting = 0u64;
        let mut with_doctor = 0u64;
        let mut completed = 0u64;
        let mut skipped = 0u64;
        let mut wait_sum = 0u64;
        let mut wait_count = 0u64;

        for token in state.records.values() {
            match token.status {
                TokenStatus::Waiting => waiting += 1,
                TokenStatus::WithDoctor => with_doctor += 1,
                TokenStatus::Completed => {
                    completed += 1;
                    if let Some(wait) = token.wait_ms() {
                        wait_sum += wait;
                        wait_count += 1;
                    }
                }
                TokenStatus::Skipped => skipped += 1,
            }
        }

        QueueSummary {
            date,
            total_issued: state.records.len() as u64,
            waiting,
            with_doctor,
            total_completed: completed,
            total_skipped: skipped,
            average_wait_ms: (wait_count > 0).then(|| wait_sum / wait_count),
            current_token: state.current_serving,
        }
    }
}
