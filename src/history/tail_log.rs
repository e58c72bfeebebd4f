use std::collections::VecDeque;

use crate::config::LogRetention;

/// Append-only log read through bounded tail views.
///
/// Under [`LogRetention::Capped`] storage is trimmed to `tail_len`; `total`
/// counts every entry ever appended either way.
#[derive(Debug, Clone)]
pub struct TailLog<T> {
    entries: VecDeque<T>,
    limit: Option<usize>,
    total: u64,
}

impl<T: Clone> TailLog<T> {
    pub fn new(retention: LogRetention, tail_len: usize) -> Self {
        let limit = match retention {
            LogRetention::Capped => Some(tail_len.max(1)),
            LogRetention::Unbounded => None,
        };

        Self {
            entries: VecDeque::with_capacity(limit.unwrap_or_default()),
            limit,
            total: 0,
        }
    }

    pub fn extend<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        for item in items {
            if let Some(limit) = self.limit
                && self.entries.len() == limit
            {
                self.entries.pop_front();
            }
            self.entries.push_back(item);
            self.total = self.total.saturating_add(1);
        }
    }

    /// Last `n` entries, oldest first.
    pub fn tail(&self, n: usize) -> Vec<T> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip).cloned().collect()
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn stored(&self) -> usize {
        self.entries.len()
    }
}
