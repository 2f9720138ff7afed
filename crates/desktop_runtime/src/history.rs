//! Bounded, most-recent-first record of user interactions.

use desktop_app_contract::InteractionData;

/// Interaction history forwarded as generation context.
///
/// Entries are ordered most recent first. After every [`InteractionHistory::record`] the length
/// is at most the configured limit; a limit of zero keeps the history empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InteractionHistory {
    entries: Vec<InteractionData>,
    limit: usize,
}

impl InteractionHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit,
        }
    }

    /// Prepends `interaction` and drops the oldest entries beyond the limit.
    pub fn record(&mut self, interaction: InteractionData) -> &[InteractionData] {
        self.entries.insert(0, interaction);
        self.entries.truncate(self.limit);
        &self.entries
    }

    /// Changes the limit, truncating existing entries from the oldest end.
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
        self.entries.truncate(limit);
    }

    /// Replaces the history with a single seed interaction.
    ///
    /// Used when an app opens: the seed always survives so the first request of the app has
    /// context, whatever the limit. The next [`InteractionHistory::record`] applies the limit
    /// again.
    pub fn reset_to(&mut self, seed: InteractionData) {
        self.entries.clear();
        self.entries.push(seed);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[InteractionData] {
        &self.entries
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
