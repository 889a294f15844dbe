//! Subscription registry (§4.2): tracks pending/confirmed channel
//! subscriptions keyed by venue-assigned channel id.

use arbit_markets::Symbol;

/// A subscription request as sent to the venue, before a channel id is
/// assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionRequest {
    pub channel: String,
    pub symbol: Option<Symbol>,
}

impl SubscriptionRequest {
    pub fn book(symbol: Symbol) -> Self {
        SubscriptionRequest {
            channel: "book".to_string(),
            symbol: Some(symbol),
        }
    }
}

#[derive(Debug)]
struct Entry<H> {
    request: SubscriptionRequest,
    chan_id: Option<u32>,
    handler: H,
}

/// Tracks `{request, confirmed, chan_id, handler}` per pending/live
/// subscription. `H` is whatever the caller wants dispatched data routed
/// to (e.g. a book-store handle).
#[derive(Debug, Default)]
pub struct SubscriptionRegistry<H> {
    entries: Vec<Entry<H>>,
}

impl<H> SubscriptionRegistry<H> {
    pub fn new() -> Self {
        SubscriptionRegistry {
            entries: Vec::new(),
        }
    }

    /// Appends an unconfirmed subscription.
    pub fn add(&mut self, request: SubscriptionRequest, handler: H) {
        self.entries.push(Entry {
            request,
            chan_id: None,
            handler,
        });
    }

    /// Matches exactly one unconfirmed request by `(channel, symbol)` and
    /// binds its channel id. Fails silently (per §4.2) if none matches.
    pub fn confirm(&mut self, channel: &str, symbol: Option<&Symbol>, chan_id: u32) {
        if let Some(entry) = self.entries.iter_mut().find(|e| {
            e.chan_id.is_none()
                && e.request.channel == channel
                && e.request.symbol.as_ref() == symbol
        }) {
            entry.chan_id = Some(chan_id);
        }
    }

    /// Drops the subscription with the given channel id, confirmed or not.
    pub fn remove(&mut self, chan_id: u32) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.chan_id != Some(chan_id));
        self.entries.len() != before
    }

    /// Drops every tracked subscription. Used on reconnect.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Channel ids of every confirmed subscription, for a bulk unsubscribe
    /// on shutdown (§5 Lifecycle).
    pub fn confirmed_chan_ids(&self) -> Vec<u32> {
        self.entries.iter().filter_map(|e| e.chan_id).collect()
    }

    /// True iff every symbol in `required` has a confirmed `"book"`
    /// subscription, and no extras are required beyond that set.
    pub fn all_books_ready(&self, required: &[Symbol]) -> bool {
        let confirmed_books: std::collections::HashSet<&Symbol> = self
            .entries
            .iter()
            .filter(|e| e.request.channel == "book" && e.chan_id.is_some())
            .filter_map(|e| e.request.symbol.as_ref())
            .collect();
        required.len() == confirmed_books.len()
            && required.iter().all(|s| confirmed_books.contains(s))
    }

    /// Routes a data-frame payload to the handler confirmed for `chan_id`,
    /// or `None` if no live subscription claims it (the caller drops it).
    pub fn dispatch(&self, chan_id: u32) -> Option<&H> {
        self.entries
            .iter()
            .find(|e| e.chan_id == Some(chan_id))
            .map(|e| &e.handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_matches_exactly_one_pending_request() {
        let mut reg = SubscriptionRegistry::new();
        let symbol = Symbol::new("BTC", "USD");
        reg.add(SubscriptionRequest::book(symbol.clone()), ());
        reg.confirm("book", Some(&symbol), 7);
        assert_eq!(reg.dispatch(7), Some(&()));
    }

    #[test]
    fn confirm_with_no_match_fails_silently() {
        let mut reg: SubscriptionRegistry<()> = SubscriptionRegistry::new();
        reg.confirm("book", Some(&Symbol::new("BTC", "USD")), 7);
        assert_eq!(reg.dispatch(7), None);
    }

    #[test]
    fn all_books_ready_requires_exact_set_match() {
        let mut reg = SubscriptionRegistry::new();
        let btc = Symbol::new("BTC", "USD");
        let eth = Symbol::new("ETH", "USD");
        reg.add(SubscriptionRequest::book(btc.clone()), ());
        reg.confirm("book", Some(&btc), 1);

        assert!(!reg.all_books_ready(&[btc.clone(), eth.clone()]));

        reg.add(SubscriptionRequest::book(eth.clone()), ());
        reg.confirm("book", Some(&eth), 2);
        assert!(reg.all_books_ready(&[btc, eth]));
    }

    #[test]
    fn confirmed_chan_ids_lists_only_confirmed_entries() {
        let mut reg = SubscriptionRegistry::new();
        let btc = Symbol::new("BTC", "USD");
        let eth = Symbol::new("ETH", "USD");
        reg.add(SubscriptionRequest::book(btc.clone()), ());
        reg.add(SubscriptionRequest::book(eth), ());
        reg.confirm("book", Some(&btc), 7);
        assert_eq!(reg.confirmed_chan_ids(), vec![7]);
    }

    #[test]
    fn remove_drops_by_channel_id() {
        let mut reg = SubscriptionRegistry::new();
        let symbol = Symbol::new("BTC", "USD");
        reg.add(SubscriptionRequest::book(symbol.clone()), ());
        reg.confirm("book", Some(&symbol), 7);
        assert!(reg.remove(7));
        assert_eq!(reg.dispatch(7), None);
    }
}
