//! Exercises the book, subscription, and wallet stores together the way
//! a reconnect drives them: confirmed subscriptions and fresh balances
//! get torn down and marked stale, and the next ready-check reflects it.

use arbit_core::{WalletBalance, WalletKey, WalletType};
use arbit_data::{BookStore, RawLevel, SubscriptionRegistry, SubscriptionRequest, WalletStore};
use arbit_markets::{Amount, Price, Symbol};
use rust_decimal_macros::dec;

fn raw(price: rust_decimal::Decimal, count: u32, amount: rust_decimal::Decimal) -> RawLevel {
    RawLevel {
        price: Price::new(price).unwrap(),
        count,
        amount: Amount::new(amount),
    }
}

#[test]
fn reconnect_clears_subscriptions_and_stales_wallets_but_keeps_book_state() {
    let btc_usd = Symbol::new("BTC", "USD");
    let required = vec![btc_usd.clone()];

    let mut books = BookStore::new();
    books.apply_snapshot(&btc_usd, &[raw(dec!(100), 1, dec!(-5)), raw(dec!(99), 1, dec!(5))]);
    assert!(books.is_tracked(&btc_usd));

    let mut subs: SubscriptionRegistry<()> = SubscriptionRegistry::new();
    subs.add(SubscriptionRequest::book(btc_usd.clone()), ());
    subs.confirm("book", Some(&btc_usd), 7);
    assert!(subs.all_books_ready(&required));

    let usd_key = WalletKey::new(WalletType::Exchange, "USD");
    let mut wallets = WalletStore::new();
    wallets.upsert(
        usd_key.clone(),
        WalletBalance {
            balance: Amount::new(dec!(1000)),
            available: Some(Amount::new(dec!(1000))),
        },
    );
    assert!(wallets.available(&usd_key).is_some());

    // The session's reconnect branch does this sequence: drop every
    // subscription, then mark every wallet stale. Book state survives
    // untouched since the venue replays a fresh snapshot once resubscribed.
    subs.clear();
    wallets.mark_all_stale();

    assert!(!subs.all_books_ready(&required));
    assert!(subs.confirmed_chan_ids().is_empty());
    assert!(wallets.available(&usd_key).is_none());
    assert_eq!(wallets.stale_keys(), vec![usd_key]);

    assert!(books.best_bid(&btc_usd).is_some());
    assert_eq!(books.best_bid(&btc_usd).unwrap().0.raw(), dec!(100));
}
