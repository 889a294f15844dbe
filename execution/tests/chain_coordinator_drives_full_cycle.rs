//! Drives a two-hop chain through the coordinator's public surface only
//! (request ack, order ack, order close, fill poll), the way the trading
//! loop's maintenance tick and session event dispatch use it together.

use std::sync::Arc;

use arbit_core::{
    ClientId, ClientIdDate, NotificationStatus, NullNotifier, Order, OrderStatus,
};
use arbit_data::TradeStore;
use arbit_execution::{ChainCoordinator, STEP_TIMEOUT};
use arbit_integration::OutboundFrame;
use arbit_markets::{Amount, Price, Side, Symbol};
use rust_decimal_macros::dec;

fn solution(hops: &[(&str, Side)]) -> arbit_core::Solution {
    let instructions = hops
        .iter()
        .map(|(symbol, side)| arbit_core::Instruction::Transition {
            symbol: Symbol::parse(symbol).unwrap(),
            side: *side,
            action_price: Price::new(dec!(100)).unwrap(),
            action_amount: Amount::new(dec!(1)),
        })
        .chain(std::iter::once(arbit_core::Instruction::End))
        .collect();
    arbit_core::Solution {
        instructions,
        estimated_profit_base: Amount::new(dec!(0.01)),
        estimated_profit_usd: Amount::new(dec!(1)),
    }
}

fn next_client_id(rx: &mut tokio::sync::mpsc::UnboundedReceiver<OutboundFrame>) -> ClientId {
    match rx.try_recv().expect("expected a NewOrder frame") {
        OutboundFrame::NewOrder(req) => ClientId::from_raw(req.cid).unwrap(),
        other => panic!("expected NewOrder, got {other:?}"),
    }
}

fn order_for(client_id: ClientId, status: OrderStatus) -> Order {
    Order {
        id: Some(1),
        client_id,
        client_id_date: ClientIdDate::today(),
        gid: None,
        symbol: Symbol::parse("BTC/USD").unwrap(),
        kind: "EXCHANGE LIMIT".into(),
        amount_signed: Amount::new(dec!(1)),
        price: Price::new(dec!(100)).unwrap(),
        status,
    }
}

#[test]
fn two_hop_chain_reaches_done_through_the_public_api() {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let mut coord = ChainCoordinator::new(tx, Arc::new(NullNotifier));

    coord.enqueue(solution(&[("BTC/USD", Side::Buy), ("ETH/USD", Side::Sell)]));
    assert!(coord.is_active());

    let cid0 = next_client_id(&mut rx);
    coord.handle_notification(
        cid0,
        &arbit_core::Notification {
            action: "on-req".into(),
            info: String::new(),
            status: NotificationStatus::Success,
            text: String::new(),
        },
    );
    coord.handle_order_ack(&order_for(cid0, OrderStatus::Active));
    coord.handle_order_close(&order_for(cid0, OrderStatus::Executed));

    // Completing step 0 submits step 1 immediately.
    let cid1 = next_client_id(&mut rx);
    coord.handle_order_ack(&order_for(cid1, OrderStatus::Executed));

    assert!(!coord.is_active());
}

#[test]
fn a_cumulative_trade_fill_completes_the_step_without_an_order_close() {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let mut coord = ChainCoordinator::new(tx, Arc::new(NullNotifier));
    let mut trades = TradeStore::new();

    coord.enqueue(solution(&[("BTC/USD", Side::Buy)]));
    let cid0 = next_client_id(&mut rx);
    coord.handle_order_ack(&order_for(cid0, OrderStatus::Active));

    trades.record_fill(cid0, Amount::new(dec!(1)));
    coord.poll_fills(&trades);

    assert!(!coord.is_active());
}

#[test]
fn a_stalled_step_past_its_deadline_gets_canceled_on_timeout_check() {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let mut coord = ChainCoordinator::new(tx, Arc::new(NullNotifier));

    coord.enqueue(solution(&[("BTC/USD", Side::Buy)]));
    let _ = next_client_id(&mut rx);

    coord.check_timeouts(std::time::Instant::now() + STEP_TIMEOUT + std::time::Duration::from_secs(1));

    assert!(!coord.is_active());
    assert!(matches!(
        rx.try_recv(),
        Ok(OutboundFrame::CancelByClientId { .. }) | Ok(OutboundFrame::CancelById { .. })
    ));
}
