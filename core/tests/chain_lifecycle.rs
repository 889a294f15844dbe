//! Drives a two-hop cycle's step states end to end against the wallet
//! staleness gate and the notifier hook, the way the order-chain
//! coordinator and trading loop use these types together in practice.

use std::sync::Mutex;

use arbit_core::{
    EngineNotice, Instruction, Notifier, NotificationStatus, Order, OrderStatus, Solution,
    StepState, WalletBalance, WalletKey, WalletType,
};
use arbit_core::{ClientId, ClientIdDate};
use arbit_markets::{Amount, Price, Side, Symbol};
use rust_decimal_macros::dec;

#[derive(Default)]
struct RecordingNotifier {
    events: Mutex<Vec<EngineNotice>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: &EngineNotice) {
        self.events.lock().unwrap().push(event.clone());
    }
}

fn two_hop_solution() -> Solution {
    Solution {
        instructions: vec![
            Instruction::Transition {
                symbol: Symbol::new("BTC", "USD"),
                side: Side::Buy,
                action_price: Price::new(dec!(50000)).unwrap(),
                action_amount: Amount::new(dec!(0.02)),
            },
            Instruction::Transition {
                symbol: Symbol::new("ETH", "BTC"),
                side: Side::Sell,
                action_price: Price::new(dec!(0.05)).unwrap(),
                action_amount: Amount::new(dec!(0.02)),
            },
            Instruction::End,
        ],
        estimated_profit_base: Amount::new(dec!(0.0004)),
        estimated_profit_usd: Amount::new(dec!(20)),
    }
}

#[test]
fn a_stale_wallet_blocks_funding_the_cycle() {
    let wallet = WalletBalance {
        balance: Amount::new(dec!(1000)),
        available: None,
    };
    assert!(wallet.is_stale());

    let solution = two_hop_solution();
    let first_hop_amount = match &solution.instructions[0] {
        Instruction::Transition { action_price, action_amount, .. } => {
            *action_price * action_amount.raw()
        }
        Instruction::End => unreachable!(),
    };
    assert!(first_hop_amount > dec!(0));

    let key = WalletKey::new(WalletType::Exchange, "USD");
    assert_eq!(key.currency.as_str(), "USD");
}

#[test]
fn chain_drives_forward_then_fails_and_notifies() {
    let solution = two_hop_solution();
    let transitions: Vec<&Instruction> = solution.transitions().collect();
    assert_eq!(transitions.len(), 2);

    let mut state = StepState::Pending;
    let notifier = RecordingNotifier::default();

    for next in [StepState::Submitted, StepState::AckReq, StepState::AckOrder] {
        assert!(state.can_transition_to(next));
        state = next;
    }
    assert!(!state.is_terminal());
    assert!(state.is_live_at_venue());

    // The venue cancels the resting order; compensation takes over.
    assert!(state.can_transition_to(StepState::Canceled));
    state = StepState::Canceled;
    notifier.notify(&EngineNotice::ChainCompensating {
        symbol: Symbol::new("BTC", "USD"),
        step_index: 0,
    });

    assert!(state.is_terminal());
    assert!(!state.can_transition_to(StepState::Submitted));
    assert_eq!(notifier.events.lock().unwrap().len(), 1);
    assert!(matches!(
        notifier.events.lock().unwrap()[0],
        EngineNotice::ChainCompensating { step_index: 0, .. }
    ));
}

#[test]
fn a_venue_order_ack_carries_the_signed_amount_through_to_status() {
    let order = Order {
        id: Some(1),
        client_id: ClientId::generate(),
        client_id_date: ClientIdDate::today(),
        gid: Some(42),
        symbol: Symbol::new("BTC", "USD"),
        kind: smol_str::SmolStr::new("EXCHANGE LIMIT"),
        amount_signed: Amount::new(dec!(0.02)),
        price: Price::new(dec!(50000)).unwrap(),
        status: OrderStatus::parse("EXECUTED @ 50000.0(0.02)").unwrap(),
    };
    assert_eq!(order.status, OrderStatus::Executed);
    assert_eq!(Side::of_signed_amount(order.amount_signed.raw()), Some(Side::Buy));

    let notification = arbit_core::Notification {
        action: "on-req".into(),
        info: "ACK".into(),
        status: NotificationStatus::Success,
        text: String::new(),
    };
    assert!(!notification.is_error());
}
