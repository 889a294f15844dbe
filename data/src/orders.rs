//! Order store: indexed view of open/closed orders, keyed by both the
//! caller-generated client id and the venue-assigned order id (§3).

use arbit_core::{ClientId, Order};
use fnv::FnvHashMap;

#[derive(Debug, Default)]
pub struct OrderStore {
    by_client_id: FnvHashMap<ClientId, Order>,
    order_id_to_client_id: FnvHashMap<u64, ClientId>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the order tracked under its client id, and
    /// indexes its venue order id once one has been bound.
    pub fn upsert(&mut self, order: Order) {
        if let Some(id) = order.id {
            self.order_id_to_client_id.insert(id, order.client_id);
        }
        self.by_client_id.insert(order.client_id, order);
    }

    pub fn by_client_id(&self, client_id: ClientId) -> Option<&Order> {
        self.by_client_id.get(&client_id)
    }

    pub fn by_order_id(&self, order_id: u64) -> Option<&Order> {
        self.order_id_to_client_id
            .get(&order_id)
            .and_then(|cid| self.by_client_id.get(cid))
    }

    pub fn remove_by_client_id(&mut self, client_id: ClientId) -> Option<Order> {
        let removed = self.by_client_id.remove(&client_id);
        if let Some(order) = &removed {
            if let Some(id) = order.id {
                self.order_id_to_client_id.remove(&id);
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbit_core::{ClientIdDate, OrderStatus};
    use arbit_markets::{Amount, Price, Symbol};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use smol_str::SmolStr;

    fn sample_order(client_id: ClientId, order_id: Option<u64>) -> Order {
        Order {
            id: order_id,
            client_id,
            client_id_date: ClientIdDate::new(NaiveDate::from_ymd_opt(2026, 7, 28).unwrap()),
            gid: None,
            symbol: Symbol::new("BTC", "USD"),
            kind: SmolStr::new("EXCHANGE LIMIT"),
            amount_signed: Amount::new(dec!(0.01)),
            price: Price::new(dec!(100)).unwrap(),
            status: OrderStatus::Active,
        }
    }

    #[test]
    fn looks_up_by_either_key_once_order_id_is_bound() {
        let mut store = OrderStore::new();
        let client_id = ClientId::from_raw(42).unwrap();
        store.upsert(sample_order(client_id, Some(900)));

        assert_eq!(store.by_client_id(client_id).unwrap().id, Some(900));
        assert_eq!(store.by_order_id(900).unwrap().client_id, client_id);
    }

    #[test]
    fn removal_clears_both_indices() {
        let mut store = OrderStore::new();
        let client_id = ClientId::from_raw(1).unwrap();
        store.upsert(sample_order(client_id, Some(1)));
        store.remove_by_client_id(client_id);

        assert!(store.by_client_id(client_id).is_none());
        assert!(store.by_order_id(1).is_none());
    }
}
