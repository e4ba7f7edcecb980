// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2025 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! A performant, generic order book which can handle top-of-book, market-by-price
//! and market-by-order feeds, and simulate fills for incoming orders.

use std::{cmp::Ordering, collections::BTreeMap};

use marketsim_core::UnixNanos;
use thiserror::Error;

use crate::{
    data::{BookOrder, OrderBookDelta, OrderBookDeltas, QuoteTick, TradeTick},
    enums::{BookAction, BookType, OrderSide},
    identifiers::InstrumentId,
    types::{Price, Quantity},
};

/// Synthetic order IDs for top-of-book levels maintained from quotes and trades.
const TOP_BID_ORDER_ID: u64 = 1;
const TOP_ASK_ORDER_ID: u64 = 2;

/// An error when applying an invalid operation to an order book.
#[derive(Debug, Error)]
pub enum InvalidBookOperation {
    #[error("Invalid book operation: cannot update with data for a {0} book")]
    Update(BookType),
}

/// The price of an order book level, ordered by side so that iterating a
/// ladder always walks from best to worst price.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct BookPrice {
    value: Price,
    side: OrderSide,
}

impl PartialOrd for BookPrice {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BookPrice {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.side {
            OrderSide::Buy => other.value.cmp(&self.value),
            OrderSide::Sell => self.value.cmp(&other.value),
        }
    }
}

/// A single price level in a ladder, holding the orders at that price.
#[derive(Clone, Debug)]
struct BookLevel {
    price: Price,
    orders: Vec<BookOrder>,
}

impl BookLevel {
    fn new(price: Price) -> Self {
        Self {
            price,
            orders: Vec::new(),
        }
    }

    fn size(&self) -> f64 {
        self.orders.iter().map(|o| o.size.as_f64()).sum()
    }

    fn size_raw(&self, precision: u8) -> Quantity {
        let mut total = Quantity::zero(precision);
        for order in &self.orders {
            total += order.size;
        }
        total
    }
}

/// One side of an order book, with levels ordered best price first.
#[derive(Clone, Debug)]
struct Ladder {
    side: OrderSide,
    levels: BTreeMap<BookPrice, BookLevel>,
}

impl Ladder {
    fn new(side: OrderSide) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
        }
    }

    fn key(&self, price: Price) -> BookPrice {
        BookPrice {
            value: price,
            side: self.side,
        }
    }

    fn add(&mut self, order: BookOrder) {
        let key = self.key(order.price);
        self.levels
            .entry(key)
            .or_insert_with(|| BookLevel::new(order.price))
            .orders
            .push(order);
    }

    fn update(&mut self, order: BookOrder) {
        self.delete(order.order_id);
        if order.size.is_positive() {
            self.add(order);
        }
    }

    fn delete(&mut self, order_id: u64) {
        let mut empty_key = None;
        for (key, level) in &mut self.levels {
            if let Some(index) = level.orders.iter().position(|o| o.order_id == order_id) {
                level.orders.remove(index);
                if level.orders.is_empty() {
                    empty_key = Some(*key);
                }
                break;
            }
        }
        if let Some(key) = empty_key {
            self.levels.remove(&key);
        }
    }

    fn set_top(&mut self, order: BookOrder) {
        self.levels.clear();
        if order.size.is_positive() {
            self.add(order);
        }
    }

    fn top(&self) -> Option<&BookLevel> {
        self.levels.values().next()
    }

    fn clear(&mut self) {
        self.levels.clear();
    }

    /// Walks the ladder from the best price, allocating the incoming `order`
    /// against each level it is willing to trade with, until the order
    /// quantity is exhausted or no further level is acceptable.
    fn simulate_fills(&self, order: &BookOrder) -> Vec<(Price, Quantity)> {
        let mut fills = Vec::new();
        let precision = order.size.precision;
        let mut remaining = order.size;

        for level in self.levels.values() {
            if remaining.is_zero() {
                break;
            }
            let acceptable = match order.side {
                OrderSide::Buy => level.price <= order.price,
                OrderSide::Sell => level.price >= order.price,
            };
            if !acceptable {
                break;
            }
            let available = level.size_raw(precision);
            if available.is_zero() {
                continue;
            }
            let fill_qty = remaining.min(available);
            fills.push((level.price, fill_qty));
            remaining -= fill_qty;
        }

        fills
    }
}

/// Provides an order book which can handle L1/L2/L3 granularity data.
#[derive(Clone, Debug)]
pub struct OrderBook {
    /// The instrument ID for the order book.
    pub instrument_id: InstrumentId,
    /// The order book type (granularity).
    pub book_type: BookType,
    /// The last event sequence number for the order book.
    pub sequence: u64,
    /// UNIX timestamp (nanoseconds) of the last update.
    pub ts_last: UnixNanos,
    /// The current count of updates applied to the order book.
    pub update_count: u64,
    bids: Ladder,
    asks: Ladder,
}

impl OrderBook {
    /// Creates a new [`OrderBook`] instance.
    #[must_use]
    pub fn new(instrument_id: InstrumentId, book_type: BookType) -> Self {
        Self {
            instrument_id,
            book_type,
            sequence: 0,
            ts_last: UnixNanos::default(),
            update_count: 0,
            bids: Ladder::new(OrderSide::Buy),
            asks: Ladder::new(OrderSide::Sell),
        }
    }

    /// Clears all levels from both sides of the book.
    pub fn clear(&mut self, sequence: u64, ts_event: UnixNanos) {
        self.bids.clear();
        self.asks.clear();
        self.increment(sequence, ts_event);
    }

    /// Returns `true` if the book has any bid level.
    #[must_use]
    pub fn has_bid(&self) -> bool {
        self.bids.top().is_some()
    }

    /// Returns `true` if the book has any ask level.
    #[must_use]
    pub fn has_ask(&self) -> bool {
        self.asks.top().is_some()
    }

    /// Returns the best bid price in the book (if any).
    #[must_use]
    pub fn best_bid_price(&self) -> Option<Price> {
        self.bids.top().map(|level| level.price)
    }

    /// Returns the best ask price in the book (if any).
    #[must_use]
    pub fn best_ask_price(&self) -> Option<Price> {
        self.asks.top().map(|level| level.price)
    }

    /// Returns the aggregate size at the best bid level (if any).
    #[must_use]
    pub fn best_bid_size(&self) -> Option<f64> {
        self.bids.top().map(BookLevel::size)
    }

    /// Returns the aggregate size at the best ask level (if any).
    #[must_use]
    pub fn best_ask_size(&self) -> Option<f64> {
        self.asks.top().map(BookLevel::size)
    }

    /// Applies a single delta to the book.
    pub fn apply_delta(&mut self, delta: &OrderBookDelta) {
        let order = delta.order;
        match delta.action {
            BookAction::Add => self.ladder_mut(order.side).add(order),
            BookAction::Update => self.ladder_mut(order.side).update(order),
            BookAction::Delete => self.ladder_mut(order.side).delete(order.order_id),
            BookAction::Clear => {
                self.bids.clear();
                self.asks.clear();
            }
        }
        self.increment(delta.sequence, delta.ts_event);
    }

    /// Applies a batch of deltas to the book.
    pub fn apply_deltas(&mut self, deltas: &OrderBookDeltas) {
        for delta in &deltas.deltas {
            self.apply_delta(delta);
        }
    }

    /// Updates the top-of-book state from a quote tick. Only valid for L1 books.
    ///
    /// # Errors
    ///
    /// Returns an error if the book is not top-of-book granularity.
    pub fn update_quote_tick(&mut self, quote: &QuoteTick) -> Result<(), InvalidBookOperation> {
        if self.book_type != BookType::L1_TBBO {
            return Err(InvalidBookOperation::Update(self.book_type));
        }

        self.bids.set_top(BookOrder::new(
            OrderSide::Buy,
            quote.bid_price,
            quote.bid_size,
            TOP_BID_ORDER_ID,
        ));
        self.asks.set_top(BookOrder::new(
            OrderSide::Sell,
            quote.ask_price,
            quote.ask_size,
            TOP_ASK_ORDER_ID,
        ));
        self.increment(self.sequence + 1, quote.ts_event);
        Ok(())
    }

    /// Updates the top-of-book state from a trade tick. Only valid for L1 books.
    ///
    /// # Errors
    ///
    /// Returns an error if the book is not top-of-book granularity.
    pub fn update_trade_tick(&mut self, trade: &TradeTick) -> Result<(), InvalidBookOperation> {
        if self.book_type != BookType::L1_TBBO {
            return Err(InvalidBookOperation::Update(self.book_type));
        }

        self.bids.set_top(BookOrder::new(
            OrderSide::Buy,
            trade.price,
            trade.size,
            TOP_BID_ORDER_ID,
        ));
        self.asks.set_top(BookOrder::new(
            OrderSide::Sell,
            trade.price,
            trade.size,
            TOP_ASK_ORDER_ID,
        ));
        self.increment(self.sequence + 1, trade.ts_event);
        Ok(())
    }

    /// Simulates the fills an incoming `order` would receive against the
    /// opposing side of the book, walking levels from the best price until
    /// the order quantity is exhausted.
    #[must_use]
    pub fn simulate_fills(&self, order: &BookOrder) -> Vec<(Price, Quantity)> {
        match order.side {
            OrderSide::Buy => self.asks.simulate_fills(order),
            OrderSide::Sell => self.bids.simulate_fills(order),
        }
    }

    fn ladder_mut(&mut self, side: OrderSide) -> &mut Ladder {
        match side {
            OrderSide::Buy => &mut self.bids,
            OrderSide::Sell => &mut self.asks,
        }
    }

    fn increment(&mut self, sequence: u64, ts_event: UnixNanos) {
        self.sequence = sequence;
        self.ts_last = ts_event;
        self.update_count += 1;
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn instrument_id() -> InstrumentId {
        InstrumentId::from("ETHUSDT-PERP.BINANCE")
    }

    fn l1_book_with_quote(bid: &str, ask: &str) -> OrderBook {
        let mut book = OrderBook::new(instrument_id(), BookType::L1_TBBO);
        let quote = QuoteTick::new(
            instrument_id(),
            Price::from(bid),
            Price::from(ask),
            Quantity::from(10),
            Quantity::from(10),
            UnixNanos::from(1),
            UnixNanos::from(1),
        );
        book.update_quote_tick(&quote).unwrap();
        book
    }

    #[rstest]
    fn test_empty_book() {
        let book = OrderBook::new(instrument_id(), BookType::L2_MBP);
        assert!(!book.has_bid());
        assert!(!book.has_ask());
        assert_eq!(book.best_bid_price(), None);
        assert_eq!(book.best_ask_price(), None);
    }

    #[rstest]
    fn test_update_quote_tick_l1() {
        let book = l1_book_with_quote("1000.00", "1001.00");
        assert_eq!(book.best_bid_price(), Some(Price::from("1000.00")));
        assert_eq!(book.best_ask_price(), Some(Price::from("1001.00")));
        assert_eq!(book.best_bid_size(), Some(10.0));
        assert_eq!(book.update_count, 1);
    }

    #[rstest]
    fn test_update_quote_tick_wrong_book_type() {
        let mut book = OrderBook::new(instrument_id(), BookType::L2_MBP);
        let quote = QuoteTick::new(
            instrument_id(),
            Price::from("1000.00"),
            Price::from("1001.00"),
            Quantity::from(1),
            Quantity::from(1),
            UnixNanos::from(1),
            UnixNanos::from(1),
        );
        assert!(book.update_quote_tick(&quote).is_err());
    }

    #[rstest]
    fn test_update_trade_tick_sets_both_sides() {
        let mut book = OrderBook::new(instrument_id(), BookType::L1_TBBO);
        let trade = TradeTick::new(
            instrument_id(),
            Price::from("1000.00"),
            Quantity::from(5),
            crate::enums::AggressorSide::Buyer,
            crate::identifiers::TradeId::new("1"),
            UnixNanos::from(1),
            UnixNanos::from(1),
        );
        book.update_trade_tick(&trade).unwrap();
        assert_eq!(book.best_bid_price(), Some(Price::from("1000.00")));
        assert_eq!(book.best_ask_price(), Some(Price::from("1000.00")));
    }

    #[rstest]
    fn test_apply_deltas_ordering() {
        let mut book = OrderBook::new(instrument_id(), BookType::L2_MBP);
        for (i, (price, size)) in [("1001.00", 10), ("1000.50", 5), ("1002.00", 20)].iter().enumerate() {
            let delta = OrderBookDelta::new(
                instrument_id(),
                BookAction::Add,
                BookOrder::new(OrderSide::Sell, Price::from(*price), Quantity::from(*size), i as u64 + 1),
                0,
                i as u64,
                UnixNanos::from(1),
                UnixNanos::from(1),
            );
            book.apply_delta(&delta);
        }
        assert_eq!(book.best_ask_price(), Some(Price::from("1000.50")));
        assert_eq!(book.update_count, 3);
    }

    #[rstest]
    fn test_delete_removes_level() {
        let mut book = OrderBook::new(instrument_id(), BookType::L3_MBO);
        let order = BookOrder::new(OrderSide::Buy, Price::from("999.00"), Quantity::from(1), 7);
        let add = OrderBookDelta::new(
            instrument_id(),
            BookAction::Add,
            order,
            0,
            0,
            UnixNanos::from(1),
            UnixNanos::from(1),
        );
        book.apply_delta(&add);
        assert!(book.has_bid());

        let delete = OrderBookDelta::new(
            instrument_id(),
            BookAction::Delete,
            order,
            0,
            1,
            UnixNanos::from(2),
            UnixNanos::from(2),
        );
        book.apply_delta(&delete);
        assert!(!book.has_bid());
    }

    #[rstest]
    fn test_simulate_fills_respects_limit_price() {
        let mut book = OrderBook::new(instrument_id(), BookType::L2_MBP);
        for (i, (price, size)) in [("1000.00", 5), ("1001.00", 5), ("1002.00", 5)].iter().enumerate() {
            let delta = OrderBookDelta::new(
                instrument_id(),
                BookAction::Add,
                BookOrder::new(OrderSide::Sell, Price::from(*price), Quantity::from(*size), i as u64 + 1),
                0,
                i as u64,
                UnixNanos::from(1),
                UnixNanos::from(1),
            );
            book.apply_delta(&delta);
        }

        // Buy 12 limited at 1001.00: consumes the first two levels only
        let incoming = BookOrder::new(OrderSide::Buy, Price::from("1001.00"), Quantity::from(12), 0);
        let fills = book.simulate_fills(&incoming);
        assert_eq!(
            fills,
            vec![
                (Price::from("1000.00"), Quantity::from(5)),
                (Price::from("1001.00"), Quantity::from(5)),
            ]
        );
    }

    #[rstest]
    fn test_simulate_fills_market_order_walks_everything() {
        let book = l1_book_with_quote("1000.00", "1001.00");
        let incoming = BookOrder::new(OrderSide::Buy, Price::max(2), Quantity::from(4), 0);
        let fills = book.simulate_fills(&incoming);
        assert_eq!(fills, vec![(Price::from("1001.00"), Quantity::from(4))]);
    }

    #[rstest]
    fn test_simulate_fills_partial_at_top() {
        let book = l1_book_with_quote("1000.00", "1001.00");
        // Book only has 10 available at the top
        let incoming = BookOrder::new(OrderSide::Buy, Price::max(2), Quantity::from(25), 0);
        let fills = book.simulate_fills(&incoming);
        assert_eq!(fills, vec![(Price::from("1001.00"), Quantity::from(10))]);
    }
}
