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

//! Trading commands sent to the simulated venue's command queue.

use std::fmt::Display;

use marketsim_core::UnixNanos;
use marketsim_model::{
    identifiers::{ClientOrderId, InstrumentId, StrategyId, TraderId},
    orders::{Order, OrderAny},
    types::{Price, Quantity},
};

/// A command to submit a single order to the venue.
#[derive(Clone, Debug)]
pub struct SubmitOrder {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub order: OrderAny,
    pub ts_init: UnixNanos,
}

impl SubmitOrder {
    /// Creates a new [`SubmitOrder`] command from the given `order`.
    #[must_use]
    pub fn new(order: OrderAny, ts_init: UnixNanos) -> Self {
        Self {
            trader_id: order.trader_id(),
            strategy_id: order.strategy_id(),
            instrument_id: order.instrument_id(),
            client_order_id: order.client_order_id(),
            order,
            ts_init,
        }
    }
}

/// A command to submit a list of orders to the venue in sequence
/// (used for contingent brackets).
#[derive(Clone, Debug)]
pub struct SubmitOrderList {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub orders: Vec<OrderAny>,
    pub ts_init: UnixNanos,
}

impl SubmitOrderList {
    /// Creates a new [`SubmitOrderList`] command from the given `orders`.
    ///
    /// # Panics
    ///
    /// Panics if `orders` is empty.
    #[must_use]
    pub fn new(orders: Vec<OrderAny>, ts_init: UnixNanos) -> Self {
        assert!(!orders.is_empty(), "`orders` cannot be empty");
        let first = &orders[0];
        Self {
            trader_id: first.trader_id(),
            strategy_id: first.strategy_id(),
            instrument_id: first.instrument_id(),
            orders,
            ts_init,
        }
    }
}

/// A command to modify the quantity, price and/or trigger price of a working order.
#[derive(Clone, Copy, Debug)]
pub struct ModifyOrder {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub quantity: Option<Quantity>,
    pub price: Option<Price>,
    pub trigger_price: Option<Price>,
    pub ts_init: UnixNanos,
}

/// A command to cancel a working order.
#[derive(Clone, Copy, Debug)]
pub struct CancelOrder {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub ts_init: UnixNanos,
}

/// A tagged union over all trading command types.
#[derive(Clone, Debug)]
pub enum TradingCommand {
    SubmitOrder(SubmitOrder),
    SubmitOrderList(SubmitOrderList),
    ModifyOrder(ModifyOrder),
    CancelOrder(CancelOrder),
}

impl TradingCommand {
    /// Returns the instrument ID for the command.
    #[must_use]
    pub fn instrument_id(&self) -> InstrumentId {
        match self {
            Self::SubmitOrder(c) => c.instrument_id,
            Self::SubmitOrderList(c) => c.instrument_id,
            Self::ModifyOrder(c) => c.instrument_id,
            Self::CancelOrder(c) => c.instrument_id,
        }
    }

    /// Returns the UNIX timestamp (nanoseconds) when the command was initialized.
    #[must_use]
    pub fn ts_init(&self) -> UnixNanos {
        match self {
            Self::SubmitOrder(c) => c.ts_init,
            Self::SubmitOrderList(c) => c.ts_init,
            Self::ModifyOrder(c) => c.ts_init,
            Self::CancelOrder(c) => c.ts_init,
        }
    }
}

impl Display for TradingCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Self::SubmitOrder(_) => "SubmitOrder",
            Self::SubmitOrderList(_) => "SubmitOrderList",
            Self::ModifyOrder(_) => "ModifyOrder",
            Self::CancelOrder(_) => "CancelOrder",
        };
        write!(f, "{}({})", kind, self.instrument_id())
    }
}
