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

//! Order lifecycle events.
//!
//! Every event is stamped with the simulated clock (`ts_event`) at emission,
//! and events contain no random identifiers so that a replay with the same
//! configuration produces an identical event sequence.

use std::fmt::Display;

use derive_builder::Builder;
use marketsim_core::UnixNanos;
use serde::{Deserialize, Serialize};
use ustr::Ustr;

use crate::{
    enums::{LiquiditySide, OrderSide, OrderType},
    identifiers::{
        AccountId, ClientOrderId, InstrumentId, PositionId, StrategyId, TradeId, TraderId,
        VenueOrderId,
    },
    types::{Currency, Money, Price, Quantity},
};

/// An event where an order was submitted to the venue.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct OrderSubmitted {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub account_id: AccountId,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

/// An event where an order was acknowledged by the venue as received and valid.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct OrderAccepted {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub venue_order_id: VenueOrderId,
    pub account_id: AccountId,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

/// An event where an order was rejected by the venue.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct OrderRejected {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub account_id: AccountId,
    pub reason: Ustr,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

/// An event where a request to modify an order is pending at the venue.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct OrderPendingUpdate {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub venue_order_id: Option<VenueOrderId>,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

/// An event where a request to cancel an order is pending at the venue.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct OrderPendingCancel {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub venue_order_id: Option<VenueOrderId>,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

/// An event where a request to modify an order was rejected by the venue.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct OrderModifyRejected {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub venue_order_id: Option<VenueOrderId>,
    pub reason: Ustr,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

/// An event where a request to cancel an order was rejected by the venue.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct OrderCancelRejected {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub venue_order_id: Option<VenueOrderId>,
    pub reason: Ustr,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

/// An event where an order was updated at the venue.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct OrderUpdated {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub venue_order_id: Option<VenueOrderId>,
    pub quantity: Quantity,
    pub price: Option<Price>,
    pub trigger_price: Option<Price>,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

/// An event where an order was canceled at the venue.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct OrderCanceled {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub venue_order_id: Option<VenueOrderId>,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

/// An event where an order's stop price was triggered at the venue.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct OrderTriggered {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub venue_order_id: Option<VenueOrderId>,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

/// An event where an order reached its GTD expiration at the venue.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct OrderExpired {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub venue_order_id: Option<VenueOrderId>,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

/// An event where an order was filled at the venue.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[builder(default)]
#[serde(tag = "type")]
pub struct OrderFilled {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub venue_order_id: VenueOrderId,
    pub account_id: AccountId,
    /// The execution match ID (assigned by the venue).
    pub trade_id: TradeId,
    pub order_side: OrderSide,
    pub order_type: OrderType,
    /// The fill quantity for this execution.
    pub last_qty: Quantity,
    /// The fill price for this execution.
    pub last_px: Price,
    /// The currency of the fill price.
    pub currency: Currency,
    /// The commission generated from this execution.
    pub commission: Option<Money>,
    pub liquidity_side: LiquiditySide,
    /// The position ID (assigned by the venue).
    pub position_id: Option<PositionId>,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

impl OrderFilled {
    /// Returns `true` if the fill was on the buy side.
    #[must_use]
    pub fn is_buy(&self) -> bool {
        self.order_side == OrderSide::Buy
    }

    /// Returns `true` if the fill was on the sell side.
    #[must_use]
    pub fn is_sell(&self) -> bool {
        self.order_side == OrderSide::Sell
    }
}

impl Default for OrderFilled {
    /// Creates a new default [`OrderFilled`] instance for testing.
    fn default() -> Self {
        Self {
            trader_id: TraderId::default(),
            strategy_id: StrategyId::default(),
            instrument_id: InstrumentId::from("AUD/USD.SIM"),
            client_order_id: ClientOrderId::new("O-19700101-000000-001-001-1"),
            venue_order_id: VenueOrderId::new("1-001"),
            account_id: AccountId::default(),
            trade_id: TradeId::new("1"),
            order_side: OrderSide::Buy,
            order_type: OrderType::Market,
            last_qty: Quantity::from(100_000),
            last_px: Price::from("1.00000"),
            currency: Currency::USD(),
            commission: None,
            liquidity_side: LiquiditySide::Taker,
            position_id: None,
            ts_event: UnixNanos::default(),
            ts_init: UnixNanos::default(),
        }
    }
}

impl std::fmt::Debug for OrderFilled {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}(instrument_id={}, client_order_id={}, venue_order_id={}, trade_id={}, position_id={}, \
            order_side={}, order_type={}, last_qty={}, last_px={} {}, commission={}, liquidity_side={}, ts_event={})",
            stringify!(OrderFilled),
            self.instrument_id,
            self.client_order_id,
            self.venue_order_id,
            self.trade_id,
            self.position_id.map_or_else(|| "None".to_string(), |p| p.to_string()),
            self.order_side,
            self.order_type,
            self.last_qty,
            self.last_px,
            self.currency,
            self.commission.map_or_else(|| "None".to_string(), |c| c.to_string()),
            self.liquidity_side,
            self.ts_event,
        )
    }
}

/// A tagged union over all order lifecycle events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderEventAny {
    Submitted(OrderSubmitted),
    Accepted(OrderAccepted),
    Rejected(OrderRejected),
    PendingUpdate(OrderPendingUpdate),
    PendingCancel(OrderPendingCancel),
    ModifyRejected(OrderModifyRejected),
    CancelRejected(OrderCancelRejected),
    Updated(OrderUpdated),
    Canceled(OrderCanceled),
    Triggered(OrderTriggered),
    Expired(OrderExpired),
    Filled(OrderFilled),
}

impl OrderEventAny {
    /// Returns the client order ID for the event.
    #[must_use]
    pub const fn client_order_id(&self) -> ClientOrderId {
        match self {
            Self::Submitted(e) => e.client_order_id,
            Self::Accepted(e) => e.client_order_id,
            Self::Rejected(e) => e.client_order_id,
            Self::PendingUpdate(e) => e.client_order_id,
            Self::PendingCancel(e) => e.client_order_id,
            Self::ModifyRejected(e) => e.client_order_id,
            Self::CancelRejected(e) => e.client_order_id,
            Self::Updated(e) => e.client_order_id,
            Self::Canceled(e) => e.client_order_id,
            Self::Triggered(e) => e.client_order_id,
            Self::Expired(e) => e.client_order_id,
            Self::Filled(e) => e.client_order_id,
        }
    }

    /// Returns the instrument ID for the event.
    #[must_use]
    pub const fn instrument_id(&self) -> InstrumentId {
        match self {
            Self::Submitted(e) => e.instrument_id,
            Self::Accepted(e) => e.instrument_id,
            Self::Rejected(e) => e.instrument_id,
            Self::PendingUpdate(e) => e.instrument_id,
            Self::PendingCancel(e) => e.instrument_id,
            Self::ModifyRejected(e) => e.instrument_id,
            Self::CancelRejected(e) => e.instrument_id,
            Self::Updated(e) => e.instrument_id,
            Self::Canceled(e) => e.instrument_id,
            Self::Triggered(e) => e.instrument_id,
            Self::Expired(e) => e.instrument_id,
            Self::Filled(e) => e.instrument_id,
        }
    }

    /// Returns the strategy ID for the event.
    #[must_use]
    pub const fn strategy_id(&self) -> StrategyId {
        match self {
            Self::Submitted(e) => e.strategy_id,
            Self::Accepted(e) => e.strategy_id,
            Self::Rejected(e) => e.strategy_id,
            Self::PendingUpdate(e) => e.strategy_id,
            Self::PendingCancel(e) => e.strategy_id,
            Self::ModifyRejected(e) => e.strategy_id,
            Self::CancelRejected(e) => e.strategy_id,
            Self::Updated(e) => e.strategy_id,
            Self::Canceled(e) => e.strategy_id,
            Self::Triggered(e) => e.strategy_id,
            Self::Expired(e) => e.strategy_id,
            Self::Filled(e) => e.strategy_id,
        }
    }

    /// Returns the UNIX timestamp (nanoseconds) when the event occurred.
    #[must_use]
    pub const fn ts_event(&self) -> UnixNanos {
        match self {
            Self::Submitted(e) => e.ts_event,
            Self::Accepted(e) => e.ts_event,
            Self::Rejected(e) => e.ts_event,
            Self::PendingUpdate(e) => e.ts_event,
            Self::PendingCancel(e) => e.ts_event,
            Self::ModifyRejected(e) => e.ts_event,
            Self::CancelRejected(e) => e.ts_event,
            Self::Updated(e) => e.ts_event,
            Self::Canceled(e) => e.ts_event,
            Self::Triggered(e) => e.ts_event,
            Self::Expired(e) => e.ts_event,
            Self::Filled(e) => e.ts_event,
        }
    }

    /// Returns the rejection reason for the event (if any).
    #[must_use]
    pub const fn reason(&self) -> Option<Ustr> {
        match self {
            Self::Rejected(e) => Some(e.reason),
            Self::ModifyRejected(e) => Some(e.reason),
            Self::CancelRejected(e) => Some(e.reason),
            _ => None,
        }
    }

    /// Returns the event type name as a static string.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Submitted(_) => "OrderSubmitted",
            Self::Accepted(_) => "OrderAccepted",
            Self::Rejected(_) => "OrderRejected",
            Self::PendingUpdate(_) => "OrderPendingUpdate",
            Self::PendingCancel(_) => "OrderPendingCancel",
            Self::ModifyRejected(_) => "OrderModifyRejected",
            Self::CancelRejected(_) => "OrderCancelRejected",
            Self::Updated(_) => "OrderUpdated",
            Self::Canceled(_) => "OrderCanceled",
            Self::Triggered(_) => "OrderTriggered",
            Self::Expired(_) => "OrderExpired",
            Self::Filled(_) => "OrderFilled",
        }
    }
}

impl Display for OrderEventAny {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.kind(), self.client_order_id())
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_order_filled_builder() {
        let fill = OrderFilledBuilder::default()
            .last_qty(Quantity::from(10))
            .last_px(Price::from("100.00"))
            .liquidity_side(LiquiditySide::Maker)
            .build()
            .unwrap();
        assert_eq!(fill.last_qty, Quantity::from(10));
        assert_eq!(fill.liquidity_side, LiquiditySide::Maker);
        assert!(fill.is_buy());
    }

    #[rstest]
    fn test_event_any_accessors() {
        let fill = OrderFilled::default();
        let event = OrderEventAny::Filled(fill);
        assert_eq!(event.client_order_id(), fill.client_order_id);
        assert_eq!(event.instrument_id(), fill.instrument_id);
        assert_eq!(event.kind(), "OrderFilled");
        assert_eq!(event.reason(), None);
    }

    #[rstest]
    fn test_rejected_reason() {
        let event = OrderEventAny::Rejected(OrderRejected {
            trader_id: TraderId::default(),
            strategy_id: StrategyId::default(),
            instrument_id: InstrumentId::from("AUD/USD.SIM"),
            client_order_id: ClientOrderId::new("O-1"),
            account_id: AccountId::default(),
            reason: Ustr::from("No market for AUD/USD.SIM"),
            ts_event: UnixNanos::default(),
            ts_init: UnixNanos::default(),
        });
        assert!(event.reason().unwrap().contains("No market"));
        assert_eq!(event.to_string(), "OrderRejected(O-1)");
    }
}
