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

use std::fmt::Display;

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

use super::{
    limit::LimitOrder, market::MarketOrder, stop_limit::StopLimitOrder,
    stop_market::StopMarketOrder, Order,
};

/// A tagged union over all order types, dispatching the [`Order`] interface
/// to the concrete variant.
#[enum_dispatch(Order)]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum OrderAny {
    Market(MarketOrder),
    Limit(LimitOrder),
    StopMarket(StopMarketOrder),
    StopLimit(StopLimitOrder),
}

impl Display for OrderAny {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}(side={}, type={}, instrument_id={}, client_order_id={}, status={})",
            stringify!(OrderAny),
            self.order_side(),
            self.order_type(),
            self.instrument_id(),
            self.client_order_id(),
            self.status(),
        )
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::{
        enums::{OrderSide, OrderType},
        identifiers::InstrumentId,
        orders::OrderTestBuilder,
        types::{Price, Quantity},
    };

    #[rstest]
    fn test_dispatch_by_variant() {
        let order = OrderTestBuilder::new(OrderType::StopLimit)
            .instrument_id(InstrumentId::from("AUD/USD.SIM"))
            .side(OrderSide::Sell)
            .price(Price::from("0.99000"))
            .trigger_price(Price::from("1.00000"))
            .quantity(Quantity::from(10))
            .build();

        assert_eq!(order.order_type(), OrderType::StopLimit);
        assert_eq!(order.price(), Some(Price::from("0.99000")));
        assert_eq!(order.trigger_price(), Some(Price::from("1.00000")));
        assert_eq!(order.is_triggered(), Some(false));
        assert!(order.is_passive());
    }

    #[rstest]
    fn test_display() {
        let order = OrderTestBuilder::new(OrderType::Market)
            .instrument_id(InstrumentId::from("AUD/USD.SIM"))
            .quantity(Quantity::from(10))
            .build();
        assert!(order.to_string().contains("type=MARKET"));
        assert!(order.to_string().contains("status=INITIALIZED"));
    }
}
