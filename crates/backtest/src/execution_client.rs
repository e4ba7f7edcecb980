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

//! Provides a `BacktestExecutionClient` implementation for backtesting.

use std::{cell::RefCell, rc::Rc};

use marketsim_common::cache::Cache;
use marketsim_core::UnixNanos;
use marketsim_execution::client::ExecutionClient;
use marketsim_model::{
    accounts::Account,
    enums::AccountType,
    events::{AccountState, OrderEventAny, OrderFilled},
    identifiers::{AccountId, PositionId, TraderId, Venue},
    position::Position,
    types::{AccountBalance, Currency},
};

/// An event emitted by the simulated venue, as seen by the event sink.
#[derive(Clone, Debug, PartialEq)]
pub enum ExecutionEvent {
    Order(OrderEventAny),
    Account(AccountState),
}

impl ExecutionEvent {
    /// Returns the event type name as a static string.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Order(event) => event.kind(),
            Self::Account(_) => "AccountState",
        }
    }
}

/// The execution client for a simulated venue.
///
/// Receives every event the venue emits, applies fills to the cached
/// positions and account (commission deduction), and journals the event
/// stream for the backtest run.
pub struct BacktestExecutionClient {
    trader_id: TraderId,
    account_id: AccountId,
    venue: Venue,
    account_type: AccountType,
    base_currency: Option<Currency>,
    cache: Rc<RefCell<Cache>>,
    events: RefCell<Vec<ExecutionEvent>>,
    frozen_account: bool,
}

impl BacktestExecutionClient {
    /// Creates a new [`BacktestExecutionClient`] instance.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        trader_id: TraderId,
        account_id: AccountId,
        venue: Venue,
        account_type: AccountType,
        base_currency: Option<Currency>,
        cache: Rc<RefCell<Cache>>,
        frozen_account: bool,
    ) -> Self {
        Self {
            trader_id,
            account_id,
            venue,
            account_type,
            base_currency,
            cache,
            events: RefCell::new(Vec::new()),
            frozen_account,
        }
    }

    /// Returns the trader ID for the client.
    #[must_use]
    pub const fn trader_id(&self) -> TraderId {
        self.trader_id
    }

    /// Returns all events received so far, in emission order.
    #[must_use]
    pub fn events(&self) -> Vec<ExecutionEvent> {
        self.events.borrow().clone()
    }

    /// Returns the order events received so far, in emission order.
    #[must_use]
    pub fn order_events(&self) -> Vec<OrderEventAny> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                ExecutionEvent::Order(event) => Some(*event),
                ExecutionEvent::Account(_) => None,
            })
            .collect()
    }

    /// Clears the journaled events.
    pub fn reset(&self) {
        self.events.borrow_mut().clear();
    }

    fn apply_fill(&self, fill: &OrderFilled) {
        let instrument = self
            .cache
            .borrow()
            .instrument(&fill.instrument_id)
            .cloned()
            .unwrap_or_else(|| panic!("Instrument {} not found", fill.instrument_id));

        // The venue defers position creation to the first fill; derive the
        // netting position ID when the venue assigned none
        let position_id = fill.position_id.unwrap_or_else(|| {
            PositionId::new(format!("{}-{}", fill.instrument_id, fill.strategy_id))
        });

        {
            let mut cache = self.cache.borrow_mut();
            match cache.position_mut(&position_id) {
                Some(position) => position.apply(fill),
                None => cache.add_position(Position::new(&instrument, position_id, fill)),
            }
            cache.add_position_id(position_id, fill.client_order_id);
        }

        if let Some(commission) = fill.commission {
            self.apply_commission(commission, fill.ts_event);
        }
    }

    fn apply_commission(&self, commission: marketsim_model::types::Money, ts_event: UnixNanos) {
        if self.frozen_account || commission.is_zero() {
            return;
        }

        let balance = {
            let cache = self.cache.borrow();
            let account = match cache.account() {
                Some(account) => account,
                None => {
                    log::error!("Cannot apply commission: no account for venue {}", self.venue);
                    return;
                }
            };
            match account.balance(Some(commission.currency)) {
                Some(balance) => *balance,
                None => {
                    log::error!(
                        "Cannot apply commission: no balance for currency {}",
                        commission.currency
                    );
                    return;
                }
            }
        };

        let updated = AccountBalance::new(
            balance.total - commission,
            balance.locked,
            balance.free - commission,
        );
        self.generate_account_state(vec![updated], true, ts_event)
            .expect("Failed to generate account state");
    }
}

impl ExecutionClient for BacktestExecutionClient {
    fn account_id(&self) -> AccountId {
        self.account_id
    }

    fn venue(&self) -> Venue {
        self.venue
    }

    fn generate_account_state(
        &self,
        balances: Vec<AccountBalance>,
        reported: bool,
        ts_event: UnixNanos,
    ) -> anyhow::Result<()> {
        let event = AccountState::new(
            self.account_id,
            self.account_type,
            self.base_currency,
            balances,
            reported,
            ts_event,
            ts_event,
        );

        {
            let mut cache = self.cache.borrow_mut();
            match cache.account_mut() {
                Some(account) => account.apply(&event),
                None => cache.add_account(Account::new(&event)),
            }
        }

        self.events.borrow_mut().push(ExecutionEvent::Account(event));
        Ok(())
    }

    fn handle_order_event(&self, event: OrderEventAny) {
        self.events.borrow_mut().push(ExecutionEvent::Order(event));
        if let OrderEventAny::Filled(fill) = &event {
            self.apply_fill(fill);
        }
    }
}
