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

//! Provides a `SimulatedExchange` venue for backtesting on historical data.

use std::{
    cell::RefCell,
    collections::{BinaryHeap, HashMap, VecDeque},
    rc::Rc,
};

use indexmap::IndexMap;
use marketsim_common::{cache::Cache, clock::Clock};
use marketsim_core::{
    correctness::{check_equal, check_slice_not_empty, FAILED},
    UnixNanos,
};
use marketsim_execution::{
    client::ExecutionClient,
    matching_engine::{IdsGenerator, OrderMatchingEngine, OrderMatchingEngineConfig},
    messages::TradingCommand,
    models::{fee::FeeModelAny, fill::FillModel, latency::LatencyModel},
};
use marketsim_model::{
    accounts::Account,
    enums::{AccountType, BookType, OmsType},
    data::{Bar, OrderBookDelta, OrderBookDeltas, QuoteTick, TradeTick},
    identifiers::{ClientOrderId, InstrumentId, Venue},
    instruments::{Instrument, InstrumentAny},
    orderbook::OrderBook,
    types::{AccountBalance, Currency, Money, Price},
};
use rust_decimal::Decimal;

/// Represents a command in flight to the venue under a latency model, ordered
/// for a min-heap so that the earliest arrival (then lowest send counter)
/// drains first.
#[derive(Debug)]
struct InflightCommand {
    ts: UnixNanos,
    counter: u32,
    command: TradingCommand,
}

impl InflightCommand {
    const fn new(ts: UnixNanos, counter: u32, command: TradingCommand) -> Self {
        Self {
            ts,
            counter,
            command,
        }
    }
}

impl PartialEq for InflightCommand {
    fn eq(&self, other: &Self) -> bool {
        self.ts == other.ts && self.counter == other.counter
    }
}

impl Eq for InflightCommand {}

impl Ord for InflightCommand {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reverse ordering for min-heap (earliest timestamp first then lowest counter)
        other
            .ts
            .cmp(&self.ts)
            .then_with(|| other.counter.cmp(&self.counter))
    }
}

impl PartialOrd for InflightCommand {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// A simulated exchange venue.
///
/// Routes market data and queued trading commands to a per-instrument
/// matching engine, owns the venue identifier generators, and manages the
/// venue account. All activity is driven by a single backtest loop through
/// `process_*` data handlers and `process(ts)` for the command queue.
pub struct SimulatedExchange {
    /// The venue ID.
    pub id: Venue,
    /// The order management system type used by the venue.
    pub oms_type: OmsType,
    /// The account type for the venue.
    pub account_type: AccountType,
    /// The account base currency (`None` for multi-currency accounts).
    pub base_currency: Option<Currency>,
    /// The order book type for the venue's markets.
    pub book_type: BookType,
    starting_balances: Vec<Money>,
    default_leverage: Decimal,
    leverages: IndexMap<InstrumentId, Decimal>,
    instruments: IndexMap<InstrumentId, InstrumentAny>,
    matching_engines: IndexMap<InstrumentId, OrderMatchingEngine>,
    fill_model: FillModel,
    fee_model: FeeModelAny,
    latency_model: Option<LatencyModel>,
    clock: Rc<RefCell<dyn Clock>>,
    cache: Rc<RefCell<Cache>>,
    ids: Rc<RefCell<IdsGenerator>>,
    exec_client: Option<Rc<dyn ExecutionClient>>,
    message_queue: VecDeque<TradingCommand>,
    inflight_queue: BinaryHeap<InflightCommand>,
    inflight_counter: HashMap<UnixNanos, u32>,
    frozen_account: bool,
    bar_execution: bool,
    reject_stop_orders: bool,
    support_gtd_orders: bool,
    support_contingent_orders: bool,
    use_reduce_only: bool,
}

impl std::fmt::Debug for SimulatedExchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedExchange")
            .field("id", &self.id)
            .field("oms_type", &self.oms_type)
            .field("account_type", &self.account_type)
            .field("base_currency", &self.base_currency)
            .field("book_type", &self.book_type)
            .finish_non_exhaustive()
    }
}

impl SimulatedExchange {
    /// Creates a new [`SimulatedExchange`] instance.
    ///
    /// # Errors
    ///
    /// Returns an error on invalid configuration: no starting balances, no
    /// instruments, multiple starting balances for a single-currency account,
    /// or a cash account with derivative instruments.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        venue: Venue,
        oms_type: OmsType,
        account_type: AccountType,
        starting_balances: Vec<Money>,
        base_currency: Option<Currency>,
        default_leverage: Decimal,
        leverages: IndexMap<InstrumentId, Decimal>,
        instruments: Vec<InstrumentAny>,
        cache: Rc<RefCell<Cache>>,
        clock: Rc<RefCell<dyn Clock>>,
        fill_model: FillModel,
        fee_model: FeeModelAny,
        book_type: BookType,
        latency_model: Option<LatencyModel>,
        frozen_account: bool,
        bar_execution: bool,
        reject_stop_orders: bool,
        support_gtd_orders: bool,
        support_contingent_orders: bool,
        use_reduce_only: bool,
    ) -> anyhow::Result<Self> {
        check_slice_not_empty(&starting_balances, "starting_balances")?;
        check_slice_not_empty(&instruments, "instruments")?;
        if base_currency.is_some() && starting_balances.len() > 1 {
            anyhow::bail!("single-currency account has multiple starting currencies")
        }

        let mut exchange = Self {
            id: venue,
            oms_type,
            account_type,
            base_currency,
            book_type,
            starting_balances,
            default_leverage,
            leverages,
            instruments: IndexMap::new(),
            matching_engines: IndexMap::new(),
            fill_model,
            fee_model,
            latency_model,
            clock,
            cache,
            ids: Rc::new(RefCell::new(IdsGenerator::new())),
            exec_client: None,
            message_queue: VecDeque::new(),
            inflight_queue: BinaryHeap::new(),
            inflight_counter: HashMap::new(),
            frozen_account,
            bar_execution,
            reject_stop_orders,
            support_gtd_orders,
            support_contingent_orders,
            use_reduce_only,
        };

        for instrument in instruments {
            exchange.add_instrument(instrument)?;
        }
        Ok(exchange)
    }

    /// Registers the execution client (event sink) with the venue and all of
    /// its matching engines. Must be called before any operation which emits
    /// events.
    pub fn register_client(&mut self, client: Rc<dyn ExecutionClient>) {
        for matching_engine in self.matching_engines.values_mut() {
            matching_engine.register_client(client.clone());
        }
        self.exec_client = Some(client);
    }

    /// Replaces the fill model on the venue and all matching engines.
    pub fn set_fill_model(&mut self, fill_model: FillModel) {
        for matching_engine in self.matching_engines.values_mut() {
            matching_engine.set_fill_model(fill_model.clone());
            log::info!(
                "Setting fill model for {} to {fill_model}",
                matching_engine.venue
            );
        }
        self.fill_model = fill_model;
    }

    /// Sets the latency model for the venue's command queue.
    pub fn set_latency_model(&mut self, latency_model: LatencyModel) {
        self.latency_model = Some(latency_model);
    }

    /// Initializes the venue account, emitting the initial account state.
    pub fn initialize_account(&mut self) {
        self.generate_fresh_account_state();
    }

    fn add_instrument(&mut self, instrument: InstrumentAny) -> anyhow::Result<()> {
        check_equal(
            instrument.id().venue,
            self.id,
            "Venue of instrument id",
            "Venue of simulated exchange",
        )
        .expect(FAILED);

        if self.account_type == AccountType::Cash && instrument.is_derivative() {
            anyhow::bail!("Cash account cannot trade futures or perpetuals")
        }

        self.instruments.insert(instrument.id(), instrument.clone());
        self.cache.borrow_mut().add_instrument(instrument.clone());

        let config = OrderMatchingEngineConfig::new(
            self.bar_execution,
            self.reject_stop_orders,
            self.support_gtd_orders,
            self.support_contingent_orders,
            self.use_reduce_only,
        );
        let instrument_id = instrument.id();
        let mut matching_engine = OrderMatchingEngine::new(
            instrument,
            self.instruments.len() as u32,
            self.fill_model.clone(),
            self.fee_model,
            self.book_type,
            self.oms_type,
            self.account_type,
            self.clock.clone(),
            Rc::clone(&self.cache),
            Rc::clone(&self.ids),
            config,
        );
        if let Some(client) = &self.exec_client {
            matching_engine.register_client(client.clone());
        }
        self.matching_engines.insert(instrument_id, matching_engine);

        log::info!("Added instrument {instrument_id} and created matching engine");
        Ok(())
    }

    /// Returns the best bid price for the given `instrument_id` (if any).
    #[must_use]
    pub fn best_bid_price(&self, instrument_id: InstrumentId) -> Option<Price> {
        self.matching_engines
            .get(&instrument_id)
            .and_then(OrderMatchingEngine::best_bid_price)
    }

    /// Returns the best ask price for the given `instrument_id` (if any).
    #[must_use]
    pub fn best_ask_price(&self, instrument_id: InstrumentId) -> Option<Price> {
        self.matching_engines
            .get(&instrument_id)
            .and_then(OrderMatchingEngine::best_ask_price)
    }

    /// Returns the order book for the given `instrument_id` (if any).
    #[must_use]
    pub fn get_book(&self, instrument_id: InstrumentId) -> Option<&OrderBook> {
        self.matching_engines
            .get(&instrument_id)
            .map(OrderMatchingEngine::get_book)
    }

    /// Returns the matching engine for the given `instrument_id` (if any).
    #[must_use]
    pub fn get_matching_engine(&self, instrument_id: &InstrumentId) -> Option<&OrderMatchingEngine> {
        self.matching_engines.get(instrument_id)
    }

    /// Returns all working orders, optionally filtered by `instrument_id`.
    #[must_use]
    pub fn get_open_orders(&self, instrument_id: Option<InstrumentId>) -> Vec<ClientOrderId> {
        instrument_id
            .and_then(|id| {
                self.matching_engines
                    .get(&id)
                    .map(OrderMatchingEngine::get_open_orders)
            })
            .unwrap_or_else(|| {
                self.matching_engines
                    .values()
                    .flat_map(OrderMatchingEngine::get_open_orders)
                    .collect()
            })
    }

    /// Applies the `adjustment` to the account balance of its currency and
    /// emits the updated account state. A no-op for frozen accounts.
    pub fn adjust_account(&mut self, adjustment: Money) {
        if self.frozen_account {
            // Nothing to adjust
            return;
        }

        let balance = {
            let cache = self.cache.borrow();
            let account = match cache.account() {
                Some(account) => account,
                None => {
                    log::error!("Cannot adjust account: no account for venue {}", self.id);
                    return;
                }
            };
            match account.balance(Some(adjustment.currency)) {
                Some(balance) => *balance,
                None => {
                    log::error!(
                        "Cannot adjust account: no balance for currency {}",
                        adjustment.currency
                    );
                    return;
                }
            }
        };

        let updated = AccountBalance::new(
            balance.total + adjustment,
            balance.locked,
            balance.free + adjustment,
        );
        if let Some(exec_client) = &self.exec_client {
            exec_client
                .generate_account_state(vec![updated], true, self.clock.borrow().timestamp_ns())
                .expect("Failed to generate account state");
        }
    }

    /// Enqueues a trading `command` (non-blocking).
    pub fn send(&mut self, command: TradingCommand) {
        if self.latency_model.is_none() {
            self.message_queue.push_back(command);
        } else {
            let (ts, counter) = self.generate_inflight_command(&command);
            self.inflight_queue
                .push(InflightCommand::new(ts, counter, command));
        }
    }

    fn generate_inflight_command(&mut self, command: &TradingCommand) -> (UnixNanos, u32) {
        let latency_model = self
            .latency_model
            .as_ref()
            .expect("Latency model should be initialized");
        let ts = match command {
            TradingCommand::SubmitOrder(_) | TradingCommand::SubmitOrderList(_) => {
                command.ts_init() + latency_model.insert_latency_nanos
            }
            TradingCommand::ModifyOrder(_) => command.ts_init() + latency_model.update_latency_nanos,
            TradingCommand::CancelOrder(_) => command.ts_init() + latency_model.delete_latency_nanos,
        };

        let counter = self
            .inflight_counter
            .entry(ts)
            .and_modify(|counter| *counter += 1)
            .or_insert(1);

        (ts, *counter)
    }

    /// Processes the venue's market for the given order book `delta`.
    pub fn process_order_book_delta(&mut self, delta: &OrderBookDelta) {
        self.matching_engine_mut(&delta.instrument_id)
            .process_order_book_delta(delta);
    }

    /// Processes the venue's market for the given order book `deltas`.
    pub fn process_order_book_deltas(&mut self, deltas: &OrderBookDeltas) {
        self.matching_engine_mut(&deltas.instrument_id)
            .process_order_book_deltas(deltas);
    }

    /// Processes the venue's market for the given `quote`.
    pub fn process_quote_tick(&mut self, quote: &QuoteTick) {
        self.matching_engine_mut(&quote.instrument_id)
            .process_quote_tick(quote);
    }

    /// Processes the venue's market for the given `trade`.
    pub fn process_trade_tick(&mut self, trade: &TradeTick) {
        self.matching_engine_mut(&trade.instrument_id)
            .process_trade_tick(trade);
    }

    /// Processes the venue's market for the given `bar`.
    pub fn process_bar(&mut self, bar: &Bar) {
        self.matching_engine_mut(&bar.instrument_id()).process_bar(bar);
    }

    fn matching_engine_mut(&mut self, instrument_id: &InstrumentId) -> &mut OrderMatchingEngine {
        self.matching_engines
            .get_mut(instrument_id)
            .unwrap_or_else(|| panic!("No matching engine found for instrument {instrument_id}"))
    }

    /// Advances the venue to `ts_now`, draining every queued command due for
    /// processing in FIFO order before returning.
    pub fn process(&mut self, ts_now: UnixNanos) {
        self.clock.borrow_mut().set_time(ts_now);

        // Process commands that have completed their simulated latency
        while let Some(inflight) = self.inflight_queue.peek() {
            if inflight.ts > ts_now {
                // Future commands remain in the queue
                break;
            }
            let inflight = self.inflight_queue.pop().expect("Inflight queue should not be empty");
            self.process_trading_command(inflight.command);
        }

        // Process the regular message queue
        while let Some(command) = self.message_queue.pop_front() {
            self.process_trading_command(command);
        }
    }

    /// Clears all venue state, resets identifier counters to zero and
    /// re-emits a fresh account state.
    pub fn reset(&mut self) {
        for matching_engine in self.matching_engines.values_mut() {
            matching_engine.reset();
        }
        self.ids.borrow_mut().reset();
        self.cache.borrow_mut().reset();
        self.message_queue.clear();
        self.inflight_queue.clear();
        self.inflight_counter.clear();

        self.generate_fresh_account_state();

        log::info!("Resetting exchange state");
    }

    fn process_trading_command(&mut self, command: TradingCommand) {
        assert!(
            self.exec_client.is_some(),
            "Execution client should be initialized"
        );
        let matching_engine = self
            .matching_engines
            .get_mut(&command.instrument_id())
            .expect("Matching engine should be initialized");
        match command {
            TradingCommand::SubmitOrder(command) => matching_engine.process_order(command.order),
            TradingCommand::SubmitOrderList(command) => {
                for order in command.orders {
                    matching_engine.process_order(order);
                }
            }
            TradingCommand::ModifyOrder(ref command) => matching_engine.process_modify(command),
            TradingCommand::CancelOrder(ref command) => matching_engine.process_cancel(command),
        }
    }

    fn generate_fresh_account_state(&mut self) {
        let balances: Vec<AccountBalance> = self
            .starting_balances
            .iter()
            .map(|money| AccountBalance::new(*money, Money::zero(money.currency), *money))
            .collect();

        if let Some(exec_client) = &self.exec_client {
            exec_client
                .generate_account_state(balances, true, self.clock.borrow().timestamp_ns())
                .expect("Failed to generate account state");
        }

        // Set leverages
        if self.account_type == AccountType::Margin {
            let mut cache = self.cache.borrow_mut();
            if let Some(account) = cache.account_mut() {
                account.set_default_leverage(self.default_leverage);
                for (instrument_id, leverage) in &self.leverages {
                    account.set_leverage(*instrument_id, *leverage);
                }
            }
        }
    }

    /// Returns the venue account (if initialized).
    #[must_use]
    pub fn get_account(&self) -> Option<Account> {
        self.cache.borrow().account().cloned()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use marketsim_common::clock::TestClock;
    use marketsim_execution::messages::{CancelOrder, ModifyOrder, SubmitOrder, SubmitOrderList};
    use marketsim_model::{
        enums::{ContingencyType, LiquiditySide, OrderSide, OrderType},
        events::OrderEventAny,
        identifiers::{AccountId, StrategyId, TraderId},
        instruments::stubs::{crypto_perpetual_ethusdt, currency_pair_audusd},
        orders::{OrderAny, OrderTestBuilder},
        types::Quantity,
    };
    use rstest::rstest;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::execution_client::{BacktestExecutionClient, ExecutionEvent};

    const ETHUSDT_PERP: &str = "ETHUSDT-PERP.BINANCE";

    struct TestVenue {
        exchange: SimulatedExchange,
        client: Rc<BacktestExecutionClient>,
        clock: Rc<RefCell<TestClock>>,
    }

    impl TestVenue {
        fn order_kinds(&self) -> Vec<&'static str> {
            self.client
                .order_events()
                .iter()
                .map(OrderEventAny::kind)
                .collect()
        }

        fn submit(&mut self, order: OrderAny, ts: u64) {
            self.exchange
                .send(TradingCommand::SubmitOrder(SubmitOrder::new(order, UnixNanos::from(ts))));
            self.exchange.process(UnixNanos::from(ts));
        }

        fn quote(&mut self, bid: &str, ask: &str, ts: u64) {
            let quote = QuoteTick::new(
                InstrumentId::from(ETHUSDT_PERP),
                Price::from(bid),
                Price::from(ask),
                Quantity::from(10),
                Quantity::from(10),
                UnixNanos::from(ts),
                UnixNanos::from(ts),
            );
            self.exchange.process_quote_tick(&quote);
        }
    }

    fn get_venue(oms_type: OmsType, fill_model: FillModel) -> TestVenue {
        let clock = Rc::new(RefCell::new(TestClock::new()));
        let clock_dyn: Rc<RefCell<dyn Clock>> = clock.clone();
        let cache = Rc::new(RefCell::new(Cache::default()));
        let mut exchange = SimulatedExchange::new(
            Venue::new("BINANCE"),
            oms_type,
            AccountType::Margin,
            vec![Money::from("10000.00000000 USDT")],
            None,
            dec!(10),
            IndexMap::new(),
            vec![InstrumentAny::CryptoPerpetual(crypto_perpetual_ethusdt())],
            cache.clone(),
            clock_dyn,
            fill_model,
            FeeModelAny::default(),
            BookType::L1_TBBO,
            None,
            false,
            true,
            true,
            true,
            true,
            true,
        )
        .unwrap();

        let client = Rc::new(BacktestExecutionClient::new(
            TraderId::default(),
            AccountId::from("BINANCE-001"),
            Venue::new("BINANCE"),
            AccountType::Margin,
            None,
            cache,
            false,
        ));
        exchange.register_client(client.clone());
        exchange.initialize_account();

        TestVenue {
            exchange,
            client,
            clock,
        }
    }

    fn certain_fill_model() -> FillModel {
        FillModel::new(1.0, 1.0, 0.0, Some(42)).unwrap()
    }

    #[rstest]
    fn test_empty_starting_balances_invalid() {
        let clock: Rc<RefCell<dyn Clock>> = Rc::new(RefCell::new(TestClock::new()));
        let result = SimulatedExchange::new(
            Venue::new("BINANCE"),
            OmsType::Netting,
            AccountType::Margin,
            vec![],
            None,
            dec!(1),
            IndexMap::new(),
            vec![InstrumentAny::CryptoPerpetual(crypto_perpetual_ethusdt())],
            Rc::new(RefCell::new(Cache::default())),
            clock,
            FillModel::default(),
            FeeModelAny::default(),
            BookType::L1_TBBO,
            None,
            false,
            true,
            true,
            true,
            true,
            true,
        );
        assert!(result.is_err());
    }

    #[rstest]
    fn test_single_currency_account_with_multiple_balances_invalid() {
        let clock: Rc<RefCell<dyn Clock>> = Rc::new(RefCell::new(TestClock::new()));
        let result = SimulatedExchange::new(
            Venue::new("BINANCE"),
            OmsType::Netting,
            AccountType::Margin,
            vec![Money::from("1000.00 USD"), Money::from("1.00000000 BTC")],
            Some(Currency::USD()),
            dec!(1),
            IndexMap::new(),
            vec![InstrumentAny::CryptoPerpetual(crypto_perpetual_ethusdt())],
            Rc::new(RefCell::new(Cache::default())),
            clock,
            FillModel::default(),
            FeeModelAny::default(),
            BookType::L1_TBBO,
            None,
            false,
            true,
            true,
            true,
            true,
            true,
        );
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("single-currency account has multiple starting currencies"));
    }

    #[rstest]
    fn test_cash_account_cannot_trade_perpetuals() {
        let clock: Rc<RefCell<dyn Clock>> = Rc::new(RefCell::new(TestClock::new()));
        let result = SimulatedExchange::new(
            Venue::new("BINANCE"),
            OmsType::Netting,
            AccountType::Cash,
            vec![Money::from("10000.00000000 USDT")],
            None,
            dec!(1),
            IndexMap::new(),
            vec![InstrumentAny::CryptoPerpetual(crypto_perpetual_ethusdt())],
            Rc::new(RefCell::new(Cache::default())),
            clock,
            FillModel::default(),
            FeeModelAny::default(),
            BookType::L1_TBBO,
            None,
            false,
            true,
            true,
            true,
            true,
            true,
        );
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Cash account cannot trade futures or perpetuals"));
    }

    #[rstest]
    #[should_panic(expected = "'Venue of instrument id' value of SIM")]
    fn test_venue_mismatch_between_exchange_and_instrument() {
        let clock: Rc<RefCell<dyn Clock>> = Rc::new(RefCell::new(TestClock::new()));
        let _ = SimulatedExchange::new(
            Venue::new("BINANCE"),
            OmsType::Netting,
            AccountType::Margin,
            vec![Money::from("1000.00 USD")],
            None,
            dec!(1),
            IndexMap::new(),
            vec![InstrumentAny::CurrencyPair(currency_pair_audusd())],
            Rc::new(RefCell::new(Cache::default())),
            clock,
            FillModel::default(),
            FeeModelAny::default(),
            BookType::L1_TBBO,
            None,
            false,
            true,
            true,
            true,
            true,
            true,
        );
    }

    #[rstest]
    fn test_initialize_account_applies_leverages() {
        let mut leverages = IndexMap::new();
        leverages.insert(InstrumentId::from(ETHUSDT_PERP), dec!(20));
        let clock: Rc<RefCell<dyn Clock>> = Rc::new(RefCell::new(TestClock::new()));
        let cache = Rc::new(RefCell::new(Cache::default()));
        let mut exchange = SimulatedExchange::new(
            Venue::new("BINANCE"),
            OmsType::Netting,
            AccountType::Margin,
            vec![Money::from("10000.00000000 USDT")],
            None,
            dec!(10),
            leverages,
            vec![InstrumentAny::CryptoPerpetual(crypto_perpetual_ethusdt())],
            cache.clone(),
            clock,
            FillModel::default(),
            FeeModelAny::default(),
            BookType::L1_TBBO,
            None,
            false,
            true,
            true,
            true,
            true,
            true,
        )
        .unwrap();
        let client = Rc::new(BacktestExecutionClient::new(
            TraderId::default(),
            AccountId::from("BINANCE-001"),
            Venue::new("BINANCE"),
            AccountType::Margin,
            None,
            cache,
            false,
        ));
        exchange.register_client(client.clone());
        exchange.initialize_account();

        let account = exchange.get_account().unwrap();
        assert_eq!(account.default_leverage, dec!(10));
        assert_eq!(account.leverage(&InstrumentId::from(ETHUSDT_PERP)), dec!(20));
        let balance = account.balance(Some(Currency::USDT())).copied().unwrap();
        assert_eq!(balance.total, Money::from("10000.00000000 USDT"));
        assert_eq!(balance.locked, Money::from("0.00000000 USDT"));
        assert_eq!(client.events().len(), 1);
    }

    #[rstest]
    fn test_adjust_account() {
        let mut venue = get_venue(OmsType::Netting, FillModel::default());
        venue.exchange.adjust_account(Money::from("500.00000000 USDT"));

        let account = venue.exchange.get_account().unwrap();
        let balance = account.balance(Some(Currency::USDT())).copied().unwrap();
        assert_eq!(balance.total, Money::from("10500.00000000 USDT"));
        assert_eq!(balance.free, Money::from("10500.00000000 USDT"));
        assert_eq!(venue.client.events().len(), 2);
    }

    #[rstest]
    fn test_adjust_account_unknown_currency_logged_not_thrown() {
        let mut venue = get_venue(OmsType::Netting, FillModel::default());
        venue.exchange.adjust_account(Money::from("500.00 USD"));
        // Only the initial account state was emitted
        assert_eq!(venue.client.events().len(), 1);
    }

    #[rstest]
    fn test_commands_processed_fifo() {
        let mut venue = get_venue(OmsType::Netting, certain_fill_model());
        venue.quote("99.00", "100.00", 1);

        for i in 1..=3 {
            let order = OrderTestBuilder::new(OrderType::Limit)
                .instrument_id(InstrumentId::from(ETHUSDT_PERP))
                .client_order_id(ClientOrderId::new(format!("O-{i}")))
                .side(OrderSide::Buy)
                .price(Price::from("98.00"))
                .quantity(Quantity::from("1.000"))
                .build();
            venue
                .exchange
                .send(TradingCommand::SubmitOrder(SubmitOrder::new(order, UnixNanos::from(2))));
        }
        venue.exchange.process(UnixNanos::from(2));

        let submitted: Vec<String> = venue
            .client
            .order_events()
            .iter()
            .filter_map(|event| match event {
                OrderEventAny::Submitted(event) => Some(event.client_order_id.to_string()),
                _ => None,
            })
            .collect();
        assert_eq!(submitted, vec!["O-1", "O-2", "O-3"]);
        assert_eq!(venue.exchange.get_open_orders(None).len(), 3);
    }

    #[rstest]
    fn test_crossing_limit_buy_fills_as_taker() {
        let mut venue = get_venue(OmsType::Netting, certain_fill_model());
        venue.quote("99.00", "100.00", 1);

        let order = OrderTestBuilder::new(OrderType::Limit)
            .instrument_id(InstrumentId::from(ETHUSDT_PERP))
            .side(OrderSide::Buy)
            .price(Price::from("101.00"))
            .quantity(Quantity::from("10.000"))
            .build();
        venue.submit(order, 2);

        assert_eq!(
            venue.order_kinds(),
            vec!["OrderSubmitted", "OrderAccepted", "OrderFilled"]
        );
        match venue.client.order_events().last().unwrap() {
            OrderEventAny::Filled(fill) => {
                assert_eq!(fill.last_px, Price::from("100.00"));
                assert_eq!(fill.last_qty, Quantity::from("10.000"));
                assert_eq!(fill.liquidity_side, LiquiditySide::Taker);
            }
            event => panic!("Unexpected event {event}"),
        }
    }

    #[rstest]
    fn test_post_only_rejection_on_modify() {
        let mut venue = get_venue(OmsType::Netting, certain_fill_model());
        venue.quote("100.50", "100.80", 1);

        // Working limit sell above the market
        let order = OrderTestBuilder::new(OrderType::Limit)
            .instrument_id(InstrumentId::from(ETHUSDT_PERP))
            .client_order_id(ClientOrderId::new("O-1"))
            .side(OrderSide::Sell)
            .price(Price::from("101.00"))
            .post_only(true)
            .quantity(Quantity::from("5.000"))
            .build();
        venue.submit(order, 2);
        assert_eq!(venue.order_kinds(), vec!["OrderSubmitted", "OrderAccepted"]);

        // A modify down to the bid would take liquidity
        venue.exchange.send(TradingCommand::ModifyOrder(ModifyOrder {
            trader_id: TraderId::default(),
            strategy_id: StrategyId::default(),
            instrument_id: InstrumentId::from(ETHUSDT_PERP),
            client_order_id: ClientOrderId::new("O-1"),
            quantity: None,
            price: Some(Price::from("100.50")),
            trigger_price: None,
            ts_init: UnixNanos::from(3),
        }));
        venue.exchange.process(UnixNanos::from(3));

        assert_eq!(
            venue.order_kinds(),
            vec![
                "OrderSubmitted",
                "OrderAccepted",
                "OrderPendingUpdate",
                "OrderModifyRejected"
            ]
        );
        let events = venue.client.order_events();
        assert!(events.last().unwrap().reason().unwrap().contains("POST_ONLY"));

        // The order still works at its original price
        let engine = venue
            .exchange
            .get_matching_engine(&InstrumentId::from(ETHUSDT_PERP))
            .unwrap();
        let order = engine.get_order(&ClientOrderId::new("O-1")).unwrap();
        assert_eq!(marketsim_model::orders::Order::price(order), Some(Price::from("101.00")));
        assert_eq!(engine.get_open_ask_orders().len(), 1);
    }

    #[rstest]
    fn test_cancel_order() {
        let mut venue = get_venue(OmsType::Netting, certain_fill_model());
        venue.quote("99.00", "100.00", 1);

        let order = OrderTestBuilder::new(OrderType::Limit)
            .instrument_id(InstrumentId::from(ETHUSDT_PERP))
            .client_order_id(ClientOrderId::new("O-1"))
            .side(OrderSide::Buy)
            .price(Price::from("98.00"))
            .quantity(Quantity::from("1.000"))
            .build();
        venue.submit(order, 2);

        venue.exchange.send(TradingCommand::CancelOrder(CancelOrder {
            trader_id: TraderId::default(),
            strategy_id: StrategyId::default(),
            instrument_id: InstrumentId::from(ETHUSDT_PERP),
            client_order_id: ClientOrderId::new("O-1"),
            ts_init: UnixNanos::from(3),
        }));
        venue.exchange.process(UnixNanos::from(3));

        assert_eq!(
            venue.order_kinds(),
            vec![
                "OrderSubmitted",
                "OrderAccepted",
                "OrderPendingCancel",
                "OrderCanceled"
            ]
        );
        assert!(venue.exchange.get_open_orders(None).is_empty());
    }

    #[rstest]
    fn test_reduce_only_clips_to_position() {
        let mut venue = get_venue(OmsType::Netting, certain_fill_model());
        venue.quote("99.50", "100.00", 1);

        // Open a long position of 5
        let order = OrderTestBuilder::new(OrderType::Market)
            .instrument_id(InstrumentId::from(ETHUSDT_PERP))
            .client_order_id(ClientOrderId::new("O-1"))
            .side(OrderSide::Buy)
            .quantity(Quantity::from("5.000"))
            .build();
        venue.submit(order, 2);

        // Oversized reduce-only exit clips to the position quantity
        let order = OrderTestBuilder::new(OrderType::Market)
            .instrument_id(InstrumentId::from(ETHUSDT_PERP))
            .client_order_id(ClientOrderId::new("O-2"))
            .side(OrderSide::Sell)
            .reduce_only(true)
            .quantity(Quantity::from("8.000"))
            .build();
        venue.submit(order, 3);

        let events: Vec<OrderEventAny> = venue
            .client
            .order_events()
            .into_iter()
            .filter(|event| event.client_order_id() == ClientOrderId::new("O-2"))
            .collect();
        let kinds: Vec<&str> = events.iter().map(OrderEventAny::kind).collect();
        assert_eq!(kinds, vec!["OrderSubmitted", "OrderUpdated", "OrderFilled"]);
        match &events[1] {
            OrderEventAny::Updated(updated) => {
                assert_eq!(updated.quantity, Quantity::from("5.000"));
            }
            event => panic!("Unexpected event {event}"),
        }
        match &events[2] {
            OrderEventAny::Filled(fill) => {
                assert_eq!(fill.last_qty, Quantity::from("5.000"));
                assert_eq!(fill.liquidity_side, LiquiditySide::Taker);
            }
            event => panic!("Unexpected event {event}"),
        }

        assert!(venue.exchange.get_open_orders(None).is_empty());
    }

    #[rstest]
    fn test_reduce_only_submit_without_position_rejected() {
        let mut venue = get_venue(OmsType::Netting, certain_fill_model());
        venue.quote("99.50", "100.00", 1);

        let order = OrderTestBuilder::new(OrderType::Market)
            .instrument_id(InstrumentId::from(ETHUSDT_PERP))
            .side(OrderSide::Sell)
            .reduce_only(true)
            .quantity(Quantity::from("1.000"))
            .build();
        venue.submit(order, 2);

        assert_eq!(venue.order_kinds(), vec!["OrderSubmitted", "OrderRejected"]);
        let events = venue.client.order_events();
        assert!(events[1].reason().unwrap().contains("REDUCE_ONLY"));
        assert!(events[1].reason().unwrap().contains("would have increased position"));
    }

    #[rstest]
    fn test_oco_sibling_canceled_on_fill() {
        let mut venue = get_venue(OmsType::Netting, certain_fill_model());
        venue.quote("99.50", "100.00", 1);

        let entry = ClientOrderId::new("O-ENTRY");
        let stop = ClientOrderId::new("O-STOP");
        let limit_order = OrderTestBuilder::new(OrderType::Limit)
            .instrument_id(InstrumentId::from(ETHUSDT_PERP))
            .client_order_id(entry)
            .side(OrderSide::Buy)
            .price(Price::from("99.00"))
            .quantity(Quantity::from("10.000"))
            .contingency_type(ContingencyType::Oco)
            .linked_order_ids(vec![stop])
            .build();
        let stop_order = OrderTestBuilder::new(OrderType::StopMarket)
            .instrument_id(InstrumentId::from(ETHUSDT_PERP))
            .client_order_id(stop)
            .side(OrderSide::Buy)
            .trigger_price(Price::from("101.00"))
            .quantity(Quantity::from("10.000"))
            .contingency_type(ContingencyType::Oco)
            .linked_order_ids(vec![entry])
            .build();
        venue.exchange.send(TradingCommand::SubmitOrderList(SubmitOrderList::new(
            vec![limit_order, stop_order],
            UnixNanos::from(2),
        )));
        venue.exchange.process(UnixNanos::from(2));
        assert_eq!(venue.exchange.get_open_orders(None).len(), 2);

        // The market trades down through the limit: it fills completely and
        // the linked stop is canceled
        venue.quote("98.00", "98.50", 3);

        let events = venue.client.order_events();
        let kinds: Vec<(&str, ClientOrderId)> = events
            .iter()
            .map(|event| (event.kind(), event.client_order_id()))
            .collect();
        assert!(kinds.contains(&("OrderFilled", entry)));
        assert!(kinds.contains(&("OrderCanceled", stop)));
        assert!(venue.exchange.get_open_orders(None).is_empty());
    }

    #[rstest]
    fn test_oto_parent_rejected_rejects_child() {
        let mut venue = get_venue(OmsType::Netting, certain_fill_model());
        // No market data: the parent market order has no market

        let parent = ClientOrderId::new("O-PARENT");
        let child = ClientOrderId::new("O-CHILD");
        let parent_order = OrderTestBuilder::new(OrderType::Market)
            .instrument_id(InstrumentId::from(ETHUSDT_PERP))
            .client_order_id(parent)
            .side(OrderSide::Sell)
            .quantity(Quantity::from("1.000"))
            .contingency_type(ContingencyType::Oto)
            .linked_order_ids(vec![child])
            .build();
        let child_order = OrderTestBuilder::new(OrderType::Limit)
            .instrument_id(InstrumentId::from(ETHUSDT_PERP))
            .client_order_id(child)
            .side(OrderSide::Buy)
            .price(Price::from("99.00"))
            .quantity(Quantity::from("1.000"))
            .parent_order_id(parent)
            .build();
        venue.exchange.send(TradingCommand::SubmitOrderList(SubmitOrderList::new(
            vec![parent_order, child_order],
            UnixNanos::from(1),
        )));
        venue.exchange.process(UnixNanos::from(1));

        let events = venue.client.order_events();
        let parent_reject = events
            .iter()
            .find(|e| matches!(e, OrderEventAny::Rejected(_)) && e.client_order_id() == parent)
            .unwrap();
        assert!(parent_reject.reason().unwrap().contains("No market for"));

        let child_reject = events
            .iter()
            .find(|e| matches!(e, OrderEventAny::Rejected(_)) && e.client_order_id() == child)
            .unwrap();
        assert!(child_reject.reason().unwrap().contains("REJECT OTO from O-PARENT"));
    }

    #[rstest]
    fn test_oto_child_held_until_parent_fills() {
        let mut venue = get_venue(OmsType::Netting, certain_fill_model());
        venue.quote("99.50", "100.00", 1);

        let parent = ClientOrderId::new("O-PARENT");
        let child = ClientOrderId::new("O-CHILD");
        let parent_order = OrderTestBuilder::new(OrderType::Limit)
            .instrument_id(InstrumentId::from(ETHUSDT_PERP))
            .client_order_id(parent)
            .side(OrderSide::Buy)
            .price(Price::from("99.00"))
            .quantity(Quantity::from("1.000"))
            .contingency_type(ContingencyType::Oto)
            .linked_order_ids(vec![child])
            .build();
        let child_order = OrderTestBuilder::new(OrderType::Limit)
            .instrument_id(InstrumentId::from(ETHUSDT_PERP))
            .client_order_id(child)
            .side(OrderSide::Sell)
            .price(Price::from("102.00"))
            .quantity(Quantity::from("1.000"))
            .parent_order_id(parent)
            .build();
        venue.exchange.send(TradingCommand::SubmitOrderList(SubmitOrderList::new(
            vec![parent_order, child_order],
            UnixNanos::from(2),
        )));
        venue.exchange.process(UnixNanos::from(2));

        // The child is submitted but held dark while the parent works
        assert_eq!(
            venue.order_kinds(),
            vec![
                "OrderSubmitted",
                "OrderAccepted",
                "OrderSubmitted"
            ]
        );
        assert_eq!(venue.exchange.get_open_orders(None).len(), 1);

        // Parent fills, which releases the child into the market
        venue.quote("98.00", "98.50", 3);

        let events = venue.client.order_events();
        let kinds: Vec<(&str, ClientOrderId)> = events
            .iter()
            .map(|event| (event.kind(), event.client_order_id()))
            .collect();
        assert!(kinds.contains(&("OrderFilled", parent)));
        assert!(kinds.contains(&("OrderAccepted", child)));
        assert_eq!(venue.exchange.get_open_orders(None), vec![child]);
    }

    #[rstest]
    fn test_l1_slippage_shifts_fill_price() {
        let fill_model = FillModel::new(1.0, 1.0, 1.0, Some(42)).unwrap();
        let mut venue = get_venue(OmsType::Netting, fill_model);
        venue.quote("99.50", "100.00", 1);

        let order = OrderTestBuilder::new(OrderType::Market)
            .instrument_id(InstrumentId::from(ETHUSDT_PERP))
            .side(OrderSide::Buy)
            .quantity(Quantity::from("1.000"))
            .build();
        venue.submit(order, 2);

        match venue.client.order_events().last().unwrap() {
            OrderEventAny::Filled(fill) => {
                // One tick against the trader
                assert_eq!(fill.last_px, Price::from("100.01"));
            }
            event => panic!("Unexpected event {event}"),
        }
    }

    #[rstest]
    fn test_latency_model_defers_commands() {
        let mut venue = get_venue(OmsType::Netting, certain_fill_model());
        venue.exchange.set_latency_model(LatencyModel::new(100, 200, 300, 100));
        venue.quote("99.00", "100.00", 1);

        let order = OrderTestBuilder::new(OrderType::Limit)
            .instrument_id(InstrumentId::from(ETHUSDT_PERP))
            .side(OrderSide::Buy)
            .price(Price::from("98.00"))
            .quantity(Quantity::from("1.000"))
            .build();
        venue.exchange.send(TradingCommand::SubmitOrder(SubmitOrder::new(
            order,
            UnixNanos::from(100),
        )));

        // Insert latency of 200ns: not yet visible at 250
        venue.exchange.process(UnixNanos::from(250));
        assert!(venue.order_kinds().is_empty());

        // Processed once the latency has elapsed
        venue.exchange.process(UnixNanos::from(300));
        assert_eq!(venue.order_kinds(), vec!["OrderSubmitted", "OrderAccepted"]);
    }

    #[rstest]
    fn test_reset_replay_produces_identical_events() {
        let mut venue = get_venue(OmsType::Netting, FillModel::new(0.5, 0.5, 0.1, Some(7)).unwrap());

        let run = |venue: &mut TestVenue| {
            venue.quote("99.50", "100.00", 1);
            let order = OrderTestBuilder::new(OrderType::Limit)
                .instrument_id(InstrumentId::from(ETHUSDT_PERP))
                .client_order_id(ClientOrderId::new("O-1"))
                .side(OrderSide::Buy)
                .price(Price::from("100.50"))
                .quantity(Quantity::from("2.000"))
                .build();
            venue.submit(order, 2);
            let order = OrderTestBuilder::new(OrderType::StopMarket)
                .instrument_id(InstrumentId::from(ETHUSDT_PERP))
                .client_order_id(ClientOrderId::new("O-2"))
                .side(OrderSide::Buy)
                .trigger_price(Price::from("101.00"))
                .quantity(Quantity::from("1.000"))
                .build();
            venue.submit(order, 3);
            venue.quote("100.90", "101.20", 4);
            venue.quote("101.00", "101.30", 5);
        };

        run(&mut venue);
        let first_events = venue.client.events();
        assert!(!first_events.is_empty());

        // Reset everything and replay the identical stream with the same seed
        venue.exchange.reset();
        venue.exchange.set_fill_model(FillModel::new(0.5, 0.5, 0.1, Some(7)).unwrap());
        venue.clock.borrow_mut().reset();
        venue.client.reset();
        venue.exchange.initialize_account();

        run(&mut venue);
        let second_events: Vec<ExecutionEvent> = venue.client.events();

        assert_eq!(first_events, second_events);
    }
}
