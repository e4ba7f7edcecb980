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

//! Account state owned by the execution layer and mutated via `AccountState` events.

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    enums::AccountType,
    events::AccountState,
    identifiers::{AccountId, InstrumentId},
    types::{AccountBalance, Currency},
};

/// Represents an account at the venue, holding per-currency balances and,
/// for margin accounts, leverage configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Account {
    /// The account ID.
    pub id: AccountId,
    /// The account type.
    pub account_type: AccountType,
    /// The base currency (`None` for multi-currency accounts).
    pub base_currency: Option<Currency>,
    /// The per-currency balances (insertion ordered).
    pub balances: IndexMap<Currency, AccountBalance>,
    /// The default leverage applied to instruments without a specific leverage.
    pub default_leverage: Decimal,
    /// Specific leverages per instrument (insertion ordered).
    pub leverages: IndexMap<InstrumentId, Decimal>,
}

impl Account {
    /// Creates a new [`Account`] instance from an initial account state `event`.
    #[must_use]
    pub fn new(event: &AccountState) -> Self {
        let mut account = Self {
            id: event.account_id,
            account_type: event.account_type,
            base_currency: event.base_currency,
            balances: IndexMap::new(),
            default_leverage: Decimal::ONE,
            leverages: IndexMap::new(),
        };
        account.update_balances(&event.balances);
        account
    }

    /// Applies an account state `event`, replacing affected balances.
    pub fn apply(&mut self, event: &AccountState) {
        self.update_balances(&event.balances);
    }

    /// Returns the balance for the given `currency`, or the base currency
    /// balance when `currency` is `None`.
    #[must_use]
    pub fn balance(&self, currency: Option<Currency>) -> Option<&AccountBalance> {
        let currency = currency.or(self.base_currency)?;
        self.balances.get(&currency)
    }

    /// Returns all current balances.
    #[must_use]
    pub fn balances(&self) -> Vec<AccountBalance> {
        self.balances.values().copied().collect()
    }

    /// Sets the account default leverage.
    pub fn set_default_leverage(&mut self, leverage: Decimal) {
        self.default_leverage = leverage;
    }

    /// Sets a leverage for the given `instrument_id`.
    pub fn set_leverage(&mut self, instrument_id: InstrumentId, leverage: Decimal) {
        self.leverages.insert(instrument_id, leverage);
    }

    /// Returns the leverage in effect for the given `instrument_id`.
    #[must_use]
    pub fn leverage(&self, instrument_id: &InstrumentId) -> Decimal {
        self.leverages
            .get(instrument_id)
            .copied()
            .unwrap_or(self.default_leverage)
    }

    fn update_balances(&mut self, balances: &[AccountBalance]) {
        for balance in balances {
            self.balances.insert(balance.currency, *balance);
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use marketsim_core::UnixNanos;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::types::Money;

    fn account_state(total: &str) -> AccountState {
        let total = Money::from(total);
        AccountState::new(
            AccountId::from("SIM-001"),
            AccountType::Margin,
            None,
            vec![AccountBalance::new(total, Money::zero(total.currency), total)],
            true,
            UnixNanos::default(),
            UnixNanos::default(),
        )
    }

    #[rstest]
    fn test_new_from_event() {
        let account = Account::new(&account_state("1000.00 USD"));
        assert_eq!(account.id, AccountId::from("SIM-001"));
        let balance = account.balance(Some(Currency::USD())).unwrap();
        assert_eq!(balance.total, Money::from("1000.00 USD"));
        assert_eq!(account.balance(Some(Currency::ETH())), None);
    }

    #[rstest]
    fn test_apply_replaces_balance() {
        let mut account = Account::new(&account_state("1000.00 USD"));
        account.apply(&account_state("1500.00 USD"));
        let balance = account.balance(Some(Currency::USD())).unwrap();
        assert_eq!(balance.total, Money::from("1500.00 USD"));
        assert_eq!(account.balances.len(), 1);
    }

    #[rstest]
    fn test_leverages() {
        let mut account = Account::new(&account_state("1000.00 USD"));
        account.set_default_leverage(dec!(10));
        account.set_leverage(InstrumentId::from("AUD/USD.SIM"), dec!(20));

        assert_eq!(account.leverage(&InstrumentId::from("AUD/USD.SIM")), dec!(20));
        assert_eq!(account.leverage(&InstrumentId::from("EUR/USD.SIM")), dec!(10));
    }
}
