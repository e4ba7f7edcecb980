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

//! Account state events.

use std::fmt::Display;

use marketsim_core::UnixNanos;
use serde::{Deserialize, Serialize};

use crate::{
    enums::AccountType,
    identifiers::AccountId,
    types::{AccountBalance, Currency},
};

/// An event which includes the current balances of an account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct AccountState {
    /// The account ID (the venue + account number).
    pub account_id: AccountId,
    /// The account type for the event.
    pub account_type: AccountType,
    /// The base currency of the account (`None` for multi-currency accounts).
    pub base_currency: Option<Currency>,
    /// The account balances per currency.
    pub balances: Vec<AccountBalance>,
    /// Whether the state was reported by the venue (as opposed to calculated).
    pub is_reported: bool,
    /// UNIX timestamp (nanoseconds) when the account state event occurred.
    pub ts_event: UnixNanos,
    /// UNIX timestamp (nanoseconds) when the struct was initialized.
    pub ts_init: UnixNanos,
}

impl AccountState {
    /// Creates a new [`AccountState`] instance.
    #[must_use]
    pub const fn new(
        account_id: AccountId,
        account_type: AccountType,
        base_currency: Option<Currency>,
        balances: Vec<AccountBalance>,
        is_reported: bool,
        ts_event: UnixNanos,
        ts_init: UnixNanos,
    ) -> Self {
        Self {
            account_id,
            account_type,
            base_currency,
            balances,
            is_reported,
            ts_event,
            ts_init,
        }
    }
}

impl Display for AccountState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}(account_id={}, account_type={}, base_currency={}, is_reported={}, balances=[{}])",
            stringify!(AccountState),
            self.account_id,
            self.account_type,
            self.base_currency.map_or_else(|| "None".to_string(), |c| c.to_string()),
            self.is_reported,
            self.balances.iter().map(ToString::to_string).collect::<Vec<String>>().join(","),
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
    use crate::types::Money;

    #[rstest]
    fn test_account_state_new() {
        let state = AccountState::new(
            AccountId::from("SIM-001"),
            AccountType::Margin,
            None,
            vec![AccountBalance::new(
                Money::from("1000.00 USD"),
                Money::from("0.00 USD"),
                Money::from("1000.00 USD"),
            )],
            true,
            UnixNanos::default(),
            UnixNanos::default(),
        );
        assert_eq!(state.balances.len(), 1);
        assert!(state.to_string().starts_with("AccountState(account_id=SIM-001"));
    }
}
