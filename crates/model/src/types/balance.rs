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

//! Represents account balances in a specified currency.

use std::fmt::Display;

use marketsim_core::correctness::{check_predicate_true, FAILED};
use serde::{Deserialize, Serialize};

use super::{currency::Currency, money::Money};

/// Represents an account balance denominated in a particular currency.
///
/// The identity `total = locked + free` holds for any balance.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// The total account balance.
    pub total: Money,
    /// The account balance locked (assigned to pending orders).
    pub locked: Money,
    /// The account balance free for trading.
    pub free: Money,
    /// The currency of the balance.
    pub currency: Currency,
}

impl AccountBalance {
    /// Creates a new [`AccountBalance`] instance.
    ///
    /// # Panics
    ///
    /// Panics if the currencies differ or `total != locked + free`.
    pub fn new(total: Money, locked: Money, free: Money) -> Self {
        check_predicate_true(
            total.currency == locked.currency && total.currency == free.currency,
            "account balance currencies must match",
        )
        .expect(FAILED);
        check_predicate_true(
            total == locked + free,
            &format!("total balance {total} was not equal to locked {locked} + free {free}"),
        )
        .expect(FAILED);

        Self {
            total,
            locked,
            free,
            currency: total.currency,
        }
    }
}

impl Display for AccountBalance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}(total={}, locked={}, free={})",
            stringify!(AccountBalance),
            self.total,
            self.locked,
            self.free,
        )
    }
}
