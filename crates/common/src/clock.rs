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

//! A monotonic simulated clock driven from incoming data timestamps.

use std::fmt::Debug;

use marketsim_core::UnixNanos;

/// A read/write clock abstraction for components which stamp emitted events.
pub trait Clock: Debug {
    /// Returns the current UNIX timestamp (nanoseconds).
    fn timestamp_ns(&self) -> UnixNanos;

    /// Sets the clock to the given UNIX timestamp (nanoseconds).
    ///
    /// # Panics
    ///
    /// Panics if `to_time_ns` is before the current clock time.
    fn set_time(&mut self, to_time_ns: UnixNanos);
}

/// A static test clock which advances only when told to.
///
/// Time is non-decreasing: the backtest loop sets the clock from each data
/// event's `ts_event` before any matching occurs, so every emitted event for
/// a given timestamp carries that timestamp.
#[derive(Debug, Default)]
pub struct TestClock {
    time: UnixNanos,
}

impl TestClock {
    /// Creates a new [`TestClock`] instance at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets the clock to time zero (for replaying a data stream).
    pub fn reset(&mut self) {
        self.time = UnixNanos::default();
    }
}

impl Clock for TestClock {
    fn timestamp_ns(&self) -> UnixNanos {
        self.time
    }

    fn set_time(&mut self, to_time_ns: UnixNanos) {
        assert!(
            to_time_ns >= self.time,
            "`to_time_ns` {to_time_ns} was < current clock time {}",
            self.time,
        );
        self.time = to_time_ns;
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
    fn test_set_time_advances() {
        let mut clock = TestClock::new();
        assert_eq!(clock.timestamp_ns(), 0);

        clock.set_time(UnixNanos::from(100));
        assert_eq!(clock.timestamp_ns(), 100);

        // Equal timestamps are allowed
        clock.set_time(UnixNanos::from(100));
        assert_eq!(clock.timestamp_ns(), 100);
    }

    #[rstest]
    #[should_panic(expected = "was < current clock time")]
    fn test_set_time_backwards_panics() {
        let mut clock = TestClock::new();
        clock.set_time(UnixNanos::from(100));
        clock.set_time(UnixNanos::from(50));
    }
}
