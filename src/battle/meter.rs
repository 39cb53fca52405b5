//! Pulse: the per-turn action-point meter.

use serde::{Deserialize, Serialize};

/// Bounded per-turn currency. `current` stays within `[0, max]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceMeter {
    current: i32,
    max: i32,
}

impl ResourceMeter {
    /// Full meter. A negative `max` is treated as zero.
    #[must_use]
    pub fn new(max: i32) -> Self {
        let max = max.max(0);
        Self { current: max, max }
    }

    #[must_use]
    pub fn current(&self) -> i32 {
        self.current
    }

    #[must_use]
    pub fn max(&self) -> i32 {
        self.max
    }

    /// Spend `amount` if affordable. Otherwise nothing changes.
    ///
    /// Spending zero always succeeds.
    pub fn try_spend(&mut self, amount: i32) -> bool {
        if amount <= 0 {
            return true;
        }
        if self.current < amount {
            return false;
        }
        self.current -= amount;
        true
    }

    /// Add pulse, clamped to the maximum.
    pub fn gain(&mut self, amount: i32) {
        if amount <= 0 {
            return;
        }
        self.current = self.current.saturating_add(amount).min(self.max);
    }

    pub fn reset_for_new_turn(&mut self) {
        self.current = self.max;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_spend_and_reject() {
        let mut meter = ResourceMeter::new(3);
        assert!(meter.try_spend(2));
        assert_eq!(meter.current(), 1);
        assert!(!meter.try_spend(2));
        assert_eq!(meter.current(), 1);
        assert!(meter.try_spend(0));
        assert_eq!(meter.current(), 1);
    }

    #[test]
    fn test_gain_clamps() {
        let mut meter = ResourceMeter::new(3);
        meter.try_spend(3);
        meter.gain(5);
        assert_eq!(meter.current(), 3);
        meter.gain(-1);
        assert_eq!(meter.current(), 3);
    }

    #[test]
    fn test_reset() {
        let mut meter = ResourceMeter::new(4);
        meter.try_spend(4);
        meter.reset_for_new_turn();
        assert_eq!(meter.current(), 4);
    }

    proptest! {
        #[test]
        fn prop_meter_stays_in_bounds(
            max in 0i32..10,
            ops in prop::collection::vec((any::<bool>(), 0i32..6), 0..40),
        ) {
            let mut meter = ResourceMeter::new(max);
            for (spend, amount) in ops {
                let before = meter.current();
                if spend {
                    let ok = meter.try_spend(amount);
                    prop_assert_eq!(ok, before >= amount);
                    prop_assert_eq!(meter.current(), if ok { before - amount } else { before });
                } else {
                    meter.gain(amount);
                }
                prop_assert!(meter.current() >= 0 && meter.current() <= max);
            }
        }
    }
}
