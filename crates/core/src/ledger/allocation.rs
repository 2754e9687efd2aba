//! Waterfall allocation engine.
//!
//! Pure decision logic: given a target amount and an ordered set of candidate
//! wallets, decide how much to draw from (or add to) each one. Deposits and
//! withdrawals share this engine and differ only in the capacity function and
//! eligibility predicate they pass in. Nothing here mutates anything.

use rust_decimal::Decimal;

use super::types::Wallet;

/// One wallet's share of an allocation.
#[derive(Debug, Clone)]
pub struct Allocation {
    /// The wallet drawn from or added to.
    pub wallet: Wallet,
    /// Amount allocated to it. Always positive.
    pub amount: Decimal,
}

/// Outcome of a waterfall run.
#[derive(Debug, Clone)]
pub struct AllocationPlan {
    /// Per-wallet shares in the order the wallets were offered.
    pub allocations: Vec<Allocation>,
    /// Amount no eligible wallet had capacity for.
    pub remaining: Decimal,
}

impl AllocationPlan {
    /// Sum of all allocated amounts.
    #[must_use]
    pub fn total_allocated(&self) -> Decimal {
        self.allocations.iter().map(|a| a.amount).sum()
    }

    /// Returns true when the full target was placed.
    #[must_use]
    pub fn is_fully_allocated(&self) -> bool {
        self.remaining.is_zero()
    }
}

/// Runs the waterfall.
///
/// Walks `wallets` in the order given (the caller's natural retrieval order
/// is a contract: the engine never re-sorts), skips wallets failing
/// `eligible`, and gives each eligible wallet `min(remaining, capacity)`.
/// A capacity of `None` means unbounded: the wallet absorbs everything left.
/// Stops as soon as the target is satisfied.
///
/// A non-positive target yields an empty plan with zero remaining.
pub fn allocate<C, E>(target: Decimal, wallets: &[Wallet], capacity: C, eligible: E) -> AllocationPlan
where
    C: Fn(&Wallet) -> Option<Decimal>,
    E: Fn(&Wallet) -> bool,
{
    if target <= Decimal::ZERO {
        return AllocationPlan { allocations: Vec::new(), remaining: Decimal::ZERO };
    }

    let mut remaining = target;
    let mut allocations = Vec::new();

    for wallet in wallets {
        if remaining <= Decimal::ZERO {
            break;
        }
        if !eligible(wallet) {
            continue;
        }

        let room = capacity(wallet).unwrap_or(remaining);
        let share = remaining.min(room);
        if share <= Decimal::ZERO {
            continue;
        }

        allocations.push(Allocation { wallet: wallet.clone(), amount: share });
        remaining -= share;
    }

    AllocationPlan { allocations, remaining }
}

/// Deposit-side capacity: the room left under a policy cap.
///
/// `None` (no cap configured for the type) leaves the wallet unbounded. A
/// wallet already at or over its cap has zero room.
#[must_use]
pub fn deposit_room(cap: Option<Decimal>, balance: Decimal) -> Option<Decimal> {
    cap.map(|c| (c - balance).max(Decimal::ZERO))
}

/// Withdrawal-side capacity: whatever the wallet holds.
#[must_use]
pub fn withdrawal_room(wallet: &Wallet) -> Option<Decimal> {
    Some(wallet.balance)
}
