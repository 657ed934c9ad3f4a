use chrono::{DateTime, Utc};

use super::{Cents, round_half_away};

/// Derived interest figures for a transaction at a given instant.
/// Never persisted: two reads at different times yield different totals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterestBreakdown {
    /// Whole days elapsed since disbursement (clamped at zero)
    pub elapsed_days: i64,
    /// Elapsed time in 30-day months, full precision
    pub elapsed_months: f64,
    /// Accrued simple interest in cents, rounded half away from zero
    pub interest_cents: Cents,
    /// Principal plus rounded interest
    pub total_due_cents: Cents,
}

/// Compute monthly simple interest on a principal.
///
/// Formula: interest = principal * rate * months / 100, where months is
/// elapsed whole days over a 30-day-month approximation (not calendar
/// month boundaries). Interest is rounded to whole cents *before* being
/// added to the principal, so the total needs no second rounding.
///
/// A start date in the future clamps to zero elapsed days rather than
/// accruing negative interest. `now` is a parameter so callers own the
/// clock; the result must be recomputed on every read, never cached.
pub fn compute(
    principal_cents: Cents,
    monthly_rate_pct: f64,
    start_date: DateTime<Utc>,
    now: DateTime<Utc>,
) -> InterestBreakdown {
    let elapsed_days = (now - start_date).num_days().max(0);
    let elapsed_months = elapsed_days as f64 / 30.0;

    let raw_interest = principal_cents as f64 * monthly_rate_pct * elapsed_months / 100.0;
    let interest_cents = round_half_away(raw_interest);

    InterestBreakdown {
        elapsed_days,
        elapsed_months,
        interest_cents,
        total_due_cents: principal_cents + interest_cents,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn at(days_ago: i64) -> (DateTime<Utc>, DateTime<Utc>) {
        let now = Utc::now();
        (now - Duration::days(days_ago), now)
    }

    #[test]
    fn test_two_months_at_five_percent() {
        // 1000.00 at 5%/month for 60 days -> 100.00 interest, 1100.00 due
        let (start, now) = at(60);
        let b = compute(100_000, 5.0, start, now);

        assert_eq!(b.elapsed_days, 60);
        assert_eq!(b.elapsed_months, 2.0);
        assert_eq!(b.interest_cents, 10_000);
        assert_eq!(b.total_due_cents, 110_000);
    }

    #[test]
    fn test_zero_rate_accrues_nothing() {
        for days in [0, 1, 30, 365, 10_000] {
            let (start, now) = at(days);
            let b = compute(50_000, 0.0, start, now);
            assert_eq!(b.interest_cents, 0);
            assert_eq!(b.total_due_cents, 50_000);
        }
    }

    #[test]
    fn test_zero_elapsed_time() {
        let now = Utc::now();
        let b = compute(100_000, 5.0, now, now);
        assert_eq!(b.elapsed_days, 0);
        assert_eq!(b.interest_cents, 0);
        assert_eq!(b.total_due_cents, 100_000);
    }

    #[test]
    fn test_partial_days_floor_to_whole_days() {
        let now = Utc::now();
        let start = now - Duration::days(10) - Duration::hours(23);
        let b = compute(100_000, 5.0, start, now);
        assert_eq!(b.elapsed_days, 10);
    }

    #[test]
    fn test_compute_clamps_future_start() {
        // Future-dated disbursement: no accrual instead of negative interest
        let now = Utc::now();
        let start = now + Duration::days(15);
        let b = compute(100_000, 5.0, start, now);

        assert_eq!(b.elapsed_days, 0);
        assert_eq!(b.elapsed_months, 0.0);
        assert_eq!(b.interest_cents, 0);
        assert_eq!(b.total_due_cents, 100_000);
    }

    #[test]
    fn test_interest_is_monotonic_in_time() {
        let principal = 123_456;
        let rate = 7.5;
        let start = Utc::now();

        let mut previous = 0;
        for days in 0..400 {
            let now = start + Duration::days(days);
            let b = compute(principal, rate, start, now);
            assert!(
                b.interest_cents >= previous,
                "interest regressed at day {}: {} < {}",
                days,
                b.interest_cents,
                previous
            );
            previous = b.interest_cents;
        }
    }

    #[test]
    fn test_half_cent_rounds_away_from_zero() {
        // 300 * 5 * (1/30) / 100 = 0.5 -> 1 cent
        let (start, now) = at(1);
        assert_eq!(compute(300, 5.0, start, now).interest_cents, 1);

        // 900 * 5 * (1/30) / 100 = 1.5 -> 2 cents
        assert_eq!(compute(900, 5.0, start, now).interest_cents, 2);
    }

    #[test]
    fn test_interest_rounded_before_addition() {
        // 350 * 5 * (1/30) / 100 = 0.5833... -> 1 cent, total 351
        let (start, now) = at(1);
        let b = compute(350, 5.0, start, now);
        assert_eq!(b.interest_cents, 1);
        assert_eq!(b.total_due_cents, 351);
    }
}
