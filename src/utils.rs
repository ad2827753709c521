use crate::schema::Debt;
use chrono::{Datelike, Months, NaiveDate};

/// Balances at or below this are treated as paid off.
pub const CLEARED_EPSILON: f64 = 0.01;

/// Monthly interest rate for an APR fraction. Negative (or NaN) APRs accrue nothing.
pub fn monthly_rate(apr: f64) -> f64 {
    apr.max(0.0) / 12.0
}

pub fn total_balance(debts: &[Debt]) -> f64 {
    debts.iter().map(|d| d.balance.max(0.0)).sum()
}

/// Sum of minimum payments over debts that still carry a balance.
pub fn total_minimum_payments(debts: &[Debt]) -> f64 {
    debts
        .iter()
        .filter(|d| d.is_active())
        .map(|d| d.min_payment)
        .sum()
}

pub fn is_all_cleared(debts: &[Debt]) -> bool {
    debts.iter().all(|d| !d.is_active())
}

pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

pub fn month_end(date: NaiveDate) -> Option<NaiveDate> {
    last_day_of_month(date.year(), date.month())
}

/// Month end `months` months after the month containing `start`.
///
/// `months_after(2024-01-15, 1)` is 2024-02-29.
pub fn months_after(start: NaiveDate, months: u32) -> Option<NaiveDate> {
    let first = start.with_day(1)?;
    let shifted = first.checked_add_months(Months::new(months))?;
    month_end(shifted)
}

/// Formats an amount with thousands separators and no decimals, e.g. `₹12,346`.
pub fn format_currency(amount: f64, symbol: &str) -> String {
    let rounded = amount.abs().round() as u64;
    let digits = rounded.to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && rounded > 0 { "-" } else { "" };
    format!("{}{}{}", sign, symbol, grouped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_rate_clamps_negative() {
        assert!((monthly_rate(0.24) - 0.02).abs() < 1e-12);
        assert_eq!(monthly_rate(-0.1), 0.0);
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(
            last_day_of_month(2023, 2),
            NaiveDate::from_ymd_opt(2023, 2, 28)
        );
        assert_eq!(
            last_day_of_month(2024, 2),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert_eq!(
            last_day_of_month(2023, 12),
            NaiveDate::from_ymd_opt(2023, 12, 31)
        );
    }

    #[test]
    fn test_months_after() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(months_after(start, 0), NaiveDate::from_ymd_opt(2024, 1, 31));
        assert_eq!(months_after(start, 1), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(months_after(start, 12), NaiveDate::from_ymd_opt(2025, 1, 31));
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0, "₹"), "₹0");
        assert_eq!(format_currency(999.4, "$"), "$999");
        assert_eq!(format_currency(1234.5, "₹"), "₹1,235");
        assert_eq!(format_currency(1_234_567.0, "₹"), "₹1,234,567");
        assert_eq!(format_currency(-4500.0, "₹"), "-₹4,500");
    }

    #[test]
    fn test_minimums_skip_cleared_debts() {
        let debts = vec![
            Debt::new("A", 100.0, 0.1, 30.0),
            Debt::new("B", 0.0, 0.1, 20.0),
        ];
        assert!((total_minimum_payments(&debts) - 30.0).abs() < 1e-9);
        assert!(!is_all_cleared(&debts));
    }
}
