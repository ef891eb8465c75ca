//! Pure calculators for the financial metrics underwriting reads.
//!
//! Every function is total over its inputs, performs no I/O, and rounds
//! ratios and payment amounts to two decimals at the source so stored and
//! displayed figures always agree. Degenerate denominators (zero income,
//! zero property value) yield `0.0` instead of dividing by zero; intake
//! validation rejects such figures before they are persisted.

use chrono::{Datelike, NaiveDate};

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Loan amount as a percentage of property value.
pub fn loan_to_value(loan_amount: f64, property_value: f64) -> f64 {
    if property_value <= 0.0 {
        return 0.0;
    }
    round2(loan_amount / property_value * 100.0)
}

/// Level monthly repayment under the standard amortization formula.
///
/// The annual rate is a percentage (4.5 means 4.5% APR). A zero rate
/// degenerates to straight-line repayment over the term.
pub fn monthly_payment(loan_amount: f64, annual_rate: f64, term_years: u32) -> f64 {
    if term_years == 0 {
        return 0.0;
    }

    let payments = f64::from(term_years) * 12.0;
    let monthly_rate = annual_rate / 100.0 / 12.0;

    if monthly_rate == 0.0 {
        return round2(loan_amount / payments);
    }

    let growth = (1.0 + monthly_rate).powf(payments);
    if growth.is_infinite() {
        // Limit of the annuity formula as the term grows without bound.
        return round2(loan_amount * monthly_rate);
    }
    round2(loan_amount * (monthly_rate * growth) / (growth - 1.0))
}

/// Existing annual debt expressed as a monthly percentage of income.
pub fn debt_to_income_ratio(existing_debt: f64, monthly_income: f64) -> f64 {
    if monthly_income <= 0.0 {
        return 0.0;
    }
    round2((existing_debt / 12.0) / monthly_income * 100.0)
}

/// Monthly repayment as a percentage of monthly income.
pub fn affordability_ratio(monthly_payment: f64, monthly_income: f64) -> f64 {
    if monthly_income <= 0.0 {
        return 0.0;
    }
    round2(monthly_payment / monthly_income * 100.0)
}

/// Whole calendar months between `start` and `today`.
///
/// Partial months do not count until the day-of-month is reached. Missing
/// or future start dates yield zero.
pub fn employment_duration_months(start: Option<NaiveDate>, today: NaiveDate) -> u32 {
    let Some(start) = start else {
        return 0;
    };
    if start > today {
        return 0;
    }

    let mut months =
        (today.year() - start.year()) * 12 + today.month() as i32 - start.month() as i32;
    if today.day() < start.day() {
        months -= 1;
    }
    months.max(0) as u32
}
