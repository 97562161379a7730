use models::{FinancialRecord, MonthSelection, RunwaySummary};

/// Projects "months of solvency" from the month-filtered base sets. A
/// positive result is a surplus duration, a negative one a deficit.
///
/// With no explicit month selection the average burn is taken over a
/// 12-month baseline. Degenerate divisions (no expenses at all) clamp the
/// projection to 0 instead of propagating a non-finite number.
pub fn project_runway(
    runway_expenses: &[FinancialRecord],
    runway_earnings: &[FinancialRecord],
    months: &MonthSelection,
) -> RunwaySummary {
    let total_expenses: f64 = runway_expenses.iter().map(|r| r.amount).sum();
    let total_earnings: f64 = runway_earnings.iter().map(|r| r.amount).sum();
    let profit_loss = total_earnings - total_expenses;

    let mut month_count = months.selected_count() as u32;
    if month_count == 0 {
        month_count = 12;
    }

    let mut avg_monthly_expense = total_expenses / f64::from(month_count);
    if !avg_monthly_expense.is_finite() {
        avg_monthly_expense = 1.0;
    }

    let ratio = profit_loss / avg_monthly_expense;
    let months_of_runway = if ratio.is_finite() {
        ratio.round() as i64
    } else {
        0
    };

    RunwaySummary {
        total_expenses,
        total_earnings,
        profit_loss,
        month_count,
        avg_monthly_expense,
        months_of_runway,
    }
}
