//! The shared budget progress computation.
//!
//! Every place that shows budget progress (the budgets page, the dashboard
//! and the API) derives spent/remaining/percentage through [compute] so the
//! numbers cannot drift apart.

use rusqlite::Connection;
use serde::Serialize;
use time::{Date, Duration};

use crate::{
    Error,
    budget::{Budget, BudgetId, Period, get_budgets},
    category::CategoryId,
    transaction::query::sum_for_category,
    user::UserID,
};

/// The start of the date window for a budget of `period`, relative to
/// `today`. The window end is always today.
pub fn period_start(period: Period, today: Date) -> Date {
    match period {
        Period::Daily => today,
        Period::Weekly => {
            today - Duration::days(today.weekday().number_days_from_monday() as i64)
        }
        Period::Monthly => today.replace_day(1).unwrap_or(today),
    }
}

/// The derived progress fields of a budget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progress {
    /// The summed transaction amounts for the budget's category this period.
    pub spent: f64,
    /// `amount - spent`; negative when the budget is blown.
    pub remaining: f64,
    /// `spent / amount * 100`, or 0 when the amount is 0 so a zero budget can
    /// never cause a division error.
    pub percentage: f64,
}

/// Derive progress fields from an amount spent and a budget cap.
pub fn compute(spent: f64, amount: f64) -> Progress {
    let percentage = if amount > 0.0 {
        spent / amount * 100.0
    } else {
        0.0
    };

    Progress {
        spent,
        remaining: amount - spent,
        percentage,
    }
}

/// A budget joined with its category name and derived progress, for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetProgress {
    /// The budget's ID in the application database.
    pub id: BudgetId,
    /// The category the cap applies to.
    pub category_id: CategoryId,
    /// The name of the category.
    pub category_name: String,
    /// The maximum amount to spend per period.
    pub amount: f64,
    /// How often the budget resets.
    pub period: Period,
    /// The derived progress for the current period.
    #[serde(flatten)]
    pub progress: Progress,
}

/// Compute the progress of every budget owned by `user_id` as of `today`.
pub fn get_budget_progress(
    user_id: UserID,
    today: Date,
    connection: &Connection,
) -> Result<Vec<BudgetProgress>, Error> {
    get_budgets(user_id, connection)?
        .into_iter()
        .map(|budget| budget_progress(budget, user_id, today, connection))
        .collect()
}

fn budget_progress(
    budget: Budget,
    user_id: UserID,
    today: Date,
    connection: &Connection,
) -> Result<BudgetProgress, Error> {
    let start = period_start(budget.period, today);
    let spent = sum_for_category(user_id, budget.category_id, start, today, connection)?;
    let category_name = connection.query_row(
        "SELECT name FROM category WHERE id = ?1",
        [budget.category_id],
        |row| row.get(0),
    )?;

    Ok(BudgetProgress {
        id: budget.id,
        category_id: budget.category_id,
        category_name,
        amount: budget.amount,
        period: budget.period,
        progress: compute(spent, budget.amount),
    })
}



#[cfg(test)]
mod budget_progress_tests {
    use time::macros::date;

    use crate::{
        budget::{NewBudget, Period, create_budget},
        category::{CategoryName, CategoryType, create_category},
        test_utils::{create_test_user, get_test_connection},
        transaction::{NewTransaction, create_transaction},
    };

    use super::get_budget_progress;

    #[test]
    fn spent_only_counts_the_current_period() {
        let connection = get_test_connection();
        let user = create_test_user(&connection, "jane");
        let category = create_category(
            CategoryName::new_unchecked("Takeaways"),
            CategoryType::Expense,
            Some(user.id),
            &connection,
        )
        .unwrap();
        create_budget(
            NewBudget {
                user_id: user.id,
                category_id: category.id,
                amount: 200.0,
                period: Period::Monthly,
            },
            &connection,
        )
        .unwrap();

        for (amount, date) in [
            (30.0, date!(2026 - 08 - 05)),
            (20.0, date!(2026 - 08 - 20)),
            // Last month, outside the window.
            (99.0, date!(2026 - 07 - 28)),
        ] {
            create_transaction(
                NewTransaction {
                    user_id: user.id,
                    amount,
                    category_id: Some(category.id),
                    description: "".to_owned(),
                    date,
                },
                &connection,
            )
            .unwrap();
        }

        let progress = get_budget_progress(user.id, date!(2026 - 08 - 28), &connection).unwrap();

        assert_eq!(progress.len(), 1);
        assert_eq!(progress[0].category_name, "Takeaways");
        assert_eq!(progress[0].progress.spent, 50.0);
        assert_eq!(progress[0].progress.remaining, 150.0);
        assert_eq!(progress[0].progress.percentage, 25.0);
    }

    #[test]
    fn other_categories_do_not_count() {
        let connection = get_test_connection();
        let user = create_test_user(&connection, "jane");
        let budgeted = create_category(
            CategoryName::new_unchecked("Takeaways"),
            CategoryType::Expense,
            Some(user.id),
            &connection,
        )
        .unwrap();
        let other = create_category(
            CategoryName::new_unchecked("Matatu"),
            CategoryType::Expense,
            Some(user.id),
            &connection,
        )
        .unwrap();
        create_budget(
            NewBudget {
                user_id: user.id,
                category_id: budgeted.id,
                amount: 100.0,
                period: Period::Monthly,
            },
            &connection,
        )
        .unwrap();
        create_transaction(
            NewTransaction {
                user_id: user.id,
                amount: 42.0,
                category_id: Some(other.id),
                description: "".to_owned(),
                date: date!(2026 - 08 - 10),
            },
            &connection,
        )
        .unwrap();

        let progress = get_budget_progress(user.id, date!(2026 - 08 - 28), &connection).unwrap();

        assert_eq!(progress[0].progress.spent, 0.0);
        assert_eq!(progress[0].progress.percentage, 0.0);
    }
}
