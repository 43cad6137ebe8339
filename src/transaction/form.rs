//! The shared form fields for creating and editing transactions.

use maud::{Markup, html};
use time::Date;

use crate::{
    category::{Category, CategoryId, CategoryType},
    html::{FORM_LABEL_STYLE, FORM_SELECT_STYLE, FORM_TEXT_INPUT_STYLE},
};

pub(super) struct TransactionFormDefaults<'a> {
    pub amount: Option<f64>,
    pub date: Date,
    pub description: Option<&'a str>,
    pub category_id: Option<CategoryId>,
    pub max_date: Date,
}

pub(super) fn transaction_form_fields(
    defaults: &TransactionFormDefaults<'_>,
    categories: &[Category],
) -> Markup {
    let amount_str = defaults.amount.map(|amount| format!("{amount:.2}"));

    html! {
        div
        {
            label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }
            input
                name="amount" id="amount" type="number" step="0.01" min="0.01"
                placeholder="0.01" required
                value=[amount_str.as_deref()]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="date" class=(FORM_LABEL_STYLE) { "Date" }
            input
                name="date" id="date" type="date"
                max=(defaults.max_date) value=(defaults.date) required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="description" class=(FORM_LABEL_STYLE) { "Description" }
            input
                name="description" id="description" type="text"
                placeholder="Description" value=[defaults.description]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="category_id" class=(FORM_LABEL_STYLE) { "Category" }
            select name="category_id" id="category_id" class=(FORM_SELECT_STYLE)
            {
                option value="" { "Uncategorized" }

                (category_options("Expense", CategoryType::Expense, defaults, categories))
                (category_options("Income", CategoryType::Income, defaults, categories))
            }
        }
    }
}

fn category_options(
    label: &str,
    category_type: CategoryType,
    defaults: &TransactionFormDefaults<'_>,
    categories: &[Category],
) -> Markup {
    html! {
        optgroup label=(label)
        {
            @for category in categories {
                @if category.category_type == category_type {
                    option
                        value=(category.id)
                        selected[Some(category.id) == defaults.category_id]
                        { (category.name) }
                }
            }
        }
    }
}
