use maud::{Markup, html};
use rust_decimal::Decimal;
use time::Date;

use crate::{
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    transaction::core::{MIN_DESCRIPTION_LENGTH, TransactionType},
};

/// The values a transaction form is rendered with.
///
/// The new transaction page uses mostly empty defaults while the edit page
/// fills in the transaction being edited.
pub struct TransactionFormDefaults<'a> {
    pub description: Option<&'a str>,
    pub amount: Option<Decimal>,
    pub date: Date,
    pub transaction_type: Option<TransactionType>,
    pub category: Option<&'a str>,
    pub payment_method: Option<&'a str>,
}

impl TransactionFormDefaults<'_> {
    /// Empty defaults with the date set to `date`.
    pub fn empty(date: Date) -> Self {
        Self {
            description: None,
            amount: None,
            date,
            transaction_type: None,
            category: None,
            payment_method: None,
        }
    }
}

/// Renders the shared input fields for the new and edit transaction forms.
pub fn transaction_form_fields(defaults: &TransactionFormDefaults<'_>) -> Markup {
    let amount_str = defaults.amount.map(|amount| format!("{:.2}", amount));

    html! {
        div
        {
            label
                for="description"
                class=(FORM_LABEL_STYLE)
            {
                "Description"
            }

            input
                name="description"
                id="description"
                type="text"
                placeholder="e.g. Salary, Rent"
                minlength=(MIN_DESCRIPTION_LENGTH)
                required
                value=[defaults.description]
                autofocus[defaults.description.is_none()]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="amount"
                class=(FORM_LABEL_STYLE)
            {
                "Amount"
            }

            input
                name="amount"
                id="amount"
                type="number"
                step="0.01"
                min="0.01"
                placeholder="0.00"
                required
                value=[amount_str.as_deref()]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="date"
                class=(FORM_LABEL_STYLE)
            {
                "Date"
            }

            input
                name="date"
                id="date"
                type="date"
                required
                value=(defaults.date)
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="type"
                class=(FORM_LABEL_STYLE)
            {
                "Type"
            }

            select
                name="type"
                id="type"
                required
                class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" disabled selected[defaults.transaction_type.is_none()] hidden
                {
                    "Select the type"
                }

                @for transaction_type in TransactionType::ALL {
                    option
                        value=(transaction_type.as_str())
                        selected[defaults.transaction_type == Some(transaction_type)]
                    {
                        (transaction_type.label())
                    }
                }
            }
        }

        div
        {
            label
                for="category"
                class=(FORM_LABEL_STYLE)
            {
                "Category"
            }

            input
                name="category"
                id="category"
                type="text"
                placeholder="e.g. Housing, Transport"
                value=[defaults.category]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="payment_method"
                class=(FORM_LABEL_STYLE)
            {
                "Payment method"
            }

            input
                name="payment_method"
                id="payment_method"
                type="text"
                placeholder="e.g. Credit card, Pix"
                value=[defaults.payment_method]
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}
