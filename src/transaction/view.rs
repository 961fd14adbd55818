//! HTML rendering for the ledger page.

use maud::{Markup, html};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, CATEGORY_BADGE_STYLE,
        FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement, LINK_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, dollar_input_styles,
        format_currency,
    },
    transaction::{
        Transaction, TransactionType,
        filter::{ALL, LedgerQuery, MONTH_NAMES},
        summary::Summary,
    },
};

/// The max number of graphemes to display in the transaction table rows before
/// truncating and displaying ellipses.
const MAX_DESCRIPTION_GRAPHEMES: usize = 32;

/// Everything needed to render the ledger page.
pub(crate) struct LedgerView<'a> {
    /// The filtered transactions, newest first.
    pub transactions: &'a [Transaction],
    /// Totals over `transactions`.
    pub summary: Summary,
    /// The filter selections as sent by the client.
    pub selected: &'a LedgerQuery,
    /// The choices for the category selector.
    pub categories: &'a [String],
    /// The choices for the year selector.
    pub years: &'a [i32],
}

fn amount_class(transaction_type: TransactionType) -> &'static str {
    match transaction_type {
        TransactionType::Income => "text-green-700 dark:text-green-300",
        TransactionType::Expense => "text-red-700 dark:text-red-300",
    }
}

fn balance_class(balance: f64) -> &'static str {
    if balance < 0.0 {
        "text-red-700 dark:text-red-300"
    } else {
        "text-green-700 dark:text-green-300"
    }
}

pub(crate) fn ledger_view(view: LedgerView) -> Markup {
    let content = html! {
        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full space-y-4 lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end gap-2"
                {
                    h1 class="text-xl font-bold" { "Ledger" }

                    button
                        type="button"
                        id="add-transaction-button"
                        class=(BUTTON_PRIMARY_STYLE)
                    {
                        "Add Transaction"
                    }
                }

                (summary_view(&view.summary))

                (filter_form_view(view.selected, view.categories, view.years))

                (transaction_table_view(view.transactions))
            }

            (transaction_dialog_view(view.categories))
        }
    };

    base(
        "Ledger",
        &[
            dollar_input_styles(),
            HeadElement::ScriptLink("/static/app.js".to_owned()),
        ],
        &content,
    )
}

fn summary_view(summary: &Summary) -> Markup {
    html! {
        section class="grid grid-cols-1 gap-4 sm:grid-cols-3" id="summary"
        {
            (summary_card("Income", "total-income", summary.income, amount_class(TransactionType::Income)))
            (summary_card("Expenses", "total-expenses", summary.expenses, amount_class(TransactionType::Expense)))
            (summary_card("Balance", "net-balance", summary.balance, balance_class(summary.balance)))
        }
    }
}

fn summary_card(label: &str, id: &str, amount: f64, amount_class: &str) -> Markup {
    html! {
        div class="rounded bg-white shadow-sm px-4 py-3 dark:bg-gray-800"
        {
            p class="text-sm text-gray-500 dark:text-gray-400" { (label) }
            p id=(id) class={ "text-2xl font-semibold tabular-nums " (amount_class) }
            {
                (format_currency(amount))
            }
        }
    }
}

fn filter_form_view(selected: &LedgerQuery, categories: &[String], years: &[i32]) -> Markup {
    let year_options: Vec<String> = years.iter().map(|year| year.to_string()).collect();
    let month_options: Vec<(String, &str)> = MONTH_NAMES
        .iter()
        .enumerate()
        .map(|(index, name)| ((index + 1).to_string(), *name))
        .collect();

    html! {
        form
            method="get"
            action=(endpoints::ROOT)
            id="filter-form"
            class="flex flex-wrap items-end gap-4 rounded bg-white shadow-sm px-4 py-3 dark:bg-gray-800"
        {
            (filter_select("Category", "category", &selected.category,
                categories.iter().map(|category| (category.as_str(), category.as_str()))))

            (filter_select("Type", "type", &selected.transaction_type,
                [("income", "Income"), ("expense", "Expense")].into_iter()))

            (filter_select("Year", "year", &selected.year,
                year_options.iter().map(|year| (year.as_str(), year.as_str()))))

            (filter_select("Month", "month", &selected.month,
                month_options.iter().map(|(number, name)| (number.as_str(), *name))))

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Filter" }

            a href=(endpoints::ROOT) class=(LINK_STYLE) { "Clear filters" }
        }
    }
}

/// A select element with an "All" option followed by `options` given as `(value, label)` pairs.
///
/// A selected value that is not one of the options is still shown so that the
/// form reflects the current filter.
fn filter_select<'a>(
    label: &str,
    name: &str,
    selected: &str,
    options: impl Iterator<Item = (&'a str, &'a str)>,
) -> Markup {
    let options: Vec<(&str, &str)> = options.collect();
    let is_all = selected.is_empty() || selected == ALL;
    let selected_is_missing = !is_all && !options.iter().any(|(value, _)| *value == selected);
    let id = format!("filter-{name}");

    html! {
        div
        {
            label for=(id) class=(FORM_LABEL_STYLE) { (label) }

            select id=(id) name=(name) class=(FORM_TEXT_INPUT_STYLE)
            {
                option value=(ALL) selected[is_all] { "All" }

                @for (value, option_label) in &options {
                    option value=(value) selected[*value == selected] { (option_label) }
                }

                @if selected_is_missing {
                    option value=(selected) selected { (selected) }
                }
            }
        }
    }
}

fn transaction_table_view(transactions: &[Transaction]) -> Markup {
    html! {
        div class="overflow-x-auto rounded shadow-sm"
        {
            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class="px-6 py-4 text-right" { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody id="transactions-table-body"
                {
                    @for transaction in transactions {
                        (transaction_row_view(transaction))
                    }

                    @if transactions.is_empty() {
                        tr
                        {
                            td
                                colspan="5"
                                data-empty-state="true"
                                class="px-6 py-4 text-center"
                            {
                                "No transactions match these filters."
                            }
                        }
                    }
                }
            }
        }
    }
}

fn transaction_row_view(transaction: &Transaction) -> Markup {
    let (description, tooltip) = format_description(&transaction.description);
    let transaction_url = format_endpoint(endpoints::TRANSACTION, transaction.id);
    let date = transaction.date.to_string();

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-row="true"
        {
            td class=(TABLE_CELL_STYLE) { time datetime=(date) { (date) } }
            td class=(TABLE_CELL_STYLE) title=[tooltip] { (description) }
            td class=(TABLE_CELL_STYLE)
            {
                span class=(CATEGORY_BADGE_STYLE) { (transaction.category) }
            }
            td class={ "px-6 py-4 text-right tabular-nums " (amount_class(transaction.transaction_type)) }
            {
                (format_currency(transaction.amount))
            }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    button
                        type="button"
                        class={ "edit-button " (LINK_STYLE) }
                        data-url=(transaction_url)
                        data-id=(transaction.id)
                        data-date=(date)
                        data-description=(transaction.description)
                        data-category=(transaction.category)
                        data-type=(transaction.transaction_type.as_str())
                        data-amount=(transaction.amount)
                    {
                        "Edit"
                    }

                    button
                        type="button"
                        class={ "delete-button " (BUTTON_DELETE_STYLE) }
                        data-url=(transaction_url)
                        data-description=(transaction.description)
                    {
                        "Delete"
                    }
                }
            }
        }
    }
}

fn transaction_dialog_view(categories: &[String]) -> Markup {
    html! {
        dialog
            id="transaction-dialog"
            class="w-full max-w-md rounded p-6 bg-white text-gray-900 dark:bg-gray-800 dark:text-white"
        {
            form
                id="transaction-form"
                method="dialog"
                class="space-y-4"
                data-create-url=(endpoints::TRANSACTIONS_API)
            {
                h2 id="transaction-dialog-title" class="text-lg font-bold" { "Add Transaction" }

                input type="hidden" name="id" id="transaction-id";

                div
                {
                    label for="transaction-date" class=(FORM_LABEL_STYLE) { "Date" }
                    input
                        type="date"
                        name="date"
                        id="transaction-date"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="transaction-description" class=(FORM_LABEL_STYLE) { "Description" }
                    input
                        type="text"
                        name="description"
                        id="transaction-description"
                        maxlength="200"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="transaction-category" class=(FORM_LABEL_STYLE) { "Category" }
                    input
                        type="text"
                        name="category"
                        id="transaction-category"
                        list="category-options"
                        maxlength="50"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                    datalist id="category-options"
                    {
                        @for category in categories {
                            option value=(category) {}
                        }
                    }
                }

                div
                {
                    label for="transaction-type" class=(FORM_LABEL_STYLE) { "Type" }
                    select name="type" id="transaction-type" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option value=(TransactionType::Income.as_str()) { "Income" }
                        option value=(TransactionType::Expense.as_str()) selected { "Expense" }
                    }
                }

                div
                {
                    label for="transaction-amount" class=(FORM_LABEL_STYLE) { "Amount" }
                    div class="input-wrapper"
                    {
                        input
                            type="number"
                            name="amount"
                            id="transaction-amount"
                            min="0"
                            step="0.01"
                            required
                            class=(FORM_TEXT_INPUT_STYLE);
                    }
                }

                p id="transaction-form-error" class="hidden text-red-500 text-base" {}

                div class="flex justify-end gap-2"
                {
                    button type="button" id="cancel-transaction-button" class=(BUTTON_SECONDARY_STYLE)
                    {
                        "Cancel"
                    }
                    button type="submit" id="submit-transaction-button" class=(BUTTON_PRIMARY_STYLE)
                    {
                        "Add Transaction"
                    }
                }
            }
        }
    }
}

fn format_description(description: &str) -> (String, Option<&str>) {
    let description_length = description.graphemes(true).count();

    if description_length <= MAX_DESCRIPTION_GRAPHEMES {
        (description.to_owned(), None)
    } else {
        let truncated: String = description
            .graphemes(true)
            .take(MAX_DESCRIPTION_GRAPHEMES - 3)
            .collect();
        (truncated + "...", Some(description))
    }
}

#[cfg(test)]
mod tests {
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        test_utils::{assert_valid_html, parse_html_string},
        transaction::{
            Transaction, TransactionType,
            filter::LedgerQuery,
            summary::Summary,
        },
    };

    use super::{LedgerView, MAX_DESCRIPTION_GRAPHEMES, format_description, ledger_view};

    fn sample_transactions() -> Vec<Transaction> {
        vec![
            Transaction {
                id: 2,
                date: date!(2024 - 03 - 05),
                description: "Groceries".to_owned(),
                category: "Food".to_owned(),
                transaction_type: TransactionType::Expense,
                amount: 150.0,
            },
            Transaction {
                id: 1,
                date: date!(2024 - 03 - 01),
                description: "Salary".to_owned(),
                category: "Job".to_owned(),
                transaction_type: TransactionType::Income,
                amount: 3000.0,
            },
        ]
    }

    #[test]
    fn renders_one_row_per_transaction() {
        let transactions = sample_transactions();
        let categories = vec!["Food".to_owned(), "Job".to_owned()];
        let selected = LedgerQuery::default();

        let markup = ledger_view(LedgerView {
            transactions: &transactions,
            summary: Summary::from_transactions(&transactions),
            selected: &selected,
            categories: &categories,
            years: &[2024],
        });

        let html = parse_html_string(&markup.into_string());
        assert_valid_html(&html);
        let row_selector = Selector::parse("tr[data-transaction-row]").unwrap();
        assert_eq!(html.select(&row_selector).count(), 2);
        let delete_selector = Selector::parse("button.delete-button").unwrap();
        let urls: Vec<&str> = html
            .select(&delete_selector)
            .map(|button| button.value().attr("data-url").unwrap())
            .collect();
        assert_eq!(urls, vec!["/api/transactions/2", "/api/transactions/1"]);
    }

    #[test]
    fn renders_empty_state() {
        let selected = LedgerQuery::default();

        let markup = ledger_view(LedgerView {
            transactions: &[],
            summary: Summary::default(),
            selected: &selected,
            categories: &[],
            years: &[],
        });

        let html = parse_html_string(&markup.into_string());
        let empty_selector = Selector::parse("td[data-empty-state]").unwrap();
        assert_eq!(html.select(&empty_selector).count(), 1);
    }

    #[test]
    fn echoes_selected_filters() {
        let selected = LedgerQuery {
            category: "Food".to_owned(),
            transaction_type: "expense".to_owned(),
            year: "2019".to_owned(),
            month: "3".to_owned(),
        };
        let categories = vec!["Food".to_owned(), "Job".to_owned()];

        let markup = ledger_view(LedgerView {
            transactions: &[],
            summary: Summary::default(),
            selected: &selected,
            categories: &categories,
            years: &[2024],
        });

        let html = parse_html_string(&markup.into_string());
        for (name, want) in [
            ("category", "Food"),
            ("type", "expense"),
            ("year", "2019"),
            ("month", "3"),
        ] {
            let selector =
                Selector::parse(&format!("#filter-form select[name='{name}'] option[selected]"))
                    .unwrap();
            let selected_values: Vec<&str> = html
                .select(&selector)
                .map(|option| option.value().attr("value").unwrap())
                .collect();
            assert_eq!(selected_values, vec![want], "wrong selection for {name}");
        }
    }

    #[test]
    fn selects_category_with_surrounding_whitespace_verbatim() {
        let selected = LedgerQuery {
            category: " Food".to_owned(),
            ..Default::default()
        };
        let categories = vec![" Food".to_owned(), "Food".to_owned()];

        let markup = ledger_view(LedgerView {
            transactions: &[],
            summary: Summary::default(),
            selected: &selected,
            categories: &categories,
            years: &[],
        });

        let html = parse_html_string(&markup.into_string());
        let selector =
            Selector::parse("#filter-form select[name='category'] option[selected]").unwrap();
        let selected_values: Vec<&str> = html
            .select(&selector)
            .map(|option| option.value().attr("value").unwrap())
            .collect();
        assert_eq!(selected_values, vec![" Food"]);
    }

    #[test]
    fn month_selector_lists_all_months() {
        let selected = LedgerQuery::default();

        let markup = ledger_view(LedgerView {
            transactions: &[],
            summary: Summary::default(),
            selected: &selected,
            categories: &[],
            years: &[],
        });

        let html = parse_html_string(&markup.into_string());
        let selector = Selector::parse("select[name='month'] option").unwrap();
        let labels: Vec<String> = html
            .select(&selector)
            .map(|option| option.text().collect())
            .collect();
        assert_eq!(labels.len(), 13);
        assert_eq!(labels[0], "All");
        assert_eq!(labels[1], "January");
        assert_eq!(labels[12], "December");
    }

    #[test]
    fn long_descriptions_are_truncated() {
        let description = "a".repeat(MAX_DESCRIPTION_GRAPHEMES + 1);

        let (display, tooltip) = format_description(&description);

        assert_eq!(display.chars().count(), MAX_DESCRIPTION_GRAPHEMES);
        assert!(display.ends_with("..."));
        assert_eq!(tooltip, Some(description.as_str()));
    }

    #[test]
    fn short_descriptions_are_not_truncated() {
        let (display, tooltip) = format_description("Groceries");

        assert_eq!(display, "Groceries");
        assert_eq!(tooltip, None);
    }
}
