//! Shared maud layout, Tailwind style constants and money formatting.

use maud::{DOCTYPE, Markup, html};

use numfmt::{Formatter, Precision};

// Link styles
pub const LINK_STYLE: &str = "text-blue-600 hover:text-blue-500 \
    dark:text-blue-500 dark:hover:text-blue-400 underline";

// Button styles
pub const BUTTON_PRIMARY_STYLE: &str = "w-full px-4 py-2 bg-blue-500
    dark:bg-blue-600 disabled:bg-blue-700 hover:enabled:bg-blue-600 \
    hover:enabled:dark:bg-blue-700 text-white rounded";

pub const BUTTON_DELETE_STYLE: &str = "text-red-600 hover:text-red-500 \
    dark:text-red-500 dark:hover:text-red-400 underline bg-transparent \
    border-none cursor-pointer";

// Form styles
pub const FORM_CONTAINER_STYLE: &str = "flex flex-col items-center px-6 py-8 \
    mx-auto lg:py-0 max-w-md text-gray-900 dark:text-white";
pub const FORM_LABEL_STYLE: &str = "block mb-2 text-sm font-medium text-gray-900 dark:text-white";
pub const FORM_TEXT_INPUT_STYLE: &str = "block w-full p-2.5 rounded text-sm \
    text-gray-900 dark:text-white disabled:text-gray-500 bg-gray-50 \
    dark:bg-gray-700 border border-gray-300 dark:border-gray-600 \
    dark:placeholder-gray-400 focus:ring-blue-600 focus:border-blue-600 \
    focus:dark:border-blue-500 focus:dark:ring-blue-500";
pub const FORM_SELECT_STYLE: &str = FORM_TEXT_INPUT_STYLE;
pub const FORM_CHECKBOX_STYLE: &str = "h-4 w-4 shrink-0 cursor-pointer \
    text-blue-600 border-gray-300 dark:border-gray-600 rounded";

// Table styles
pub const TABLE_HEADER_STYLE: &str = "text-xs text-gray-700 uppercase \
    bg-gray-50 dark:bg-gray-700 dark:text-gray-400";

pub const TABLE_ROW_STYLE: &str = "bg-white border-b dark:bg-gray-800 dark:border-gray-700";

pub const TABLE_CELL_STYLE: &str = "px-6 py-4";

// Card style for dashboard and profile stats
pub const CARD_STYLE: &str = "w-full p-4 bg-white border border-gray-200 \
    rounded-lg shadow-sm dark:bg-gray-800 dark:border-gray-700";

// Page container
pub const PAGE_CONTAINER_STYLE: &str =
    "flex flex-col items-center px-6 py-8 mx-auto lg:py-5 text-gray-900 dark:text-white";

/// The skeleton that every page is rendered into.
///
/// Pulls in the htmx and Tailwind scripts and declares the alert container
/// that htmx error fragments are swapped into.
pub fn base(title: &str, content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Spendtrack" }
                script src="/static/htmx.min.js" {}
                script src="/static/response-targets.js" {}
                script src="/static/tailwind.js" {}
            }

            body
                hx-ext="response-targets"
                class="bg-gray-100 dark:bg-gray-900 min-h-screen"
            {
                div id="alert-container" {}
                (content)
            }
        }
    }
}

/// Shared layout for the log-in and registration pages.
pub fn log_in_register(heading: &str, form: &Markup) -> Markup {
    html! {
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold leading-tight tracking-tight md:text-2xl py-4"
            {
                (heading)
            }

            (form)
        }
    }
}

/// Format `number` as an amount of money with two decimal places, e.g.
/// `format_currency(1234.5, "KSh")` renders "KSh1,234.50".
///
/// The symbol varies per user, so the formatters cannot be cached the way a
/// single-currency app would cache them.
pub fn format_currency(number: f64, symbol: &str) -> String {
    if number == 0.0 {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        return format!("{symbol}0.00");
    }

    let prefix = if number < 0.0 {
        format!("-{symbol}")
    } else {
        symbol.to_owned()
    };

    let fmt = match Formatter::currency(&prefix) {
        Ok(fmt) => fmt.precision(Precision::Decimals(2)),
        Err(error) => {
            tracing::error!("could not build currency formatter for {symbol:?}: {error}");
            return format!("{prefix}{:.2}", number.abs());
        }
    };

    let mut formatted_string = fmt.fmt_string(number.abs());

    // numfmt omits the last trailing zero, so we must add it ourselves
    // For example, "12.30" is rendered as "12.3" so we append "0".
    if formatted_string.as_bytes()[formatted_string.len() - 3] != b'.' {
        if formatted_string.as_bytes()[formatted_string.len() - 2] == b'.' {
            formatted_string = format!("{formatted_string}0");
        } else {
            formatted_string = format!("{formatted_string}.00");
        }
    }

    formatted_string
}
