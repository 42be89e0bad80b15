//! Inline alerts for showing a failed section of a page.

use maud::{Markup, html};

/// An error alert with a short `message` and optional `details`.
///
/// Rendered in place of a section whose data could not be loaded.
pub fn error_alert(message: &str, details: &str) -> Markup {
    html! {
        div
            role="alert"
            class="w-full p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50
                dark:bg-gray-800 dark:text-red-400"
        {
            p class="font-medium" { (message) }

            @if !details.is_empty() {
                p class="mt-1" { (details) }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::error_alert;

    #[test]
    fn renders_message_and_details() {
        let html = Html::parse_fragment(
            &error_alert("Could not load accounts.", "Try again later.").into_string(),
        );

        let paragraphs: Vec<String> = html
            .select(&Selector::parse("div[role=alert] p").unwrap())
            .map(|p| p.text().collect())
            .collect();
        assert_eq!(paragraphs, ["Could not load accounts.", "Try again later."]);
    }

    #[test]
    fn omits_empty_details() {
        let html = Html::parse_fragment(&error_alert("Could not load accounts.", "").into_string());

        let paragraph_count = html.select(&Selector::parse("p").unwrap()).count();
        assert_eq!(paragraph_count, 1);
    }
}
