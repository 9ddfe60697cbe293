//! SMS body rendering

use regex::Regex;
use std::sync::LazyLock;

use crate::api::Article;

const UP: &str = "🔺";
const DOWN: &str = "🔻";

#[allow(clippy::unwrap_used)]
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new("<.*?>").unwrap());

/// Remove every `<...>` tag from `text`
pub fn strip_tags(text: &str) -> String {
    TAG.replace_all(text, "").into_owned()
}

/// Render a change in percent the way a float prints, keeping at least one
/// fractional digit (`2.0`, `2.07`, `-1.5`)
pub fn format_change(change: f64) -> String {
    format!("{change:?}")
}

/// Build the alert text for one company.
///
/// ```text
/// Tesla Inc: 🔺2.07%
///
/// Headline: ...
/// Brief: ...
/// Link: ...
///
/// ```
pub fn compose(change: f64, articles: &[Article], company: &str) -> String {
    let arrow = if change > 0.0 { UP } else { DOWN };
    let mut sms = format!("{company}: {arrow}{}%\n\n", format_change(change));

    for article in articles {
        sms.push_str(&format!(
            "Headline: {}\n",
            article.title.as_deref().unwrap_or_default()
        ));
        sms.push_str(&format!(
            "Brief: {}\n",
            strip_tags(article.description.as_deref().unwrap_or_default())
        ));
        sms.push_str(&format!(
            "Link: {}\n\n",
            article.url.as_deref().unwrap_or_default()
        ));
    }

    sms
}
