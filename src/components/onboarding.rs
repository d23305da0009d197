//! Empty-state banner shown before the first post exists

use crate::helpers::html_escape;
use crate::i18n::I18n;

pub fn onboarding(i18n: &I18n, studio_url: Option<&str>) -> String {
    let action = match studio_url.filter(|url| !url.is_empty()) {
        Some(url) => format!(
            r#"<div class="ml-10 inline-flex rounded-md shadow-sm"><a class="inline-flex items-center gap-2 rounded-md bg-white px-3 py-2 text-sm font-semibold text-gray-900 ring-1 ring-inset ring-gray-300 hover:bg-gray-50" href="{}/intent/create/template=post;type=post/" target="_blank" rel="noopener">{}</a></div>"#,
            html_escape(url.trim_end_matches('/')),
            html_escape(&i18n.get("onboarding.action"))
        ),
        None => String::new(),
    };

    format!(
        r#"<div class="grid grid-flow-row gap-6 py-60 text-center"><svg class="mx-auto h-10 w-10 text-gray-400" aria-hidden="true" width="512" height="512" viewBox="0 0 24 24" fill="none"><path d="M12 5v14M5 12h14" stroke="currentColor" stroke-width="1.5" stroke-linecap="round"/></svg><div class="flex flex-col items-center justify-center"><div><h3 class="mb-2 text-sm font-semibold text-gray-900">{}</h3><p class="text-sm text-gray-500">{}</p></div>{}</div></div>"#,
        html_escape(&i18n.get("onboarding.title")),
        html_escape(&i18n.get("onboarding.body")),
        action
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_onboarding() {
        let i18n = I18n::builtin("en");
        let html = onboarding(&i18n, Some("https://studio.example.com/"));
        assert!(html.contains("No posts"));
        assert!(html.contains(r#"href="https://studio.example.com/intent/create/template=post;type=post/""#));

        let html = onboarding(&i18n, None);
        assert!(html.contains("No posts"));
        assert!(!html.contains("<a "));
    }
}
