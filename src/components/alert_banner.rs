//! Draft-mode banner

use crate::i18n::I18n;

/// Fixed banner telling the editor they are looking at drafts
pub fn alert_banner(i18n: &I18n) -> String {
    format!(
        r#"<div class="fixed top-0 left-0 z-50 w-full border-b bg-white/95 text-black backdrop-blur"><div class="py-2 text-center text-sm">{} <a class="hover:text-cyan underline transition-colors duration-200" href="/api/disable-draft">{}</a></div></div>"#,
        crate::helpers::html_escape(&i18n.get("draft.banner")),
        crate::helpers::html_escape(&i18n.get("draft.back"))
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_banner_links_to_disable() {
        let html = alert_banner(&I18n::builtin("en"));
        assert!(html.contains("Previewing drafts."));
        assert!(html.contains(r#"href="/api/disable-draft""#));
    }
}
