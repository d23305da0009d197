//! 404 page

use super::layout::render_document;
use super::{joined, PageError, Site};
use crate::content::DraftMode;
use crate::templates::NotFoundData;

/// Render the not-found document
pub async fn render(site: &Site, draft: DraftMode) -> Result<String, PageError> {
    let mut shell = joined(site.spawn_shell(draft)).await?;

    let title = site.i18n.get("not_found.title");
    shell.metadata.title = Some(title.clone());

    let page = NotFoundData {
        title,
        back: site.i18n.get("not_found.back"),
    };
    render_document(site, draft, &shell, "/404", "not_found.html", &page)
}
