//! Post cover image

use crate::content::SanityImage;
use crate::helpers::{html_escape, ImageUrlBuilder};

/// Full-width cover; a fixed-ratio placeholder when there is no asset
pub fn cover_image(images: &ImageUrlBuilder, image: Option<&SanityImage>, priority: bool) -> String {
    let rendered = image.and_then(|image| {
        let src = images.image(image)?.height(1000).width(2000).url();
        let loading = if priority {
            r#"loading="eager" fetchpriority="high""#
        } else {
            r#"loading="lazy""#
        };
        Some(format!(
            r#"<img class="h-auto w-full" width="2000" height="1000" alt="{}" src="{}" sizes="100vw" {}>"#,
            html_escape(image.alt_text()),
            html_escape(&src),
            loading
        ))
    });

    let inner = rendered
        .unwrap_or_else(|| r#"<div class="bg-slate-50" style="padding-top: 50%"></div>"#.to_string());

    format!(
        r#"<div class="shadow-md transition-shadow duration-200 group-hover:shadow-lg sm:mx-0">{}</div>"#,
        inner
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SanityConfig;
    use crate::content::AssetRef;

    fn images() -> ImageUrlBuilder {
        ImageUrlBuilder::new(&SanityConfig::default())
    }

    #[test]
    fn test_cover_image() {
        let image = SanityImage {
            asset: Some(AssetRef {
                reference: Some("image-c-4000x2000-jpg".to_string()),
            }),
            ..SanityImage::default()
        };
        let html = cover_image(&images(), Some(&image), true);
        assert!(html.contains("<img"));
        assert!(html.contains("h=1000&amp;w=2000") || html.contains("w=2000&amp;h=1000"));
        assert!(html.contains(r#"loading="eager""#));

        let html = cover_image(&images(), Some(&image), false);
        assert!(html.contains(r#"loading="lazy""#));
    }

    #[test]
    fn test_no_asset_renders_no_image() {
        let without_ref = SanityImage {
            asset: Some(AssetRef { reference: None }),
            alt: Some("alt".to_string()),
            ..SanityImage::default()
        };
        for image in [None, Some(&without_ref)] {
            let html = cover_image(&images(), image, true);
            assert!(!html.contains("<img"));
            assert!(html.contains("padding-top: 50%"));
        }
    }
}
