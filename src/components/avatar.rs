//! Author avatar

use crate::content::SanityImage;
use crate::helpers::{html_escape, Fit, ImageUrlBuilder};

/// Author picture and name; a "By" label stands in for a missing picture
pub fn avatar(images: &ImageUrlBuilder, name: &str, picture: Option<&SanityImage>) -> String {
    let portrait = picture.and_then(|picture| {
        let src = images
            .image(picture)?
            .height(96)
            .width(96)
            .fit(Fit::Crop)
            .url();
        Some(format!(
            r#"<div class="ml-2 h-6 w-6"><img alt="{}" class="h-full rounded-full object-cover" height="48" width="48" src="{}"></div>"#,
            html_escape(picture.alt_text()),
            html_escape(&src)
        ))
    });

    let lead = portrait.unwrap_or_else(|| r#"<div class="mr-1 text-black">By </div>"#.to_string());

    format!(
        r#"<div class="flex items-center text-md border border-slate-500/10 bg-white/20 backdrop-blur-lg py-1 pr-1 pl-2 rounded-full">{}<div class="text-pretty text-xs font-bold">{}</div></div>"#,
        lead,
        html_escape(name)
    )
}
