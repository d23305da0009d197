//! Image URL builder
//!
//! Turns an asset reference such as `image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg`
//! into a CDN URL with the requested dimensions. Pure string work; nothing
//! here touches the network.

use serde::Serialize;

use crate::config::SanityConfig;
use crate::content::{Crop, Hotspot, SanityImage};

const CDN_BASE: &str = "https://cdn.sanity.io";

/// How the image is fitted into the requested box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fit {
    Clip,
    Crop,
    Fill,
    Max,
    Min,
    Scale,
}

impl Fit {
    fn as_str(&self) -> &'static str {
        match self {
            Fit::Clip => "clip",
            Fit::Crop => "crop",
            Fit::Fill => "fill",
            Fit::Max => "max",
            Fit::Min => "min",
            Fit::Scale => "scale",
        }
    }
}

/// Parsed image asset reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetId {
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub format: String,
}

impl AssetId {
    /// Parse `image-<id>-<w>x<h>-<format>`
    pub fn parse(reference: &str) -> Option<Self> {
        let rest = reference.strip_prefix("image-")?;
        let (rest, format) = rest.rsplit_once('-')?;
        let (id, dimensions) = rest.rsplit_once('-')?;
        let (width, height) = dimensions.split_once('x')?;

        if id.is_empty() || format.is_empty() {
            return None;
        }

        Some(Self {
            id: id.to_string(),
            width: width.parse().ok()?,
            height: height.parse().ok()?,
            format: format.to_string(),
        })
    }
}

/// Builds CDN URLs for one project and dataset
#[derive(Debug, Clone)]
pub struct ImageUrlBuilder {
    base: String,
    project_id: String,
    dataset: String,
}

impl ImageUrlBuilder {
    pub fn new(config: &SanityConfig) -> Self {
        Self {
            base: CDN_BASE.to_string(),
            project_id: config.project_id.clone(),
            dataset: config.dataset.clone(),
        }
    }

    /// Start a URL for an image; `None` when it has no usable asset
    ///
    /// URLs default to `fit=max` so an image is never upscaled.
    pub fn image(&self, image: &SanityImage) -> Option<ImageUrl<'_>> {
        let asset = AssetId::parse(image.asset_ref()?)?;
        Some(ImageUrl {
            builder: self,
            asset,
            crop: image.crop,
            hotspot: image.hotspot,
            width: None,
            height: None,
            fit: Some(Fit::Max),
        })
    }
}

/// A URL under construction
#[derive(Debug, Clone)]
pub struct ImageUrl<'a> {
    builder: &'a ImageUrlBuilder,
    asset: AssetId,
    crop: Option<Crop>,
    hotspot: Option<Hotspot>,
    width: Option<u32>,
    height: Option<u32>,
    fit: Option<Fit>,
}

impl ImageUrl<'_> {
    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn fit(mut self, fit: Fit) -> Self {
        self.fit = Some(fit);
        self
    }

    /// Source rectangle after applying the crop
    fn crop_rect(&self) -> (u32, u32, u32, u32) {
        let (w, h) = (self.asset.width as f64, self.asset.height as f64);
        let Some(crop) = self.crop else {
            return (0, 0, self.asset.width, self.asset.height);
        };

        let left = (crop.left * w).round().max(0.0);
        let top = (crop.top * h).round().max(0.0);
        let width = (w - (crop.left + crop.right) * w).round().max(1.0);
        let height = (h - (crop.top + crop.bottom) * h).round().max(1.0);

        (left as u32, top as u32, width as u32, height as u32)
    }

    /// Crop rectangle, when it differs from the full image
    fn rect(&self) -> Option<(u32, u32, u32, u32)> {
        let rect = self.crop_rect();
        if rect == (0, 0, self.asset.width, self.asset.height) {
            None
        } else {
            Some(rect)
        }
    }

    /// Hotspot centre relative to the cropped rectangle, for `fit=crop`
    fn focal_point(&self) -> Option<(f64, f64)> {
        if self.fit != Some(Fit::Crop) {
            return None;
        }
        let hotspot = self.hotspot?;
        let (left, top, width, height) = self.crop_rect();

        let x = (hotspot.x * self.asset.width as f64 - left as f64) / width as f64;
        let y = (hotspot.y * self.asset.height as f64 - top as f64) / height as f64;
        let round = |v: f64| (v.clamp(0.0, 1.0) * 1000.0).round() / 1000.0;
        Some((round(x), round(y)))
    }

    pub fn url(&self) -> String {
        let asset = &self.asset;
        let mut url = format!(
            "{}/images/{}/{}/{}-{}x{}.{}",
            self.builder.base,
            self.builder.project_id,
            self.builder.dataset,
            asset.id,
            asset.width,
            asset.height,
            asset.format
        );

        let mut params = Vec::new();
        if let Some((left, top, width, height)) = self.rect() {
            params.push(format!("rect={},{},{},{}", left, top, width, height));
        }
        if let Some(width) = self.width {
            params.push(format!("w={}", width));
        }
        if let Some(height) = self.height {
            params.push(format!("h={}", height));
        }
        if let Some(fit) = self.fit {
            params.push(format!("fit={}", fit.as_str()));
        }
        if let Some((x, y)) = self.focal_point() {
            params.push(format!("crop=focalpoint&fp-x={}&fp-y={}", x, y));
        }
        params.push("auto=format".to_string());

        url.push('?');
        url.push_str(&params.join("&"));
        url
    }
}

/// An image ready for Open Graph tags
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenGraphImage {
    pub url: String,
    pub alt: String,
    pub width: u32,
    pub height: u32,
}

/// Resolve an image into a 1200x627 Open Graph crop
pub fn resolve_open_graph_image(
    builder: &ImageUrlBuilder,
    image: Option<&SanityImage>,
) -> Option<OpenGraphImage> {
    const WIDTH: u32 = 1200;
    const HEIGHT: u32 = 627;

    let image = image?;
    let url = builder
        .image(image)?
        .width(WIDTH)
        .height(HEIGHT)
        .fit(Fit::Crop)
        .url();

    Some(OpenGraphImage {
        url,
        alt: image.alt_text().to_string(),
        width: WIDTH,
        height: HEIGHT,
    })
}
