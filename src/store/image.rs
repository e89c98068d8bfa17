use url::Url;

use crate::{error::Result, model::MainImage};

const DEFAULT_CDN: &str = "https://cdn.sanity.io";

/// Parsed form of an asset reference like `image-<id>-<w>x<h>-<fmt>`.
#[derive(Debug, PartialEq, Eq)]
struct Asset<'a> {
    id: &'a str,
    width: u32,
    height: u32,
    format: &'a str,
}

impl<'a> Asset<'a> {
    fn parse(reference: &'a str) -> Option<Self> {
        let rest = reference.strip_prefix("image-")?;
        let (rest, format) = rest.rsplit_once('-')?;
        let (id, dimensions) = rest.rsplit_once('-')?;
        let (width, height) = dimensions.split_once('x')?;

        if id.is_empty() || format.is_empty() {
            return None;
        }

        Some(Asset {
            id,
            width: width.parse().ok()?,
            height: height.parse().ok()?,
            format,
        })
    }

    fn file_name(&self) -> String {
        format!("{}-{}x{}.{}", self.id, self.width, self.height, self.format)
    }
}

/// Builds transformed image URLs on the asset CDN.
#[derive(Debug, Clone)]
pub struct ImageUrls {
    base: Url,
}

impl ImageUrls {
    pub fn new(cdn: Option<&Url>, project_id: &str, dataset: &str) -> Result<Self> {
        let cdn = match cdn {
            Some(cdn) => cdn.clone(),
            None => Url::parse(DEFAULT_CDN)?,
        };
        let base = cdn.join(&format!("images/{}/{}/", project_id, dataset))?;
        Ok(Self { base })
    }

    /// URL for `image` scaled to the given box. Returns `None` when the image
    /// has no asset or the reference is malformed.
    pub fn url(&self, image: &MainImage, width: Option<u32>, height: Option<u32>) -> Option<String> {
        let reference = image.asset_ref()?;
        let Some(asset) = Asset::parse(reference) else {
            tracing::warn!("malformed image reference {:?}", reference);
            return None;
        };

        let mut url = self.base.join(&asset.file_name()).ok()?;
        {
            let mut pairs = url.query_pairs_mut();

            if let Some(crop) = image.crop.filter(|crop| {
                crop.top != 0.0 || crop.bottom != 0.0 || crop.left != 0.0 || crop.right != 0.0
            }) {
                let w = f64::from(asset.width);
                let h = f64::from(asset.height);
                let left = (crop.left * w).round();
                let top = (crop.top * h).round();
                let crop_width = ((1.0 - crop.left - crop.right) * w).round();
                let crop_height = ((1.0 - crop.top - crop.bottom) * h).round();
                pairs.append_pair(
                    "rect",
                    &format!("{},{},{},{}", left, top, crop_width, crop_height),
                );
            }

            if let Some(width) = width {
                pairs.append_pair("w", &width.to_string());
            }
            if let Some(height) = height {
                pairs.append_pair("h", &height.to_string());
            }

            if width.is_some() && height.is_some() {
                pairs.append_pair("fit", "crop");
                if let Some(hotspot) = image.hotspot {
                    pairs.append_pair("crop", "focalpoint");
                    pairs.append_pair("fp-x", &format!("{:.3}", hotspot.x));
                    pairs.append_pair("fp-y", &format!("{:.3}", hotspot.y));
                }
            }

            pairs.append_pair("auto", "format");
        }

        Some(url.to_string())
    }
}
