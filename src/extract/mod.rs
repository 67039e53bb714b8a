//! Gallery link extraction from the listing page HTML.
//!
//! The listing page wraps its gallery in a single container element; each
//! cover is an anchor carrying a marker class whose `href` points at the
//! image. Extraction finds the container, then collects those hrefs in
//! document order.

mod error;

pub use error::StructureError;

use scraper::{Html, Selector};
use tracing::{debug, instrument, warn};

/// Default class of the element wrapping the gallery.
pub const DEFAULT_CONTAINER_CLASS: &str = "covers-container";

/// Default class carried by each gallery anchor.
pub const DEFAULT_LINK_CLASS: &str = "gallery";

/// Class names that identify the gallery container and its anchors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GallerySelectors {
    /// Class on the `div` wrapping the gallery.
    pub container_class: String,
    /// Class on each `a` inside the container.
    pub link_class: String,
}

impl Default for GallerySelectors {
    fn default() -> Self {
        Self {
            container_class: DEFAULT_CONTAINER_CLASS.to_string(),
            link_class: DEFAULT_LINK_CLASS.to_string(),
        }
    }
}

impl GallerySelectors {
    fn container_selector(&self) -> Result<Selector, StructureError> {
        parse_selector(&format!("div.{}", self.container_class))
    }

    fn link_selector(&self) -> Result<Selector, StructureError> {
        parse_selector(&format!("a.{}", self.link_class))
    }
}

fn parse_selector(selector: &str) -> Result<Selector, StructureError> {
    Selector::parse(selector).map_err(|e| StructureError::InvalidSelector {
        selector: selector.to_string(),
        reason: format!("{e:?}"),
    })
}

/// Extracts gallery hrefs from the listing page.
///
/// Anchors with a missing or blank `href` are skipped; surrounding
/// whitespace is trimmed. An empty result is not an error, but is logged as
/// a warning because it usually means the gallery markup changed.
///
/// # Errors
///
/// Returns [`StructureError::ContainerNotFound`] when no `div` carries the
/// container class, and [`StructureError::InvalidSelector`] when a
/// configured class name is not a valid CSS identifier.
#[instrument(skip(html, selectors), fields(html_len = html.len(), container = %selectors.container_class))]
pub fn extract_gallery_links(
    html: &str,
    selectors: &GallerySelectors,
) -> Result<Vec<String>, StructureError> {
    let container_selector = selectors.container_selector()?;
    let link_selector = selectors.link_selector()?;

    let document = Html::parse_document(html);
    let container = document
        .select(&container_selector)
        .next()
        .ok_or_else(|| StructureError::container_not_found(&selectors.container_class))?;

    let anchors: Vec<_> = container.select(&link_selector).collect();
    let links: Vec<String> = anchors
        .iter()
        .filter_map(|anchor| anchor.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(ToString::to_string)
        .collect();

    debug!(
        anchors = anchors.len(),
        links = links.len(),
        "collected gallery links"
    );
    if links.is_empty() {
        warn!(
            link_class = %selectors.link_class,
            "gallery container has no usable links; page layout may have changed"
        );
    }

    Ok(links)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn page(body: &str) -> String {
        format!("<!DOCTYPE html><html><head><title>Covers</title></head><body>{body}</body></html>")
    }

    #[test]
    fn test_extract_collects_hrefs_in_document_order() {
        let html = page(
            r#"<div class="covers-container">
                 <a class="gallery" href="/sites/default/files/2023/06/a.png"><img src="t1"></a>
                 <a class="gallery" href="/sites/default/files/2023/05/b.jpg"><img src="t2"></a>
                 <a class="gallery" href="https://gameinformer.com/sites/default/files/c.webp">c</a>
               </div>"#,
        );

        let links = extract_gallery_links(&html, &GallerySelectors::default()).unwrap();
        assert_eq!(
            links,
            vec![
                "/sites/default/files/2023/06/a.png",
                "/sites/default/files/2023/05/b.jpg",
                "https://gameinformer.com/sites/default/files/c.webp",
            ]
        );
    }

    #[test]
    fn test_extract_skips_missing_and_empty_hrefs() {
        let html = page(
            r#"<div class="covers-container">
                 <a class="gallery">no href</a>
                 <a class="gallery" href="">empty</a>
                 <a class="gallery" href="   ">blank</a>
                 <a class="gallery" href=" /x.png ">ok</a>
               </div>"#,
        );

        let links = extract_gallery_links(&html, &GallerySelectors::default()).unwrap();
        assert_eq!(links, vec!["/x.png"]);
    }

    #[test]
    fn test_extract_ignores_anchors_outside_container_or_without_marker() {
        let html = page(
            r#"<a class="gallery" href="/outside.png">outside</a>
               <div class="covers-container">
                 <a href="/no-class.png">plain</a>
                 <a class="thumb" href="/other-class.png">other</a>
                 <div class="row"><a class="gallery featured" href="/nested.png">nested</a></div>
               </div>"#,
        );

        let links = extract_gallery_links(&html, &GallerySelectors::default()).unwrap();
        assert_eq!(links, vec!["/nested.png"]);
    }

    #[test]
    fn test_extract_container_with_multiple_classes_is_found() {
        let html = page(
            r#"<div class="region covers-container clearfix">
                 <a class="gallery" href="/a.png">a</a>
               </div>"#,
        );

        let links = extract_gallery_links(&html, &GallerySelectors::default()).unwrap();
        assert_eq!(links, vec!["/a.png"]);
    }

    #[test]
    fn test_extract_missing_container_is_structure_error() {
        let html = page(r#"<div class="something-else"><a class="gallery" href="/a.png">a</a></div>"#);

        let result = extract_gallery_links(&html, &GallerySelectors::default());
        assert_eq!(
            result,
            Err(StructureError::ContainerNotFound {
                class: "covers-container".to_string()
            })
        );
    }

    #[test]
    fn test_extract_empty_container_returns_empty_vec() {
        let html = page(r#"<div class="covers-container"><p>Nothing yet</p></div>"#);

        let links = extract_gallery_links(&html, &GallerySelectors::default()).unwrap();
        assert!(links.is_empty());
    }

    #[test]
    fn test_extract_uses_first_container_only() {
        let html = page(
            r#"<div class="covers-container"><a class="gallery" href="/first.png">1</a></div>
               <div class="covers-container"><a class="gallery" href="/second.png">2</a></div>"#,
        );

        let links = extract_gallery_links(&html, &GallerySelectors::default()).unwrap();
        assert_eq!(links, vec!["/first.png"]);
    }

    #[test]
    fn test_extract_custom_selectors() {
        let html = page(r#"<div class="grid"><a class="tile" href="/t.png">t</a></div>"#);
        let selectors = GallerySelectors {
            container_class: "grid".to_string(),
            link_class: "tile".to_string(),
        };

        let links = extract_gallery_links(&html, &selectors).unwrap();
        assert_eq!(links, vec!["/t.png"]);
    }

    #[test]
    fn test_extract_invalid_class_name_is_selector_error() {
        let selectors = GallerySelectors {
            container_class: "bad class[".to_string(),
            link_class: "gallery".to_string(),
        };

        let result = extract_gallery_links("<html></html>", &selectors);
        assert!(matches!(
            result,
            Err(StructureError::InvalidSelector { .. })
        ));
    }
}
