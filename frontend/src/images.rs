use log::info;

use crate::config::Config;
use crate::dom::{Element, Page};
use crate::error::DomError;

const IMAGE_SELECTOR: &str = "img[data-image]";
const IMAGE_ATTRIBUTE: &str = "data-image";

/// Points every `<img data-image="name.png">` at `images_folder + name.png`.
///
/// Returns how many sources were assigned. Re-running assigns the same URLs.
pub fn resolve_images<P: Page>(page: &P, config: &Config) -> Result<usize, DomError> {
    let images = page.query_all(IMAGE_SELECTOR)?;
    let mut resolved = 0;
    for image in &images {
        let Some(name) = image.attribute(IMAGE_ATTRIBUTE).filter(|n| !n.is_empty()) else {
            continue;
        };
        image.set_attribute("src", &format!("{}{}", config.images_folder, name))?;
        resolved += 1;
    }
    info!("✓ {} images initialized from {}", resolved, config.images_folder);
    Ok(resolved)
}
