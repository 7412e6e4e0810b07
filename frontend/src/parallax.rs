use std::cell::Cell;
use std::rc::Rc;

use log::{error, warn};

use crate::config::{selector_list, Config};
use crate::dom::{Element, Page};
use crate::error::DomError;

/// Translates the decorative backgrounds by `scroll_y * speed`, at most once
/// per animation frame no matter how many scroll events arrive.
pub fn init_parallax<P: Page>(page: &P, config: &Config) -> Result<(), DomError> {
    let selectors = selector_list(&config.parallax.selectors);
    let speed = config.parallax.speed;
    let ticking = Rc::new(Cell::new(false));
    let frame_page = page.clone();

    page.on_scroll(Box::new(move || {
        if ticking.get() {
            return;
        }
        ticking.set(true);

        let page = frame_page.clone();
        let selectors = selectors.clone();
        let frame_ticking = ticking.clone();
        let scheduled = frame_page.request_frame(Box::new(move || {
            if let Err(e) = apply_offset(&page, &selectors, page.scroll_y() * speed) {
                warn!("Parallax frame skipped: {}", e);
            }
            frame_ticking.set(false);
        }));
        if let Err(e) = scheduled {
            error!("Could not schedule parallax frame: {}", e);
            ticking.set(false);
        }
    }));
    Ok(())
}

fn apply_offset<P: Page>(page: &P, selectors: &str, offset: f64) -> Result<(), DomError> {
    let transform = format!("translateY({}px)", offset);
    for element in page.query_all(selectors)? {
        element.set_style("transform", &transform)?;
    }
    Ok(())
}
