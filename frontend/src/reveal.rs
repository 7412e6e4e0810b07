use log::{debug, warn};

use crate::config::{selector_list, Config};
use crate::dom::{Element, Intersection, Observer, ObserverOptions, Page};
use crate::error::DomError;

/// Observes the reveal targets and marks each one revealed on its first
/// qualifying intersection, after which it is no longer observed.
///
/// Returns the number of observed elements.
pub fn init_reveal<P: Page>(page: &P, config: &Config) -> Result<usize, DomError> {
    let reveal = &config.reveal;
    let options = ObserverOptions {
        threshold: reveal.threshold,
        root_margin: reveal.root_margin.clone(),
    };
    let revealed_class = reveal.revealed_class.clone();

    let observer = page.intersection_observer(
        &options,
        Box::new(move |entries: Vec<Intersection<P::Element>>, observer: &P::Observer| {
            for entry in entries.into_iter().filter(|e| e.is_intersecting) {
                if let Err(e) = entry.target.add_class(&revealed_class) {
                    warn!("Could not reveal element: {}", e);
                }
                observer.unobserve(&entry.target);
            }
        }),
    )?;

    let targets = page.query_all(&selector_list(&reveal.selectors))?;
    for target in &targets {
        observer.observe(target);
    }
    debug!("Observing {} elements for reveal", targets.len());
    Ok(targets.len())
}
