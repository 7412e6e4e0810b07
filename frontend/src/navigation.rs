use std::rc::Rc;

use log::{debug, error, info};

use crate::config::{Config, Routes};
use crate::dom::{Disposition, Element, Page};
use crate::error::DomError;
use crate::notify::{Notifier, Severity};

const ANCHOR_SELECTOR: &str = "a[href^=\"#\"]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    CreateClub,
    Login,
}

impl Destination {
    fn intent(&self) -> &'static str {
        match self {
            Destination::CreateClub => "Redirecting to create club...",
            Destination::Login => "Redirecting to login...",
        }
    }

    fn placeholder(&self) -> &'static str {
        match self {
            Destination::CreateClub => "Club creation - not implemented yet",
            Destination::Login => "Login - not implemented yet",
        }
    }
}

/// Navigation actions behind the landing buttons.
///
/// A destination without a configured URL is an extension point: clicking it
/// only tells the visitor the feature is not there yet.
pub struct Navigator<P: Page> {
    page: P,
    notifier: Rc<dyn Notifier>,
    routes: Routes,
}

impl<P: Page> Navigator<P> {
    pub fn new(page: P, notifier: Rc<dyn Notifier>, routes: Routes) -> Self {
        Self { page, notifier, routes }
    }

    pub fn redirect_to_create_club(&self) {
        self.go(Destination::CreateClub);
    }

    pub fn redirect_to_login(&self) {
        self.go(Destination::Login);
    }

    pub fn notifier(&self) -> &Rc<dyn Notifier> {
        &self.notifier
    }

    pub fn go(&self, destination: Destination) {
        info!("{}", destination.intent());
        let url = match destination {
            Destination::CreateClub => self.routes.create_club.as_deref(),
            Destination::Login => self.routes.login.as_deref(),
        };
        match url {
            Some(url) => {
                if let Err(e) = self.page.navigate(url) {
                    error!("Navigation to {} failed: {}", url, e);
                    self.notifier.notify("Could not open the page, please try again", Severity::Error);
                }
            }
            None => self.notifier.notify(destination.placeholder(), Severity::Info),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BindSummary {
    pub buttons: usize,
    pub anchors: usize,
}

/// Wires the create buttons and same-document anchors. Missing buttons are skipped.
pub fn bind_navigation<P: Page>(
    page: &P,
    navigator: Rc<Navigator<P>>,
    config: &Config,
) -> Result<BindSummary, DomError> {
    let mut summary = BindSummary::default();

    for id in &config.create_buttons {
        let Some(button) = page.element_by_id(id) else {
            debug!("Skipping button: {}", DomError::MissingElement(format!("#{}", id)));
            continue;
        };
        let navigator = navigator.clone();
        page.on_click(
            &button,
            Box::new(move || {
                navigator.redirect_to_create_club();
                Disposition::Default
            }),
        );
        summary.buttons += 1;
    }

    for anchor in page.query_all(ANCHOR_SELECTOR)? {
        let lookup = page.clone();
        let link = anchor.clone();
        // href is read per click; page scripts may retarget the link.
        page.on_click(
            &anchor,
            Box::new(move || {
                if let Some(href) = link.attribute("href") {
                    scroll_to_target(&lookup, &href);
                }
                Disposition::PreventDefault
            }),
        );
        summary.anchors += 1;
    }

    Ok(summary)
}

fn scroll_to_target<P: Page>(page: &P, selector: &str) {
    match page.query(selector) {
        Ok(Some(target)) => target.scroll_into_view(),
        Ok(None) => debug!("Anchor target {} not found", selector),
        Err(e) => debug!("Anchor target ignored: {}", e),
    }
}
