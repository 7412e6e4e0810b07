use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use log::{error, info};

use crate::config::Config;
use crate::dom::Page;
use crate::error::DomError;
use crate::images::resolve_images;
use crate::navigation::{bind_navigation, Navigator};
use crate::parallax::init_parallax;
use crate::reveal::init_reveal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Images,
    Navigation,
    Reveal,
    Parallax,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Images => "images",
            Step::Navigation => "navigation",
            Step::Reveal => "scroll reveal",
            Step::Parallax => "parallax",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct BootReport {
    pub steps: Vec<(Step, Result<(), DomError>)>,
}

impl BootReport {
    fn record(&mut self, step: Step, outcome: Result<(), DomError>) {
        if let Err(e) = &outcome {
            error!("Initialization step '{}' failed: {}", step, e);
        }
        self.steps.push((step, outcome));
    }

    pub fn ran(&self) -> Vec<Step> {
        self.steps.iter().map(|(step, _)| *step).collect()
    }

    pub fn failures(&self) -> Vec<Step> {
        self.steps
            .iter()
            .filter(|(_, outcome)| outcome.is_err())
            .map(|(step, _)| *step)
            .collect()
    }
}

/// Runs the landing initialization exactly once per page load.
pub struct Bootstrapper<P: Page> {
    page: P,
    config: Rc<Config>,
    navigator: Rc<Navigator<P>>,
    started: Rc<Cell<bool>>,
}

impl<P: Page> Clone for Bootstrapper<P> {
    fn clone(&self) -> Self {
        Self {
            page: self.page.clone(),
            config: self.config.clone(),
            navigator: self.navigator.clone(),
            started: self.started.clone(),
        }
    }
}

impl<P: Page> Bootstrapper<P> {
    pub fn new(page: P, config: Rc<Config>, navigator: Rc<Navigator<P>>) -> Self {
        Self { page, config, navigator, started: Rc::new(Cell::new(false)) }
    }

    /// Runs now if the document is parsed, otherwise once it is.
    pub fn start(&self) {
        if self.page.is_loading() {
            let this = self.clone();
            self.page.on_ready(Box::new(move || {
                this.run();
            }));
        } else {
            self.run();
        }
    }

    /// Executes every step in order. Returns `None` if it already ran.
    pub fn run(&self) -> Option<BootReport> {
        if self.started.replace(true) {
            return None;
        }
        info!("Initializing Suscri landing page...");

        let page = &self.page;
        let config = self.config.as_ref();
        let mut report = BootReport::default();

        report.record(Step::Images, resolve_images(page, config).map(|_| ()));
        report.record(
            Step::Navigation,
            bind_navigation(page, self.navigator.clone(), config).map(|_| ()),
        );
        report.record(Step::Reveal, init_reveal(page, config).map(|_| ()));
        if config.parallax.enabled {
            report.record(Step::Parallax, init_parallax(page, config));
        }

        if report.failures().is_empty() {
            info!("Landing page initialized");
        } else {
            error!("Landing page initialized with failed steps: {:?}", report.failures());
        }
        Some(report)
    }
}
