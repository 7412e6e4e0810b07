//! The page the landing runtime operates on.
//!
//! Components never touch the browser globals directly; they receive a
//! [`Page`] and subscribe to its events. The browser implementation lives in
//! `web`, tests drive an in-memory one.

use crate::error::DomError;

/// What should happen to the browser's default action after a click handler ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Default,
    PreventDefault,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObserverOptions {
    pub threshold: f64,
    pub root_margin: String,
}

#[derive(Debug, Clone)]
pub struct Intersection<E> {
    pub target: E,
    pub is_intersecting: bool,
}

pub trait Element: Clone + 'static {
    fn attribute(&self, name: &str) -> Option<String>;
    fn set_attribute(&self, name: &str, value: &str) -> Result<(), DomError>;
    fn add_class(&self, class: &str) -> Result<(), DomError>;
    fn set_style(&self, property: &str, value: &str) -> Result<(), DomError>;
    /// Smooth scroll, element aligned with the top of the viewport.
    fn scroll_into_view(&self);
}

pub trait Observer<E> {
    fn observe(&self, target: &E);
    fn unobserve(&self, target: &E);
}

pub type ClickHandler = Box<dyn FnMut() -> Disposition>;
pub type IntersectionHandler<E, O> = Box<dyn FnMut(Vec<Intersection<E>>, &O)>;

pub trait Page: Clone + 'static {
    type Element: Element;
    type Observer: Observer<Self::Element>;

    /// True while the document's structure is still being parsed.
    fn is_loading(&self) -> bool;
    /// Runs `callback` once the structure has been parsed.
    fn on_ready(&self, callback: Box<dyn FnOnce()>);

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;
    fn query(&self, selector: &str) -> Result<Option<Self::Element>, DomError>;
    fn query_all(&self, selector: &str) -> Result<Vec<Self::Element>, DomError>;

    fn on_click(&self, target: &Self::Element, handler: ClickHandler);
    fn on_scroll(&self, handler: Box<dyn FnMut()>);
    fn request_frame(&self, callback: Box<dyn FnOnce()>) -> Result<(), DomError>;
    fn intersection_observer(
        &self,
        options: &ObserverOptions,
        handler: IntersectionHandler<Self::Element, Self::Observer>,
    ) -> Result<Self::Observer, DomError>;

    fn scroll_y(&self) -> f64;
    fn navigate(&self, url: &str) -> Result<(), DomError>;
}
