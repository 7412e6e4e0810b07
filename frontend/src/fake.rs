//! In-memory page used by the unit tests. Events are fired by hand.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::dom::{
    ClickHandler, Disposition, Element, Intersection, IntersectionHandler, Observer,
    ObserverOptions, Page,
};
use crate::error::DomError;
use crate::notify::{Notifier, Severity};

#[derive(Default)]
struct ElementState {
    tag: String,
    id: RefCell<Option<String>>,
    classes: RefCell<Vec<String>>,
    attributes: RefCell<BTreeMap<String, String>>,
    styles: RefCell<BTreeMap<String, String>>,
    scrolled_into_view: Cell<usize>,
    read_only: Cell<bool>,
}

#[derive(Clone, Default)]
pub struct FakeElement(Rc<ElementState>);

impl FakeElement {
    pub fn new(tag: &str) -> Self {
        FakeElement(Rc::new(ElementState { tag: tag.to_string(), ..Default::default() }))
    }

    pub fn with_id(self, id: &str) -> Self {
        *self.0.id.borrow_mut() = Some(id.to_string());
        self
    }

    pub fn with_class(self, class: &str) -> Self {
        self.0.classes.borrow_mut().push(class.to_string());
        self
    }

    pub fn with_attr(self, name: &str, value: &str) -> Self {
        self.0.attributes.borrow_mut().insert(name.to_string(), value.to_string());
        self
    }

    pub fn read_only(self) -> Self {
        self.0.read_only.set(true);
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.0.classes.borrow().iter().any(|c| c == class)
    }

    pub fn class_count(&self, class: &str) -> usize {
        self.0.classes.borrow().iter().filter(|c| *c == class).count()
    }

    pub fn style(&self, property: &str) -> Option<String> {
        self.0.styles.borrow().get(property).cloned()
    }

    pub fn scrolled_into_view(&self) -> usize {
        self.0.scrolled_into_view.get()
    }

    pub fn same(&self, other: &FakeElement) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn matches_simple(&self, selector: &str) -> Result<bool, DomError> {
        let invalid = || DomError::InvalidSelector {
            selector: selector.to_string(),
            reason: "not a valid selector".to_string(),
        };
        if let Some(id) = selector.strip_prefix('#') {
            if id.is_empty() {
                return Err(invalid());
            }
            return Ok(self.0.id.borrow().as_deref() == Some(id));
        }
        if let Some(class) = selector.strip_prefix('.') {
            return Ok(self.has_class(class));
        }
        let (tag, attr) = match selector.find('[') {
            Some(open) => {
                let inner = selector[open + 1..].strip_suffix(']').ok_or_else(invalid)?;
                (&selector[..open], Some(inner))
            }
            None => (selector, None),
        };
        if !tag.is_empty() && tag != self.0.tag {
            return Ok(false);
        }
        let attributes = self.0.attributes.borrow();
        Ok(match attr {
            None => true,
            Some(inner) => match inner.split_once("^=") {
                Some((name, prefix)) => {
                    let prefix = prefix.trim_matches('"');
                    attributes.get(name).map_or(false, |v| v.starts_with(prefix))
                }
                None => attributes.contains_key(inner),
            },
        })
    }

    fn matches(&self, selector: &str) -> Result<bool, DomError> {
        for part in selector.split(',') {
            if self.matches_simple(part.trim())? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn check_writable(&self) -> Result<(), DomError> {
        if self.0.read_only.get() {
            return Err(DomError::Operation("element is read-only".to_string()));
        }
        Ok(())
    }
}

impl Element for FakeElement {
    fn attribute(&self, name: &str) -> Option<String> {
        self.0.attributes.borrow().get(name).cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) -> Result<(), DomError> {
        self.check_writable()?;
        self.0.attributes.borrow_mut().insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn add_class(&self, class: &str) -> Result<(), DomError> {
        self.check_writable()?;
        if !self.has_class(class) {
            self.0.classes.borrow_mut().push(class.to_string());
        }
        Ok(())
    }

    fn set_style(&self, property: &str, value: &str) -> Result<(), DomError> {
        self.check_writable()?;
        self.0.styles.borrow_mut().insert(property.to_string(), value.to_string());
        Ok(())
    }

    fn scroll_into_view(&self) {
        self.0.scrolled_into_view.set(self.0.scrolled_into_view.get() + 1);
    }
}

#[derive(Clone, Default)]
pub struct FakeObserver {
    pub options: Option<ObserverOptions>,
    observed: Rc<RefCell<Vec<FakeElement>>>,
}

impl FakeObserver {
    pub fn is_observing(&self, target: &FakeElement) -> bool {
        self.observed.borrow().iter().any(|e| e.same(target))
    }

    pub fn observed_count(&self) -> usize {
        self.observed.borrow().len()
    }
}

impl Observer<FakeElement> for FakeObserver {
    fn observe(&self, target: &FakeElement) {
        if !self.is_observing(target) {
            self.observed.borrow_mut().push(target.clone());
        }
    }

    fn unobserve(&self, target: &FakeElement) {
        self.observed.borrow_mut().retain(|e| !e.same(target));
    }
}

type SharedClick = Rc<RefCell<ClickHandler>>;
type SharedScroll = Rc<RefCell<Box<dyn FnMut()>>>;
type SharedIntersection = Rc<RefCell<IntersectionHandler<FakeElement, FakeObserver>>>;

#[derive(Default)]
struct PageState {
    elements: RefCell<Vec<FakeElement>>,
    loading: Cell<bool>,
    ready: RefCell<Vec<Box<dyn FnOnce()>>>,
    clicks: RefCell<Vec<(FakeElement, SharedClick)>>,
    scrolls: RefCell<Vec<SharedScroll>>,
    frames: RefCell<Vec<Box<dyn FnOnce()>>>,
    observers: RefCell<Vec<(FakeObserver, SharedIntersection)>>,
    scroll_y: Cell<f64>,
    navigations: RefCell<Vec<String>>,
    broken_selectors: RefCell<Vec<String>>,
    frames_unavailable: Cell<bool>,
}

#[derive(Clone, Default)]
pub struct FakePage(Rc<PageState>);

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, element: FakeElement) -> FakeElement {
        self.0.elements.borrow_mut().push(element.clone());
        element
    }

    pub fn set_loading(&self, loading: bool) {
        self.0.loading.set(loading);
    }

    /// Ends parsing and delivers the ready event.
    pub fn finish_loading(&self) {
        self.0.loading.set(false);
        let callbacks: Vec<_> = self.0.ready.borrow_mut().drain(..).collect();
        for callback in callbacks {
            callback();
        }
    }

    pub fn break_selector(&self, selector: &str) {
        self.0.broken_selectors.borrow_mut().push(selector.to_string());
    }

    pub fn disable_frames(&self) {
        self.0.frames_unavailable.set(true);
    }

    /// Fires every click handler bound to `target`. `None` when nothing is bound.
    pub fn click(&self, target: &FakeElement) -> Option<Disposition> {
        let handlers: Vec<SharedClick> = self
            .0
            .clicks
            .borrow()
            .iter()
            .filter(|(el, _)| el.same(target))
            .map(|(_, h)| h.clone())
            .collect();
        let mut outcome = None;
        for handler in handlers {
            let disposition = (*handler.borrow_mut())();
            if outcome != Some(Disposition::PreventDefault) {
                outcome = Some(disposition);
            }
        }
        outcome
    }

    pub fn scroll_to(&self, y: f64) {
        self.0.scroll_y.set(y);
        let handlers: Vec<SharedScroll> = self.0.scrolls.borrow().clone();
        for handler in handlers {
            (*handler.borrow_mut())();
        }
    }

    pub fn pending_frames(&self) -> usize {
        self.0.frames.borrow().len()
    }

    /// Runs the frame callbacks queued so far and returns how many ran.
    pub fn run_frame(&self) -> usize {
        let frames: Vec<_> = self.0.frames.borrow_mut().drain(..).collect();
        let count = frames.len();
        for frame in frames {
            frame();
        }
        count
    }

    /// Delivers one intersection entry to every observer watching `target`.
    pub fn intersect(&self, target: &FakeElement, is_intersecting: bool) {
        self.intersect_batch(&[(target.clone(), is_intersecting)]);
    }

    /// Delivers several entries in one callback per observer, keeping only
    /// the targets that observer is watching.
    pub fn intersect_batch(&self, batch: &[(FakeElement, bool)]) {
        let observers: Vec<_> = self.0.observers.borrow().iter().cloned().collect();
        for (observer, handler) in observers {
            let entries: Vec<_> = batch
                .iter()
                .filter(|(target, _)| observer.is_observing(target))
                .map(|(target, is_intersecting)| Intersection {
                    target: target.clone(),
                    is_intersecting: *is_intersecting,
                })
                .collect();
            if !entries.is_empty() {
                (*handler.borrow_mut())(entries, &observer);
            }
        }
    }

    pub fn observers(&self) -> Vec<FakeObserver> {
        self.0.observers.borrow().iter().map(|(o, _)| o.clone()).collect()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.0.navigations.borrow().clone()
    }

    pub fn scroll_listeners(&self) -> usize {
        self.0.scrolls.borrow().len()
    }

    fn check_selector(&self, selector: &str) -> Result<(), DomError> {
        if self.0.broken_selectors.borrow().iter().any(|s| s == selector) {
            return Err(DomError::InvalidSelector {
                selector: selector.to_string(),
                reason: "rejected by test".to_string(),
            });
        }
        Ok(())
    }
}

impl Page for FakePage {
    type Element = FakeElement;
    type Observer = FakeObserver;

    fn is_loading(&self) -> bool {
        self.0.loading.get()
    }

    fn on_ready(&self, callback: Box<dyn FnOnce()>) {
        self.0.ready.borrow_mut().push(callback);
    }

    fn element_by_id(&self, id: &str) -> Option<FakeElement> {
        self.0
            .elements
            .borrow()
            .iter()
            .find(|e| e.0.id.borrow().as_deref() == Some(id))
            .cloned()
    }

    fn query(&self, selector: &str) -> Result<Option<FakeElement>, DomError> {
        Ok(self.query_all(selector)?.into_iter().next())
    }

    fn query_all(&self, selector: &str) -> Result<Vec<FakeElement>, DomError> {
        self.check_selector(selector)?;
        let mut found = Vec::new();
        for element in self.0.elements.borrow().iter() {
            if element.matches(selector)? {
                found.push(element.clone());
            }
        }
        Ok(found)
    }

    fn on_click(&self, target: &FakeElement, handler: ClickHandler) {
        self.0.clicks.borrow_mut().push((target.clone(), Rc::new(RefCell::new(handler))));
    }

    fn on_scroll(&self, handler: Box<dyn FnMut()>) {
        self.0.scrolls.borrow_mut().push(Rc::new(RefCell::new(handler)));
    }

    fn request_frame(&self, callback: Box<dyn FnOnce()>) -> Result<(), DomError> {
        if self.0.frames_unavailable.get() {
            return Err(DomError::Operation("requestAnimationFrame unavailable".to_string()));
        }
        self.0.frames.borrow_mut().push(callback);
        Ok(())
    }

    fn intersection_observer(
        &self,
        options: &ObserverOptions,
        handler: IntersectionHandler<FakeElement, FakeObserver>,
    ) -> Result<FakeObserver, DomError> {
        let observer = FakeObserver { options: Some(options.clone()), ..Default::default() };
        self.0
            .observers
            .borrow_mut()
            .push((observer.clone(), Rc::new(RefCell::new(handler))));
        Ok(observer)
    }

    fn scroll_y(&self) -> f64 {
        self.0.scroll_y.get()
    }

    fn navigate(&self, url: &str) -> Result<(), DomError> {
        self.0.navigations.borrow_mut().push(url.to_string());
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct RecordingNotifier(Rc<RefCell<Vec<(String, Severity)>>>);

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<(String, Severity)> {
        self.0.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        self.0.borrow_mut().push((message.to_string(), severity));
    }
}
