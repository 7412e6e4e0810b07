//! Browser side: `Page` over web-sys and the `window.SuscriLanding` API.

use std::rc::Rc;

use gloo_net::http::{Method as HttpMethod, Request};
use log::{error, info, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::WasmClosure;
use wasm_bindgen_futures::future_to_promise;
use web_sys::js_sys::{Object, Promise, Reflect};
use web_sys::{
    Document, HtmlElement, IntersectionObserverEntry,
    IntersectionObserverInit, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
    Window,
};

use crate::api::{self, ApiClient, ApiRequest, Endpoint, Method, RawResponse, RequestOptions, Transport};
use crate::bootstrap::Bootstrapper;
use crate::config::Config;
use crate::dom::{
    ClickHandler, Disposition, Element, Intersection, IntersectionHandler, Observer,
    ObserverOptions, Page,
};
use crate::error::{DomError, NetworkError};
use crate::navigation::Navigator;
use crate::notify::{log_notification, Notifier, Severity};
use crate::validate::is_valid_email;

const CONFIG_ELEMENT_ID: &str = "landing-config";

fn js_error(value: JsValue) -> DomError {
    DomError::Operation(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}

#[derive(Clone)]
pub struct WebElement(web_sys::Element);

impl Element for WebElement {
    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    fn set_attribute(&self, name: &str, value: &str) -> Result<(), DomError> {
        self.0.set_attribute(name, value).map_err(js_error)
    }

    fn add_class(&self, class: &str) -> Result<(), DomError> {
        self.0.class_list().add_1(class).map_err(js_error)
    }

    fn set_style(&self, property: &str, value: &str) -> Result<(), DomError> {
        let element = self
            .0
            .dyn_ref::<HtmlElement>()
            .ok_or_else(|| DomError::Operation(format!("<{}> has no style", self.0.tag_name())))?;
        element.style().set_property(property, value).map_err(js_error)
    }

    fn scroll_into_view(&self) {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Start);
        self.0.scroll_into_view_with_scroll_into_view_options(&options);
    }
}

#[derive(Clone)]
pub struct WebObserver(web_sys::IntersectionObserver);

impl Observer<WebElement> for WebObserver {
    fn observe(&self, target: &WebElement) {
        self.0.observe(&target.0);
    }

    fn unobserve(&self, target: &WebElement) {
        self.0.unobserve(&target.0);
    }
}

#[derive(Clone)]
pub struct WebPage {
    window: Window,
    document: Document,
}

impl WebPage {
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self { window, document })
    }
}

impl Page for WebPage {
    type Element = WebElement;
    type Observer = WebObserver;

    fn is_loading(&self) -> bool {
        self.document.ready_state() == "loading"
    }

    fn on_ready(&self, callback: Box<dyn FnOnce()>) {
        let listener = Closure::once_into_js(move || callback());
        if let Err(e) = self
            .document
            .add_event_listener_with_callback("DOMContentLoaded", listener.unchecked_ref())
        {
            error!("Could not wait for DOMContentLoaded: {:?}", e);
        }
    }

    fn element_by_id(&self, id: &str) -> Option<WebElement> {
        self.document.get_element_by_id(id).map(WebElement)
    }

    fn query(&self, selector: &str) -> Result<Option<WebElement>, DomError> {
        self.document
            .query_selector(selector)
            .map(|found| found.map(WebElement))
            .map_err(|e| DomError::InvalidSelector {
                selector: selector.to_string(),
                reason: format!("{:?}", e),
            })
    }

    fn query_all(&self, selector: &str) -> Result<Vec<WebElement>, DomError> {
        let nodes = self.document.query_selector_all(selector).map_err(|e| {
            DomError::InvalidSelector { selector: selector.to_string(), reason: format!("{:?}", e) }
        })?;
        Ok((0..nodes.length())
            .filter_map(|i| nodes.get(i))
            .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
            .map(WebElement)
            .collect())
    }

    fn on_click(&self, target: &WebElement, mut handler: ClickHandler) {
        let callback = Closure::wrap(Box::new(move |event: web_sys::Event| {
            if handler() == Disposition::PreventDefault {
                event.prevent_default();
            }
        }) as Box<dyn FnMut(web_sys::Event)>);
        if let Err(e) = target
            .0
            .add_event_listener_with_callback("click", callback.as_ref().unchecked_ref())
        {
            warn!("Could not bind click handler: {:?}", e);
        }
        // Bound for the lifetime of the page.
        callback.forget();
    }

    fn on_scroll(&self, handler: Box<dyn FnMut()>) {
        let callback = Closure::wrap(handler);
        if let Err(e) = self
            .window
            .add_event_listener_with_callback("scroll", callback.as_ref().unchecked_ref())
        {
            warn!("Could not bind scroll handler: {:?}", e);
        }
        callback.forget();
    }

    fn request_frame(&self, callback: Box<dyn FnOnce()>) -> Result<(), DomError> {
        let frame = Closure::once_into_js(move || callback());
        self.window
            .request_animation_frame(frame.unchecked_ref())
            .map(|_| ())
            .map_err(js_error)
    }

    fn intersection_observer(
        &self,
        options: &ObserverOptions,
        mut handler: IntersectionHandler<WebElement, WebObserver>,
    ) -> Result<WebObserver, DomError> {
        let callback = Closure::wrap(Box::new(
            move |entries: web_sys::js_sys::Array, observer: web_sys::IntersectionObserver| {
                let entries = entries
                    .iter()
                    .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                    .map(|entry| Intersection {
                        target: WebElement(entry.target()),
                        is_intersecting: entry.is_intersecting(),
                    })
                    .collect();
                handler(entries, &WebObserver(observer));
            },
        )
            as Box<dyn FnMut(web_sys::js_sys::Array, web_sys::IntersectionObserver)>);

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin);
        let observer = web_sys::IntersectionObserver::new_with_options(
            callback.as_ref().unchecked_ref(),
            &init,
        )
        .map_err(js_error)?;
        callback.forget();
        Ok(WebObserver(observer))
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn navigate(&self, url: &str) -> Result<(), DomError> {
        self.window.location().set_href(url).map_err(js_error)
    }
}

/// Writes the console record, then blocks on `alert`.
// TODO: replace the alert with a non-blocking toast in the landing stylesheet.
#[derive(Clone)]
pub struct AlertNotifier {
    window: Window,
}

impl Notifier for AlertNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        log_notification(message, severity);
        if let Err(e) = self.window.alert_with_message(message) {
            warn!("Could not show alert: {:?}", e);
        }
    }
}

pub struct GlooTransport;

impl Transport for GlooTransport {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, NetworkError> {
        let method = match request.method {
            Method::Get => HttpMethod::GET,
            Method::Post => HttpMethod::POST,
            Method::Put => HttpMethod::PUT,
            Method::Patch => HttpMethod::PATCH,
            Method::Delete => HttpMethod::DELETE,
        };
        let mut builder = Request::new(&request.url).method(method);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.as_str());
        }
        let response = builder
            .send()
            .await
            .map_err(|e| NetworkError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| NetworkError::Transport(e.to_string()))?;
        Ok(RawResponse { status, body })
    }
}

fn load_config(page: &WebPage) -> Config {
    let Some(raw) = page
        .document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content())
    else {
        return Config::default();
    };
    match Config::from_json(&raw) {
        Ok(config) => config,
        Err(e) => {
            error!("{}, falling back to defaults", e);
            Config::default()
        }
    }
}

fn js_reject(e: impl ToString) -> JsValue {
    web_sys::js_sys::Error::new(&e.to_string()).into()
}

/// `apiRequest(url, options?)`: resolves with the parsed JSON body.
#[wasm_bindgen(js_name = apiRequest)]
pub async fn api_request(url: String, options: JsValue) -> Result<JsValue, JsValue> {
    let options: RequestOptions = if options.is_undefined() || options.is_null() {
        RequestOptions::default()
    } else {
        serde_wasm_bindgen::from_value(options).map_err(js_reject)?
    };
    let request = options.into_request(&url).map_err(js_reject)?;
    let body: serde_json::Value = api::request_json(&GlooTransport, request)
        .await
        .map_err(js_reject)?;
    serde_wasm_bindgen::to_value(&body).map_err(js_reject)
}

fn post_endpoint(client: &Rc<ApiClient<GlooTransport>>, endpoint: Endpoint, body: JsValue) -> Promise {
    let client = client.clone();
    future_to_promise(async move {
        let body: serde_json::Value = serde_wasm_bindgen::from_value(body).map_err(js_reject)?;
        let reply: serde_json::Value = client.post(endpoint, &body).await.map_err(js_reject)?;
        serde_wasm_bindgen::to_value(&reply).map_err(js_reject)
    })
}

fn set_function<T>(target: &Object, name: &str, closure: Closure<T>) -> Result<(), JsValue>
where
    T: ?Sized + WasmClosure,
{
    Reflect::set(target, &JsValue::from_str(name), closure.as_ref())?;
    // Published for the lifetime of the page.
    closure.forget();
    Ok(())
}

/// Publishes `window.SuscriLanding` as a plain object of functions, so page
/// scripts can detach them (`const { isValidEmail } = SuscriLanding`).
fn publish_api(
    window: &Window,
    navigator: Rc<Navigator<WebPage>>,
    client: Rc<ApiClient<GlooTransport>>,
) -> Result<(), JsValue> {
    let api = Object::new();

    let nav = navigator.clone();
    set_function(
        &api,
        "redirectToCreateClub",
        Closure::wrap(Box::new(move || nav.redirect_to_create_club()) as Box<dyn FnMut()>),
    )?;
    let nav = navigator.clone();
    set_function(
        &api,
        "redirectToLogin",
        Closure::wrap(Box::new(move || nav.redirect_to_login()) as Box<dyn FnMut()>),
    )?;
    let nav = navigator;
    set_function(
        &api,
        "showNotification",
        Closure::wrap(Box::new(move |message: JsValue, kind: JsValue| {
            let severity = Severity::from_js_type(kind.as_string().as_deref());
            nav.notifier().notify(&message.as_string().unwrap_or_default(), severity);
        }) as Box<dyn FnMut(JsValue, JsValue)>),
    )?;
    set_function(
        &api,
        "isValidEmail",
        Closure::wrap(Box::new(move |email: JsValue| {
            email.as_string().map_or(false, |e| is_valid_email(&e))
        }) as Box<dyn FnMut(JsValue) -> bool>),
    )?;
    set_function(
        &api,
        "apiRequest",
        Closure::wrap(Box::new(move |url: JsValue, options: JsValue| {
            future_to_promise(api_request(url.as_string().unwrap_or_default(), options))
        }) as Box<dyn FnMut(JsValue, JsValue) -> Promise>),
    )?;
    let register = client.clone();
    set_function(
        &api,
        "register",
        Closure::wrap(Box::new(move |body: JsValue| post_endpoint(&register, Endpoint::Register, body))
            as Box<dyn FnMut(JsValue) -> Promise>),
    )?;
    let login = client.clone();
    set_function(
        &api,
        "login",
        Closure::wrap(Box::new(move |body: JsValue| post_endpoint(&login, Endpoint::Login, body))
            as Box<dyn FnMut(JsValue) -> Promise>),
    )?;
    set_function(
        &api,
        "googleAuthUrl",
        Closure::wrap(Box::new(move || client.url(Endpoint::GoogleAuth)) as Box<dyn FnMut() -> String>),
    )?;

    Reflect::set(window, &JsValue::from_str("SuscriLanding"), &api)?;
    Ok(())
}

/// Entry point: builds the page context, bootstraps, publishes the API.
pub fn start() {
    let Some(page) = WebPage::new() else {
        error!("No window/document available, landing runtime not started");
        return;
    };
    let config = Rc::new(load_config(&page));
    let notifier = Rc::new(AlertNotifier { window: page.window.clone() });
    let navigator = Rc::new(Navigator::new(page.clone(), notifier, config.routes.clone()));
    let client = Rc::new(ApiClient::new(GlooTransport, config.clone()));

    if let Err(e) = publish_api(&page.window, navigator.clone(), client) {
        error!("Could not publish window.SuscriLanding: {:?}", e);
    }

    Bootstrapper::new(page, config, navigator).start();
    info!("Landing runtime loaded");
}
