#![forbid(unsafe_code)]

//! `wasm-bindgen` exports and DOM implementations of the core host traits.
//!
//! Only compiled on `wasm32` targets.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Function};
use scrollspy_core::{ListContainer, Page, Scrollspy, SectionClick, Update};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, HtmlAnchorElement, HtmlElement, Window};

use crate::link::same_document_hash;
use crate::options::{OptionsError, parse_anchor_list, parse_options};

fn console_error(msg: &str) {
    web_sys::console::error_1(&JsValue::from_str(msg));
}

fn install_panic_hook() {
    static ONCE: std::sync::Once = std::sync::Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            console_error(&format!("scrollspy panic: {info}"));
        }));
    });
}

fn to_js(err: impl Into<OptionsError>) -> JsValue {
    JsValue::from_str(&err.into().to_string())
}

// ---------------------------------------------------------------------------
// Host trait implementations
// ---------------------------------------------------------------------------

/// The live document.
struct DomPage {
    window: Window,
    document: Document,
}

impl Page for DomPage {
    type Target = Element;

    fn resolve(&self, anchor: &scrollspy_core::Anchor) -> Option<Element> {
        self.document.get_element_by_id(anchor.id())
    }

    fn top_offset(&self, target: &Element) -> f64 {
        target.get_bounding_client_rect().top()
    }

    fn viewport_height(&self) -> f64 {
        self.window
            .inner_height()
            .ok()
            .and_then(|height| height.as_f64())
            .unwrap_or(0.0)
    }

    fn scroll_offset(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }
}

/// The navigation `<ul>` (or any scrollable element).
struct DomList {
    element: HtmlElement,
}

impl DomList {
    fn items(&self) -> Vec<Element> {
        let children = self.element.children();
        (0..children.length())
            .filter_map(|index| children.item(index))
            .collect()
    }

    /// Hash of the in-page navigation link a click landed on, if any.
    fn link_hash(&self, event: &Event, page_pathname: &str) -> Option<String> {
        let target = event.target()?.dyn_into::<Element>().ok()?;
        let link = target.closest("a[href]").ok()??;
        if !self.element.contains(Some(link.as_ref())) {
            return None;
        }
        let link = link.dyn_into::<HtmlAnchorElement>().ok()?;
        let hash = link.hash();
        same_document_hash(&link.pathname(), page_pathname, &hash).map(str::to_owned)
    }
}

impl ListContainer for DomList {
    fn scroll_height(&self) -> f64 {
        f64::from(self.element.scroll_height())
    }

    fn client_height(&self) -> f64 {
        f64::from(self.element.client_height())
    }

    fn scroll_top(&self) -> f64 {
        f64::from(self.element.scroll_top())
    }

    fn set_scroll_top(&mut self, value: f64) {
        self.element.set_scroll_top(value.round() as i32);
    }

    fn is_mounted(&self) -> bool {
        self.element.is_connected()
    }
}

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

struct Inner {
    spy: Scrollspy<Element, Element>,
    page: DomPage,
    list: DomList,
    apply_scroll_margin: bool,
}

impl Inner {
    fn mount(&mut self) {
        let update = self.spy.mount(&self.page, &mut self.list);
        self.apply_scroll_margin();
        self.paint(update, true);
    }

    fn page_scroll(&mut self) {
        let update = self.spy.on_page_scroll(&self.page, &mut self.list);
        self.paint(update, false);
    }

    fn list_scroll(&mut self) {
        let _ = self.spy.on_container_scroll(&self.list);
    }

    /// Returns whether the click was a navigation link the spy handled.
    fn click(&mut self, event: &Event) -> bool {
        let pathname = self.page.window.location().pathname().unwrap_or_default();
        let click = match self.list.link_hash(event, &pathname) {
            Some(hash) => SectionClick::Link { hash },
            None => SectionClick::Other,
        };
        let outcome = self.spy.on_section_click(&click, &mut self.list);
        if let scrollspy_core::ClickOutcome::Handled(update) = outcome {
            self.paint(update, false);
        }
        outcome.stops_propagation()
    }

    fn set_route(&mut self, path: &str) {
        let update = self.spy.set_route(path, &self.page, &mut self.list);
        if update.activation.is_some() {
            self.apply_scroll_margin();
        }
        self.paint(update, false);
    }

    fn set_anchors(&mut self, anchors_json: &str) -> Result<(), JsValue> {
        let anchors = parse_anchor_list(anchors_json).map_err(to_js)?;
        let items = self.list.items();
        let update = self
            .spy
            .set_anchors(anchors, items, &self.page, &mut self.list)
            .map_err(to_js)?;
        self.apply_scroll_margin();
        self.paint(update, true);
        Ok(())
    }

    /// Offset resolved sections so anchor jumps land below the header.
    /// Only when the host opted in.
    fn apply_scroll_margin(&self) {
        if !self.apply_scroll_margin {
            return;
        }
        let margin = format!("{}px", self.spy.config().scroll_margin());
        for target in self.spy.targets().iter().flatten() {
            if let Some(section) = target.dyn_ref::<HtmlElement>() {
                let _ = section.style().set_property("scroll-margin-top", &margin);
            }
        }
    }

    /// Toggle the active class on every item.
    fn paint(&self, update: Update, force: bool) {
        if !(force || update.needs_render()) || !self.spy.config().marks_active() {
            return;
        }
        let class = self.spy.config().active_class.as_str();
        let _ = self
            .spy
            .render(|item, active| item.class_list().toggle_with_force(class, active));
    }
}

// ---------------------------------------------------------------------------
// Listeners
// ---------------------------------------------------------------------------

type Listener = Closure<dyn FnMut(Event)>;

/// Attached event listeners; detached on drop.
struct Listeners {
    window: Window,
    list: HtmlElement,
    page_scroll: Listener,
    list_scroll: Listener,
    click: Listener,
}

impl Listeners {
    fn attach(
        inner: &Rc<RefCell<Inner>>,
        on_section_click: Option<Function>,
    ) -> Result<Self, JsValue> {
        let (window, list) = {
            let state = inner.borrow();
            (state.page.window.clone(), state.list.element.clone())
        };

        let page_scroll = {
            let inner = Rc::clone(inner);
            Closure::wrap(Box::new(move |_event: Event| {
                inner.borrow_mut().page_scroll();
            }) as Box<dyn FnMut(Event)>)
        };

        let list_scroll = {
            let inner = Rc::clone(inner);
            Closure::wrap(Box::new(move |_event: Event| {
                inner.borrow_mut().list_scroll();
            }) as Box<dyn FnMut(Event)>)
        };

        let click = {
            let inner = Rc::clone(inner);
            Closure::wrap(Box::new(move |event: Event| {
                // Release the borrow before calling out: the callback may
                // re-enter the handle.
                let handled = inner.borrow_mut().click(&event);
                if !handled {
                    return;
                }
                event.stop_propagation();
                if let Some(callback) = on_section_click.as_ref()
                    && let Err(err) = callback.call1(&JsValue::NULL, &event)
                {
                    console_error(&format!("onSectionClick threw: {err:?}"));
                }
            }) as Box<dyn FnMut(Event)>)
        };

        window
            .add_event_listener_with_callback("scroll", page_scroll.as_ref().unchecked_ref())?;
        list.add_event_listener_with_callback("scroll", list_scroll.as_ref().unchecked_ref())?;
        list.add_event_listener_with_callback("click", click.as_ref().unchecked_ref())?;

        Ok(Self {
            window,
            list,
            page_scroll,
            list_scroll,
            click,
        })
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        let _ = self.window.remove_event_listener_with_callback(
            "scroll",
            self.page_scroll.as_ref().unchecked_ref(),
        );
        let _ = self
            .list
            .remove_event_listener_with_callback("scroll", self.list_scroll.as_ref().unchecked_ref());
        let _ = self
            .list
            .remove_event_listener_with_callback("click", self.click.as_ref().unchecked_ref());
    }
}

// ---------------------------------------------------------------------------
// Exports
// ---------------------------------------------------------------------------

/// Scrollspy attached to a navigation list.
///
/// Listeners are attached by the constructor and removed by
/// [`destroy`](Self::destroy) or when the handle is freed.
#[wasm_bindgen]
pub struct ScrollspyHandle {
    inner: Rc<RefCell<Inner>>,
    listeners: Option<Listeners>,
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    install_panic_hook();
}

#[wasm_bindgen]
impl ScrollspyHandle {
    /// Attach to `list`, whose element children are the navigation items.
    ///
    /// `options` is the JSON document described in the crate docs.
    /// `on_section_click` receives the original click event after a
    /// navigation link was handled.
    #[wasm_bindgen(constructor)]
    pub fn new(
        list: HtmlElement,
        options: &str,
        on_section_click: Option<Function>,
    ) -> Result<ScrollspyHandle, JsValue> {
        install_panic_hook();

        let options = parse_options(options).map_err(to_js)?;
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("window has no document"))?;

        let list = DomList { element: list };
        let spy =
            Scrollspy::new(options.config, options.anchors, list.items()).map_err(to_js)?;
        let inner = Rc::new(RefCell::new(Inner {
            spy,
            page: DomPage { window, document },
            list,
            apply_scroll_margin: options.apply_scroll_margin,
        }));

        inner.borrow_mut().mount();
        let listeners = Listeners::attach(&inner, on_section_click)?;

        Ok(Self {
            inner,
            listeners: Some(listeners),
        })
    }

    /// Report a route change. A new path re-resolves every section.
    #[wasm_bindgen(js_name = setRoute)]
    pub fn set_route(&mut self, path: &str) {
        self.inner.borrow_mut().set_route(path);
    }

    /// Replace the anchor list (JSON array of `#id` strings). The list's
    /// current children become the items.
    #[wasm_bindgen(js_name = setAnchors)]
    pub fn set_anchors(&mut self, anchors: &str) -> Result<(), JsValue> {
        self.inner.borrow_mut().set_anchors(anchors)
    }

    /// Re-resolve sections after the page content changed in place.
    pub fn refresh(&mut self) {
        self.inner.borrow_mut().mount();
    }

    /// Index of the active item, or `undefined`.
    #[wasm_bindgen(js_name = activeIndex)]
    pub fn active_index(&self) -> Option<u32> {
        self.inner
            .borrow()
            .spy
            .active_index()
            .and_then(|index| u32::try_from(index).ok())
    }

    /// Active flags, one per anchor. Returns `Array<boolean>`.
    #[wasm_bindgen(js_name = viewState)]
    pub fn view_state(&self) -> Array {
        self.inner
            .borrow()
            .spy
            .view_state()
            .as_slice()
            .iter()
            .map(|&active| JsValue::from_bool(active))
            .collect()
    }

    /// Detach all listeners. The handle stays queryable.
    pub fn destroy(&mut self) {
        self.listeners = None;
    }
}
