use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use tokio::sync::mpsc;
use url::Url;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement, HtmlInputElement, KeyboardEvent, Window};

use tailview_app::config::Settings;
use tailview_app::{Engine, Host, InputKey, LineView, Location, Message, RenderSurface, Target};
use tailview_core::prelude::*;
use tailview_core::{EntryId, Theme};

use crate::bridge::{self, LINE_ID_ATTRIBUTE, THEME_STORAGE_KEY, WINDOW_FOCUS_EVENTS};

type WebEngine = Engine<DomSurface, BrowserHost>;

#[wasm_bindgen]
extern "C" {
    /// Favicon badge library loaded by the page
    #[wasm_bindgen(catch, js_namespace = Tinycon, js_name = setBubble)]
    fn tinycon_set_bubble(count: u32) -> std::result::Result<(), JsValue>;
}

fn dom_err(e: JsValue) -> Error {
    Error::surface(format!("{:?}", e))
}

fn storage_err(e: JsValue) -> Error {
    Error::storage(format!("{:?}", e))
}

// ─────────────────────────────────────────────────────────────────────────────
// DomSurface
// ─────────────────────────────────────────────────────────────────────────────

/// The page's elements, mutated only through [`RenderSurface`]
pub struct DomSurface {
    window: Window,
    document: Document,
    root: Element,
    body: HtmlElement,
    topbar: Element,
    container: Element,
    pause_button: Element,
    theme_button: Element,
    filter_input: HtmlInputElement,
}

impl DomSurface {
    fn element(&self, target: Target) -> &Element {
        match target {
            Target::Root => &self.root,
            Target::Body => &self.body,
            Target::Topbar => &self.topbar,
            Target::LogContainer => &self.container,
            Target::PauseButton => &self.pause_button,
            Target::ThemeButton => &self.theme_button,
        }
    }

    fn build_line(&self, line: &LineView) -> Result<HtmlElement> {
        let div: HtmlElement = self
            .document
            .create_element("div")
            .map_err(dom_err)?
            .unchecked_into();
        div.set_class_name(&line.classes.join(" "));
        div.set_attribute(LINE_ID_ATTRIBUTE, &line.id.to_string())
            .map_err(dom_err)?;

        let p = self.document.create_element("p").map_err(dom_err)?;
        p.set_class_name("inner-line");
        p.set_inner_html(&line.markup);
        div.append_child(&p).map_err(dom_err)?;

        set_display(&div, line.visible)?;
        Ok(div)
    }

    fn line(&self, id: EntryId) -> Result<HtmlElement> {
        let selector = format!("[{}=\"{}\"]", LINE_ID_ATTRIBUTE, id);
        self.container
            .query_selector(&selector)
            .map_err(dom_err)?
            .map(|e| e.unchecked_into::<HtmlElement>())
            .ok_or_else(|| Error::surface(format!("no line with id {}", id)))
    }
}

fn set_display(element: &HtmlElement, visible: bool) -> Result<()> {
    let style = element.style();
    if visible {
        style.remove_property("display").map_err(dom_err)?;
    } else {
        style.set_property("display", "none").map_err(dom_err)?;
    }
    Ok(())
}

impl RenderSurface for DomSurface {
    fn is_scrolled_to_bottom(&self) -> bool {
        let inner_height = self
            .window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let offset = self.window.page_y_offset().unwrap_or(0.0);
        bridge::is_pinned(inner_height, offset, f64::from(self.body.offset_height()))
    }

    fn append_line(&mut self, line: &LineView) -> Result<()> {
        let div = self.build_line(line)?;
        self.container.append_child(&div).map_err(dom_err)?;
        Ok(())
    }

    fn replace_last_line(&mut self, line: &LineView) -> Result<()> {
        let last = self
            .container
            .last_element_child()
            .ok_or_else(|| Error::surface("no line to replace"))?;
        let div = self.build_line(line)?;
        self.container.replace_child(&div, &last).map_err(dom_err)?;
        Ok(())
    }

    fn remove_first_line(&mut self) -> Result<()> {
        let first = self
            .container
            .first_element_child()
            .ok_or_else(|| Error::surface("no line to remove"))?;
        first.remove();
        Ok(())
    }

    fn set_line_visible(&mut self, id: EntryId, visible: bool) -> Result<()> {
        set_display(&self.line(id)?, visible)
    }

    fn set_line_selected(&mut self, id: EntryId, selected: bool) -> Result<()> {
        self.line(id)?
            .class_list()
            .toggle_with_force("line-selected", selected)
            .map_err(dom_err)?;
        Ok(())
    }

    fn scroll_to_bottom(&mut self) -> Result<()> {
        self.window
            .scroll_to_with_x_and_y(0.0, f64::from(self.body.scroll_height()));
        Ok(())
    }

    fn set_root_attribute(&mut self, name: &str, value: &str) -> Result<()> {
        self.root.set_attribute(name, value).map_err(dom_err)
    }

    fn add_class(&mut self, target: Target, class: &str) -> Result<()> {
        self.element(target).class_list().add_1(class).map_err(dom_err)
    }

    fn remove_class(&mut self, target: Target, class: &str) -> Result<()> {
        self.element(target)
            .class_list()
            .remove_1(class)
            .map_err(dom_err)
    }

    fn set_class(&mut self, target: Target, class: &str) -> Result<()> {
        self.element(target).set_class_name(class);
        Ok(())
    }

    fn set_filter_input(&mut self, value: &str) -> Result<()> {
        self.filter_input.set_value(value);
        Ok(())
    }

    fn focus_filter_input(&mut self) -> Result<()> {
        self.filter_input.focus().map_err(dom_err)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// BrowserHost
// ─────────────────────────────────────────────────────────────────────────────

/// Routes messages back into the engine from JS callbacks.
///
/// Callbacks normally run with the engine idle. If one fires while the
/// engine is mid-update (an event dispatched synchronously by a DOM
/// mutation), the message is queued and drained once that update returns.
#[derive(Clone)]
struct Dispatcher {
    engine: Weak<RefCell<WebEngine>>,
    msg_tx: mpsc::Sender<Message>,
}

impl Dispatcher {
    fn dispatch(&self, msg: Message) {
        let Some(engine) = self.engine.upgrade() else {
            return;
        };
        match engine.try_borrow_mut() {
            Ok(mut engine) => {
                engine.process_message(msg);
                engine.drain_pending_messages();
            }
            Err(_) => {
                if let Err(e) = self.msg_tx.try_send(msg) {
                    warn!("Dropped message while engine busy: {}", e);
                }
            }
        }
    }
}

/// History, local storage, timers and the favicon badge
pub struct BrowserHost {
    window: Window,
    document: Document,
    dispatcher: Option<Dispatcher>,
}

impl Host for BrowserHost {
    fn replace_url(&mut self, url: &Url) -> Result<()> {
        self.window
            .history()
            .and_then(|h| {
                h.replace_state_with_url(&JsValue::NULL, &self.document.title(), Some(url.as_str()))
            })
            .map_err(|e| Error::url(format!("{:?}", e)))
    }

    fn set_badge(&mut self, count: u32) -> Result<()> {
        tinycon_set_bubble(count).map_err(dom_err)
    }

    fn load_theme(&self) -> Result<Option<Theme>> {
        let Some(storage) = self.window.local_storage().map_err(storage_err)? else {
            return Ok(None);
        };
        match storage.get_item(THEME_STORAGE_KEY).map_err(storage_err)? {
            Some(value) => value.parse().map(Some),
            None => Ok(None),
        }
    }

    fn store_theme(&mut self, theme: Theme) -> Result<()> {
        let storage = self
            .window
            .local_storage()
            .map_err(storage_err)?
            .ok_or_else(|| Error::storage("localStorage unavailable"))?;
        storage
            .set_item(THEME_STORAGE_KEY, theme.as_str())
            .map_err(storage_err)
    }

    fn schedule(&mut self, delay: Duration, message: Message) -> Result<()> {
        let dispatcher = self
            .dispatcher
            .clone()
            .ok_or_else(|| Error::config("timer requested before the page was wired"))?;
        let callback = Closure::once_into_js(move || dispatcher.dispatch(message));
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        self.window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), millis)
            .map_err(dom_err)?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TailView (JS API)
// ─────────────────────────────────────────────────────────────────────────────

/// Page controller exported to JavaScript.
///
/// ```js
/// const view = new TailView(container, filterInput, pauseBtn, themeBtn, topbar, document.body);
/// socket.onAny((name, payload) => view.onEvent(name, payload));
/// ```
#[wasm_bindgen]
pub struct TailView {
    engine: Rc<RefCell<WebEngine>>,
    dispatcher: Dispatcher,
    _listeners: Vec<Closure<dyn FnMut(Event)>>,
}

#[wasm_bindgen]
impl TailView {
    /// Wire the page elements, restore the theme and seed the filter from
    /// the address bar.
    #[wasm_bindgen(constructor)]
    pub fn new(
        container: Element,
        filter_input: HtmlInputElement,
        pause_button: Element,
        theme_button: Element,
        topbar: Element,
        body: HtmlElement,
    ) -> std::result::Result<TailView, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let root = document
            .document_element()
            .ok_or_else(|| JsValue::from_str("no document element"))?;
        let href = window.location().href()?;
        let location = Location::parse(&href).map_err(|e| JsValue::from_str(&e.to_string()))?;

        let surface = DomSurface {
            window: window.clone(),
            document: document.clone(),
            root,
            body,
            topbar,
            container: container.clone(),
            pause_button: pause_button.clone(),
            theme_button: theme_button.clone(),
            filter_input: filter_input.clone(),
        };

        let host = BrowserHost {
            window: window.clone(),
            document,
            dispatcher: None,
        };
        let engine = Rc::new(RefCell::new(Engine::new(
            surface,
            host,
            location,
            Settings::default(),
        )));

        let dispatcher = Dispatcher {
            engine: Rc::downgrade(&engine),
            msg_tx: engine.borrow().msg_sender(),
        };
        engine.borrow_mut().host_mut().dispatcher = Some(dispatcher.clone());

        let mut view = TailView {
            engine,
            dispatcher,
            _listeners: Vec::new(),
        };

        view.listen(filter_input.as_ref(), "keyup", {
            let input = filter_input.clone();
            move |event| {
                let key = event
                    .dyn_ref::<KeyboardEvent>()
                    .map_or(InputKey::Other, |e| InputKey::from_dom_key(&e.key()));
                Some(Message::FilterKeyUp {
                    key,
                    value: input.value(),
                })
            }
        })?;
        view.listen(pause_button.as_ref(), "mouseup", |_| Some(Message::TogglePause))?;
        view.listen(theme_button.as_ref(), "mouseup", |_| Some(Message::ToggleTheme))?;
        for (event, msg) in WINDOW_FOCUS_EVENTS {
            view.listen_capture(window.as_ref(), event, move |_| Some(msg.clone()))?;
        }
        view.listen(container.as_ref(), "click", |event| {
            let target = event.target()?.dyn_into::<Element>().ok()?;
            let line = target.closest("[data-id]").ok()??;
            let id = bridge::parse_line_id(&line.get_attribute(LINE_ID_ATTRIBUTE)?)?;
            Some(Message::LineClicked(id))
        })?;

        {
            let mut engine = view.engine.borrow_mut();
            engine.init();
            engine.drain_pending_messages();
        }
        Ok(view)
    }

    /// Feed one transport event. `payload` is `undefined` for events that
    /// carry none.
    #[wasm_bindgen(js_name = onEvent)]
    pub fn on_event(&self, name: &str, payload: JsValue) {
        let json = if payload.is_undefined() {
            None
        } else {
            match js_sys::JSON::stringify(&payload) {
                Ok(s) => s.as_string(),
                Err(e) => {
                    warn!("Unserialisable payload for '{}': {:?}", name, e);
                    return;
                }
            }
        };

        match bridge::decode_event(name, json.as_deref()) {
            Ok(msg) => self.dispatcher.dispatch(msg),
            Err(e) => warn!("Rejected event '{}': {}", name, e),
        }
    }

    /// Shorthand for a `line` event
    pub fn line(&self, text: String) {
        self.dispatcher.dispatch(Message::line(text));
    }

    /// Set the filter as if typed, updating the input box
    #[wasm_bindgen(js_name = setFilter)]
    pub fn set_filter(&self, value: String) {
        self.dispatcher.dispatch(Message::SetFilter(value));
    }

    /// Number of lines currently held
    #[wasm_bindgen(js_name = lineCount)]
    pub fn line_count(&self) -> usize {
        self.engine.borrow().state.buffer.len()
    }
}

impl TailView {
    /// Attach a listener that turns DOM events into engine messages
    fn listen<F>(
        &mut self,
        target: &web_sys::EventTarget,
        event: &str,
        to_message: F,
    ) -> std::result::Result<(), JsValue>
    where
        F: Fn(&Event) -> Option<Message> + 'static,
    {
        self.attach(target, event, false, to_message)
    }

    /// Like [`Self::listen`], but in the capture phase
    fn listen_capture<F>(
        &mut self,
        target: &web_sys::EventTarget,
        event: &str,
        to_message: F,
    ) -> std::result::Result<(), JsValue>
    where
        F: Fn(&Event) -> Option<Message> + 'static,
    {
        self.attach(target, event, true, to_message)
    }

    fn attach<F>(
        &mut self,
        target: &web_sys::EventTarget,
        event: &str,
        capture: bool,
        to_message: F,
    ) -> std::result::Result<(), JsValue>
    where
        F: Fn(&Event) -> Option<Message> + 'static,
    {
        let dispatcher = self.dispatcher.clone();
        let closure = Closure::<dyn FnMut(Event)>::new(move |e: Event| {
            if let Some(msg) = to_message(&e) {
                dispatcher.dispatch(msg);
            }
        });
        target.add_event_listener_with_callback_and_bool(
            event,
            closure.as_ref().unchecked_ref(),
            capture,
        )?;
        self._listeners.push(closure);
        Ok(())
    }
}
