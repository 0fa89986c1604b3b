//! Exported `FontSizeTool` class
//!
//! The host editor creates one instance per editor and drives it through
//! `render`, `checkState` and `surround`. Failures are logged and swallowed
//! so the host only ever sees a button that does not activate; the
//! constructor is the one call that can throw.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use web_sys::{Element, Node, Range, Selection};

use crate::api::helpers::{config_from_options, serialize, to_js_error};
use crate::dom::web::{MenuSink, WebDom};
use crate::dom::MenuEvent;
use crate::error::DomError;
use crate::models::{SizeChoice, ToolConfig, ToolMetadata};
use crate::tool::FontSizeTool;

struct ToolHost {
    dom: WebDom,
    tool: FontSizeTool<WebDom>,
}

type SharedHost = Rc<RefCell<ToolHost>>;

/// Run `f` against the host unless it is already borrowed further up the
/// stack
fn with_host<R>(host: &SharedHost, f: impl FnOnce(&mut WebDom, &mut FontSizeTool<WebDom>) -> R) -> Option<R> {
    match host.try_borrow_mut() {
        Ok(mut host) => {
            let ToolHost { dom, tool } = &mut *host;
            Some(f(dom, tool))
        }
        Err(_) => {
            log::warn!("font size tool is busy, call ignored");
            None
        }
    }
}

fn dispatch(host: &Weak<RefCell<ToolHost>>, event: MenuEvent<Node>) {
    let Some(host) = host.upgrade() else {
        return;
    };
    let result = with_host(&host, |dom, tool| tool.handle_menu_event(dom, event));
    if let Some(Err(err)) = result {
        log::warn!("font size menu event failed: {}", err);
    }
}

#[wasm_bindgen(js_name = FontSizeTool)]
pub struct WasmFontSizeTool {
    host: SharedHost,
}

#[wasm_bindgen(js_class = FontSizeTool)]
impl WasmFontSizeTool {
    /// `new FontSizeTool({ api, config })`. An unreadable `config` falls back
    /// to the defaults; only a missing browser document throws.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<WasmFontSizeTool, JsValue> {
        let config = config_from_options(&options).unwrap_or_else(|err| {
            log::warn!("{}, using defaults", err);
            ToolConfig::default()
        });

        let mut dom = WebDom::new().map_err(to_js_error)?;
        let tool = FontSizeTool::new(&mut dom, config);
        let host = Rc::new(RefCell::new(ToolHost { dom, tool }));

        let weak = Rc::downgrade(&host);
        let sink: MenuSink = Rc::new(move |event: MenuEvent<Node>| dispatch(&weak, event));
        host.borrow_mut().dom.set_menu_sink(sink);

        log::debug!("font size tool created");
        Ok(Self { host })
    }

    /// The toolbar button
    pub fn render(&self) -> Result<Element, JsValue> {
        let node = with_host(&self.host, |dom, tool| tool.render(dom))
            .ok_or_else(|| JsValue::from_str("font size tool is busy"))?
            .map_err(to_js_error)?;
        node.dyn_into::<Element>()
            .map_err(|_| to_js_error(DomError::NotAnElement))
    }

    /// Inspect the selection and update the button. Returns whether a size
    /// is in effect.
    #[wasm_bindgen(js_name = checkState)]
    pub fn check_state(&self, selection: Option<Selection>) -> bool {
        let anchor = selection.and_then(|s| s.anchor_node());
        with_host(&self.host, |dom, tool| tool.check_state(dom, anchor.as_ref())).unwrap_or(false)
    }

    /// Button click: open the size menu for `range`
    pub fn surround(&self, range: Option<Range>) {
        let Some(range) = range else {
            return;
        };
        if let Some(Err(err)) = with_host(&self.host, |dom, tool| tool.surround(dom, range)) {
            log::warn!("could not open font size menu: {}", err);
        }
    }

    /// Apply `size` to `range` directly, bypassing the menu. An empty size
    /// clears any font size. Returns whether the document changed.
    #[wasm_bindgen(js_name = applySize)]
    pub fn apply_size(&self, range: Range, size: &str) -> bool {
        let choice = if size.trim().is_empty() {
            SizeChoice::Clear
        } else {
            SizeChoice::size(size.trim())
        };
        let mut range = range;
        match with_host(&self.host, |dom, tool| tool.apply(dom, &mut range, &choice)) {
            Some(Ok(changed)) => changed,
            Some(Err(err)) => {
                log::warn!("could not apply font size: {}", err);
                false
            }
            None => false,
        }
    }

    /// Close the menu and drop its listeners
    pub fn destroy(&self) {
        with_host(&self.host, |dom, tool| tool.destroy(dom));
    }

    /// `{ hasSize, currentSize }` from the last inspection
    #[wasm_bindgen(js_name = currentState)]
    pub fn current_state(&self) -> JsValue {
        match self.host.try_borrow() {
            Ok(host) => serialize(host.tool.state(), "selection state").unwrap_or(JsValue::NULL),
            Err(_) => JsValue::NULL,
        }
    }

    #[wasm_bindgen(js_name = isInline)]
    pub fn is_inline() -> bool {
        ToolMetadata::default().is_inline
    }

    pub fn shortcut() -> String {
        ToolMetadata::default().shortcut
    }

    pub fn title() -> String {
        ToolMetadata::default().title
    }

    /// Markup the host may keep: `{ span: { class: "font-size-tool", style: true } }`
    pub fn sanitize() -> Result<JsValue, JsValue> {
        serialize(&ToolMetadata::default().sanitize, "sanitize config")
    }
}
