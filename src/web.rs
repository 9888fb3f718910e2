//! `window.matchMedia` bindings for wasm32 targets.

use std::{cell::RefCell, rc::Rc};

use slotmap::SlotMap;
use wasm_bindgen::{JsCast, JsValue, closure::Closure};
use web_sys::{MediaQueryListEvent, Window};

use crate::{
    error::MediaError,
    media::{ListenerId, MediaChange, MediaEnvironment, MediaListener, MediaQueryList},
    media_query::MediaQuery,
};

type ChangeClosure = Closure<dyn FnMut(MediaQueryListEvent)>;

/// The browser's media matching, available when a `window` with
/// `matchMedia` exists.
#[derive(Debug, Clone)]
pub struct BrowserMedia {
    window: Option<Window>,
}

impl BrowserMedia {
    pub fn new() -> Self {
        Self {
            window: web_sys::window(),
        }
    }
}

impl Default for BrowserMedia {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaEnvironment for BrowserMedia {
    fn can_match_media(&self) -> bool {
        self.window.as_ref().is_some_and(|window| {
            js_sys::Reflect::has(window, &JsValue::from_str("matchMedia")).unwrap_or(false)
        })
    }

    fn match_media(&self, query: &MediaQuery) -> Result<Rc<dyn MediaQueryList>, MediaError> {
        let window = self.window.as_ref().ok_or(MediaError::Unsupported)?;
        let list = window
            .match_media(query.as_str())
            .map_err(|err| MediaError::invalid(query.as_str(), js_message(&err)))?
            .ok_or(MediaError::Unsupported)?;
        Ok(Rc::new(BrowserQueryList {
            media: list.media(),
            list,
            listeners: RefCell::new(SlotMap::with_key()),
        }))
    }
}

struct BrowserQueryList {
    media: String,
    list: web_sys::MediaQueryList,
    listeners: RefCell<SlotMap<ListenerId, ChangeClosure>>,
}

impl BrowserQueryList {
    fn detach(&self, closure: &ChangeClosure) {
        if let Err(err) = self
            .list
            .remove_event_listener_with_callback("change", closure.as_ref().unchecked_ref())
        {
            tracing::warn!(media = %self.media, error = %js_message(&err), "failed to detach media listener");
        }
    }
}

impl MediaQueryList for BrowserQueryList {
    fn media(&self) -> &str {
        &self.media
    }

    fn matches(&self) -> bool {
        self.list.matches()
    }

    fn add_listener(&self, listener: MediaListener) -> Result<ListenerId, MediaError> {
        let closure = ChangeClosure::new(move |event: MediaQueryListEvent| {
            listener(&MediaChange {
                media: event.media(),
                matches: event.matches(),
            });
        });
        self.list
            .add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())
            .map_err(|err| MediaError::Listener(js_message(&err)))?;
        Ok(self.listeners.borrow_mut().insert(closure))
    }

    fn remove_listener(&self, id: ListenerId) {
        let closure = self.listeners.borrow_mut().remove(id);
        if let Some(closure) = closure {
            self.detach(&closure);
        }
    }
}

impl Drop for BrowserQueryList {
    fn drop(&mut self) {
        for (_, closure) in self.listeners.take() {
            self.detach(&closure);
        }
    }
}

fn js_message(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
