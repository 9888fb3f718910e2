//! A viewport whose width is driven by the host.
//!
//! Native windows have no `matchMedia`. The host feeds the window width into
//! a [`Viewport`] (for instance from its resize handler) and the viewport
//! evaluates every live query and notifies listeners the way a browser does:
//! only when a query's match flips.

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::{Rc, Weak},
};

use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::{
    error::MediaError,
    media::{ListenerId, MediaChange, MediaEnvironment, MediaListener, MediaQueryList},
    media_query::{MediaQuery, WidthCondition},
};

#[derive(Clone)]
pub struct Viewport {
    state: Rc<ViewportState>,
}

struct ViewportState {
    width: Cell<f64>,
    supported: Cell<bool>,
    lists: RefCell<Vec<Weak<ViewportQueryList>>>,
}

impl Viewport {
    pub fn new(width: f64) -> Self {
        Self {
            state: Rc::new(ViewportState {
                width: Cell::new(width),
                supported: Cell::new(true),
                lists: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn width(&self) -> f64 {
        self.state.width.get()
    }

    /// Resizes the viewport and dispatches change events to every query whose
    /// match flipped, in the order the queries were created.
    pub fn set_width(&self, width: f64) {
        self.state.width.set(width);
        for list in self.live_lists() {
            list.reevaluate(width);
        }
    }

    /// Toggles the capability check. An unsupported viewport refuses to
    /// evaluate queries.
    pub fn set_supported(&self, supported: bool) {
        self.state.supported.set(supported);
    }

    /// Number of listeners currently registered across all queries.
    pub fn listener_count(&self) -> usize {
        self.live_lists()
            .iter()
            .map(|list| list.listeners.borrow().len())
            .sum()
    }

    fn live_lists(&self) -> Vec<Rc<ViewportQueryList>> {
        let mut lists = self.state.lists.borrow_mut();
        lists.retain(|list| list.strong_count() > 0);
        lists.iter().filter_map(Weak::upgrade).collect()
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl fmt::Debug for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Viewport")
            .field("width", &self.state.width.get())
            .field("supported", &self.state.supported.get())
            .finish()
    }
}

impl MediaEnvironment for Viewport {
    fn can_match_media(&self) -> bool {
        self.state.supported.get()
    }

    fn match_media(&self, query: &MediaQuery) -> Result<Rc<dyn MediaQueryList>, MediaError> {
        if !self.can_match_media() {
            return Err(MediaError::Unsupported);
        }
        let conditions = query.conditions()?;
        let matches = conditions.iter().all(|c| c.matches(self.width()));
        let list = Rc::new(ViewportQueryList {
            media: query.as_str().to_string(),
            conditions,
            matches: Cell::new(matches),
            listeners: RefCell::new(SlotMap::with_key()),
        });
        self.state.lists.borrow_mut().push(Rc::downgrade(&list));
        Ok(list)
    }
}

struct ViewportQueryList {
    media: String,
    conditions: SmallVec<[WidthCondition; 2]>,
    matches: Cell<bool>,
    listeners: RefCell<SlotMap<ListenerId, MediaListener>>,
}

impl ViewportQueryList {
    fn reevaluate(&self, width: f64) {
        let matches = self.conditions.iter().all(|c| c.matches(width));
        if matches == self.matches.replace(matches) {
            return;
        }

        let change = MediaChange {
            media: self.media.clone(),
            matches,
        };
        tracing::trace!(media = %self.media, matches, "media change");

        // Listeners may add or remove registrations while we dispatch, so
        // nothing stays borrowed across a call. A listener removed by an
        // earlier one is skipped.
        let ids: SmallVec<[ListenerId; 4]> = self.listeners.borrow().keys().collect();
        for id in ids {
            let listener = self.listeners.borrow().get(id).cloned();
            if let Some(listener) = listener {
                listener(&change);
            }
        }
    }
}

impl MediaQueryList for ViewportQueryList {
    fn media(&self) -> &str {
        &self.media
    }

    fn matches(&self) -> bool {
        self.matches.get()
    }

    fn add_listener(&self, listener: MediaListener) -> Result<ListenerId, MediaError> {
        Ok(self.listeners.borrow_mut().insert(listener))
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners.borrow_mut().remove(id);
    }
}
