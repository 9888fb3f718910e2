//! The breakpoint query engine.
//!
//! Every primitive here belongs to the [`Scope`](floem_reactive::Scope) that
//! is current when it is created. The match state, the media subscription and
//! the effects that keep them in sync all go away when that scope is
//! disposed.

use std::rc::Rc;

use floem_reactive::{
    Memo, ReadSignal, RwSignal, SignalGet, SignalUpdate, create_effect, create_memo,
    create_rw_signal, untrack,
};

use crate::{
    breakpoint::BreakpointMap,
    media::{MediaEnvironment, Subscription, default_environment, subscribe},
};

/// Creates the query primitives for `screens` against the platform's media
/// environment.
pub fn create_breakpoints(screens: BreakpointMap) -> Breakpoints {
    Breakpoints::new(screens)
}

/// Reactive access to a fixed set of named breakpoints.
#[derive(Clone)]
pub struct Breakpoints {
    screens: Rc<BreakpointMap>,
    environment: Rc<dyn MediaEnvironment>,
}

/// Reactive state of one query in one scope.
#[derive(Clone, Copy)]
struct QueryState {
    matches: RwSignal<bool>,
    /// Name of the breakpoint the query last activated for. Set only after
    /// the match for that activation has been committed.
    active: RwSignal<String>,
}

impl Breakpoints {
    pub fn new(screens: BreakpointMap) -> Self {
        Self::with_environment(screens, default_environment())
    }

    pub fn with_environment(screens: BreakpointMap, environment: Rc<dyn MediaEnvironment>) -> Self {
        Self {
            screens: Rc::new(screens),
            environment,
        }
    }

    pub fn screens(&self) -> &BreakpointMap {
        &self.screens
    }

    pub fn environment(&self) -> &Rc<dyn MediaEnvironment> {
        &self.environment
    }

    /// Whether the viewport satisfies breakpoint `name`.
    ///
    /// The signal starts at `default` and keeps it when the environment
    /// cannot match media. Otherwise it is corrected before this returns and
    /// follows every change the environment reports afterwards.
    pub fn query(&self, name: impl Into<String>, default: bool) -> ReadSignal<bool> {
        let name = name.into();
        self.query_with(move || name.clone(), move || default)
    }

    /// Like [`query`](Self::query), with the breakpoint name and the default
    /// read reactively. The subscription is replaced whenever either value
    /// changes.
    pub fn query_with(
        &self,
        name: impl Fn() -> String + 'static,
        default: impl Fn() -> bool + 'static,
    ) -> ReadSignal<bool> {
        self.query_state(name, default).matches.read_only()
    }

    fn query_state(
        &self,
        name: impl Fn() -> String + 'static,
        default: impl Fn() -> bool + 'static,
    ) -> QueryState {
        let state = QueryState {
            matches: create_rw_signal(untrack(&default)),
            active: create_rw_signal(String::new()),
        };
        // Holds the current subscription. Never tracked, so disposing the
        // scope drops it and with it the listener.
        let slot = create_rw_signal(None::<Subscription>);
        let engine = self.clone();

        create_effect(move |prev: Option<(String, bool)>| {
            let key = (name(), default());
            if prev.as_ref() == Some(&key) {
                return key;
            }

            let Some(previous) = slot.try_update(Option::take) else {
                // The owning scope is already disposed.
                return key;
            };
            drop(previous);

            if let Some(subscription) = engine.activate(&key.0, state.matches) {
                slot.set(Some(subscription));
            }
            state.active.set(key.0.clone());
            key
        });

        state
    }

    /// Evaluates `name` once, commits the result and subscribes to changes.
    fn activate(&self, name: &str, matches: RwSignal<bool>) -> Option<Subscription> {
        if !self.environment.can_match_media() {
            tracing::debug!(breakpoint = name, "media matching unavailable, keeping default");
            return None;
        }
        if !self.screens.contains(name) {
            tracing::warn!(breakpoint = name, "unknown breakpoint");
        }

        let query = self.screens.predicate(name);
        if query.is_all() {
            // An empty predicate covers all media and can never flip.
            commit(matches, true);
            return None;
        }

        let list = match self.environment.match_media(&query) {
            Ok(list) => list,
            Err(err) => {
                // A predicate that cannot be evaluated matches nothing, as
                // with a malformed query in the browser.
                tracing::warn!(breakpoint = name, %query, error = %err, "failed to evaluate breakpoint");
                commit(matches, false);
                return None;
            }
        };
        let current = list.matches();
        tracing::debug!(breakpoint = name, %query, matches = current, "breakpoint activated");
        commit(matches, current);

        match subscribe(list, move |change| commit(matches, change.matches)) {
            Ok(subscription) => Some(subscription),
            Err(err) => {
                tracing::warn!(breakpoint = name, %query, error = %err, "failed to subscribe to breakpoint");
                None
            }
        }
    }

    /// Calls `effect` with the current match of `name` once now, and again
    /// whenever the breakpoint name changes. A match transition alone does
    /// not call it.
    pub fn on_query_change(&self, name: impl Into<String>, effect: impl Fn(bool) + 'static) {
        let name = name.into();
        let effect: Rc<dyn Fn(bool)> = Rc::new(effect);
        self.on_query_change_with(move || name.clone(), move || effect.clone());
    }

    /// Like [`on_query_change`](Self::on_query_change), with a reactive name
    /// and callback. A callback that is a different `Rc` than last time is
    /// invoked immediately.
    pub fn on_query_change_with(
        &self,
        name: impl Fn() -> String + 'static,
        effect: impl Fn() -> Rc<dyn Fn(bool)> + 'static,
    ) {
        let state = self.query_state(name, || false);

        create_effect(move |prev: Option<(String, Rc<dyn Fn(bool)>)>| {
            let current = (state.active.get(), effect());
            let unchanged = prev.as_ref().is_some_and(|(prev_name, prev_effect)| {
                *prev_name == current.0 && Rc::ptr_eq(prev_effect, &current.1)
            });
            if !unchanged {
                let matches = state.matches.get_untracked();
                (current.1)(matches);
            }
            current
        });
    }

    /// `when_match` while breakpoint `name` matches, `when_not` otherwise.
    pub fn select<T>(&self, name: impl Into<String>, when_match: T, when_not: T) -> Memo<T>
    where
        T: Clone + PartialEq + 'static,
    {
        let name = name.into();
        self.select_with(
            move || name.clone(),
            move || when_match.clone(),
            move || when_not.clone(),
        )
    }

    /// Reactive form of [`select`](Self::select). The memo only changes when
    /// the selected value compares unequal to the previous one, so an equal
    /// recomputation keeps the stored value.
    pub fn select_with<T>(
        &self,
        name: impl Fn() -> String + 'static,
        when_match: impl Fn() -> T + 'static,
        when_not: impl Fn() -> T + 'static,
    ) -> Memo<T>
    where
        T: PartialEq + 'static,
    {
        let matches = self.query_with(name, || false);
        create_memo(move |_| {
            if matches.get() {
                when_match()
            } else {
                when_not()
            }
        })
    }
}

fn commit(matches: RwSignal<bool>, value: bool) {
    if matches.try_get_untracked().is_some_and(|current| current != value) {
        matches.set(value);
    }
}
