//! The media matching facility the query engine runs against.
//!
//! [`MediaEnvironment`] answers the capability check and hands out
//! [`MediaQueryList`]s, which report the current match and notify listeners
//! when it flips. [`Subscription`] ties one listener registration to a Rust
//! value so it is released on drop.

use std::{fmt, rc::Rc};

use slotmap::new_key_type;

use crate::{error::MediaError, media_query::MediaQuery};

new_key_type! {
    /// Identifies one listener on a [`MediaQueryList`].
    pub struct ListenerId;
}

/// Payload of a match change notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaChange {
    pub media: String,
    pub matches: bool,
}

pub type MediaListener = Rc<dyn Fn(&MediaChange)>;

pub trait MediaEnvironment {
    /// Whether this environment can evaluate media queries at all.
    fn can_match_media(&self) -> bool;

    fn match_media(&self, query: &MediaQuery) -> Result<Rc<dyn MediaQueryList>, MediaError>;
}

/// A live predicate evaluation.
pub trait MediaQueryList {
    fn media(&self) -> &str;

    fn matches(&self) -> bool;

    fn add_listener(&self, listener: MediaListener) -> Result<ListenerId, MediaError>;

    /// Removing an id that is not registered does nothing.
    fn remove_listener(&self, id: ListenerId);
}

/// Registers `listener` on `list` and returns a guard that removes it again.
pub fn subscribe(
    list: Rc<dyn MediaQueryList>,
    listener: impl Fn(&MediaChange) + 'static,
) -> Result<Subscription, MediaError> {
    let id = list.add_listener(Rc::new(listener))?;
    Ok(Subscription { list, id })
}

/// A listener registration that is removed exactly once, when dropped.
pub struct Subscription {
    list: Rc<dyn MediaQueryList>,
    id: ListenerId,
}

impl Subscription {
    pub fn media(&self) -> &str {
        self.list.media()
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        tracing::debug!(media = self.list.media(), "releasing media subscription");
        self.list.remove_listener(self.id);
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("media", &self.list.media())
            .field("id", &self.id)
            .finish()
    }
}

/// An environment without media matching, such as a native process with no
/// viewport. Queries keep their defaults.
#[derive(Clone, Copy, Debug, Default)]
pub struct Headless;

impl MediaEnvironment for Headless {
    fn can_match_media(&self) -> bool {
        false
    }

    fn match_media(&self, _query: &MediaQuery) -> Result<Rc<dyn MediaQueryList>, MediaError> {
        Err(MediaError::Unsupported)
    }
}

/// The environment of the current platform: the browser's `matchMedia` on
/// wasm32, [`Headless`] everywhere else.
pub fn default_environment() -> Rc<dyn MediaEnvironment> {
    #[cfg(target_arch = "wasm32")]
    let environment: Rc<dyn MediaEnvironment> = Rc::new(crate::web::BrowserMedia::new());
    #[cfg(not(target_arch = "wasm32"))]
    let environment: Rc<dyn MediaEnvironment> = Rc::new(Headless);
    environment
}
