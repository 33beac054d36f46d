//! Per-browser session state keyed by a random cookie.

use axum::http::{HeaderMap, header};
use bizdir_core::{FilterSet, PageState};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;
use uuid::Uuid;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "bizdir_session";

/// State carried between requests of one browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Whether the password gate has been passed
    pub authenticated: bool,
    /// Current filter values
    pub filters: FilterSet,
    /// Current page and page size
    pub page: PageState,
}

impl Session {
    /// A fresh, unauthenticated session on page 1.
    pub fn new(page_size: u32) -> Self {
        Self {
            authenticated: false,
            filters: FilterSet::default(),
            page: PageState::new(page_size),
        }
    }
}

#[derive(Debug)]
struct Entry {
    session: Session,
    last_seen: Instant,
}

/// In-memory session store.
///
/// Handlers take a snapshot with [`SessionStore::resolve`], work on it and
/// write it back with [`SessionStore::save`]. Only sessions that passed the
/// gate are stored; [`SessionStore::renew`] moves one to a fresh id at login.
#[derive(Debug)]
pub struct SessionStore {
    entries: Mutex<HashMap<Uuid, Entry>>,
    idle: Duration,
    page_size: u32,
}

/// A session snapshot plus the id it is stored under.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    /// Session id, also the cookie value
    pub id: Uuid,
    /// Snapshot of the session
    pub session: Session,
    /// True when the session is not in the store
    pub is_new: bool,
}

impl SessionStore {
    /// Creates a store that forgets sessions idle for longer than `idle`.
    pub fn new(idle: Duration, page_size: u32) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            idle,
            page_size,
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<Uuid, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Finds the session named by the request's cookie, or returns a fresh
    /// one that is not stored until saved.
    pub fn resolve(&self, headers: &HeaderMap) -> SessionHandle {
        self.prune();
        let mut entries = self.entries();

        let known = session_id(headers).and_then(|id| entries.get_mut(&id).map(|entry| (id, entry)));
        if let Some((id, entry)) = known {
            entry.last_seen = Instant::now();
            return SessionHandle {
                id,
                session: entry.session.clone(),
                is_new: false,
            };
        }

        SessionHandle {
            id: Uuid::new_v4(),
            session: Session::new(self.page_size),
            is_new: true,
        }
    }

    /// Stores `handle`'s session under a new id and forgets the old one.
    pub fn renew(&self, handle: SessionHandle) -> SessionHandle {
        let id = Uuid::new_v4();
        let mut entries = self.entries();
        entries.remove(&handle.id);
        entries.insert(
            id,
            Entry {
                session: handle.session.clone(),
                last_seen: Instant::now(),
            },
        );
        debug!(session_id = %id, "Session started");
        SessionHandle {
            id,
            session: handle.session,
            is_new: true,
        }
    }

    /// Writes a session back.
    pub fn save(&self, handle: &SessionHandle) {
        self.entries().insert(
            handle.id,
            Entry {
                session: handle.session.clone(),
                last_seen: Instant::now(),
            },
        );
    }

    /// Forgets a session.
    pub fn remove(&self, id: &Uuid) {
        if self.entries().remove(id).is_some() {
            debug!(session_id = %id, "Session removed");
        }
    }

    /// Drops sessions idle for longer than the configured limit.
    pub fn prune(&self) {
        let idle = self.idle;
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, entry| entry.last_seen.elapsed() <= idle);
        let pruned = before - entries.len();
        if pruned > 0 {
            debug!(pruned, remaining = entries.len(), "Pruned idle sessions");
        }
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Whether no session is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Reads the session id from the `Cookie` header.
pub fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value).ok())
}

/// `Set-Cookie` value that stores `id`.
pub fn session_cookie(id: &Uuid) -> String {
    format!("{}={}; HttpOnly; SameSite=Lax; Path=/", SESSION_COOKIE, id)
}

/// `Set-Cookie` value that deletes the session cookie.
pub fn expired_cookie() -> String {
    format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", SESSION_COOKIE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_cookie(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn test_cookie_parsing() {
        let id = Uuid::new_v4();
        let headers = headers_with_cookie(&format!("theme=dark; {}={}; other=1", SESSION_COOKIE, id));
        assert_eq!(session_id(&headers), Some(id));

        assert_eq!(session_id(&headers_with_cookie("bizdir_session=garbage")), None);
        assert_eq!(session_id(&HeaderMap::new()), None);
    }

    #[test]
    fn test_resolve_reuses_known_session() {
        let store = SessionStore::new(Duration::from_secs(60), 25);
        let mut first = store.resolve(&HeaderMap::new());
        assert!(first.is_new);
        assert_eq!(first.session.page.page_size(), 25);
        assert!(store.is_empty());

        first.session.authenticated = true;
        first.session.filters = FilterSet::default().with_city("Reno");
        store.save(&first);

        let again = store.resolve(&headers_with_cookie(&session_cookie(&first.id)));
        assert!(!again.is_new);
        assert_eq!(again.id, first.id);
        assert_eq!(again.session, first.session);
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = SessionStore::new(Duration::from_secs(60), 50);
        let mut a = store.resolve(&HeaderMap::new());
        let b = store.resolve(&HeaderMap::new());
        a.session.page.go_to(4);
        store.save(&a);
        store.save(&b);

        let b_again = store.resolve(&headers_with_cookie(&session_cookie(&b.id)));
        assert_eq!(b_again.session.page.page(), 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_unknown_cookie_starts_new_session() {
        let store = SessionStore::new(Duration::from_secs(60), 50);
        let stale = Uuid::new_v4();
        let handle = store.resolve(&headers_with_cookie(&session_cookie(&stale)));
        assert!(handle.is_new);
        assert_ne!(handle.id, stale);
    }

    #[test]
    fn test_idle_sessions_are_pruned() {
        let store = SessionStore::new(Duration::ZERO, 50);
        let handle = store.resolve(&HeaderMap::new());
        store.save(&handle);
        std::thread::sleep(Duration::from_millis(5));
        store.prune();
        assert!(store.is_empty());

        let again = store.resolve(&headers_with_cookie(&session_cookie(&handle.id)));
        assert!(again.is_new);
    }

    #[test]
    fn test_remove() {
        let store = SessionStore::new(Duration::from_secs(60), 50);
        let handle = store.resolve(&HeaderMap::new());
        store.save(&handle);
        assert_eq!(store.len(), 1);
        store.remove(&handle.id);
        assert!(store.is_empty());
    }

    #[test]
    fn test_renew_moves_session_to_fresh_id() {
        let store = SessionStore::new(Duration::from_secs(60), 50);
        let mut handle = store.resolve(&HeaderMap::new());
        handle.session.filters = FilterSet::default().with_city("Elko");
        store.save(&handle);
        let old = handle.id;

        let renewed = store.renew(handle);
        assert_ne!(renewed.id, old);
        assert_eq!(store.len(), 1);
        assert!(store.resolve(&headers_with_cookie(&session_cookie(&old))).is_new);

        let again = store.resolve(&headers_with_cookie(&session_cookie(&renewed.id)));
        assert!(!again.is_new);
        assert_eq!(again.session.filters.city_value(), Some("Elko"));
    }

    #[test]
    fn test_renew_ignores_unknown_id() {
        let store = SessionStore::new(Duration::from_secs(60), 50);
        let chosen = Uuid::new_v4();
        let handle = store.resolve(&headers_with_cookie(&session_cookie(&chosen)));
        let renewed = store.renew(handle);
        assert_ne!(renewed.id, chosen);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_cookie_attributes() {
        let id = Uuid::new_v4();
        let cookie = session_cookie(&id);
        assert!(cookie.starts_with("bizdir_session="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(expired_cookie().contains("Max-Age=0"));
    }
}
