// Client-side workflow engine for the hostel management system.
// Wraps the REST API behind typed endpoint modules and owns the state
// the front-end reasons about: the session, access decisions, and the
// read cache.
//
// CLIENT-SIDE DESIGN INTENT
// -------------------------
// The server is the single authority on business rules (bill proration,
// late/early absence classification, token issuance). This crate never
// re-derives those; it renders what the server returns and sends back
// only primitive inputs. What it does own, it owns strictly:
//
// - One gateway is the only path to the wire. Every request picks up the
//   bearer token there, and every 401 tears the session down there, so
//   no call site can forget either.
// - Reads are coalesced per query key. Two screens asking the same
//   question share one in-flight request; mutations always run, exactly
//   once each, and invalidate only after the server confirms success.
// - The session transitions and its three durable storage keys commit
//   together, so a restart rehydrates a whole session or none of it.
pub mod cache;
pub mod config;
pub mod endpoints;
pub mod forms;
pub mod gateway;
pub mod guard;
pub mod session;
pub mod storage;

pub use cache::{QueryCache, QueryKey, QueryStatus};
pub use config::ClientConfig;
pub use gateway::{Gateway, MultipartPayload, RequestBody, RequestDescriptor};
pub use guard::{RouteDecision, RouteGuard, RouteRequirement};
pub use session::{SessionError, SessionPhase, SessionSnapshot, SessionStore, SessionUser};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};

use std::sync::Arc;

/// Everything a front-end needs, wired together from one config.
pub struct Client {
    pub session: Arc<SessionStore>,
    pub gateway: Arc<Gateway>,
    pub guard: RouteGuard,
    pub cache: QueryCache,
}

impl Client {
    /// Build the full stack: storage (file-backed when configured),
    /// session hydration, gateway, guard, and an empty cache.
    pub fn new(config: &ClientConfig) -> anyhow::Result<Self> {
        let storage: Box<dyn SessionStorage> = match &config.session_file {
            Some(path) => Box::new(FileStorage::open(path)?),
            None => Box::new(MemoryStorage::new()),
        };
        let session = Arc::new(SessionStore::new(storage));
        let gateway = Arc::new(Gateway::new(config, Arc::clone(&session))?);
        let guard = RouteGuard::new(Arc::clone(&session));
        Ok(Self {
            session,
            gateway,
            guard,
            cache: QueryCache::new(),
        })
    }
}
