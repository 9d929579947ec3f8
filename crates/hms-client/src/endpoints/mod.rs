//! One module per audience. Each function builds a request descriptor and
//! hands it to the gateway; read endpoints also publish the canonical
//! [`QueryKey`](crate::cache::QueryKey) the cache files them under.
//! Nothing here caches or mutates client state.
pub mod admin;
pub mod auth;
pub mod monitor;
pub mod student;
pub mod warden;
