// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition only. Every input is untrusted here.
pub mod auth;
