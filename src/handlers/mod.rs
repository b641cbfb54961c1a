// handlers/mod.rs - Handler tiers
//
// Public (no auth) → Protected (JWT auth + role gate)
pub mod health;
pub mod protected;
pub mod public;
mod utils;
