// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Route prefix: /api/v1. Every handler runs behind jwt_auth_middleware;
// reads are open to both roles, writes and user management to admins.
pub mod auth;
pub mod cats;
pub mod treatments;
pub mod users;
pub mod visits;
