// handlers/protected/mod.rs - Handlers that require a session
//
// Security Level: session required. Role gating happened in the access
// middleware; ownership is decided by the scope accessors these handlers use.
// Handlers never query the store for owned rows directly.

pub mod auth;      // GET /api/auth/whoami
pub mod exercises; // /api/exercises[/:id]
pub mod members;   // /api/members[/:id] (trainers only)
pub mod pages;     // /pt, /pt/*, /member/:id
pub mod programs;  // /api/programs[/:id]
