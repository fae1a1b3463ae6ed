// handlers/public/mod.rs - Public handlers (no session required)
//
// Security Level: None, although the auth form pages redirect callers that
// are already signed in (decided by the access policy, not here).
// Route Prefix: page paths and /api/auth/{login,register,logout}

pub mod auth;  // POST /api/auth/login, /api/auth/register, /api/auth/logout
pub mod pages; // GET /, /about, /contact, /login, /register, /health
