// access/classify.rs - Route classification: a static function of the request path

pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";
pub const PT_HOME: &str = "/pt";
pub const MEMBER_ROOT: &str = "/member";

/// Leaf pages and endpoints reachable without a session. Matched exactly.
const PUBLIC_PATHS: &[&str] = &[
    "/",
    "/about",
    "/contact",
    LOGIN_PATH,
    REGISTER_PATH,
    "/health",
    "/api/auth/login",
    "/api/auth/register",
    "/api/auth/logout",
];

/// Forms an authenticated session must not be shown again
const AUTH_FORM_PATHS: &[&str] = &[LOGIN_PATH, REGISTER_PATH];

/// Namespaces reserved for trainers. Matched by path segment.
const PT_PREFIXES: &[&str] = &[PT_HOME, "/api/members"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicKind {
    Open,
    AuthForm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathClass {
    Public(PublicKind),
    AuthenticatedOnly,
    PtOnly,
    /// Per-user page; carries the identifier embedded in the path
    MemberScoped(String),
}

/// Who is on the other end: a browser navigating pages, or an API client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Page,
    Api,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub class: PathClass,
    pub surface: Surface,
}

pub fn classify(path: &str) -> Route {
    Route {
        class: classify_path(path),
        surface: surface_of(path),
    }
}

pub fn classify_path(path: &str) -> PathClass {
    if PUBLIC_PATHS.contains(&path) {
        let kind = if AUTH_FORM_PATHS.contains(&path) {
            PublicKind::AuthForm
        } else {
            PublicKind::Open
        };
        return PathClass::Public(kind);
    }

    if PT_PREFIXES.iter().any(|prefix| under_prefix(path, prefix)) {
        return PathClass::PtOnly;
    }

    if let Some(id) = member_segment(path) {
        return PathClass::MemberScoped(id.to_string());
    }

    // Unknown paths fail closed
    PathClass::AuthenticatedOnly
}

pub fn surface_of(path: &str) -> Surface {
    if under_prefix(path, "/api") {
        Surface::Api
    } else {
        Surface::Page
    }
}

/// `/pt` matches `/pt` and `/pt/...` but not `/ptx`
fn under_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Identifier segment of `/member/{id}[/...]`
fn member_segment(path: &str) -> Option<&str> {
    let rest = path.strip_prefix(MEMBER_ROOT)?.strip_prefix('/')?;
    let id = rest.split('/').next().unwrap_or_default();
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}
