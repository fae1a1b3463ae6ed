// access/policy.rs - Authorization policy
//
// `decide` is a pure function of the caller and the path class. Rules are
// evaluated in order and the first match wins:
//
// 1. open public paths are allowed for everyone, auth forms for anonymous callers
// 2. anonymous callers on any other path go to the login page
// 3. authenticated callers on the login/register forms go to their home
// 4. members on trainer paths go to their own page
// 5. members on another member's page go to their own page
// 6. everything else is allowed

use axum::http::StatusCode;

use super::classify::{PathClass, PublicKind, Surface, LOGIN_PATH, MEMBER_ROOT, PT_HOME};
use crate::types::{Identity, Role};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    RedirectTo(String),
    DenyStatus(StatusCode),
}

impl Decision {
    /// API clients cannot follow a navigation redirect; they get a status.
    pub fn for_surface(self, surface: Surface) -> Decision {
        match (self, surface) {
            (Decision::RedirectTo(target), Surface::Api) => {
                if target == LOGIN_PATH {
                    Decision::DenyStatus(StatusCode::UNAUTHORIZED)
                } else {
                    Decision::DenyStatus(StatusCode::FORBIDDEN)
                }
            }
            (decision, _) => decision,
        }
    }
}

pub fn role_home(identity: &Identity) -> String {
    match identity.role {
        Role::Pt => PT_HOME.to_string(),
        Role::Member => member_home(identity),
    }
}

fn member_home(identity: &Identity) -> String {
    format!("{}/{}", MEMBER_ROOT, identity.user_id)
}

pub fn decide(identity: Option<&Identity>, class: &PathClass) -> Decision {
    let identity = match (identity, class) {
        (_, PathClass::Public(PublicKind::Open)) => return Decision::Allow,
        (None, PathClass::Public(PublicKind::AuthForm)) => return Decision::Allow,
        (None, _) => return Decision::RedirectTo(LOGIN_PATH.to_string()),
        (Some(identity), _) => identity,
    };

    match class {
        PathClass::Public(PublicKind::AuthForm) => Decision::RedirectTo(role_home(identity)),
        PathClass::Public(PublicKind::Open) => Decision::Allow,
        PathClass::AuthenticatedOnly => Decision::Allow,
        PathClass::PtOnly => match identity.role {
            Role::Pt => Decision::Allow,
            Role::Member => Decision::RedirectTo(member_home(identity)),
        },
        PathClass::MemberScoped(embedded_id) => match identity.role {
            Role::Pt => Decision::Allow,
            Role::Member if *embedded_id == identity.user_id.to_string() => Decision::Allow,
            Role::Member => Decision::RedirectTo(member_home(identity)),
        },
    }
}
