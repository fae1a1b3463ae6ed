pub mod classify;
pub mod policy;

pub use classify::{classify, PathClass, PublicKind, Route, Surface};
pub use policy::{decide, role_home, Decision};
