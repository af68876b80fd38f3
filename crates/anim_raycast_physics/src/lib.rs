#![doc = "Raycast queries issued by animation graph nodes."]
//!
//! This crate defines the request and result records exchanged between an
//! animation graph and whatever physics backend answers ray queries, the
//! [`RaycastProvider`] seam through which the backend is injected, and a
//! small [`ColliderScene`] provider for applications without a full physics
//! engine.

mod provider;
mod request;
mod scene;

pub use provider::*;
pub use request::*;
pub use scene::*;

/// The physics prelude.
///
/// This includes the most common types in this crate, re-exported for your convenience.
pub mod prelude {
    #[doc(hidden)]
    pub use crate::{
        BodyKind, Collider, ColliderScene, ColliderShape, QueryType, RaycastProvider, RaycastRequest,
        RaycastResult, UsecaseHint,
    };
}
