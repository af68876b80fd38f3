use core::any::{Any, TypeId, type_name};
use std::{collections::HashMap, sync::Arc};

use tracing::debug;

use crate::ServiceError;

struct Handler {
    name: &'static str,
    handler: Box<dyn Any + Send + Sync>,
}

/// Request interfaces and the single handler currently serving each.
///
/// Interfaces are identified by type, usually a trait object type such as
/// `dyn ProjectRequests`. Callers that find no handler get `None` and decide
/// for themselves what that means.
///
/// ```
/// # use std::sync::Arc;
/// # use anim_raycast_service::RequestHandlers;
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// struct English;
///
/// impl Greeter for English {
///     fn greet(&self) -> String {
///         "hello".into()
///     }
/// }
///
/// let mut handlers = RequestHandlers::default();
/// handlers.connect::<dyn Greeter>(Arc::new(English)).unwrap();
/// assert_eq!(handlers.get::<dyn Greeter>().unwrap().greet(), "hello");
/// ```
#[derive(Default)]
pub struct RequestHandlers {
    handlers: HashMap<TypeId, Handler>,
}

impl RequestHandlers {
    /// Starts serving requests of interface `T` with `handler`.
    pub fn connect<T>(&mut self, handler: Arc<T>) -> Result<(), ServiceError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let id = TypeId::of::<T>();
        if self.handlers.contains_key(&id) {
            return Err(ServiceError::HandlerAlreadyConnected(type_name::<T>()));
        }
        debug!("connected handler for {}", type_name::<T>());
        self.handlers.insert(
            id,
            Handler {
                name: type_name::<T>(),
                handler: Box::new(handler),
            },
        );
        Ok(())
    }

    /// Stops serving requests of interface `T`.
    ///
    /// Returns `true` if a handler was connected.
    pub fn disconnect<T>(&mut self) -> bool
    where
        T: ?Sized + 'static,
    {
        let removed = self.handlers.remove(&TypeId::of::<T>());
        if let Some(handler) = &removed {
            debug!("disconnected handler for {}", handler.name);
        }
        removed.is_some()
    }

    /// The handler serving interface `T`, if any.
    pub fn get<T>(&self) -> Option<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.handlers
            .get(&TypeId::of::<T>())?
            .handler
            .downcast_ref::<Arc<T>>()
            .cloned()
    }

    /// Returns `true` if a handler serves interface `T`.
    pub fn is_connected<T>(&self) -> bool
    where
        T: ?Sized + 'static,
    {
        self.handlers.contains_key(&TypeId::of::<T>())
    }

    /// Names of every interface with a connected handler.
    pub fn interfaces(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.values().map(|handler| handler.name)
    }

    /// Number of connected handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if no handler is connected.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
