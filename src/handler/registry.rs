//! Handler registry for dispatching frames by command name.
//!
//! Handlers are registered once through [`HandlerRegistryBuilder`]; the
//! built [`HandlerRegistry`] is immutable and can be shared between any
//! number of accumulators.
//!
//! # Example
//!
//! ```
//! use cmdlink::handler::{Dispatch, HandlerRegistry};
//! use cmdlink::protocol::Frame;
//!
//! let registry = HandlerRegistry::builder()
//!     .register_typed("MOVE", |(pitch, roll, yaw): (i32, i32, i32)| {
//!         println!("move to {pitch} {roll} {yaw}");
//!         Ok(())
//!     })
//!     .build();
//!
//! let outcome = registry.dispatch(&Frame::new("MOVE", "10,20,30"));
//! assert_eq!(outcome, Dispatch::Handled);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use tracing::{debug, error, warn};

use super::args::FromArgs;
use crate::error::Result;
use crate::protocol::Frame;

/// Result type for handler functions.
pub type HandlerResult = Result<()>;

/// Trait for command handlers.
pub trait Handler: Send + Sync + 'static {
    /// Handle a command with its raw argument string.
    fn call(&self, args: &str) -> HandlerResult;
}

/// Wrapper that turns a closure over the raw argument string into a handler.
pub struct FnHandler<F>
where
    F: Fn(&str) -> HandlerResult + Send + Sync + 'static,
{
    handler: F,
}

impl<F> FnHandler<F>
where
    F: Fn(&str) -> HandlerResult + Send + Sync + 'static,
{
    /// Create a new closure handler.
    pub fn new(handler: F) -> Self {
        Self { handler }
    }
}

impl<F> Handler for FnHandler<F>
where
    F: Fn(&str) -> HandlerResult + Send + Sync + 'static,
{
    fn call(&self, args: &str) -> HandlerResult {
        (self.handler)(args)
    }
}

/// Wrapper that parses arguments before calling the handler.
pub struct TypedHandler<F, T>
where
    F: Fn(T) -> HandlerResult + Send + Sync + 'static,
    T: FromArgs + 'static,
{
    handler: F,
    _phantom: PhantomData<fn(T)>,
}

impl<F, T> TypedHandler<F, T>
where
    F: Fn(T) -> HandlerResult + Send + Sync + 'static,
    T: FromArgs + 'static,
{
    /// Create a new typed handler.
    pub fn new(handler: F) -> Self {
        Self {
            handler,
            _phantom: PhantomData,
        }
    }
}

impl<F, T> Handler for TypedHandler<F, T>
where
    F: Fn(T) -> HandlerResult + Send + Sync + 'static,
    T: FromArgs + 'static,
{
    fn call(&self, args: &str) -> HandlerResult {
        let parsed = T::from_args(args)?;
        (self.handler)(parsed)
    }
}

/// What happened to a dispatched frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// A handler ran and returned `Ok`.
    Handled,
    /// A handler ran and returned an error (logged, not propagated).
    Failed,
    /// No handler is registered under the frame's name.
    Unrouted,
}

/// Collects handlers before the registry is frozen.
#[derive(Default)]
pub struct HandlerRegistryBuilder {
    handlers: HashMap<String, Box<dyn Handler>>,
}

impl HandlerRegistryBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under an exact, case-sensitive command name.
    ///
    /// Registering the same name twice replaces the earlier handler.
    pub fn register<H: Handler>(mut self, name: &str, handler: H) -> Self {
        if self
            .handlers
            .insert(name.to_string(), Box::new(handler))
            .is_some()
        {
            warn!(command = name, "replacing previously registered handler");
        }
        self
    }

    /// Register a closure that receives the raw argument string.
    pub fn register_fn<F>(self, name: &str, handler: F) -> Self
    where
        F: Fn(&str) -> HandlerResult + Send + Sync + 'static,
    {
        self.register(name, FnHandler::new(handler))
    }

    /// Register a closure that receives parsed arguments.
    pub fn register_typed<F, T>(self, name: &str, handler: F) -> Self
    where
        F: Fn(T) -> HandlerResult + Send + Sync + 'static,
        T: FromArgs + 'static,
    {
        self.register(name, TypedHandler::new(handler))
    }

    /// Freeze the registrations.
    pub fn build(self) -> HandlerRegistry {
        HandlerRegistry {
            handlers: self.handlers,
        }
    }
}

/// Immutable registry mapping command names to handlers.
pub struct HandlerRegistry {
    handlers: HashMap<String, Box<dyn Handler>>,
}

impl HandlerRegistry {
    /// Start building a registry.
    pub fn builder() -> HandlerRegistryBuilder {
        HandlerRegistryBuilder::new()
    }

    /// Get a handler by command name.
    pub fn get_handler(&self, name: &str) -> Option<&dyn Handler> {
        self.handlers.get(name).map(|h| h.as_ref())
    }

    /// Check whether a command name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Iterate over the registered command names (unordered).
    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check if no commands are registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Dispatch a frame to the handler registered under its name.
    ///
    /// Unknown names are dropped silently. Handler errors are logged and
    /// reported as [`Dispatch::Failed`], never propagated.
    pub fn dispatch(&self, frame: &Frame) -> Dispatch {
        self.dispatch_raw(frame.name(), frame.arguments())
    }

    /// Dispatch a name and argument string without building a [`Frame`].
    pub fn dispatch_raw(&self, name: &str, args: &str) -> Dispatch {
        let Some(handler) = self.get_handler(name) else {
            debug!(command = name, "no handler registered, dropping frame");
            return Dispatch::Unrouted;
        };

        match handler.call(args) {
            Ok(()) => Dispatch::Handled,
            Err(e) => {
                error!(command = name, "Handler error: {}", e);
                Dispatch::Failed
            }
        }
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut commands: Vec<&str> = self.commands().collect();
        commands.sort_unstable();
        f.debug_struct("HandlerRegistry")
            .field("commands", &commands)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::error::CmdlinkError;

    type Calls = Arc<Mutex<Vec<String>>>;

    fn recorder(calls: &Calls, tag: &'static str) -> impl Fn(&str) -> HandlerResult + Send + Sync {
        let calls = calls.clone();
        move |args: &str| {
            calls.lock().unwrap().push(format!("{}:{}", tag, args));
            Ok(())
        }
    }

    #[test]
    fn test_register_and_dispatch() {
        let calls = Calls::default();
        let registry = HandlerRegistry::builder()
            .register_fn("MOVE", recorder(&calls, "move"))
            .register_fn("HB", recorder(&calls, "hb"))
            .build();

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.dispatch(&Frame::new("MOVE", "10,20,30")),
            Dispatch::Handled
        );
        assert_eq!(*calls.lock().unwrap(), vec!["move:10,20,30"]);
    }

    #[test]
    fn test_unknown_command_is_unrouted() {
        let calls = Calls::default();
        let registry = HandlerRegistry::builder()
            .register_fn("MOVE", recorder(&calls, "move"))
            .build();

        assert_eq!(
            registry.dispatch(&Frame::new("UNKNOWN", "1")),
            Dispatch::Unrouted
        );
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let calls = Calls::default();
        let registry = HandlerRegistry::builder()
            .register_fn("MOVE", recorder(&calls, "move"))
            .build();

        assert_eq!(registry.dispatch_raw("move", "1"), Dispatch::Unrouted);
        assert_eq!(registry.dispatch_raw("MOVE ", "1"), Dispatch::Unrouted);
        assert!(registry.contains("MOVE"));
        assert!(!registry.contains("move"));
    }

    #[test]
    fn test_duplicate_registration_last_wins() {
        let calls = Calls::default();
        let registry = HandlerRegistry::builder()
            .register_fn("MOVE", recorder(&calls, "first"))
            .register_fn("MOVE", recorder(&calls, "second"))
            .build();

        assert_eq!(registry.len(), 1);
        registry.dispatch_raw("MOVE", "1");
        assert_eq!(*calls.lock().unwrap(), vec!["second:1"]);
    }

    #[test]
    fn test_handler_error_is_absorbed() {
        let registry = HandlerRegistry::builder()
            .register_fn("FAIL", |_: &str| {
                Err(CmdlinkError::Handler("servo offline".to_string()))
            })
            .build();

        assert_eq!(registry.dispatch_raw("FAIL", ""), Dispatch::Failed);
    }

    #[test]
    fn test_typed_handler() {
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        let registry = HandlerRegistry::builder()
            .register_typed("MOVE", move |angles: (i32, i32, i32)| {
                *sink.lock().unwrap() = Some(angles);
                Ok(())
            })
            .build();

        assert_eq!(registry.dispatch_raw("MOVE", "10,-20,30"), Dispatch::Handled);
        assert_eq!(*seen.lock().unwrap(), Some((10, -20, 30)));

        assert_eq!(registry.dispatch_raw("MOVE", "10,20"), Dispatch::Failed);
        assert_eq!(registry.dispatch_raw("MOVE", "a,b,c"), Dispatch::Failed);
    }

    #[test]
    fn test_custom_handler_trait_object() {
        struct Counter(Arc<Mutex<usize>>);

        impl Handler for Counter {
            fn call(&self, _args: &str) -> HandlerResult {
                *self.0.lock().unwrap() += 1;
                Ok(())
            }
        }

        let count = Arc::new(Mutex::new(0));
        let registry = HandlerRegistry::builder()
            .register("HB", Counter(count.clone()))
            .build();

        registry.dispatch_raw("HB", "1");
        registry.dispatch_raw("HB", "2");
        assert_eq!(*count.lock().unwrap(), 2);
        assert!(registry.get_handler("HB").is_some());
    }

    #[test]
    fn test_empty_registry() {
        let registry = HandlerRegistry::builder().build();

        assert!(registry.is_empty());
        assert!(registry.get_handler("MOVE").is_none());
        assert_eq!(registry.dispatch_raw("MOVE", "1"), Dispatch::Unrouted);
    }

    #[test]
    fn test_debug_lists_commands() {
        let registry = HandlerRegistry::builder()
            .register_fn("MOVE", |_: &str| Ok(()))
            .register_fn("HB", |_: &str| Ok(()))
            .build();

        assert_eq!(
            format!("{:?}", registry),
            r#"HandlerRegistry { commands: ["HB", "MOVE"] }"#
        );
    }

    #[test]
    fn test_registry_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HandlerRegistry>();
    }
}
