//! Component traits and injection cells

use std::any::type_name;
use std::fmt;
use std::sync::{Arc, OnceLock};

use trellis_domain::error::{Error, Result};

use super::declaration::Declaration;

/// A type with a stable component name
pub trait Named {
    /// Name the container registers the component under
    const NAME: &'static str;
}

/// A type the container constructs as a singleton
///
/// # Example
///
/// ```ignore
/// #[derive(Default)]
/// pub struct UserController {
///     users: Inject<UserService>,
/// }
///
/// impl Named for UserController {
///     const NAME: &'static str = "UserController";
/// }
///
/// impl Injectable for UserController {
///     fn instantiate() -> Self {
///         Self::default()
///     }
///
///     fn declare(declaration: Declaration<Self>) -> Declaration<Self> {
///         declaration
///             .controller("/users")
///             .inject::<UserService>(|this| &this.users)
///             .method("get", |m| {
///                 m.get("/:id")
///                     .param::<String>(0, "id")
///                     .handler(|this: Arc<Self>, mut args| async move {
///                         this.users.get()?.find(&args.take::<String>(0)?).await
///                     })
///             })
///     }
/// }
/// ```
pub trait Injectable: Named + Send + Sync + Sized + 'static {
    /// Create the bare instance, every [`Inject`] cell empty
    fn instantiate() -> Self;

    /// Describe dependencies and methods
    fn declare(declaration: Declaration<Self>) -> Declaration<Self> {
        declaration
    }
}

/// Injection cell, written once by the container
pub struct Inject<T: Send + Sync + 'static> {
    cell: OnceLock<Arc<T>>,
}

impl<T: Send + Sync + 'static> Inject<T> {
    /// Empty cell
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Cell holding `value`
    pub fn with(value: Arc<T>) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(value);
        Self { cell }
    }

    /// The injected dependency
    pub fn get(&self) -> Result<&Arc<T>> {
        self.cell.get().ok_or_else(|| {
            Error::internal(format!("Dependency `{}` was not injected", type_name::<T>()))
        })
    }

    /// Write the cell; `false` if it was already written
    pub fn set(&self, value: Arc<T>) -> bool {
        self.cell.set(value).is_ok()
    }

    /// Whether the cell has been written
    pub fn is_set(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T: Send + Sync + 'static> Default for Inject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + Sync + 'static> fmt::Debug for Inject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inject")
            .field("type", &type_name::<T>())
            .field("set", &self.is_set())
            .finish()
    }
}
