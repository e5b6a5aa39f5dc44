//! # Printer Registry
//!
//! Process-wide registration of printer collections.
//!
//! Collections are registered either globally or against one loaded module
//! (an object file of the inspected process). Module-scoped registrations are
//! created when the host attaches to a module and torn down when it detaches,
//! so nothing outlives the process image it was registered for.
//!
//! The resolver and walker never consult this table; it only decides which
//! printer handles a value.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use once_cell::sync::Lazy;
use tracing::{debug, info};

use crate::catalog::{default_collection, PrinterCollection};
use crate::error::{PrinterError, PrinterResult};
use crate::printer::Printer;
use crate::target::Target;

static GLOBAL_REGISTRY: Lazy<RwLock<Registry>> = Lazy::new(|| RwLock::new(Registry::new()));

/// Identity of a loaded module (object file) in the inspected process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(pub u64);

impl From<u64> for ModuleId
{
    fn from(id: u64) -> Self
    {
        ModuleId(id)
    }
}

impl fmt::Display for ModuleId
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "module#{}", self.0)
    }
}

/// Where a collection applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope
{
    /// Every value, whatever module it came from
    Global,
    /// Values of one module only
    Module(ModuleId),
}

/// Ordered table of registered collections
///
/// Module-scoped collections are consulted before global ones, newest
/// registration first within each scope.
#[derive(Debug, Default)]
pub struct Registry
{
    entries: Vec<(Scope, Arc<PrinterCollection>)>,
}

impl Registry
{
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self
    {
        Self { entries: Vec::new() }
    }

    /// Register `collection` in `scope`
    ///
    /// ## Errors
    ///
    /// `DuplicateCollection` if a collection of the same name is already
    /// registered in that scope.
    pub fn register(&mut self, scope: Scope, collection: Arc<PrinterCollection>) -> PrinterResult<()>
    {
        if self
            .entries
            .iter()
            .any(|(existing_scope, existing)| *existing_scope == scope && existing.name() == collection.name())
        {
            return Err(PrinterError::DuplicateCollection(collection.name().to_string()));
        }
        debug!(?scope, collection = collection.name(), "Registered printer collection");
        self.entries.push((scope, collection));
        Ok(())
    }

    /// Drop every collection registered for `module`; returns how many went
    pub fn unregister_module(&mut self, module: ModuleId) -> usize
    {
        let before = self.entries.len();
        self.entries.retain(|(scope, _)| *scope != Scope::Module(module));
        before - self.entries.len()
    }

    /// Whether anything is registered for `module`
    #[must_use]
    pub fn has_module(&self, module: ModuleId) -> bool
    {
        self.entries.iter().any(|(scope, _)| *scope == Scope::Module(module))
    }

    /// Names of registered collections, in lookup order
    #[must_use]
    pub fn collection_names(&self) -> Vec<String>
    {
        self.ordered().map(|(_, collection)| collection.name().to_string()).collect()
    }

    /// Find a printer for `value`
    ///
    /// Collections scoped to `module` are tried first, then global ones.
    /// `None` means no printer is available and the host should fall back to
    /// its default display.
    pub fn lookup<'t, T: Target>(
        &self,
        module: Option<ModuleId>,
        target: &'t T,
        value: &T::Value,
    ) -> Option<Printer<'t, T>>
    {
        self.ordered()
            .filter(|(scope, _)| match scope {
                Scope::Global => true,
                Scope::Module(id) => Some(*id) == module,
            })
            .find_map(|(_, collection)| collection.lookup(target, value))
    }

    fn ordered(&self) -> impl Iterator<Item = &(Scope, Arc<PrinterCollection>)>
    {
        let modules = self.entries.iter().rev().filter(|(scope, _)| matches!(scope, Scope::Module(_)));
        let globals = self.entries.iter().rev().filter(|(scope, _)| *scope == Scope::Global);
        modules.chain(globals)
    }
}

/// Shared read access to the process-wide registry
pub fn global() -> RwLockReadGuard<'static, Registry>
{
    GLOBAL_REGISTRY.read().unwrap_or_else(PoisonError::into_inner)
}

/// Exclusive access to the process-wide registry
pub fn global_mut() -> RwLockWriteGuard<'static, Registry>
{
    GLOBAL_REGISTRY.write().unwrap_or_else(PoisonError::into_inner)
}

/// Register the default collection for a module the host just attached to
///
/// ## Errors
///
/// `DuplicateCollection` if the module is already attached.
pub fn on_attach(module: ModuleId) -> PrinterResult<()>
{
    let collection = Arc::new(default_collection()?);
    global_mut().register(Scope::Module(module), collection)?;
    info!(%module, "Attached pretty-printers");
    Ok(())
}

/// Tear down every registration for a module the host is detaching from
pub fn on_detach(module: ModuleId)
{
    let removed = global_mut().unregister_module(module);
    info!(%module, removed, "Detached pretty-printers");
}
