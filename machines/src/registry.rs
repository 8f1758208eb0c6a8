//! Console registry for automatic front-end discovery.
//!
//! Each front-end-capable console self-registers via [`inventory::submit!`]
//! with a [`ConsoleEntry`] containing its CLI name, a one-line description,
//! and a factory function. The front-end discovers available consoles at
//! runtime without any central list.

use neso_core::core::console::Console;

/// Describes a front-end-capable console.
pub struct ConsoleEntry {
    /// CLI name used to select this console (e.g., "pattern").
    pub name: &'static str,
    /// Shown by `--list`.
    pub description: &'static str,
    /// Factory: construct a powered-on console with no program loaded.
    pub create: fn() -> Box<dyn Console>,
}

impl ConsoleEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        create: fn() -> Box<dyn Console>,
    ) -> Self {
        Self {
            name,
            description,
            create,
        }
    }
}

inventory::collect!(ConsoleEntry);

/// Return all registered consoles, sorted by name.
pub fn all() -> Vec<&'static ConsoleEntry> {
    let mut entries: Vec<_> = inventory::iter::<ConsoleEntry>.into_iter().collect();
    entries.sort_by_key(|e| e.name);
    entries
}

/// Look up a console by its CLI name.
pub fn find(name: &str) -> Option<&'static ConsoleEntry> {
    inventory::iter::<ConsoleEntry>
        .into_iter()
        .find(|e| e.name == name)
}
