//! String-table adapter.
//!
//! Implements [`StringsPort`] over resource modules held in memory. The
//! default instance serves the bundled English resources; extra modules
//! (or a whole translation) can be layered on with [`StringTable::with_module`].

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use log::{info, warn};

use crate::app::ports::StringsPort;
use crate::i18n::resources::{BUILTIN_LANG, BUILTIN_MODULES, parse_resource};

struct Module {
    name: String,
    source: String,
    messages: Vec<(String, String)>,
}

/// Indexed string tables.
pub struct StringTable {
    langs: Vec<String>,
    modules: Vec<Module>,
    by_key: HashMap<String, (usize, usize)>,
}

impl Default for StringTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl StringTable {
    /// An empty table for the given languages.
    pub fn empty(langs: Vec<String>) -> Self {
        Self {
            langs,
            modules: Vec::new(),
            by_key: HashMap::new(),
        }
    }

    /// Bundled English resources.
    pub fn builtin() -> Self {
        let table = BUILTIN_MODULES
            .iter()
            .fold(Self::empty(vec![BUILTIN_LANG.to_string()]), |t, (name, text)| {
                t.with_module(name, text)
            });
        info!("StringTable: {} builtin modules", table.modules.len());
        table
    }

    /// Append a module, or replace one with the same name in place (its
    /// module index is kept).
    pub fn with_module(mut self, name: &str, source: &str) -> Self {
        let module = Module {
            name: name.to_string(),
            source: source.to_string(),
            messages: parse_resource(source),
        };
        match self.modules.iter().position(|m| m.name == name) {
            Some(idx) => self.modules[idx] = module,
            None => self.modules.push(module),
        }
        self.reindex();
        self
    }

    /// Layer every `<module>.ftl` file in `dir` over the table, in file
    /// name order. Unreadable files are skipped with a warning.
    pub fn with_resource_dir(self, dir: &Path) -> io::Result<Self> {
        let mut paths: Vec<_> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "ftl"))
            .collect();
        paths.sort();

        let mut table = self;
        for path in paths {
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match fs::read_to_string(&path) {
                Ok(text) => {
                    info!("StringTable: module {} from {}", name, path.display());
                    table = table.with_module(name, &text);
                }
                Err(e) => warn!("StringTable: skipping {}: {}", path.display(), e),
            }
        }
        Ok(table)
    }

    /// Replace the language list.
    #[must_use]
    pub fn with_langs(mut self, langs: Vec<String>) -> Self {
        self.langs = langs;
        self
    }

    /// Module index of `name`.
    pub fn module_index(&self, name: &str) -> Option<u32> {
        self.modules
            .iter()
            .position(|m| m.name == name)
            .map(|i| i as u32)
    }

    /// `(module_index, message_index)` of a message key.
    pub fn indices_of(&self, key: &str) -> Option<(u32, u32)> {
        self.by_key
            .get(key)
            .map(|&(m, i)| (m as u32, i as u32))
    }

    fn reindex(&mut self) {
        self.by_key.clear();
        for (m, module) in self.modules.iter().enumerate() {
            for (i, (key, _)) in module.messages.iter().enumerate() {
                self.by_key.entry(key.clone()).or_insert((m, i));
            }
        }
    }
}

impl StringsPort for StringTable {
    fn template(&self, module_index: u32, message_index: u32) -> Option<String> {
        let module = self.modules.get(module_index as usize)?;
        let (_, template) = module.messages.get(message_index as usize)?;
        Some(template.clone())
    }

    fn message(&self, key: &str) -> Option<String> {
        let &(m, i) = self.by_key.get(key)?;
        Some(self.modules[m].messages[i].1.clone())
    }

    fn module_resource(&self, module: &str) -> Option<String> {
        self.modules
            .iter()
            .find(|m| m.name == module)
            .map(|m| m.source.clone())
    }

    fn langs(&self) -> Vec<String> {
        self.langs.clone()
    }
}
