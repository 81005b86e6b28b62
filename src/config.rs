//! Settings for both pipelines. Defaults describe the apsw extension module;
//! the binaries override individual fields from the command line.

use std::collections::BTreeSet;
use std::path::Path;

/// Settings for `cdoc-extract`.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Module name used in `.. currentmodule::`.
    pub namespace: String,
    /// File name of the module's main source. Only this file has its
    /// `DICT`/`ADDINT` constant groups rendered.
    pub module_source: String,
    /// Constant present in several groups; exempt from page checks.
    pub shared_constant: String,
    /// Catalog constants that never belong to a group.
    pub unlisted_constants: Vec<String>,
    pub function_list_url: String,
    pub constant_list_url: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            namespace: "apsw".to_string(),
            module_source: "apsw.c".to_string(),
            shared_constant: "SQLITE_OK".to_string(),
            unlisted_constants: vec!["SQLITE_DONE".to_string(), "SQLITE_ROW".to_string()],
            function_list_url: "https://www.sqlite.org/c3ref/funclist.html".to_string(),
            constant_list_url: "https://www.sqlite.org/c3ref/constlist.html".to_string(),
        }
    }
}

impl ExtractConfig {
    /// Whether `path` names the module's main source file.
    pub fn is_module_source(&self, path: &str) -> bool {
        Path::new(path)
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n == self.module_source)
    }
}

/// Settings for `cdoc-docstrings`.
#[derive(Debug, Clone)]
pub struct CompileConfig {
    /// Prefix given to unqualified names (`foo` becomes `apsw.foo`).
    pub namespace: String,
    /// Names that cannot carry a docstring.
    pub skip: BTreeSet<String>,
    /// Documented pseudo-classes that don't exist at runtime.
    pub internal_types: BTreeSet<String>,
    pub symbol_suffix: String,
    /// Glob for the C sources that must reference every generated symbol.
    pub sources: String,
}

impl Default for CompileConfig {
    fn default() -> Self {
        let skip = [
            "apsw.compile_options",
            "apsw.connection_hooks",
            "apsw.keywords",
            "apsw.main",
            "apsw.using_amalgamation",
        ];
        Self {
            namespace: "apsw".to_string(),
            skip: skip.iter().map(|s| s.to_string()).collect(),
            internal_types: ["VTCursor", "VTModule", "VTTable"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            symbol_suffix: "_DOC".to_string(),
            sources: "src/*.c".to_string(),
        }
    }
}
