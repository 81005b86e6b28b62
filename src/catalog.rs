//! Reference catalogs: C API function and constant pages on sqlite.org.
//!
//! Pages are fetched through a [`PageSource`] and scraped with regexes, the
//! same way the rest of the crate treats markup: line-level patterns, no
//! HTML parser.

use crate::error::CatalogError;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;
use url::Url;

static RE_FUNCTION_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<a href="([^'"]+?/c3ref/[^<]+?\.html)['"]>(sqlite3_.+?)<"#).unwrap()
});

static RE_CONSTANT_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<a href="([^"]+?/c3ref/[^<]+?\.html)["]>(SQLITE_.+?)<"#).unwrap()
});

static RE_TITLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<h2>(.+?)</h2>").unwrap());

/// This page's own title repeats another page's.
const LOOKASIDE_PAGE: &str = "c_dbconfig_lookaside.html";
const LOOKASIDE_TITLE: &str = "Database Configuration Options";

/// Something that returns the raw text of a page.
pub trait PageSource {
    fn fetch(&self, url: &str) -> Result<String, CatalogError>;
}

/// Blocking HTTP fetches.
pub struct HttpSource {
    agent: ureq::Agent,
}

impl HttpSource {
    pub fn new() -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(60))
            .user_agent(concat!("cdoc/", env!("CARGO_PKG_VERSION")))
            .build();
        Self { agent }
    }
}

impl Default for HttpSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PageSource for HttpSource {
    fn fetch(&self, url: &str) -> Result<String, CatalogError> {
        debug!(url, "fetching");
        let fetch_err = |reason: String| CatalogError::Fetch {
            url: url.to_string(),
            reason,
        };
        self.agent
            .get(url)
            .call()
            .map_err(|e| fetch_err(e.to_string()))?
            .into_string()
            .map_err(|e| fetch_err(e.to_string()))
    }
}

/// Pages saved in a directory, named by the last segment of their url.
pub struct CacheDirSource {
    dir: PathBuf,
}

impl CacheDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl PageSource for CacheDirSource {
    fn fetch(&self, url: &str) -> Result<String, CatalogError> {
        let file = url.rsplit('/').next().unwrap_or(url);
        let path = self.dir.join(file);
        fs::read_to_string(&path).map_err(|source| CatalogError::Cache { path, source })
    }
}

/// Pages held in memory, keyed by full url.
#[derive(Default)]
pub struct MemorySource {
    pages: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }
}

impl PageSource for MemorySource {
    fn fetch(&self, url: &str) -> Result<String, CatalogError> {
        self.pages.get(url).cloned().ok_or_else(|| CatalogError::Fetch {
            url: url.to_string(),
            reason: "not found".to_string(),
        })
    }
}

/// C API function name → documentation url.
#[derive(Debug, Default, Clone)]
pub struct FunctionCatalog {
    urls: HashMap<String, String>,
}

impl FunctionCatalog {
    pub fn load(source: &dyn PageSource, list_url: &str) -> Result<Self, CatalogError> {
        let base = Url::parse(list_url)?;
        let page = source.fetch(list_url)?;
        let mut urls = HashMap::new();
        for caps in RE_FUNCTION_LINK.captures_iter(&page) {
            urls.insert(caps[2].to_string(), base.join(&caps[1])?.to_string());
        }
        debug!(functions = urls.len(), "loaded function catalog");
        Ok(Self { urls })
    }

    pub fn url(&self, function: &str) -> Option<&str> {
        self.urls.get(function).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FunctionCatalog {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            urls: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// A documentation page describing a family of constants.
#[derive(Debug, Clone)]
pub struct ConstantPage {
    pub title: String,
    /// Constants the catalog lists for this page, in catalog order.
    pub constants: Vec<String>,
}

/// Constant name → page, plus each page's title and members.
#[derive(Debug, Default, Clone)]
pub struct ConstantCatalog {
    constants: HashMap<String, String>,
    pages: HashMap<String, ConstantPage>,
}

impl ConstantCatalog {
    /// Load the constant list, fetching each referenced page once for its title.
    pub fn load(
        source: &dyn PageSource,
        list_url: &str,
        unlisted: &[String],
    ) -> Result<Self, CatalogError> {
        let base = Url::parse(list_url)?;
        let list = source.fetch(list_url)?;
        let mut catalog = Self::default();

        for caps in RE_CONSTANT_LINK.captures_iter(&list) {
            let constant = &caps[2];
            if unlisted.iter().any(|u| u == constant) {
                continue;
            }
            let page_url = base.join(&caps[1])?.to_string();
            if !catalog.pages.contains_key(&page_url) {
                let title = page_title(source, &page_url)?;
                catalog.pages.insert(
                    page_url.clone(),
                    ConstantPage {
                        title,
                        constants: Vec::new(),
                    },
                );
            }
            catalog.insert(constant, &page_url);
        }

        debug!(
            constants = catalog.constants.len(),
            pages = catalog.pages.len(),
            "loaded constant catalog"
        );
        Ok(catalog)
    }

    /// Build a catalog from already known pages: `(url, title, constants)`.
    pub fn from_pages<'a>(pages: impl IntoIterator<Item = (&'a str, &'a str, &'a [&'a str])>) -> Self {
        let mut catalog = Self::default();
        for (url, title, constants) in pages {
            catalog.pages.insert(
                url.to_string(),
                ConstantPage {
                    title: title.to_string(),
                    constants: Vec::new(),
                },
            );
            for constant in constants {
                catalog.insert(constant, url);
            }
        }
        catalog
    }

    fn insert(&mut self, constant: &str, page_url: &str) {
        self.constants
            .insert(constant.to_string(), page_url.to_string());
        if let Some(page) = self.pages.get_mut(page_url) {
            page.constants.push(constant.to_string());
        }
    }

    /// Url of the page documenting `constant`.
    pub fn page_of(&self, constant: &str) -> Option<&str> {
        self.constants.get(constant).map(String::as_str)
    }

    pub fn page(&self, url: &str) -> Option<&ConstantPage> {
        self.pages.get(url)
    }
}

fn page_title(source: &dyn PageSource, url: &str) -> Result<String, CatalogError> {
    if url.ends_with(LOOKASIDE_PAGE) {
        return Ok(LOOKASIDE_TITLE.to_string());
    }
    let page = source.fetch(url)?;
    // The first <h2> is the site banner.
    RE_TITLE
        .captures_iter(&page)
        .nth(1)
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| CatalogError::MissingTitle {
            url: url.to_string(),
        })
}
