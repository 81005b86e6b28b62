//! Constant groups declared with `DICT("name")` / `ADDINT(CONSTANT)` in the
//! module source, rendered as `.. data::` entries linked to the catalog.

use crate::catalog::ConstantCatalog;
use crate::error::MappingError;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::warn;

static RE_MAPPING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*(?:ADDINT\s*\(\s*([^)]+)\).*|DICT\s*\(\s*"([^"]+)"\s*\)>*)"#).unwrap()
});

/// Group name → member constants in source order.
#[derive(Debug, Default)]
pub struct MappingTable {
    groups: BTreeMap<String, Vec<String>>,
    current: Option<String>,
}

impl MappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, line: &str) {
        let Some(caps) = RE_MAPPING.captures(line) else {
            return;
        };
        if let Some(group) = caps.get(2) {
            let group = group.as_str().to_string();
            self.groups.insert(group.clone(), Vec::new());
            self.current = Some(group);
            return;
        }
        if let Some(member) = caps.get(1) {
            let member = member.as_str().trim();
            match self.current.as_ref().and_then(|g| self.groups.get_mut(g)) {
                Some(members) => members.push(member.to_string()),
                None => warn!(member, "ADDINT outside any DICT, ignored"),
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Render every group, checking it against the catalog. `shared` is the
    /// one constant allowed in several groups and is exempt from the checks.
    pub fn render(
        &self,
        catalog: &ConstantCatalog,
        shared: &str,
    ) -> Result<Vec<String>, MappingError> {
        let mut out = Vec::new();
        for (group, members) in &self.groups {
            out.push(format!(".. data:: {}", group));
            out.push(String::new());

            if let Some(page_url) = single_page(group, members, catalog, shared)? {
                if let Some(page) = catalog.page(page_url) {
                    out.push(format!("   `{} <{}>`_", page.title, page_url));
                    out.push(String::new());
                    if let Some(missing) = page.constants.iter().find(|c| !members.contains(c)) {
                        return Err(MappingError::MissingMember {
                            group: group.clone(),
                            constant: missing.clone(),
                        });
                    }
                }
            }

            let mut sorted = members.clone();
            sorted.sort();
            let consts: Vec<String> = sorted.iter().map(|c| format!(":const:`{}`", c)).collect();
            out.push(format!("    {}", consts.join(", ")));
            out.push(String::new());
        }
        Ok(out)
    }
}

/// The one page every non-shared member of `group` is documented on.
fn single_page<'c>(
    group: &str,
    members: &[String],
    catalog: &'c ConstantCatalog,
    shared: &str,
) -> Result<Option<&'c str>, MappingError> {
    let mut page: Option<&str> = None;
    for member in members.iter().filter(|m| *m != shared) {
        let url = catalog
            .page_of(member)
            .ok_or_else(|| MappingError::UnknownConstant {
                group: group.to_string(),
                constant: member.clone(),
            })?;
        match page {
            None => page = Some(url),
            Some(p) if p != url => {
                return Err(MappingError::PageMismatch {
                    group: group.to_string(),
                    members: members
                        .iter()
                        .map(|m| (catalog.page_of(m).unwrap_or("?").to_string(), m.clone()))
                        .collect(),
                })
            }
            Some(_) => {}
        }
    }
    Ok(page)
}
