use crate::kind::Kind;
use std::{collections::HashSet, fs, ops::Deref, path::Path};

/// A declared expectation for one environment variable
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SchemaItem {
    /// Environment variable key
    pub name: String,
    /// Kind the raw value is coerced to
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: Kind,
    /// Whether the variable may be unset
    #[cfg_attr(feature = "serde", serde(default))]
    pub optional: bool,
    /// Whether an empty string is accepted, only meaningful for `Kind::String`
    #[cfg_attr(feature = "serde", serde(default))]
    pub allow_empty: bool,
    /// Human-readable description used for generated docs
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub description: Option<String>,
}

impl SchemaItem {
    pub fn new(name: impl Into<String>, kind: Kind) -> Self {
        Self {
            name: name.into(),
            kind,
            optional: false,
            allow_empty: false,
            description: None,
        }
    }

    pub fn required(name: impl Into<String>, kind: Kind) -> Self {
        Self::new(name, kind)
    }

    pub fn optional(name: impl Into<String>, kind: Kind) -> Self {
        Self::new(name, kind).set_optional(true)
    }

    pub fn set_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn allow_empty(self) -> Self {
        self.set_allow_empty(true)
    }

    pub fn set_allow_empty(mut self, allow_empty: bool) -> Self {
        self.allow_empty = allow_empty;
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// An ordered list of schema items
///
/// # Example
/// ```rust
/// use env_loadr::{Kind, Schema, SchemaItem};
///
/// let schema = Schema::new()
///     .item(SchemaItem::required("PORT", Kind::Number))
///     .item(SchemaItem::optional("ADMIN_EMAIL", Kind::Email));
///
/// assert_eq!(schema.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Schema {
    items: Vec<SchemaItem>,
}

impl Schema {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn item(mut self, item: SchemaItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn push(&mut self, item: SchemaItem) {
        self.items.push(item);
    }

    pub fn into_items(self) -> Vec<SchemaItem> {
        self.items
    }

    /// Names declared more than once, each reported once in the order it repeats
    pub fn duplicate_names(&self) -> Vec<&str> {
        duplicate_names(&self.items)
    }

    /// Render the schema as a markdown summary table
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str("## Environment Variables Summary\n\n");
        md.push_str("| Variable | Type | Required | Allow Empty | Description |\n");
        md.push_str("|----------|------|----------|-------------|-------------|\n");
        for item in &self.items {
            let required_str = if item.optional { "No" } else { "Yes" };
            let allow_empty_str = match (item.kind, item.allow_empty) {
                (Kind::String, true) => "Yes",
                (Kind::String, false) => "No",
                _ => "-",
            };
            let description = item.description.as_deref().unwrap_or("-");
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                item.name, item.kind, required_str, allow_empty_str, description
            ));
        }

        md
    }

    /// Write the markdown summary to a file
    ///
    /// # Example
    /// ```no_run
    /// use env_loadr::{Kind, Schema, SchemaItem};
    ///
    /// let schema = Schema::new().item(SchemaItem::required("PORT", Kind::Number).describe("Server port"));
    /// schema.write_docs("ENVIRONMENT.md").unwrap();
    /// ```
    pub fn write_docs(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        fs::write(path, self.to_markdown())
    }
}

pub(crate) fn duplicate_names(items: &[SchemaItem]) -> Vec<&str> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut duplicates = Vec::new();

    for item in items {
        let name = item.name.as_str();
        if !seen.insert(name) && reported.insert(name) {
            duplicates.push(name);
        }
    }

    duplicates
}

impl Deref for Schema {
    type Target = [SchemaItem];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl AsRef<[SchemaItem]> for Schema {
    fn as_ref(&self) -> &[SchemaItem] {
        &self.items
    }
}

impl From<Vec<SchemaItem>> for Schema {
    fn from(items: Vec<SchemaItem>) -> Self {
        Self { items }
    }
}

impl FromIterator<SchemaItem> for Schema {
    fn from_iter<I: IntoIterator<Item = SchemaItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a SchemaItem;
    type IntoIter = std::slice::Iter<'a, SchemaItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
