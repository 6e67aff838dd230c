use csv::StringRecord;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Cross-origin support as reported by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Cors {
    Yes,
    No,
    #[default]
    Unknown,
}

impl Cors {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "yes" => Cors::Yes,
            "no" => Cors::No,
            _ => Cors::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Cors::Yes => "Yes",
            Cors::No => "No",
            Cors::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Cors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiRecord {
    pub name: String,
    pub description: String,
    pub category: String,
    pub auth: String,
    pub https: bool,
    pub cors: Cors,
    pub link: String,
}

impl ApiRecord {
    /// Text the ranker indexes: name, description and category.
    pub fn search_text(&self) -> String {
        format!("{} {} {}", self.name, self.description, self.category)
    }
}

fn truthy_text(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "y" | "1"
    )
}

/// A scalar cell as it may appear in YAML or JSON sources.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Cell {
    Text(String),
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl Cell {
    fn into_text(self) -> String {
        match self {
            Cell::Text(s) => s,
            Cell::Bool(b) => b.to_string(),
            Cell::Int(i) => i.to_string(),
            Cell::UInt(u) => u.to_string(),
            Cell::Float(f) => f.to_string(),
        }
    }

    fn truthy(&self) -> bool {
        match self {
            Cell::Bool(b) => *b,
            Cell::Int(i) => *i != 0,
            Cell::UInt(u) => *u != 0,
            Cell::Float(f) => *f != 0.0,
            Cell::Text(s) => truthy_text(s),
        }
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let cell: Option<Cell> = Option::deserialize(deserializer)?;
    Ok(cell.map(Cell::into_text).unwrap_or_default().trim().to_string())
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let cell: Option<Cell> = Option::deserialize(deserializer)?;
    Ok(cell.map(|c| c.truthy()).unwrap_or(false))
}

fn lenient_cors<'de, D>(deserializer: D) -> Result<Cors, D::Error>
where
    D: Deserializer<'de>,
{
    let cell: Option<Cell> = Option::deserialize(deserializer)?;
    Ok(cell
        .map(|c| Cors::parse(&c.into_text()))
        .unwrap_or_default())
}

/// One row of a persisted catalog. Column names follow the public-apis
/// export (`API, Description, Category, Auth, HTTPS, CORS, Link`); lowercase
/// field names are accepted too.
#[derive(Debug, Deserialize)]
pub(crate) struct RawRecord {
    #[serde(rename = "API", alias = "api", alias = "name", default, deserialize_with = "lenient_text")]
    name: String,
    #[serde(rename = "Description", alias = "description", default, deserialize_with = "lenient_text")]
    description: String,
    #[serde(rename = "Category", alias = "category", default, deserialize_with = "lenient_text")]
    category: String,
    #[serde(rename = "Auth", alias = "auth", default, deserialize_with = "lenient_text")]
    auth: String,
    #[serde(rename = "HTTPS", alias = "https", default, deserialize_with = "lenient_bool")]
    https: bool,
    #[serde(rename = "CORS", alias = "cors", default, deserialize_with = "lenient_cors")]
    cors: Cors,
    #[serde(rename = "Link", alias = "link", default, deserialize_with = "lenient_text")]
    link: String,
}

/// Accepted header spellings per field, matched case-insensitively.
pub(crate) const CSV_COLUMNS: [(&str, &[&str]); 7] = [
    ("API", &["api", "name"]),
    ("Description", &["description"]),
    ("Category", &["category"]),
    ("Auth", &["auth"]),
    ("HTTPS", &["https"]),
    ("CORS", &["cors"]),
    ("Link", &["link"]),
];

/// Position of the first header matching one of `names`.
pub(crate) fn column_index(headers: &StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.iter().any(|name| h.eq_ignore_ascii_case(name)))
}

fn csv_cell<'r>(headers: &StringRecord, row: &'r StringRecord, names: &[&str]) -> &'r str {
    column_index(headers, names)
        .and_then(|i| row.get(i))
        .map(str::trim)
        .unwrap_or("")
}

impl RawRecord {
    /// Every CSV cell is text; values are kept exactly as written.
    pub(crate) fn from_csv_row(headers: &StringRecord, row: &StringRecord) -> Self {
        let [name, description, category, auth, https, cors, link] =
            CSV_COLUMNS.map(|(_, names)| csv_cell(headers, row, names));
        RawRecord {
            name: name.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            auth: auth.to_string(),
            https: truthy_text(https),
            cors: Cors::parse(cors),
            link: link.to_string(),
        }
    }
}

impl From<RawRecord> for ApiRecord {
    fn from(raw: RawRecord) -> Self {
        ApiRecord {
            name: raw.name,
            description: raw.description,
            category: raw.category,
            auth: raw.auth,
            https: raw.https,
            cors: raw.cors,
            link: raw.link,
        }
    }
}
