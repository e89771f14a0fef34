//! Reshape per-record locale text into per-locale option lists.
//!
//! Records usually look like
//! `{"_id": "t1", "locales": {"en-US": "Welcome", "fr-CA": "Bienvenue"}}`;
//! the output groups the texts by locale code and orders every group by its
//! NFD normalised text (UTF-16 code unit order), keeping the input order for
//! equal texts.

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

use super::types::{LocaleOption, LocaleOptions};

/// Default field holding a record's id
pub const DEFAULT_ID_KEY: &str = "_id";
/// Default field holding a record's locale -> text map
pub const DEFAULT_VALUE_KEY: &str = "locales";

/// Raised when a record does not have the shape the caller promised
#[derive(Debug, Error, PartialEq)]
pub enum SortError {
    #[error("Record {index} has no `{key}` field")]
    MissingField { index: usize, key: String },

    #[error("Record {index}: `{key}` must be a string or number")]
    InvalidId { index: usize, key: String },

    #[error("Record {index}: `{key}` must be an object")]
    InvalidLocales { index: usize, key: String },

    #[error("Record {id}: text for locale {locale} must be a string")]
    InvalidText { id: String, locale: String },
}

pub type SortResult<T> = Result<T, SortError>;

/// [`sort_array_by`] with the `_id` and `locales` fields.
pub fn sort_array(records: &[Value]) -> SortResult<LocaleOptions> {
    sort_array_by(records, DEFAULT_ID_KEY, DEFAULT_VALUE_KEY)
}

/// Group the texts of a list of records by locale and sort each group.
///
/// Every record must carry `id_key` (string or number) and `value_key`, an
/// object mapping locale codes to strings.
pub fn sort_array_by(records: &[Value], id_key: &str, value_key: &str) -> SortResult<LocaleOptions> {
    let mut grouped: BTreeMap<String, Vec<LocaleOption>> = BTreeMap::new();

    for (index, record) in records.iter().enumerate() {
        let id = match record.get(id_key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(_) => {
                return Err(SortError::InvalidId {
                    index,
                    key: id_key.to_string(),
                })
            }
            None => {
                return Err(SortError::MissingField {
                    index,
                    key: id_key.to_string(),
                })
            }
        };

        let texts = match record.get(value_key) {
            Some(Value::Object(map)) => map,
            Some(_) => {
                return Err(SortError::InvalidLocales {
                    index,
                    key: value_key.to_string(),
                })
            }
            None => {
                return Err(SortError::MissingField {
                    index,
                    key: value_key.to_string(),
                })
            }
        };

        for (locale, text) in texts {
            let text = text.as_str().ok_or_else(|| SortError::InvalidText {
                id: id.clone(),
                locale: locale.clone(),
            })?;
            grouped
                .entry(locale.clone())
                .or_default()
                .push(LocaleOption::new(id.clone(), text));
        }
    }

    Ok(sort_groups(grouped))
}

/// Same as [`sort_array`] for records keyed by their id.
///
/// Iteration follows the map's order, so equal texts keep the order of the
/// record ids in `records`.
pub fn sort_object<I, T, K, V>(records: I) -> LocaleOptions
where
    I: IntoIterator<Item = (K, T)>,
    T: IntoIterator<Item = (String, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut grouped: BTreeMap<String, Vec<LocaleOption>> = BTreeMap::new();

    for (id, texts) in records {
        for (locale, text) in texts {
            grouped
                .entry(locale)
                .or_default()
                .push(LocaleOption::new(id.as_ref(), text.as_ref()));
        }
    }

    sort_groups(grouped)
}

fn sort_groups(grouped: BTreeMap<String, Vec<LocaleOption>>) -> LocaleOptions {
    grouped
        .into_iter()
        .map(|(locale, options)| (locale, sort_options(options)))
        .collect()
}

/// Stable sort on the NFD form of the text, compared by UTF-16 code unit
/// so astral characters order before U+E000..U+FFFF
fn sort_options(options: Vec<LocaleOption>) -> Vec<LocaleOption> {
    let mut keyed: Vec<(Vec<u16>, LocaleOption)> = options
        .into_iter()
        .map(|option| (sort_key(&option.text), option))
        .collect();

    keyed.sort_by(|a, b| a.0.cmp(&b.0));

    keyed.into_iter().map(|(_, option)| option).collect()
}

fn sort_key(text: &str) -> Vec<u16> {
    text.nfd().collect::<String>().encode_utf16().collect()
}
