//! Name lookups over the materialized record file.

use std::io::BufRead;

use serde_json::Value;

use crate::changelog::{decode_line, raw_lines, split_tagged, Fields};
use crate::error::{Error, Result};

/// A `SEARCH;{"name": ...}` query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Exact name to match.
    pub name: String,
}

/// Parse one query line.
///
/// Lines without a `;` and query types other than `SEARCH` yield `Ok(None)`.
///
/// # Errors
/// `Json` for an unparsable payload, `MalformedRecord` when `name` is
/// missing or not a string.
pub fn parse_query(line: &str) -> Result<Option<SearchQuery>> {
    let Some((tag, fields)) = split_tagged(line)? else {
        return Ok(None);
    };
    if tag != "SEARCH" {
        return Ok(None);
    }
    match fields.get("name") {
        Some(Value::String(name)) => Ok(Some(SearchQuery { name: name.clone() })),
        _ => Err(Error::MalformedRecord(
            "search needs a string field `name`".to_string(),
        )),
    }
}

/// Records loaded from the output file, searchable by name.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    records: Vec<Fields>,
}

impl SearchIndex {
    /// Index an in-memory record set.
    pub fn new(records: Vec<Fields>) -> Self {
        Self { records }
    }

    /// Read one JSON object per line. Unparsable lines are logged and dropped.
    ///
    /// # Errors
    /// Only I/O errors from `reader` are returned.
    pub fn load<R: BufRead>(reader: R) -> Result<Self> {
        let mut records = Vec::new();
        for (idx, raw) in raw_lines(reader).enumerate() {
            let line = match decode_line(raw?) {
                Ok(line) => line,
                Err(error) => {
                    tracing::warn!(lineno = idx + 1, %error, "could not decode output line");
                    continue;
                }
            };
            match serde_json::from_str::<Value>(&line) {
                Ok(Value::Object(fields)) => records.push(fields),
                Ok(_) => {
                    tracing::warn!(lineno = idx + 1, "output line is not a JSON object");
                }
                Err(error) => {
                    tracing::warn!(lineno = idx + 1, %error, "could not parse output line");
                }
            }
        }
        Ok(Self { records })
    }

    /// Number of indexed records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no records are indexed.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every record whose `name` equals `name`, in file order.
    pub fn lookup<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Fields> + 'a {
        self.records
            .iter()
            .filter(move |r| r.get("name").and_then(Value::as_str) == Some(name))
    }

    /// Answer every query in `queries`, concatenating hits in query order.
    ///
    /// # Errors
    /// Only I/O errors from `queries` are returned; bad lines are logged.
    pub fn answer<R: BufRead>(&self, queries: R) -> Result<Vec<Fields>> {
        let mut hits = Vec::new();
        for (idx, raw) in raw_lines(queries).enumerate() {
            let line = match decode_line(raw?) {
                Ok(line) => line,
                Err(error) => {
                    tracing::warn!(lineno = idx + 1, %error, "could not decode search line");
                    continue;
                }
            };
            match parse_query(&line) {
                Ok(Some(query)) => {
                    let before = hits.len();
                    hits.extend(self.lookup(&query.name).cloned());
                    tracing::debug!(name = %query.name, hits = hits.len() - before, "search");
                }
                Ok(None) => {}
                Err(error) => {
                    tracing::warn!(lineno = idx + 1, %error, line = %line, "could not parse search line");
                }
            }
        }
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const OUTPUT: &str = "\
{\"isbn\":\"1\",\"name\":\"Dune\"}
{\"isbn\":\"2\",\"name\":\"Emma\"}
not json
{\"isbn\":\"3\",\"name\":\"Dune\"}
";

    #[test]
    fn test_parse_query() {
        let q = parse_query(r#"SEARCH;{"name":"Dune"}"#).unwrap().unwrap();
        assert_eq!(q.name, "Dune");
        assert!(parse_query(r#"FIND;{"name":"Dune"}"#).unwrap().is_none());
        assert!(parse_query("SEARCH").unwrap().is_none());
        assert!(matches!(
            parse_query(r#"SEARCH;{"name":3}"#),
            Err(Error::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_load_skips_bad_lines() {
        let index = SearchIndex::load(Cursor::new(OUTPUT)).unwrap();
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_non_utf8_lines_are_dropped() {
        let output: &[u8] = b"{\"isbn\":\"1\",\"name\":\"Dune\"}\r\n\
{\"isbn\":\"2\",\"name\":\"Espa\xf1a\"}\n\
{\"isbn\":\"3\",\"name\":\"Emma\"}\n";
        let index = SearchIndex::load(Cursor::new(output)).unwrap();
        assert_eq!(index.len(), 2);

        let queries: &[u8] = b"SEARCH;{\"name\":\"Emma\"}\n\
SEARCH;{\"name\":\"Espa\xf1a\"}\n\
SEARCH;{\"name\":\"Dune\"}\n";
        let hits = index.answer(Cursor::new(queries)).unwrap();
        let isbns: Vec<_> = hits.iter().map(|r| r["isbn"].as_str().unwrap()).collect();
        assert_eq!(isbns, ["3", "1"]);
    }

    #[test]
    fn test_lookup_returns_all_exact_matches() {
        let index = SearchIndex::load(Cursor::new(OUTPUT)).unwrap();
        let isbns: Vec<_> = index
            .lookup("Dune")
            .map(|r| r["isbn"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(isbns, ["1", "3"]);
        assert_eq!(index.lookup("dune").count(), 0);
    }

    #[test]
    fn test_answer_keeps_query_order() {
        let index = SearchIndex::load(Cursor::new(OUTPUT)).unwrap();
        let queries = "\
SEARCH;{\"name\":\"Emma\"}
SEARCH;{\"name\":\"Missing\"}
SEARCH;{broken
SEARCH;{\"name\":\"Dune\"}
";
        let hits = index.answer(Cursor::new(queries)).unwrap();
        let isbns: Vec<_> = hits.iter().map(|r| r["isbn"].as_str().unwrap()).collect();
        assert_eq!(isbns, ["2", "1", "3"]);
    }
}
