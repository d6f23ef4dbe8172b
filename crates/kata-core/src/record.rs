use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::completed_at::CompletedAt;
use crate::id::ChallengeId;

/// Interpreted keys, in the order a freshly built record writes them.
const FIELDS: [&str; 5] = ["id", "name", "completedAt", "completedLanguages", "solutions"];

/// A completed challenge as returned by the catalog, optionally enriched
/// with scraped solutions.
///
/// Field names follow the catalog's camelCase JSON. Fields the pipeline
/// does not interpret (e.g. `slug`) are kept in `extra`. A deserialized
/// record remembers its key order and writes keys back in that order, so
/// a stored record keeps its exact text across load/save cycles. Keys the
/// source did not have (such as `solutions` after a scrape) go last.
#[derive(Debug, Clone)]
pub struct ChallengeRecord {
    pub id: ChallengeId,
    pub name: String,
    pub completed_at: CompletedAt,
    /// Language tags in source order. Scraping follows this order.
    pub completed_languages: Vec<String>,
    /// Present once the record has gone through a scrape, even if empty.
    pub solutions: Option<Vec<Solution>>,
    pub extra: Map<String, Value>,
    key_order: Vec<String>,
}

/// Scraped code and description for one record in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub language: String,
    pub code: String,
    pub description: String,
}

impl ChallengeRecord {
    /// Build a bare record with no solutions and no extra fields.
    #[must_use]
    pub fn new(
        id: impl Into<ChallengeId>,
        name: impl Into<String>,
        completed_at: impl Into<CompletedAt>,
        completed_languages: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            completed_at: completed_at.into(),
            completed_languages,
            solutions: None,
            extra: Map::new(),
            key_order: Vec::new(),
        }
    }

    /// Attach the result of a scrape. Called once per record.
    pub fn attach_solutions(&mut self, solutions: Vec<Solution>) {
        self.solutions = Some(solutions);
    }

    #[must_use]
    pub fn solution_count(&self) -> usize {
        self.solutions.as_ref().map_or(0, Vec::len)
    }

    fn has_source_key(&self, key: &str) -> bool {
        self.key_order.iter().any(|k| k == key)
    }

    fn write_entry<M: SerializeMap>(&self, map: &mut M, key: &str) -> Result<(), M::Error> {
        match key {
            "id" => map.serialize_entry(key, &self.id),
            "name" => map.serialize_entry(key, &self.name),
            "completedAt" => map.serialize_entry(key, &self.completed_at),
            "completedLanguages" => map.serialize_entry(key, &self.completed_languages),
            "solutions" => match &self.solutions {
                Some(solutions) => map.serialize_entry(key, solutions),
                None => Ok(()),
            },
            other => match self.extra.get(other) {
                Some(value) => map.serialize_entry(other, value),
                None => Ok(()),
            },
        }
    }
}

/// Key order is presentation only.
impl PartialEq for ChallengeRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.completed_at == other.completed_at
            && self.completed_languages == other.completed_languages
            && self.solutions == other.solutions
            && self.extra == other.extra
    }
}

impl Eq for ChallengeRecord {}

impl Serialize for ChallengeRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for key in &self.key_order {
            self.write_entry(&mut map, key)?;
        }
        for key in FIELDS {
            if self.has_source_key(key) {
                continue;
            }
            // An absent language list stays absent until there is something in it.
            if key == "completedLanguages" && self.completed_languages.is_empty() {
                continue;
            }
            self.write_entry(&mut map, key)?;
        }
        for (key, value) in &self.extra {
            if !self.has_source_key(key) && !FIELDS.contains(&key.as_str()) {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ChallengeRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RecordVisitor)
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = ChallengeRecord;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a challenge record object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut id: Option<ChallengeId> = None;
        let mut name: Option<String> = None;
        let mut completed_at: Option<CompletedAt> = None;
        let mut completed_languages: Option<Vec<String>> = None;
        let mut solutions: Option<Option<Vec<Solution>>> = None;
        let mut extra = Map::new();
        let mut key_order = Vec::new();

        while let Some(key) = map.next_key::<String>()? {
            let first_seen: Result<bool, A::Error> = match key.as_str() {
                "id" => fill(&mut id, "id", map.next_value()?),
                "name" => fill(&mut name, "name", map.next_value()?),
                "completedAt" => fill(&mut completed_at, "completedAt", map.next_value()?),
                "completedLanguages" => fill(
                    &mut completed_languages,
                    "completedLanguages",
                    map.next_value()?,
                ),
                "solutions" => fill(&mut solutions, "solutions", map.next_value()?),
                _ => {
                    let value: Value = map.next_value()?;
                    Ok(extra.insert(key.clone(), value).is_none())
                }
            };
            if first_seen? {
                key_order.push(key);
            }
        }

        Ok(ChallengeRecord {
            id: id.ok_or_else(|| missing::<A::Error>("id"))?,
            name: name.ok_or_else(|| missing::<A::Error>("name"))?,
            completed_at: completed_at.ok_or_else(|| missing::<A::Error>("completedAt"))?,
            completed_languages: completed_languages.unwrap_or_default(),
            solutions: solutions.flatten(),
            extra,
            key_order,
        })
    }
}

fn missing<E: de::Error>(field: &'static str) -> E {
    E::missing_field(field)
}

fn fill<T, E: de::Error>(slot: &mut Option<T>, field: &'static str, value: T) -> Result<bool, E> {
    if slot.replace(value).is_some() {
        Err(E::duplicate_field(field))
    } else {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;

    const CATALOG_ITEM: &str = r#"{
        "id": "514b92a657cdc65150000006",
        "name": "Multiples of 3 or 5",
        "slug": "multiples-of-3-or-5",
        "completedAt": "2024-03-01T10:15:30.000Z",
        "completedLanguages": ["ruby", "javascript"]
    }"#;

    #[test]
    fn parses_catalog_item() {
        let record: ChallengeRecord = serde_json::from_str(CATALOG_ITEM).unwrap();
        assert_eq!(record.id.as_str(), "514b92a657cdc65150000006");
        assert_eq!(record.name, "Multiples of 3 or 5");
        assert_eq!(record.completed_at.as_str(), "2024-03-01T10:15:30.000Z");
        assert_eq!(
            record.completed_at.timestamp(),
            Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 30).unwrap()
        );
        assert_eq!(record.completed_languages, vec!["ruby", "javascript"]);
        assert!(record.solutions.is_none());
        assert_eq!(
            record.extra.get("slug").and_then(|v| v.as_str()),
            Some("multiples-of-3-or-5")
        );
    }

    #[test]
    fn unscraped_record_omits_solutions_key() {
        let record: ChallengeRecord = serde_json::from_str(CATALOG_ITEM).unwrap();
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("solutions").is_none());
        assert_eq!(value["slug"], "multiples-of-3-or-5");
        assert_eq!(value["completedLanguages"][1], "javascript");
    }

    #[test]
    fn attached_solutions_serialize_with_stored_field_names() {
        let mut record: ChallengeRecord = serde_json::from_str(CATALOG_ITEM).unwrap();
        record.attach_solutions(vec![Solution {
            language: "ruby".into(),
            code: "def solution(n) end".into(),
            description: "Sum the multiples.".into(),
        }]);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value["solutions"],
            serde_json::json!([{
                "language": "ruby",
                "code": "def solution(n) end",
                "description": "Sum the multiples."
            }])
        );
        assert_eq!(record.solution_count(), 1);
    }

    #[test]
    fn empty_scrape_is_distinct_from_unscraped() {
        let mut record: ChallengeRecord = serde_json::from_str(CATALOG_ITEM).unwrap();
        record.attach_solutions(Vec::new());
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["solutions"], serde_json::json!([]));
        assert_eq!(record.solution_count(), 0);
    }

    #[test]
    fn missing_languages_default_to_empty() {
        let json = r#"{"id":"a","name":"A","completedAt":"2024-01-01T00:00:00Z"}"#;
        let record: ChallengeRecord = serde_json::from_str(json).unwrap();
        assert!(record.completed_languages.is_empty());
    }

    #[test]
    fn reserializes_in_source_key_order() {
        let json = concat!(
            r#"{"slug":"sum","id":"a","completedLanguages":["ruby"],"name":"Sum","#,
            r#""completedAt":"2024-01-01T00:00:00.000Z","rank":3}"#
        );
        let record: ChallengeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(serde_json::to_string(&record).unwrap(), json);
    }

    #[test]
    fn attached_solutions_are_written_last() {
        let mut record: ChallengeRecord = serde_json::from_str(CATALOG_ITEM).unwrap();
        record.attach_solutions(Vec::new());
        let text = serde_json::to_string(&record).unwrap();
        assert_eq!(
            text,
            concat!(
                r#"{"id":"514b92a657cdc65150000006","name":"Multiples of 3 or 5","#,
                r#""slug":"multiples-of-3-or-5","completedAt":"2024-03-01T10:15:30.000Z","#,
                r#""completedLanguages":["ruby","javascript"],"solutions":[]}"#
            )
        );
    }

    #[test]
    fn built_record_uses_canonical_order() {
        let record = ChallengeRecord::new(
            "a",
            "A",
            Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
            vec!["rust".into()],
        );
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            concat!(
                r#"{"id":"a","name":"A","completedAt":"2024-01-02T03:04:05.000Z","#,
                r#""completedLanguages":["rust"]}"#
            )
        );
    }

    #[test]
    fn equality_ignores_key_order() {
        let a: ChallengeRecord =
            serde_json::from_str(r#"{"id":"a","name":"A","completedAt":"2024-01-01T00:00:00Z"}"#)
                .unwrap();
        let b: ChallengeRecord =
            serde_json::from_str(r#"{"name":"A","completedAt":"2024-01-01T00:00:00Z","id":"a"}"#)
                .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn duplicate_interpreted_key_is_rejected() {
        let json = r#"{"id":"a","id":"b","name":"A","completedAt":"2024-01-01T00:00:00Z"}"#;
        assert!(serde_json::from_str::<ChallengeRecord>(json).is_err());
    }

    #[test]
    fn missing_completed_at_is_rejected() {
        let err = serde_json::from_str::<ChallengeRecord>(r#"{"id":"a","name":"A"}"#).unwrap_err();
        assert!(err.to_string().contains("completedAt"));
    }
}
