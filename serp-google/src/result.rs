//! Projection of the raw SerpApi response into the simplified result.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry from `organic_results`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganicResult {
    pub title: String,
    pub link: String,
    pub snippet: String,
}

/// What the tool emits on success.
///
/// Sections missing upstream are left out of the serialised output entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organic_results: Option<Vec<OrganicResult>>,
}

impl SearchResult {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.organic_results.is_none()
    }

    pub fn organic_count(&self) -> usize {
        self.organic_results.as_ref().map_or(0, Vec::len)
    }
}

fn string_field(obj: &Value, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Reshape a raw response. Total: never fails, whatever the input.
///
/// A present `knowledge_graph` contributes `title` and `description`; a present
/// `organic_results` contributes `{title, link, snippet}` per entry, in
/// upstream order. Any missing or non-string field becomes `""`.
///
/// ```
/// use serde_json::json;
/// use serp_google::result::project;
///
/// let raw = json!({"organic_results": [{"title": "A", "link": "http://x", "snippet": "s"}]});
/// assert_eq!(serde_json::to_value(project(&raw)).unwrap(), raw);
/// assert!(project(&json!({"search_metadata": {}})).is_empty());
/// ```
pub fn project(raw: &Value) -> SearchResult {
    let mut result = SearchResult::default();

    if let Some(kg) = raw.get("knowledge_graph") {
        result.title = Some(string_field(kg, "title"));
        result.description = Some(string_field(kg, "description"));
    }

    if let Some(organic) = raw.get("organic_results") {
        let items = organic.as_array().map(Vec::as_slice).unwrap_or_default();
        result.organic_results = Some(
            items
                .iter()
                .map(|item| OrganicResult {
                    title: string_field(item, "title"),
                    link: string_field(item, "link"),
                    snippet: string_field(item, "snippet"),
                })
                .collect(),
        );
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_object_projects_to_empty_result() {
        let got = project(&json!({}));
        assert!(got.is_empty());
        assert_eq!(serde_json::to_value(&got).unwrap(), json!({}));
    }

    #[test]
    fn non_object_input_is_tolerated() {
        assert!(project(&json!([1, 2, 3])).is_empty());
        assert!(project(&json!("text")).is_empty());
        assert!(project(&Value::Null).is_empty());
    }

    #[test]
    fn organic_results_round_trip_in_order() {
        let raw = json!({"organic_results": [
            {"title": "A", "link": "http://x", "snippet": "s"},
            {"title": "B", "link": "http://y", "snippet": "t"},
            {"title": "C", "link": "http://z", "snippet": "u"}
        ]});
        let got = project(&raw);
        let titles: Vec<_> = got
            .organic_results
            .as_ref()
            .unwrap()
            .iter()
            .map(|r| r.title.as_str())
            .collect();
        assert_eq!(titles, ["A", "B", "C"]);
        assert_eq!(serde_json::to_value(&got).unwrap(), raw);
    }

    #[test]
    fn knowledge_graph_fields_default_to_empty() {
        let got = project(&json!({"knowledge_graph": {"title": "Rust"}}));
        assert_eq!(got.title.as_deref(), Some("Rust"));
        assert_eq!(got.description.as_deref(), Some(""));
        assert!(got.organic_results.is_none());
        assert_eq!(
            serde_json::to_value(&got).unwrap(),
            json!({"title": "Rust", "description": ""})
        );
    }

    #[test]
    fn organic_entries_with_missing_fields_get_empty_strings() {
        let got = project(&json!({"organic_results": [{"title": "only title"}, {"link": 7}, "junk"]}));
        let items = got.organic_results.unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].link, "");
        assert_eq!(items[0].snippet, "");
        assert_eq!(items[1].link, "");
        assert_eq!(items[2].title, "");
    }

    #[test]
    fn extra_upstream_sections_are_dropped() {
        let raw = json!({
            "search_metadata": {"id": "abc", "status": "Success"},
            "knowledge_graph": {"title": "T", "description": "D", "type": "Language"},
            "organic_results": [{"position": 1, "title": "A", "link": "L", "snippet": "S", "displayed_link": "l"}],
            "related_questions": []
        });
        assert_eq!(
            serde_json::to_value(project(&raw)).unwrap(),
            json!({
                "title": "T",
                "description": "D",
                "organic_results": [{"title": "A", "link": "L", "snippet": "S"}]
            })
        );
    }

    #[test]
    fn non_array_organic_results_yield_empty_list() {
        let got = project(&json!({"organic_results": null}));
        assert_eq!(got.organic_results, Some(vec![]));
        assert_eq!(got.organic_count(), 0);
    }
}
