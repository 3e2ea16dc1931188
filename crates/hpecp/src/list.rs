//! Ordered, kind-filtered collections of resources.

use std::cmp::Ordering;
use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::{ApiError, Result};
use crate::resource::{Field, Resource, ResourceKind};

/// Which columns a list renders.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ColumnSelection {
    /// The kind's default display fields.
    #[default]
    Default,
    /// Every field.
    Wide,
    /// Named columns, in the given order.
    Explicit(Vec<String>),
}

impl ColumnSelection {
    /// Parses `DEFAULT`, `WIDE` or a comma-separated column list.
    #[must_use]
    pub fn parse(spec: &str) -> Self {
        match spec.trim() {
            "" | "DEFAULT" => Self::Default,
            "WIDE" => Self::Wide,
            list => Self::Explicit(
                list.split(',')
                    .map(|column| column.trim().to_string())
                    .filter(|column| !column.is_empty())
                    .collect(),
            ),
        }
    }

    /// Resolves the selection against a kind's field table.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] naming the first unknown column.
    pub fn resolve<K: ResourceKind>(&self) -> Result<Vec<&'static Field>> {
        let names: Vec<&str> = match self {
            Self::Default => K::DEFAULT_DISPLAY_FIELDS.to_vec(),
            Self::Wide => return Ok(K::FIELDS.iter().collect()),
            Self::Explicit(columns) => columns.iter().map(String::as_str).collect(),
        };
        names
            .into_iter()
            .map(|name| {
                K::field(name)
                    .ok_or_else(|| ApiError::validation(format!("Unknown column '{name}'.")))
            })
            .collect()
    }
}

impl fmt::Display for ColumnSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("DEFAULT"),
            Self::Wide => f.write_str("WIDE"),
            Self::Explicit(columns) => f.write_str(&columns.join(",")),
        }
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Tail<'a> {
    Number(u64),
    Text(&'a str),
}

/// Sort key for ids: the parent path, then the last segment compared
/// numerically when it is a number, then the full id.
fn id_key(id: &str) -> (&str, Tail<'_>, &str) {
    let (prefix, last) = id.rsplit_once('/').unwrap_or(("", id));
    let tail = last.parse().map_or(Tail::Text(last), Tail::Number);
    (prefix, tail, id)
}

/// Orders ids so `/api/v1/workers/9` sorts before `/api/v1/workers/10`.
#[must_use]
pub fn compare_ids(a: &str, b: &str) -> Ordering {
    id_key(a).cmp(&id_key(b))
}

/// Resources of one kind, sorted by id, with a column selection attached.
pub struct ResourceList<K: ResourceKind> {
    resources: Vec<Resource<K>>,
    columns: Vec<&'static Field>,
}

impl<K: ResourceKind> ResourceList<K> {
    /// Builds a list from a `{"_embedded": {<key>: [...]}}` envelope.
    ///
    /// A missing `_embedded` object or key is an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Protocol`] if the records are not an array or a
    /// record has no self link.
    pub fn from_envelope(envelope: &Value) -> Result<Self> {
        let records = match envelope.get("_embedded").and_then(|e| e.get(K::LIST_KEY)) {
            None | Some(Value::Null) => &[][..],
            Some(Value::Array(records)) => records.as_slice(),
            Some(_) => {
                return Err(ApiError::protocol(format!(
                    "_embedded.{} is not an array",
                    K::LIST_KEY
                )));
            }
        };
        Self::from_records(records.iter().cloned())
    }

    /// Builds a list from bare records, dropping those of another kind.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Protocol`] if a record has no self link.
    pub fn from_records(records: impl IntoIterator<Item = Value>) -> Result<Self> {
        let mut resources = records
            .into_iter()
            .filter(K::matches)
            .map(Resource::from_json)
            .collect::<Result<Vec<_>>>()?;
        resources.sort_by(|a, b| compare_ids(a.id(), b.id()));

        Ok(Self {
            resources,
            columns: K::DEFAULT_DISPLAY_FIELDS
                .iter()
                .filter_map(|name| K::field(name))
                .collect(),
        })
    }

    /// Replaces the column selection.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for unknown columns, leaving the
    /// current selection unchanged.
    pub fn select_columns(&mut self, selection: &ColumnSelection) -> Result<()> {
        self.columns = selection.resolve::<K>()?;
        Ok(())
    }

    /// Builder form of [`ResourceList::select_columns`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for unknown columns.
    pub fn with_columns(mut self, selection: &ColumnSelection) -> Result<Self> {
        self.select_columns(selection)?;
        Ok(self)
    }

    /// Names of the selected columns.
    #[must_use]
    pub fn columns(&self) -> Vec<&'static str> {
        self.columns.iter().map(|field| field.name).collect()
    }

    /// Selected column values, one row per resource.
    #[must_use]
    pub fn rows(&self) -> Vec<Vec<Value>> {
        self.resources
            .iter()
            .map(|resource| {
                self.columns
                    .iter()
                    .map(|field| field.extract(resource.json()))
                    .collect()
            })
            .collect()
    }

    /// The records as a JSON array, in list order.
    #[must_use]
    pub fn json(&self) -> Value {
        Value::Array(self.resources.iter().map(|r| r.json().clone()).collect())
    }

    /// Number of resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// True when the list holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Resource at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Resource<K>> {
        self.resources.get(index)
    }

    /// Iterates in id order.
    pub fn iter(&self) -> std::slice::Iter<'_, Resource<K>> {
        self.resources.iter()
    }

    /// Ids in list order.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.resources.iter().map(Resource::id).collect()
    }
}

impl<K: ResourceKind> Clone for ResourceList<K> {
    fn clone(&self) -> Self {
        Self {
            resources: self.resources.clone(),
            columns: self.columns.clone(),
        }
    }
}

impl<K: ResourceKind> fmt::Debug for ResourceList<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceList")
            .field("kind", &K::NAME)
            .field("ids", &self.ids())
            .field("columns", &self.columns())
            .finish()
    }
}

impl<'a, K: ResourceKind> IntoIterator for &'a ResourceList<K> {
    type Item = &'a Resource<K>;
    type IntoIter = std::slice::Iter<'a, Resource<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.iter()
    }
}

impl<K: ResourceKind> Serialize for ResourceList<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.resources.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::tests::{Widget, widget};
    use proptest::prelude::*;
    use serde_json::json;
    use test_case::test_case;

    fn envelope(records: Vec<Value>) -> Value {
        json!({"_embedded": {"widgets": records}})
    }

    #[test]
    fn sorts_numerically_within_a_collection() {
        let list = ResourceList::<Widget>::from_envelope(&envelope(vec![
            widget(10, "ready"),
            widget(9, "ready"),
            widget(100, "error"),
        ]))
        .expect("list");

        assert_eq!(
            list.ids(),
            vec!["/api/v1/widget/9", "/api/v1/widget/10", "/api/v1/widget/100"]
        );
    }

    #[test]
    fn missing_embedded_is_empty() {
        let list = ResourceList::<Widget>::from_envelope(&json!({})).expect("list");
        assert!(list.is_empty());

        let list = ResourceList::<Widget>::from_envelope(&json!({"_embedded": {}})).expect("list");
        assert!(list.is_empty());
    }

    #[test]
    fn non_array_records_are_protocol_error() {
        let err = ResourceList::<Widget>::from_envelope(&json!({"_embedded": {"widgets": 3}}))
            .unwrap_err();
        assert!(matches!(err, ApiError::Protocol(_)));
    }

    #[test]
    fn records_of_other_kinds_are_dropped() {
        let mut other = widget(2, "ready");
        other["purpose"] = json!("k8s");
        let list = ResourceList::<Widget>::from_envelope(&envelope(vec![widget(1, "ready"), other]))
            .expect("list");
        assert_eq!(list.ids(), vec!["/api/v1/widget/1"]);
    }

    #[test]
    fn default_columns_then_explicit() {
        let list = ResourceList::<Widget>::from_envelope(&envelope(vec![widget(1, "ready")]))
            .expect("list");
        assert_eq!(list.columns(), vec!["id", "name", "status"]);
        assert_eq!(
            list.rows(),
            vec![vec![json!("/api/v1/widget/1"), json!("w1"), json!("ready")]]
        );

        let list = list
            .with_columns(&ColumnSelection::parse("status,id"))
            .expect("columns");
        assert_eq!(list.rows(), vec![vec![json!("ready"), json!("/api/v1/widget/1")]]);
    }

    #[test]
    fn wide_selects_every_field() {
        let list = ResourceList::<Widget>::from_records(vec![widget(1, "ready")])
            .expect("list")
            .with_columns(&ColumnSelection::Wide)
            .expect("wide");
        assert_eq!(list.columns().len(), Widget::FIELDS.len());
    }

    #[test]
    fn unknown_column_leaves_selection_unchanged() {
        let mut list = ResourceList::<Widget>::from_records(vec![widget(1, "ready")]).expect("list");
        let err = list
            .select_columns(&ColumnSelection::parse("id,colour"))
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown column 'colour'.");
        assert_eq!(list.columns(), vec!["id", "name", "status"]);
    }

    #[test_case("DEFAULT", ColumnSelection::Default ; "default keyword")]
    #[test_case("", ColumnSelection::Default ; "blank")]
    #[test_case("WIDE", ColumnSelection::Wide ; "wide keyword")]
    #[test_case("id, name", ColumnSelection::Explicit(vec!["id".into(), "name".into()]) ; "list")]
    fn parses_column_selection(spec: &str, expected: ColumnSelection) {
        assert_eq!(ColumnSelection::parse(spec), expected);
    }

    #[test]
    fn json_is_the_filtered_records_in_order() {
        let list = ResourceList::<Widget>::from_records(vec![widget(2, "ready"), widget(1, "error")])
            .expect("list");
        let json = list.json();
        assert_eq!(json[0]["status"], "error");
        assert_eq!(json[1]["status"], "ready");
        assert_eq!(serde_json::to_value(&list).expect("serialize"), json);
    }

    #[test]
    fn compare_ids_falls_back_to_text() {
        assert_eq!(compare_ids("/a/9", "/a/10"), Ordering::Less);
        assert_eq!(compare_ids("/a/x", "/a/10"), Ordering::Greater);
        assert_eq!(compare_ids("/a/10", "/b/9"), Ordering::Less);
    }

    proptest! {
        #[test]
        fn list_is_sorted_regardless_of_input_order(mut ids in prop::collection::hash_set(0u32..5000, 0..40)
            .prop_map(|set| set.into_iter().collect::<Vec<_>>())
        ) {
            let records: Vec<Value> = ids.iter().map(|n| widget(*n, "ready")).collect();
            let list = ResourceList::<Widget>::from_records(records).expect("list");

            ids.sort_unstable();
            let expected: Vec<String> = ids.iter().map(|n| format!("/api/v1/widget/{n}")).collect();
            prop_assert_eq!(list.ids(), expected);
        }
    }
}
