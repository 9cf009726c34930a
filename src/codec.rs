//! JSON codec: snapshot documents in, flattened rows out.
//!
//! ```text
//! snapshot JSON → import() → ElementGraph (arena + refs)
//! rows          → export() → JSON objects, refs as reference stubs
//! ```
//!
//! Objects under a child-relation key or `definition` are detached into the
//! arena. Other objects stay inline: typed ones (carrying `speckle_type`)
//! become bags, untyped ones become maps.
//!
//! JSON carries no declared container types, so imported lists and maps are
//! `Any`-typed and accept every item on merge.

use serde_json::{Map as JsonMap, Number, Value as Json};

use crate::model::schema::{self, DEFINITION, ID, REFERENCED_ID, SPECKLE_TYPE};
use crate::model::{Bag, ElementGraph, List, Map, Node, NodeId, Value, ValueType};
use crate::{Error, Result};

/// `speckle_type` written on exported reference stubs.
pub const REFERENCE_TYPE: &str = "reference";

/// Build the arena for one snapshot. `element_aliases` names the keys that
/// hold child relations.
pub fn import(root: Json, element_aliases: &[String]) -> Result<ElementGraph> {
    let Json::Object(object) = root else {
        return Err(Error::Codec(format!(
            "snapshot root must be an object, got {}",
            json_kind(&root)
        )));
    };

    let mut importer = Importer { graph: ElementGraph::default(), element_aliases };
    let root = importer.detach(object);
    let mut graph = importer.graph;
    graph.set_root(root)?;
    Ok(graph)
}

/// Serialize rows for publishing.
pub fn export(graph: &ElementGraph, rows: &[Node]) -> Vec<Json> {
    rows.iter().map(|row| bag_to_json(graph, &row.properties)).collect()
}

struct Importer<'a> {
    graph: ElementGraph,
    element_aliases: &'a [String],
}

impl Importer<'_> {
    fn detach(&mut self, object: JsonMap<String, Json>) -> NodeId {
        let bag = self.bag(object);
        self.graph.add(Node::new(bag))
    }

    fn bag(&mut self, object: JsonMap<String, Json>) -> Bag {
        let speckle_type = object.get(SPECKLE_TYPE).and_then(Json::as_str).map(str::to_owned);
        let mut bag = Bag::new();
        for (key, json) in object {
            let value = if self.is_relation(&key) { self.relation(json) } else { self.value(json) };
            if schema::is_declared_member(speckle_type.as_deref(), &key) {
                bag.insert_declared(key, value);
            } else {
                bag.insert(key, value);
            }
        }
        bag
    }

    fn is_relation(&self, key: &str) -> bool {
        key == DEFINITION || self.element_aliases.iter().any(|alias| alias == key)
    }

    fn relation(&mut self, json: Json) -> Value {
        match json {
            Json::Object(object) => Value::Ref(self.detach(object)),
            Json::Array(items) => {
                let items: Vec<Value> = items
                    .into_iter()
                    .map(|item| match item {
                        Json::Object(object) => Value::Ref(self.detach(object)),
                        other => self.value(other),
                    })
                    .collect();
                untyped_list(items)
            }
            other => self.value(other),
        }
    }

    fn value(&mut self, json: Json) -> Value {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => number(&n),
            Json::String(s) => Value::String(s),
            Json::Array(items) => {
                let items = items.into_iter().map(|item| self.value(item)).collect();
                untyped_list(items)
            }
            Json::Object(object) if object.contains_key(SPECKLE_TYPE) => Value::Bag(self.bag(object)),
            Json::Object(object) => {
                let mut map = Map::new(ValueType::Any);
                for (key, json) in object {
                    let value = self.value(json);
                    map.upsert(key, value);
                }
                Value::Map(map)
            }
        }
    }
}

fn untyped_list(items: Vec<Value>) -> Value {
    Value::List(List { elem_type: ValueType::Any, items })
}

fn number(n: &Number) -> Value {
    match n.as_i64() {
        Some(i) => Value::Int(i),
        None => n.as_f64().map_or(Value::Null, Value::Float),
    }
}

fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

fn bag_to_json(graph: &ElementGraph, bag: &Bag) -> Json {
    Json::Object(bag.iter().map(|(k, v)| (k.to_owned(), value_to_json(graph, v))).collect())
}

fn value_to_json(graph: &ElementGraph, value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(i) => Json::from(*i),
        Value::Float(f) => Number::from_f64(*f).map_or(Json::Null, Json::Number),
        Value::String(s) => Json::String(s.clone()),
        Value::Bag(bag) => bag_to_json(graph, bag),
        Value::List(list) => Json::Array(list.items.iter().map(|v| value_to_json(graph, v)).collect()),
        Value::Map(map) => Json::Object(map.iter().map(|(k, v)| (k.to_owned(), value_to_json(graph, v))).collect()),
        Value::Ref(id) => reference_stub(graph, *id),
    }
}

/// Detached nodes are written as stubs pointing at the node's `id`, falling
/// back to the arena handle for nodes that carry none.
fn reference_stub(graph: &ElementGraph, id: NodeId) -> Json {
    let referenced = graph
        .get(id)
        .and_then(|node| node.properties.get_str(ID))
        .map_or_else(|| id.to_string(), str::to_owned);
    let mut stub = JsonMap::new();
    stub.insert(SPECKLE_TYPE.to_owned(), Json::from(REFERENCE_TYPE));
    stub.insert(REFERENCED_ID.to_owned(), Json::from(referenced));
    Json::Object(stub)
}
