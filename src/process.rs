//! Node processor: per-node transformation applied during flattening.
//!
//! Collections are dropped, instances absorb their shared definition, and
//! every surviving node is tagged with its effective type.

use std::borrow::Cow;

use tracing::{debug, warn};

use crate::merge::merge_property;
use crate::model::schema::{self, DEFINITION, EFFECTIVE_SPECKLE_TYPE, SPECKLE_TYPE};
use crate::model::{Bag, ElementGraph, Node, NodeKind, Value};
use crate::skip::SkipSet;
use crate::Result;

/// Process one node. `Ok(None)` means the node is dropped from the output.
///
/// `graph` is borrowed immutably: definitions are read, never written.
pub fn process_node(mut node: Node, graph: &ElementGraph, skip: &SkipSet) -> Result<Option<Node>> {
    match node.kind() {
        NodeKind::Collection => {
            debug!(speckle_type = node.speckle_type(), "dropping collection");
            Ok(None)
        }
        NodeKind::Instance => {
            match definition_of(&node, graph)? {
                Some(definition) => absorb_definition(&mut node.properties, &definition, skip)?,
                None => {
                    warn!(
                        id = node.properties.get_str(schema::ID),
                        "instance has no definition, treating as a plain element"
                    );
                    tag_effective_type(&mut node.properties);
                }
            }
            Ok(Some(node))
        }
        NodeKind::Generic => {
            tag_effective_type(&mut node.properties);
            Ok(Some(node))
        }
    }
}

/// The instance's definition: a handle into the arena, or an inline bag.
fn definition_of<'g>(node: &Node, graph: &'g ElementGraph) -> Result<Option<Cow<'g, Bag>>> {
    match node.get(DEFINITION) {
        Some(Value::Ref(id)) => Ok(Some(Cow::Borrowed(&graph.resolve(*id)?.properties))),
        Some(Value::Bag(bag)) => Ok(Some(Cow::Owned(bag.clone()))),
        _ => Ok(None),
    }
}

fn absorb_definition(instance: &mut Bag, definition: &Bag, skip: &SkipSet) -> Result<()> {
    if let Some(ty) = definition.get_str(SPECKLE_TYPE) {
        instance.insert(EFFECTIVE_SPECKLE_TYPE, ty);
    }

    let mut merged = 0usize;
    for (key, value) in definition.iter() {
        if skip.contains(key) || !schema::is_valid_key(key) {
            continue;
        }
        if instance.contains_key(key) {
            merge_property(instance, key, value, skip)?;
            merged += 1;
        } else {
            instance.insert(key, value.clone());
        }
    }
    debug!(
        definition_type = definition.get_str(SPECKLE_TYPE),
        merged,
        "absorbed definition"
    );
    Ok(())
}

fn tag_effective_type(properties: &mut Bag) {
    if let Some(ty) = properties.get_str(SPECKLE_TYPE).map(str::to_owned) {
        properties.insert(EFFECTIVE_SPECKLE_TYPE, ty);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::schema::{COLLECTION_TYPE, REVIT_INSTANCE_TYPE};
    use crate::model::{List, ValueType};
    use crate::Error;
    use pretty_assertions::assert_eq;

    const WALL: &str = "Objects.BuiltElements.Wall:Objects.BuiltElements.Revit.RevitWall";
    const FAMILY: &str = "Objects.BuiltElements.Revit.RevitElementType";

    fn instance_of(definition: Value) -> Node {
        Node::typed(format!("Objects.Other.Instance:{REVIT_INSTANCE_TYPE}"))
            .with_property(schema::ID, "inst-1")
            .with_property(DEFINITION, definition)
    }

    #[test]
    fn test_generic_node_gets_effective_type() {
        let node = Node::typed(WALL).with_property("height", 3.0);
        let out = process_node(node, &ElementGraph::default(), &SkipSet::default())
            .unwrap()
            .unwrap();
        assert_eq!(out.properties.get_str(EFFECTIVE_SPECKLE_TYPE), Some(WALL));
        assert_eq!(out.get("height"), Some(&Value::Float(3.0)));
    }

    #[test]
    fn test_untyped_node_passes_through() {
        let node = Node::default().with_property("a", 1);
        let out = process_node(node.clone(), &ElementGraph::default(), &SkipSet::default())
            .unwrap();
        assert_eq!(out, Some(node));
    }

    #[test]
    fn test_collection_is_dropped() {
        let out = process_node(Node::typed(COLLECTION_TYPE), &ElementGraph::default(), &SkipSet::default())
            .unwrap();
        assert_eq!(out, None);
    }

    #[test]
    fn test_instance_absorbs_definition() {
        let mut graph = ElementGraph::default();
        let definition = Node::typed(FAMILY)
            .with_property(schema::ID, "def-1")
            .with_property("family", "Basic Door")
            .with_property("tags", List::of(ValueType::String, ["fire"]))
            .with_property("bad.key", "ignored")
            .with_property("elements", List::new(ValueType::Ref));
        let def_id = graph.add(definition.clone());

        let instance = instance_of(Value::Ref(def_id))
            .with_property("tags", List::of(ValueType::String, ["exterior"]))
            .with_property("mark", "D1");

        let out = process_node(instance, &graph, &SkipSet::default()).unwrap().unwrap();
        let props = &out.properties;

        assert_eq!(props.get_str(EFFECTIVE_SPECKLE_TYPE), Some(FAMILY));
        assert_eq!(props.get_str(schema::ID), Some("inst-1"));
        assert_eq!(props.get_str("family"), Some("Basic Door"));
        assert_eq!(props.get_str("mark"), Some("D1"));
        assert_eq!(
            props.get("tags"),
            Some(&Value::List(List::of(ValueType::String, ["exterior", "fire"]))),
        );
        assert!(!props.contains_key("bad.key"));
        assert!(!props.contains_key("elements"));
        assert!(props.get_str(SPECKLE_TYPE).is_some_and(|t| t.ends_with(REVIT_INSTANCE_TYPE)));

        // The shared definition is untouched
        assert_eq!(graph.get(def_id), Some(&definition));
    }

    #[test]
    fn test_inline_definition() {
        let instance = instance_of(Value::Bag(Bag::new().with("material", "Oak")));
        let out = process_node(instance, &ElementGraph::default(), &SkipSet::default())
            .unwrap()
            .unwrap();
        assert_eq!(out.properties.get_str("material"), Some("Oak"));
        assert!(!out.properties.contains_key(EFFECTIVE_SPECKLE_TYPE));
    }

    #[test]
    fn test_instance_without_definition_is_tagged_from_itself() {
        let instance = Node::typed(REVIT_INSTANCE_TYPE);
        let out = process_node(instance, &ElementGraph::default(), &SkipSet::default())
            .unwrap()
            .unwrap();
        assert_eq!(out.properties.get_str(EFFECTIVE_SPECKLE_TYPE), Some(REVIT_INSTANCE_TYPE));
    }

    #[test]
    fn test_dangling_definition_is_an_error() {
        let instance = instance_of(Value::Ref(crate::model::NodeId(42)));
        let err = process_node(instance, &ElementGraph::default(), &SkipSet::default()).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_merge_conflict_propagates() {
        let mut graph = ElementGraph::default();
        let def_id = graph.add(
            Node::typed(FAMILY).with_property("tags", List::of(ValueType::Any, [1])),
        );
        let instance = instance_of(Value::Ref(def_id))
            .with_property("tags", List::of(ValueType::String, ["a"]));

        let err = process_node(instance, &graph, &SkipSet::default()).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }
}
