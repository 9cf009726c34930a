//! Well-known keys, type names and key rules of the element export format.

/// Reserved key holding the declared type chain of a record.
pub const SPECKLE_TYPE: &str = "speckle_type";
/// Derived key recording the resolved semantic type of a node.
pub const EFFECTIVE_SPECKLE_TYPE: &str = "effective_speckle_type";
/// Relation from an instance to its shared definition.
pub const DEFINITION: &str = "definition";
pub const PARAMETERS: &str = "parameters";
/// Display name of a named parameter.
pub const PARAMETER_NAME: &str = "name";

pub const ID: &str = "id";
pub const APPLICATION_ID: &str = "applicationId";
pub const REFERENCED_ID: &str = "referencedId";
pub const ELEMENT_ID: &str = "elementId";
pub const TOTAL_CHILDREN_COUNT: &str = "totalChildrenCount";
pub const MATERIAL_QUANTITIES: &str = "materialQuantities";

pub const IDENTITY_KEYS: [&str; 4] = [ID, APPLICATION_ID, REFERENCED_ID, ELEMENT_ID];
pub const BOOKKEEPING_KEYS: [&str; 3] = [SPECKLE_TYPE, TOTAL_CHILDREN_COUNT, MATERIAL_QUANTITIES];

/// Child-relation keys used when no alias list is configured.
pub const DEFAULT_ELEMENT_ALIASES: [&str; 2] = ["elements", "@elements"];

pub const COLLECTION_TYPE: &str = "Speckle.Core.Models.Collection";
pub const REVIT_INSTANCE_TYPE: &str = "Objects.Other.Revit.RevitInstance";
pub const PARAMETER_TYPE: &str = "Objects.BuiltElements.Revit.Parameter";

const BASE_MEMBERS: [&str; 4] = [ID, APPLICATION_ID, SPECKLE_TYPE, TOTAL_CHILDREN_COUNT];

const PARAMETER_MEMBERS: [&str; 8] = [
    "name",
    "value",
    "units",
    "isShared",
    "isReadOnly",
    "isTypeParameter",
    "applicationUnitType",
    "applicationInternalName",
];

const REVIT_INSTANCE_MEMBERS: [&str; 6] = [
    DEFINITION,
    "transform",
    "level",
    "facingFlipped",
    "handFlipped",
    "mirrored",
];

const DISALLOWED_KEY_CHARS: [char; 2] = ['.', '/'];

/// Whether a `:`-separated type chain contains `name` as one of its links.
pub fn type_chain_contains(speckle_type: &str, name: &str) -> bool {
    speckle_type.split(':').any(|link| link == name)
}

/// Whether `key` is a declared member of records whose type chain is
/// `speckle_type`.
pub fn is_declared_member(speckle_type: Option<&str>, key: &str) -> bool {
    if BASE_MEMBERS.contains(&key) {
        return true;
    }
    let Some(ty) = speckle_type else { return false };
    (type_chain_contains(ty, PARAMETER_TYPE) && PARAMETER_MEMBERS.contains(&key))
        || (type_chain_contains(ty, REVIT_INSTANCE_TYPE) && REVIT_INSTANCE_MEMBERS.contains(&key))
}

/// A key is valid when it is non-blank, does not start with `@@`, and holds
/// none of the disallowed characters.
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty() && !key.starts_with("@@") && !key.contains(DISALLOWED_KEY_CHARS)
}

/// Strip disallowed characters from a display name so it can be used as a key.
pub fn sanitize_key(name: &str) -> String {
    name.chars().filter(|c| !DISALLOWED_KEY_CHARS.contains(c)).collect()
}
