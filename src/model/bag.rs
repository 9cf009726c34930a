//! Bag: the ordered property record carried by every element.

use hashbrown::HashMap;

use super::Value;

/// Whether a member belongs to the record's declared shape or was attached
/// ad hoc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Declared,
    Dynamic,
}

#[derive(Debug, Clone, PartialEq)]
struct Member {
    key: String,
    kind: MemberKind,
    value: Value,
}

/// Ordered, key-unique mapping from property name to [`Value`].
///
/// Overwriting a key keeps its position and member kind. New keys are
/// appended as dynamic members unless inserted with [`Bag::insert_declared`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bag {
    members: Vec<Member>,
    /// key → position in `members`
    index: HashMap<String, usize>,
}

impl Bag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn with_declared(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert_declared(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.position(key).map(|i| &self.members[i].value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.position(key).map(|i| &mut self.members[i].value)
    }

    /// String value at `key`, if that is what it holds.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn kind_of(&self, key: &str) -> Option<MemberKind> {
        self.position(key).map(|i| self.members[i].kind)
    }

    /// Upsert. Returns the previous value when the key existed.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.upsert(key.into(), value.into(), MemberKind::Dynamic)
    }

    /// Upsert as a declared member. An existing key is promoted to declared.
    pub fn insert_declared(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Option<Value> {
        let key = key.into();
        let prev = self.upsert(key.clone(), value.into(), MemberKind::Declared);
        if let Some(i) = self.position(&key) {
            self.members[i].kind = MemberKind::Declared;
        }
        prev
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let i = self.index.remove(key)?;
        let removed = self.members.remove(i);
        for (pos, member) in self.members.iter().enumerate().skip(i) {
            self.index.insert(member.key.clone(), pos);
        }
        Some(removed.value)
    }

    /// All members in order, declared and dynamic alike.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.members.iter().map(|m| (m.key.as_str(), &m.value))
    }

    pub fn declared(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.members_of(MemberKind::Declared)
    }

    pub fn dynamic(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.members_of(MemberKind::Dynamic)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    fn members_of(&self, kind: MemberKind) -> impl Iterator<Item = (&str, &Value)> {
        self.members
            .iter()
            .filter(move |m| m.kind == kind)
            .map(|m| (m.key.as_str(), &m.value))
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    fn upsert(&mut self, key: String, value: Value, kind: MemberKind) -> Option<Value> {
        match self.position(&key) {
            Some(i) => Some(std::mem::replace(&mut self.members[i].value, value)),
            None => {
                self.index.insert(key.clone(), self.members.len());
                self.members.push(Member { key, kind, value });
                None
            }
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Bag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = Bag::new();
        for (k, v) in iter {
            bag.insert(k, v);
        }
        bag
    }
}
