//! Field specs and the plain/relation splitter

use super::relation::RelationDescriptor;

/// One requested field
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Plain(String),
    Relation(RelationDescriptor),
}

impl Field {
    /// Name of the field on the model being read
    pub fn name(&self) -> &str {
        match self {
            Self::Plain(name) => name,
            Self::Relation(relation) => relation.field_name(),
        }
    }
}

impl From<&str> for Field {
    fn from(name: &str) -> Self {
        Self::Plain(name.to_string())
    }
}

impl From<String> for Field {
    fn from(name: String) -> Self {
        Self::Plain(name)
    }
}

impl From<RelationDescriptor> for Field {
    fn from(relation: RelationDescriptor) -> Self {
        Self::Relation(relation)
    }
}

/// Ordered list of requested fields; duplicates are allowed
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldSpec(Vec<Field>);

impl FieldSpec {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.0.push(Field::Plain(name.into()));
        self
    }

    pub fn relation(mut self, relation: RelationDescriptor) -> Self {
        self.0.push(Field::Relation(relation));
        self
    }

    pub fn push(&mut self, field: impl Into<Field>) {
        self.0.push(field.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.0.iter()
    }

    pub fn has_relations(&self) -> bool {
        self.0.iter().any(|f| matches!(f, Field::Relation(_)))
    }

    pub fn split(self) -> SplitFields {
        split(self)
    }
}

impl FromIterator<Field> for FieldSpec {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<Field>> for FieldSpec {
    fn from(fields: Vec<Field>) -> Self {
        Self(fields)
    }
}

impl From<Vec<&str>> for FieldSpec {
    fn from(names: Vec<&str>) -> Self {
        names.into_iter().map(Field::from).collect()
    }
}

impl From<Vec<String>> for FieldSpec {
    fn from(names: Vec<String>) -> Self {
        names.into_iter().map(Field::from).collect()
    }
}

impl<const N: usize> From<[&str; N]> for FieldSpec {
    fn from(names: [&str; N]) -> Self {
        names.into_iter().map(Field::from).collect()
    }
}

/// Result of [`split`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SplitFields {
    /// Names to send to the backend, in request order
    pub plain: Vec<String>,
    /// Relations to expand after the primary fetch, in request order
    pub relations: Vec<RelationDescriptor>,
}

/// Separate a spec into backend field names and relation descriptors
///
/// Each relation leaves its own `field_name` in place so the primary fetch
/// returns the foreign ids the expander needs.
pub fn split(spec: FieldSpec) -> SplitFields {
    let mut split = SplitFields { plain: Vec::with_capacity(spec.len()), relations: Vec::new() };

    for field in spec.0 {
        match field {
            Field::Plain(name) => split.plain.push(name),
            Field::Relation(relation) => {
                split.plain.push(relation.field_name().to_string());
                split.relations.push(relation);
            }
        }
    }

    split
}
