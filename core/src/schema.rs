//! Per-model metadata and the registry that derives it from model definitions.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::{Arc, LazyLock};

use indexmap::IndexMap;
use regex::Regex;

use crate::error::{Result, RowmapError};
use crate::field::{Field, FieldType};
use crate::rowmap_trace_schema;

/// Name of the primary key column every model carries.
pub const PRIMARY_KEY: &str = "id";

static NON_LETTERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^a-z]+").expect("static pattern is valid"));

/// Table name for a model name: lower-cased, runs of non-letters collapsed to `_`.
pub fn table_name(model_name: &str) -> String {
    NON_LETTERS
        .replace_all(&model_name.to_lowercase(), "_")
        .into_owned()
}

/// Immutable metadata of one model, built once by [`Registry::define`].
#[derive(Debug)]
pub struct Schema {
    name: String,
    table: String,
    fields: IndexMap<String, Field>,
    primary_key: usize,
}

impl Schema {
    /// Model name as declared
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    pub fn primary_key(&self) -> &Field {
        &self.fields[self.primary_key]
    }

    /// Resolves a column name, or the relation name of a foreign key (`blog` for `blog_id`).
    pub fn field_by_name(&self, name: &str) -> Result<&Field> {
        self.fields
            .get(name)
            .or_else(|| {
                self.fields
                    .values()
                    .find(|field| field.relation().is_some_and(|rel| rel.name == name))
            })
            .ok_or_else(|| RowmapError::unknown_field(&self.name, name))
    }

    pub fn contains_column(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }

    pub(crate) fn column(&self, column: &str) -> Option<&Field> {
        self.fields.get(column)
    }

    /// The foreign key on this model pointing at `other`.
    pub fn relation_to(&self, other: &Schema) -> Option<&Field> {
        self.fields
            .values()
            .find(|field| field.references().is_some_and(|to| to.table() == other.table))
    }

    /// The foreign key on `other` pointing back at this model.
    pub fn relation_from<'o>(&self, other: &'o Schema) -> Option<&'o Field> {
        other.relation_to(self)
    }

    pub fn has_relation_with(&self, other: &Schema) -> bool {
        self.relation_to(other).is_some() || self.relation_from(other).is_some()
    }

    pub fn create_table_sql(&self) -> String {
        let columns = self
            .fields
            .values()
            .map(Field::definition)
            .collect::<Vec<_>>()
            .join(", ");
        format!("CREATE TABLE {} ({columns});", self.table)
    }

    pub fn drop_table_sql(&self) -> String {
        format!("DROP TABLE {};", self.table)
    }
}

/// Shared handle to a registered model's [`Schema`].
///
/// Handles compare equal when they name the same table.
#[derive(Clone)]
pub struct Model(Arc<Schema>);

impl Deref for Model {
    type Target = Schema;

    fn deref(&self) -> &Schema {
        &self.0
    }
}

impl PartialEq for Model {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.table == other.table
    }
}

impl Eq for Model {}

impl Hash for Model {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.table.hash(state);
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Model").field(&self.name).finish()
    }
}

/// Declarative description of a model, consumed by [`Registry::define`].
#[derive(Clone, Debug)]
pub struct ModelDef {
    name: String,
    fields: Vec<(String, FieldType)>,
}

impl ModelDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Declares an attribute. Foreign keys become `<name>_id` columns.
    pub fn field(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.fields.push((name.into(), ty));
        self
    }
}

/// A has-many accessor registered on a referenced model.
#[derive(Clone, Debug)]
pub struct ReverseRelation {
    /// Accessor name, e.g. `entry_set`
    pub name: String,
    /// Model owning the foreign key
    pub model: Model,
    /// Foreign key column on `model`
    pub column: String,
}

/// Every model defined for one database, with the reverse relations between them.
#[derive(Debug, Default)]
pub struct Registry {
    models: IndexMap<String, Model>,
    reverse: IndexMap<(String, String), ReverseRelation>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the schema for `def`, synthesizing an `id` primary key when none is declared.
    pub fn define(&mut self, def: ModelDef) -> Result<Model> {
        let table = table_name(&def.name);
        if self.models.contains_key(&table) {
            return Err(RowmapError::Schema(format!(
                "a model stored in `{table}` is already defined"
            )));
        }

        let mut fields: IndexMap<String, Field> = IndexMap::new();
        let mut primary_key = None;

        for (declared, ty) in def.fields {
            if let FieldType::ForeignKey { to } = &ty
                && self.models.get(to.table()) != Some(to)
            {
                return Err(RowmapError::Schema(format!(
                    "`{}.{declared}` references `{}`, which is not defined in this registry",
                    def.name,
                    to.name()
                )));
            }

            let field = Field::register(&declared, ty, &table);
            if field.is_primary_key() {
                if field.name() != PRIMARY_KEY || primary_key.is_some() {
                    return Err(RowmapError::Schema(format!(
                        "`{}` must have exactly one primary key, named `{PRIMARY_KEY}`",
                        def.name
                    )));
                }
                primary_key = Some(fields.len());
            }

            if fields.contains_key(field.name()) {
                return Err(RowmapError::Schema(format!(
                    "`{}` declares column `{}` more than once",
                    def.name,
                    field.name()
                )));
            }
            fields.insert(field.name().to_string(), field);
        }

        let primary_key = match primary_key {
            Some(index) => index,
            None => {
                if fields.contains_key(PRIMARY_KEY) {
                    return Err(RowmapError::Schema(format!(
                        "`{}.{PRIMARY_KEY}` is reserved for the primary key",
                        def.name
                    )));
                }
                let id = Field::register(PRIMARY_KEY, FieldType::PrimaryKey, &table);
                fields.shift_insert(0, PRIMARY_KEY.to_string(), id);
                0
            }
        };

        let mut reverse = Vec::new();
        for field in fields.values() {
            if let (Some(to), Some(relation)) = (field.references(), field.relation()) {
                let key = (to.table().to_string(), relation.related_name.clone());
                if self.reverse.contains_key(&key) {
                    return Err(RowmapError::Schema(format!(
                        "`{}` already has a reverse relation named `{}`",
                        to.name(),
                        relation.related_name
                    )));
                }
                reverse.push((key, field.name().to_string()));
            }
        }

        let model = Model(Arc::new(Schema {
            name: def.name,
            table: table.clone(),
            fields,
            primary_key,
        }));

        for (key, column) in reverse {
            let relation = ReverseRelation {
                name: key.1.clone(),
                model: model.clone(),
                column,
            };
            self.reverse.insert(key, relation);
        }

        rowmap_trace_schema!("define", table);
        self.models.insert(table, model.clone());
        Ok(model)
    }

    /// Looks a model up by declared name or table name.
    pub fn model(&self, name: &str) -> Option<&Model> {
        self.models
            .get(name)
            .or_else(|| self.models.values().find(|model| model.name() == name))
    }

    pub fn models(&self) -> impl DoubleEndedIterator<Item = &Model> {
        self.models.values()
    }

    /// The has-many accessor `name` registered on `model`.
    pub fn reverse_relation(&self, model: &Model, name: &str) -> Option<&ReverseRelation> {
        self.reverse
            .get(&(model.table().to_string(), name.to_string()))
    }

    /// All has-many accessors registered on `model`.
    pub fn reverse_relations<'r>(
        &'r self,
        model: &'r Model,
    ) -> impl Iterator<Item = &'r ReverseRelation> + 'r {
        self.reverse
            .iter()
            .filter(move |((table, _), _)| table == model.table())
            .map(|(_, relation)| relation)
    }
}
