use super::{Field, RandomIdRecord, Record, SlugRecord, Value};
use crate::services::random_id::ID_FIELD_LENGTH;
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Organization {
    pub id: Option<String>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    #[serde(skip)]
    persisted_slug: Option<String>,
}

impl Organization {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = slug.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub(crate) fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        let slug: String = row.get(2)?;
        Ok(Self {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            persisted_slug: Some(slug.clone()),
            slug,
            description: row.get(3)?,
        })
    }
}

impl Record for Organization {
    const TABLE: &'static str = "organizations";
    const FIELDS: &'static [Field] = &[
        Field::char("id", ID_FIELD_LENGTH).blank(),
        Field::char("name", 100),
        Field::slug("slug", 50).blank(),
        Field::text("description").blank().null(),
    ];

    fn value(&self, field: &str) -> Value {
        match field {
            "id" => Value::Text(self.id.clone().unwrap_or_default()),
            "name" => Value::Text(self.name.clone()),
            "slug" => Value::Text(self.slug.clone()),
            "description" => self.description.clone().into(),
            _ => Value::Null,
        }
    }
}

impl RandomIdRecord for Organization {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: Option<String>) {
        self.id = id;
    }
}

impl SlugRecord for Organization {
    fn name(&self) -> &str {
        &self.name
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    fn set_slug(&mut self, slug: String) {
        self.slug = slug;
    }

    fn is_new(&self) -> bool {
        self.id.as_deref().map_or(true, str::is_empty)
    }

    fn persisted_slug(&self) -> Option<&str> {
        self.persisted_slug.as_deref()
    }

    fn mark_slug_persisted(&mut self) {
        self.persisted_slug = Some(self.slug.clone());
    }
}
