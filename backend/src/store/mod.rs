//! # Template Store
//!
//! Persists template metadata and text elements in SQLite.
//!
//! Two tables back the model:
//! - `templates`: one row per template (`id`, `image_path`, `original_filename`).
//! - `text_elements`: one row per element, keyed by `(template_id, position)`.
//!   `position` preserves the element order that the compositor relies on.
//!
//! Elements have no lifecycle of their own. Updates replace the whole list,
//! and deletes remove the element rows before the template row, both inside a
//! single transaction.
//!
//! A connection is opened per operation, so a `TemplateStore` can be shared
//! freely between request handlers.

mod schema;

use common::model::template::{Template, TextElement};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("template not found: {0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

#[derive(Debug, Clone)]
pub struct TemplateStore {
    path: PathBuf,
}

impl TemplateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        let conn = Connection::open(&self.path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(conn)
    }

    /// Creates the tables if they do not exist yet.
    pub fn init(&self) -> Result<(), StoreError> {
        let conn = self.connect()?;
        conn.execute_batch(schema::CREATE_TABLES)?;
        Ok(())
    }

    /// Inserts a new template together with its elements.
    pub fn create(&self, template: &Template) -> Result<(), StoreError> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO templates (id, image_path, original_filename) VALUES (?1, ?2, ?3)",
            params![&template.id, &template.image_path, &template.original_filename],
        )?;
        insert_elements(&tx, &template.id, &template.elements)?;
        tx.commit()?;
        debug!("Created template {} ({} elements)", template.id, template.elements.len());
        Ok(())
    }

    pub fn fetch_by_id(&self, id: &str) -> Result<Template, StoreError> {
        let conn = self.connect()?;
        fetch_template(&conn, id)?.ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Every template, in insertion order.
    pub fn list_all(&self) -> Result<Vec<Template>, StoreError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, image_path, original_filename FROM templates ORDER BY rowid",
        )?;
        let headers = stmt
            .query_map([], |row| {
                Ok(Template {
                    id: row.get(0)?,
                    image_path: row.get(1)?,
                    original_filename: row.get(2)?,
                    elements: Vec::new(),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        headers
            .into_iter()
            .map(|mut template| {
                template.elements = load_elements(&conn, &template.id)?;
                Ok(template)
            })
            .collect()
    }

    /// Replaces the element list of an existing template.
    ///
    /// `id`, `image_path` and `original_filename` cannot change through an update.
    pub fn update_elements(&self, id: &str, elements: &[TextElement]) -> Result<Template, StoreError> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let mut template = fetch_template(&tx, id)?.ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        tx.execute("DELETE FROM text_elements WHERE template_id = ?1", params![id])?;
        insert_elements(&tx, id, elements)?;
        tx.commit()?;

        template.elements = elements.to_vec();
        debug!("Replaced elements of template {} ({} elements)", id, elements.len());
        Ok(template)
    }

    /// Removes a template and its elements, returning the deleted record so the
    /// caller can release the image it referenced.
    pub fn delete(&self, id: &str) -> Result<Template, StoreError> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let template = fetch_template(&tx, id)?.ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        tx.execute("DELETE FROM text_elements WHERE template_id = ?1", params![id])?;
        tx.execute("DELETE FROM templates WHERE id = ?1", params![id])?;
        tx.commit()?;
        debug!("Deleted template {}", id);
        Ok(template)
    }
}

fn fetch_template(conn: &Connection, id: &str) -> Result<Option<Template>, StoreError> {
    let header = conn
        .query_row(
            "SELECT id, image_path, original_filename FROM templates WHERE id = ?1",
            params![id],
            |row| {
                Ok(Template {
                    id: row.get(0)?,
                    image_path: row.get(1)?,
                    original_filename: row.get(2)?,
                    elements: Vec::new(),
                })
            },
        )
        .optional()?;

    match header {
        Some(mut template) => {
            template.elements = load_elements(conn, id)?;
            Ok(Some(template))
        }
        None => Ok(None),
    }
}

fn load_elements(conn: &Connection, template_id: &str) -> Result<Vec<TextElement>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT type, text, font_size, color, x, y FROM text_elements \
         WHERE template_id = ?1 ORDER BY position",
    )?;
    let elements = stmt
        .query_map(params![template_id], |row| {
            Ok(TextElement {
                element_type: row.get(0)?,
                text: row.get(1)?,
                font_size: row.get(2)?,
                color: row.get(3)?,
                x: row.get(4)?,
                y: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(elements)
}

fn insert_elements(tx: &Transaction<'_>, template_id: &str, elements: &[TextElement]) -> Result<(), StoreError> {
    let mut stmt = tx.prepare(
        "INSERT INTO text_elements (template_id, position, type, text, font_size, color, x, y) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )?;
    for (position, element) in elements.iter().enumerate() {
        stmt.execute(params![
            template_id,
            position as i64,
            &element.element_type,
            &element.text,
            element.font_size,
            &element.color,
            element.x,
            element.y,
        ])?;
    }
    Ok(())
}
