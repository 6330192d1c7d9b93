//! Spending categories, arranged as a tree via `parent_id`.
//!
use rusqlite::{OptionalExtension, params};

use crate::error::{PennyError, Result};
use crate::model::{Category, CategoryNode};
use crate::store::{Store, category_from_row};

impl Store {
    pub fn create_category(&self, name: &str, parent_id: Option<i64>) -> Result<Category> {
        if let Some(pid) = parent_id {
            if self.category(pid)?.is_none() {
                return Err(PennyError::NotFound("parent category"));
            }
        }
        self.conn.execute(
            "INSERT INTO categories (name, parent_id) VALUES (?1, ?2)",
            params![name, parent_id],
        )?;
        Ok(Category {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            parent_id,
        })
    }

    pub fn category(&self, id: i64) -> Result<Option<Category>> {
        Ok(self
            .conn
            .query_row(
                "SELECT * FROM categories WHERE id = ?1",
                params![id],
                category_from_row,
            )
            .optional()?)
    }

    pub fn list_categories(&self) -> Result<Vec<Category>> {
        let mut stmt = self.conn.prepare("SELECT * FROM categories ORDER BY id")?;
        let rows = stmt.query_map([], category_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    pub fn update_category(
        &self,
        id: i64,
        name: Option<&str>,
        parent_id: Option<Option<i64>>,
    ) -> Result<Category> {
        let mut cat = self.category(id)?.ok_or(PennyError::NotFound("category"))?;
        if let Some(name) = name {
            cat.name = name.to_string();
        }
        if let Some(parent_id) = parent_id {
            if parent_id == Some(id) {
                return Err(PennyError::invalid("category cannot be its own parent"));
            }
            cat.parent_id = parent_id;
        }
        self.conn.execute(
            "UPDATE categories SET name = ?1, parent_id = ?2 WHERE id = ?3",
            params![cat.name, cat.parent_id, id],
        )?;
        Ok(cat)
    }

    pub fn delete_category(&self, id: i64) -> Result<()> {
        if !self.category_children(id)?.is_empty() {
            return Err(PennyError::invalid(
                "category still has child categories",
            ));
        }
        let n = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?1", params![id])?;
        if n == 0 {
            return Err(PennyError::NotFound("category"));
        }
        Ok(())
    }

    pub fn category_children(&self, id: i64) -> Result<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT * FROM categories WHERE parent_id = ?1 ORDER BY id")?;
        let rows = stmt.query_map(params![id], category_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// The full category tree, roots first.
    pub fn category_hierarchy(&self) -> Result<Vec<CategoryNode>> {
        let mut stmt = self
            .conn
            .prepare("SELECT * FROM categories WHERE parent_id IS NULL ORDER BY id")?;
        let rows = stmt.query_map([], category_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(self.build_node(&row?)?);
        }
        Ok(out)
    }

    fn build_node(&self, cat: &Category) -> Result<CategoryNode> {
        let mut children = Vec::new();
        for child in self.category_children(cat.id)? {
            children.push(self.build_node(&child)?);
        }
        Ok(CategoryNode {
            id: cat.id,
            name: cat.name.clone(),
            children,
        })
    }
}
