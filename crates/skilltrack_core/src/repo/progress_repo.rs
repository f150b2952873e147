//! Progress item repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist progress items against one parent skill id.
//! - Aggregate sibling weight in a single windowed query.
//!
//! # Invariants
//! - Create/update validate weightage before any SQL mutation.
//! - `items_for_skill` sums over the whole selected set; there is no
//!   further grouping within one skill's items.
//! - Item order within one skill is insertion order.

use crate::model::progress::{
    weight_percent, NewProgressItem, ProgressItem, ProgressItemDraft, ProgressItemId, Weightage,
    WeightedProgressItem,
};
use crate::model::skill::SkillId;
use crate::model::RecordKind;
use crate::repo::{
    bool_to_int, ensure_connection_ready, parse_bool, parse_uuid, RepoError, RepoResult,
};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const PROGRESS_SELECT_SQL: &str = "SELECT
    id,
    parent_skill_id,
    name,
    achieved,
    weightage,
    comments
FROM progress_items";

/// Repository interface for progress items and their weighted view.
pub trait ProgressRepository {
    fn create_item(&self, item: &NewProgressItem) -> RepoResult<ProgressItem>;
    fn get_item(&self, id: ProgressItemId) -> RepoResult<Option<ProgressItem>>;
    /// Lists every item under `skill_id` with its share of the total weight.
    fn items_for_skill(&self, skill_id: SkillId) -> RepoResult<Vec<WeightedProgressItem>>;
    /// Replaces name, achieved, weightage and comments. The parent skill is
    /// fixed at creation.
    fn update_item(&self, id: ProgressItemId, draft: &ProgressItemDraft)
        -> RepoResult<ProgressItem>;
    fn delete_item(&self, id: ProgressItemId) -> RepoResult<()>;
}

/// SQLite-backed progress repository.
pub struct SqliteProgressRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProgressRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ProgressRepository for SqliteProgressRepository<'_> {
    fn create_item(&self, item: &NewProgressItem) -> RepoResult<ProgressItem> {
        let weightage = item.draft.validate()?;

        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO progress_items (
                id,
                parent_skill_id,
                name,
                achieved,
                weightage,
                comments
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                id.to_string(),
                item.parent_skill_id.to_string(),
                item.draft.name.as_str(),
                bool_to_int(item.draft.achieved),
                weightage.get(),
                item.draft.comments.as_str(),
            ],
        )?;
        self.get_item(id)?.ok_or(RepoError::NotFound {
            kind: RecordKind::ProgressItem,
            id,
        })
    }

    fn get_item(&self, id: ProgressItemId) -> RepoResult<Option<ProgressItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROGRESS_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_progress_row(row)?));
        }
        Ok(None)
    }

    fn items_for_skill(&self, skill_id: SkillId) -> RepoResult<Vec<WeightedProgressItem>> {
        // The window runs after WHERE, so the partition is exactly this
        // skill's items.
        let mut stmt = self.conn.prepare(
            "SELECT
                id,
                parent_skill_id,
                name,
                achieved,
                weightage,
                comments,
                SUM(weightage) OVER () AS total_weight
             FROM progress_items
             WHERE parent_skill_id = ?1
             ORDER BY rowid ASC;",
        )?;
        let mut rows = stmt.query([skill_id.to_string()])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            let item = parse_progress_row(row)?;
            let total_weight: i64 = row.get("total_weight")?;
            items.push(WeightedProgressItem {
                weight_percent: weight_percent(item.weightage.get(), total_weight),
                item,
            });
        }
        Ok(items)
    }

    fn update_item(
        &self,
        id: ProgressItemId,
        draft: &ProgressItemDraft,
    ) -> RepoResult<ProgressItem> {
        let weightage = draft.validate()?;

        let changed = self.conn.execute(
            "UPDATE progress_items
             SET
                name = ?2,
                achieved = ?3,
                weightage = ?4,
                comments = ?5
             WHERE id = ?1;",
            params![
                id.to_string(),
                draft.name.as_str(),
                bool_to_int(draft.achieved),
                weightage.get(),
                draft.comments.as_str(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: RecordKind::ProgressItem,
                id,
            });
        }
        self.get_item(id)?.ok_or(RepoError::NotFound {
            kind: RecordKind::ProgressItem,
            id,
        })
    }

    fn delete_item(&self, id: ProgressItemId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM progress_items WHERE id = ?1;",
            [id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: RecordKind::ProgressItem,
                id,
            });
        }
        Ok(())
    }
}

fn parse_progress_row(row: &Row<'_>) -> RepoResult<ProgressItem> {
    let id_text: String = row.get("id")?;
    let parent_text: String = row.get("parent_skill_id")?;
    let raw_weightage: i64 = row.get("weightage")?;
    let weightage = Weightage::new(raw_weightage).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid weightage `{raw_weightage}` in progress_items.weightage"
        ))
    })?;

    Ok(ProgressItem {
        id: parse_uuid(&id_text, "progress_items.id")?,
        parent_skill_id: parse_uuid(&parent_text, "progress_items.parent_skill_id")?,
        name: row.get("name")?,
        achieved: parse_bool(row.get("achieved")?, "progress_items.achieved")?,
        weightage,
        comments: row.get("comments")?,
    })
}
