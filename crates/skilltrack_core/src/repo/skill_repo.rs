//! Skill repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist skills and their nullable parent reference.
//! - Resolve the parent join for single-skill reads.
//!
//! # Invariants
//! - `parent_id` is stored verbatim; existence is not enforced here.
//! - Deleting a skill leaves children and progress items untouched.
//! - Listing is deterministic: insertion order.

use crate::model::skill::{Skill, SkillDraft, SkillId, SkillWithParent};
use crate::model::RecordKind;
use crate::repo::{ensure_connection_ready, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const SKILL_SELECT_SQL: &str = "SELECT
    id,
    name,
    category,
    description,
    created_at,
    parent_id
FROM skills";

/// Repository interface for skill CRUD and hierarchy reads.
pub trait SkillRepository {
    fn create_skill(&self, draft: &SkillDraft) -> RepoResult<Skill>;
    fn get_skill(&self, id: SkillId) -> RepoResult<Option<Skill>>;
    /// Loads one skill with its parent left-joined in.
    fn get_skill_with_parent(&self, id: SkillId) -> RepoResult<Option<SkillWithParent>>;
    fn list_skills(&self) -> RepoResult<Vec<Skill>>;
    fn update_skill(&self, id: SkillId, draft: &SkillDraft) -> RepoResult<Skill>;
    fn delete_skill(&self, id: SkillId) -> RepoResult<()>;
}

/// SQLite-backed skill repository.
pub struct SqliteSkillRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSkillRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl SkillRepository for SqliteSkillRepository<'_> {
    fn create_skill(&self, draft: &SkillDraft) -> RepoResult<Skill> {
        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO skills (id, name, category, description, parent_id)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                id.to_string(),
                draft.name.as_str(),
                draft.category.as_str(),
                draft.description.as_str(),
                draft.parent_id.map(|value| value.to_string()),
            ],
        )?;
        self.get_skill(id)?.ok_or(RepoError::NotFound {
            kind: RecordKind::Skill,
            id,
        })
    }

    fn get_skill(&self, id: SkillId) -> RepoResult<Option<Skill>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SKILL_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_skill_row(row)?));
        }
        Ok(None)
    }

    fn get_skill_with_parent(&self, id: SkillId) -> RepoResult<Option<SkillWithParent>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                s.id AS id,
                s.name AS name,
                s.category AS category,
                s.description AS description,
                s.created_at AS created_at,
                s.parent_id AS parent_id,
                p.id AS p_id,
                p.name AS p_name,
                p.category AS p_category,
                p.description AS p_description,
                p.created_at AS p_created_at,
                p.parent_id AS p_parent_id
             FROM skills s
             LEFT JOIN skills p ON p.id = s.parent_id
             WHERE s.id = ?1;",
        )?;
        let mut rows = stmt.query([id.to_string()])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };

        let skill = parse_skill_row(row)?;
        let parent_data = match row.get::<_, Option<String>>("p_id")? {
            Some(parent_id_text) => Some(Skill {
                id: parse_uuid(&parent_id_text, "skills.id")?,
                name: row.get("p_name")?,
                category: row.get("p_category")?,
                description: row.get("p_description")?,
                created_at: row.get("p_created_at")?,
                parent_id: parse_optional_uuid(row.get("p_parent_id")?)?,
            }),
            None => None,
        };

        Ok(Some(SkillWithParent { skill, parent_data }))
    }

    fn list_skills(&self) -> RepoResult<Vec<Skill>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SKILL_SELECT_SQL} ORDER BY rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut skills = Vec::new();
        while let Some(row) = rows.next()? {
            skills.push(parse_skill_row(row)?);
        }
        Ok(skills)
    }

    fn update_skill(&self, id: SkillId, draft: &SkillDraft) -> RepoResult<Skill> {
        let changed = self.conn.execute(
            "UPDATE skills
             SET
                name = ?2,
                category = ?3,
                description = ?4,
                parent_id = ?5
             WHERE id = ?1;",
            params![
                id.to_string(),
                draft.name.as_str(),
                draft.category.as_str(),
                draft.description.as_str(),
                draft.parent_id.map(|value| value.to_string()),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: RecordKind::Skill,
                id,
            });
        }
        self.get_skill(id)?.ok_or(RepoError::NotFound {
            kind: RecordKind::Skill,
            id,
        })
    }

    fn delete_skill(&self, id: SkillId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM skills WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: RecordKind::Skill,
                id,
            });
        }
        Ok(())
    }
}

fn parse_skill_row(row: &Row<'_>) -> RepoResult<Skill> {
    let id_text: String = row.get("id")?;
    Ok(Skill {
        id: parse_uuid(&id_text, "skills.id")?,
        name: row.get("name")?,
        category: row.get("category")?,
        description: row.get("description")?,
        created_at: row.get("created_at")?,
        parent_id: parse_optional_uuid(row.get("parent_id")?)?,
    })
}

fn parse_optional_uuid(value: Option<String>) -> RepoResult<Option<Uuid>> {
    value
        .map(|text| parse_uuid(&text, "skills.parent_id"))
        .transpose()
}
