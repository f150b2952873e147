use rusqlite::Connection;
use skilltrack_core::db::open_db_in_memory;
use skilltrack_core::{
    ServiceError, SkillDraft, SkillId, SkillService, SqliteCategoryRepository,
    SqliteSkillRepository,
};
use uuid::Uuid;

type Service<'conn> = SkillService<SqliteSkillRepository<'conn>, SqliteCategoryRepository<'conn>>;

fn setup() -> Connection {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO metadata (type, value, is_active) VALUES
            ('SKILL_CATEGORY', 'Engineering', 1),
            ('SKILL_CATEGORY', 'Design', 1),
            ('SKILL_CATEGORY', 'Retired', 0),
            ('TASK_LABEL', 'Urgent', 1);",
    )
    .unwrap();
    conn
}

fn service(conn: &Connection) -> Service<'_> {
    SkillService::new(
        SqliteSkillRepository::try_new(conn).unwrap(),
        SqliteCategoryRepository::try_new(conn).unwrap(),
    )
}

fn skill(name: &str, parent_id: Option<SkillId>) -> SkillDraft {
    SkillDraft {
        name: name.to_string(),
        category: String::new(),
        description: String::new(),
        parent_id,
    }
}

#[test]
fn category_validation_follows_active_vocabulary() {
    let conn = setup();
    let service = service(&conn);

    assert!(service.is_valid_category("").unwrap());
    assert!(service.is_valid_category("Engineering").unwrap());
    assert!(!service.is_valid_category("engineering").unwrap());
    assert!(!service.is_valid_category("Retired").unwrap());
    assert!(!service.is_valid_category("Urgent").unwrap());
    assert!(!service.is_valid_category("Cooking").unwrap());
}

#[test]
fn create_rejects_unknown_category() {
    let conn = setup();
    let service = service(&conn);

    let mut draft = skill("Pottery", None);
    draft.category = "Crafts".to_string();
    let err = service.create_skill(&draft).unwrap_err();
    assert!(matches!(err, ServiceError::InvalidCategory(ref value) if value == "Crafts"));
    assert!(err.is_validation());
    assert!(service.list_skills().unwrap().is_empty());
}

#[test]
fn get_skill_joins_parent_when_resolvable() {
    let conn = setup();
    let service = service(&conn);

    let mut root_draft = skill("Full Stack Development", None);
    root_draft.category = "Engineering".to_string();
    let root = service.create_skill(&root_draft).unwrap();
    let child = service
        .create_skill(&skill("Go Backend", Some(root.id)))
        .unwrap();

    let loaded = service.get_skill(child.id).unwrap();
    assert_eq!(loaded.skill, child);
    assert_eq!(loaded.parent_data.as_ref(), Some(&root));

    let loaded_root = service.get_skill(root.id).unwrap();
    assert_eq!(loaded_root.skill, root);
    assert!(loaded_root.parent_data.is_none());
}

#[test]
fn dangling_parent_is_allowed_and_omitted_from_join() {
    let conn = setup();
    let service = service(&conn);

    let missing_parent = Uuid::new_v4();
    let orphan = service
        .create_skill(&skill("Orphan", Some(missing_parent)))
        .unwrap();
    assert_eq!(orphan.parent_id, Some(missing_parent));

    let loaded = service.get_skill(orphan.id).unwrap();
    assert!(loaded.parent_data.is_none());
}

#[test]
fn deleting_parent_leaves_child_reference_dangling() {
    let conn = setup();
    let service = service(&conn);

    let parent = service.create_skill(&skill("Parent", None)).unwrap();
    let child = service
        .create_skill(&skill("Child", Some(parent.id)))
        .unwrap();

    service.delete_skill(parent.id).unwrap();

    let loaded = service.get_skill(child.id).unwrap();
    assert_eq!(loaded.skill.parent_id, Some(parent.id));
    assert!(loaded.parent_data.is_none());
}

#[test]
fn update_moves_skill_to_new_parent() {
    let conn = setup();
    let service = service(&conn);

    let a = service.create_skill(&skill("A", None)).unwrap();
    let b = service.create_skill(&skill("B", None)).unwrap();
    let leaf = service.create_skill(&skill("Leaf", Some(a.id))).unwrap();

    let moved = service
        .update_skill(leaf.id, &skill("Leaf", Some(b.id)))
        .unwrap();
    assert_eq!(moved.parent_id, Some(b.id));
    assert_eq!(moved.created_at, leaf.created_at);

    let rooted = service.update_skill(leaf.id, &skill("Leaf", None)).unwrap();
    assert_eq!(rooted.parent_id, None);
}

#[test]
fn update_rejects_self_and_descendant_parents() {
    let conn = setup();
    let service = service(&conn);

    let root = service.create_skill(&skill("Root", None)).unwrap();
    let mid = service.create_skill(&skill("Mid", Some(root.id))).unwrap();
    let leaf = service.create_skill(&skill("Leaf", Some(mid.id))).unwrap();

    let err = service
        .update_skill(root.id, &skill("Root", Some(root.id)))
        .unwrap_err();
    assert!(matches!(err, ServiceError::ParentCycle { .. }));

    let err = service
        .update_skill(root.id, &skill("Root", Some(leaf.id)))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::ParentCycle { skill_id, parent_id } if skill_id == root.id && parent_id == leaf.id
    ));

    let unchanged = service.get_skill(root.id).unwrap();
    assert_eq!(unchanged.skill.parent_id, None);
}

#[test]
fn update_on_missing_skill_is_not_found_before_validation() {
    let conn = setup();
    let service = service(&conn);

    let mut draft = skill("Ghost", None);
    draft.category = "Unknown".to_string();
    let err = service.update_skill(Uuid::new_v4(), &draft).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { .. }));
}

#[test]
fn update_validates_category() {
    let conn = setup();
    let service = service(&conn);

    let created = service.create_skill(&skill("Sketching", None)).unwrap();
    let mut draft = skill("Sketching", None);
    draft.category = "Retired".to_string();
    let err = service.update_skill(created.id, &draft).unwrap_err();
    assert!(matches!(err, ServiceError::InvalidCategory(_)));

    draft.category = "Design".to_string();
    let updated = service.update_skill(created.id, &draft).unwrap();
    assert_eq!(updated.category, "Design");
}
