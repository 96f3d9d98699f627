use vbrief::VbriefError;
use vbrief::core::model::{
    Document, ItemStatus, Plan, PlanItem, PlanItemStatus, PlanStatus, TodoItem, TodoList,
};
use vbrief::core::update::Updater;
use vbrief::core::validate::{self, StandardValidator, Validator};

fn todo_doc(titles: &[&str]) -> Document {
    let mut doc = Document::new("0.2");
    doc.todo_list = Some(TodoList {
        items: titles
            .iter()
            .map(|t| TodoItem::new(*t, ItemStatus::Pending))
            .collect(),
    });
    doc
}

fn plan_doc() -> Document {
    let mut doc = Document::new("0.2");
    let mut plan = Plan::new("Rollout", PlanStatus::Draft);
    plan.add_narrative("proposal", "Ship it in two stages");
    plan.add_plan_item(PlanItem::new("Stage one", PlanItemStatus::Pending));
    doc.plan = Some(plan);
    doc
}

fn messages(doc: &Document) -> Vec<String> {
    validate::validate(doc)
        .iter()
        .map(|e| e.message.clone())
        .collect()
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn test_valid_todo_document_has_no_errors() {
    let doc = todo_doc(&["Write tests", "Fix bug"]);
    assert!(validate::validate(&doc).is_empty());
    assert!(validate::ensure_valid(&doc).is_ok());
    assert!(validate::validate_core(&doc).is_ok());
}

#[test]
fn test_empty_document_reports_version_and_container() {
    let doc = Document::default();
    let errors = validate::validate(&doc);
    assert_eq!(errors.len(), 2);
    assert!(errors.contains_message("version is required"));
    assert!(errors.contains_message("must contain either todoList or plan"));

    let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, vec!["vBRIEFInfo.version", "document"]);
}

#[test]
fn test_document_with_both_containers_is_invalid() {
    let mut doc = todo_doc(&["a"]);
    doc.plan = plan_doc().plan;
    assert_eq!(messages(&doc), vec!["cannot contain both todoList and plan"]);
}

#[test]
fn test_plan_without_proposal() {
    let mut doc = plan_doc();
    doc.plan.as_mut().unwrap().narratives.clear();
    let errors = validate::validate(&doc);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.as_slice()[0].field, "plan.narratives");
    assert_eq!(errors.as_slice()[0].message, "proposal narrative is required");
}

#[test]
fn test_item_errors_carry_index_paths() {
    let mut doc = todo_doc(&["ok", ""]);
    doc.todo_list.as_mut().unwrap().items[0].status = "done".to_string();

    let errors = validate::validate(&doc);
    let rendered: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    assert_eq!(
        rendered,
        vec![
            "todoList.items[0].status: invalid status: done",
            "todoList.items[1].title: title is required",
        ]
    );
}

#[test]
fn test_plan_field_errors() {
    let mut doc = plan_doc();
    {
        let plan = doc.plan.as_mut().unwrap();
        plan.title.clear();
        plan.status = "shipped".to_string();
        plan.add_narrative("risk", "");
        plan.items[0].status = "draft".to_string();
    }
    let errors = validate::validate(&doc);
    let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(
        fields,
        vec![
            "plan.title",
            "plan.status",
            "plan.narratives.risk",
            "plan.items[0].status",
        ]
    );
    assert!(errors.contains_message("invalid status: shipped"));
    assert!(errors.contains_message("content is required"));
}

#[test]
fn test_validation_is_idempotent() {
    let mut doc = todo_doc(&["", "x"]);
    doc.info.version.clear();
    let first = validate::validate(&doc);
    let second = validate::validate(&doc);
    assert_eq!(first, second);
    assert_eq!(first.to_string(), second.to_string());
}

#[test]
fn test_fixing_violations_one_at_a_time() {
    let mut doc = todo_doc(&["", ""]);
    doc.info.version.clear();
    doc.todo_list.as_mut().unwrap().items[1].status = "nope".to_string();

    let mut count = validate::validate(&doc).len();
    assert_eq!(count, 4);

    let fixes: Vec<Box<dyn Fn(&mut Document)>> = vec![
        Box::new(|d: &mut Document| d.info.version = "0.2".to_string()),
        Box::new(|d: &mut Document| {
            d.todo_list.as_mut().unwrap().items[0].title = "a".to_string();
        }),
        Box::new(|d: &mut Document| {
            d.todo_list.as_mut().unwrap().items[1].title = "b".to_string();
        }),
        Box::new(|d: &mut Document| {
            d.todo_list.as_mut().unwrap().items[1].status = "blocked".to_string();
        }),
    ];
    for fix in fixes {
        fix(&mut doc);
        let next = validate::validate(&doc).len();
        assert_eq!(next, count - 1);
        count = next;
    }
    assert_eq!(count, 0);
}

#[test]
fn test_error_display_lists_every_violation() {
    let err = validate::ensure_valid(&Document::default()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "validation failed:\n  - vBRIEFInfo.version: version is required\n  - document: must contain either todoList or plan"
    );
    assert_eq!(err.validation_errors().map(|e| e.len()), Some(2));
    assert!(!err.is_structural());
}

#[test]
fn test_extensions_are_rejected() {
    let doc = todo_doc(&["a"]);
    assert!(validate::validate_extensions(&doc, &[]).is_ok());
    match validate::validate_extensions(&doc, &["metadata", "timestamps"]) {
        Err(VbriefError::ExtensionsNotSupported(names)) => {
            assert_eq!(names, vec!["metadata", "timestamps"]);
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(StandardValidator.validate(&doc).is_ok());
}

// ---------------------------------------------------------------------------
// Updater
// ---------------------------------------------------------------------------

#[test]
fn test_updater_todo_lifecycle() {
    let mut doc = todo_doc(&["Write tests"]);
    let mut updater = Updater::new(&mut doc);

    updater
        .add_item(TodoItem::new("Fix bug", ItemStatus::Pending))
        .unwrap();
    updater.update_item_status(0, ItemStatus::InProgress).unwrap();
    updater
        .update_item(1, |item| item.title = "Fix parser bug".to_string())
        .unwrap();
    let removed = updater.remove_item(0).unwrap();
    assert_eq!(removed.title, "Write tests");
    assert_eq!(removed.status, "inProgress");

    let items = doc.todo_items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "Fix parser bug");
}

#[test]
fn test_updater_out_of_range_index_leaves_list() {
    let mut doc = todo_doc(&["a", "b"]);
    let mut updater = Updater::new(&mut doc);

    let err = updater.update_item(5, |_| {}).unwrap_err();
    assert!(matches!(err, VbriefError::InvalidIndex { index: 5, len: 2 }));
    assert_eq!(err.to_string(), "invalid index: index=5 len=2");
    assert!(err.is_structural());

    assert!(matches!(
        updater.remove_item(2),
        Err(VbriefError::InvalidIndex { index: 2, len: 2 })
    ));
    assert_eq!(doc.todo_items().len(), 2);
}

#[test]
fn test_updater_reports_invalid_state_without_rollback() {
    let mut doc = todo_doc(&["a"]);
    let mut updater = Updater::new(&mut doc);

    let err = updater
        .add_item(TodoItem::new("", ItemStatus::Pending))
        .unwrap_err();
    let errors = err.validation_errors().expect("validation failure");
    assert!(errors.contains_message("title is required"));

    // the invalid item stays in place
    assert_eq!(doc.todo_items().len(), 2);
    assert_eq!(doc.todo_items()[1].title, "");
}

#[test]
fn test_add_item_to_document_with_plan_fails_validation() {
    let mut doc = plan_doc();
    let mut updater = Updater::new(&mut doc);
    let err = updater
        .add_item(TodoItem::new("Stray", ItemStatus::Pending))
        .unwrap_err();
    assert!(err.to_string().contains("cannot contain both todoList and plan"));
    assert!(doc.todo_list.is_some());
}

#[test]
fn test_add_operations_create_missing_containers() {
    let mut doc = Document::new("0.2");
    Updater::new(&mut doc)
        .add_item(TodoItem::new("First", ItemStatus::Pending))
        .unwrap();
    assert_eq!(doc.todo_items().len(), 1);

    let mut doc = Document::new("0.2");
    let mut updater = Updater::new(&mut doc);
    // a fresh plan has no title yet, so validation fails but the plan exists
    assert!(updater.add_narrative("proposal", "Do the thing").is_err());
    assert!(doc.plan.is_some());
    assert_eq!(
        doc.narratives().and_then(|n| n.get("proposal")).map(String::as_str),
        Some("Do the thing")
    );
}

#[test]
fn test_non_add_operations_need_existing_container() {
    let mut doc = Document::new("0.2");
    let mut updater = Updater::new(&mut doc);
    assert!(matches!(updater.remove_item(0), Err(VbriefError::NoTodoList)));
    assert!(matches!(
        updater.update_item_status(0, ItemStatus::Completed),
        Err(VbriefError::NoTodoList)
    ));
    assert!(matches!(
        updater.find_and_update(|_| true, |_| {}),
        Err(VbriefError::NoTodoList)
    ));
    assert!(matches!(updater.remove_narrative("risk"), Err(VbriefError::NoPlan)));
    assert!(matches!(
        updater.update_narrative("risk", |_| {}),
        Err(VbriefError::NoPlan)
    ));
    assert!(matches!(updater.remove_plan_item(0), Err(VbriefError::NoPlan)));
    assert!(matches!(
        updater.update_plan_status(PlanStatus::Approved),
        Err(VbriefError::NoPlan)
    ));
    assert!(doc.todo_list.is_none());
    assert!(doc.plan.is_none());
}

#[test]
fn test_narrative_operations() {
    let mut doc = plan_doc();
    let mut updater = Updater::new(&mut doc);

    updater.add_narrative("risk", "Migration may stall").unwrap();
    updater
        .update_narrative("risk", |content| content.push_str(" on large tables"))
        .unwrap();
    // missing key is silent for remove, an error for update
    updater.remove_narrative("alternative").unwrap();
    assert!(matches!(
        updater.update_narrative("alternative", |_| {}),
        Err(VbriefError::KeyNotFound(ref key)) if key == "alternative"
    ));

    let err = updater.remove_narrative("proposal").unwrap_err();
    assert!(
        err.validation_errors()
            .is_some_and(|e| e.contains_message("proposal narrative is required"))
    );

    let narratives = doc.narratives().unwrap();
    assert_eq!(narratives.len(), 1);
    assert_eq!(narratives["risk"], "Migration may stall on large tables");
}

#[test]
fn test_plan_item_operations() {
    let mut doc = plan_doc();
    let mut updater = Updater::new(&mut doc);

    updater
        .add_plan_item(PlanItem::new("Stage two", PlanItemStatus::Pending))
        .unwrap();
    updater
        .update_plan_item_status(0, PlanItemStatus::Completed)
        .unwrap();
    updater.update_plan_status(PlanStatus::InProgress).unwrap();
    let bumped = updater
        .find_and_update_plan_items(
            |item| item.status == "pending",
            |item| item.status = PlanItemStatus::InProgress.as_str().to_string(),
        )
        .unwrap();
    assert_eq!(bumped, 1);
    assert!(matches!(
        updater.update_plan_item(9, |_| {}),
        Err(VbriefError::InvalidIndex { index: 9, len: 2 })
    ));
    let removed = updater.remove_plan_item(0).unwrap();
    assert_eq!(removed.title, "Stage one");

    let plan = doc.plan.as_ref().unwrap();
    assert_eq!(plan.status, "inProgress");
    assert_eq!(plan.items, vec![PlanItem::new("Stage two", PlanItemStatus::InProgress)]);
}

#[test]
fn test_find_and_update_counts_matches() {
    let mut doc = todo_doc(&["Fix login bug", "Write docs", "Fix logout bug"]);
    let mut updater = Updater::new(&mut doc);

    let n = updater
        .find_and_update(
            |item| item.title.starts_with("Fix"),
            |item| item.status = ItemStatus::Completed.as_str().to_string(),
        )
        .unwrap();
    assert_eq!(n, 2);

    assert!(matches!(
        updater.find_and_update(|item| item.title == "Deploy", |_| {}),
        Err(VbriefError::NoMatchingItems)
    ));

    let statuses: Vec<&str> = doc.todo_items().iter().map(|i| i.status.as_str()).collect();
    assert_eq!(statuses, vec!["completed", "pending", "completed"]);
}

#[test]
fn test_transaction_validates_once_at_end() {
    let mut doc = todo_doc(&["a"]);
    let mut updater = Updater::new(&mut doc);

    // intermediate states may be invalid
    updater
        .transaction(|d| {
            d.add_todo_item(TodoItem::new("", ItemStatus::Pending))?;
            d.update_todo_item(1, TodoItem::new("b", ItemStatus::Blocked))?;
            d.update_todo_item_status(0, ItemStatus::Cancelled)?;
            Ok(())
        })
        .unwrap();
    assert_eq!(doc.todo_items().len(), 2);
    assert_eq!(doc.todo_items()[0].status, "cancelled");
}

#[test]
fn test_transaction_error_skips_validation_and_keeps_changes() {
    let mut doc = todo_doc(&["a"]);
    let mut updater = Updater::new(&mut doc);

    let err = updater
        .transaction(|d| {
            d.add_todo_item(TodoItem::new("b", ItemStatus::Pending))?;
            d.remove_todo_item(7)?;
            Ok(())
        })
        .unwrap_err();
    assert!(matches!(err, VbriefError::InvalidIndex { index: 7, len: 2 }));
    assert_eq!(doc.todo_items().len(), 2);

    let mut doc = todo_doc(&["a"]);
    let err = Updater::new(&mut doc)
        .transaction(|d| d.add_todo_item(TodoItem::new("", ItemStatus::Pending)))
        .unwrap_err();
    assert!(err.validation_errors().is_some());
}

#[test]
fn test_document_mutators_never_create_containers() {
    let mut doc = Document::new("0.2");
    assert!(matches!(
        doc.add_todo_item(TodoItem::new("a", ItemStatus::Pending)),
        Err(VbriefError::NoTodoList)
    ));
    assert!(matches!(
        doc.add_plan_item(PlanItem::new("a", PlanItemStatus::Pending)),
        Err(VbriefError::NoPlan)
    ));
    assert!(matches!(doc.add_narrative("proposal", "x"), Err(VbriefError::NoPlan)));
    assert!(doc.todo_items().is_empty());
    assert!(doc.plan_items().is_empty());
    assert!(doc.narratives().is_none());
}

#[test]
fn test_updater_from_option() {
    let mut doc = todo_doc(&["a"]);
    let updater = Updater::from_option(Some(&mut doc));
    assert!(updater.validate().is_ok());

    let mut updater = Updater::from_option(None);
    assert!(matches!(
        updater.add_plan_item(PlanItem::new("a", PlanItemStatus::Pending)),
        Err(VbriefError::NilDocument)
    ));
}
