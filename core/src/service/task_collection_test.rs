#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::path::{Path, PathBuf};

    use chrono::{Duration, NaiveDate};

    use crate::error::{Result, TaskError};
    use crate::model::strategy::SortKey;
    use crate::model::task::{Priority, Task};
    use crate::repository::TaskRepository;
    use crate::service::task_collection::{rows, TaskCollection, TaskUpdate};
    use crate::time::today;

    struct MockTaskRepo {
        stored: RefCell<Option<Vec<Task>>>,
    }

    impl MockTaskRepo {
        fn empty() -> Self {
            Self { stored: RefCell::new(None) }
        }

        fn with_json(json: &str) -> Self {
            let tasks: Vec<Task> = serde_json::from_str(json).unwrap();
            Self { stored: RefCell::new(Some(tasks)) }
        }
    }

    impl TaskRepository for MockTaskRepo {
        fn load(&self) -> Result<Vec<Task>> {
            self.stored
                .borrow()
                .clone()
                .ok_or_else(|| TaskError::NotFound(PathBuf::from("mock")))
        }

        fn save(&self, tasks: &[Task]) -> Result<()> {
            *self.stored.borrow_mut() = Some(tasks.to_vec());
            Ok(())
        }

        fn location(&self) -> &Path {
            Path::new("mock")
        }
    }

    struct CorruptRepo;

    impl TaskRepository for CorruptRepo {
        fn load(&self) -> Result<Vec<Task>> {
            Err(TaskError::CorruptData {
                path: PathBuf::from("mock"),
                reason: "bad bytes".to_string(),
            })
        }

        fn save(&self, _tasks: &[Task]) -> Result<()> {
            unimplemented!()
        }

        fn location(&self) -> &Path {
            Path::new("mock")
        }
    }

    fn titles(view: &[(usize, &Task)]) -> Vec<String> {
        view.iter().map(|(_, t)| t.title().to_string()).collect()
    }

    fn collection_with(entries: &[(&str, &str, &str)]) -> TaskCollection {
        let mut tasks = TaskCollection::new();
        for (title, project, due) in entries {
            tasks.add(title, project, due, "", "").unwrap();
        }
        tasks
    }

    #[test]
    fn test_buy_milk_scenario() {
        let mut tasks = TaskCollection::new();
        assert_eq!(tasks.add("Buy milk", "", "2099-01-01", "low", "").unwrap(), 0);
        assert_eq!(tasks.get(0).unwrap().priority(), Priority::Low);

        let err = tasks.add("Buy milk", "", "2099-01-01", "low", "").unwrap_err();
        assert!(matches!(err, TaskError::Duplicate { .. }));
        assert_eq!(tasks.len(), 1);

        assert_eq!(tasks.count(Task::is_complete), 0);
        assert_eq!(tasks.count(|t| !t.is_complete()), 1);

        tasks.complete(0).unwrap();
        assert_eq!(tasks.completed_count(), 1);

        tasks.remove(0).unwrap();
        assert!(tasks.is_empty());
    }

    #[test]
    fn test_past_due_date_is_rejected() {
        let mut tasks = TaskCollection::new();
        let err = tasks.add("Pay rent", "Home", "2020-01-01", "HIGH", "").unwrap_err();
        assert!(matches!(err, TaskError::Date(_)));
        assert!(tasks.is_empty());
    }

    #[test]
    fn test_add_rejects_bad_input_without_mutation() {
        let mut tasks = collection_with(&[("Existing", "", "")]);
        assert!(matches!(tasks.add("  ", "", "", "", ""), Err(TaskError::Validation(_))));
        assert!(matches!(tasks.add("x", "", "31/12/2099", "", ""), Err(TaskError::Date(_))));
        assert_eq!(tasks.len(), 1);
    }

    #[test]
    fn test_search_is_case_insensitive_on_title_and_project() {
        let tasks = collection_with(&[
            ("Pay rent", "Home", "2099-02-01"),
            ("Write report", "Work", ""),
            ("Fix the HOMEpage", "", ""),
        ]);
        assert_eq!(titles(&tasks.search("home")), vec!["Pay rent", "Fix the HOMEpage"]);
        assert_eq!(tasks.search("REPORT")[0].0, 1);
        assert!(tasks.search("garden").is_empty());
    }

    #[test]
    fn test_added_task_is_found_by_its_title() {
        let mut tasks = TaskCollection::new();
        let index = tasks.add(" Call mom ", "Family", "2099-05-05", "high", "birthday").unwrap();
        let found = tasks.search("Call mom");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, index);
        assert_eq!(found[0].1.notes(), "birthday");
    }

    #[test]
    fn test_duplicate_ignores_case_and_whitespace() {
        let mut tasks = collection_with(&[("Buy milk", "", "2099-01-01")]);
        assert!(tasks.add("  BUY MILK ", "Other", "2099-01-01", "", "").is_err());
        // Same title on another day, or with no date at all, is a different task.
        tasks.add("Buy milk", "", "2099-01-02", "", "").unwrap();
        tasks.add("Buy milk", "", "", "", "").unwrap();
        assert!(matches!(
            tasks.add("buy milk", "", "", "", ""),
            Err(TaskError::Duplicate { due: None, .. })
        ));
        assert_eq!(tasks.len(), 3);
    }

    #[test]
    fn test_update_applies_all_provided_fields() {
        let mut tasks = collection_with(&[("Draft", "", "2099-01-01")]);
        let changes = TaskUpdate::default()
            .title("Final draft")
            .project(" Work ")
            .due_date("2099-03-01")
            .priority("high")
            .notes("send to Ann");
        assert!(tasks.update(0, &changes).unwrap());

        let task = tasks.get(0).unwrap();
        assert_eq!(task.title(), "Final draft");
        assert_eq!(task.project(), "Work");
        assert_eq!(task.due_date(), NaiveDate::from_ymd_opt(2099, 3, 1));
        assert_eq!(task.priority(), Priority::High);
        assert_eq!(task.notes(), "send to Ann");
    }

    #[test]
    fn test_update_is_all_or_nothing() {
        let mut tasks = collection_with(&[("Draft", "Work", "2099-01-01")]);
        let before = tasks.clone();

        let changes = TaskUpdate::default().title("Renamed").due_date("2020-01-01");
        assert!(matches!(tasks.update(0, &changes), Err(TaskError::Date(_))));
        assert_eq!(tasks, before);

        let changes = TaskUpdate::default().project("Home").due_date("soon");
        assert!(matches!(tasks.update(0, &changes), Err(TaskError::Date(_))));
        assert_eq!(tasks, before);
    }

    #[test]
    fn test_update_with_blank_fields_changes_nothing() {
        let mut tasks = collection_with(&[("Draft", "Work", "2099-01-01")]);
        let changes = TaskUpdate::default().title("  ").project("").due_date(" ");
        assert!(!tasks.update(0, &changes).unwrap());
        assert!(!tasks.update(0, &TaskUpdate::default()).unwrap());
        assert_eq!(tasks.get(0).unwrap().project(), "Work");
    }

    #[test]
    fn test_update_rejects_collision_with_other_task() {
        let mut tasks = collection_with(&[("A", "", "2099-01-01"), ("B", "", "2099-01-01")]);
        let changes = TaskUpdate::default().title("a");
        assert!(matches!(tasks.update(1, &changes), Err(TaskError::Duplicate { .. })));
        assert_eq!(tasks.get(1).unwrap().title(), "B");

        // Re-casing a task's own title is not a collision with itself.
        assert!(tasks.update(0, &TaskUpdate::default().title("a")).unwrap());
    }

    #[test]
    fn test_bad_index_is_reported() {
        let mut tasks = collection_with(&[("Only", "", "")]);
        assert!(matches!(tasks.get(1), Err(TaskError::Index { index: 1, len: 1 })));
        assert!(matches!(tasks.complete(3), Err(TaskError::Index { .. })));
        assert!(matches!(tasks.incomplete(1), Err(TaskError::Index { .. })));
        assert!(matches!(tasks.remove(1), Err(TaskError::Index { .. })));
        assert!(matches!(
            tasks.update(1, &TaskUpdate::default().title("x")),
            Err(TaskError::Index { .. })
        ));
        assert_eq!(tasks.len(), 1);
    }

    #[test]
    fn test_remove_shifts_later_positions() {
        let mut tasks = collection_with(&[("a", "", ""), ("b", "", ""), ("c", "", "")]);
        assert_eq!(tasks.remove(1).unwrap().title(), "b");
        assert_eq!(tasks.get(1).unwrap().title(), "c");
    }

    #[test]
    fn test_complete_then_incomplete_restores_state() {
        let mut tasks = collection_with(&[("a", "", "")]);
        for _ in 0..2 {
            tasks.complete(0).unwrap();
            assert!(tasks.get(0).unwrap().completed_date().is_some());
        }
        for _ in 0..2 {
            tasks.incomplete(0).unwrap();
        }
        let task = tasks.get(0).unwrap();
        assert!(!task.is_complete());
        assert_eq!(task.completed_date(), None);
    }

    #[test]
    fn test_sorted_view_leaves_storage_alone() {
        let tasks = collection_with(&[
            ("no date", "", ""),
            ("late", "", "2099-06-01"),
            ("early", "", "2099-01-01"),
            ("middle", "", "2099-03-01"),
        ]);
        let view = tasks.sorted_view(SortKey::DueDate);
        assert_eq!(titles(&view), vec!["early", "middle", "late", "no date"]);
        assert_eq!(view.iter().map(|(i, _)| *i).collect::<Vec<_>>(), vec![2, 3, 1, 0]);

        let dates: Vec<_> = view.iter().filter_map(|(_, t)| t.due_date()).collect();
        assert!(dates.windows(2).all(|w| w[0] <= w[1]));

        assert_eq!(tasks.get(0).unwrap().title(), "no date");
    }

    #[test]
    fn test_sort_by_reorders_storage() {
        let mut tasks = collection_with(&[("m", "", ""), ("h", "", ""), ("l", "", "")]);
        tasks.update(1, &TaskUpdate::default().priority("high")).unwrap();
        tasks.update(2, &TaskUpdate::default().priority("low")).unwrap();

        tasks.sort_by(SortKey::Priority);
        let order: Vec<_> = tasks.iter().map(|t| t.title().to_string()).collect();
        assert_eq!(order, vec!["h", "l", "m"]);

        tasks.complete(0).unwrap();
        tasks.sort_by(SortKey::Completion);
        let order: Vec<_> = tasks.iter().map(|t| t.title().to_string()).collect();
        assert_eq!(order, vec!["l", "m", "h"]);
    }

    #[test]
    fn test_listing_rows() {
        let mut tasks = collection_with(&[("Zeta", "b-proj", ""), ("Alpha", "a-proj", "")]);
        let soon = (today() + Duration::days(3)).to_string();
        tasks.add("Gamma", "c-proj", &soon, "high", "").unwrap();

        let rows = tasks.list_with_index();
        assert_eq!(rows.iter().map(|r| r.number).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(rows[2].days_until_due, 3);
        assert_eq!(rows[2].due_label(), soon);
        assert_eq!(rows[0].due_label(), "-");
        assert_eq!(rows[0].days_until_due, 0);
        assert_eq!(rows[0].completed_label(), "NO");

        let by_due = tasks.list_by_due_date();
        assert_eq!(by_due[0].title, "Gamma");
        assert_eq!(by_due[0].number, 3);

        let by_project = tasks.list_by_project();
        let order: Vec<_> = by_project.iter().map(|r| (r.number, r.project.as_str())).collect();
        assert_eq!(order, vec![(2, "a-proj"), (1, "b-proj"), (3, "c-proj")]);
    }

    #[test]
    fn test_overdue_marker_for_loaded_past_tasks() {
        let repo = MockTaskRepo::with_json(
            r#"[
                {"title": "Old bill", "due_date": "2020-01-01", "priority": "HIGH"},
                {"title": "Old done", "due_date": "2020-01-01", "complete": true, "completed_date": "2020-01-02"}
            ]"#,
        );
        let mut tasks = TaskCollection::new();
        tasks.load(&repo).unwrap();

        let day = NaiveDate::from_ymd_opt(2020, 1, 3).unwrap();
        let listed = rows(tasks.iter().enumerate(), day);
        assert!(listed[0].overdue);
        assert_eq!(listed[0].days_until_due, -2);
        assert!(!listed[1].overdue);
        assert_eq!(listed[1].completed_label(), "YES");
    }

    #[test]
    fn test_load_replaces_contents_and_failure_keeps_them() {
        let mut tasks = collection_with(&[("Keep me", "", "")]);

        assert!(matches!(tasks.load(&MockTaskRepo::empty()), Err(TaskError::NotFound(_))));
        assert!(matches!(tasks.load(&CorruptRepo), Err(TaskError::CorruptData { .. })));
        assert_eq!(tasks.get(0).unwrap().title(), "Keep me");

        tasks.load(&MockTaskRepo::with_json(r#"[{"title": "Replaced"}]"#)).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks.get(0).unwrap().title(), "Replaced");
    }

    #[test]
    fn test_load_rejects_stored_duplicates() {
        let mut tasks = collection_with(&[("Keep me", "", "")]);
        let repo = MockTaskRepo::with_json(
            r#"[
                {"title": "Buy milk", "due_date": "2099-01-01"},
                {"title": "  buy MILK ", "due_date": "2099-01-01"}
            ]"#,
        );

        let err = tasks.load(&repo).unwrap_err();
        assert!(matches!(err, TaskError::CorruptData { ref path, .. } if path.as_path() == Path::new("mock")));
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks.get(0).unwrap().title(), "Keep me");

        // Same title on different days is fine.
        let repo = MockTaskRepo::with_json(
            r#"[
                {"title": "Buy milk", "due_date": "2099-01-01"},
                {"title": "buy MILK", "due_date": "2099-01-02"}
            ]"#,
        );
        tasks.load(&repo).unwrap();
        assert_eq!(tasks.len(), 2);
    }

    #[test]
    fn test_load_from_file_with_duplicates_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        std::fs::write(
            &path,
            r#"[{"title":"Buy milk","due_date":"2099-01-01"},{"title":"buy MILK","due_date":"2099-01-01"}]"#,
        )
        .unwrap();

        let mut tasks = TaskCollection::new();
        match tasks.load_from(&path) {
            Err(TaskError::CorruptData { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected corrupt data, got {:?}", other),
        }
        assert!(tasks.is_empty());
    }

    #[test]
    fn test_save_then_load_through_repository() {
        let repo = MockTaskRepo::empty();
        let mut tasks = collection_with(&[("a", "x", "2099-01-01"), ("b", "", "")]);
        tasks.complete(1).unwrap();
        tasks.save(&repo).unwrap();

        let mut reloaded = TaskCollection::new();
        reloaded.load(&repo).unwrap();
        assert_eq!(reloaded, tasks);
    }

    #[test]
    fn test_save_then_load_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");

        let mut tasks = TaskCollection::new();
        tasks.add("Buy milk", "Home", "2099-01-01", "low", "two litres").unwrap();
        tasks.add("Write report", "", "", "", "").unwrap();
        tasks.complete(1).unwrap();
        tasks.save_to(&path).unwrap();

        let mut reloaded = TaskCollection::new();
        reloaded.load_from(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded, tasks);
    }

    #[test]
    fn test_summary_counts() {
        let mut tasks = collection_with(&[("a", "", ""), ("b", "", ""), ("c", "", "")]);
        tasks.complete(2).unwrap();
        let summary = tasks.summary();
        assert_eq!((summary.total, summary.completed, summary.not_completed), (3, 1, 2));
    }
}
