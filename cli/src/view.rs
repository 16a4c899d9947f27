use tabled::settings::object::Rows;
use tabled::settings::{Color, Style};
use tabled::{Table, Tabled};
use todolist_core::{Summary, TaskRow};

#[derive(Tabled)]
struct IndexRow {
    #[tabled(rename = "NUM")]
    number: usize,
    #[tabled(rename = "TITLE")]
    title: String,
    #[tabled(rename = "PROJECT")]
    project: String,
    #[tabled(rename = "PRIORITY")]
    priority: String,
    #[tabled(rename = "DUE DATE")]
    due: String,
    #[tabled(rename = "DAYS TILL DUE")]
    days: i64,
    #[tabled(rename = "COMPLETED")]
    completed: String,
}

#[derive(Tabled)]
struct DueRow {
    #[tabled(rename = "DUE DATE")]
    due: String,
    #[tabled(rename = "NUM")]
    number: usize,
    #[tabled(rename = "TITLE")]
    title: String,
    #[tabled(rename = "PROJECT")]
    project: String,
    #[tabled(rename = "DAYS TILL DUE")]
    days: i64,
    #[tabled(rename = "COMPLETED")]
    completed: String,
}

#[derive(Tabled)]
struct ProjectRow {
    #[tabled(rename = "PROJECT")]
    project: String,
    #[tabled(rename = "NUM")]
    number: usize,
    #[tabled(rename = "TITLE")]
    title: String,
    #[tabled(rename = "DUE DATE")]
    due: String,
    #[tabled(rename = "DAYS TILL DUE")]
    days: i64,
    #[tabled(rename = "COMPLETED")]
    completed: String,
}

fn completed_cell(row: &TaskRow) -> String {
    if row.overdue {
        format!("{} OVERDUE", row.completed_label())
    } else {
        row.completed_label().to_string()
    }
}

fn print_table<T: Tabled>(rows: Vec<T>) {
    if rows.is_empty() {
        println!("No tasks to show");
        return;
    }
    let mut table = Table::new(rows);
    table.with(Style::modern()).modify(Rows::first(), Color::FG_CYAN);
    println!("{}", table);
}

pub fn print_summary(summary: &Summary) {
    println!(
        "Total Tasks = {}  (Completed = {}, Not Completed = {})",
        summary.total, summary.completed, summary.not_completed
    );
}

pub fn print_index_rows(rows: &[TaskRow]) {
    print_table(
        rows.iter()
            .map(|r| IndexRow {
                number: r.number,
                title: r.title.clone(),
                project: r.project.clone(),
                priority: r.priority.to_string(),
                due: r.due_label(),
                days: r.days_until_due,
                completed: completed_cell(r),
            })
            .collect(),
    );
}

pub fn print_due_rows(rows: &[TaskRow]) {
    print_table(
        rows.iter()
            .map(|r| DueRow {
                due: r.due_label(),
                number: r.number,
                title: r.title.clone(),
                project: r.project.clone(),
                days: r.days_until_due,
                completed: completed_cell(r),
            })
            .collect(),
    );
}

pub fn print_project_rows(rows: &[TaskRow]) {
    print_table(
        rows.iter()
            .map(|r| ProjectRow {
                project: r.project.clone(),
                number: r.number,
                title: r.title.clone(),
                due: r.due_label(),
                days: r.days_until_due,
                completed: completed_cell(r),
            })
            .collect(),
    );
}
