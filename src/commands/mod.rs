pub mod init;
pub mod list;
pub mod serve;

use anyhow::Context;
use colored::Colorize;
use taskgate::models::Task;

/// Format a task's completion state as a colored string.
pub fn format_status(task: &Task) -> String {
    if task.completed {
        "done".bright_black().to_string()
    } else {
        "open".green().to_string()
    }
}

/// Print a list of tasks as a table or JSON.
pub fn print_tasks(tasks: &[Task], json: bool) -> anyhow::Result<()> {
    if json {
        let j = serde_json::to_string_pretty(tasks).context("json error")?;
        println!("{j}");
        return Ok(());
    }

    if tasks.is_empty() {
        println!("No tasks found.");
        return Ok(());
    }

    println!("{:<6} {:<50} STATUS", "ID", "TITLE");
    println!("{}", "-".repeat(64));
    for t in tasks {
        let title = if t.title.chars().count() > 48 {
            format!("{}...", t.title.chars().take(45).collect::<String>())
        } else {
            t.title.clone()
        };
        println!("{:<6} {:<50} {}", t.id, title, format_status(t));
    }
    Ok(())
}
