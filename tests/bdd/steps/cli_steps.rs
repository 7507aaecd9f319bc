#![allow(deprecated)]
use cucumber::{then, when};

use crate::TaskgateWorld;

/// Run `taskgate` with the given args against the world's database.
fn run_taskgate(world: &mut TaskgateWorld, args: &[&str]) {
    let db_path = world
        .db_path
        .as_ref()
        .expect("db_path not set — did you forget 'Given a taskgate database is initialized'?");

    let output = assert_cmd::Command::cargo_bin("taskgate")
        .expect("taskgate binary not found")
        .env("TASKGATE_DB", db_path)
        .env("NO_COLOR", "1")
        .args(args)
        .output()
        .expect("failed to run taskgate");

    world.last_stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    world.last_exit_code = output.status.code().unwrap_or(-1);
}

#[when("I list tasks on the command line")]
async fn i_list_tasks(world: &mut TaskgateWorld) {
    run_taskgate(world, &["list"]);
}

#[when("I list tasks on the command line as JSON")]
async fn i_list_tasks_as_json(world: &mut TaskgateWorld) {
    run_taskgate(world, &["--json", "list"]);
}

#[then("the command succeeds")]
async fn the_command_succeeds(world: &mut TaskgateWorld) {
    assert_eq!(world.last_exit_code, 0, "stdout: {}", world.last_stdout);
}

#[then(expr = "the output contains {string}")]
async fn the_output_contains(world: &mut TaskgateWorld, expected: String) {
    assert!(
        world.last_stdout.contains(&expected),
        "expected output to contain {expected:?}, got:\n{}",
        world.last_stdout
    );
}

#[then(expr = "the JSON output lists {int} task(s)")]
async fn the_json_output_lists(world: &mut TaskgateWorld, expected: usize) {
    let value: serde_json::Value =
        serde_json::from_str(&world.last_stdout).expect("output is not valid JSON");
    let tasks = value.as_array().expect("expected a JSON array");
    assert_eq!(tasks.len(), expected);
}
