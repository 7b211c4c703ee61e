use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn coursegen() -> Command {
    Command::cargo_bin("coursegen").unwrap()
}

/// Two-lesson course with shared tests and a utility file
fn write_course(dir: &Path) -> PathBuf {
    let course = json!({
        "name": "Intro",
        "lessons": [
            {
                "name": "Basics",
                "index": 7,
                "tasks": [
                    { "name": "Hello", "task_files": { "Hello.java": "class Hello {}" } }
                ]
            },
            {
                "name": "Loops",
                "tasks": [
                    { "name": "For", "task_files": { "src/For.java": "class For {}" } }
                ]
            }
        ],
        "additionalMaterialsTask": {
            "name": "materials",
            "taskFiles": { "Helper.java": "class Helper {}" },
            "testsText": {
                "lesson2/task1/ForTest.java": "class ForTest {}",
                "util/Assertions.java": "class Assertions {}"
            }
        }
    });
    let path = dir.join("course.json");
    std::fs::write(&path, serde_json::to_string_pretty(&course).unwrap()).unwrap();
    path
}

#[test]
fn test_materialize_writes_project() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let course = write_course(temp_dir.path());
    let dest = temp_dir.path().join("project");

    coursegen()
        .arg("materialize")
        .arg(&course)
        .arg(&dest)
        .arg("--no-wrapper")
        .assert()
        .success()
        .stdout(predicate::str::contains("Course 'Intro' materialized"))
        .stdout(predicate::str::contains("2 lessons, 2 tasks"))
        .stdout(predicate::str::contains("build wrapper skipped"));

    assert!(dest.join("lesson1/task1/source/Hello.java").is_file());
    assert!(dest.join("lesson2/task1/source/For.java").is_file());
    assert!(dest.join("lesson2/task1/test/ForTest.java").is_file());
    assert!(dest.join("util/Helper.java").is_file());
    assert!(dest.join("util/Assertions.java").is_file());

    let settings = std::fs::read_to_string(dest.join("settings.gradle"))?;
    assert!(settings.contains("include ':lesson2:task1'"));
    assert!(settings.contains("include ':util'"));
    Ok(())
}

#[test]
fn test_materialize_twice_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let course = write_course(temp_dir.path());
    let dest = temp_dir.path().join("project");

    coursegen()
        .args(["materialize", "--no-wrapper"])
        .arg(&course)
        .arg(&dest)
        .assert()
        .success();

    coursegen()
        .args(["materialize", "--no-wrapper"])
        .arg(&course)
        .arg(&dest)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Already exists"));
    Ok(())
}

#[test]
fn test_dry_run_writes_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let course = write_course(temp_dir.path());
    let dest = temp_dir.path().join("planned");

    coursegen()
        .args(["materialize", "--dry-run"])
        .arg(&course)
        .arg(&dest)
        .assert()
        .success()
        .stdout(predicate::str::contains("lesson1/task1/source/Hello.java"))
        .stdout(predicate::str::contains("settings.gradle"));

    assert!(!dest.exists());
    Ok(())
}

#[test]
fn test_missing_bundled_wrapper_is_not_fatal() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let course = write_course(temp_dir.path());
    let dest = temp_dir.path().join("project");

    let output = coursegen()
        .args(["--json", "materialize", "--variant", "cut-down"])
        .arg(&course)
        .arg(&dest)
        .output()?;
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["wrapper"]["status"], "failed");
    assert_eq!(report["wrapper"]["generator"], "bundled");
    assert_eq!(report["materialization"]["task_count"], 2);
    Ok(())
}

#[test]
fn test_new_seeds_course() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let dest = temp_dir.path().join("algorithms");

    coursegen()
        .args(["new", "--no-wrapper"])
        .arg(&dest)
        .assert()
        .success()
        .stdout(predicate::str::contains("Course 'algorithms' materialized"));

    assert!(dest.join("lesson1/task1/source/Task.java").is_file());
    assert!(dest.join("lesson1/task1/test/Tests.java").is_file());

    let descriptor: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dest.join("course.json"))?)?;
    assert_eq!(descriptor["name"], "algorithms");
    assert_eq!(descriptor["lessons"].as_array().map(Vec::len), Some(1));
    Ok(())
}

#[test]
fn test_can_delete_requires_creator_mode() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let course = write_course(temp_dir.path());
    let root = temp_dir.path().join("project");
    let entry = root.join("lesson2/task1/source/For.java");

    coursegen()
        .arg("can-delete")
        .arg(&course)
        .arg(&root)
        .arg(&entry)
        .assert()
        .success()
        .stdout(predicate::str::contains("is not deletable"));

    coursegen()
        .args(["can-delete", "--creator"])
        .arg(&course)
        .arg(&root)
        .arg(&entry)
        .assert()
        .success()
        .stdout(predicate::str::contains("task 2.1 'For'"));
    Ok(())
}

#[test]
fn test_delete_lesson_directory() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let course = write_course(temp_dir.path());
    let root = temp_dir.path().join("project");

    coursegen()
        .args(["materialize", "--no-wrapper"])
        .arg(&course)
        .arg(&root)
        .assert()
        .success();

    coursegen()
        .args(["delete", "--creator"])
        .arg(&course)
        .arg(&root)
        .arg(root.join("lesson1"))
        .assert()
        .success()
        .stdout(predicate::str::contains("(lesson 1 'Basics')"));

    assert!(!root.join("lesson1").exists());
    assert!(root.join("lesson2/task1").is_dir());

    coursegen()
        .args(["delete", "--creator"])
        .arg(&course)
        .arg(&root)
        .arg(root.join("lesson2/task1/test/ForTest.java"))
        .assert()
        .success()
        .stdout(predicate::str::contains("(task 2.1 'For')"));

    assert!(!root.join("lesson2/task1/test/ForTest.java").exists());
    assert!(root.join("lesson2/task1/source/For.java").is_file());

    coursegen()
        .args(["delete", "--creator"])
        .arg(&course)
        .arg(&root)
        .arg(root.join("util/Helper.java"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a course item"));
    Ok(())
}

#[test]
fn test_show_config_merges_file() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let config = temp_dir.path().join("coursegen.toml");
    std::fs::write(&config, "host = \"cut-down\"\n\n[layout]\nsource_dir = \"src\"\n")?;

    coursegen()
        .arg("show-config")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("host = \"cut-down\""))
        .stdout(predicate::str::contains("source_dir = \"src\""))
        .stdout(predicate::str::contains("test_dir = \"test\""));
    Ok(())
}
