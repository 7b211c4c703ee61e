//! coursegen command-line entry point
//!
//! Materializes course descriptors into Gradle projects, seeds new courses
//! and exposes the lesson / task delete actions.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use coursegen_core::{
    Course, CourseContext, CourseGenConfig, CourseProjectBuilder, DeleteLesson, DeleteTask,
    FsStorage, HostVariant, MemoryStorage, ProjectReport, StorageBackend, StudyItemRef,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "coursegen")]
#[command(about = "Lay out educational courses as Gradle projects")]
#[command(version)]
struct Cli {
    /// Configuration file (TOML, JSON or YAML)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// More log output; repeat for more
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Materialize a course descriptor into a project directory
    Materialize {
        /// Course descriptor
        course: PathBuf,

        /// Project directory; created when missing
        dest: PathBuf,

        /// Host variant, overriding the configuration
        #[arg(long, value_enum)]
        variant: Option<HostVariant>,

        /// Do not generate the build wrapper
        #[arg(long)]
        no_wrapper: bool,

        /// Build the project in memory and list what would be written
        #[arg(long)]
        dry_run: bool,
    },

    /// Start a new course project, seeded with a first lesson and task
    New {
        /// Project directory; created when missing
        dest: PathBuf,

        /// Course name; defaults to the directory name
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Do not generate the build wrapper
        #[arg(long)]
        no_wrapper: bool,
    },

    /// Show which delete actions apply to a path in a course project
    CanDelete {
        /// Course descriptor
        course: PathBuf,

        /// Root of the materialized course
        root: PathBuf,

        /// File or directory inside the course root
        entry: PathBuf,

        /// Treat the course as being authored, whatever the configuration says
        #[arg(long)]
        creator: bool,
    },

    /// Delete a file or directory that belongs to a lesson or task
    Delete {
        /// Course descriptor
        course: PathBuf,

        /// Root of the materialized course
        root: PathBuf,

        /// File or directory inside the course root
        entry: PathBuf,

        /// Treat the course as being authored, whatever the configuration says
        #[arg(long)]
        creator: bool,
    },

    /// Print the effective configuration as TOML
    ShowConfig,
}

/// Descriptor written by `new` so later commands can load the course
const COURSE_FILE: &str = "course.json";

#[derive(Serialize)]
struct DeleteActions<'a> {
    entry: &'a Path,
    lesson: Option<StudyItemRef<'a>>,
    task: Option<StudyItemRef<'a>>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = CourseGenConfig::load(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("Failed to load configuration from {}", path.display()),
        None => "Failed to build default configuration".to_string(),
    })?;
    coursegen_utils::init_logging(config.logging.logger_config(cli.verbose))?;
    debug!("Effective configuration: {:?}", config);

    match cli.command {
        Commands::Materialize {
            course,
            dest,
            variant,
            no_wrapper,
            dry_run,
        } => {
            let mut config = config;
            if let Some(variant) = variant {
                config.host = variant;
            }
            if no_wrapper {
                config.wrapper.enabled = false;
            }
            let course = load_course(&course)?;

            if dry_run {
                dry_run_materialize(&config, course, &dest, cli.json)
            } else {
                let (_, report) = build_project(&config, course, &dest)?;
                print_report(&report, cli.json)
            }
        }

        Commands::New {
            dest,
            name,
            no_wrapper,
        } => {
            let mut config = config;
            config.creator_mode = true;
            if no_wrapper {
                config.wrapper.enabled = false;
            }
            let name = name.unwrap_or_else(|| {
                dest.file_name()
                    .map_or_else(|| "course".to_string(), |n| n.to_string_lossy().into_owned())
            });

            let (course, report) = build_project(&config, Course::new(name), &dest)?;
            let descriptor = serde_json::to_string_pretty(&course)?;
            let path = FsStorage::new()
                .create_file(&dest, COURSE_FILE, descriptor.as_bytes())
                .context("Failed to write course descriptor")?;
            info!("Wrote course descriptor {}", path.display());
            print_report(&report, cli.json)
        }

        Commands::CanDelete {
            course,
            root,
            entry,
            creator,
        } => {
            let context = course_context(&config, &course, root, creator)?;
            let storage = FsStorage::new();
            let actions = DeleteActions {
                entry: &entry,
                lesson: DeleteLesson::lesson(&storage).target(&context, &entry),
                task: DeleteTask::task(&storage).target(&context, &entry),
            };

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&actions)?);
            } else {
                for item in [actions.lesson, actions.task].into_iter().flatten() {
                    println!("{}", item);
                }
                if actions.lesson.is_none() && actions.task.is_none() {
                    println!("{} is not deletable", entry.display());
                }
            }
            Ok(())
        }

        Commands::Delete {
            course,
            root,
            entry,
            creator,
        } => {
            let context = course_context(&config, &course, root, creator)?;
            let storage = FsStorage::new();
            let lesson = DeleteLesson::lesson(&storage);

            // A lesson directory is offered as a lesson; anything deeper as a task
            let result = if lesson.is_deletable(&context, &entry) {
                lesson.delete(&context, &entry)
            } else {
                DeleteTask::task(&storage).delete(&context, &entry)
            };
            let removed = result.with_context(|| format!("Failed to delete {}", entry.display()))?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&removed)?);
            } else {
                println!("Deleted {} ({})", entry.display(), removed);
            }
            Ok(())
        }

        Commands::ShowConfig => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn load_course(path: &Path) -> Result<Course> {
    Course::from_file(path).with_context(|| format!("Failed to read course {}", path.display()))
}

fn course_context(
    config: &CourseGenConfig,
    course: &Path,
    root: PathBuf,
    creator: bool,
) -> Result<CourseContext> {
    Ok(CourseContext::new(load_course(course)?, root)
        .with_layout(config.layout.clone())
        .with_creator_mode(creator || config.creator_mode))
}

fn build_project(config: &CourseGenConfig, course: Course, dest: &Path) -> Result<(Course, ProjectReport)> {
    coursegen_utils::ensure_dir(dest)
        .with_context(|| format!("Failed to create {}", dest.display()))?;

    let builder = CourseProjectBuilder::from_config(FsStorage::new(), config)?;
    builder
        .build(course, dest)
        .with_context(|| format!("Failed to build course project in {}", dest.display()))
}

fn dry_run_materialize(config: &CourseGenConfig, course: Course, dest: &Path, json: bool) -> Result<()> {
    let storage = MemoryStorage::with_root(dest);
    let builder = CourseProjectBuilder::from_config(&storage, config)?.with_wrapper(None);
    let (_, report) = builder.build(course, dest)?;

    let paths = storage.relative_paths(dest);
    if json {
        let listing = serde_json::json!({
            "report": report,
            "paths": paths,
        });
        println!("{}", serde_json::to_string_pretty(&listing)?);
    } else {
        for path in paths {
            println!("{}", path.display());
        }
    }
    Ok(())
}

fn print_report(report: &ProjectReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    let materialization = &report.materialization;
    println!(
        "Course '{}' materialized in {}",
        report.course_name,
        materialization.root.display()
    );
    println!(
        "  {} lessons, {} tasks, {} directories, {} files",
        materialization.lesson_count,
        materialization.task_count,
        materialization.directories.len(),
        materialization.files.len()
    );
    if let Some(util) = &materialization.util_dir {
        println!("  utility files in {}", util.display());
    }
    for file in &report.build_files {
        println!("  wrote {}", file.display());
    }
    match &report.wrapper {
        coursegen_core::WrapperOutcome::Generated { generator } => {
            println!("  build wrapper generated ({})", generator);
        }
        coursegen_core::WrapperOutcome::Skipped => println!("  build wrapper skipped"),
        coursegen_core::WrapperOutcome::Failed { generator, reason } => {
            println!("  build wrapper not generated ({}): {}", generator, reason);
        }
    }
    Ok(())
}
