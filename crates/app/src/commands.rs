use std::fmt;

use compass_core::model::{AccessTier, Course, CourseId, CourseStatus, LessonId};
use services::{AppServices, Catalog, Gate};

use crate::{Args, Command};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Debug)]
enum CommandError {
    NotFound { what: &'static str, key: String },
    Locked { title: String, required: AccessTier },
    NotPersisted,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::NotFound { what, key } => write!(f, "{what} not found: {key}"),
            CommandError::Locked { title, required } => {
                write!(f, "{title} is {required} content; a deep dive subscription unlocks it")
            }
            CommandError::NotPersisted => write!(f, "progress could not be written to storage"),
        }
    }
}

impl std::error::Error for CommandError {}

pub(crate) async fn dispatch(app: &mut AppServices, args: &Args) -> CmdResult {
    match args.command {
        Command::Courses => list_courses(app, args),
        Command::Course => show_course(app, args),
        Command::Resources => list_resources(app, args),
        Command::Search => search(app, args),
        Command::Start => start(app, args).await,
        Command::Lesson => lesson(app, args).await,
        Command::Complete => complete(app, args).await,
        Command::View => view(app, args).await,
        Command::Progress => progress(app, args),
        Command::Export => export(app),
        Command::Seed => seed(app).await,
    }
}

fn gate_label(gate: Gate) -> &'static str {
    match gate {
        Gate::Open => "",
        Gate::Preview => " [preview]",
        Gate::Locked { .. } => " [locked]",
    }
}

fn status_label(status: Option<CourseStatus>) -> &'static str {
    match status {
        None | Some(CourseStatus::NotStarted) => "not started",
        Some(CourseStatus::InProgress) => "in progress",
        Some(CourseStatus::Completed) => "completed",
    }
}

fn resolve_course<'a>(catalog: &'a Catalog, key: &str) -> Result<&'a Course, CommandError> {
    catalog.find_course(key).ok_or_else(|| CommandError::NotFound {
        what: "course",
        key: key.to_owned(),
    })
}

fn list_courses(app: &AppServices, args: &Args) -> CmdResult {
    let catalog = app.catalog();
    let courses: Vec<&Course> = match args.category {
        Some(category) => catalog.courses_by_category(category),
        None if args.featured => catalog.featured_courses(),
        None => catalog.courses().iter().collect(),
    };

    for course in courses.into_iter().filter(|c| !args.featured || c.featured) {
        let pct = app
            .progress()
            .completion_percentage(&course.id, course.lesson_count());
        println!(
            "{:<28} {:>3}%  {}{} ({} lessons, {})",
            course.slug,
            pct,
            course.title,
            gate_label(app.course_gate(course)),
            course.lesson_count(),
            course.access_tier,
        );
    }
    Ok(())
}

fn show_course(app: &AppServices, args: &Args) -> CmdResult {
    let catalog = app.catalog();
    let course = resolve_course(&catalog, args.positional(0, "course", "course")?)?;
    let progress = app.progress();

    println!("{}", course.title);
    println!("{}", course.description);
    println!(
        "Status: {} ({}%)",
        status_label(progress.status(&course.id)),
        progress.completion_percentage(&course.id, course.lesson_count())
    );

    for (idx, lesson) in course.lessons.iter().enumerate() {
        let mark = if progress.is_lesson_completed(&course.id, &lesson.id) {
            "x"
        } else {
            " "
        };
        println!(
            "  [{mark}] {}. {} ({} min){}",
            idx + 1,
            lesson.title,
            lesson.duration_minutes,
            gate_label(app.lesson_gate(lesson))
        );
    }

    if let Some(next) = progress.resume_lesson(course) {
        println!("Continue with: {} ({})", next.title, next.id);
    }
    Ok(())
}

fn list_resources(app: &AppServices, args: &Args) -> CmdResult {
    let catalog = app.catalog();
    let resources = match args.category {
        Some(category) => catalog.resources_by_category(category),
        None if args.featured => catalog.featured_resources(),
        None => catalog.resources().iter().collect(),
    };

    for resource in resources.into_iter().filter(|r| !args.featured || r.featured) {
        let seen = if app.progress().is_resource_viewed(&resource.id) {
            "viewed"
        } else {
            "new"
        };
        println!(
            "{:<32} {:<6} {}{}",
            resource.slug,
            seen,
            resource.title,
            gate_label(app.resource_gate(resource))
        );
    }
    Ok(())
}

fn search(app: &AppServices, args: &Args) -> CmdResult {
    let catalog = app.catalog();
    let query = args.positionals.join(" ");
    let results = catalog.search(&query);

    for course in &results.courses {
        println!("course    {:<32} {}", course.slug, course.title);
    }
    for resource in &results.resources {
        println!("resource  {:<32} {}", resource.slug, resource.title);
    }
    if results.is_empty() {
        println!("No training matches \"{query}\".");
    }
    Ok(())
}

async fn start(app: &mut AppServices, args: &Args) -> CmdResult {
    let catalog = app.catalog();
    let course = resolve_course(&catalog, args.positional(0, "start", "course")?)?;
    if !app.course_gate(course).is_open() {
        return Err(CommandError::Locked {
            title: course.title.clone(),
            required: course.access_tier,
        }
        .into());
    }
    app.progress_mut().start_course(&course.id).await;
    println!("Started {}", course.title);
    Ok(())
}

async fn lesson(app: &mut AppServices, args: &Args) -> CmdResult {
    let catalog = app.catalog();
    let course = resolve_course(&catalog, args.positional(0, "lesson", "course")?)?;
    let lesson_id: LessonId = args.positional(1, "lesson", "lesson-id")?.parse()?;
    let lesson = course.lesson(&lesson_id).ok_or_else(|| CommandError::NotFound {
        what: "lesson",
        key: lesson_id.to_string(),
    })?;
    if let Gate::Locked { required } = app.lesson_gate(lesson) {
        return Err(CommandError::Locked {
            title: lesson.title.clone(),
            required,
        }
        .into());
    }

    let outcome = app.progress_mut().finish_lesson(course, &lesson_id).await?;
    println!("Completed {} ({}%)", lesson.title, outcome.percentage);
    if outcome.course_completed {
        println!("Course complete: {}", course.title);
    } else if let Some(next) = outcome.next_lesson {
        println!("Next lesson: {next}");
    }
    Ok(())
}

async fn complete(app: &mut AppServices, args: &Args) -> CmdResult {
    let catalog = app.catalog();
    let course = resolve_course(&catalog, args.positional(0, "complete", "course")?)?;
    app.progress_mut().complete_course_checked(course).await?;
    println!("Course complete: {}", course.title);
    Ok(())
}

async fn view(app: &mut AppServices, args: &Args) -> CmdResult {
    let catalog = app.catalog();
    let key = args.positional(0, "view", "resource")?;
    let resource = catalog.find_resource(key).ok_or_else(|| CommandError::NotFound {
        what: "resource",
        key: key.to_owned(),
    })?;
    if let Gate::Locked { required } = app.resource_gate(resource) {
        return Err(CommandError::Locked {
            title: resource.title.clone(),
            required,
        }
        .into());
    }
    app.progress_mut().mark_resource_viewed(&resource.id).await;
    println!("{}: {}", resource.title, resource.description);
    Ok(())
}

fn progress(app: &AppServices, args: &Args) -> CmdResult {
    let summary = app.progress().summary();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Courses in progress: {}", summary.courses_in_progress);
    println!("Courses completed:   {}", summary.courses_completed);
    println!("Lessons completed:   {}", summary.lessons_completed);
    println!("Resources viewed:    {}", summary.resources_viewed);

    let catalog = app.catalog();
    for entry in app
        .progress()
        .progress()
        .courses_with_status(CourseStatus::InProgress)
    {
        if let Some(course) = catalog.course_by_id(entry.course_id().as_str()) {
            println!(
                "  {} - {}%",
                course.title,
                entry.completion_percentage(course.lesson_count())
            );
        }
    }
    Ok(())
}

fn export(app: &AppServices) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(app.progress().progress())?);
    Ok(())
}

/// Puts the sample learner part-way through the AI course.
async fn seed(app: &mut AppServices) -> CmdResult {
    let course_id = CourseId::new("course-ai-accessible-resources");
    let catalog = app.catalog();
    let course = catalog.course_by_id(course_id.as_str()).ok_or_else(|| CommandError::NotFound {
        what: "course",
        key: course_id.to_string(),
    })?;

    let progress = app.progress_mut();
    progress.start_course(&course.id).await;
    for lesson in course.lessons.iter().take(3) {
        progress.complete_lesson(&course.id, &lesson.id).await;
    }
    if let Some(resource) = catalog.featured_resources().first() {
        progress.mark_resource_viewed(&resource.id).await;
    }

    if !progress.is_persisted() {
        return Err(CommandError::NotPersisted.into());
    }
    println!("Seeded {} with 3 of {} lessons", course.title, course.lesson_count());
    Ok(())
}
