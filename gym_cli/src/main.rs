use chrono::{Duration, Local, NaiveDate, NaiveDateTime, Timelike};
use clap::{Parser, Subcommand};
use gymtrack_core::*;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gymtrack")]
#[command(about = "Workout session and daily challenge tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in workouts
    Workouts,

    /// Show the exercises of a workout day
    Show {
        /// Session type (A, B or C)
        session_type: SessionType,

        /// List every set as its own step
        #[arg(long)]
        steps: bool,
    },

    /// Run a workout now and record it when finished
    Start {
        /// Session type (A, B or C)
        session_type: SessionType,

        /// Finish immediately without prompting (for testing)
        #[arg(long, conflicts_with = "auto_abort")]
        auto_finish: bool,

        /// Abort immediately without prompting (for testing)
        #[arg(long, conflicts_with = "auto_finish")]
        auto_abort: bool,
    },

    /// Record a finished workout session
    Log {
        /// Session type (A, B or C)
        #[arg(long = "type")]
        session_type: SessionType,

        /// Duration in seconds
        #[arg(long)]
        duration: i64,

        /// Session date (YYYY-MM-DD), defaults to today
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,

        /// Start time (YYYY-MM-DDTHH:MM:SS), defaults to now
        #[arg(long, value_parser = parse_timestamp_arg)]
        started_at: Option<NaiveDateTime>,

        /// The workout was ended early
        #[arg(long)]
        partial: bool,
    },

    /// Show the most recently recorded session
    Last {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List sessions in a date range (default: last 30 days)
    History {
        #[arg(long, value_parser = parse_date_arg)]
        from: Option<NaiveDate>,

        #[arg(long, value_parser = parse_date_arg)]
        to: Option<NaiveDate>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record a completed daily challenge set
    Challenge {
        /// Challenge date (YYYY-MM-DD), defaults to today
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,

        /// Set the completed count instead of incrementing
        #[arg(long)]
        set: Option<i32>,
    },

    /// Show challenge completion and streaks
    Stats {
        #[arg(long, value_parser = parse_date_arg)]
        from: Option<NaiveDate>,

        #[arg(long, value_parser = parse_date_arg)]
        to: Option<NaiveDate>,
    },

    /// Export sessions to CSV
    Export {
        /// Output file
        #[arg(long)]
        output: PathBuf,

        #[arg(long, value_parser = parse_date_arg)]
        from: Option<NaiveDate>,

        #[arg(long, value_parser = parse_date_arg)]
        to: Option<NaiveDate>,
    },
}

fn parse_date_arg(s: &str) -> std::result::Result<NaiveDate, String> {
    parse_date(s).map_err(|e| e.to_string())
}

fn parse_timestamp_arg(s: &str) -> std::result::Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .map_err(|_| format!("Invalid timestamp '{}', expected YYYY-MM-DDTHH:MM:SS", s))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    // Stored timestamps have second precision
    now.with_nanosecond(0).unwrap_or(now)
}

/// Resolve an optional range, defaulting to the 30 days ending today
fn date_range(from: Option<NaiveDate>, to: Option<NaiveDate>) -> (NaiveDate, NaiveDate) {
    let to = to.unwrap_or_else(today);
    let from = from.unwrap_or(to - Duration::days(29));
    (from, to)
}

fn main() -> Result<()> {
    // Initialize logging
    gymtrack_core::logging::init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(data_dir) = cli.data_dir {
        config.data.data_dir = data_dir;
    }
    tracing::debug!("Using data directory {:?}", config.data.data_dir);

    let db = Database::open_with_config(&config)?;

    match cli.command {
        Commands::Workouts => cmd_workouts(&db),
        Commands::Show {
            session_type,
            steps,
        } => cmd_show(&db, session_type, steps),
        Commands::Start {
            session_type,
            auto_finish,
            auto_abort,
        } => cmd_start(&db, &config, session_type, auto_finish, auto_abort),
        Commands::Log {
            session_type,
            duration,
            date,
            started_at,
            partial,
        } => cmd_log(&db, session_type, duration, date, started_at, partial),
        Commands::Last { json } => cmd_last(&db, json),
        Commands::History { from, to, json } => cmd_history(&db, from, to, json),
        Commands::Challenge { date, set } => cmd_challenge(&db, date, set),
        Commands::Stats { from, to } => cmd_stats(&db, from, to),
        Commands::Export { output, from, to } => cmd_export(&db, output, from, to),
    }
}

fn cmd_workouts(db: &Database) -> Result<()> {
    for workout in db.all_workouts()? {
        let count = db.exercises_for_workout(workout.id)?.len();
        println!(
            "{}: {} ({} exercises)",
            workout.name, workout.description, count
        );
    }
    Ok(())
}

fn cmd_show(db: &Database, session_type: SessionType, steps: bool) -> Result<()> {
    let plan = WorkoutPlan::for_session(db, session_type)?;
    display_plan(&plan);

    if steps {
        println!();
        for (index, step) in plan.steps().iter().enumerate() {
            println!(
                "  {:>2}. {} (set {}/{}): {}, rest {}s",
                index + 1,
                step.name,
                step.set_number,
                step.total_sets,
                step.display,
                step.rest_seconds
            );
        }
    }
    Ok(())
}

fn display_plan(plan: &WorkoutPlan) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}", plan.workout_name);
    println!("╰─────────────────────────────────────────╯");
    println!();

    for exercise in &plan.exercises {
        let marker = if exercise.is_daily_challenge { " ★" } else { "" };
        if exercise.sets > 1 {
            println!(
                "  {}. {}{}: {} x {}",
                exercise.position + 1,
                exercise.name,
                marker,
                exercise.sets,
                exercise.display
            );
        } else {
            println!(
                "  {}. {}{}: {}",
                exercise.position + 1,
                exercise.name,
                marker,
                exercise.display
            );
        }
        if !exercise.advice.is_empty() {
            println!("     ℹ {}", exercise.advice);
        }
    }
    println!();
}

fn cmd_start(
    db: &Database,
    config: &Config,
    session_type: SessionType,
    auto_finish: bool,
    auto_abort: bool,
) -> Result<()> {
    let plan = WorkoutPlan::for_session(db, session_type)?;
    display_plan(&plan);

    let recorder = WorkoutRecorder::begin(
        db,
        NoopHealthTracker,
        session_type,
        now(),
        config.workout.discard_threshold_seconds,
    );

    let action = if auto_finish {
        UserAction::Finish
    } else if auto_abort {
        UserAction::Abort
    } else {
        prompt_user_action()?
    };

    match action {
        UserAction::Finish => {
            let session = recorder.finish(now())?;
            println!("\n✓ Workout finished! Session #{} logged.", session.id);
        }
        UserAction::Abort => {
            let session = recorder.abort(now())?;
            println!("\nWorkout aborted. Partial session #{} logged.", session.id);
        }
    }
    Ok(())
}

enum UserAction {
    Finish,
    Abort,
}

fn prompt_user_action() -> Result<UserAction> {
    println!("─────────────────────────────────────────");
    println!("Press Enter when done");
    println!("  'a' + Enter to abort");
    print!("> ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let action = match input.trim().to_lowercase().as_str() {
        "a" => UserAction::Abort,
        _ => UserAction::Finish,
    };

    Ok(action)
}

fn cmd_log(
    db: &Database,
    session_type: SessionType,
    duration: i64,
    date: Option<NaiveDate>,
    started_at: Option<NaiveDateTime>,
    partial: bool,
) -> Result<()> {
    if duration < 0 {
        return Err(Error::Other("Duration must not be negative".into()));
    }

    let started_at = started_at.unwrap_or_else(now);
    let date = date.unwrap_or(started_at.date());
    let session = db.insert_session(session_type, date, started_at, duration, partial)?;

    println!("✓ Session logged: {}", describe_session(&session));
    Ok(())
}

fn describe_session(session: &Session) -> String {
    format!(
        "#{} Day {} on {} at {} ({} min{})",
        session.id,
        session.session_type,
        session.date,
        session.started_at.format("%H:%M"),
        session.duration_seconds / 60,
        if session.is_partial { ", partial" } else { "" }
    )
}

fn cmd_last(db: &Database, json: bool) -> Result<()> {
    match db.last_session()? {
        Some(session) if json => println!("{}", serde_json::to_string_pretty(&session)?),
        Some(session) => println!("{}", describe_session(&session)),
        None => println!("No sessions recorded yet."),
    }
    Ok(())
}

fn cmd_history(
    db: &Database,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    json: bool,
) -> Result<()> {
    let (from, to) = date_range(from, to);
    let sessions = db.sessions_in_date_range(from, to)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }

    if sessions.is_empty() {
        println!("No sessions between {} and {}.", from, to);
        return Ok(());
    }
    for session in &sessions {
        println!("{}", describe_session(session));
    }
    Ok(())
}

fn cmd_challenge(db: &Database, date: Option<NaiveDate>, set: Option<i32>) -> Result<()> {
    let date = date.unwrap_or_else(today);
    let challenge = match set {
        Some(sets) if !(0..=CHALLENGE_SETS_TARGET).contains(&sets) => {
            tracing::warn!("Rejected challenge count {} for {}", sets, date);
            return Err(Error::Other(format!(
                "Completed sets must be between 0 and {}",
                CHALLENGE_SETS_TARGET
            )));
        }
        Some(sets) => db.upsert_challenge(date, sets)?,
        None => db.increment_challenge(date)?,
    };

    print!(
        "Daily challenge {}: {}/{} sets",
        challenge.date, challenge.sets_completed, CHALLENGE_SETS_TARGET
    );
    if challenge.is_complete() {
        print!(" ✓ complete");
    }
    println!();
    Ok(())
}

fn cmd_stats(db: &Database, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<()> {
    let (from, to) = date_range(from, to);
    let count = db.completed_challenge_count(from, to)?;
    let completed = db.completed_challenge_dates()?;
    let workout_days = db
        .non_partial_session_dates()?
        .into_iter()
        .filter(|d| *d >= from && *d <= to)
        .count();

    println!("Completed challenges ({} to {}): {}", from, to, count);
    println!("Workout days ({} to {}): {}", from, to, workout_days);
    println!("Current streak: {} days", current_streak(&completed, today()));
    println!("Longest streak: {} days", longest_streak(&completed));
    Ok(())
}

fn cmd_export(
    db: &Database,
    output: PathBuf,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<()> {
    let (from, to) = date_range(from, to);
    let count = export_sessions_csv(db, from, to, &output)?;
    println!("✓ Exported {} sessions to {}", count, output.display());
    Ok(())
}
