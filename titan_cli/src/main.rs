use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use titan_core::*;

#[derive(Parser)]
#[command(name = "titan")]
#[command(about = "Gym workout logger with calorie estimates", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override body weight in kg
    #[arg(long, global = true)]
    weight: Option<f64>,

    /// Record entries at this local time instead of now (YYYY-MM-DDTHH:MM:SS)
    #[arg(long, global = true, hide = true)]
    recorded_at: Option<NaiveDateTime>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(clap::Args)]
struct ExerciseArgs {
    /// Exercise name, e.g. "Bench Press"
    #[arg(required = true, num_args = 1..)]
    exercise: Vec<String>,

    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..=10))]
    sets: u32,

    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=50))]
    reps: u32,
}

impl ExerciseArgs {
    fn name(&self) -> String {
        self.exercise.join(" ")
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List available exercises and their MET values
    Exercises,

    /// Show the calorie estimate for an exercise without logging it
    Estimate(ExerciseArgs),

    /// Log a single exercise straight to history
    Log(ExerciseArgs),

    /// Build up a workout interactively, then save it in one go
    Session,

    /// List all logged exercises
    History,

    /// Totals and burn per day (default)
    Summary,

    /// Body-mass index from profile weight and height
    Bmi {
        /// Override height in metres
        #[arg(long)]
        height: Option<f64>,
    },

    /// Export history as CSV
    Export {
        /// Output file
        path: PathBuf,
    },
}

/// Everything a command needs, resolved from config and flags
struct App {
    config: Config,
    catalog: ExerciseCatalog,
    estimator: CalorieEstimator,
    store_path: PathBuf,
    weight_kg: f64,
    recorded_at: Option<NaiveDateTime>,
}

impl App {
    fn from_cli(cli: &Cli) -> Result<Self> {
        let config = match &cli.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        let data_dir = cli
            .data_dir
            .clone()
            .unwrap_or_else(|| config.data.data_dir.clone());
        let store_path = data_dir.join(config::STORE_FILE_NAME);

        let catalog = ExerciseCatalog::default().with_custom(config.exercises.custom.clone());
        let errors = catalog.validate();
        if !errors.is_empty() {
            eprintln!("Catalog validation errors:");
            for error in &errors {
                eprintln!("  - {}", error);
            }
            return Err(Error::Config("Invalid exercise catalog".into()));
        }

        let estimator = CalorieEstimator::new(config.estimator.clone())?;
        let weight_kg = cli.weight.unwrap_or(config.profile.weight_kg);

        Ok(Self {
            config,
            catalog,
            estimator,
            store_path,
            weight_kg,
            recorded_at: cli.recorded_at,
        })
    }

    fn now(&self) -> NaiveDateTime {
        self.recorded_at
            .unwrap_or_else(|| chrono::Local::now().naive_local())
    }

    fn record(&self, name: &str, sets: u32, reps: u32) -> Result<WorkoutEntry> {
        let exercise = self.catalog.require(name)?;
        WorkoutEntry::record(exercise, sets, reps, self.weight_kg, &self.estimator, self.now())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    titan_core::logging::init(cli.verbose);

    let app = App::from_cli(&cli)?;
    tracing::debug!("Using store {:?}", app.store_path);

    match cli.command.unwrap_or(Commands::Summary) {
        Commands::Exercises => cmd_exercises(&app),
        Commands::Estimate(args) => cmd_estimate(&app, &args),
        Commands::Log(args) => cmd_log(&app, &args),
        Commands::Session => {
            let stdin = io::stdin();
            cmd_session(&app, stdin.lock())
        }
        Commands::History => cmd_history(&app),
        Commands::Summary => cmd_summary(&app),
        Commands::Bmi { height } => cmd_bmi(&app, height),
        Commands::Export { path } => cmd_export(&app, path),
    }
}

fn cmd_exercises(app: &App) -> Result<()> {
    for def in app.catalog.iter() {
        println!(
            "  {} {:<20} MET {:>4.1}",
            def.icon.as_deref().unwrap_or(" "),
            def.name,
            def.met
        );
    }
    Ok(())
}

fn cmd_estimate(app: &App, args: &ExerciseArgs) -> Result<()> {
    let exercise = app.catalog.require(&args.name())?;
    let kcal = app
        .estimator
        .estimate(exercise.met, app.weight_kg, args.sets, args.reps)?;

    println!(
        "{}: {} sets × {} reps at {} kg ≈ {:.1} kcal",
        exercise.name, args.sets, args.reps, app.weight_kg, kcal
    );
    println!("\n[Estimate only - not logging]");
    Ok(())
}

fn cmd_log(app: &App, args: &ExerciseArgs) -> Result<()> {
    let entry = app.record(&args.name(), args.sets, args.reps)?;
    let mut store = WorkoutStore::load(&app.store_path);
    store.append(entry.clone())?;

    println!("✓ Logged {}", format_entry(&entry));
    Ok(())
}

fn cmd_session(app: &App, input: impl BufRead) -> Result<()> {
    let mut session = PendingSession::new();

    println!("Current session - enter exercises as: <sets> <reps> <exercise>");
    println!("  'list' to review, 'finish' to save, 'discard' to drop everything");

    let mut lines = input.lines();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };

        match line.trim().to_lowercase().as_str() {
            "" => continue,
            "list" => {
                print_session(&session);
                continue;
            }
            "finish" | "f" => {
                if session.is_empty() {
                    println!("\nStack is empty. Add an exercise to begin.");
                    continue;
                }
                let mut store = WorkoutStore::load(&app.store_path);
                let totals = session.totals();
                match session.finish(&mut store) {
                    Ok(count) => {
                        println!(
                            "\n✓ Session saved: {} exercises, {:.1} kcal",
                            count, totals.total_burn
                        );
                        return Ok(());
                    }
                    Err(e) => {
                        tracing::error!("Session commit failed: {}", e);
                        println!("  ! Could not save session: {}", e);
                        println!(
                            "  {} exercises still pending; 'finish' to retry or 'discard'",
                            session.len()
                        );
                        continue;
                    }
                }
            }
            "discard" | "quit" | "q" => {
                let dropped = session.discard();
                println!("\nSession discarded ({} exercises not saved)", dropped);
                return Ok(());
            }
            _ => {}
        }

        match parse_session_line(&line).and_then(|(sets, reps, name)| app.record(&name, sets, reps)) {
            Ok(entry) => {
                println!("  + {}", format_entry(&entry));
                session.add(entry);
            }
            Err(e) => println!("  ! {}", e),
        }
    }

    if !session.is_empty() {
        tracing::warn!(
            "Input ended before 'finish'; {} exercises were not saved",
            session.len()
        );
        println!("\nSession discarded ({} exercises not saved)", session.discard());
    }
    Ok(())
}

/// Parse `<sets> <reps> <exercise name>`
fn parse_session_line(line: &str) -> Result<(u32, u32, String)> {
    let usage = || Error::InvalidParameter("expected: <sets> <reps> <exercise>".into());

    let mut parts = line.split_whitespace();
    let sets: u32 = parts.next().and_then(|s| s.parse().ok()).ok_or_else(usage)?;
    let reps: u32 = parts.next().and_then(|s| s.parse().ok()).ok_or_else(usage)?;
    let name = parts.collect::<Vec<_>>().join(" ");
    if name.is_empty() {
        return Err(usage());
    }

    if !(1..=10).contains(&sets) {
        return Err(Error::InvalidParameter(format!("sets must be 1-10, got {}", sets)));
    }
    if !(1..=50).contains(&reps) {
        return Err(Error::InvalidParameter(format!("reps must be 1-50, got {}", reps)));
    }
    Ok((sets, reps, name))
}

fn print_session(session: &PendingSession) {
    if session.is_empty() {
        println!("  (empty)");
        return;
    }
    for entry in session.entries() {
        println!("  {}", format_entry(entry));
    }
    println!("  = {:.1} kcal pending", session.totals().total_burn);
}

fn cmd_history(app: &App) -> Result<()> {
    let store = WorkoutStore::load(&app.store_path);
    if store.all().is_empty() {
        println!("No workouts recorded yet.");
        return Ok(());
    }

    for entry in store.all() {
        println!(
            "{}  {}",
            entry.recorded_at().format("%Y-%m-%d %H:%M"),
            format_entry(entry)
        );
    }
    Ok(())
}

fn cmd_summary(app: &App) -> Result<()> {
    let store = WorkoutStore::load(&app.store_path);
    let log = store.log();
    if log.is_empty() {
        println!("No workouts recorded yet.");
        return Ok(());
    }

    let totals = log.totals();
    println!("Total burn: {:.1} kcal", totals.total_burn);
    println!("Total sets: {}", totals.total_sets);
    println!("Total reps: {}", totals.total_reps);
    println!("Entries:    {}", totals.count);

    println!("\nBurn by date:");
    for (date, burn) in log.group_by_date() {
        println!("  {}  {:>8.1} kcal", date, burn);
    }
    Ok(())
}

fn cmd_bmi(app: &App, height: Option<f64>) -> Result<()> {
    let height_m = height.unwrap_or(app.config.profile.height_m);
    let value = bmi(app.weight_kg, height_m)?;
    let category = BmiCategory::from_bmi(value);

    println!("BMI: {:.1} ({})", value, category);

    let width: u32 = 30;
    let marker = (gauge_percent(value) / 100.0 * f64::from(width)).round() as usize;
    let gauge: String = (0..=width as usize)
        .map(|i| if i == marker { '|' } else { '-' })
        .collect();
    println!("10 [{}] 40", gauge);
    Ok(())
}

fn cmd_export(app: &App, path: PathBuf) -> Result<()> {
    let store = WorkoutStore::load(&app.store_path);
    let count = export_csv(store.all(), &path)?;

    println!("✓ Exported {} entries", count);
    println!("  CSV: {}", path.display());
    Ok(())
}

fn format_entry(entry: &WorkoutEntry) -> String {
    format!(
        "{} {} {} × {} = {:.1} kcal",
        entry.icon().unwrap_or("•"),
        entry.exercise(),
        entry.sets(),
        entry.reps(),
        entry.burn_kcal()
    )
}
