use std::io;

use chrono::{Datelike, Local, NaiveDate};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use crossterm::style::Stylize;
use itertools::Itertools;

use crate::{
    calendar::{self, DayTiming},
    color::{hex_to_rgba, parse_hex_rgb},
    constants::{DAYS_PER_WEEK, TINT_ALPHA, WEEKDAY_NAMES},
    domain::{ExerciseId, Snapshot, TintKey},
    resolver::{self, ScheduleSource},
    storage::JsonDirStore,
    store::ScheduleStore,
    styling,
};

#[derive(Parser, Debug)]
#[command(name = "trainplan")]
#[command(about = "Weekly exercise plan with per-day overrides", long_about = None)]
pub enum Cli {
    #[command(about = "Print a month calendar")]
    Month {
        #[arg(
            long,
            help = "Year 1-9999 (defaults to the current year)",
            value_parser = clap::value_parser!(i32).range(1..=9999)
        )]
        year: Option<i32>,

        #[arg(
            long,
            help = "Month 1-12 (defaults to the current month)",
            value_parser = clap::value_parser!(u32).range(1..=12)
        )]
        month: Option<u32>,
    },

    #[command(about = "Show the exercises that apply to a date")]
    Day {
        #[arg(help = "Date (YYYY-MM-DD)", value_parser = parse_date)]
        date: NaiveDate,
    },

    #[command(about = "Add or remove an exercise on a single date")]
    Toggle {
        #[arg(help = "Date (YYYY-MM-DD)", value_parser = parse_date)]
        date: NaiveDate,

        #[arg(help = "Exercise ID")]
        exercise: String,

        #[arg(long, help = "Remove the exercise instead of adding it")]
        off: bool,
    },

    #[command(about = "Make a date follow the weekly schedule again")]
    Reset {
        #[arg(help = "Date (YYYY-MM-DD)", value_parser = parse_date)]
        date: NaiveDate,
    },

    #[command(subcommand, about = "Show or edit the weekly schedule")]
    Weekly(WeeklyCommand),

    #[command(subcommand, about = "Manage exercises")]
    Exercise(ExerciseCommand),

    #[command(subcommand, about = "Manage tint colors")]
    Tint(TintCommand),

    #[command(about = "Convert a hex color to rgba()")]
    Rgba {
        #[arg(help = "Hex color (#rgb or #rrggbb)")]
        hex: String,

        #[arg(long, default_value_t = TINT_ALPHA, help = "Alpha channel")]
        alpha: f32,
    },

    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(help = "Shell type (bash, zsh, fish)")]
        shell: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum WeeklyCommand {
    #[command(about = "Print the weekly schedule")]
    Show,

    #[command(about = "Replace one weekday's exercises")]
    Set {
        #[arg(help = "Weekday (0-6 or name, 0 = Sunday)", value_parser = parse_weekday)]
        weekday: usize,

        #[arg(help = "Exercise IDs in order")]
        exercises: Vec<String>,
    },

    #[command(about = "Add or remove one exercise on a weekday")]
    Toggle {
        #[arg(help = "Weekday (0-6 or name, 0 = Sunday)", value_parser = parse_weekday)]
        weekday: usize,

        #[arg(help = "Exercise ID")]
        exercise: String,

        #[arg(long, help = "Remove the exercise instead of adding it")]
        off: bool,
    },

    #[command(about = "Remove an exercise from every weekday")]
    Clear {
        #[arg(help = "Exercise ID")]
        exercise: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ExerciseCommand {
    #[command(about = "List exercises")]
    List,

    #[command(about = "Add an exercise")]
    Add {
        #[arg(help = "Display name")]
        name: String,

        #[arg(long, default_value = "", help = "Icon (emoji)")]
        icon: String,
    },

    #[command(about = "Rename an exercise")]
    Rename {
        #[arg(help = "Exercise ID")]
        id: String,

        #[arg(help = "New name")]
        name: String,
    },

    #[command(about = "Change an exercise icon")]
    Icon {
        #[arg(help = "Exercise ID")]
        id: String,

        #[arg(help = "New icon")]
        icon: String,
    },

    #[command(about = "Remove an exercise and drop it from the weekly schedule")]
    Remove {
        #[arg(help = "Exercise ID")]
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum TintCommand {
    #[command(about = "Set the tint used for an exercise on past days")]
    Set {
        #[arg(help = "Exercise ID")]
        id: String,

        #[arg(help = "Hex color")]
        color: String,
    },

    #[command(about = "Remove an exercise tint")]
    Clear {
        #[arg(help = "Exercise ID")]
        id: String,
    },

    #[command(about = "Set a palette color")]
    Palette {
        #[arg(value_enum, help = "Palette entry")]
        key: PaletteKey,

        #[arg(help = "Color or gradient")]
        value: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PaletteKey {
    Swim,
    Gym,
    SwimGym,
}

impl From<PaletteKey> for TintKey {
    fn from(key: PaletteKey) -> Self {
        match key {
            PaletteKey::Swim => TintKey::Swim,
            PaletteKey::Gym => TintKey::Gym,
            PaletteKey::SwimGym => TintKey::SwimGym,
        }
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| format!("'{}' is not a YYYY-MM-DD date: {}", raw, e))
}

pub fn parse_weekday(raw: &str) -> Result<usize, String> {
    let value = raw.trim().to_lowercase();
    if let Ok(index) = value.parse::<usize>() {
        return if index < DAYS_PER_WEEK {
            Ok(index)
        } else {
            Err(format!("weekday {} is out of range 0-6", index))
        };
    }

    WEEKDAY_NAMES
        .iter()
        .position(|name| {
            let name = name.to_lowercase();
            value.len() >= 2 && name.starts_with(&value)
        })
        .ok_or_else(|| format!("'{}' is not a weekday", raw))
}

/// Terminal columns, counting emoji as two and joiners/selectors as zero.
fn display_width(text: &str) -> usize {
    text.chars()
        .map(|c| match c {
            '\u{200d}' | '\u{fe0e}' | '\u{fe0f}' => 0,
            c if c.is_ascii() => 1,
            _ => 2,
        })
        .sum()
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(display_width(text));
    format!("{}{}", text, " ".repeat(fill))
}

fn open_store() -> ScheduleStore<JsonDirStore> {
    let (store, report) = ScheduleStore::open(JsonDirStore::open_default());
    for (key, status) in report.entries() {
        if !status.is_loaded() {
            log::info!("{}: {}", key, status);
        }
    }
    store
}

fn exercise_label(snapshot: &Snapshot, id: &ExerciseId) -> String {
    match snapshot.exercise(id) {
        Some(exercise) => format!("{} {} ({})", exercise.icon, exercise.name, exercise.id),
        None => format!("? {} (deleted)", id),
    }
}

pub fn render_month(snapshot: &Snapshot, year: i32, month: u32, today: NaiveDate) -> Vec<String> {
    const CELL_WIDTH: usize = 10;

    let grid = calendar::build_month_grid(year, month);
    let mut lines = vec![
        format!("{} {}", calendar::month_name(month), year),
        WEEKDAY_NAMES
            .iter()
            .map(|name| pad(&name[..3], CELL_WIDTH))
            .join(""),
    ];

    for row in calendar::grid_rows(&grid) {
        let line = row
            .iter()
            .map(|cell| {
                let exercises = cell
                    .date()
                    .map(|date| resolver::effective_exercises(snapshot, date))
                    .unwrap_or_default();
                let timing = DayTiming::classify(cell, today);
                let marker = if styling::is_active(&exercises, timing.is_past) {
                    "*"
                } else {
                    " "
                };
                let text = format!(
                    "{:>2}{} {}",
                    cell.day,
                    marker,
                    snapshot.icons_for(&exercises).concat()
                );
                let text = pad(&text, CELL_WIDTH);

                if timing.is_overflow {
                    text.dark_grey().to_string()
                } else if timing.is_today {
                    text.bold().underlined().to_string()
                } else if timing.is_past {
                    text.green().to_string()
                } else {
                    text
                }
            })
            .join("");
        lines.push(line);
    }

    lines
}

pub fn show_month(year: Option<i32>, month: Option<u32>) -> Result<(), String> {
    let store = open_store();
    let today = Local::now().date_naive();
    let year = year.unwrap_or_else(|| today.year());
    let month = month.map(|m| m - 1).unwrap_or_else(|| today.month0());

    for line in render_month(store.snapshot(), year, month, today) {
        println!("{}", line);
    }
    Ok(())
}

pub fn show_day(date: NaiveDate) -> Result<(), String> {
    let store = open_store();
    let snapshot = store.snapshot();
    let (exercises, source) = resolver::resolve(snapshot, date);
    let weekday = date.weekday().num_days_from_sunday() as usize;

    let source = match source {
        ScheduleSource::Override => "override",
        ScheduleSource::Weekly => "weekly schedule",
    };
    println!(
        "{} ({}) from {}",
        calendar::date_key(date),
        WEEKDAY_NAMES[weekday],
        source
    );
    if exercises.is_empty() {
        println!("  nothing scheduled");
    }
    for id in &exercises {
        println!("  {}", exercise_label(snapshot, id));
    }

    if let Some(tint) = styling::background_tint(&exercises, true, &snapshot.tint_by_exercise_id)
    {
        println!("Tint once past: {}", tint);
    }
    Ok(())
}

pub fn toggle_day(date: NaiveDate, exercise: String, off: bool) -> Result<(), String> {
    let mut store = open_store();
    let id = ExerciseId(exercise);
    if !store.snapshot().has_exercise(&id) {
        return Err(format!("Exercise '{}' not found", id));
    }

    let result = resolver::toggle_exercise_on_date(&mut store, date, &id, !off)
        .map_err(|e| e.to_string())?;
    if result.is_empty() {
        println!(
            "{} now follows the weekly schedule",
            calendar::date_key(date)
        );
    } else {
        println!(
            "{}: {}",
            calendar::date_key(date),
            result.iter().map(|id| exercise_label(store.snapshot(), id)).join(", ")
        );
    }
    Ok(())
}

pub fn reset_day(date: NaiveDate) -> Result<(), String> {
    let mut store = open_store();
    let removed = resolver::reset_date_to_weekly(&mut store, date).map_err(|e| e.to_string())?;
    if removed {
        println!("{} reset to the weekly schedule", calendar::date_key(date));
    } else {
        println!("{} had no override", calendar::date_key(date));
    }
    Ok(())
}

pub fn run_weekly(command: WeeklyCommand) -> Result<(), String> {
    let mut store = open_store();
    match command {
        WeeklyCommand::Show => {}
        WeeklyCommand::Set { weekday, exercises } => {
            let ids = exercises.into_iter().map(ExerciseId).collect();
            store
                .set_weekly_day(weekday, ids)
                .map_err(|e| e.to_string())?;
        }
        WeeklyCommand::Toggle {
            weekday,
            exercise,
            off,
        } => {
            store
                .set_weekly_exercise(weekday, &ExerciseId(exercise), !off)
                .map_err(|e| e.to_string())?;
        }
        WeeklyCommand::Clear { exercise } => {
            let id = ExerciseId(exercise);
            let removed =
                resolver::remove_exercise_everywhere(&mut store, &id).map_err(|e| e.to_string())?;
            println!("Removed {} from {} weekday(s)", id, removed);
        }
    }

    let snapshot = store.snapshot();
    for (weekday, ids) in snapshot.weekly_schedule.days() {
        let listed = if ids.is_empty() {
            "-".to_string()
        } else {
            ids.iter().map(|id| exercise_label(snapshot, id)).join(", ")
        };
        println!("{:10} {}", WEEKDAY_NAMES[weekday], listed);
    }
    Ok(())
}

pub fn run_exercise(command: ExerciseCommand) -> Result<(), String> {
    let mut store = open_store();
    match command {
        ExerciseCommand::List => {
            let snapshot = store.snapshot();
            for exercise in &snapshot.exercises {
                let tint = snapshot
                    .tint_by_exercise_id
                    .get(&exercise.id)
                    .map(String::as_str)
                    .unwrap_or("-");
                println!(
                    "{:10} {} {:20} {}",
                    exercise.id.as_str(),
                    pad(&exercise.icon, 2),
                    exercise.name,
                    tint
                );
            }
        }
        ExerciseCommand::Add { name, icon } => {
            let id = store.add_exercise(&name, &icon).map_err(|e| e.to_string())?;
            println!("Added {}", exercise_label(store.snapshot(), &id));
        }
        ExerciseCommand::Rename { id, name } => {
            let id = ExerciseId(id);
            store
                .rename_exercise(&id, &name)
                .map_err(|e| e.to_string())?;
            println!("Renamed to {}", exercise_label(store.snapshot(), &id));
        }
        ExerciseCommand::Icon { id, icon } => {
            let id = ExerciseId(id);
            store
                .set_exercise_icon(&id, &icon)
                .map_err(|e| e.to_string())?;
            println!("Updated {}", exercise_label(store.snapshot(), &id));
        }
        ExerciseCommand::Remove { id } => {
            let removed = store
                .remove_exercise(&ExerciseId(id))
                .map_err(|e| e.to_string())?;
            println!("Removed {} {}", removed.icon, removed.name);
            let dangling = store
                .snapshot()
                .overrides
                .values()
                .filter(|ids| ids.contains(&removed.id))
                .count();
            if dangling > 0 {
                println!(
                    "{} date override(s) still reference '{}'",
                    dangling, removed.id
                );
            }
        }
    }
    Ok(())
}

pub fn run_tint(command: TintCommand) -> Result<(), String> {
    let mut store = open_store();
    match command {
        TintCommand::Set { id, color } => {
            if parse_hex_rgb(&color).is_none() {
                return Err(format!("'{}' is not a hex color (#rgb or #rrggbb)", color));
            }
            let id = ExerciseId(id);
            store
                .set_exercise_tint(&id, &color)
                .map_err(|e| e.to_string())?;
            println!("{} -> {}", id, hex_to_rgba(color.trim(), TINT_ALPHA));
        }
        TintCommand::Clear { id } => {
            let id = ExerciseId(id);
            let cleared = store.clear_exercise_tint(&id).map_err(|e| e.to_string())?;
            if cleared {
                println!("Cleared tint for {}", id);
            } else {
                println!("{} had no tint", id);
            }
        }
        TintCommand::Palette { key, value } => {
            let key = TintKey::from(key);
            store.set_tint_color(key, &value).map_err(|e| e.to_string())?;
            println!(
                "{} = {}",
                key.field_name(),
                store.snapshot().tint_colors.get(key)
            );
        }
    }
    Ok(())
}

pub fn print_completions(shell: &str) -> Result<(), String> {
    use clap_complete::Shell;
    let shell = match shell {
        "bash" => Shell::Bash,
        "zsh" => Shell::Zsh,
        "fish" => Shell::Fish,
        _ => {
            return Err(format!(
                "Unsupported shell: {}. Use bash, zsh, or fish.",
                shell
            ));
        }
    };
    clap_complete::generate(shell, &mut Cli::command(), "trainplan", &mut io::stdout());
    Ok(())
}

pub fn run_cli() {
    let cli = Cli::parse();
    let result = match cli {
        Cli::Month { year, month } => show_month(year, month),
        Cli::Day { date } => show_day(date),
        Cli::Toggle {
            date,
            exercise,
            off,
        } => toggle_day(date, exercise, off),
        Cli::Reset { date } => reset_day(date),
        Cli::Weekly(command) => run_weekly(command),
        Cli::Exercise(command) => run_exercise(command),
        Cli::Tint(command) => run_tint(command),
        Cli::Rgba { hex, alpha } => {
            println!("{}", hex_to_rgba(&hex, alpha));
            Ok(())
        }
        Cli::Completions { shell } => print_completions(&shell),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_weekday_accepts_numbers_and_names() {
        assert_eq!(parse_weekday("0"), Ok(0));
        assert_eq!(parse_weekday("wed"), Ok(3));
        assert_eq!(parse_weekday("Saturday"), Ok(6));
        assert_eq!(parse_weekday("th"), Ok(4));
        assert!(parse_weekday("7").is_err());
        assert!(parse_weekday("x").is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-01-05"),
            Ok(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap())
        );
        assert!(parse_date("2024-13-01").is_err());
    }

    #[test]
    fn test_display_width_counts_emoji_as_two() {
        assert_eq!(display_width(" 5  "), 4);
        assert_eq!(display_width("🏃"), 2);
        assert_eq!(display_width("🏋️"), 2);
        assert_eq!(pad("🌊", 4), "🌊  ");
    }

    #[test]
    fn test_render_month_has_header_and_six_weeks() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let lines = render_month(&Snapshot::default(), 2024, 0, today);
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "January 2024");
        assert!(lines[1].starts_with("Sun"));
    }

    #[test]
    fn test_cli_parses_nested_commands() {
        let cli = Cli::try_parse_from(["trainplan", "weekly", "set", "wed", "bike", "swim"]).unwrap();
        match cli {
            Cli::Weekly(WeeklyCommand::Set { weekday, exercises }) => {
                assert_eq!(weekday, 3);
                assert_eq!(exercises, vec!["bike", "swim"]);
            }
            other => panic!("unexpected {:?}", other),
        }

        let cli = Cli::try_parse_from(["trainplan", "tint", "palette", "swim-gym", "#fff"]).unwrap();
        assert!(matches!(
            cli,
            Cli::Tint(TintCommand::Palette {
                key: PaletteKey::SwimGym,
                ..
            })
        ));

        assert!(Cli::try_parse_from(["trainplan", "month", "--month", "13"]).is_err());
        assert!(
            Cli::try_parse_from(["trainplan", "month", "--year", "2147483647", "--month", "12"])
                .is_err()
        );
        assert!(Cli::try_parse_from(["trainplan", "month", "--year", "2024", "--month", "12"]).is_ok());
    }
}
