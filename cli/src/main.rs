use std::path::PathBuf;

use clap::{Parser, Subcommand};
use flood_adventure::error::AppResult;
use flood_adventure::game::{
    Campaign, Catalog, Clock, Destination, GameEvent, LevelRun, PlaybackControl, Stage, Timing,
    TokioClock,
};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser, Debug)]
#[command(about = "Play and check Flood Adventure levels from the terminal", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the levels of a catalog
    Levels {
        /// Level catalog, the built-in one when omitted
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Check a level catalog for errors
    Validate {
        #[arg(long)]
        catalog: PathBuf,
    },

    /// Play a level, then carry on with the next ones
    Play {
        #[arg(long, default_value_t = 1)]
        level: u32,
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Open every level instead of unlocking them one by one
        #[arg(long, default_value_t = false)]
        free: bool,
        /// Skip the pauses after answers and the mini-game
        #[arg(long, default_value_t = false)]
        fast: bool,
    },
}

fn load(catalog: Option<PathBuf>) -> AppResult<Catalog> {
    let catalog = match catalog {
        Some(path) => Catalog::from_file(&path)?,
        None => Catalog::builtin()?,
    };
    Ok(catalog)
}

#[tokio::main]
async fn main() -> AppResult<()> {
    flood_adventure::setup_trace();
    let args = Cli::parse();

    match args.command {
        Commands::Levels { catalog } => {
            let campaign = Campaign::new(&load(catalog)?);
            for entry in campaign.entries() {
                let level = entry.level();
                println!(
                    "{:>3}. {:<24} {:<16} {:>3}% {}",
                    level.id(),
                    level.title(),
                    level.badge(),
                    entry.progress(),
                    if entry.unlocked() { "" } else { "(locked)" },
                );
            }
        }

        Commands::Validate { catalog } => match Catalog::from_file(&catalog) {
            Ok(catalog) => println!("ok: {} levels", catalog.entries().len()),
            Err(e) => {
                eprintln!("invalid catalog {}: {}", catalog.display(), e);
                std::process::exit(1);
            }
        },

        Commands::Play {
            level,
            catalog,
            free,
            fast,
        } => {
            let mut campaign = Campaign::new(&load(catalog)?);
            if free {
                campaign.unlock_all();
            }
            let timing = if fast {
                Timing::immediate()
            } else {
                Timing::default()
            };
            play(&mut campaign, level, timing).await?;
        }
    }

    Ok(())
}

async fn play(campaign: &mut Campaign, first_level: u32, timing: Timing) -> AppResult<()> {
    let clock = TokioClock;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut next_level = Some(first_level);

    while let Some(level_id) = next_level.take() {
        let mut run = match campaign.start(level_id, timing) {
            Ok(run) => run,
            Err(e) => {
                println!("{e}");
                return Ok(());
            }
        };

        while !run.is_complete() {
            render(&run);
            let Some(line) = lines.next_line().await? else {
                return Ok(());
            };
            let line = line.trim();
            if line == "quit" {
                return Ok(());
            }

            report(&handle(&mut run, line, clock.now()));

            while let Some(deadline) = run.next_deadline() {
                tokio::time::sleep_until(deadline).await;
                report(&run.poll(clock.now()));
            }
        }

        match campaign.complete(level_id) {
            Ok(Destination::Level(next)) => {
                println!("Press enter to continue to level {next}, or type quit.");
                match lines.next_line().await? {
                    Some(line) if line.trim() != "quit" => next_level = Some(next),
                    _ => {}
                }
            }
            Ok(Destination::Home) => println!("That was the last level. Well done!"),
            Err(e) => println!("{e}"),
        }
    }

    Ok(())
}

fn handle(run: &mut LevelRun, line: &str, now: tokio::time::Instant) -> Vec<GameEvent> {
    match run.stage() {
        Stage::Intro => run.start(now),
        Stage::VideoSegment(_) => {
            let control = match line {
                "play" => PlaybackControl::Play,
                "pause" => PlaybackControl::Pause,
                "replay" => PlaybackControl::Replay,
                _ => return run.end_segment(now),
            };
            run.playback(control);
            vec![]
        }
        Stage::MiniGame => match line.parse::<u32>() {
            Ok(id) => run.click_target(id, now),
            Err(_) => vec![],
        },
        Stage::Quiz if line == "restart" => run.restart_quiz(now),
        Stage::Quiz => match line.parse::<usize>() {
            Ok(choice) if choice > 0 => run.submit_answer(choice - 1, now),
            _ => vec![],
        },
        Stage::Completion => vec![],
    }
}

fn render(run: &LevelRun) {
    let level = run.level();
    match run.stage() {
        Stage::Intro => {
            println!("\n== Level {}: {} ==", level.id(), level.title());
            println!("{}", level.intro());
            println!("[enter] start learning");
        }
        Stage::VideoSegment(index) => {
            if let Some(segment) = level.segment(index) {
                println!("\n-- {} ({}/{}) --", segment.title(), index, level.segments().len());
                if run.playback_state().playing() {
                    for caption in segment.captions() {
                        println!("  {caption}");
                    }
                }
            }
            println!("[play|pause|replay] control the video, [enter] next");
        }
        Stage::MiniGame => {
            if let (Some(game), Some(board)) = (level.mini_game(), run.board()) {
                println!("\n{}", game.prompt());
                for target in board.targets() {
                    let (x, y) = target.position();
                    let mark = if target.found() { "*" } else { " " };
                    println!("  [{}] village {} at ({:.0}, {:.0})", mark, target.id(), x, y);
                }
                println!("found {}/{}, type a village number", board.found_count(), board.match_count());
            }
        }
        Stage::Quiz => {
            let quiz = run.quiz();
            let question = quiz.current_question();
            println!("\nQuestion {} of {}: {}", quiz.current_index() + 1, quiz.len(), question.prompt());
            for (i, option) in question.options().iter().enumerate() {
                println!("  {}) {} {}", i + 1, option.icon(), option.label());
            }
            if quiz.is_locked() {
                println!("[restart] try the quiz again");
            }
        }
        Stage::Completion => {}
    }
}

fn report(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::MatchFound { .. } => println!("Correct! That's flooded!"),
            GameEvent::NonMatchSelected { .. } => println!("Oops! That village is safe."),
            GameEvent::AllMatchesFound => println!("Amazing! You found all flooded areas!"),
            GameEvent::AnswerCorrect { .. } => println!("Correct! Great job, keep going!"),
            GameEvent::AnswerIncorrect { .. } => println!("Not quite! Think about what you learned."),
            GameEvent::QuizRestarted => println!("Starting the quiz over."),
            GameEvent::LevelComplete { badge, .. } => {
                println!("\nCongratulations! Badge earned: {badge}")
            }
            other => tracing::debug!("{:?}", other),
        }
    }
}
