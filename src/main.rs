//! Career Forge - interactive character build
//!
//! Picks a background and a career, prompts for every skill choice and the
//! finalization steps on stdin, then prints the finished character as JSON.

use career_forge::character::RngRoller;
use career_forge::core::{BuildError, Characteristic, Result};
use career_forge::finalize::{Benefit, CareerOption, ImprovementPick, Stage};
use career_forge::rules::{self, PackageBook, Rules};
use career_forge::skills::{CandidateStatus, Resolution};
use career_forge::BuildSession;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Build a character from a background and a career
#[derive(Parser, Debug)]
#[command(name = "career-forge")]
#[command(about = "Resolve skill grants and finalize a character build")]
struct Args {
    /// Background package name
    #[arg(long, short = 'b')]
    background: Option<String>,

    /// Career package name
    #[arg(long, short = 'c')]
    career: Option<String>,

    /// Rule tables (TOML); built-in tables if omitted
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Package book (TOML); built-in packages if omitted
    #[arg(long)]
    packages: Option<PathBuf>,

    /// Random seed for characteristic and age rolls
    #[arg(long)]
    seed: Option<u64>,

    /// List the available packages and exit
    #[arg(long)]
    list: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("career_forge=info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let tables = match &args.rules {
        Some(path) => rules::load_rules(path)?,
        None => Rules::standard(),
    };
    let book = match &args.packages {
        Some(path) => rules::load_packages(path)?,
        None => rules::builtin_packages()?,
    };

    if args.list {
        list_packages(&book);
        return Ok(());
    }

    let mut input = Prompt::new();

    let background = match &args.background {
        Some(name) => book.background(name)?.clone(),
        None => {
            let names: Vec<&str> = book.backgrounds.iter().map(|p| p.name.as_str()).collect();
            let index = input.pick("Background", &names)?;
            book.backgrounds[index].clone()
        }
    };
    let career = match &args.career {
        Some(name) => book.career(name)?.clone(),
        None => {
            let names: Vec<&str> = book.careers.iter().map(|p| p.name.as_str()).collect();
            let index = input.pick("Career", &names)?;
            book.careers[index].clone()
        }
    };

    let mut session = BuildSession::new(tables, background, career)?;

    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!("Seed: {}", seed);
    let mut roller = RngRoller::seeded(seed);
    session.roll_characteristics(&mut roller);
    session.roll_age(&mut roller);

    resolve_choices(&mut session, &mut input)?;
    print_skills(&session)?;

    session.begin_finalization()?;
    loop {
        match session.stage() {
            Stage::CareerOption => choose_career_option(&mut session, &mut input)?,
            Stage::SkillImprovement(option) => {
                if session.has_pending_choices() {
                    resolve_choices(&mut session, &mut input)?;
                } else {
                    choose_improvements(&mut session, option, &mut input)?;
                }
            }
            Stage::Benefits => {
                print_skills(&session)?;
                choose_benefit(&mut session, &mut input)?;
                break;
            }
            Stage::Review | Stage::Complete => break,
        }
    }

    let character = session.complete()?;
    println!("{}", character.to_json()?);
    Ok(())
}

fn list_packages(book: &PackageBook) {
    println!("Backgrounds:");
    for package in &book.backgrounds {
        println!("  {:<14} {}", package.name, package.description);
    }
    println!("Careers:");
    for package in &book.careers {
        println!("  {:<14} {}", package.name, package.description);
    }
}

fn print_skills(session: &BuildSession) -> Result<()> {
    println!("\nSkills:");
    for skill in session.skills()? {
        println!("  {:<28} {}", skill.name, skill.level);
    }
    Ok(())
}

fn resolve_choices(session: &mut BuildSession, input: &mut Prompt) -> Result<()> {
    while let Some(choice) = session.current_choice() {
        println!(
            "\n{} (granted at level {}, currently {})",
            choice.skill_name, choice.granted_level, choice.current_level
        );
        for candidate in &choice.candidates {
            let note = match candidate.status {
                CandidateStatus::New => "new".to_string(),
                CandidateStatus::LevelUp => format!("level up from {}", candidate.existing_level),
                CandidateStatus::Blocked => format!("blocked: {}", candidate.reason),
            };
            println!("  {:<20} {}", candidate.specialization, note);
        }

        let answer = input.line("Specialization")?;
        match session.choose(&answer) {
            Ok(Resolution::Resolved { removed, .. }) if !removed.is_empty() => {
                println!("Replaced {}", removed.join(", "));
            }
            Ok(_) => {}
            Err(BuildError::Choice(err)) => println!("{}", err),
            Err(err) => return Err(err),
        }
    }
    Ok(())
}

fn choose_career_option(session: &mut BuildSession, input: &mut Prompt) -> Result<()> {
    let config = session.rules().config.clone();
    let labels: Vec<String> = CareerOption::all().iter().map(|o| o.label(&config)).collect();
    let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
    let index = input.pick("Career option", &labels)?;
    session.select_career_option(CareerOption::all()[index])
}

fn choose_improvements(
    session: &mut BuildSession,
    option: CareerOption,
    input: &mut Prompt,
) -> Result<()> {
    let pick = match option {
        CareerOption::RaiseToMax => {
            let answer = input.line("Skill to raise (or 'back')")?;
            if answer.eq_ignore_ascii_case("back") {
                return session.back_to_career_option();
            }
            ImprovementPick::RaiseToMax(answer)
        }
        CareerOption::RaiseThree => {
            let count = session.rules().config.raise_three_count;
            let answer = input.line(&format!("{} skills, comma separated (or 'back')", count))?;
            if answer.eq_ignore_ascii_case("back") {
                return session.back_to_career_option();
            }
            ImprovementPick::RaiseThree(
                answer
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            )
        }
        CareerOption::SkillPair => {
            let labels: Vec<String> = session.rules().skill_pairs.iter().map(|p| p.label()).collect();
            let mut labels: Vec<&str> = labels.iter().map(String::as_str).collect();
            labels.push("back");
            let index = input.pick("Skill pair", &labels)?;
            if index == labels.len() - 1 {
                return session.back_to_career_option();
            }
            ImprovementPick::SkillPair(index)
        }
    };

    match session.select_improvements(pick) {
        Ok(()) => Ok(()),
        Err(BuildError::Step(err)) => {
            println!("{}", err);
            Ok(())
        }
        Err(err) => Err(err),
    }
}

fn choose_benefit(session: &mut BuildSession, input: &mut Prompt) -> Result<()> {
    let benefits = Benefit::all();
    let labels: Vec<String> = benefits.iter().map(|b| b.label()).collect();
    let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
    let index = input.pick("Benefit", &labels)?;
    session.select_benefit(benefits[index])?;

    let stats = session.characteristics()?;
    let line: Vec<String> = Characteristic::all()
        .iter()
        .map(|c| format!("{} {}", c, stats.get(*c)))
        .collect();
    println!("{}", line.join("  "));
    Ok(())
}

/// Line-oriented stdin prompts
struct Prompt {
    lines: io::Lines<io::StdinLock<'static>>,
}

impl Prompt {
    fn new() -> Self {
        Self {
            lines: io::stdin().lock().lines(),
        }
    }

    fn line(&mut self, label: &str) -> Result<String> {
        print!("{}> ", label);
        io::stdout().flush()?;
        match self.lines.next() {
            Some(line) => Ok(line?.trim().to_string()),
            None => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed").into()),
        }
    }

    /// Numbered menu; returns a 0-based index
    fn pick(&mut self, label: &str, options: &[&str]) -> Result<usize> {
        if options.is_empty() {
            return Err(BuildError::Config(format!("nothing to choose for {}", label)));
        }
        println!("\n{}:", label);
        for (i, option) in options.iter().enumerate() {
            println!("  {}. {}", i + 1, option);
        }
        loop {
            let answer = self.line(label)?;
            match answer.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(n - 1),
                _ => println!("Enter a number from 1 to {}", options.len()),
            }
        }
    }
}
