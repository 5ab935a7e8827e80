use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use uiu_grades::config::{self, Config};
use uiu_grades::models::{AcademicStanding, PeerSubmission, ScholarshipGoal};
use uiu_grades::{cgpa, cohort, db, grades, import, logging, projection, report, validate};

#[derive(Parser)]
#[command(name = "uiu-grades")]
#[command(about = "CGPA calculator, goal planner and scholarship estimator for UIU", long_about = None)]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
    /// Verbose logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct StandingArgs {
    /// Credits completed so far
    #[arg(long)]
    completed_credits: f64,
    /// Current CGPA
    #[arg(long)]
    cgpa: f64,
}

impl StandingArgs {
    fn standing(&self) -> AcademicStanding {
        AcademicStanding {
            completed_credits: self.completed_credits,
            current_cgpa: self.cgpa,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show the grading table
    Grades,
    /// Term GPA of a course list
    Gpa {
        /// CSV with name,credits,grade
        #[arg(long)]
        courses: PathBuf,
    },
    /// Potential CGPA after new courses and retakes
    Potential {
        #[command(flatten)]
        standing: StandingArgs,
        /// CSV with name,credits,grade
        #[arg(long)]
        courses: Option<PathBuf>,
        /// CSV with name,credits,old_grade,new_grade
        #[arg(long)]
        retakes: Option<PathBuf>,
    },
    /// Required GPA and difficulty for a target CGPA
    Plan {
        #[command(flatten)]
        standing: StandingArgs,
        #[arg(long)]
        target: f64,
        /// Total credits of the degree program
        #[arg(long)]
        total_credits: f64,
        /// CSV with name,credits,old_grade,new_grade
        #[arg(long)]
        retakes: Option<PathBuf>,
        /// Write a markdown report here
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Estimate a scholarship tier without storing anything
    Rank {
        /// Leave out this user's stored submission so it is not counted twice
        #[arg(long)]
        user_id: Option<Uuid>,
        #[arg(long)]
        department: String,
        /// Defaults to the active trimester
        #[arg(long)]
        trimester: Option<String>,
        #[arg(long)]
        last_gpa: f64,
        #[arg(long)]
        cgpa: f64,
        /// Cohort CSV with last_term_gpa,overall_cgpa,submitted_at instead of Postgres
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Store a GPA submission and show the resulting tier
    Submit {
        #[arg(long)]
        user_id: Uuid,
        #[arg(long)]
        student_id: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        department: String,
        #[arg(long)]
        last_gpa: f64,
        #[arg(long)]
        cgpa: f64,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let env_file = config::load_env_file();
    logging::init(cli.verbose);

    match env_file {
        Ok(path) => debug!(path = %path.display(), "loaded .env"),
        Err(err) => debug!(error = %err, "no .env file loaded"),
    }

    let config = Config::from_env();

    match cli.command {
        Commands::Grades => {
            if cli.json {
                return print_json(&grades::GRADE_SCALE);
            }

            for entry in grades::GRADE_SCALE.iter() {
                println!("{:<3} {:.2}  {}", entry.letter, entry.point, entry.range);
            }
        }
        Commands::Gpa { courses } => {
            let courses = import::read_courses(&courses)?;
            validate::course_rows(&courses)?;
            let gpa = cgpa::term_gpa(&courses);

            if cli.json {
                return print_json(&gpa);
            }

            println!("Term GPA {:.2} across {} courses.", gpa, courses.len());
        }
        Commands::Potential {
            standing,
            courses,
            retakes,
        } => {
            let courses = match courses {
                Some(path) => import::read_courses(&path)?,
                None => Vec::new(),
            };
            let retakes = match retakes {
                Some(path) => import::read_retakes(&path)?,
                None => Vec::new(),
            };

            if courses.is_empty() && retakes.is_empty() {
                anyhow::bail!("add at least one course or retake");
            }

            let standing = standing.standing();
            validate::standing(&standing)?;
            validate::course_rows(&courses)?;
            validate::retake_rows(&retakes)?;

            let summary = cgpa::summarize(&standing, &courses, &retakes);

            if cli.json {
                return print_json(&summary);
            }

            println!(
                "Current semester GPA {:.2} ({} courses)",
                summary.term_gpa, summary.course_count
            );
            println!(
                "Potential CGPA {:.2} ({:+.3} change)",
                summary.potential_cgpa, summary.cgpa_change
            );
            println!(
                "Total credits {} (+{} new)",
                summary.total_future_credits, summary.new_course_credits
            );

            if summary.retake_count > 0 {
                println!(
                    "Retake improvement {:+.2} grade points ({} retakes)",
                    summary.retake_improvement, summary.retake_count
                );
            }
        }
        Commands::Plan {
            standing,
            target,
            total_credits,
            retakes,
            out,
        } => {
            let standing = standing.standing();
            let goal = ScholarshipGoal {
                target_cgpa: target,
                total_program_credits: total_credits,
            };
            validate::goal_request(&standing, &goal)?;

            let plan = projection::plan(&standing, &goal)?;
            let (retakes, outlook) = match retakes {
                Some(path) => {
                    let retakes = import::read_retakes(&path)?;
                    validate::retake_rows(&retakes)?;
                    let outlook = projection::retake_outlook(&standing, &goal, &retakes)?;
                    (retakes, Some(outlook))
                }
                None => (Vec::new(), None),
            };

            let rendered =
                report::build_goal_report(&standing, &goal, &plan, &retakes, outlook.as_ref());
            emit(cli.json, &(&plan, &outlook), &rendered, out.as_deref())?;
        }
        Commands::Rank {
            user_id,
            department,
            trimester,
            last_gpa,
            cgpa,
            csv,
            out,
        } => {
            let (trimester, mut peers) = match csv {
                Some(path) => {
                    let trimester =
                        trimester.unwrap_or_else(uiu_grades::trimester::current_trimester);
                    (trimester, import::read_cohort(&path)?)
                }
                None => {
                    let pool = connect(&config).await?;
                    let trimester = match trimester {
                        Some(value) => value,
                        None => db::active_trimester(&pool).await,
                    };
                    let peers =
                        db::fetch_cohort(&pool, &department, &trimester, user_id).await?;
                    (trimester, peers)
                }
            };
            validate::gpa_submission(&department, &trimester, last_gpa, cgpa)?;

            let submission = PeerSubmission {
                last_term_gpa: last_gpa,
                overall_cgpa: cgpa,
                submitted_at: Utc::now(),
            };
            peers.push(submission.clone());

            standing_report(
                cli.json,
                &department,
                &trimester,
                &submission,
                &peers,
                out.as_deref(),
            )?;
        }
        Commands::Submit {
            user_id,
            student_id,
            email,
            department,
            last_gpa,
            cgpa,
            out,
        } => {
            validate::email(&email)?;
            validate::student_id(&student_id)?;

            let pool = connect(&config).await?;
            let trimester = db::active_trimester(&pool).await;
            validate::gpa_submission(&department, &trimester, last_gpa, cgpa)?;

            let submission = db::upsert_submission(
                &pool,
                &db::NewSubmission {
                    user_id,
                    student_id: validate::format_student_id(&student_id),
                    email,
                    department: department.clone(),
                    trimester: trimester.clone(),
                    last_term_gpa: last_gpa,
                    overall_cgpa: cgpa,
                },
            )
            .await?;
            info!(%user_id, %department, %trimester, "submission stored");

            let peers = db::fetch_cohort(&pool, &department, &trimester, None).await?;
            standing_report(
                cli.json,
                &department,
                &trimester,
                &submission,
                &peers,
                out.as_deref(),
            )?;
        }
    }

    Ok(())
}

async fn connect(config: &Config) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(config.database_url()?)
        .await
        .context("failed to connect to Postgres")
}

fn standing_report(
    json: bool,
    department: &str,
    trimester: &str,
    submission: &PeerSubmission,
    peers: &[PeerSubmission],
    out: Option<&Path>,
) -> anyhow::Result<()> {
    let rank = cohort::rank_and_tier(submission, peers);
    let summary = cohort::summarize_cohort(peers);
    let rendered = report::build_scholarship_report(department, trimester, &rank, &summary);

    emit(json, &(&rank, &summary), &rendered, out)
}

fn emit<T: Serialize>(
    json: bool,
    value: &T,
    rendered: &str,
    out: Option<&Path>,
) -> anyhow::Result<()> {
    if let Some(path) = out {
        std::fs::write(path, rendered)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Report written to {}.", path.display());
        return Ok(());
    }

    if json {
        print_json(value)
    } else {
        print!("{rendered}");
        Ok(())
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
