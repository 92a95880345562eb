use crate::infra::{
    parse_first_stage_answer, parse_second_stage_answer, InMemoryNetRecordRepository,
    InMemoryScoreSheetRepository,
};
use chrono::Utc;
use clap::Args;
use std::fmt::Write;
use std::path::PathBuf;
use std::sync::Arc;
use yks_score::config::AppConfig;
use yks_score::error::AppError;
use yks_score::persistence::UserId;
use yks_score::scoring::{
    AnswerCount, Estimate, EstimateRequest, ExamSubject, FirstStageSubject, ScoreBasis,
    ScoreService, ScoreSheetSubmission, ScoringProfile, SecondStageSubject, TrackSelection,
};
use yks_score::tracking::{NetRecordImporter, NetRecordSubmission, NetTrackingService, SubjectProgress};

#[derive(Args, Debug)]
pub(crate) struct EstimateArgs {
    /// Track to score: equal_weight (ea), quantitative (say), verbal (soz), or all
    #[arg(long, default_value = "all")]
    pub(crate) track: TrackSelection,
    /// First-stage (TYT) answers, repeatable
    #[arg(
        long = "first-stage",
        value_name = "SUBJECT=C/I[/U]",
        value_parser = parse_first_stage_answer
    )]
    pub(crate) first_stage: Vec<(FirstStageSubject, AnswerCount)>,
    /// Second-stage (AYT) answers, repeatable; omit to use the TYT-only formula
    #[arg(
        long = "second-stage",
        value_name = "SUBJECT=C/I[/U]",
        value_parser = parse_second_stage_answer
    )]
    pub(crate) second_stage: Vec<(SecondStageSubject, AnswerCount)>,
    /// High-school diploma score (50-100)
    #[arg(long)]
    pub(crate) diploma: Option<f64>,
    /// Print the estimate as JSON instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct NetsReportArgs {
    /// CSV export with Exam,Date,Stage,Subject,Correct,Incorrect[,Unanswered] columns
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// List every exam under each subject
    #[arg(long)]
    pub(crate) points: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the practice-exam net portion of the demo.
    #[arg(long)]
    pub(crate) skip_nets: bool,
}

pub(crate) fn run_estimate(args: EstimateArgs) -> Result<(), AppError> {
    let EstimateArgs {
        track,
        first_stage,
        second_stage,
        diploma,
        json,
    } = args;

    let profile = AppConfig::load()?.scoring.load_profile()?;
    let service = score_service(profile);
    let estimate = service.estimate(EstimateRequest {
        track,
        sheet: ScoreSheetSubmission {
            first_stage: first_stage.into_iter().collect(),
            second_stage: second_stage.into_iter().collect(),
            diploma,
        },
    })?;

    if json {
        match serde_json::to_string_pretty(&estimate) {
            Ok(body) => println!("{body}"),
            Err(err) => println!("Estimate payload unavailable: {err}"),
        }
    } else {
        print!("{}", render_estimate(&estimate));
    }
    Ok(())
}

pub(crate) fn run_nets_report(args: NetsReportArgs) -> Result<(), AppError> {
    let submissions = NetRecordImporter::from_path(&args.csv)?;
    let progress = progress_for(submissions)?;

    println!("Practice-exam nets from {}", args.csv.display());
    print!("{}", render_progress(&progress, args.points));
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    println!("YKS score estimation demo");
    let service = score_service(ScoringProfile::standard().clone());
    let estimate = service.estimate(demo_request())?;
    print!("{}", render_estimate(&estimate));

    if args.skip_nets {
        return Ok(());
    }

    println!("\nPractice-exam net history (sample export)");
    let submissions = NetRecordImporter::from_reader(DEMO_NET_EXPORT.as_bytes())?;
    let progress = progress_for(submissions)?;
    print!("{}", render_progress(&progress, true));
    Ok(())
}

fn score_service(profile: ScoringProfile) -> ScoreService<InMemoryScoreSheetRepository> {
    ScoreService::new(
        Arc::new(InMemoryScoreSheetRepository::default()),
        Arc::new(profile),
    )
}

fn progress_for(submissions: Vec<NetRecordSubmission>) -> Result<Vec<SubjectProgress>, AppError> {
    let service = NetTrackingService::new(Arc::new(InMemoryNetRecordRepository::default()));
    let user = UserId("cli".to_string());
    let now = Utc::now();
    service.record_many(&user, submissions, now)?;
    Ok(service.progress_at(&user, now)?)
}

pub(crate) fn render_estimate(estimate: &Estimate) -> String {
    let mut out = String::new();
    writeln!(
        &mut out,
        "Nets: TYT {:.2} | AYT {:.2}",
        estimate.nets.first_stage_total(),
        estimate.nets.second_stage_total()
    )
    .expect("write nets header");
    for (subject, net) in &estimate.nets.first_stage {
        writeln!(&mut out, "  - {}: {:.2}", subject.label(), net).expect("write first-stage net");
    }
    for (subject, net) in &estimate.nets.second_stage {
        writeln!(&mut out, "  - {}: {:.2}", subject.label(), net).expect("write second-stage net");
    }

    writeln!(&mut out, "Placement estimates").expect("write estimates header");
    for (track, result) in &estimate.results {
        let composite = &result.composite;
        let basis = match composite.basis {
            ScoreBasis::TrackWeighted => "weighted",
            ScoreBasis::FirstStageOnly => "TYT only",
        };
        writeln!(
            &mut out,
            "- {}: {:.3} points ({}) -> rank ~{}",
            track.label(),
            composite.placement_score,
            basis,
            group_thousands(result.estimated_rank)
        )
        .expect("write track estimate");
    }

    for warning in &estimate.warnings {
        writeln!(&mut out, "Note: {}", warning.summary()).expect("write warning");
    }
    out
}

pub(crate) fn render_progress(progress: &[SubjectProgress], with_points: bool) -> String {
    let mut out = String::new();
    if progress.is_empty() {
        writeln!(&mut out, "No practice-exam records.").expect("write empty progress");
        return out;
    }

    for series in progress {
        writeln!(
            &mut out,
            "- {}: latest {:.2} | best {:.2} | average {:.2} over {} exams",
            series.label,
            series.latest_net,
            series.best_net,
            series.average_net,
            series.points.len()
        )
        .expect("write progress summary");
        if with_points {
            for point in &series.points {
                writeln!(
                    &mut out,
                    "    {} {}: {:.2}",
                    point.taken_on.format("%d.%m.%Y"),
                    point.exam_name,
                    point.net
                )
                .expect("write progress point");
            }
        }
    }
    out
}

fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    grouped
}

fn demo_request() -> EstimateRequest {
    EstimateRequest {
        track: TrackSelection::All,
        sheet: ScoreSheetSubmission {
            first_stage: [
                (FirstStageSubject::Turkish, AnswerCount::new(31, 4).with_unanswered(5)),
                (FirstStageSubject::SocialSciences, AnswerCount::new(14, 3).with_unanswered(3)),
                (FirstStageSubject::BasicMathematics, AnswerCount::new(24, 8).with_unanswered(8)),
                (FirstStageSubject::Science, AnswerCount::new(11, 5).with_unanswered(4)),
            ]
            .into_iter()
            .collect(),
            second_stage: [
                (SecondStageSubject::Mathematics, AnswerCount::new(22, 6).with_unanswered(12)),
                (SecondStageSubject::Literature, AnswerCount::new(17, 4).with_unanswered(3)),
                (SecondStageSubject::History1, AnswerCount::new(6, 2).with_unanswered(2)),
                (SecondStageSubject::Geography1, AnswerCount::new(4, 1).with_unanswered(1)),
            ]
            .into_iter()
            .collect(),
            diploma: Some(84.2),
        },
    }
}

const DEMO_NET_EXPORT: &str = "\
Exam,Date,Stage,Subject,Correct,Incorrect,Unanswered
Deneme 1,12.01.2024,TYT,turkish,28,8,4
Deneme 1,12.01.2024,TYT,basic_mathematics,18,10,12
Deneme 2,09.02.2024,TYT,turkish,30,6,4
Deneme 2,09.02.2024,TYT,basic_mathematics,21,7,12
Deneme 2,09.02.2024,AYT,mathematics,15,9,16
Deneme 3,15.03.2024,TYT,turkish,33,2,5
Deneme 3,15.03.2024,AYT,mathematics,19,7,14
";
