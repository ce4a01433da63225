use std::{path::PathBuf, sync::Arc};

use clap::{Parser, Subcommand};
use club_booking::{
    adapters::store::json::{JsonStore, PersistMode},
    commands::{
        book::BookRequest, points_board::PointsBoardRequest,
        purchase_places::PurchasePlacesRequest, show_summary::ShowSummaryRequest, DomainLogic,
        Error, BOOKING_COMPLETE,
    },
    domain::{BookingOutcome, Club, Competition},
};
use tower::ServiceExt;

mod settings;

#[derive(Parser, Debug)]
#[command(name = "club-booking")]
#[command(about = "Book competition places for a club with its points")]
struct Cli {
    /// Settings file (defaults to `settings.toml` if present)
    #[arg(long, env = "CLUB_BOOKING_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in with a secretary email and list competitions
    Summary {
        #[arg(long)]
        email: String,
    },
    /// Show what a club can book in a competition
    Book {
        #[arg(long)]
        competition: String,
        #[arg(long)]
        club: String,
    },
    /// Book places in a competition
    Purchase {
        #[arg(long)]
        competition: String,
        #[arg(long)]
        club: String,
        #[arg(long)]
        places: String,
    },
    /// Show the points of every club
    Points,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let settings = settings::Settings::new(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(format!("club_booking={level}", level = settings.app.level))
        .with_writer(std::io::stderr)
        .init();

    let mode = if settings.store.testing {
        PersistMode::Disabled
    } else {
        PersistMode::Enabled
    };
    let store = JsonStore::open(&settings.store.clubs, &settings.store.competitions, mode).await?;
    let domain = DomainLogic::new(Arc::new(store));

    match run(&domain, cli.command).await {
        Ok(()) => Ok(()),
        Err(err @ Error::Store(_)) => {
            tracing::error!("{err}");
            Err(err.into())
        }
        Err(err) => {
            tracing::debug!("{err}");
            println!("{}", err.user_message());
            std::process::exit(1);
        }
    }
}

async fn run(domain: &DomainLogic<JsonStore>, command: Command) -> Result<(), Error> {
    match command {
        Command::Summary { email } => {
            let summary = domain
                .clone()
                .oneshot(ShowSummaryRequest { email })
                .await?;
            print_club(&summary.club);
            for competition in &summary.competitions {
                print_competition(competition);
            }
        }
        Command::Book { competition, club } => {
            let form = domain
                .clone()
                .oneshot(BookRequest { competition, club })
                .await?;
            println!(
                "{}: {} places left, {} has {} points",
                form.competition.name,
                form.places_available(),
                form.club.name,
                form.points_available()
            );
        }
        Command::Purchase {
            competition,
            club,
            places,
        } => {
            let outcome = domain
                .clone()
                .oneshot(PurchasePlacesRequest {
                    club,
                    competition,
                    places,
                })
                .await?;
            match outcome {
                BookingOutcome::Committed { club, competition } => {
                    println!("{BOOKING_COMPLETE}");
                    print_club(&club);
                    print_competition(&competition);
                }
                BookingOutcome::Rejected(rejection) => println!("{rejection}"),
            }
        }
        Command::Points => {
            let board = domain.clone().oneshot(PointsBoardRequest).await?;
            for club in board {
                println!("{}\t{}", club.name, club.points);
            }
        }
    }

    Ok(())
}

fn print_club(club: &Club) {
    println!("{} <{}>: {} points", club.name, club.email, club.points());
}

fn print_competition(competition: &Competition) {
    println!(
        "{} ({}): {} places",
        competition.name,
        competition.date,
        competition.number_of_places()
    );
}
