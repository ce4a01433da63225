use std::{
    future::Future,
    num::IntErrorKind,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{
    domain::{book, BookingOutcome, Rejection},
    ports::store::StorePort,
};
use tower::Service;

use super::{DomainLogic, Error};

/// A club secretary booking places in a competition
pub struct PurchasePlacesRequest {
    /// Name of the club
    pub club: String,
    /// Name of the competition
    pub competition: String,
    /// Number of places, as typed by the secretary
    pub places: String,
}

impl<S> Service<PurchasePlacesRequest> for DomainLogic<S>
where
    S: StorePort + 'static,
{
    type Response = BookingOutcome;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: PurchasePlacesRequest) -> Self::Future {
        let store = self.store.clone();
        let booking_lock = self.booking_lock.clone();
        let clock = self.clock;
        Box::pin(async move {
            // Nothing else may book until this booking is stored
            let _guard = booking_lock.lock().await;

            // Fetch necessary data
            let competition = store
                .find_competition_by_name(&req.competition)
                .await?
                .ok_or_else(|| Error::UnknownCompetition(req.competition.clone()))?;
            let club = store
                .find_club_by_name(&req.club)
                .await?
                .ok_or_else(|| Error::UnknownClub(req.club.clone()))?;

            let places_requested = match parse_places(&req.places) {
                Ok(places) => places,
                Err(rejection) => {
                    tracing::info!(club = %req.club, places = %req.places, "invalid quantity");
                    return Ok(BookingOutcome::Rejected(rejection));
                }
            };

            // Apply the booking rules, and store the result if they all pass
            let outcome = book(club, competition, places_requested, clock());
            match &outcome {
                BookingOutcome::Committed { club, competition } => {
                    store
                        .save_booking(club.clone(), competition.clone())
                        .await?;
                    tracing::info!(
                        club = %club.name,
                        competition = %competition.name,
                        places = places_requested,
                        points_left = club.points(),
                        places_left = competition.number_of_places(),
                        "booking complete"
                    );
                }
                BookingOutcome::Rejected(rejection) => {
                    tracing::info!(
                        club = %req.club,
                        competition = %req.competition,
                        places = places_requested,
                        %rejection,
                        "booking rejected"
                    );
                }
            }

            Ok(outcome)
        })
    }
}

/// Read the quantity typed by the secretary
///
/// Whole numbers too large for an `i64` are clamped, so they still go through the booking rules
/// and get the matching rejection.
fn parse_places(places: &str) -> Result<i64, Rejection> {
    let places = places.trim();
    match places.parse::<i64>() {
        Ok(places) => Ok(places),
        // Overflow is reported before later characters are checked
        Err(err) if is_whole_number(places) => match err.kind() {
            IntErrorKind::PosOverflow => Ok(i64::MAX),
            IntErrorKind::NegOverflow => Ok(i64::MIN),
            _ => Err(Rejection::InvalidQuantity),
        },
        Err(_) => Err(Rejection::InvalidQuantity),
    }
}

fn is_whole_number(text: &str) -> bool {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
