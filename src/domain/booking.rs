use chrono::NaiveDateTime;

use super::{Club, Competition, MAX_PLACES_PER_BOOKING};

/// A club asking for places in a competition
#[derive(Clone, Copy, Debug)]
pub struct BookingRequest<'a> {
    pub club: &'a Club,
    pub competition: &'a Competition,
    /// Number of places requested
    ///
    /// This is signed so that zero or negative quantities reach the rules instead of failing
    /// earlier on a type conversion.
    pub places_requested: i64,
}

/// Reason why a booking was refused
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("You cannot book a place on a past competition.")]
    PastCompetition,
    #[error("Number of places must be greater than zero.")]
    NonPositiveQuantity,
    #[error("Not enough places left in this competition.")]
    NotEnoughPlaces,
    #[error("You do not have enough points to book these places.")]
    NotEnoughPoints,
    #[error("Cannot book more than 12 places per competition.")]
    BookingCapExceeded,
    /// The quantity could not be read as a whole number
    ///
    /// This is raised before the rules run, when parsing user input.
    #[error("Number of places must be a whole number.")]
    InvalidQuantity,
}

impl Rejection {
    /// Booking rules, in evaluation order
    ///
    /// Only the first violated rule is reported, so the order decides which message a user sees
    /// when several rules fail at once.
    pub const RULES: [Rejection; 5] = [
        Rejection::PastCompetition,
        Rejection::NonPositiveQuantity,
        Rejection::NotEnoughPlaces,
        Rejection::NotEnoughPoints,
        Rejection::BookingCapExceeded,
    ];

    /// Whether the rule behind this rejection is violated by the request
    fn is_violated_by(self, request: &BookingRequest<'_>, now: NaiveDateTime) -> bool {
        let places = request.places_requested;
        match self {
            Rejection::PastCompetition => request.competition.has_occurred(now),
            Rejection::NonPositiveQuantity => places <= 0,
            Rejection::NotEnoughPlaces => places > i64::from(request.competition.number_of_places),
            Rejection::NotEnoughPoints => places > i64::from(request.club.points),
            Rejection::BookingCapExceeded => places > i64::from(MAX_PLACES_PER_BOOKING),
            // Raised while parsing input, never by a rule
            Rejection::InvalidQuantity => false,
        }
    }
}

/// Proof that a request passed every booking rule
///
/// Only [`validate`] can create one, which keeps [`settle`] from running on a refused request.
#[derive(Debug, PartialEq, Eq)]
pub struct Approval {
    places: u32,
}

impl Approval {
    pub fn places(&self) -> u32 {
        self.places
    }
}

/// Outcome of a booking attempt
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BookingOutcome {
    /// The booking went through, with the updated club and competition
    Committed { club: Club, competition: Competition },
    /// The booking was refused and nothing changed
    Rejected(Rejection),
}

/// Check a booking request against the rules
///
/// Returns the first violated rule, if any.
pub fn validate(
    club: &Club,
    competition: &Competition,
    places_requested: i64,
    now: NaiveDateTime,
) -> Result<Approval, Rejection> {
    let request = BookingRequest {
        club,
        competition,
        places_requested,
    };

    if let Some(rejection) = Rejection::RULES
        .into_iter()
        .find(|rule| rule.is_violated_by(&request, now))
    {
        return Err(rejection);
    }

    // Every rule passed, so the quantity is within 1..=MAX_PLACES_PER_BOOKING and the conversion
    // cannot fail
    let places = u32::try_from(places_requested).map_err(|_| Rejection::InvalidQuantity)?;
    Ok(Approval { places })
}

/// Spend the approved places from the competition and the club's points
pub fn settle(
    mut club: Club,
    mut competition: Competition,
    approval: Approval,
) -> (Club, Competition) {
    competition.number_of_places = competition.number_of_places.saturating_sub(approval.places);
    club.points = club.points.saturating_sub(approval.places);

    (club, competition)
}

/// Validate then settle a booking
pub fn book(
    club: Club,
    competition: Competition,
    places_requested: i64,
    now: NaiveDateTime,
) -> BookingOutcome {
    match validate(&club, &competition, places_requested, now) {
        Ok(approval) => {
            let (club, competition) = settle(club, competition, approval);
            BookingOutcome::Committed { club, competition }
        }
        Err(rejection) => BookingOutcome::Rejected(rejection),
    }
}
