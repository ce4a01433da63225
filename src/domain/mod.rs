use chrono::NaiveDateTime;

pub mod booking;

pub use booking::{book, settle, validate, Approval, BookingOutcome, BookingRequest, Rejection};

/// Maximum number of places a club can book in a single request
pub const MAX_PLACES_PER_BOOKING: u32 = 12;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Club {
    /// Unique name of the `Club`
    pub name: String,
    /// Email of the club secretary
    ///
    /// This is also unique and is used to identify the secretary.
    pub email: String,
    /// Number of points available to book places
    ///
    /// One point is spent per booked place.
    points: u32,
}

impl Club {
    pub fn new(name: impl Into<String>, email: impl Into<String>, points: u32) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            points,
        }
    }

    pub fn points(&self) -> u32 {
        self.points
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Competition {
    /// Unique name of the `Competition`
    pub name: String,
    /// Start of the competition, in local wall-clock time
    pub date: NaiveDateTime,
    /// Number of places that can still be booked
    number_of_places: u32,
}

impl Competition {
    pub fn new(name: impl Into<String>, date: NaiveDateTime, number_of_places: u32) -> Self {
        Self {
            name: name.into(),
            date,
            number_of_places,
        }
    }

    pub fn number_of_places(&self) -> u32 {
        self.number_of_places
    }

    /// Whether the competition started before `now`
    pub fn has_occurred(&self, now: NaiveDateTime) -> bool {
        self.date < now
    }
}

/// Point balance of a club, as shown on the public board
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClubPoints {
    pub name: String,
    pub points: u32,
}

impl From<&Club> for ClubPoints {
    fn from(club: &Club) -> Self {
        Self {
            name: club.name.clone(),
            points: club.points,
        }
    }
}
