use crate::domain::{Club, Competition};

/// Storage for clubs and competitions
#[mockall::automock]
#[async_trait::async_trait]
pub trait StorePort {
    async fn list_clubs(&self) -> Result<Vec<Club>, Error>;
    async fn list_competitions(&self) -> Result<Vec<Competition>, Error>;
    async fn find_club_by_email(&self, email: &str) -> Result<Option<Club>, Error>;
    async fn find_club_by_name(&self, name: &str) -> Result<Option<Club>, Error>;
    async fn find_competition_by_name(&self, name: &str) -> Result<Option<Competition>, Error>;
    /// Store the club and competition resulting from a booking
    ///
    /// Both records must already exist. They are matched by name.
    async fn save_booking(&self, club: Club, competition: Competition) -> Result<(), Error>;
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Trying to save a club that was never loaded
    #[error("club {0} does not exist")]
    ClubDoesNotExist(String),
    /// Trying to save a competition that was never loaded
    #[error("competition {0} does not exist")]
    CompetitionDoesNotExist(String),

    /// Concrete adapter errors
    ///
    /// This could represent any errors from a concrete adapter that is not part of the domain
    /// model, such as I/O, malformed records, or permission errors.
    #[error("adapter error: {0:?}")]
    Adapter(Box<dyn std::error::Error + Send + Sync>),
}
