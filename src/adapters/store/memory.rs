use crate::{
    domain::{Club, Competition},
    ports::store::{Error, StorePort},
};
use std::sync::{Arc, Mutex, PoisonError};

/// Clubs and competitions, in the order they were loaded
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Records {
    pub clubs: Vec<Club>,
    pub competitions: Vec<Competition>,
}

impl Records {
    /// Replace the stored club and competition with their booked versions
    pub fn apply_booking(&mut self, club: Club, competition: Competition) -> Result<(), Error> {
        // Check both records before touching either, so a failed save changes nothing
        let club_idx = self
            .clubs
            .iter()
            .position(|stored| stored.name == club.name)
            .ok_or_else(|| Error::ClubDoesNotExist(club.name.clone()))?;
        let competition_idx = self
            .competitions
            .iter()
            .position(|stored| stored.name == competition.name)
            .ok_or_else(|| Error::CompetitionDoesNotExist(competition.name.clone()))?;

        self.clubs[club_idx] = club;
        self.competitions[competition_idx] = competition;

        Ok(())
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    records: Arc<Mutex<Records>>,
}

impl MemoryStore {
    pub fn new(clubs: Vec<Club>, competitions: Vec<Competition>) -> Self {
        Self {
            records: Arc::new(Mutex::new(Records {
                clubs,
                competitions,
            })),
        }
    }

    /// Copy of every record currently stored
    pub fn snapshot(&self) -> Result<Records, Error> {
        Ok(self.records.lock()?.clone())
    }

    /// Swap every stored record for `records`
    pub fn replace(&self, records: Records) -> Result<(), Error> {
        *self.records.lock()? = records;
        Ok(())
    }
}

#[async_trait::async_trait]
impl StorePort for MemoryStore {
    async fn list_clubs(&self) -> Result<Vec<Club>, Error> {
        Ok(self.records.lock()?.clubs.clone())
    }

    async fn list_competitions(&self) -> Result<Vec<Competition>, Error> {
        Ok(self.records.lock()?.competitions.clone())
    }

    async fn find_club_by_email(&self, email: &str) -> Result<Option<Club>, Error> {
        let club = self
            .records
            .lock()?
            .clubs
            .iter()
            .find(|club| club.email == email)
            .cloned();

        Ok(club)
    }

    async fn find_club_by_name(&self, name: &str) -> Result<Option<Club>, Error> {
        let club = self
            .records
            .lock()?
            .clubs
            .iter()
            .find(|club| club.name == name)
            .cloned();

        Ok(club)
    }

    async fn find_competition_by_name(&self, name: &str) -> Result<Option<Competition>, Error> {
        let competition = self
            .records
            .lock()?
            .competitions
            .iter()
            .find(|competition| competition.name == name)
            .cloned();

        Ok(competition)
    }

    async fn save_booking(&self, club: Club, competition: Competition) -> Result<(), Error> {
        self.records.lock()?.apply_booking(club, competition)
    }
}

/// Erased [`PoisonError`]
///
/// `PoisonError` keeps the `MutexGuard` internally, which is not send. Thus we erase the error
/// and only keep the string representation instead.
#[derive(Debug, thiserror::Error)]
#[error("poison error: {0}")]
pub struct ErasedPoisonError(String);

impl<T> From<PoisonError<T>> for Error {
    fn from(err: PoisonError<T>) -> Self {
        Self::Adapter(Box::new(ErasedPoisonError(err.to_string())))
    }
}
