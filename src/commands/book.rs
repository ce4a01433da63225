use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{
    domain::{Club, Competition},
    ports::store::StorePort,
};
use tower::Service;

use super::{DomainLogic, Error};

/// Opening the booking form of a competition for a club
pub struct BookRequest {
    pub competition: String,
    pub club: String,
}

/// Everything needed to fill the booking form
#[derive(Debug, PartialEq, Eq)]
pub struct BookResponse {
    pub club: Club,
    pub competition: Competition,
}

impl BookResponse {
    pub fn points_available(&self) -> u32 {
        self.club.points()
    }

    pub fn places_available(&self) -> u32 {
        self.competition.number_of_places()
    }
}

impl<S> Service<BookRequest> for DomainLogic<S>
where
    S: StorePort + 'static,
{
    type Response = BookResponse;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: BookRequest) -> Self::Future {
        let store = self.store.clone();
        Box::pin(async move {
            let club = store
                .find_club_by_name(&req.club)
                .await?
                .ok_or_else(|| Error::UnknownClub(req.club.clone()))?;
            let competition = store
                .find_competition_by_name(&req.competition)
                .await?
                .ok_or_else(|| Error::UnknownCompetition(req.competition.clone()))?;

            Ok(BookResponse { club, competition })
        })
    }
}
