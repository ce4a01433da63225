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

/// A club secretary signing in with their email
pub struct ShowSummaryRequest {
    pub email: String,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ShowSummaryResponse {
    pub club: Club,
    /// Every competition, including the ones that already took place
    pub competitions: Vec<Competition>,
}

impl<S> Service<ShowSummaryRequest> for DomainLogic<S>
where
    S: StorePort + 'static,
{
    type Response = ShowSummaryResponse;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: ShowSummaryRequest) -> Self::Future {
        let store = self.store.clone();
        Box::pin(async move {
            let found = store.find_club_by_email(&req.email).await?;
            let club = match found {
                Some(club) => club,
                None => {
                    tracing::info!(email = %req.email, "unknown email");
                    return Err(Error::UnknownEmail(req.email));
                }
            };
            let competitions = store.list_competitions().await?;

            Ok(ShowSummaryResponse { club, competitions })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::store::MockStorePort;
    use chrono::NaiveDate;
    use rstest::*;
    use speculoos::prelude::*;
    use std::sync::Arc;
    use tower::{BoxError, ServiceExt};

    #[fixture]
    fn competitions() -> Vec<Competition> {
        let date = NaiveDate::from_ymd_opt(2020, 3, 27)
            .and_then(|d| d.and_hms_opt(10, 0, 0))
            .unwrap();
        vec![
            Competition::new("Spring Festival", date, 25),
            Competition::new("Fall Classic", date, 13),
        ]
    }

    #[rstest]
    #[tokio::test]
    async fn test_call(competitions: Vec<Competition>) -> Result<(), BoxError> {
        // GIVEN a store port that knows the club
        let club = Club::new("Iron Temple", "admin@irontemple.com", 4);
        let mut store = MockStorePort::new();
        let found = club.clone();
        store
            .expect_find_club_by_email()
            .times(1)
            .withf(|email| email.to_string() == "admin@irontemple.com")
            .returning(move |_| Ok(Some(found.clone())));
        let listed = competitions.clone();
        store
            .expect_list_competitions()
            .times(1)
            .returning(move || Ok(listed.clone()));

        let domain = DomainLogic::new(Arc::new(store));

        // WHEN calling the service
        let res = domain
            .clone()
            .oneshot(ShowSummaryRequest {
                email: "admin@irontemple.com".to_string(),
            })
            .await;

        // THEN it returns the club and all competitions
        assert_that!(res)
            .is_ok()
            .is_equal_to(ShowSummaryResponse { club, competitions });
        Arc::into_inner(domain.store).unwrap().checkpoint();

        Ok(())
    }

    #[tokio::test]
    async fn test_call_unknown_email() -> Result<(), BoxError> {
        // GIVEN a store port without the email
        let mut store = MockStorePort::new();
        store
            .expect_find_club_by_email()
            .times(1)
            .returning(|_| Ok(None));
        store.expect_list_competitions().times(0);

        let domain = DomainLogic::new(Arc::new(store));

        // WHEN calling the service
        let res = domain
            .clone()
            .oneshot(ShowSummaryRequest {
                email: "inconnu@example.com".to_string(),
            })
            .await;

        // THEN it returns an unknown email error
        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, Error::UnknownEmail(email) if email == "inconnu@example.com"));
        Arc::into_inner(domain.store).unwrap().checkpoint();

        Ok(())
    }
}
