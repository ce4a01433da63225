use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{domain::ClubPoints, ports::store::StorePort};
use tower::Service;

use super::{DomainLogic, Error};

/// Public board with the points of every club
///
/// This does not require signing in.
pub struct PointsBoardRequest;

impl<S> Service<PointsBoardRequest> for DomainLogic<S>
where
    S: StorePort + 'static,
{
    type Response = Vec<ClubPoints>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, _req: PointsBoardRequest) -> Self::Future {
        let store = self.store.clone();
        Box::pin(async move {
            let clubs = store.list_clubs().await?;
            Ok(clubs.iter().map(ClubPoints::from).collect())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::Club,
        ports::store::{self, MockStorePort},
    };
    use speculoos::prelude::*;
    use std::sync::Arc;
    use tower::{BoxError, ServiceExt};

    #[tokio::test]
    async fn test_call() -> Result<(), BoxError> {
        let mut store = MockStorePort::new();
        store.expect_list_clubs().times(1).returning(|| {
            Ok(vec![
                Club::new("Simply Lift", "john@simplylift.co", 13),
                Club::new("Iron Temple", "admin@irontemple.com", 4),
            ])
        });
        let domain = DomainLogic::new(Arc::new(store));

        let res = domain.clone().oneshot(PointsBoardRequest).await;

        assert_that!(res).is_ok().is_equal_to(vec![
            ClubPoints {
                name: "Simply Lift".to_string(),
                points: 13,
            },
            ClubPoints {
                name: "Iron Temple".to_string(),
                points: 4,
            },
        ]);

        Ok(())
    }

    #[tokio::test]
    async fn test_call_store_error() -> Result<(), BoxError> {
        let mut store = MockStorePort::new();
        store
            .expect_list_clubs()
            .returning(|| Err(store::Error::ClubDoesNotExist("Simply Lift".to_string())));
        let domain = DomainLogic::new(Arc::new(store));

        let res = domain.clone().oneshot(PointsBoardRequest).await;

        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, Error::Store(_)));

        Ok(())
    }
}
