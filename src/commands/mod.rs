use chrono::{Local, NaiveDateTime};
use std::sync::Arc;
use tokio::sync::Mutex;

pub mod book;
pub mod points_board;
pub mod purchase_places;
pub mod show_summary;

/// Message shown when a booking goes through
pub const BOOKING_COMPLETE: &str = "Great-booking complete!";

pub struct DomainLogic<S> {
    store: Arc<S>,
    /// Source of the current time, in the same local wall-clock time as competition dates
    clock: fn() -> NaiveDateTime,
    /// Held across lookup, validation and persistence of a booking
    booking_lock: Arc<Mutex<()>>,
}

impl<S> DomainLogic<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            clock: local_now,
            booking_lock: Arc::default(),
        }
    }

    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }
}

impl<S> Clone for DomainLogic<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            clock: self.clock,
            booking_lock: self.booking_lock.clone(),
        }
    }
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("store port error: {0:?}")]
    Store(#[from] crate::ports::store::Error),

    #[error("no club with email {0}")]
    UnknownEmail(String),
    #[error("no club named {0}")]
    UnknownClub(String),
    #[error("no competition named {0}")]
    UnknownCompetition(String),
}

impl Error {
    /// Message to show to the secretary
    pub fn user_message(&self) -> &'static str {
        match self {
            Error::UnknownEmail(_) => "Sorry, that email wasn't found.",
            Error::UnknownClub(_) | Error::UnknownCompetition(_) => {
                "Something went wrong-please try again"
            }
            Error::Store(_) => "The booking could not be saved, please contact the federation.",
        }
    }
}
