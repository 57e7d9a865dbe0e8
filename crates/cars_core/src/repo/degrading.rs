//! Empty-on-failure adapter over a car repository.
//!
//! # Responsibility
//! - Offer the infallible call surface: reads return a `Vec`, writes return
//!   nothing.
//! - Record every absorbed failure to the log before degrading.
//!
//! # Invariants
//! - A failed read yields an empty `Vec`; a failed write is a no-op.
//! - Every absorbed failure emits one `warn` record with `status=degraded`
//!   and the error kind.
//! - Callers cannot tell "no rows" from "store unreachable" through this type.

use super::car_repo::CarRepository;
use super::{RepoError, RepoResult};
use crate::model::car::{Car, CarId};
use log::warn;

/// Wraps a `CarRepository` and converts every error into an empty result.
pub struct DegradingCarRepository<R> {
    inner: R,
}

impl<R: CarRepository> DegradingCarRepository<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    pub fn add(&self, elem: &Car) {
        absorb("car_add", self.inner.add(elem));
    }

    pub fn update(&self, id: CarId, elem: &Car) {
        absorb("car_update", self.inner.update(id, elem));
    }

    pub fn find_all(&self) -> Vec<Car> {
        absorb("car_find_all", self.inner.find_all())
    }

    pub fn find_by_manufacturer(&self, manufacturer: &str) -> Vec<Car> {
        absorb(
            "car_find_by_manufacturer",
            self.inner.find_by_manufacturer(manufacturer),
        )
    }

    pub fn find_between_years(&self, min: i32, max: i32) -> Vec<Car> {
        absorb(
            "car_find_between_years",
            self.inner.find_between_years(min, max),
        )
    }
}

fn absorb<T: Default>(event: &'static str, result: RepoResult<T>) -> T {
    result.unwrap_or_else(|err: RepoError| {
        warn!(
            "event={event} module=repo status=degraded error_kind={} error={}",
            err.kind().as_str(),
            err
        );
        T::default()
    })
}
