//! Random seat assignment for a stage.

use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashMap;

use super::models::EnrollmentId;

/// Seat randomizer driven by an injected random source
pub struct SeatRandomizer<'a, R: Rng + ?Sized> {
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> SeatRandomizer<'a, R> {
    pub fn new(rng: &'a mut R) -> Self {
        Self { rng }
    }

    /// Assign random seats to competitors
    ///
    /// # Arguments
    ///
    /// * `enrollment_ids` - Competitors to seat
    ///
    /// # Returns
    ///
    /// * `HashMap<EnrollmentId, usize>` - Map of enrollment to seat, numbered
    ///   from 1 with no gaps
    pub fn assign_seats(
        &mut self,
        enrollment_ids: &[EnrollmentId],
    ) -> HashMap<EnrollmentId, usize> {
        if enrollment_ids.is_empty() {
            return HashMap::new();
        }

        let mut seats: Vec<usize> = (1..=enrollment_ids.len()).collect();
        seats.shuffle(&mut *self.rng);

        enrollment_ids.iter().copied().zip(seats).collect()
    }
}
