//! Repositories wrapping entity queries.

mod nomination;

pub use nomination::NominationRepository;
