pub mod bands;
pub mod error;
pub mod money;
pub mod proposal;
pub mod repository;
pub mod reservation;

pub use error::StoreError;
pub use proposal::{NewProposal, Proposal, ProposalStatus};
pub use reservation::Reservation;
