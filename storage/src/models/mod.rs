mod event;
mod issf_score;
mod registration;
mod score;
mod user;

pub use event::{Event, EventStatus};
pub use issf_score::IssfScore;
pub use registration::{EventRegistration, RegistrationStatus};
pub use score::{Score, ScoreStatus};
pub use user::{Actor, MembershipType, User, UserRole};
