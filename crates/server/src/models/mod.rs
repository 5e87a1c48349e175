//! Domain models.
//!
//! These are the validated in-memory representations of persisted entities.
//! Raw database rows live in the `db` module and are converted into these
//! types at the repository boundary.

pub mod admin_user;
pub mod business;
pub mod idea;
pub mod order;
pub mod subscriber;

pub use admin_user::{AdminUser, CurrentAdmin, session_keys};
pub use business::{Business, BusinessUpdate, NewBusiness};
pub use idea::{BusinessIdea, IdeaReview, NewBusinessIdea};
pub use order::{DownloadLink, NewOrder, Order, ShippingAddress};
pub use subscriber::{ContactSubmission, EmailSubscriber};
