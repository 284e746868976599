//! Form validation.
//!
//! Every form is validated before an operation is attempted. Validation
//! reports all failing fields at once and produces a dedicated validated type,
//! so request encoders never have to handle missing or malformed input.

pub mod error;
pub mod profile;
pub mod restaurant;
pub mod search;

pub use error::{FieldError, ValidationError};
pub use profile::ProfileDraft;
pub use restaurant::{
    ImageSource, ImageUpload, MenuItemDraft, RestaurantDraft, ValidatedMenuItem,
    ValidatedRestaurant,
};
pub use search::SearchQuery;
