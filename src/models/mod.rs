pub mod ancillary;
pub mod booking;
pub mod offer;
pub mod order;
pub mod order_change;
pub mod passenger;
pub mod search;

pub use ancillary::{AncillarySelection, AvailableService, SeatMap};
pub use booking::{Booking, BookingStatus, PaymentStatus};
pub use offer::{Airline, Offer, OfferSlice, Segment};
pub use order::{HoldStatus, OrderPaymentStatus, ProviderOrder};
pub use order_change::{ChangeRequestInput, ConfirmedChange, OrderChangeOffer, OrderChangeRequest};
pub use passenger::{PassengerFieldError, PassengerInput};
pub use search::{PassengerSpec, PassengerType, SearchRequest, SliceInput};
