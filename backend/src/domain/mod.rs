//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed hotel, room and booking entities, the
//! booking admission protocol, and the ports through which adapters reach
//! the domain. Types here know nothing about HTTP or SQL; inbound and
//! outbound adapters convert at the edges.
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport-agnostic failure payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - Hotel, Room, Booking: inventory and ledger records.
//! - BookingAdmissionService: admits bookings and drives their status.
//! - CatalogService, BookingQueryService: inventory administration and
//!   booking listings.
//! - AccountService: password sign-in and self-service registration.

pub mod account;
pub mod account_service;
pub mod admission;
pub mod auth;
pub mod booking;
pub mod booking_query_service;
pub mod catalog;
pub mod catalog_service;
pub mod change_feed;
pub mod error;
pub mod ids;
pub mod ports;
pub mod profile_service;
pub mod trace_id;
pub mod user;

pub use self::account::{
    DEVELOPMENT_ACCOUNTS, DEVELOPMENT_ADMIN_ID, DEVELOPMENT_GUEST_ID, DEVELOPMENT_PASSWORD,
    DevelopmentAccount, NewAccount, PasswordDigest, PasswordDigestError, StoredCredentials,
};
pub use self::account_service::AccountService;
pub use self::admission::{
    AdmissionPolicy, AdmissionStrategy, BookingAdmissionError, BookingAdmissionService,
    BookingStatusError, StorageFailure, UnknownAdmissionStrategy,
};
pub use self::auth::{LoginCredentials, LoginValidationError, MIN_PASSWORD_CHARS, Registration};
pub use self::booking::{
    BookedRoom, Booking, BookingFilter, BookingRequest, BookingStatus, BookingView, NewBooking,
    StayRange, StayRangeError, TransitionError, TransitionPlan, UnknownBookingStatus,
    max_total_amount, parse_stay_date, plan_transition,
};
pub use self::booking_query_service::BookingQueryService;
pub use self::catalog::{
    CatalogValidationError, DashboardSummary, DraftPurpose, Hotel, HotelDraft, HotelRemoval,
    MAX_ROOM_CAPACITY, MONEY_SCALE, NewRoom, Room, RoomDraft, RoomType, max_price_per_night,
};
pub use self::catalog_service::CatalogService;
pub use self::change_feed::{ChangeEvent, ChangeOperation, ChangeRow, ChangeTable};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{BookingId, HotelId, RoomId};
pub use self::profile_service::ProfileService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{Actor, Profile, Role, UserId, UserValidationError};
