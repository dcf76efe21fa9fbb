//! Authentication domain types

mod credentials;

pub use credentials::{
    Credentials, DEFAULT_PASSWORD, DEFAULT_USERNAME, TOKEN_FIELD, extract_token,
};
