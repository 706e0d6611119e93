//! Time-windowed credential tokens.
//!
//! A token wraps a mailbox password so that it is only usable while the
//! wall clock stays inside the time bucket it was minted in. Decoding a
//! token from another bucket does not fail; it yields the wrong password,
//! and the mail server rejecting that password is the expiry check.

mod codec;

pub use codec::{
    decode, decode_at, encode, encode_at, get_life, unix_now, TokenError, LIFE_SEPARATOR,
};
