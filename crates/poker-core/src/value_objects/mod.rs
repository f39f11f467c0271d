//! Value objects - immutable types that represent domain concepts

mod invite_code;
mod timestamp;
mod vote_value;

pub use invite_code::{generate_invite_code, is_valid_invite_code, normalize_invite_code, INVITE_CODE_LEN};
pub use timestamp::now_millis;
pub use vote_value::{VoteValue, VoteValueError, ESTIMATION_SCALE, UNKNOWN_SENTINEL};
