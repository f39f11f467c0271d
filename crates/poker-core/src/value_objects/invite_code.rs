//! Room invite codes
//!
//! Six uppercase alphanumeric characters, shared by humans to join a room.

use rand::Rng;

/// Length of every invite code
pub const INVITE_CODE_LEN: usize = 6;

const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a random invite code
///
/// Uniqueness is not guaranteed here; the room store checks for collisions
/// against active codes.
pub fn generate_invite_code() -> String {
    let mut rng = rand::thread_rng();
    (0..INVITE_CODE_LEN)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

/// Normalize user input before lookup (trim + uppercase)
pub fn normalize_invite_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Check the shape of an invite code
pub fn is_valid_invite_code(code: &str) -> bool {
    code.len() == INVITE_CODE_LEN
        && code
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}
