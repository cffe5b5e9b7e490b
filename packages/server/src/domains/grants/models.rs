use crate::domains::verification::Tier;

use super::machine::GrantState;

/// Key under which a pending grant is filed. Constructors normalize so
/// lookups never depend on the caller's casing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GrantKey {
    /// One-time code, stored uppercase
    Code(String),
    /// Discord handle, stored lowercase
    Handle(String),
}

impl GrantKey {
    pub fn code(raw: &str) -> Self {
        Self::Code(raw.trim().to_uppercase())
    }

    pub fn handle(raw: &str) -> Self {
        Self::Handle(raw.trim().to_lowercase())
    }
}

/// An unresolved promise to assign a role once the matching member
/// event arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingGrant {
    pub key: GrantKey,
    /// YouTube handle the submission came from
    pub source_handle: String,
    pub target_role_id: String,
    pub tier: Option<Tier>,
    pub state: GrantState,
}

impl PendingGrant {
    pub fn new(
        key: GrantKey,
        source_handle: impl Into<String>,
        target_role_id: impl Into<String>,
        tier: Option<Tier>,
    ) -> Self {
        Self {
            key,
            source_handle: source_handle.into(),
            target_role_id: target_role_id.into(),
            tier,
            state: GrantState::Submitted,
        }
    }
}

/// Mint a one-time verification code like `YT-7KQ2`.
pub fn mint_code() -> String {
    const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let mut code = String::from("YT-");
    for _ in 0..4 {
        code.push(ALPHABET[fastrand::usize(..ALPHABET.len())] as char);
    }
    code
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_normalize_case() {
        assert_eq!(GrantKey::handle("TestUser#1234"), GrantKey::handle("testuser#1234"));
        assert_eq!(GrantKey::code("yt-ab12"), GrantKey::code("YT-AB12"));
        assert_eq!(GrantKey::handle("  user  "), GrantKey::Handle("user".to_string()));
    }

    #[test]
    fn minted_codes_have_the_expected_shape() {
        for _ in 0..50 {
            let code = mint_code();
            assert_eq!(code.len(), 7);
            assert!(code.starts_with("YT-"));
            assert!(code[3..]
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        }
    }
}
