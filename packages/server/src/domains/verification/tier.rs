use crate::config::TierRoles;

/// Membership tier. Each tier maps to exactly one role id (configured, not
/// derived at runtime).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tier {
    /// $4.99 tier, the base tier everything defaults to.
    #[default]
    InnerCircle,
    /// $9.99 tier.
    BestFriends,
    /// $24.99 tier.
    Elite,
}

impl Tier {
    /// Infer a tier from free text by looking for the formatted price tag.
    ///
    /// Highest tier wins when several prices appear. Returns `None` when no
    /// known price is present; callers wanting the fallback-to-base behavior
    /// use [`Tier::from_text`]. Known fragility: a locale or formatting
    /// change upstream silently stops matching, which defaults everyone to
    /// the base tier.
    pub fn detect(text: &str) -> Option<Tier> {
        if text.contains("$24.99") {
            Some(Tier::Elite)
        } else if text.contains("$9.99") {
            Some(Tier::BestFriends)
        } else if text.contains("$4.99") {
            Some(Tier::InnerCircle)
        } else {
            None
        }
    }

    /// Like [`Tier::detect`] but unmatched text yields the base tier.
    pub fn from_text(text: &str) -> Tier {
        Self::detect(text).unwrap_or_default()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::InnerCircle => "Inner Circle",
            Tier::BestFriends => "Best Friends",
            Tier::Elite => "Elite",
        }
    }

    pub fn price_tag(&self) -> &'static str {
        match self {
            Tier::InnerCircle => "$4.99",
            Tier::BestFriends => "$9.99",
            Tier::Elite => "$24.99",
        }
    }

    /// The role id this tier grants.
    pub fn role_id<'a>(&self, roles: &'a TierRoles) -> &'a str {
        match self {
            Tier::InnerCircle => &roles.inner_circle,
            Tier::BestFriends => &roles.best_friends,
            Tier::Elite => &roles.elite,
        }
    }

    /// Reverse lookup: which tier does a role id belong to, if any.
    pub fn for_role_id(roles: &TierRoles, role_id: &str) -> Option<Tier> {
        if role_id == roles.inner_circle {
            Some(Tier::InnerCircle)
        } else if role_id == roles.best_friends {
            Some(Tier::BestFriends)
        } else if role_id == roles.elite {
            Some(Tier::Elite)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles() -> TierRoles {
        TierRoles {
            inner_circle: "role-inner".to_string(),
            best_friends: "role-best".to_string(),
            elite: "role-elite".to_string(),
        }
    }

    #[test]
    fn detects_each_price_tag() {
        assert_eq!(Tier::detect("tier: $4.99/month"), Some(Tier::InnerCircle));
        assert_eq!(Tier::detect("tier: $9.99/month"), Some(Tier::BestFriends));
        assert_eq!(Tier::detect("tier: $24.99/month"), Some(Tier::Elite));
        assert_eq!(Tier::detect("no price here"), None);
    }

    #[test]
    fn highest_tier_wins_on_multiple_matches() {
        assert_eq!(
            Tier::detect("upgraded from $4.99 to $24.99"),
            Some(Tier::Elite)
        );
    }

    #[test]
    fn unmatched_text_defaults_to_base_tier() {
        assert_eq!(Tier::from_text("EUR 24,99"), Tier::InnerCircle);
    }

    #[test]
    fn role_mapping_round_trips() {
        let roles = roles();
        for tier in [Tier::InnerCircle, Tier::BestFriends, Tier::Elite] {
            assert_eq!(Tier::for_role_id(&roles, tier.role_id(&roles)), Some(tier));
        }
        assert_eq!(Tier::for_role_id(&roles, "unrelated-role"), None);
    }
}
