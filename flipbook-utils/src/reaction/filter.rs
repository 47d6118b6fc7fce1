//! Pure allow/deny filtering over (actor, symbol) reaction pairs.

use twilight_model::id::{Id, marker::UserMarker};

use crate::symbol::Symbol;

/// Allow/deny sets constraining which reactions a session accepts.
///
/// Each axis is optional; an absent axis constrains nothing. Symbols match
/// by display name or platform id on both the allow and deny axes.
#[derive(Debug, Clone, Default)]
pub struct ReactionConstraint {
    /// Only these actors qualify, when set.
    pub allow_users: Option<Vec<Id<UserMarker>>>,
    /// These actors never qualify, when set.
    pub deny_users: Option<Vec<Id<UserMarker>>>,
    /// Only these symbols qualify, when set.
    pub allow_emoji: Option<Vec<Symbol>>,
    /// These symbols never qualify, when set.
    pub deny_emoji: Option<Vec<Symbol>>,
}

/// Compiled predicate over (actor, symbol) pairs.
///
/// Pure and deterministic; evaluates the four constraint axes independently
/// and requires all of them to pass.
#[derive(Debug, Clone, Default)]
pub struct ReactionFilter {
    constraint: ReactionConstraint,
}

impl ReactionFilter {
    /// Compile a constraint into a reusable filter.
    pub fn new(constraint: ReactionConstraint) -> Self {
        Self { constraint }
    }

    /// Whether the given actor/symbol pair passes every constraint axis.
    pub fn matches(&self, actor: Id<UserMarker>, symbol: &Symbol) -> bool {
        if let Some(allowed) = &self.constraint.allow_users
            && !allowed.contains(&actor)
        {
            return false;
        }

        if let Some(denied) = &self.constraint.deny_users
            && denied.contains(&actor)
        {
            return false;
        }

        if let Some(allowed) = &self.constraint.allow_emoji
            && !allowed.iter().any(|candidate| candidate.matches(symbol))
        {
            return false;
        }

        if let Some(denied) = &self.constraint.deny_emoji
            && denied.iter().any(|candidate| candidate.matches(symbol))
        {
            return false;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::{BACK_SYMBOL, FORWARD_SYMBOL};

    fn actor(raw: u64) -> Id<UserMarker> {
        Id::new(raw)
    }

    #[test]
    fn unconstrained_filter_accepts_everything() {
        let filter = ReactionFilter::default();
        assert!(filter.matches(actor(1), &Symbol::unicode(FORWARD_SYMBOL)));
        assert!(filter.matches(actor(2), &Symbol::custom(9, None)));
    }

    #[test]
    fn allow_users_is_the_only_gate_for_listed_actors() {
        let filter = ReactionFilter::new(ReactionConstraint {
            allow_users: Some(vec![actor(1)]),
            ..ReactionConstraint::default()
        });
        assert!(filter.matches(actor(1), &Symbol::unicode(FORWARD_SYMBOL)));
        assert!(!filter.matches(actor(2), &Symbol::unicode(FORWARD_SYMBOL)));
    }

    #[test]
    fn deny_users_never_increases_acceptance() {
        let open = ReactionFilter::default();
        let restricted = ReactionFilter::new(ReactionConstraint {
            deny_users: Some(vec![actor(2)]),
            ..ReactionConstraint::default()
        });

        let symbol = Symbol::unicode(FORWARD_SYMBOL);
        for raw in 1..=4 {
            if restricted.matches(actor(raw), &symbol) {
                assert!(open.matches(actor(raw), &symbol));
            }
        }
        assert!(!restricted.matches(actor(2), &symbol));
    }

    #[test]
    fn deny_users_applies_even_when_actor_is_allowed() {
        let filter = ReactionFilter::new(ReactionConstraint {
            allow_users: Some(vec![actor(1)]),
            deny_users: Some(vec![actor(1)]),
            ..ReactionConstraint::default()
        });
        assert!(!filter.matches(actor(1), &Symbol::unicode(FORWARD_SYMBOL)));
    }

    #[test]
    fn allow_emoji_matches_by_name_or_id() {
        let filter = ReactionFilter::new(ReactionConstraint {
            allow_emoji: Some(vec![Symbol::custom(42, Some("blob"))]),
            ..ReactionConstraint::default()
        });
        assert!(filter.matches(actor(1), &Symbol::custom(42, None)));
        assert!(filter.matches(actor(1), &Symbol::unicode("blob")));
        assert!(!filter.matches(actor(1), &Symbol::unicode(BACK_SYMBOL)));
    }

    #[test]
    fn deny_emoji_matches_by_name_or_id() {
        let filter = ReactionFilter::new(ReactionConstraint {
            deny_emoji: Some(vec![Symbol::custom(42, Some("blob"))]),
            ..ReactionConstraint::default()
        });
        assert!(!filter.matches(actor(1), &Symbol::custom(42, None)));
        assert!(!filter.matches(actor(1), &Symbol::unicode("blob")));
        assert!(filter.matches(actor(1), &Symbol::unicode(BACK_SYMBOL)));
    }

    #[test]
    fn all_axes_must_pass_together() {
        let filter = ReactionFilter::new(ReactionConstraint {
            allow_users: Some(vec![actor(1)]),
            deny_users: Some(vec![actor(3)]),
            allow_emoji: Some(vec![
                Symbol::unicode(FORWARD_SYMBOL),
                Symbol::unicode(BACK_SYMBOL),
            ]),
            deny_emoji: Some(vec![Symbol::unicode(BACK_SYMBOL)]),
        });

        assert!(filter.matches(actor(1), &Symbol::unicode(FORWARD_SYMBOL)));
        assert!(!filter.matches(actor(1), &Symbol::unicode(BACK_SYMBOL)));
        assert!(!filter.matches(actor(2), &Symbol::unicode(FORWARD_SYMBOL)));
    }
}
