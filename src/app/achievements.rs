//! Client-known achievement catalog.
//!
//! The catalog is closed, fixed configuration; the server only reports which
//! ids have been earned. Server ids missing from the catalog are ignored and
//! catalog entries the server omits render locked.

/// Immutable catalog entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub emoji: &'static str,
}

pub const CATALOG: [Achievement; 14] = [
    Achievement {
        id: "first-lesson",
        title: "First Steps",
        description: "Complete your first lesson",
        emoji: "🌱",
    },
    Achievement {
        id: "daily-goal",
        title: "Goal Getter",
        description: "Hit your daily goal",
        emoji: "🎯",
    },
    Achievement {
        id: "streak-3",
        title: "Warming Up",
        description: "Keep a 3-day streak",
        emoji: "✨",
    },
    Achievement {
        id: "streak-7",
        title: "On Fire",
        description: "Keep a 7-day streak",
        emoji: "🔥",
    },
    Achievement {
        id: "streak-30",
        title: "Unstoppable",
        description: "Keep a 30-day streak",
        emoji: "⚡",
    },
    Achievement {
        id: "xp-100",
        title: "Century",
        description: "Earn 100 XP",
        emoji: "💯",
    },
    Achievement {
        id: "xp-1000",
        title: "XP Collector",
        description: "Earn 1,000 XP",
        emoji: "💎",
    },
    Achievement {
        id: "level-5",
        title: "Climber",
        description: "Reach level 5",
        emoji: "⛰️",
    },
    Achievement {
        id: "level-10",
        title: "Summit",
        description: "Reach level 10",
        emoji: "🏔️",
    },
    Achievement {
        id: "course-complete",
        title: "Finisher",
        description: "Complete a whole course",
        emoji: "🏁",
    },
    Achievement {
        id: "five-courses",
        title: "Polymath",
        description: "Complete five courses",
        emoji: "🎓",
    },
    Achievement {
        id: "early-bird",
        title: "Early Bird",
        description: "Finish a lesson before 8am",
        emoji: "🌅",
    },
    Achievement {
        id: "night-owl",
        title: "Night Owl",
        description: "Finish a lesson after 11pm",
        emoji: "🦉",
    },
    Achievement {
        id: "perfectionist",
        title: "Perfectionist",
        description: "Finish a lesson without mistakes",
        emoji: "🌟",
    },
];

/// Intersect the catalog with the server-reported earned ids.
///
/// Always returns exactly one entry per catalog achievement, in catalog
/// order, paired with its earned flag.
pub fn earned_flags(earned_ids: &[String]) -> Vec<(&'static Achievement, bool)> {
    CATALOG
        .iter()
        .map(|a| (a, earned_ids.iter().any(|id| id == a.id)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earned_id_unlocks_its_entry() {
        let flags = earned_flags(&["streak-7".to_string()]);
        assert_eq!(flags.len(), CATALOG.len());
        for (a, earned) in flags {
            assert_eq!(earned, a.id == "streak-7");
        }
    }

    #[test]
    fn unknown_server_id_is_ignored() {
        let flags = earned_flags(&["not-a-real-achievement".to_string()]);
        assert_eq!(flags.len(), CATALOG.len());
        assert!(flags.iter().all(|(_, earned)| !earned));
    }

    #[test]
    fn empty_list_locks_everything() {
        assert!(earned_flags(&[]).iter().all(|(_, earned)| !earned));
    }

    #[test]
    fn catalog_ids_are_unique() {
        for (i, a) in CATALOG.iter().enumerate() {
            assert!(
                CATALOG.iter().skip(i + 1).all(|b| b.id != a.id),
                "duplicate id {}",
                a.id
            );
        }
    }
}
