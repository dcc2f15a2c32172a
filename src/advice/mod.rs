//! Advisory collaborator.
//!
//! Advisors turn game situations into short messages for the player. They
//! never fail: a remote advisor that cannot reach its service is expected
//! to fall back to [`OfflineAdvisor`]'s messages.

use crate::game::{LevelConfig, Mistake, Order};

pub trait Advisor {
    /// Nudge towards the next value to eat
    fn hint(&self, level: &LevelConfig, remaining: &[i32]) -> String;

    fn explain_mistake(&self, level: &LevelConfig, mistake: Mistake) -> String;

    fn praise(&self) -> String;
}

/// Deterministic advisor that needs no network
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineAdvisor;

impl Advisor for OfflineAdvisor {
    fn hint(&self, level: &LevelConfig, remaining: &[i32]) -> String {
        let next = match level.order {
            Order::Ascending => remaining.iter().min(),
            Order::Descending => remaining.iter().max(),
        };

        match next {
            Some(value) if *value < 0 => format!(
                "Eat {value} next. Among negatives, the further from zero, the smaller the number."
            ),
            Some(value) => format!(
                "Eat {value} next: it is the {} value left.",
                match level.order {
                    Order::Ascending => "smallest",
                    Order::Descending => "largest",
                }
            ),
            None => "Nothing left to eat!".to_string(),
        }
    }

    fn explain_mistake(&self, level: &LevelConfig, mistake: Mistake) -> String {
        let relation = match level.order {
            Order::Ascending => "smaller",
            Order::Descending => "larger",
        };
        format!(
            "{} is {relation} than {}, so {} had to come first.",
            mistake.correct, mistake.wrong, mistake.correct
        )
    }

    fn praise(&self) -> String {
        "Great job! Level cleared.".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_names_next_target() {
        let advisor = OfflineAdvisor;
        let asc = LevelConfig::default();
        assert!(advisor.hint(&asc, &[4, 9, 2]).starts_with("Eat 2 next"));

        let desc = LevelConfig::presets()[2].clone();
        assert!(advisor.hint(&desc, &[4, 9, 2]).starts_with("Eat 9 next"));
        assert!(advisor.hint(&desc, &[-4, -9]).starts_with("Eat -4 next"));
    }

    #[test]
    fn test_hint_with_nothing_left() {
        assert_eq!(
            OfflineAdvisor.hint(&LevelConfig::default(), &[]),
            "Nothing left to eat!"
        );
    }

    #[test]
    fn test_explain_mistake_names_correct_value() {
        let text = OfflineAdvisor.explain_mistake(
            &LevelConfig::default(),
            Mistake {
                wrong: 8,
                correct: -1,
            },
        );
        assert_eq!(text, "-1 is smaller than 8, so -1 had to come first.");
    }
}
