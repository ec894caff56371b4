use itertools::Itertools;

use crate::{
    color::hex_to_rgba,
    constants::TINT_ALPHA,
    domain::{ExerciseId, TintByExerciseId},
};

/// A past day with something other than a lone rest scheduled.
pub fn is_active(exercises: &[ExerciseId], is_past: bool) -> bool {
    let rest_only = exercises.len() == 1 && exercises[0].is_rest();
    is_past && !exercises.is_empty() && !rest_only
}

/// Background for a past day: the single exercise's tint, or a diagonal
/// gradient when every listed exercise has a tint. Today and future days,
/// empty days and partially tinted days get nothing.
pub fn background_tint(
    exercises: &[ExerciseId],
    is_past: bool,
    tint_by_exercise_id: &TintByExerciseId,
) -> Option<String> {
    if !is_past || exercises.is_empty() {
        return None;
    }

    let tints: Vec<&String> = exercises
        .iter()
        .map(|id| tint_by_exercise_id.get(id))
        .collect::<Option<_>>()?;

    match tints.as_slice() {
        [single] => Some(hex_to_rgba(single, TINT_ALPHA)),
        many => Some(format!(
            "linear-gradient(135deg, {})",
            many.iter().map(|c| hex_to_rgba(c, TINT_ALPHA)).join(", ")
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[&str]) -> Vec<ExerciseId> {
        list.iter().map(|id| ExerciseId::new(*id)).collect()
    }

    fn tints(pairs: &[(&str, &str)]) -> TintByExerciseId {
        pairs
            .iter()
            .map(|(id, color)| (ExerciseId::new(*id), color.to_string()))
            .collect()
    }

    #[test]
    fn test_is_active_requires_past_and_non_rest() {
        assert!(is_active(&ids(&["run"]), true));
        assert!(is_active(&ids(&["rest", "run"]), true));
        assert!(!is_active(&ids(&["run"]), false));
        assert!(!is_active(&ids(&["rest"]), true));
        assert!(!is_active(&[], true));
    }

    #[test]
    fn test_single_tint_is_alpha_blended() {
        let config = tints(&[("swim", "#4fc3f7")]);
        assert_eq!(
            background_tint(&ids(&["swim"]), true, &config),
            Some("rgba(79,195,247,0.18)".to_string())
        );
    }

    #[test]
    fn test_single_rest_still_gets_its_tint() {
        let config = tints(&[("rest", "#fff")]);
        assert_eq!(
            background_tint(&ids(&["rest"]), true, &config),
            Some("rgba(255,255,255,0.18)".to_string())
        );
    }

    #[test]
    fn test_partial_tints_yield_nothing() {
        let config = tints(&[("swim", "#4fc3f7")]);
        assert_eq!(background_tint(&ids(&["swim", "bike"]), true, &config), None);
        assert_eq!(background_tint(&ids(&["bike"]), true, &config), None);
    }

    #[test]
    fn test_all_tinted_builds_gradient_in_order() {
        let config = tints(&[("swim", "#4fc3f7"), ("bike", "#a259e6")]);
        assert_eq!(
            background_tint(&ids(&["swim", "bike"]), true, &config),
            Some(
                "linear-gradient(135deg, rgba(79,195,247,0.18), rgba(162,89,230,0.18))"
                    .to_string()
            )
        );
        assert_eq!(
            background_tint(&ids(&["bike", "swim"]), true, &config),
            Some(
                "linear-gradient(135deg, rgba(162,89,230,0.18), rgba(79,195,247,0.18))"
                    .to_string()
            )
        );
    }

    #[test]
    fn test_today_and_future_are_never_tinted() {
        let config = tints(&[("swim", "#4fc3f7")]);
        assert_eq!(background_tint(&ids(&["swim"]), false, &config), None);
        assert_eq!(background_tint(&[], true, &config), None);
    }
}
