//! Score policy: maps a clamped `0..=100` score to a display grade.

/// Display grade for a score. Variants are ordered worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Grade {
    Poor,
    NeedsWork,
    Fair,
    Good,
    Excellent,
}

/// Abstract colour for a grade; the display maps it to a theme colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorToken {
    Green,
    Teal,
    Yellow,
    Orange,
    Red,
}

impl Grade {
    pub fn label(self) -> &'static str {
        match self {
            Grade::Excellent => "Excellent",
            Grade::Good => "Good",
            Grade::Fair => "Fair",
            Grade::NeedsWork => "Needs work",
            Grade::Poor => "Poor",
        }
    }

    pub fn color_token(self) -> ColorToken {
        match self {
            Grade::Excellent => ColorToken::Green,
            Grade::Good => ColorToken::Teal,
            Grade::Fair => ColorToken::Yellow,
            Grade::NeedsWork => ColorToken::Orange,
            Grade::Poor => ColorToken::Red,
        }
    }
}

/// Grades a score. Lower bounds are inclusive: 90 is `Excellent`, 89 is `Good`.
pub fn grade(score: u8) -> Grade {
    match score {
        90.. => Grade::Excellent,
        75.. => Grade::Good,
        60.. => Grade::Fair,
        40.. => Grade::NeedsWork,
        _ => Grade::Poor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_belong_to_the_higher_band() {
        assert_eq!(grade(100), Grade::Excellent);
        assert_eq!(grade(90), Grade::Excellent);
        assert_eq!(grade(89), Grade::Good);
        assert_eq!(grade(75), Grade::Good);
        assert_eq!(grade(74), Grade::Fair);
        assert_eq!(grade(60), Grade::Fair);
        assert_eq!(grade(59), Grade::NeedsWork);
        assert_eq!(grade(40), Grade::NeedsWork);
        assert_eq!(grade(39), Grade::Poor);
        assert_eq!(grade(0), Grade::Poor);
    }

    #[test]
    fn grade_is_monotonic() {
        let mut prev = grade(0);
        for score in 1..=100u8 {
            let next = grade(score);
            assert!(next >= prev, "grade dropped at {score}");
            prev = next;
        }
    }

    #[test]
    fn every_grade_has_a_distinct_token() {
        use std::collections::HashSet;
        let tokens: HashSet<_> = [
            Grade::Poor,
            Grade::NeedsWork,
            Grade::Fair,
            Grade::Good,
            Grade::Excellent,
        ]
        .iter()
        .map(|g| g.color_token())
        .collect();
        assert_eq!(tokens.len(), 5);
    }
}
