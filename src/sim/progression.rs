//! Score counter and difficulty step function

/// How difficulty reacts to score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressionRule {
    /// Difficulty rises each time score reaches a multiple of this
    pub threshold: u32,
    /// Amount added per threshold crossing
    pub increment: f32,
    /// Starting (and restart) difficulty
    pub floor: f32,
    /// Hard ceiling
    pub ceiling: f32,
}

impl ProgressionRule {
    /// A rule under which difficulty never changes
    pub const fn flat(level: f32) -> Self {
        Self {
            threshold: u32::MAX,
            increment: 0.0,
            floor: level,
            ceiling: level,
        }
    }
}

/// Monotonic score plus a bounded, non-decreasing difficulty scalar
#[derive(Debug, Clone)]
pub struct Progression {
    rule: ProgressionRule,
    score: u32,
    difficulty: f32,
    /// Score seen by the last step that crossed a threshold
    last_adjusted_score: u32,
}

impl Progression {
    pub fn new(rule: ProgressionRule) -> Self {
        Self {
            rule,
            score: 0,
            difficulty: rule.floor,
            last_adjusted_score: 0,
        }
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[inline]
    pub fn difficulty(&self) -> f32 {
        self.difficulty
    }

    pub fn add_points(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Raise difficulty once for every threshold multiple crossed since the
    /// last call.
    ///
    /// Returns true when difficulty changed.
    pub fn step(&mut self) -> bool {
        let rule = &self.rule;
        if rule.threshold == 0 || rule.increment <= 0.0 {
            return false;
        }
        let crossed = self.score / rule.threshold - self.last_adjusted_score / rule.threshold;
        if crossed == 0 {
            return false;
        }
        self.last_adjusted_score = self.score;

        let raised = (self.difficulty + rule.increment * crossed as f32).min(rule.ceiling);
        if raised <= self.difficulty {
            return false;
        }
        self.difficulty = raised;
        true
    }

    pub fn reset(&mut self) {
        self.score = 0;
        self.difficulty = self.rule.floor;
        self.last_adjusted_score = 0;
    }
}
